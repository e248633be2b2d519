use crate::services::ranking::RankingError;
use crate::services::rules::RuleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("No model has been trained yet")]
    ModelNotTrained,

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Log store error: {0}")]
    LogStore(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement conversions from other error types
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ranking::EntityKind;

    #[test]
    fn test_module_errors_convert() {
        let err: AppError = RankingError::UnknownEntity {
            kind: EntityKind::User,
            id: 7,
        }
        .into();
        assert!(matches!(err, AppError::Ranking(_)));
        assert!(err.to_string().contains("user 7"));

        let err: AppError = RuleError::UnmappedEvent("Party".to_string()).into();
        assert_eq!(err.to_string(), "Rule error: No shoe type is mapped for event 'Party'");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "users.json");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
