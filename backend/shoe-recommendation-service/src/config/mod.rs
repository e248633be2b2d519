use crate::models::{EventType, WeatherCondition};
use crate::services::interactions::InteractionWeights;
use crate::services::ranking::TrainingConfig;
use crate::services::rules::RuleConfig;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Optional config file looked up in the working directory
/// (`shoe-recommender.toml`, `.json`, ...)
pub const DEFAULT_CONFIG_FILE: &str = "shoe-recommender";

/// Prefix for environment overrides, e.g. `SHOE_REC__SERVICE__TOP_N=10`
pub const ENV_PREFIX: &str = "SHOE_REC";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub weights: InteractionWeights,
    #[serde(default)]
    pub rules: RuleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    /// Directory holding users.json, shoes.json, interactions.json and
    /// care_history.json
    pub data_dir: PathBuf,
    /// JSON-lines recommendation log
    pub log_path: PathBuf,
    pub top_n: usize,
    pub weather: WeatherCondition,
    /// Event to produce event recommendations for, if any
    pub event: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Defaults, then `file`, then environment overrides
    pub fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("service.service_name", "shoe-recommendation-service")?
            .set_default("service.data_dir", "data")?
            .set_default("service.log_path", "data/recommendation_log.jsonl")?
            .set_default("service.top_n", 5)?
            .set_default("service.weather", "sunny")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Parsed event, if one is configured
    pub fn event(&self) -> Result<Option<EventType>> {
        match &self.service.event {
            None => Ok(None),
            Some(raw) => EventType::parse(raw)
                .map(Some)
                .ok_or_else(|| anyhow!("Unknown event type: {}", raw)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.service_name.is_empty() {
            return Err(anyhow!("Service name is required"));
        }

        if self.service.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("Data directory is required"));
        }

        if self.service.top_n == 0 || self.service.top_n > 100 {
            return Err(anyhow!("Top-N must be between 1 and 100"));
        }

        self.training
            .validate()
            .map_err(|e| anyhow!("Invalid training config: {}", e))?;
        self.weights
            .validate()
            .map_err(|e| anyhow!("Invalid interaction weights: {}", e))?;
        self.rules
            .validate()
            .map_err(|e| anyhow!("Invalid rule config: {}", e))?;

        if let Some(event) = self.event()? {
            self.rules
                .events
                .map(event)
                .map_err(|e| anyhow!("Configured event cannot be served: {}", e))?;
        }

        Ok(())
    }
}
