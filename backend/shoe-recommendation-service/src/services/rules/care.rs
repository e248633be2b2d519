//! Care notifications: remind users to clean shoes that are used heavily,
//! have not been cared for in a while, and face wet weather.

use super::HistorySnapshot;
use crate::models::{Shoe, ShoeId, UserId, WeatherCondition};
use crate::services::catalog::Catalog;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CareRuleConfig {
    /// Days since last care that must be exceeded
    pub care_interval_days: i64,
    pub activity_window_days: i64,
    /// Interactions inside the window that must be exceeded
    pub activity_threshold: usize,
    pub triggering_conditions: Vec<WeatherCondition>,
}

impl Default for CareRuleConfig {
    fn default() -> Self {
        Self {
            care_interval_days: 30,
            activity_window_days: 30,
            activity_threshold: 10,
            triggering_conditions: vec![WeatherCondition::Rainy, WeatherCondition::Humid],
        }
    }
}

impl CareRuleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.care_interval_days <= 0 {
            return Err(format!(
                "Care interval must be positive, got {} days",
                self.care_interval_days
            ));
        }
        if self.activity_window_days <= 0 {
            return Err(format!(
                "Activity window must be positive, got {} days",
                self.activity_window_days
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareNotification {
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub condition: WeatherCondition,
    pub days_since_care: i64,
    pub recent_interactions: usize,
    pub message: String,
}

/// Evaluate the care rule for one (user, shoe) pair
pub fn care_notification(
    history: &HistorySnapshot<'_>,
    user_id: UserId,
    shoe: &Shoe,
    condition: WeatherCondition,
    config: &CareRuleConfig,
) -> Option<CareNotification> {
    if !config.triggering_conditions.contains(&condition) {
        return None;
    }

    let days_since_care = history.days_since_last_care(user_id, shoe.shoe_id)?;
    if days_since_care <= config.care_interval_days {
        return None;
    }

    let recent_interactions = history.interaction_count(
        user_id,
        shoe.shoe_id,
        Duration::days(config.activity_window_days),
    );
    if recent_interactions <= config.activity_threshold {
        return None;
    }

    Some(CareNotification {
        user_id,
        shoe_id: shoe.shoe_id,
        condition,
        days_since_care,
        recent_interactions,
        message: format!(
            "Time to clean your {} due to frequent use and {} conditions!",
            shoe.display_name(),
            condition.to_string().to_lowercase()
        ),
    })
}

/// Evaluate the care rule across every pair in `history`, ordered by
/// (user, shoe)
pub fn care_notifications(
    history: &HistorySnapshot<'_>,
    catalog: &Catalog,
    condition: WeatherCondition,
    config: &CareRuleConfig,
) -> Vec<CareNotification> {
    let notifications: Vec<CareNotification> = history
        .cared_pairs()
        .into_iter()
        .filter_map(|(user_id, shoe_id)| {
            let Some(shoe) = catalog.shoe(shoe_id) else {
                warn!(shoe_id = shoe_id, "Care history references unknown shoe");
                return None;
            };
            care_notification(history, user_id, shoe, condition, config)
        })
        .collect();

    debug!(
        count = notifications.len(),
        condition = %condition,
        "Evaluated care notifications"
    );
    notifications
}
