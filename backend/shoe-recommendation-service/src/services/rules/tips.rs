//! Care tips tailored to the user's lifestyle and the current weather.

use super::HistorySnapshot;
use crate::models::{Shoe, ShoeId, ShoeType, User, UserId, WeatherCondition};
use crate::services::catalog::Catalog;
use crate::utils::normalize_token;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CareTipConfig {
    pub stale_after_days: i64,
    pub humid_threshold_pct: u8,
    pub cold_threshold_c: i8,
}

impl Default for CareTipConfig {
    fn default() -> Self {
        Self {
            stale_after_days: 15,
            humid_threshold_pct: 70,
            cold_threshold_c: 5,
        }
    }
}

impl CareTipConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.stale_after_days < 0 {
            return Err(format!(
                "Stale-care threshold must be non-negative, got {} days",
                self.stale_after_days
            ));
        }
        if self.humid_threshold_pct > 100 {
            return Err(format!(
                "Humidity threshold must be a percentage, got {}",
                self.humid_threshold_pct
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareTip {
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub message: String,
}

/// Tip for one (user, shoe) pair whose last care is older than the stale
/// threshold. Shoes never cared for get no tip.
pub fn care_tip(
    history: &HistorySnapshot<'_>,
    user: &User,
    shoe: &Shoe,
    condition: WeatherCondition,
    config: &CareTipConfig,
) -> Option<CareTip> {
    let days_since_care = history.days_since_last_care(user.user_id, shoe.shoe_id)?;
    if days_since_care <= config.stale_after_days {
        return None;
    }

    let lifestyle = normalize_token(&user.typical_usage);
    let material = normalize_token(&shoe.material);
    let name = shoe.display_name();

    let message = match (lifestyle.as_deref(), shoe.shoe_type) {
        (Some("running"), ShoeType::Running) => {
            if condition.humidity_pct() >= config.humid_threshold_pct {
                format!("For your {}, apply a waterproof spray to protect against high humidity.", name)
            } else {
                format!("Use a breathable mesh cleaner for your {} to maintain ventilation.", name)
            }
        }
        (Some("formal"), _) if material.as_deref() == Some("leather") => {
            format!("Polish your {} weekly to maintain shine for formal occasions.", name)
        }
        _ if condition.temperature_c() <= config.cold_threshold_c => {
            format!("Store your {} in a dry place to prevent cold-weather cracking.", name)
        }
        _ => return None,
    };

    Some(CareTip {
        user_id: user.user_id,
        shoe_id: shoe.shoe_id,
        message,
    })
}

/// Tips for every cared-for pair, ordered by (user, shoe)
pub fn care_tips(
    history: &HistorySnapshot<'_>,
    catalog: &Catalog,
    condition: WeatherCondition,
    config: &CareTipConfig,
) -> Vec<CareTip> {
    let tips: Vec<CareTip> = history
        .cared_pairs()
        .into_iter()
        .filter_map(|(user_id, shoe_id)| {
            let (Some(user), Some(shoe)) = (catalog.user(user_id), catalog.shoe(shoe_id)) else {
                warn!(
                    user_id = user_id,
                    shoe_id = shoe_id,
                    "Care history references unknown user or shoe"
                );
                return None;
            };
            care_tip(history, user, shoe, condition, config)
        })
        .collect();

    debug!(count = tips.len(), condition = %condition, "Generated care tips");
    tips
}
