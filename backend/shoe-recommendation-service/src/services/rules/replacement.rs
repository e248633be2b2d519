//! Replacement suggestions for shoes worn past their expected lifespan.

use super::HistorySnapshot;
use crate::models::{Shoe, ShoeId, ShoeType, UserId};
use crate::services::catalog::Catalog;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Expected lifespan per shoe type, in months
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LifespanTable {
    pub running_months: u32,
    pub sneaker_months: u32,
    pub dress_months: u32,
}

impl Default for LifespanTable {
    fn default() -> Self {
        Self {
            running_months: 6,
            sneaker_months: 12,
            dress_months: 18,
        }
    }
}

impl LifespanTable {
    /// `None` for `Other`: no lifespan, no suggestion
    pub fn months_for(&self, shoe_type: ShoeType) -> Option<u32> {
        match shoe_type {
            ShoeType::Running => Some(self.running_months),
            ShoeType::Sneaker => Some(self.sneaker_months),
            ShoeType::Dress => Some(self.dress_months),
            ShoeType::Other => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplacementRuleConfig {
    pub lifespans: LifespanTable,
    /// Wear interactions that must be exceeded
    pub wear_threshold: usize,
    pub days_per_month: i64,
}

impl Default for ReplacementRuleConfig {
    fn default() -> Self {
        Self {
            lifespans: LifespanTable::default(),
            wear_threshold: 10,
            days_per_month: 30,
        }
    }
}

impl ReplacementRuleConfig {
    pub fn validate(&self) -> Result<(), String> {
        let table = &self.lifespans;
        if table.running_months == 0 || table.sneaker_months == 0 || table.dress_months == 0 {
            return Err(format!(
                "Lifespans must be positive, got running={} sneaker={} dress={}",
                table.running_months, table.sneaker_months, table.dress_months
            ));
        }
        if self.days_per_month <= 0 {
            return Err(format!(
                "Days per month must be positive, got {}",
                self.days_per_month
            ));
        }
        Ok(())
    }

    fn lifespan_days(&self, shoe_type: ShoeType) -> Option<i64> {
        self.lifespans
            .months_for(shoe_type)
            .map(|months| i64::from(months) * self.days_per_month)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplacementSuggestion {
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub usage_days: i64,
    pub lifespan_days: i64,
    pub wear_count: usize,
    pub message: String,
}

/// Evaluate the replacement rule for one (user, shoe) pair.
///
/// Usage runs from the user's first purchase of the shoe; without a purchase
/// or for shoes of type `Other` the rule does not fire.
pub fn replacement_suggestion(
    history: &HistorySnapshot<'_>,
    user_id: UserId,
    shoe: &Shoe,
    config: &ReplacementRuleConfig,
) -> Option<ReplacementSuggestion> {
    let lifespan_days = config.lifespan_days(shoe.shoe_type)?;
    let first_purchase = history.first_purchase(user_id, shoe.shoe_id)?;

    let usage_days = (history.as_of() - first_purchase).num_days();
    if usage_days <= lifespan_days {
        return None;
    }

    let wear_count = history.wear_count(user_id, shoe.shoe_id);
    if wear_count <= config.wear_threshold {
        return None;
    }

    Some(ReplacementSuggestion {
        user_id,
        shoe_id: shoe.shoe_id,
        usage_days,
        lifespan_days,
        wear_count,
        message: format!(
            "Consider replacing your {} due to extensive use.",
            shoe.display_name()
        ),
    })
}

/// Evaluate the replacement rule across every pair in `history`, ordered by
/// (user, shoe)
pub fn replacement_suggestions(
    history: &HistorySnapshot<'_>,
    catalog: &Catalog,
    config: &ReplacementRuleConfig,
) -> Vec<ReplacementSuggestion> {
    let suggestions: Vec<ReplacementSuggestion> = history
        .pairs()
        .into_iter()
        .filter_map(|(user_id, shoe_id)| {
            let Some(shoe) = catalog.shoe(shoe_id) else {
                warn!(shoe_id = shoe_id, "History references unknown shoe");
                return None;
            };
            replacement_suggestion(history, user_id, shoe, config)
        })
        .collect();

    debug!(count = suggestions.len(), "Evaluated replacement suggestions");
    suggestions
}
