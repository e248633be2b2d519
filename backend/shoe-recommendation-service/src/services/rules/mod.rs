/// Personalized Rule Engine
///
/// Deterministic, threshold-based rules evaluated over a read-only history
/// snapshot. Rules never mutate history and never fail on a "no trigger"
/// outcome: absence of output is the normal negative case.
///
/// # Rules
/// - **Care**: stale care + heavy recent use + wet weather → cleaning reminder
/// - **Replacement**: usage beyond the type's lifespan + heavy wear → suggestion
/// - **Events**: occasion → shoe type, restricting the model's candidates
/// - **Tips**: lifestyle and weather aware care advice for stale shoes
pub mod care;
pub mod events;
pub mod replacement;
pub mod tips;

pub use care::{care_notification, care_notifications, CareNotification, CareRuleConfig};
pub use events::{parse_event, recommend_for_event, EventMapping};
pub use replacement::{
    replacement_suggestion, replacement_suggestions, LifespanTable, ReplacementRuleConfig,
    ReplacementSuggestion,
};
pub use tips::{care_tip, care_tips, CareTip, CareTipConfig};

use crate::models::{CareEvent, Interaction, InteractionType, ShoeId, UserId};
use crate::services::ranking::RankingError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("No shoe type is mapped for event '{0}'")]
    UnmappedEvent(String),

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// All rule thresholds and category tables
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    pub care: CareRuleConfig,
    pub replacement: ReplacementRuleConfig,
    pub tips: CareTipConfig,
    pub events: EventMapping,
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.care.validate()?;
        self.replacement.validate()?;
        self.tips.validate()?;
        self.events.validate()?;
        Ok(())
    }
}

/// Read-only view of interaction and care history as of one instant.
///
/// Records timestamped after `as_of` are invisible to every query.
#[derive(Debug, Clone, Copy)]
pub struct HistorySnapshot<'a> {
    as_of: DateTime<Utc>,
    interactions: &'a [Interaction],
    care_events: &'a [CareEvent],
}

impl<'a> HistorySnapshot<'a> {
    pub fn new(
        as_of: DateTime<Utc>,
        interactions: &'a [Interaction],
        care_events: &'a [CareEvent],
    ) -> Self {
        Self {
            as_of,
            interactions,
            care_events,
        }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    fn interactions_for(
        &self,
        user_id: UserId,
        shoe_id: ShoeId,
    ) -> impl Iterator<Item = &'a Interaction> + '_ {
        self.interactions.iter().filter(move |i| {
            i.user_id == user_id && i.shoe_id == shoe_id && i.timestamp <= self.as_of
        })
    }

    fn care_for(&self, user_id: UserId, shoe_id: ShoeId) -> impl Iterator<Item = &'a CareEvent> + '_ {
        self.care_events.iter().filter(move |c| {
            c.user_id == user_id && c.shoe_id == shoe_id && c.timestamp <= self.as_of
        })
    }

    /// Most recent care event for the pair
    pub fn last_care(&self, user_id: UserId, shoe_id: ShoeId) -> Option<DateTime<Utc>> {
        self.care_for(user_id, shoe_id).map(|c| c.timestamp).max()
    }

    /// Whole days since the last care event; `None` when never cared for
    pub fn days_since_last_care(&self, user_id: UserId, shoe_id: ShoeId) -> Option<i64> {
        self.last_care(user_id, shoe_id)
            .map(|last| (self.as_of - last).num_days())
    }

    /// Interactions of any type inside `(as_of - window, as_of]`
    pub fn interaction_count(&self, user_id: UserId, shoe_id: ShoeId, window: Duration) -> usize {
        let since = self.as_of - window;
        self.interactions_for(user_id, shoe_id)
            .filter(|i| i.timestamp > since)
            .count()
    }

    pub fn first_purchase(&self, user_id: UserId, shoe_id: ShoeId) -> Option<DateTime<Utc>> {
        self.interactions_for(user_id, shoe_id)
            .filter(|i| i.interaction_type == InteractionType::Purchase)
            .map(|i| i.timestamp)
            .min()
    }

    /// Number of `wear` interactions for the pair
    pub fn wear_count(&self, user_id: UserId, shoe_id: ShoeId) -> usize {
        self.interactions_for(user_id, shoe_id)
            .filter(|i| i.interaction_type == InteractionType::Wear)
            .count()
    }

    /// Every (user, shoe) pair with visible interaction or care history,
    /// in ascending order
    pub fn pairs(&self) -> BTreeSet<(UserId, ShoeId)> {
        let interacted = self
            .interactions
            .iter()
            .filter(|i| i.timestamp <= self.as_of)
            .map(|i| (i.user_id, i.shoe_id));
        interacted.chain(self.cared_pairs()).collect()
    }

    /// Pairs with at least one visible care event, in ascending order
    pub fn cared_pairs(&self) -> BTreeSet<(UserId, ShoeId)> {
        self.care_events
            .iter()
            .filter(|c| c.timestamp <= self.as_of)
            .map(|c| (c.user_id, c.shoe_id))
            .collect()
    }
}
