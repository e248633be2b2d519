//! Event-based recommendations: map an occasion to a shoe type and rank only
//! shoes of that type.

use super::RuleError;
use crate::models::{EventType, ScoredShoe, ShoeType, User};
use crate::services::catalog::Catalog;
use crate::services::ranking::HybridModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Occasion → target shoe type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EventMapping(BTreeMap<EventType, ShoeType>);

impl Default for EventMapping {
    fn default() -> Self {
        Self(BTreeMap::from([
            (EventType::Formal, ShoeType::Dress),
            (EventType::Workout, ShoeType::Running),
            (EventType::Casual, ShoeType::Sneaker),
            (EventType::Sports, ShoeType::Running),
            (EventType::Wedding, ShoeType::Dress),
        ]))
    }
}

impl EventMapping {
    pub fn with(mut self, event: EventType, shoe_type: ShoeType) -> Self {
        self.0.insert(event, shoe_type);
        self
    }

    pub fn map(&self, event: EventType) -> Result<ShoeType, RuleError> {
        self.0
            .get(&event)
            .copied()
            .ok_or_else(|| RuleError::UnmappedEvent(event.to_string()))
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.0.iter().find(|(_, target)| **target == ShoeType::Other) {
            Some((event, _)) => Err(format!("Event {} cannot map to shoe type 'other'", event)),
            None => Ok(()),
        }
    }
}

/// Parse a free-form event name; unknown names are unmapped events
pub fn parse_event(name: &str) -> Result<EventType, RuleError> {
    EventType::parse(name).ok_or_else(|| RuleError::UnmappedEvent(name.trim().to_string()))
}

/// Top-N shoes of the event's mapped type.
///
/// Users known to the model are ranked with their full representation and
/// purchased shoes are excluded; unknown users fall back to feature scores.
pub fn recommend_for_event(
    model: &HybridModel,
    catalog: &Catalog,
    mapping: &EventMapping,
    user: &User,
    event: EventType,
    n: usize,
) -> Result<Vec<ScoredShoe>, RuleError> {
    let target = mapping.map(event)?;
    let is_target = |shoe_id| {
        catalog
            .shoe(shoe_id)
            .is_some_and(|shoe| shoe.shoe_type == target)
    };

    let ranked = if model.knows_user(user.user_id) {
        model.top_n_where(user.user_id, n, is_target)?
    } else {
        let candidates = catalog.shoes().filter(|shoe| shoe.shoe_type == target);
        model.top_n_features(user, candidates, n)
    };

    debug!(
        user_id = user.user_id,
        event = %event,
        shoe_type = %target,
        results = ranked.len(),
        "Ranked event recommendations"
    );
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let mapping = EventMapping::default();

        assert_eq!(mapping.map(EventType::Formal).unwrap(), ShoeType::Dress);
        assert_eq!(mapping.map(EventType::Workout).unwrap(), ShoeType::Running);
        assert_eq!(mapping.map(EventType::Casual).unwrap(), ShoeType::Sneaker);
        assert_eq!(mapping.map(EventType::Sports).unwrap(), ShoeType::Running);
        assert_eq!(mapping.map(EventType::Wedding).unwrap(), ShoeType::Dress);
    }

    #[test]
    fn test_unmapped_events_are_errors() {
        let mapping = EventMapping::default();

        assert!(matches!(
            mapping.map(EventType::Party),
            Err(RuleError::UnmappedEvent(name)) if name == "Party"
        ));
        assert!(matches!(
            parse_event("  gala "),
            Err(RuleError::UnmappedEvent(name)) if name == "gala"
        ));
        assert_eq!(mapping.map(parse_event("FORMAL").unwrap()).unwrap(), ShoeType::Dress);
    }

    #[test]
    fn test_mapping_is_configurable() {
        let mapping = EventMapping::default().with(EventType::Party, ShoeType::Sneaker);
        assert_eq!(mapping.map(EventType::Party).unwrap(), ShoeType::Sneaker);

        let invalid = EventMapping::default().with(EventType::Party, ShoeType::Other);
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_mapping_deserializes_from_table() {
        let mapping: EventMapping = serde_json::from_str(r#"{"formal": "sneaker"}"#).unwrap();
        assert_eq!(mapping.map(EventType::Formal).unwrap(), ShoeType::Sneaker);
        assert!(mapping.map(EventType::Workout).is_err());
    }
}
