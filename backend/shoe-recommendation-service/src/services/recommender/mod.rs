//! Recommendation pipeline
//!
//! Encode features → build matrix → train → publish snapshot, then serve
//! top-N lists from the published snapshot, recording everything served.

use crate::error::{AppError, Result};
use crate::models::{EventType, ScoredShoe, ShoeId, ShoeType, User, WeatherCondition};
use crate::services::catalog::{Catalog, Dataset};
use crate::services::features::FeatureEncoder;
use crate::services::interactions::{InteractionMatrix, InteractionWeights};
use crate::services::ranking::{HybridModel, ModelHandle, ModelSnapshot, TrainingConfig};
use crate::services::recommendation_log::{RecommendationLog, RecommendationLogStore};
use crate::services::rules::{
    self, CareNotification, CareTip, ReplacementSuggestion, RuleConfig,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// One served shoe with its display attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub shoe_id: ShoeId,
    pub brand: String,
    pub model: String,
    pub shoe_type: ShoeType,
    pub color: String,
    pub score: f32,
}

/// Output of every personalized rule for one weather condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedServices {
    pub condition: WeatherCondition,
    pub notifications: Vec<CareNotification>,
    pub replacements: Vec<ReplacementSuggestion>,
    pub care_tips: Vec<CareTip>,
}

pub struct RecommendationPipeline<S> {
    training: TrainingConfig,
    weights: InteractionWeights,
    rules: RuleConfig,
    models: ModelHandle,
    log: RecommendationLog<S>,
}

impl<S: RecommendationLogStore> RecommendationPipeline<S> {
    pub fn new(
        training: TrainingConfig,
        weights: InteractionWeights,
        rules: RuleConfig,
        store: S,
    ) -> Self {
        Self {
            training,
            weights,
            rules,
            models: ModelHandle::new(),
            log: RecommendationLog::new(store),
        }
    }

    /// Train on `dataset` and publish the result; returns the new generation.
    /// On failure the previously published model stays in place.
    pub fn train(&self, dataset: &Dataset) -> Result<u64> {
        let started = Instant::now();
        let catalog = dataset.catalog();

        let matrix = InteractionMatrix::build(
            catalog.user_ids(),
            catalog.shoe_ids(),
            dataset.interactions(),
            &self.weights,
        );
        let user_features = FeatureEncoder::build_user_features(catalog.users());
        let item_features = FeatureEncoder::build_item_features(catalog.shoes());

        let model = HybridModel::fit(&matrix, &user_features, &item_features, &self.training)?;
        let generation = self.models.publish(model);

        info!(
            generation = generation,
            duration_ms = started.elapsed().as_millis() as u64,
            "Recommendation model ready"
        );
        Ok(generation)
    }

    pub fn models(&self) -> &ModelHandle {
        &self.models
    }

    pub fn log(&self) -> &RecommendationLog<S> {
        &self.log
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    fn snapshot(&self) -> Result<ModelSnapshot> {
        self.models.current().ok_or(AppError::ModelNotTrained)
    }

    /// Top-N shoes for `user`, recorded in the recommendation log.
    ///
    /// Users seen at training time get full scores with purchases excluded;
    /// anyone else falls back to feature-only scores over the catalog.
    pub fn recommend(
        &self,
        catalog: &Catalog,
        user: &User,
        n: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.snapshot()?;
        let model = &snapshot.model;

        let scored = if model.knows_user(user.user_id) {
            model.top_n(user.user_id, n)?
        } else {
            debug!(user_id = user.user_id, "Cold user, using feature-only scores");
            model.top_n_features(user, catalog.shoes(), n)
        };

        self.serve(catalog, user, scored, now)
    }

    /// Top-N shoes of the type mapped to `event`, recorded in the log
    pub fn recommend_for_event(
        &self,
        catalog: &Catalog,
        user: &User,
        event: EventType,
        n: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.snapshot()?;
        let scored =
            rules::recommend_for_event(&snapshot.model, catalog, &self.rules.events, user, event, n)?;

        self.serve(catalog, user, scored, now)
    }

    /// Same as `recommend_for_event`, for a free-form event name
    pub fn recommend_for_event_name(
        &self,
        catalog: &Catalog,
        user: &User,
        event: &str,
        n: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let event = rules::parse_event(event)?;
        self.recommend_for_event(catalog, user, event, n, now)
    }

    /// Care notifications, replacement suggestions and care tips as of `now`
    pub fn personalized_services(
        &self,
        dataset: &Dataset,
        condition: WeatherCondition,
        now: DateTime<Utc>,
    ) -> PersonalizedServices {
        let history = dataset.history(now);
        let catalog = dataset.catalog();

        let services = PersonalizedServices {
            condition,
            notifications: rules::care_notifications(&history, catalog, condition, &self.rules.care),
            replacements: rules::replacement_suggestions(&history, catalog, &self.rules.replacement),
            care_tips: rules::care_tips(&history, catalog, condition, &self.rules.tips),
        };

        info!(
            condition = %condition,
            notifications = services.notifications.len(),
            replacements = services.replacements.len(),
            care_tips = services.care_tips.len(),
            "Personalized services evaluated"
        );
        services
    }

    /// Resolve display attributes and record what was served. Only catalog
    /// users and shoes are logged.
    fn serve(
        &self,
        catalog: &Catalog,
        user: &User,
        scored: Vec<ScoredShoe>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>> {
        let (served, recommendations): (Vec<ScoredShoe>, Vec<Recommendation>) = scored
            .into_iter()
            .filter_map(|s| {
                catalog.shoe(s.shoe_id).map(|shoe| {
                    let recommendation = Recommendation {
                        shoe_id: shoe.shoe_id,
                        brand: shoe.brand.clone(),
                        model: shoe.model.clone(),
                        shoe_type: shoe.shoe_type,
                        color: shoe.color.clone(),
                        score: s.score,
                    };
                    (s, recommendation)
                })
            })
            .unzip();

        if catalog.user(user.user_id).is_some() {
            self.log
                .record_all(user.user_id, &served, now)
                .map_err(|e| AppError::LogStore(e.to_string()))?;
        } else {
            debug!(user_id = user.user_id, "User not in catalog, skipping log");
        }

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareEvent, CareType, Interaction, InteractionType, Shoe};
    use crate::services::recommendation_log::{InMemoryLogStore, LogQuery};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        let users = vec![
            User {
                user_id: 1,
                typical_usage: "running".to_string(),
                preferred_color: "Blue".to_string(),
                age: Some(28),
                gender: None,
            },
            User {
                user_id: 2,
                typical_usage: "formal".to_string(),
                preferred_color: "Black".to_string(),
                age: Some(45),
                gender: None,
            },
        ];
        let shoes = [
            (1, ShoeType::Running, "Mesh"),
            (2, ShoeType::Running, "Synthetic"),
            (3, ShoeType::Dress, "Leather"),
            (4, ShoeType::Dress, "Leather"),
            (5, ShoeType::Sneaker, "Canvas"),
        ]
        .into_iter()
        .map(|(id, shoe_type, material)| Shoe {
            shoe_id: id,
            brand: "Brand".to_string(),
            model: format!("Model {}", id),
            shoe_type,
            color: "Black".to_string(),
            material: material.to_string(),
            size: None,
            care_requirements: None,
        })
        .collect();

        let mut interactions = Vec::new();
        let mut push = |user_id, shoe_id, interaction_type, days_ago: i64| {
            interactions.push(Interaction {
                interaction_id: interactions.len() as u64 + 1,
                user_id,
                shoe_id,
                interaction_type,
                timestamp: now() - Duration::days(days_ago),
                care_mode: None,
                care_frequency: None,
            });
        };
        push(1, 1, InteractionType::Purchase, 200);
        for d in 1..=12 {
            push(1, 1, InteractionType::Wear, d);
        }
        push(1, 2, InteractionType::View, 3);
        push(2, 3, InteractionType::Purchase, 100);
        push(2, 4, InteractionType::Favorite, 2);

        let care = vec![CareEvent {
            care_id: 1,
            user_id: 1,
            shoe_id: 1,
            care_type: CareType::Clean,
            timestamp: now() - Duration::days(45),
        }];

        Dataset::new(Catalog::new(users, shoes), interactions, care)
    }

    fn pipeline() -> RecommendationPipeline<InMemoryLogStore> {
        RecommendationPipeline::new(
            TrainingConfig {
                epochs: 10,
                ..Default::default()
            },
            InteractionWeights::default(),
            RuleConfig::default(),
            InMemoryLogStore::new(),
        )
    }

    #[test]
    fn test_recommend_before_training_fails() {
        let data = dataset();
        let pipeline = pipeline();
        let user = data.catalog().user(1).unwrap().clone();

        let result = pipeline.recommend(data.catalog(), &user, 3, now());
        assert!(matches!(result, Err(AppError::ModelNotTrained)));
    }

    #[test]
    fn test_recommend_logs_served_items() {
        let data = dataset();
        let pipeline = pipeline();
        assert_eq!(pipeline.train(&data).unwrap(), 1);

        let user = data.catalog().user(1).unwrap().clone();
        let served = pipeline.recommend(data.catalog(), &user, 3, now()).unwrap();

        assert_eq!(served.len(), 3);
        assert!(served.iter().all(|r| r.shoe_id != 1));

        let logged = pipeline.log().query(&LogQuery::all().for_user(1)).unwrap();
        assert_eq!(logged.len(), 3);
        assert_eq!(logged[0].shoe_id, served[0].shoe_id);
    }

    #[test]
    fn test_cold_user_falls_back_to_features() {
        let data = dataset();
        let pipeline = pipeline();
        pipeline.train(&data).unwrap();

        let newcomer = User {
            user_id: 77,
            typical_usage: "formal".to_string(),
            preferred_color: "Black".to_string(),
            age: None,
            gender: None,
        };
        let served = pipeline.recommend(data.catalog(), &newcomer, 5, now()).unwrap();
        assert_eq!(served.len(), 5);

        let logged = pipeline.log().query(&LogQuery::all().for_user(77)).unwrap();
        assert!(logged.is_empty());
    }

    #[test]
    fn test_only_catalog_users_are_logged() {
        let data = dataset();
        let pipeline = pipeline();
        pipeline.train(&data).unwrap();

        let outsider = User {
            user_id: 4242,
            typical_usage: "running".to_string(),
            preferred_color: "Blue".to_string(),
            age: None,
            gender: None,
        };
        let served = pipeline.recommend(data.catalog(), &outsider, 3, now()).unwrap();
        let formal = pipeline
            .recommend_for_event(data.catalog(), &outsider, EventType::Formal, 3, now())
            .unwrap();
        assert_eq!(served.len(), 3);
        assert!(!formal.is_empty());
        assert!(pipeline.log().query(&LogQuery::all()).unwrap().is_empty());

        let member = data.catalog().user(2).unwrap().clone();
        let served = pipeline.recommend(data.catalog(), &member, 3, now()).unwrap();
        let logged = pipeline.log().query(&LogQuery::all()).unwrap();
        assert_eq!(logged.len(), served.len());
        assert!(logged
            .iter()
            .all(|e| e.user_id == 2 && data.catalog().shoe(e.shoe_id).is_some()));
    }

    #[test]
    fn test_event_recommendations_respect_type() {
        let data = dataset();
        let pipeline = pipeline();
        pipeline.train(&data).unwrap();
        let user = data.catalog().user(1).unwrap().clone();

        let formal = pipeline
            .recommend_for_event(data.catalog(), &user, EventType::Formal, 5, now())
            .unwrap();
        assert!(!formal.is_empty());
        assert!(formal.iter().all(|r| r.shoe_type == ShoeType::Dress));

        let party = pipeline.recommend_for_event_name(data.catalog(), &user, "party", 5, now());
        assert!(matches!(party, Err(AppError::Rule(_))));
    }

    #[test]
    fn test_personalized_services() {
        let data = dataset();
        let pipeline = pipeline();

        let rainy = pipeline.personalized_services(&data, WeatherCondition::Rainy, now());
        assert_eq!(rainy.notifications.len(), 1);
        assert_eq!(rainy.replacements.len(), 1);
        assert_eq!(rainy.replacements[0].shoe_id, 1);
        assert_eq!(rainy.care_tips.len(), 1);

        let sunny = pipeline.personalized_services(&data, WeatherCondition::Sunny, now());
        assert!(sunny.notifications.is_empty());
        assert_eq!(sunny.replacements, rainy.replacements);
    }
}
