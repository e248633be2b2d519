//! Hybrid Latent-Factor Model
//!
//! Each user and item owns an identity embedding; each feature token owns an
//! embedding as well. A representation is the sum of an entity's identity
//! embedding and its token embeddings, so entities without interactions still
//! carry signal through their features.
//!
//! Score formula:
//!   score(u, i) = <repr(u), repr(i)> + bias(u) + bias(i)
//!
//! Training minimizes logistic loss with plain SGD: every observed cell is a
//! positive weighted by `ln(1 + weight)`, and each positive is paired with
//! uniformly sampled unobserved items as negatives.

use super::{EntityKind, RankingError, Result};
use crate::models::{rank_scored, ScoredShoe, Shoe, ShoeId, User, UserId};
use crate::services::features::{EntityFeatures, FeatureEncoder, FeatureToken, FeatureVocabulary};
use crate::services::interactions::InteractionMatrix;
use crate::utils::{logistic_loss, sigmoid};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, info};

/// Retries before giving up on finding an unobserved item for a user
const NEGATIVE_SAMPLE_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub latent_dim: usize,
    pub learning_rate: f32,
    /// L2 penalty applied to every embedding touched by an update
    pub l2_penalty: f32,
    pub negatives_per_positive: usize,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            latent_dim: 8,
            learning_rate: 0.05,
            l2_penalty: 1e-4,
            negatives_per_positive: 1,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.epochs == 0 {
            return Err("Epochs must be greater than 0".to_string());
        }
        if self.latent_dim == 0 {
            return Err("Latent dimension must be greater than 0".to_string());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(format!(
                "Learning rate must be a positive number, got {}",
                self.learning_rate
            ));
        }
        if !self.l2_penalty.is_finite() || self.l2_penalty < 0.0 {
            return Err(format!(
                "L2 penalty must be non-negative, got {}",
                self.l2_penalty
            ));
        }
        if self.negatives_per_positive == 0 {
            return Err("At least one negative per positive is required".to_string());
        }
        Ok(())
    }
}

/// Embedding table plus per-row bias. Rows `0..n_entities` are identities,
/// the rest are feature tokens offset by `n_entities`.
#[derive(Debug, Clone)]
struct Parameters {
    embeddings: Array2<f32>,
    biases: Array1<f32>,
}

impl Parameters {
    fn init(rows: usize, dim: usize, rng: &mut StdRng) -> Self {
        let scale = 1.0 / dim as f32;
        Self {
            embeddings: Array2::from_shape_fn((rows, dim), |_| (rng.gen::<f32>() - 0.5) * scale),
            biases: Array1::zeros(rows),
        }
    }

    fn representation(&self, features: &[usize]) -> (Array1<f32>, f32) {
        let mut repr = Array1::zeros(self.embeddings.ncols());
        let mut bias = 0.0;
        for &f in features {
            repr += &self.embeddings.row(f);
            bias += self.biases[f];
        }
        (repr, bias)
    }

    fn apply_gradient(&mut self, features: &[usize], other: &Array1<f32>, grad: f32, lr: f32, l2: f32) {
        for &f in features {
            self.embeddings
                .row_mut(f)
                .zip_mut_with(other, |e, &x| *e -= lr * (grad * x + l2 * *e));
            self.biases[f] -= lr * grad;
        }
    }
}

struct Trainer<'a> {
    users: Parameters,
    items: Parameters,
    user_rows: &'a [Vec<usize>],
    item_rows: &'a [Vec<usize>],
    learning_rate: f32,
    l2_penalty: f32,
}

impl Trainer<'_> {
    /// One SGD update on a (user, item) pair; returns the weighted loss
    /// measured before the update.
    fn step(&mut self, user_idx: usize, item_idx: usize, label: f32, weight: f32) -> f32 {
        let (user_rows, item_rows) = (self.user_rows, self.item_rows);
        let user_row = &user_rows[user_idx];
        let item_row = &item_rows[item_idx];

        let (user_repr, user_bias) = self.users.representation(user_row);
        let (item_repr, item_bias) = self.items.representation(item_row);
        let logit = user_repr.dot(&item_repr) + user_bias + item_bias;
        let grad = weight * (sigmoid(logit) - label);

        self.users
            .apply_gradient(user_row, &item_repr, grad, self.learning_rate, self.l2_penalty);
        self.items
            .apply_gradient(item_row, &user_repr, grad, self.learning_rate, self.l2_penalty);

        weight * logistic_loss(logit, label)
    }
}

/// Immutable trained model
#[derive(Debug, Clone)]
pub struct HybridModel {
    config: TrainingConfig,
    user_ids: Vec<UserId>,
    item_ids: Vec<ShoeId>,
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<ShoeId, usize>,
    user_vocabulary: FeatureVocabulary,
    item_vocabulary: FeatureVocabulary,
    user_params: Parameters,
    item_params: Parameters,
    // Cached sums over identity + feature rows
    user_reprs: Array2<f32>,
    item_reprs: Array2<f32>,
    user_biases: Vec<f32>,
    item_biases: Vec<f32>,
    purchased: Vec<BTreeSet<usize>>,
    epoch_losses: Vec<f32>,
    trained_at: DateTime<Utc>,
}

impl HybridModel {
    /// Train a model over the interaction matrix and encoded features.
    ///
    /// Fails with `RankingError::Training` when the matrix has no observed
    /// cells, when either vocabulary is empty, when hyperparameters are
    /// invalid, or when the loss diverges. No partial model is returned.
    pub fn fit(
        matrix: &InteractionMatrix,
        user_features: &EntityFeatures,
        item_features: &EntityFeatures,
        config: &TrainingConfig,
    ) -> Result<Self> {
        config.validate().map_err(RankingError::Training)?;

        if matrix.is_empty() {
            return Err(RankingError::Training(
                "interaction matrix has no observed entries".to_string(),
            ));
        }
        if user_features.vocabulary().is_empty() {
            return Err(RankingError::Training(
                "user feature vocabulary is empty".to_string(),
            ));
        }
        if item_features.vocabulary().is_empty() {
            return Err(RankingError::Training(
                "item feature vocabulary is empty".to_string(),
            ));
        }

        let started = Instant::now();
        let (n_users, n_items) = matrix.shape();
        let user_rows = feature_rows(matrix.user_ids(), user_features);
        let item_rows = feature_rows(matrix.item_ids(), item_features);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let users = Parameters::init(
            n_users + user_features.vocabulary().len(),
            config.latent_dim,
            &mut rng,
        );
        let items = Parameters::init(
            n_items + item_features.vocabulary().len(),
            config.latent_dim,
            &mut rng,
        );

        let mut trainer = Trainer {
            users,
            items,
            user_rows: &user_rows,
            item_rows: &item_rows,
            learning_rate: config.learning_rate,
            l2_penalty: config.l2_penalty,
        };

        let positives: Vec<(usize, usize, f32)> = matrix
            .entries()
            .map(|(u, i, weight)| (u, i, weight.ln_1p()))
            .collect();
        let mut order: Vec<usize> = (0..positives.len()).collect();
        let mut epoch_losses = Vec::with_capacity(config.epochs);

        info!(
            users = n_users,
            items = n_items,
            positives = positives.len(),
            latent_dim = config.latent_dim,
            epochs = config.epochs,
            "Starting hybrid model training"
        );

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let mut loss_sum = 0.0f64;
            let mut samples = 0usize;

            for &k in &order {
                let (u, i, weight) = positives[k];
                loss_sum += f64::from(trainer.step(u, i, 1.0, weight));
                samples += 1;

                let Some(row) = matrix.row(u) else {
                    continue;
                };
                for _ in 0..config.negatives_per_positive {
                    if let Some(j) = sample_negative(&mut rng, row, n_items) {
                        loss_sum += f64::from(trainer.step(u, j, 0.0, 1.0));
                        samples += 1;
                    }
                }
            }

            let mean_loss = (loss_sum / samples.max(1) as f64) as f32;
            if !mean_loss.is_finite() {
                return Err(RankingError::Training(format!(
                    "loss diverged at epoch {}",
                    epoch + 1
                )));
            }
            debug!(epoch = epoch + 1, loss = mean_loss, "Training epoch complete");
            epoch_losses.push(mean_loss);
        }

        let Trainer { users, items, .. } = trainer;
        let (user_reprs, user_biases) = cache_representations(&users, &user_rows);
        let (item_reprs, item_biases) = cache_representations(&items, &item_rows);
        let purchased = (0..n_users)
            .map(|u| matrix.purchased(u).cloned().unwrap_or_default())
            .collect();

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            final_loss = epoch_losses.last().copied().unwrap_or_default(),
            "Hybrid model training completed"
        );

        Ok(Self {
            config: config.clone(),
            user_ids: matrix.user_ids().to_vec(),
            item_ids: matrix.item_ids().to_vec(),
            user_index: index_of(matrix.user_ids()),
            item_index: index_of(matrix.item_ids()),
            user_vocabulary: user_features.vocabulary().clone(),
            item_vocabulary: item_features.vocabulary().clone(),
            user_params: users,
            item_params: items,
            user_reprs,
            item_reprs,
            user_biases,
            item_biases,
            purchased,
            epoch_losses,
            trained_at: Utc::now(),
        })
    }

    /// Compatibility score for a (user, shoe) pair seen at training time
    pub fn score(&self, user_id: UserId, shoe_id: ShoeId) -> Result<f32> {
        let u = self.user_idx(user_id)?;
        let i = self.item_idx(shoe_id)?;
        Ok(self.score_indices(u, i))
    }

    /// Feature-only fallback for cold users or items.
    ///
    /// Identity embeddings contribute only when the entity was seen at
    /// training time; tokens outside the vocabulary are dropped.
    pub fn score_features(&self, user: &User, shoe: &Shoe) -> f32 {
        let user_row = cold_row(
            self.user_index.get(&user.user_id).copied(),
            self.user_ids.len(),
            &self.user_vocabulary,
            &FeatureEncoder::user_tokens(user),
        );
        let item_row = cold_row(
            self.item_index.get(&shoe.shoe_id).copied(),
            self.item_ids.len(),
            &self.item_vocabulary,
            &FeatureEncoder::shoe_tokens(shoe),
        );

        let (user_repr, user_bias) = self.user_params.representation(&user_row);
        let (item_repr, item_bias) = self.item_params.representation(&item_row);
        user_repr.dot(&item_repr) + user_bias + item_bias
    }

    /// Top-N unpurchased items for a known user
    pub fn top_n(&self, user_id: UserId, n: usize) -> Result<Vec<ScoredShoe>> {
        self.top_n_where(user_id, n, |_| true)
    }

    /// Top-N over the items accepted by `filter`
    pub fn top_n_where<F>(&self, user_id: UserId, n: usize, filter: F) -> Result<Vec<ScoredShoe>>
    where
        F: Fn(ShoeId) -> bool,
    {
        let u = self.user_idx(user_id)?;
        let purchased = &self.purchased[u];

        let mut scored: Vec<ScoredShoe> = self
            .item_ids
            .iter()
            .enumerate()
            .filter(|(i, shoe_id)| !purchased.contains(i) && filter(**shoe_id))
            .map(|(i, shoe_id)| ScoredShoe {
                shoe_id: *shoe_id,
                score: self.score_indices(u, i),
            })
            .collect();

        rank_scored(&mut scored);
        scored.truncate(n);
        Ok(scored)
    }

    /// Feature-only top-N over `shoes`, for users unknown to the model.
    /// Purchases are excluded when the user was seen at training time.
    pub fn top_n_features<'a, I>(&self, user: &User, shoes: I, n: usize) -> Vec<ScoredShoe>
    where
        I: IntoIterator<Item = &'a Shoe>,
    {
        let purchased = self
            .user_index
            .get(&user.user_id)
            .and_then(|&u| self.purchased.get(u));

        let mut scored: Vec<ScoredShoe> = shoes
            .into_iter()
            .filter(|shoe| {
                let bought = purchased
                    .zip(self.item_index.get(&shoe.shoe_id))
                    .is_some_and(|(set, i)| set.contains(i));
                !bought
            })
            .map(|shoe| ScoredShoe {
                shoe_id: shoe.shoe_id,
                score: self.score_features(user, shoe),
            })
            .collect();

        rank_scored(&mut scored);
        scored.truncate(n);
        scored
    }

    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    pub fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }

    /// Mean training loss per epoch
    pub fn epoch_losses(&self) -> &[f32] {
        &self.epoch_losses
    }

    pub fn vocabulary_version(&self) -> u32 {
        self.item_vocabulary.version()
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    fn score_indices(&self, u: usize, i: usize) -> f32 {
        self.user_reprs.row(u).dot(&self.item_reprs.row(i)) + self.user_biases[u] + self.item_biases[i]
    }

    fn user_idx(&self, user_id: UserId) -> Result<usize> {
        self.user_index
            .get(&user_id)
            .copied()
            .ok_or(RankingError::UnknownEntity {
                kind: EntityKind::User,
                id: user_id,
            })
    }

    fn item_idx(&self, shoe_id: ShoeId) -> Result<usize> {
        self.item_index
            .get(&shoe_id)
            .copied()
            .ok_or(RankingError::UnknownEntity {
                kind: EntityKind::Shoe,
                id: shoe_id,
            })
    }
}

/// Identity row followed by feature rows offset past all identities
fn feature_rows(ids: &[u64], features: &EntityFeatures) -> Vec<Vec<usize>> {
    let offset = ids.len();
    ids.iter()
        .enumerate()
        .map(|(idx, id)| {
            let mut row = Vec::with_capacity(1 + features.features_of(*id).len());
            row.push(idx);
            row.extend(features.features_of(*id).iter().map(|f| offset + f));
            row
        })
        .collect()
}

fn cold_row(
    identity: Option<usize>,
    offset: usize,
    vocabulary: &FeatureVocabulary,
    tokens: &[FeatureToken],
) -> Vec<usize> {
    identity
        .into_iter()
        .chain(vocabulary.encode(tokens).into_iter().map(|f| offset + f))
        .collect()
}

fn cache_representations(params: &Parameters, rows: &[Vec<usize>]) -> (Array2<f32>, Vec<f32>) {
    let mut reprs = Array2::zeros((rows.len(), params.embeddings.ncols()));
    let mut biases = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let (repr, bias) = params.representation(row);
        reprs.row_mut(r).assign(&repr);
        biases.push(bias);
    }
    (reprs, biases)
}

fn index_of(ids: &[u64]) -> HashMap<u64, usize> {
    ids.iter().enumerate().map(|(i, id)| (*id, i)).collect()
}

fn sample_negative(rng: &mut StdRng, row: &BTreeMap<usize, f32>, n_items: usize) -> Option<usize> {
    if row.len() >= n_items {
        return None;
    }
    (0..NEGATIVE_SAMPLE_ATTEMPTS)
        .map(|_| rng.gen_range(0..n_items))
        .find(|j| !row.contains_key(j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interaction, InteractionType, ShoeType};
    use crate::services::interactions::InteractionWeights;
    use chrono::{Duration, TimeZone};

    struct Fixture {
        users: Vec<User>,
        shoes: Vec<Shoe>,
        interactions: Vec<Interaction>,
    }

    fn user(id: UserId, usage: &str) -> User {
        User {
            user_id: id,
            typical_usage: usage.to_string(),
            preferred_color: "Black".to_string(),
            age: Some(30),
            gender: None,
        }
    }

    fn shoe(id: ShoeId, shoe_type: ShoeType) -> Shoe {
        Shoe {
            shoe_id: id,
            brand: "Acme".to_string(),
            model: format!("Model {}", id),
            shoe_type,
            color: "Black".to_string(),
            material: "Synthetic".to_string(),
            size: Some(42.0),
            care_requirements: None,
        }
    }

    /// Users 1-4 run and interact with running shoes 1-5; users 5-8 dress
    /// formally and interact with dress shoes 6-10. Shoes 11 (running) and
    /// 12 (dress) have no interactions at all.
    fn fixture() -> Fixture {
        let users = (1..=8)
            .map(|id| user(id, if id <= 4 { "running" } else { "formal" }))
            .collect();
        let shoes = (1..=12)
            .map(|id| {
                let t = if id <= 5 || id == 11 { ShoeType::Running } else { ShoeType::Dress };
                shoe(id, t)
            })
            .collect();

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut interactions = Vec::new();
        let mut next_id = 1;
        for u in 1..=8u64 {
            let range = if u <= 4 { 1..=5u64 } else { 6..=10u64 };
            for s in range {
                let kind = if s % 5 == u % 5 {
                    InteractionType::Purchase
                } else {
                    InteractionType::View
                };
                interactions.push(Interaction {
                    interaction_id: next_id,
                    user_id: u,
                    shoe_id: s,
                    interaction_type: kind,
                    timestamp: base + Duration::hours(next_id as i64),
                    care_mode: None,
                    care_frequency: None,
                });
                next_id += 1;
            }
        }

        Fixture {
            users,
            shoes,
            interactions,
        }
    }

    fn train(fixture: &Fixture, config: &TrainingConfig) -> Result<HybridModel> {
        let matrix = InteractionMatrix::build(
            fixture.users.iter().map(|u| u.user_id),
            fixture.shoes.iter().map(|s| s.shoe_id),
            &fixture.interactions,
            &InteractionWeights::default(),
        );
        let user_features = FeatureEncoder::build_user_features(&fixture.users);
        let item_features = FeatureEncoder::build_item_features(&fixture.shoes);
        HybridModel::fit(&matrix, &user_features, &item_features, config)
    }

    fn config() -> TrainingConfig {
        TrainingConfig {
            epochs: 60,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_interactions() {
        let mut fixture = fixture();
        fixture.interactions.clear();

        let result = train(&fixture, &config());
        assert!(matches!(result, Err(RankingError::Training(_))));
    }

    #[test]
    fn test_fit_rejects_empty_vocabulary() {
        let fixture = fixture();
        let matrix = InteractionMatrix::build(
            fixture.users.iter().map(|u| u.user_id),
            fixture.shoes.iter().map(|s| s.shoe_id),
            &fixture.interactions,
            &InteractionWeights::default(),
        );
        let no_user_features = FeatureEncoder::build_user_features(std::iter::empty());
        let item_features = FeatureEncoder::build_item_features(&fixture.shoes);

        let result = HybridModel::fit(&matrix, &no_user_features, &item_features, &config());
        assert!(matches!(result, Err(RankingError::Training(_))));
    }

    #[test]
    fn test_fit_rejects_invalid_config() {
        let fixture = fixture();
        let bad = TrainingConfig {
            learning_rate: 0.0,
            ..Default::default()
        };

        assert!(matches!(train(&fixture, &bad), Err(RankingError::Training(_))));
    }

    #[test]
    fn test_every_catalog_pair_scores_finite() {
        let fixture = fixture();
        let model = train(&fixture, &config()).unwrap();

        for user in &fixture.users {
            for shoe in &fixture.shoes {
                let score = model.score(user.user_id, shoe.shoe_id).unwrap();
                assert!(score.is_finite(), "score for ({}, {})", user.user_id, shoe.shoe_id);
            }
        }
    }

    #[test]
    fn test_unknown_entities_are_reported() {
        let model = train(&fixture(), &config()).unwrap();

        assert!(matches!(
            model.score(99, 1),
            Err(RankingError::UnknownEntity { kind: EntityKind::User, id: 99 })
        ));
        assert!(matches!(
            model.score(1, 99),
            Err(RankingError::UnknownEntity { kind: EntityKind::Shoe, id: 99 })
        ));
        assert!(model.top_n(99, 5).is_err());
    }

    #[test]
    fn test_top_n_ordering_and_purchase_exclusion() {
        let fixture = fixture();
        let model = train(&fixture, &config()).unwrap();

        for user in &fixture.users {
            let top = model.top_n(user.user_id, 4).unwrap();
            assert!(top.len() <= 4);

            for pair in top.windows(2) {
                assert!(
                    pair[0].score > pair[1].score
                        || (pair[0].score == pair[1].score && pair[0].shoe_id < pair[1].shoe_id)
                );
            }

            let purchased: Vec<ShoeId> = fixture
                .interactions
                .iter()
                .filter(|i| i.user_id == user.user_id && i.interaction_type == InteractionType::Purchase)
                .map(|i| i.shoe_id)
                .collect();
            assert!(top.iter().all(|s| !purchased.contains(&s.shoe_id)));
        }
    }

    #[test]
    fn test_top_n_where_restricts_candidates() {
        let fixture = fixture();
        let model = train(&fixture, &config()).unwrap();

        let top = model.top_n_where(1, 10, |id| id % 2 == 0).unwrap();
        assert!(!top.is_empty());
        assert!(top.iter().all(|s| s.shoe_id % 2 == 0));
    }

    #[test]
    fn test_training_is_deterministic() {
        let fixture = fixture();
        let a = train(&fixture, &config()).unwrap();
        let b = train(&fixture, &config()).unwrap();

        assert_eq!(a.epoch_losses(), b.epoch_losses());
        assert_eq!(a.score(3, 7).unwrap(), b.score(3, 7).unwrap());
    }

    #[test]
    fn test_training_reduces_loss() {
        let model = train(&fixture(), &config()).unwrap();
        let losses = model.epoch_losses();

        assert_eq!(losses.len(), 60);
        assert!(losses[losses.len() - 1] < losses[0]);
    }

    #[test]
    fn test_content_signal_reaches_cold_items() {
        let model = train(&fixture(), &config()).unwrap();

        // Shoe 11 (running) and 12 (dress) were never interacted with
        let runner_prefers_running = model.score(1, 11).unwrap() > model.score(1, 12).unwrap();
        let formal_prefers_dress = model.score(5, 12).unwrap() > model.score(5, 11).unwrap();
        assert!(runner_prefers_running);
        assert!(formal_prefers_dress);
    }

    #[test]
    fn test_feature_score_matches_full_score_for_known_entities() {
        let fixture = fixture();
        let model = train(&fixture, &config()).unwrap();

        let full = model.score(2, 4).unwrap();
        let features_only = model.score_features(&fixture.users[1], &fixture.shoes[3]);
        assert!((full - features_only).abs() < 1e-5);
    }

    #[test]
    fn test_cold_user_gets_feature_scores() {
        let fixture = fixture();
        let model = train(&fixture, &config()).unwrap();

        let newcomer = User {
            user_id: 500,
            typical_usage: "running".to_string(),
            preferred_color: "Neon".to_string(),
            age: None,
            gender: None,
        };
        let cold_shoe = Shoe {
            shoe_id: 900,
            ..shoe(900, ShoeType::Running)
        };

        assert!(!model.knows_user(500));
        assert!(model.score_features(&newcomer, &cold_shoe).is_finite());

        let top = model.top_n_features(&newcomer, &fixture.shoes, 3);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|s| s.score.is_finite()));
    }

    #[test]
    fn test_training_config_validation() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig { epochs: 0, ..Default::default() }.validate().is_err());
        assert!(TrainingConfig { latent_dim: 0, ..Default::default() }.validate().is_err());
        assert!(TrainingConfig { learning_rate: f32::NAN, ..Default::default() }.validate().is_err());
        assert!(TrainingConfig { negatives_per_positive: 0, ..Default::default() }.validate().is_err());
    }
}
