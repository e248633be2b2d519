//! Feature Encoding Module
//!
//! Converts raw shoe and user attributes into categorical feature tokens and
//! maps them onto a closed, versioned vocabulary.
//!
//! # Vocabulary
//! - Built once over the full user/item catalog before training
//! - Token indices follow sorted token order, so the same catalog always
//!   yields the same vocabulary
//! - Tokens unseen at build time are dropped at inference, never erred on

use crate::models::{Shoe, User};
use crate::utils::normalize_token;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

/// Bumped whenever token construction changes
pub const VOCABULARY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    // Item side
    Type,
    Color,
    Material,
    // User side
    Usage,
    PreferredColor,
}

impl FeatureKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            FeatureKind::Type => "type",
            FeatureKind::Color => "color",
            FeatureKind::Material => "material",
            FeatureKind::Usage => "usage",
            FeatureKind::PreferredColor => "preferred_color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureToken {
    pub kind: FeatureKind,
    pub value: String,
}

impl FeatureToken {
    /// Normalizes `raw`; returns `None` for blank values
    pub fn new(kind: FeatureKind, raw: &str) -> Option<Self> {
        normalize_token(raw).map(|value| Self { kind, value })
    }
}

impl fmt::Display for FeatureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.value)
    }
}

#[derive(Debug, Clone)]
pub struct FeatureVocabulary {
    version: u32,
    tokens: Vec<FeatureToken>,
    index: HashMap<FeatureToken, usize>,
}

impl FeatureVocabulary {
    pub fn build<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = FeatureToken>,
    {
        let tokens: Vec<FeatureToken> = tokens
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        Self {
            version: VOCABULARY_VERSION,
            tokens,
            index,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index_of(&self, token: &FeatureToken) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn token(&self, index: usize) -> Option<&FeatureToken> {
        self.tokens.get(index)
    }

    /// Map tokens to sorted, deduplicated vocabulary indices
    pub fn encode(&self, tokens: &[FeatureToken]) -> Vec<usize> {
        let mut encoded: Vec<usize> = tokens
            .iter()
            .filter_map(|token| {
                let index = self.index_of(token);
                if index.is_none() {
                    debug!(token = %token, "Dropping token outside vocabulary");
                }
                index
            })
            .collect();
        encoded.sort_unstable();
        encoded.dedup();
        encoded
    }
}

/// Encoded features for one side (users or items) of the model
#[derive(Debug, Clone)]
pub struct EntityFeatures {
    vocabulary: FeatureVocabulary,
    rows: HashMap<u64, Vec<usize>>,
}

impl EntityFeatures {
    pub fn vocabulary(&self) -> &FeatureVocabulary {
        &self.vocabulary
    }

    /// Encoded feature indices of an entity; empty for unknown ids
    pub fn features_of(&self, id: u64) -> &[usize] {
        self.rows.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entity_count(&self) -> usize {
        self.rows.len()
    }
}

/// Stateless attribute → token conversion
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn shoe_tokens(shoe: &Shoe) -> Vec<FeatureToken> {
        [
            FeatureToken::new(FeatureKind::Type, shoe.shoe_type.as_str()),
            FeatureToken::new(FeatureKind::Color, &shoe.color),
            FeatureToken::new(FeatureKind::Material, &shoe.material),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn user_tokens(user: &User) -> Vec<FeatureToken> {
        [
            FeatureToken::new(FeatureKind::Usage, &user.typical_usage),
            FeatureToken::new(FeatureKind::PreferredColor, &user.preferred_color),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn build_item_features<'a, I>(shoes: I) -> EntityFeatures
    where
        I: IntoIterator<Item = &'a Shoe>,
    {
        let tokenized: Vec<(u64, Vec<FeatureToken>)> = shoes
            .into_iter()
            .map(|shoe| (shoe.shoe_id, Self::shoe_tokens(shoe)))
            .collect();
        Self::encode_all(tokenized)
    }

    pub fn build_user_features<'a, I>(users: I) -> EntityFeatures
    where
        I: IntoIterator<Item = &'a User>,
    {
        let tokenized: Vec<(u64, Vec<FeatureToken>)> = users
            .into_iter()
            .map(|user| (user.user_id, Self::user_tokens(user)))
            .collect();
        Self::encode_all(tokenized)
    }

    fn encode_all(tokenized: Vec<(u64, Vec<FeatureToken>)>) -> EntityFeatures {
        let vocabulary = FeatureVocabulary::build(
            tokenized
                .iter()
                .flat_map(|(_, tokens)| tokens.iter().cloned()),
        );
        let rows = tokenized
            .iter()
            .map(|(id, tokens)| (*id, vocabulary.encode(tokens)))
            .collect();

        EntityFeatures { vocabulary, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShoeType;

    fn shoe(id: u64, shoe_type: ShoeType, color: &str, material: &str) -> Shoe {
        Shoe {
            shoe_id: id,
            brand: "Acme".to_string(),
            model: format!("Model {}", id),
            shoe_type,
            color: color.to_string(),
            material: material.to_string(),
            size: None,
            care_requirements: None,
        }
    }

    #[test]
    fn test_shoe_tokens() {
        let tokens = FeatureEncoder::shoe_tokens(&shoe(1, ShoeType::Running, "Black", " Mesh"));
        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();

        assert_eq!(rendered, vec!["type:running", "color:black", "material:mesh"]);
    }

    #[test]
    fn test_blank_attributes_produce_no_token() {
        let user = User {
            user_id: 1,
            typical_usage: "Running".to_string(),
            preferred_color: "  ".to_string(),
            age: None,
            gender: None,
        };

        let tokens = FeatureEncoder::user_tokens(&user);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].to_string(), "usage:running");
    }

    #[test]
    fn test_vocabulary_is_order_independent() {
        let a = shoe(1, ShoeType::Running, "Black", "Mesh");
        let b = shoe(2, ShoeType::Dress, "Red", "Leather");

        let forward = FeatureEncoder::build_item_features([&a, &b]);
        let reverse = FeatureEncoder::build_item_features([&b, &a]);

        assert_eq!(forward.vocabulary().len(), 6);
        assert_eq!(forward.features_of(1), reverse.features_of(1));
        assert_eq!(forward.features_of(2), reverse.features_of(2));
        assert_eq!(forward.vocabulary().version(), VOCABULARY_VERSION);
    }

    #[test]
    fn test_unknown_tokens_are_dropped() {
        let features = FeatureEncoder::build_item_features([&shoe(1, ShoeType::Sneaker, "White", "Synthetic")]);
        let unseen = FeatureEncoder::shoe_tokens(&shoe(2, ShoeType::Sneaker, "Purple", "Canvas"));

        let encoded = features.vocabulary().encode(&unseen);

        // Only type:sneaker survives
        assert_eq!(encoded.len(), 1);
        let token = features.vocabulary().token(encoded[0]).unwrap();
        assert_eq!(token.to_string(), "type:sneaker");
    }

    #[test]
    fn test_unknown_entity_has_no_features() {
        let features = FeatureEncoder::build_item_features([&shoe(1, ShoeType::Sneaker, "White", "Mesh")]);
        assert!(features.features_of(42).is_empty());
        assert_eq!(features.entity_count(), 1);
    }
}
