use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = u64;
pub type ShoeId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub typical_usage: String,
    pub preferred_color: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shoe {
    pub shoe_id: ShoeId,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub shoe_type: ShoeType,
    pub color: String,
    pub material: String,
    pub size: Option<f32>,
    pub care_requirements: Option<String>,
}

impl Shoe {
    /// Display name used in notification templates ("Brand Model")
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand.trim(), self.model.trim())
    }
}

/// Shoe category. Raw catalog strings ("running shoe", "Dress Shoe", ...) are
/// normalized on ingestion; anything unrecognized lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ShoeType {
    Running,
    Sneaker,
    Dress,
    Other,
}

impl ShoeType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" | "running shoe" | "running shoes" | "runner" => ShoeType::Running,
            "sneaker" | "sneakers" => ShoeType::Sneaker,
            "dress" | "dress shoe" | "dress shoes" => ShoeType::Dress,
            _ => ShoeType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShoeType::Running => "running",
            ShoeType::Sneaker => "sneaker",
            ShoeType::Dress => "dress",
            ShoeType::Other => "other",
        }
    }
}

impl From<String> for ShoeType {
    fn from(raw: String) -> Self {
        ShoeType::parse(&raw)
    }
}

impl fmt::Display for ShoeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    #[serde(alias = "wishlist")]
    Favorite,
    Purchase,
    Wear,
}

impl InteractionType {
    pub const ALL: [InteractionType; 4] = [
        InteractionType::View,
        InteractionType::Favorite,
        InteractionType::Purchase,
        InteractionType::Wear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Favorite => "favorite",
            InteractionType::Purchase => "purchase",
            InteractionType::Wear => "wear",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub interaction_id: u64,
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub interaction_type: InteractionType,
    #[serde(alias = "interaction_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub care_mode: Option<String>,
    pub care_frequency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CareType {
    Clean,
    Polish,
    Repair,
    Other,
}

impl From<String> for CareType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clean" | "cleaning" => CareType::Clean,
            "polish" | "polishing" => CareType::Polish,
            "repair" => CareType::Repair,
            _ => CareType::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareEvent {
    pub care_id: u64,
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub care_type: CareType,
    #[serde(alias = "care_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationLogEntry {
    /// Monotonic sequence number assigned by the log store
    pub log_id: u64,
    pub user_id: UserId,
    pub shoe_id: ShoeId,
    pub timestamp: DateTime<Utc>,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoredShoe {
    pub shoe_id: ShoeId,
    pub score: f32,
}

/// Sort descending by score, lowest shoe id first on ties.
pub fn rank_scored(scored: &mut [ScoredShoe]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.shoe_id.cmp(&b.shoe_id))
    });
}

/// Current weather, as selected by the caller when evaluating care rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Humid,
    Cold,
}

impl WeatherCondition {
    /// Nominal relative humidity in percent
    pub fn humidity_pct(&self) -> u8 {
        match self {
            WeatherCondition::Humid => 70,
            _ => 40,
        }
    }

    /// Nominal temperature in degrees Celsius
    pub fn temperature_c(&self) -> i8 {
        match self {
            WeatherCondition::Cold => 5,
            _ => 20,
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(WeatherCondition::Sunny),
            "rainy" => Ok(WeatherCondition::Rainy),
            "humid" => Ok(WeatherCondition::Humid),
            "cold" => Ok(WeatherCondition::Cold),
            other => Err(format!("unknown weather condition: {}", other)),
        }
    }
}

impl TryFrom<String> for WeatherCondition {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Humid => "Humid",
            WeatherCondition::Cold => "Cold",
        };
        f.write_str(label)
    }
}

/// Outfit or occasion a recommendation is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EventType {
    Formal,
    Workout,
    Casual,
    Sports,
    Wedding,
    Party,
}

impl EventType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "formal" => Some(EventType::Formal),
            "workout" => Some(EventType::Workout),
            "casual" => Some(EventType::Casual),
            "sports" => Some(EventType::Sports),
            "wedding" => Some(EventType::Wedding),
            "party" => Some(EventType::Party),
            _ => None,
        }
    }
}

impl TryFrom<String> for EventType {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        EventType::parse(&raw).ok_or_else(|| format!("unknown event type: {}", raw))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventType::Formal => "Formal",
            EventType::Workout => "Workout",
            EventType::Casual => "Casual",
            EventType::Sports => "Sports",
            EventType::Wedding => "Wedding",
            EventType::Party => "Party",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shoe_type_normalization() {
        assert_eq!(ShoeType::parse("running shoe"), ShoeType::Running);
        assert_eq!(ShoeType::parse("  Dress Shoe "), ShoeType::Dress);
        assert_eq!(ShoeType::parse("sneaker"), ShoeType::Sneaker);
        assert_eq!(ShoeType::parse("sandal"), ShoeType::Other);
    }

    #[test]
    fn test_interaction_type_wishlist_alias() {
        let parsed: InteractionType = serde_json::from_str("\"wishlist\"").unwrap();
        assert_eq!(parsed, InteractionType::Favorite);
    }

    #[test]
    fn test_shoe_deserializes_raw_type() {
        let shoe: Shoe = serde_json::from_str(
            r#"{"shoe_id": 7, "brand": "Acme", "model": "Swift 300", "type": "running shoe",
                "color": "Black", "material": "Mesh"}"#,
        )
        .unwrap();

        assert_eq!(shoe.shoe_type, ShoeType::Running);
        assert_eq!(shoe.size, None);
        assert_eq!(shoe.display_name(), "Acme Swift 300");
    }

    #[test]
    fn test_rank_scored_tie_break() {
        let mut scored = vec![
            ScoredShoe { shoe_id: 9, score: 0.5 },
            ScoredShoe { shoe_id: 3, score: 0.9 },
            ScoredShoe { shoe_id: 2, score: 0.5 },
        ];
        rank_scored(&mut scored);

        let ids: Vec<_> = scored.iter().map(|s| s.shoe_id).collect();
        assert_eq!(ids, vec![3, 2, 9]);
    }

    #[test]
    fn test_weather_parsing() {
        assert_eq!("Rainy".parse::<WeatherCondition>(), Ok(WeatherCondition::Rainy));
        assert!("foggy".parse::<WeatherCondition>().is_err());
        assert_eq!(WeatherCondition::Humid.humidity_pct(), 70);
        assert_eq!(WeatherCondition::Cold.temperature_c(), 5);
    }
}
