//! Catalog and dataset loading
//!
//! The four input tables live in a data directory as JSON arrays:
//! `users.json`, `shoes.json`, `interactions.json` and `care_history.json`.
//! Rows that reference unknown users or shoes, and rows with duplicate ids,
//! are dropped with a warning rather than failing the load.

use crate::error::{AppError, Result};
use crate::models::{CareEvent, Interaction, Shoe, ShoeId, User, UserId};
use crate::services::rules::HistorySnapshot;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const USERS_FILE: &str = "users.json";
pub const SHOES_FILE: &str = "shoes.json";
pub const INTERACTIONS_FILE: &str = "interactions.json";
pub const CARE_HISTORY_FILE: &str = "care_history.json";

/// Users and shoes keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    users: BTreeMap<UserId, User>,
    shoes: BTreeMap<ShoeId, Shoe>,
}

impl Catalog {
    /// Build a catalog; the first row wins for duplicate ids
    pub fn new(users: Vec<User>, shoes: Vec<Shoe>) -> Self {
        let mut user_map = BTreeMap::new();
        let mut duplicate_users = 0usize;
        for user in users {
            if user_map.contains_key(&user.user_id) {
                duplicate_users += 1;
                continue;
            }
            user_map.insert(user.user_id, user);
        }

        let mut shoe_map = BTreeMap::new();
        let mut duplicate_shoes = 0usize;
        for shoe in shoes {
            if shoe_map.contains_key(&shoe.shoe_id) {
                duplicate_shoes += 1;
                continue;
            }
            shoe_map.insert(shoe.shoe_id, shoe);
        }

        if duplicate_users > 0 || duplicate_shoes > 0 {
            warn!(
                duplicate_users = duplicate_users,
                duplicate_shoes = duplicate_shoes,
                "Dropped catalog rows with duplicate ids"
            );
        }

        Self {
            users: user_map,
            shoes: shoe_map,
        }
    }

    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn shoe(&self, shoe_id: ShoeId) -> Option<&Shoe> {
        self.shoes.get(&shoe_id)
    }

    /// Users in ascending id order
    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    /// Shoes in ascending id order
    pub fn shoes(&self) -> impl Iterator<Item = &Shoe> + '_ {
        self.shoes.values()
    }

    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.keys().copied()
    }

    pub fn shoe_ids(&self) -> impl Iterator<Item = ShoeId> + '_ {
        self.shoes.keys().copied()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn shoe_count(&self) -> usize {
        self.shoes.len()
    }
}

/// Catalog plus the interaction and care logs, sorted by (timestamp, id)
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    catalog: Catalog,
    interactions: Vec<Interaction>,
    care_events: Vec<CareEvent>,
}

impl Dataset {
    pub fn new(catalog: Catalog, interactions: Vec<Interaction>, care_events: Vec<CareEvent>) -> Self {
        let known = |user_id: UserId, shoe_id: ShoeId| {
            catalog.user(user_id).is_some() && catalog.shoe(shoe_id).is_some()
        };

        let interaction_total = interactions.len();
        let mut seen = HashSet::new();
        let mut interactions: Vec<Interaction> = interactions
            .into_iter()
            .filter(|i| known(i.user_id, i.shoe_id) && seen.insert(i.interaction_id))
            .collect();
        interactions.sort_by_key(|i| (i.timestamp, i.interaction_id));

        let care_total = care_events.len();
        let mut seen = HashSet::new();
        let mut care_events: Vec<CareEvent> = care_events
            .into_iter()
            .filter(|c| known(c.user_id, c.shoe_id) && seen.insert(c.care_id))
            .collect();
        care_events.sort_by_key(|c| (c.timestamp, c.care_id));

        let dropped_interactions = interaction_total - interactions.len();
        let dropped_care = care_total - care_events.len();
        if dropped_interactions > 0 || dropped_care > 0 {
            warn!(
                dropped_interactions = dropped_interactions,
                dropped_care_events = dropped_care,
                "Dropped rows with dangling references or duplicate ids"
            );
        }

        Self {
            catalog,
            interactions,
            care_events,
        }
    }

    /// Load the four tables from `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AppError::Dataset(format!(
                "Data directory {} does not exist",
                dir.display()
            )));
        }

        let users: Vec<User> = read_table(&dir.join(USERS_FILE))?;
        let shoes: Vec<Shoe> = read_table(&dir.join(SHOES_FILE))?;
        let interactions: Vec<Interaction> = read_table(&dir.join(INTERACTIONS_FILE))?;
        let care_events: Vec<CareEvent> = read_table(&dir.join(CARE_HISTORY_FILE))?;

        let dataset = Self::new(Catalog::new(users, shoes), interactions, care_events);

        info!(
            dir = %dir.display(),
            users = dataset.catalog.user_count(),
            shoes = dataset.catalog.shoe_count(),
            interactions = dataset.interactions.len(),
            care_events = dataset.care_events.len(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn care_events(&self) -> &[CareEvent] {
        &self.care_events
    }

    /// Read-only history as of `as_of`
    pub fn history(&self, as_of: DateTime<Utc>) -> HistorySnapshot<'_> {
        HistorySnapshot::new(as_of, &self.interactions, &self.care_events)
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Dataset(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Dataset(format!("Failed to parse {}: {}", path.display(), e)))
}
