//! Aggregate counts over a loaded dataset, used for reporting.

use crate::models::{InteractionType, ShoeType};
use crate::services::catalog::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedCount {
    pub id: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetInsights {
    pub users: usize,
    pub shoes: usize,
    pub interactions: usize,
    pub care_events: usize,
    pub interactions_by_type: BTreeMap<InteractionType, usize>,
    pub shoes_by_type: BTreeMap<ShoeType, usize>,
    /// Users with the most interactions, highest first
    pub most_active_users: Vec<RankedCount>,
    /// Shoes with the most care events, highest first
    pub most_cared_shoes: Vec<RankedCount>,
}

impl DatasetInsights {
    pub fn compute(dataset: &Dataset, top_k: usize) -> Self {
        let mut interactions_by_type: BTreeMap<InteractionType, usize> =
            InteractionType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut per_user: HashMap<u64, usize> = HashMap::new();
        for interaction in dataset.interactions() {
            *interactions_by_type
                .entry(interaction.interaction_type)
                .or_default() += 1;
            *per_user.entry(interaction.user_id).or_default() += 1;
        }

        let mut shoes_by_type: BTreeMap<ShoeType, usize> = BTreeMap::new();
        for shoe in dataset.catalog().shoes() {
            *shoes_by_type.entry(shoe.shoe_type).or_default() += 1;
        }

        let mut per_shoe: HashMap<u64, usize> = HashMap::new();
        for care in dataset.care_events() {
            *per_shoe.entry(care.shoe_id).or_default() += 1;
        }

        Self {
            users: dataset.catalog().user_count(),
            shoes: dataset.catalog().shoe_count(),
            interactions: dataset.interactions().len(),
            care_events: dataset.care_events().len(),
            interactions_by_type,
            shoes_by_type,
            most_active_users: top_counts(per_user, top_k),
            most_cared_shoes: top_counts(per_shoe, top_k),
        }
    }
}

/// Highest counts first, lowest id on ties
fn top_counts(counts: HashMap<u64, usize>, k: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .into_iter()
        .map(|(id, count)| RankedCount { id, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
    ranked.truncate(k);
    ranked
}
