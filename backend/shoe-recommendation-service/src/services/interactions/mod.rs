//! Interaction Matrix Builder
//!
//! Aggregates the timestamped interaction log into a sparse user × item
//! weight matrix. Every catalog user and item owns a row/column, including
//! ones with no interactions, so content-only scores stay available for them.

use crate::models::{Interaction, InteractionType, ShoeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};

/// Per-type interaction weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionWeights {
    pub view: f32,
    pub favorite: f32,
    pub purchase: f32,
    /// Wearing is usage, not intent; it may be weighted zero
    pub wear: f32,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            view: 1.0,
            favorite: 2.0,
            purchase: 4.0,
            wear: 2.0,
        }
    }
}

impl InteractionWeights {
    pub fn weight(&self, interaction_type: InteractionType) -> f32 {
        match interaction_type {
            InteractionType::View => self.view,
            InteractionType::Favorite => self.favorite,
            InteractionType::Purchase => self.purchase,
            InteractionType::Wear => self.wear,
        }
    }

    /// Validate weight ordering: purchase > favorite > view > 0, wear >= 0
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.view, self.favorite, self.purchase, self.wear];
        if all.iter().any(|w| !w.is_finite()) {
            return Err("Interaction weights must be finite".to_string());
        }
        if self.view <= 0.0 {
            return Err(format!("View weight must be positive, got {}", self.view));
        }
        if !(self.purchase > self.favorite && self.favorite > self.view) {
            return Err(format!(
                "Weights must satisfy purchase > favorite > view, got {} / {} / {}",
                self.purchase, self.favorite, self.view
            ));
        }
        if self.wear < 0.0 {
            return Err(format!("Wear weight must be non-negative, got {}", self.wear));
        }
        Ok(())
    }
}

/// Sparse user × item matrix, rows and columns ordered by ascending id
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    users: Vec<UserId>,
    items: Vec<ShoeId>,
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<ShoeId, usize>,
    rows: Vec<BTreeMap<usize, f32>>,
    purchased: Vec<BTreeSet<usize>>,
}

impl InteractionMatrix {
    /// Build the matrix for the given catalog ids.
    ///
    /// Interactions referencing ids outside the catalog are skipped. The
    /// result depends only on the log's contents: per-cell type counts are
    /// accumulated first and weighted afterwards in a fixed order.
    pub fn build<U, S>(
        user_ids: U,
        item_ids: S,
        interactions: &[Interaction],
        weights: &InteractionWeights,
    ) -> Self
    where
        U: IntoIterator<Item = UserId>,
        S: IntoIterator<Item = ShoeId>,
    {
        let users: Vec<UserId> = user_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let items: Vec<ShoeId> = item_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let item_index: HashMap<ShoeId, usize> =
            items.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut counts: BTreeMap<(usize, usize), [u32; 4]> = BTreeMap::new();
        let mut purchased = vec![BTreeSet::new(); users.len()];
        let mut skipped = 0usize;

        for interaction in interactions {
            let (Some(&u), Some(&i)) = (
                user_index.get(&interaction.user_id),
                item_index.get(&interaction.shoe_id),
            ) else {
                skipped += 1;
                continue;
            };

            let slot = type_slot(interaction.interaction_type);
            counts.entry((u, i)).or_insert([0; 4])[slot] += 1;

            if interaction.interaction_type == InteractionType::Purchase {
                purchased[u].insert(i);
            }
        }

        if skipped > 0 {
            warn!(
                skipped = skipped,
                "Skipped interactions referencing users or shoes outside the catalog"
            );
        }

        let mut rows = vec![BTreeMap::new(); users.len()];
        for ((u, i), cell) in counts {
            let weight: f32 = InteractionType::ALL
                .iter()
                .map(|t| cell[type_slot(*t)] as f32 * weights.weight(*t))
                .sum();
            if weight > 0.0 {
                rows[u].insert(i, weight);
            }
        }

        let matrix = Self {
            users,
            items,
            user_index,
            item_index,
            rows,
            purchased,
        };

        info!(
            users = matrix.users.len(),
            items = matrix.items.len(),
            nnz = matrix.nnz(),
            density_pct = matrix.density() * 100.0,
            "Interaction matrix built"
        );

        matrix
    }

    /// (users, items)
    pub fn shape(&self) -> (usize, usize) {
        (self.users.len(), self.items.len())
    }

    /// Number of non-zero cells
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    /// Fraction of non-zero cells, 0.0 for a degenerate shape
    pub fn density(&self) -> f64 {
        let (n_users, n_items) = self.shape();
        let cells = n_users * n_items;
        if cells == 0 {
            0.0
        } else {
            self.nnz() as f64 / cells as f64
        }
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.users
    }

    pub fn item_ids(&self) -> &[ShoeId] {
        &self.items
    }

    pub fn user_index(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    pub fn item_index(&self, shoe_id: ShoeId) -> Option<usize> {
        self.item_index.get(&shoe_id).copied()
    }

    /// Aggregated weight for a (user, shoe) pair; 0.0 when absent
    pub fn weight(&self, user_id: UserId, shoe_id: ShoeId) -> f32 {
        match (self.user_index(user_id), self.item_index(shoe_id)) {
            (Some(u), Some(i)) => self.rows[u].get(&i).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Non-zero cells of one row, keyed by item index
    pub fn row(&self, user_idx: usize) -> Option<&BTreeMap<usize, f32>> {
        self.rows.get(user_idx)
    }

    /// All non-zero cells as (user index, item index, weight), row-major
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(u, row)| row.iter().map(move |(i, w)| (u, *i, *w)))
    }

    /// Item indices the user has purchased
    pub fn purchased(&self, user_idx: usize) -> Option<&BTreeSet<usize>> {
        self.purchased.get(user_idx)
    }
}

fn type_slot(interaction_type: InteractionType) -> usize {
    match interaction_type {
        InteractionType::View => 0,
        InteractionType::Favorite => 1,
        InteractionType::Purchase => 2,
        InteractionType::Wear => 3,
    }
}
