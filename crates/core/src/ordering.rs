//! Gap-based sort-order reconciliation.
//!
//! Categories within a board and views within a category are ordered by an
//! integer `sort_order` spaced by [`SORT_ORDER_GAP`]. Clients never submit
//! point moves; they resubmit the full ordering they want. [`plan_reorder`]
//! turns such a submission into the set of row updates to persist, or
//! rejects it when it does not cover the current set.
//!
//! Only relative order matters. Stored values may contain gaps and, after
//! concurrent edits, duplicates; readers break ties on the row id.

use std::collections::HashMap;

use crate::types::EntityId;

/// Spacing between consecutive sort-order values.
pub const SORT_ORDER_GAP: i32 = 10;

/// Outcome of reconciling a proposed full ordering against the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPlan {
    /// The proposal has a different length than the live set. Nothing is
    /// written and the current order is reported back.
    Unchanged { current: Vec<EntityId> },

    /// The proposal is accepted. `assignments` lists the new sort order of
    /// every currently stored id that appears in the proposal, in stored
    /// order. `order` is the proposal itself, echoed as the new order.
    Apply {
        order: Vec<EntityId>,
        assignments: Vec<SortAssignment>,
    },
}

/// A single `sort_order` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortAssignment {
    pub id: EntityId,
    pub sort_order: i32,
}

impl ReorderPlan {
    /// The order to report to the caller once the plan has been applied.
    pub fn resulting_order(&self) -> &[EntityId] {
        match self {
            ReorderPlan::Unchanged { current } => current,
            ReorderPlan::Apply { order, .. } => order,
        }
    }

    /// The writes the plan requires (empty for [`ReorderPlan::Unchanged`]).
    pub fn assignments(&self) -> &[SortAssignment] {
        match self {
            ReorderPlan::Unchanged { .. } => &[],
            ReorderPlan::Apply { assignments, .. } => assignments,
        }
    }

    pub fn into_order(self) -> Vec<EntityId> {
        match self {
            ReorderPlan::Unchanged { current } => current,
            ReorderPlan::Apply { order, .. } => order,
        }
    }
}

/// Sort-order value for the entry at `index` of a full ordering.
pub fn gap_order(index: usize) -> i32 {
    i32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(SORT_ORDER_GAP))
        .unwrap_or(i32::MAX)
}

/// Reconcile a client-submitted full ordering against the stored one.
///
/// `current` must be the live ids sorted by their stored order. When the
/// lengths differ the proposal is treated as stale and ignored. Otherwise
/// every proposed id gets `index * SORT_ORDER_GAP`; proposed ids that are not
/// stored are skipped, and if an id is proposed twice its last position wins.
pub fn plan_reorder(current: &[EntityId], proposed: &[EntityId]) -> ReorderPlan {
    if proposed.len() != current.len() {
        return ReorderPlan::Unchanged {
            current: current.to_vec(),
        };
    }

    let positions: HashMap<&str, i32> = proposed
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), gap_order(index)))
        .collect();

    let assignments = current
        .iter()
        .filter_map(|id| {
            positions.get(id.as_str()).map(|&sort_order| SortAssignment {
                id: id.clone(),
                sort_order,
            })
        })
        .collect();

    ReorderPlan::Apply {
        order: proposed.to_vec(),
        assignments,
    }
}
