//! Position-based reordering for scenario lists.
//!
//! A campaign's scenarios carry a unique integer `position`; ascending
//! position (ties broken by creation order) defines display order. Moves are
//! single-step pairwise swaps; positions are never renumbered in bulk. The
//! planning half here is pure -- applying the two writes (and compensating
//! when the second one fails) is `CampaignOps::reorder_scenario`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingshelfError};
use crate::models::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Up
    }
}

/// One position write: set `scenario_id`'s position to `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionWrite {
    pub scenario_id: String,
    pub position: i64,
}

/// The two writes of a swap, plus what to restore if the second write fails
/// after the first succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    /// The scenario being moved, taking its neighbor's position.
    pub first: PositionWrite,
    /// The displaced neighbor, taking the moved scenario's old position.
    pub second: PositionWrite,
    /// Undo for `first`, applied when `second` cannot be committed.
    pub rollback: PositionWrite,
}

/// Plan a one-step move within `scenarios` (which must already be in
/// ascending position order, as loaded from the store).
///
/// Returns `Ok(None)` for the boundary no-ops: moving the first item up or
/// the last item down performs no writes and is not an error. Fails with
/// `NotFound` when `scenario_id` is not in the list.
pub fn plan_swap(
    scenarios: &[Scenario],
    scenario_id: &str,
    direction: Direction,
) -> Result<Option<SwapPlan>> {
    let idx = scenarios
        .iter()
        .position(|s| s.id == scenario_id)
        .ok_or_else(|| RingshelfError::NotFound(format!("scenario {}", scenario_id)))?;

    let swap_idx = match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => idx.checked_add(1),
    };
    let Some(swap_idx) = swap_idx.filter(|i| *i < scenarios.len()) else {
        return Ok(None);
    };

    let a = &scenarios[idx];
    let b = &scenarios[swap_idx];

    Ok(Some(SwapPlan {
        first: PositionWrite {
            scenario_id: a.id.clone(),
            position: b.position,
        },
        second: PositionWrite {
            scenario_id: b.id.clone(),
            position: a.position,
        },
        rollback: PositionWrite {
            scenario_id: a.id.clone(),
            position: a.position,
        },
    }))
}

/// Position for a scenario appended to `scenarios`: one past the current
/// maximum, or 0 for an empty campaign.
pub fn next_position(scenarios: &[Scenario]) -> i64 {
    scenarios
        .iter()
        .map(|s| s.position)
        .max()
        .map_or(0, |max| max + 1)
}
