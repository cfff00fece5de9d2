// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Hop selection for multi-hop travel.
//!
//! A hop with LCA height at most `c` cannot leave the aligned block of size
//! `2^c` holding the current value, so each axis moves to the point of that
//! block closest to its destination. An axis already sitting on the block edge
//! facing its destination is pinned: only a unit step over the edge, at height
//! exactly `c + 1`, can move it.

use crate::axis::compute_lca_height;
use crate::config::AXIS_BITS;
use crate::movement::{estimate_cost, HopCost};
use crate::types::{Axis, Coordinate, Scalar};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Never exceed the ceiling; a pinned axis stops travel.
    Strict,
    /// A pinned axis may take one unit step at `ceiling + 1`.
    #[default]
    BoundaryBump,
}

/// The next hop toward a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub target: Coordinate,
    pub cost: HopCost,
    /// Axes that needed a boundary crossing for this hop.
    pub bumped: Vec<Axis>,
}

impl Step {
    /// Height limit the hop must be built with.
    pub fn limit(&self, ceiling: u32) -> u32 {
        if self.bumped.is_empty() {
            ceiling
        } else {
            ceiling + 1
        }
    }
}

/// An axis that cannot move without a larger ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pinned {
    pub axis: Axis,
    /// Smallest LCA height that would let the axis move.
    pub needed: u32,
}

impl fmt::Display for Pinned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis {} is pinned; moving it needs max LCA height {}", self.axis, self.needed)
    }
}

/// Closest value to `target` reachable from `current` within height `ceiling`.
/// `None` when that value is `current` itself but `target` is elsewhere.
pub fn step_axis(current: &Scalar, target: &Scalar, ceiling: u32) -> Option<Scalar> {
    if current == target {
        return Some(current.clone());
    }
    let base = current.align_down(ceiling.min(AXIS_BITS));
    let span = (BigUint::one() << ceiling.min(AXIS_BITS) as usize) - 1u32;
    let end = base.checked_add(&span).unwrap_or_else(Scalar::max_value);

    let next = if target < &base {
        base
    } else if target > &end {
        end
    } else {
        target.clone()
    };
    (next != *current).then_some(next)
}

/// Chooses the next hop from `current` toward `destination`.
///
/// Returns `Ok(None)` once there. When the direct hop fits under `ceiling`
/// it is taken whole.
pub fn next_step(
    current: &Coordinate,
    destination: &Coordinate,
    ceiling: u32,
    policy: StepPolicy,
) -> Result<Option<Step>, Pinned> {
    if current == destination {
        return Ok(None);
    }
    let direct = estimate_cost(current, destination);
    if direct.within(ceiling) {
        return Ok(Some(Step { target: destination.clone(), cost: direct, bumped: Vec::new() }));
    }

    let mut bumped = Vec::new();
    let mut next = [Scalar::zero(), Scalar::zero(), Scalar::zero()];
    for (slot, axis) in next.iter_mut().zip(Axis::ALL) {
        let from = current.axis(axis);
        let to = destination.axis(axis);
        *slot = match step_axis(from, to, ceiling) {
            Some(v) => v,
            None => {
                let crossing = cross_boundary(axis, from, to, ceiling, policy)?;
                bumped.push(axis);
                crossing
            }
        };
    }

    let [x, y, z] = next;
    let target = Coordinate::new(x, y, z);
    let cost = estimate_cost(current, &target);
    Ok(Some(Step { target, cost, bumped }))
}

fn cross_boundary(
    axis: Axis,
    from: &Scalar,
    to: &Scalar,
    ceiling: u32,
    policy: StepPolicy,
) -> Result<Scalar, Pinned> {
    let one = BigUint::one();
    let stepped = if to > from { from.checked_add(&one) } else { from.checked_sub(&one) };
    // step_axis only pins when the destination lies past the block edge,
    // so a unit step toward it stays in the domain.
    let Some(next) = stepped else {
        return Err(Pinned { axis, needed: ceiling + 1 });
    };
    let needed = compute_lca_height(from, &next);
    if policy == StepPolicy::BoundaryBump && needed == ceiling + 1 {
        Ok(next)
    } else {
        Err(Pinned { axis, needed })
    }
}
