// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Movement Planner.
//!
//! Every hop is one atomic unit: size it, build its proof, append it, then
//! checkpoint the state cache. A failure anywhere before the append leaves the
//! chain untouched. Multi-hop travel only checks for cancellation between
//! units, so an interrupted run always stops on a real, replayable tip and
//! resuming simply plans again from that tip.

use crate::error::{ChainError, Result};
use crate::state::StateFile;
use crate::store::{normalize_label, ChainStore};
use cyberspace_kernel::event::{Event, PublicKey};
use cyberspace_kernel::movement::{build_movement_proof, HopCost};
use cyberspace_kernel::toward::{next_step, StepPolicy};
use cyberspace_kernel::{Axis, Coordinate, Delta};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared flag for stopping `plan_toward` between hops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TowardStatus {
    Arrived,
    /// Stopped after `max_hops` hops.
    HopLimit,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowardOutcome {
    pub status: TowardStatus,
    /// Hops appended by this call.
    pub hops: u64,
    pub coordinate: Coordinate,
}

/// Reported to the observer after each appended hop.
#[derive(Debug)]
pub struct HopProgress<'a> {
    pub hop: u64,
    pub event: &'a Event,
    pub cost: HopCost,
    /// Height limit the hop was built under.
    pub limit: u32,
    /// Axes that crossed a block edge at `limit`.
    pub bumped: &'a [Axis],
}

pub struct Navigator<'a> {
    store: &'a ChainStore,
    label: String,
    author: PublicKey,
    checkpoint: Option<&'a mut StateFile>,
}

impl<'a> Navigator<'a> {
    pub fn new(store: &'a ChainStore, label: &str, author: PublicKey) -> Result<Self> {
        Ok(Self { store, label: normalize_label(label)?, author, checkpoint: None })
    }

    /// Rewrites `state` after every append.
    pub fn with_checkpoint(mut self, state: &'a mut StateFile) -> Self {
        self.checkpoint = Some(state);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Coordinate at the chain tip.
    pub fn current(&self) -> Result<Coordinate> {
        Ok(self.store.tip(&self.label)?.coordinate().clone())
    }

    /// One hop by `delta`. Leaving the 256-bit domain fails before any proof work.
    pub fn plan_and_execute_delta(&mut self, delta: &Delta, ceiling: u32) -> Result<Event> {
        let from = self.current()?;
        let to = from.checked_add(delta)?;
        self.hop(&from, &to, ceiling)
    }

    pub fn plan_and_execute_absolute(&mut self, destination: &Coordinate, ceiling: u32) -> Result<Event> {
        let from = self.current()?;
        self.hop(&from, destination, ceiling)
    }

    /// Hops toward `destination` until arrival, `max_hops` (0 = unlimited) or cancellation.
    pub fn plan_toward<F>(
        &mut self,
        destination: &Coordinate,
        ceiling: u32,
        policy: StepPolicy,
        max_hops: u64,
        cancel: &CancelToken,
        mut observer: F,
    ) -> Result<TowardOutcome>
    where
        F: FnMut(&HopProgress<'_>),
    {
        let mut current = self.current()?;
        let mut hops = 0u64;
        info!(chain = %self.label, from = %current, to = %destination, ceiling, "travelling");

        loop {
            if cancel.is_cancelled() {
                info!(chain = %self.label, hops, "travel cancelled");
                return Ok(TowardOutcome { status: TowardStatus::Cancelled, hops, coordinate: current });
            }

            if &current == destination {
                info!(chain = %self.label, hops, "arrived");
                return Ok(TowardOutcome { status: TowardStatus::Arrived, hops, coordinate: current });
            }
            if max_hops != 0 && hops >= max_hops {
                return Ok(TowardOutcome { status: TowardStatus::HopLimit, hops, coordinate: current });
            }

            let step = match next_step(&current, destination, ceiling, policy) {
                Ok(Some(step)) => step,
                Ok(None) => {
                    return Ok(TowardOutcome { status: TowardStatus::Arrived, hops, coordinate: current });
                }
                Err(pinned) => {
                    return Err(ChainError::NoProgress { axis: pinned.axis, needed: pinned.needed, ceiling });
                }
            };

            let limit = step.limit(ceiling);
            if !step.bumped.is_empty() {
                info!(axes = ?step.bumped, limit, "crossing block edge");
            }
            let event = self.hop(&current, &step.target, limit)?;
            hops += 1;
            observer(&HopProgress { hop: hops, event: &event, cost: step.cost, limit, bumped: &step.bumped });
            current = step.target;
        }
    }

    fn hop(&mut self, from: &Coordinate, to: &Coordinate, ceiling: u32) -> Result<Event> {
        let proof = build_movement_proof(from, to, ceiling)?;
        debug!(cost = %proof.cost(), ceiling, "proof built");
        let event = self.store.append_hop(&self.label, proof, to, self.author)?;
        if let Some(state) = self.checkpoint.as_deref_mut() {
            state.checkpoint(&event)?;
        }
        Ok(event)
    }
}
