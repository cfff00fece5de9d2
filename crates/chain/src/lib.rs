// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Persistent hop chains on top of `cyberspace-kernel`.
//!
//! - `log`: newline-delimited JSON chain files, append-only.
//! - `store`: the `ChainStore` (create, append, tip, replay, audit).
//! - `state`: the cached process state, always derived from a chain.
//! - `planner`: the `Navigator` that turns a destination into appended hops.
//! - `receipt`: BLAKE3 fingerprints of audited chains.

pub mod error;
pub mod log;
pub mod store;
pub mod state;
pub mod planner;
pub mod receipt;

pub use error::{ChainError, Result};
pub use planner::{CancelToken, HopProgress, Navigator, TowardOutcome, TowardStatus};
pub use receipt::ChainReceipt;
pub use state::{Identity, State, StateFile, Target};
pub use store::{AuditReport, ChainStore, Replay};
