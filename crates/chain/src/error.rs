// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use cyberspace_kernel::{Axis, KernelError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("no chain named {0:?}")]
    NoSuchChain(String),

    #[error("chain {0:?} already exists")]
    ChainExists(String),

    /// The chain file exists but holds no complete record.
    #[error("chain {0:?} has no events")]
    EmptyChain(String),

    #[error("proof does not match the chain: {0}")]
    ProofMismatch(String),

    #[error("chain {label:?} is broken at line {line}: {fault}")]
    BrokenChain { label: String, line: u64, fault: String },

    #[error("invalid chain label {0:?}")]
    InvalidLabel(String),

    #[error("no saved target named {0:?}")]
    UnknownTarget(String),

    /// An axis sits on a block edge that only a taller hop can cross.
    #[error("axis {axis} cannot move under max LCA height {ceiling}; rerun with --max-lca-height {needed}")]
    NoProgress { axis: Axis, needed: u32, ceiling: u32 },

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;
