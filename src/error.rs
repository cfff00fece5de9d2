// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use crate::types::Axis;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// One or more axes need a taller LCA subtree than the caller allows.
    /// `axes` is empty when a single axis was proved on its own.
    #[error("hop too large: LCA height {height} exceeds max {ceiling}{}", describe_axes(.axes))]
    CostExceeded { ceiling: u32, height: u32, axes: Vec<(Axis, u32)> },

    /// Arithmetic pushed an axis outside [0, 2^256).
    #[error("axis {axis} leaves the 256-bit domain")]
    OutOfDomain { axis: Axis },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("event is already signed")]
    AlreadySigned,

    /// Requested debug tree is taller than the configured listing limit.
    #[error("height {height} exceeds listing limit {limit}")]
    TreeTooTall { height: u32, limit: u32 },
}

fn describe_axes(axes: &[(Axis, u32)]) -> String {
    if axes.is_empty() {
        return String::new();
    }
    let named: Vec<String> = axes.iter().map(|(axis, h)| format!("{axis}={h}")).collect();
    format!(" (axes {})", named.join(", "))
}

pub type Result<T> = core::result::Result<T, KernelError>;
