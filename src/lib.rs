// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! cyberspace-kernel: deterministic movement proofs and hash-linked hop chains
//! over a 3-axis, 256-bit-per-axis coordinate space.
//!
//! Everything in this crate is pure: no file I/O, no clocks, no randomness.
//! Storage and planning live in `cyberspace-chain`.

pub mod config;
pub mod error;
pub mod types;
pub mod cantor;
pub mod axis;
pub mod movement;
pub mod event;
pub mod replay;
pub mod toward;

pub use error::{KernelError, Result};
pub use types::{Axis, AxisDelta, Coordinate, Delta, Digest, Scalar};

#[cfg(test)]
pub mod tests;
