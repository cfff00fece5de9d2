// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Value types: axis scalars, coordinates, deltas and digests.

pub mod scalar;
pub mod coord;
pub mod delta;
pub mod digest;

pub use coord::{Axis, Coordinate};
pub use delta::{AxisDelta, Delta};
pub use digest::Digest;
pub use scalar::Scalar;
