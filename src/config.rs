// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Bit width of every axis.
pub const AXIS_BITS: u32 = 256;

/// Byte width of one axis in its fixed big-endian form.
pub const AXIS_BYTES: usize = 32;

/// Per-axis LCA height ceiling used when the caller does not override it.
/// Proof cost doubles with every level, so this keeps routine hops instant.
pub const DEFAULT_MAX_LCA_HEIGHT: u32 = 20;

/// Tallest subtree whose full level listing the debug tooling will print.
pub const DEBUG_TREE_HEIGHT: u32 = 8;

/// Width of each axis inside a 256-bit interleaved key (3 * 85 + 1 plane bit).
pub const INTERLEAVED_AXIS_BITS: u32 = 85;

/// Version tag mixed into every event id preimage.
pub const EVENT_FORMAT_VERSION: u32 = 1;
