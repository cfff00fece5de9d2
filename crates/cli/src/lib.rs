// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Command handlers behind the `cyberspace` binary.

pub mod commands;
pub mod home;
pub mod identity;
pub mod settings;
pub mod telemetry;

pub use home::Home;
pub use settings::Settings;
