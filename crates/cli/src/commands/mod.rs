// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod bench;
pub mod cantor;
pub mod chain;
pub mod config;
pub mod history;
pub mod movement;
pub mod spawn;
pub mod target;
pub mod verify;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

pub(crate) fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub(crate) fn format_timestamp(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
