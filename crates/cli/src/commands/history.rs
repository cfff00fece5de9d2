// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{format_timestamp, new_table};
use crate::home::Home;

/// Shows the last `limit` events of `chain` (default: the active chain).
pub fn run(home: &Home, chain: Option<&str>, limit: usize, json: bool) -> anyhow::Result<()> {
    let store = home.store()?;
    let label = match chain {
        Some(label) => label.to_string(),
        None => home.require_state()?.state().active_chain.clone(),
    };
    let events = store.read_events(&label)?;
    let skip = events.len().saturating_sub(limit);

    if json {
        for event in &events[skip..] {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    let mut table = new_table(vec!["#", "Timestamp", "Kind", "Coordinate", "LCA", "ID"]);
    for (i, event) in events.iter().enumerate().skip(skip) {
        let cost = event.proof().map(|p| p.cost().to_string()).unwrap_or_else(|| "-".into());
        table.add_row(vec![
            i.to_string(),
            format_timestamp(event.created_at),
            event.kind().to_string(),
            event.coordinate().to_string(),
            cost,
            event.id.short(),
        ]);
    }

    println!("\nChain {label} ({} events, showing {})\n", events.len(), events.len() - skip);
    println!("{table}\n");
    Ok(())
}
