// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::new_table;
use crate::home::Home;
use anyhow::Context;
use cyberspace_chain::StateFile;

pub fn list(home: &Home) -> anyhow::Result<()> {
    let store = home.store()?;
    let active = StateFile::load(home.state_path())?.map(|s| s.state().active_chain.clone());
    let labels = store.list_labels()?;
    if labels.is_empty() {
        println!("(no chains yet; run `cyberspace spawn`)");
        return Ok(());
    }

    let mut table = new_table(vec!["", "Chain", "Events", "Coordinate"]);
    for label in labels {
        let marker = if active.as_deref() == Some(label.as_str()) { "*" } else { "" };
        // A damaged file should not hide the rest of the listing.
        let (events, coordinate) = match (store.length(&label), store.tip(&label)) {
            (Ok(len), Ok(tip)) => (len.to_string(), tip.coordinate().to_string()),
            (_, Err(e)) | (Err(e), _) => ("?".to_string(), e.to_string()),
        };
        table.add_row(vec![marker.to_string(), label, events, coordinate]);
    }
    println!("{table}");
    Ok(())
}

/// Makes `label` the active chain.
pub fn use_chain(home: &Home, label: &str) -> anyhow::Result<()> {
    let store = home.store()?;
    let mut state = home.require_state()?;
    state.switch_chain(&store, label).with_context(|| format!("switching to chain {label:?}"))?;
    println!("active_chain: {}", state.state().active_chain);
    println!("coordinate:   {}", state.state().coordinate);
    Ok(())
}

pub fn status(home: &Home) -> anyhow::Result<()> {
    let store = home.store()?;
    let state = home.reconciled_state(&store)?;
    let current = state.state();
    let length = store.length(&current.active_chain)?;

    println!("active_chain: {}", current.active_chain);
    println!("events:       {length}");
    println!("tip:          {}", current.tip);
    println!("coordinate:   {}", current.coordinate);
    println!("coord_hex:    {}", current.coordinate.render_hex());
    println!("pubkey:       {}", current.identity.pubkey);
    if let Some(target) = state.current_target() {
        println!("target:       {} {}", target.label, target.coordinate);
    }
    Ok(())
}
