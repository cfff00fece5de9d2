// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::new_table;
use crate::home::Home;
use anyhow::Context;
use cyberspace_kernel::Coordinate;

/// Saves `coord` as a target and makes it current.
pub fn set(home: &Home, coord: &str, label: Option<&str>) -> anyhow::Result<()> {
    let coordinate = Coordinate::parse(coord).with_context(|| format!("parsing target {coord:?}"))?;
    let mut state = home.require_state()?;
    let label = state.set_target(coordinate.clone(), label)?;
    println!("active_target: {label}");
    println!("coordinate:    {coordinate}");
    Ok(())
}

pub fn use_target(home: &Home, label: &str) -> anyhow::Result<()> {
    let mut state = home.require_state()?;
    let target = state.use_target(label)?;
    println!("active_target: {}", target.label);
    println!("coordinate:    {}", target.coordinate);
    Ok(())
}

pub fn list(home: &Home) -> anyhow::Result<()> {
    let state = home.require_state()?;
    if state.targets().is_empty() {
        println!("(no targets yet)");
        return Ok(());
    }
    let active = state.current_target().map(|t| t.label.clone());
    let mut table = new_table(vec!["", "Label", "Coordinate"]);
    for target in state.targets() {
        let marker = if active.as_deref() == Some(target.label.as_str()) { "*" } else { "" };
        table.add_row(vec![marker.to_string(), target.label.clone(), target.coordinate.to_string()]);
    }
    println!("{table}");
    Ok(())
}
