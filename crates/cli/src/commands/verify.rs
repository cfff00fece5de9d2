// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::new_table;
use crate::home::Home;
use cyberspace_chain::ChainReceipt;
use cyberspace_kernel::replay::ChainFault;

/// Audits a chain end to end. Returns `false` if any fault was found.
///
/// Hops taller than `max_height` (default: the configured ceiling) are
/// reported instead of verified.
pub fn run(home: &Home, chain: Option<&str>, max_height: Option<u32>) -> anyhow::Result<bool> {
    let store = match max_height {
        Some(limit) => home.store_verifying(limit)?,
        None => home.store()?,
    };
    let label = match chain {
        Some(label) => label.to_string(),
        None => home.require_state()?.state().active_chain.clone(),
    };

    let report = store.audit(&label)?;
    println!("chain:      {}", report.label);
    println!("events:     {}", report.events);
    if let Some(coordinate) = &report.coordinate {
        println!("coordinate: {coordinate}");
    }

    if !report.is_clean() {
        let mut table = new_table(vec!["Line", "Fault"]);
        for fault in &report.faults {
            table.add_row(vec![fault.line.to_string(), fault.fault.to_string()]);
        }
        println!("\n{} fault(s)\n", report.faults.len());
        println!("{table}\n");
        let tallest = report
            .faults
            .iter()
            .filter_map(|f| match f.fault {
                ChainFault::ProofTooTall { height, .. } => Some(height),
                _ => None,
            })
            .max();
        if let Some(height) = tallest {
            println!("some hops were not verified; rerun with --max-verify-height {height} to check them");
        }
        return Ok(false);
    }

    let receipt = ChainReceipt::issue(&store, &label)?;
    println!("status:     OK\n");
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(true)
}
