// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Movement proof runtime by LCA height.

use crate::home::Home;
use anyhow::bail;
use cyberspace_kernel::config::AXIS_BITS;
use cyberspace_kernel::movement::build_movement_proof;
use cyberspace_kernel::{Coordinate, Scalar};
use num_bigint::BigUint;
use std::time::{Duration, Instant};

/// Times proofs for heights `0..=max_height`, stopping at the first one slower than `timeout`.
///
/// Returns the measured `(height, duration)` pairs.
pub fn run(home: &Home, max_height: u32, timeout: Duration, target: Duration) -> anyhow::Result<Vec<(u32, Duration)>> {
    if max_height > AXIS_BITS {
        bail!("--max-height must be at most {AXIS_BITS}");
    }
    println!("bench: movement proof runtime by LCA height");
    println!("timeout={:?} target={:?}", timeout, target);
    println!("current default_max_lca_height={}", home.settings().default_max_lca_height);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let measured = runtime.block_on(measure(max_height, timeout));
    // An abandoned proof is still running on the blocking pool.
    runtime.shutdown_background();
    let results = measured?;

    let Some(&(best, elapsed)) = results.iter().min_by_key(|(_, d)| d.abs_diff(target)) else {
        bail!("no benchmark results");
    };
    println!("---");
    println!("optimal LCA height: {best} ({:.3}s)", elapsed.as_secs_f64());
    println!("persist:  cyberspace config set --max-lca-height {best}");
    println!("override: cyberspace move --max-lca-height {best} ...");
    Ok(results)
}

/// Each height proves `0 -> 2^h - 1` on every axis, which has LCA height `h`.
async fn measure(max_height: u32, timeout: Duration) -> anyhow::Result<Vec<(u32, Duration)>> {
    let mut results = Vec::new();
    for height in 0..=max_height {
        let far = Scalar::from_biguint((BigUint::from(1u8) << height as usize) - 1u8)?;
        let to = Coordinate::new(far.clone(), far.clone(), far);
        let job = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            build_movement_proof(&Coordinate::origin(), &to, height).map(|_| start.elapsed())
        });

        match tokio::time::timeout(timeout, job).await {
            Ok(joined) => {
                let elapsed = joined??;
                println!("lca_height={height}: {:.3}s", elapsed.as_secs_f64());
                results.push((height, elapsed));
            }
            Err(_) => {
                println!("lca_height={height}: >{:.0}s (cancelled)", timeout.as_secs_f64());
                break;
            }
        }
    }
    Ok(results)
}
