// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::home::Home;
use anyhow::{anyhow, bail, Context};
use cyberspace_chain::{CancelToken, ChainError, HopProgress, Navigator, TowardStatus};
use cyberspace_kernel::event::Event;
use cyberspace_kernel::toward::StepPolicy;
use cyberspace_kernel::{Coordinate, Delta, KernelError};
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct MoveArgs<'a> {
    pub by: Option<&'a str>,
    pub to: Option<&'a str>,
    pub toward: Option<&'a str>,
    /// Overrides the persisted default ceiling.
    pub max_lca_height: Option<u32>,
    /// 0 means unlimited.
    pub max_hops: u64,
    pub strict: bool,
}

enum Destination {
    By(Delta),
    To(Coordinate),
    Toward(Coordinate),
}

/// Moves the active chain and reports how the move ended.
///
/// Single hops always end `Arrived`; only `--toward` can stop early.
pub fn run(home: &Home, args: &MoveArgs<'_>, cancel: &CancelToken) -> anyhow::Result<TowardStatus> {
    let store = home.store()?;
    let mut state = home.reconciled_state(&store)?;
    let destination = resolve_destination(args, &state)?;
    let ceiling = args.max_lca_height.unwrap_or_else(|| home.settings().default_max_lca_height);
    let label = state.state().active_chain.clone();
    let author = state.state().identity.pubkey;

    let mut nav = Navigator::new(&store, &label, author)?.with_checkpoint(&mut state);
    match destination {
        Destination::By(delta) => {
            let event = nav.plan_and_execute_delta(&delta, ceiling).map_err(explain)?;
            print_hop(1, &event);
            Ok(TowardStatus::Arrived)
        }
        Destination::To(target) => {
            let event = nav.plan_and_execute_absolute(&target, ceiling).map_err(explain)?;
            print_hop(1, &event);
            Ok(TowardStatus::Arrived)
        }
        Destination::Toward(target) => {
            let policy = if args.strict { StepPolicy::Strict } else { StepPolicy::BoundaryBump };
            let outcome = nav
                .plan_toward(&target, ceiling, policy, args.max_hops, cancel, |progress: &HopProgress<'_>| {
                    print_hop(progress.hop, progress.event);
                    if !progress.bumped.is_empty() {
                        println!("  crossed block edge on {:?} at height {}", progress.bumped, progress.limit);
                    }
                })
                .map_err(explain)?;
            match outcome.status {
                TowardStatus::Arrived => println!("arrived at {} after {} hop(s)", outcome.coordinate, outcome.hops),
                TowardStatus::HopLimit => {
                    println!("stopped at {} after {} hop(s) (--max-hops); run again to continue", outcome.coordinate, outcome.hops)
                }
                TowardStatus::Cancelled => {
                    println!("interrupted at {} after {} hop(s); run again to resume", outcome.coordinate, outcome.hops)
                }
            }
            Ok(outcome.status)
        }
    }
}

fn resolve_destination(args: &MoveArgs<'_>, state: &cyberspace_chain::StateFile) -> anyhow::Result<Destination> {
    let given = [args.by, args.to, args.toward].iter().filter(|a| a.is_some()).count();
    if given > 1 {
        bail!("specify exactly one of --by, --to or --toward");
    }
    if let Some(raw) = args.by {
        return Ok(Destination::By(Delta::parse(raw).with_context(|| format!("parsing --by {raw:?}"))?));
    }
    if let Some(raw) = args.to {
        return Ok(Destination::To(Coordinate::parse(raw).with_context(|| format!("parsing --to {raw:?}"))?));
    }
    if let Some(raw) = args.toward {
        return Ok(Destination::Toward(Coordinate::parse(raw).with_context(|| format!("parsing --toward {raw:?}"))?));
    }
    match state.current_target() {
        Some(target) => {
            println!("moving toward target {} at {}", target.label, target.coordinate);
            Ok(Destination::Toward(target.coordinate.clone()))
        }
        None => bail!("specify one of --by, --to or --toward (or set a target with `cyberspace target set`)"),
    }
}

fn explain(err: ChainError) -> anyhow::Error {
    match &err {
        ChainError::Kernel(KernelError::CostExceeded { height, .. }) => {
            anyhow!("{err}; take smaller steps or rerun with --max-lca-height {height}")
        }
        _ => err.into(),
    }
}

fn print_hop(n: u64, event: &Event) {
    let cost = event.proof().map(|p| p.cost().to_string()).unwrap_or_default();
    println!("hop {n}: {} [{}] lca {}", event.coordinate(), event.id.short(), cost);
}

/// Token cancelled by the first Ctrl-C, watched from a helper thread.
pub fn cancel_on_interrupt() -> CancelToken {
    let token = CancelToken::new();
    let flag = token.clone();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "cannot watch for Ctrl-C");
                return;
            }
        };
        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; stopping after the current hop");
                flag.cancel();
            }
        });
    });
    token
}
