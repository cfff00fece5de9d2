// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use cyberspace_chain::{CancelToken, TowardStatus};
use cyberspace_cli::commands::{bench, cantor, chain, config, history, movement, spawn, target, verify};
use cyberspace_cli::telemetry::init_telemetry;
use cyberspace_cli::Home;
use cyberspace_kernel::config::DEBUG_TREE_HEIGHT;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cyberspace")]
#[command(about = "Cyberspace movement chains: hash-chained hops with Cantor subtree proofs", long_about = None)]
struct Cli {
    /// State directory (default: ~/.cyberspace)
    #[arg(long, global = true, env = "CYBERSPACE_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an identity and a new chain at its spawn coordinate
    Spawn {
        /// Reuse a 32-byte hex secret key instead of generating one
        #[arg(long)]
        from_key: Option<String>,

        /// Chain label (default: chain-<unix time>)
        #[arg(long)]
        chain: Option<String>,

        /// Start here instead of the key-derived coordinate
        #[arg(long)]
        at: Option<String>,
    },
    /// Append hop(s) to the active chain.
    /// With no destination, travels toward the current target.
    Move {
        /// Relative move, "dx,dy,dz"
        #[arg(long, allow_hyphen_values = true)]
        by: Option<String>,

        /// Absolute destination, one hop
        #[arg(long)]
        to: Option<String>,

        /// Absolute destination, as many hops as needed
        #[arg(long)]
        toward: Option<String>,

        /// Per-axis LCA height ceiling (default: from config)
        #[arg(long)]
        max_lca_height: Option<u32>,

        /// Stop --toward after this many hops (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_hops: u64,

        /// Never exceed the ceiling, even to cross a block edge
        #[arg(long)]
        strict: bool,
    },
    /// List events of a chain
    History {
        /// Chain label (default: active chain)
        #[arg(long)]
        chain: Option<String>,

        #[arg(long, short, default_value_t = 50)]
        limit: usize,

        /// One JSON event per line
        #[arg(long)]
        json: bool,
    },
    /// Manage chains
    Chain {
        #[command(subcommand)]
        command: ChainCommands,
    },
    /// Replay and check every link and proof, then print a receipt
    Verify {
        /// Chain label (default: active chain)
        label: Option<String>,

        /// Tallest hop to verify (default: the configured max LCA height)
        #[arg(long)]
        max_verify_height: Option<u32>,
    },
    /// Show the Cantor subtrees and digests for a movement
    Cantor {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Tallest subtree whose levels are listed
        #[arg(long, default_value_t = DEBUG_TREE_HEIGHT)]
        max_height: u32,

        /// Refuse proofs taller than this
        #[arg(long, default_value_t = cyberspace_kernel::config::DEFAULT_MAX_LCA_HEIGHT)]
        max_compute_height: u32,
    },
    /// Show or change persisted settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage saved destinations
    Target {
        #[command(subcommand)]
        command: TargetCommands,
    },
    /// Time movement proofs by LCA height
    Bench {
        #[arg(long, default_value_t = 22)]
        max_height: u32,

        /// Seconds before a single height is abandoned
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Seconds a comfortable interactive hop should take
        #[arg(long, default_value_t = 2.0)]
        target: f64,
    },
}

#[derive(Subcommand)]
enum ChainCommands {
    List,
    /// Make LABEL the active chain
    Use { label: String },
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    Set {
        #[arg(long)]
        max_lca_height: Option<u32>,
    },
}

#[derive(Subcommand)]
enum TargetCommands {
    /// Save COORD and make it the current target
    Set {
        coord: String,

        #[arg(long)]
        label: Option<String>,
    },
    /// Select a saved target
    Use { label: String },
    List,
}

fn main() -> anyhow::Result<ExitCode> {
    init_telemetry();
    let cli = Cli::parse();
    let home = Home::resolve(cli.home)?;

    match cli.command {
        Commands::Spawn { from_key, chain, at } => {
            spawn::run(&home, from_key.as_deref(), chain.as_deref(), at.as_deref())?;
        }
        Commands::Move { by, to, toward, max_lca_height, max_hops, strict } => {
            let args = movement::MoveArgs {
                by: by.as_deref(),
                to: to.as_deref(),
                toward: toward.as_deref(),
                max_lca_height,
                max_hops,
                strict,
            };
            // Only multi-hop travel can be interrupted between hops.
            let cancel = if by.is_none() && to.is_none() {
                movement::cancel_on_interrupt()
            } else {
                CancelToken::new()
            };
            if movement::run(&home, &args, &cancel)? == TowardStatus::Cancelled {
                return Ok(ExitCode::from(130));
            }
        }
        Commands::History { chain, limit, json } => history::run(&home, chain.as_deref(), limit, json)?,
        Commands::Chain { command } => match command {
            ChainCommands::List => chain::list(&home)?,
            ChainCommands::Use { label } => chain::use_chain(&home, &label)?,
            ChainCommands::Status => chain::status(&home)?,
        },
        Commands::Verify { label, max_verify_height } => {
            if !verify::run(&home, label.as_deref(), max_verify_height)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Cantor { from, to, max_height, max_compute_height } => {
            cantor::run(&from, &to, max_height, max_compute_height)?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config::show(&home)?,
            ConfigCommands::Set { max_lca_height } => config::set(&home, max_lca_height)?,
        },
        Commands::Target { command } => match command {
            TargetCommands::Set { coord, label } => target::set(&home, &coord, label.as_deref())?,
            TargetCommands::Use { label } => target::use_target(&home, &label)?,
            TargetCommands::List => target::list(&home)?,
        },
        Commands::Bench { max_height, timeout, target } => {
            let target = Duration::try_from_secs_f64(target).unwrap_or(Duration::from_secs(2));
            bench::run(&home, max_height, Duration::from_secs(timeout), target)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
