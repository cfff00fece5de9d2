// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::home::Home;
use crate::identity::{generate_identity, load_identity};
use anyhow::Context;
use cyberspace_chain::store::normalize_label;
use cyberspace_chain::{State, StateFile};
use cyberspace_kernel::Coordinate;

/// Creates an identity and a new chain, and makes that chain active.
///
/// Without `--at` the chain starts at the coordinate encoded by the public key.
pub fn run(home: &Home, from_key: Option<&str>, chain: Option<&str>, at: Option<&str>) -> anyhow::Result<()> {
    let identity = match from_key {
        Some(secret) => load_identity(secret)?,
        None => generate_identity(),
    };
    let coordinate = match at {
        Some(raw) => Coordinate::parse(raw).with_context(|| format!("parsing --at {raw:?}"))?,
        None => Coordinate::from_interleaved(identity.pubkey.as_bytes()),
    };
    let label = match chain {
        Some(label) => label.to_string(),
        None => format!("chain-{}", chrono::Utc::now().timestamp()),
    };

    let store = home.store()?;
    let genesis = store.create_chain(&label, identity.pubkey, coordinate)?;
    let label = normalize_label(&label)?;

    let pubkey = identity.pubkey;
    StateFile::create(home.state_path(), State::new(label.clone(), &genesis, identity))
        .with_context(|| format!("writing {}", home.state_path().display()))?;

    println!("pubkey:     {pubkey}");
    println!("chain:      {label}");
    println!("genesis:    {}", genesis.id);
    println!("coordinate: {}", genesis.coordinate());
    println!("coord_hex:  {}", genesis.coordinate().render_hex());
    Ok(())
}
