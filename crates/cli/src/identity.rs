// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ed25519 author identities.

use anyhow::{bail, Context};
use cyberspace_chain::Identity;
use cyberspace_kernel::event::PublicKey;
use ed25519_dalek::SigningKey;

/// Fresh keypair from OS randomness.
pub fn generate_identity() -> Identity {
    let mut rng = rand::rngs::OsRng;
    identity_of(&SigningKey::generate(&mut rng))
}

/// Rebuilds an identity from a 32-byte hex secret.
pub fn load_identity(secret_hex: &str) -> anyhow::Result<Identity> {
    let raw = hex::decode(secret_hex.trim()).context("secret key is not valid hex")?;
    let Ok(secret) = <[u8; 32]>::try_from(raw.as_slice()) else {
        bail!("secret key must be 32 bytes, got {}", raw.len());
    };
    Ok(identity_of(&SigningKey::from_bytes(&secret)))
}

fn identity_of(key: &SigningKey) -> Identity {
    Identity { pubkey: PublicKey(key.verifying_key().to_bytes()), secret: hex::encode(key.to_bytes()) }
}
