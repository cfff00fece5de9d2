// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain events.
//!
//! Every chain is a singly linked list of `Event`s: one genesis followed by hops.
//!
//! # Invariants
//! - `id` is the SHA-256 of the canonical bincode preimage
//!   `(EVENT_FORMAT_VERSION, pubkey, created_at, prev, body)`.
//! - The signature is outside the preimage, so signing later never changes the id.
//! - Events are immutable once built; signing returns a new value.

use crate::config::EVENT_FORMAT_VERSION;
use crate::error::{KernelError, Result};
use crate::movement::MovementProof;
use crate::types::{Coordinate, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type EventId = Digest;

/// 32-byte author public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn from_hex(s: &str) -> Result<Self> {
        let raw = hex::decode(s.trim()).map_err(|e| KernelError::Parse(format!("invalid public key hex: {e}")))?;
        if raw.len() != 32 {
            return Err(KernelError::Parse(format!("public key must be 32 bytes, got {}", raw.len())));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&raw);
        Ok(PublicKey(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Signing happens at publish time, outside this crate. Until then an event is
/// `Unsigned`, which is a valid stored state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Signature {
    #[default]
    Unsigned,
    Signed(Vec<u8>),
}

impl Signature {
    pub fn is_signed(&self) -> bool {
        matches!(self, Signature::Signed(_))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            Signature::Unsigned => serializer.serialize_none(),
            Signature::Signed(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        // Older files store pending signatures as "".
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Signature::Unsigned),
            Some(s) if s.is_empty() => Ok(Signature::Unsigned),
            Some(s) => hex::decode(&s).map(Signature::Signed).map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPayload {
    pub coordinate: Coordinate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopPayload {
    /// Id of the chain's genesis event.
    pub genesis: EventId,
    pub coordinate: Coordinate,
    pub proof: MovementProof,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum EventBody {
    Genesis(GenesisPayload),
    Hop(HopPayload),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub pubkey: PublicKey,
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<EventId>,
    #[serde(flatten)]
    pub body: EventBody,
    #[serde(default)]
    pub sig: Signature,
}

impl Event {
    pub fn genesis(pubkey: PublicKey, created_at: u64, coordinate: Coordinate) -> Result<Event> {
        Self::seal(pubkey, created_at, None, EventBody::Genesis(GenesisPayload { coordinate }))
    }

    pub fn hop(
        pubkey: PublicKey,
        created_at: u64,
        prev: EventId,
        genesis: EventId,
        coordinate: Coordinate,
        proof: MovementProof,
    ) -> Result<Event> {
        let body = EventBody::Hop(HopPayload { genesis, coordinate, proof });
        Self::seal(pubkey, created_at, Some(prev), body)
    }

    fn seal(pubkey: PublicKey, created_at: u64, prev: Option<EventId>, body: EventBody) -> Result<Event> {
        let id = content_id(&pubkey, created_at, prev.as_ref(), &body)?;
        Ok(Event { id, pubkey, created_at, prev, body, sig: Signature::Unsigned })
    }

    /// Recomputes the id from content.
    pub fn compute_id(&self) -> Result<EventId> {
        content_id(&self.pubkey, self.created_at, self.prev.as_ref(), &self.body)
    }

    pub fn verify_id(&self) -> bool {
        matches!(self.compute_id(), Ok(id) if id == self.id)
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self.body, EventBody::Genesis(_))
    }

    pub fn kind(&self) -> &'static str {
        match self.body {
            EventBody::Genesis(_) => "genesis",
            EventBody::Hop(_) => "hop",
        }
    }

    /// Coordinate this event leaves the chain at.
    pub fn coordinate(&self) -> &Coordinate {
        match &self.body {
            EventBody::Genesis(p) => &p.coordinate,
            EventBody::Hop(p) => &p.coordinate,
        }
    }

    pub fn proof(&self) -> Option<&MovementProof> {
        match &self.body {
            EventBody::Genesis(_) => None,
            EventBody::Hop(p) => Some(&p.proof),
        }
    }

    /// Genesis id this event belongs to; a genesis event points at itself.
    pub fn genesis_id(&self) -> EventId {
        match &self.body {
            EventBody::Genesis(_) => self.id,
            EventBody::Hop(p) => p.genesis,
        }
    }

    /// Copy of this event carrying `sig`; every other field is untouched.
    pub fn attach_signature(&self, sig: Vec<u8>) -> Result<Event> {
        if self.sig.is_signed() {
            return Err(KernelError::AlreadySigned);
        }
        if sig.is_empty() {
            return Err(KernelError::Encoding("empty signature".into()));
        }
        Ok(Event { sig: Signature::Signed(sig), ..self.clone() })
    }
}

fn content_id(pubkey: &PublicKey, created_at: u64, prev: Option<&EventId>, body: &EventBody) -> Result<EventId> {
    let preimage = (EVENT_FORMAT_VERSION, pubkey, created_at, prev, body);
    let bytes = bincode::serde::encode_to_vec(&preimage, bincode::config::standard())
        .map_err(|e| KernelError::Encoding(e.to_string()))?;
    Ok(Digest::sha256(&bytes))
}
