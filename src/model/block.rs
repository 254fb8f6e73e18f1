//! Tamper-evident block
//!
//! A block binds an arbitrary payload to its predecessor through a
//! SHA-256 hash over its own fields. The hash is computed exactly once at
//! construction and recomputed only on demand for validation, so a
//! deliberately corrupted block keeps its stale hash until someone checks.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::constants::{
    DISPLAY_HASH_LEN, GENESIS_DESCRIPTION, GENESIS_MESSAGE, GENESIS_PREVIOUS_HASH,
};
use crate::crypto::{combine, sha256_hex, truncate_hash, verify, HashInput};
use crate::validation::ValidationError;

/// One record in the chain. Fields are module-private; all external
/// access goes through accessors, and the payload is only writable
/// through the clearly-named corruption path.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    index: u64,
    created_at: DateTime<Utc>,
    payload: Value,
    previous_hash: String,
    hash: String,
    nonce: u64,
}

impl Block {
    /// Mint a block: stamp the current time, compute the hash, done.
    /// Cannot fail for well-formed inputs.
    pub fn new(index: u64, payload: Value, previous_hash: impl Into<String>) -> Self {
        Self::with_timestamp(index, Utc::now(), payload, previous_hash.into(), 0)
    }

    /// The fixed first block: index 0, sentinel payload, previous_hash "0".
    pub fn genesis() -> Self {
        let payload = json!({
            "message": GENESIS_MESSAGE,
            "description": GENESIS_DESCRIPTION,
        });
        debug!("creating genesis block");
        Self::new(0, payload, GENESIS_PREVIOUS_HASH)
    }

    fn with_timestamp(
        index: u64,
        created_at: DateTime<Utc>,
        payload: Value,
        previous_hash: String,
        nonce: u64,
    ) -> Self {
        let mut block = Self {
            index,
            created_at,
            payload,
            previous_hash,
            hash: String::new(),
            nonce,
        };
        block.hash = block.compute_hash();
        debug!(
            index,
            hash = %truncate_hash(&block.hash, DISPLAY_HASH_LEN),
            "block created"
        );
        block
    }

    /// The pre-image string hashed into this block's hash.
    fn preimage(&self) -> String {
        combine(&[
            HashInput::Number(self.index),
            HashInput::Text(self.created_at.to_rfc3339()),
            HashInput::Structured(self.payload.clone()),
            HashInput::Text(self.previous_hash.clone()),
            HashInput::Number(self.nonce),
        ])
    }

    /// Hash the current field values. Pure; does not touch `self.hash`.
    pub fn compute_hash(&self) -> String {
        sha256_hex(&self.preimage())
    }

    /// Recompute the hash from current fields and compare against the
    /// stored one.
    pub fn self_validate(&self) -> bool {
        let ok = verify(&self.preimage(), &self.hash);
        if !ok {
            warn!(index = self.index, "block hash does not match its contents");
        }
        ok
    }

    /// DEMONSTRATION ONLY: overwrite the payload WITHOUT recomputing the
    /// hash, leaving the block internally inconsistent. This is the one
    /// supported way to simulate tampering; nothing else mutates a block.
    pub fn corrupt_payload(&mut self, new_payload: Value) {
        warn!(
            index = self.index,
            "overwriting block payload without rehashing (simulated tampering)"
        );
        self.payload = new_payload;
    }

    /// Serialize to the export record form. Includes the stored hash as-is,
    /// stale or not.
    pub fn to_record(&self) -> Value {
        json!({
            "index": self.index,
            "created_at": self.created_at.to_rfc3339(),
            "payload": self.payload,
            "previous_hash": self.previous_hash,
            "hash": self.hash,
            "nonce": self.nonce,
        })
    }

    /// Rebuild a block from its record form.
    ///
    /// The stored hash is restored verbatim, never recomputed: importing a
    /// corrupted block must not silently repair it.
    pub fn from_record(record: &Value) -> Result<Self, ValidationError> {
        let index = field(record, "index")?
            .as_u64()
            .ok_or(ValidationError::InvalidIndex)?;
        let created_at = field(record, "created_at")?
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .ok_or(ValidationError::InvalidTimestamp("created_at"))?;
        let payload = field(record, "payload")?.clone();
        let previous_hash = string_field(record, "previous_hash")?;
        let hash = string_field(record, "hash")?;
        let nonce = record.get("nonce").and_then(Value::as_u64).unwrap_or(0);

        Ok(Self {
            index,
            created_at,
            payload,
            previous_hash,
            hash,
            nonce,
        })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

fn field<'a>(record: &'a Value, name: &'static str) -> Result<&'a Value, ValidationError> {
    record
        .get(name)
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))
}

fn string_field(record: &Value, name: &'static str) -> Result<String, ValidationError> {
    field(record, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block #{} [hash: {}]",
            self.index,
            truncate_hash(&self.hash, DISPLAY_HASH_LEN)
        )
    }
}
