//! SHA-256 hashing over canonically serialized values
//!
//! Every digest in the chain is SHA-256 rendered as 64 lowercase hex
//! characters. Structured payloads are serialized canonically (keys in
//! lexicographic order) before hashing so that two structurally equal
//! objects always hash identically, regardless of construction order.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::constants::PREIMAGE_SEPARATOR;

/// Anything that can contribute to a hash pre-image.
///
/// Raw strings and numbers are used as-is; JSON values are canonicalized
/// first.
#[derive(Debug, Clone)]
pub enum HashInput {
    Text(String),
    Number(u64),
    Structured(Value),
}

impl From<&str> for HashInput {
    fn from(s: &str) -> Self {
        HashInput::Text(s.to_string())
    }
}

impl From<String> for HashInput {
    fn from(s: String) -> Self {
        HashInput::Text(s)
    }
}

impl From<u64> for HashInput {
    fn from(n: u64) -> Self {
        HashInput::Number(n)
    }
}

impl From<&Value> for HashInput {
    fn from(v: &Value) -> Self {
        HashInput::Structured(v.clone())
    }
}

impl HashInput {
    fn render(&self) -> String {
        match self {
            HashInput::Text(s) => s.clone(),
            HashInput::Number(n) => n.to_string(),
            HashInput::Structured(v) => canonical_json(v),
        }
    }
}

/// Serialize a JSON value to its canonical textual form.
///
/// `serde_json`'s object map is BTreeMap-backed, so object keys come out
/// in lexicographic order at every nesting level. Compact separators.
pub fn canonical_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// SHA-256 of a raw string, as 64 lowercase hex characters.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// SHA-256 of a structured value after canonicalization.
pub fn sha256_hex_value(value: &Value) -> String {
    sha256_hex(&canonical_json(value))
}

/// Join heterogeneous parts into one deterministic pre-image string.
///
/// Parts are rendered (structured values canonically) and joined with
/// `"|"`. This is the string hashed into a block's hash.
pub fn combine(parts: &[HashInput]) -> String {
    parts
        .iter()
        .map(HashInput::render)
        .collect::<Vec<_>>()
        .join(PREIMAGE_SEPARATOR)
}

/// Recompute-and-compare helper.
pub fn verify(input: &str, expected: &str) -> bool {
    sha256_hex(input) == expected
}

/// Truncate a hash for display, appending `...` when shortened.
///
/// Display-only; never part of integrity logic.
pub fn truncate_hash(hash: &str, len: usize) -> String {
    if hash.len() <= len {
        return hash.to_string();
    }
    format!("{}...", &hash[..len])
}
