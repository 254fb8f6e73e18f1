//! Chainproof core library
//!
//! An in-memory, append-only, hash-linked chain built to demonstrate
//! hash-chaining and tamper detection. Blocks are bound to their
//! predecessor by SHA-256; a deliberately-unsafe corruption operation
//! breaks a block on purpose so validation can catch it.
//!
//! This is a teaching engine, not a ledger: no consensus, no networking,
//! no proof-of-work, no persistent storage beyond the JSON export.

pub mod chain;
pub mod controller;
pub mod crypto;
pub mod model;
pub mod validation;

/// Shared constants
pub mod constants {
    /// Sentinel previous-hash of the genesis block
    pub const GENESIS_PREVIOUS_HASH: &str = "0";

    /// Message field of the genesis sentinel payload
    pub const GENESIS_MESSAGE: &str = "Genesis block";

    /// Description field of the genesis sentinel payload
    pub const GENESIS_DESCRIPTION: &str = "First block of the chain";

    /// Separator joining block fields into the hash pre-image
    pub const PREIMAGE_SEPARATOR: &str = "|";

    /// Hex characters kept when truncating a hash for display
    pub const DISPLAY_HASH_LEN: usize = 16;
}
