//! Validation module - rule pipelines for transactions, blocks, and chains
//!
//! Pure rule functions composed into ordered pipelines with early exit on
//! the first failure. Pipelines check shape and linkage; cryptographic
//! correctness of a block's stored hash is the block's own concern
//! (`Block::self_validate`).

mod pipeline;
mod rules;

pub use pipeline::*;
pub use rules::*;

use thiserror::Error;

/// Validation errors; every message names the offending field or index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be a structured record")]
    NotARecord(&'static str),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("field '{0}' must not be empty")]
    EmptyField(String),
    #[error("amount must be a valid number")]
    AmountNotNumeric,
    #[error("amount must be greater than zero")]
    AmountNotPositive,
    #[error("block index must be a non-negative integer")]
    InvalidIndex,
    #[error("field '{0}' is not a valid ISO-8601 timestamp")]
    InvalidTimestamp(&'static str),
    #[error("block hash must not be empty")]
    EmptyHash,
    #[error("chain is empty")]
    EmptyChain,
    #[error("first block must have index 0")]
    GenesisIndex,
    #[error("genesis block must have previous_hash \"0\"")]
    GenesisPreviousHash,
    #[error("wrong index at block {0}")]
    IndexMismatch(usize),
    #[error("chain broken at block {0}: previous_hash does not match")]
    LinkMismatch(usize),
}
