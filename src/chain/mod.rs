//! Chain module - the ordered block sequence and its operations

mod ledger;

pub use ledger::*;

use thiserror::Error;

use crate::validation::ValidationError;

/// Chain-level failures. Nothing here terminates the process; every
/// failure path hands a value back to the caller.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(ValidationError),
    #[error("invalid block: {0}")]
    InvalidBlock(ValidationError),
    #[error("invalid chain: {0}")]
    InvalidChain(ValidationError),
    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: u64 },
    #[error("no block at index {0}")]
    OutOfRange(u64),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed chain file: {0}")]
    Json(#[from] serde_json::Error),
}
