//! Data model - transactions and tamper-evident blocks

mod block;
mod transaction;

pub use block::*;
pub use transaction::*;
