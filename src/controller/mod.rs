//! Controller - the surface the presentation layer talks to
//!
//! Wraps transaction validation and block append into single operations,
//! keeps all read paths snapshot-based, and fans out change events to
//! registered observers. The controller owns the chain it is given; there
//! is no hidden global instance.

mod observer;

pub use observer::*;

use serde_json::{json, Value};
use tracing::info;

use crate::chain::{Chain, ChainError, ChainStats};
use crate::model::Transaction;
use crate::validation::{transaction_pipeline, Pipeline};

pub struct Controller {
    chain: Chain,
    tx_rules: Pipeline<Value>,
    observers: ObserverRegistry,
}

impl Controller {
    /// Take ownership of an explicitly constructed chain.
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            tx_rules: transaction_pipeline(),
            observers: ObserverRegistry::new(),
        }
    }

    // --- observers ---

    pub fn register_observer(&mut self, callback: ObserverCallback) -> ObserverId {
        self.observers.register(callback)
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    // --- writes ---

    /// Validate the transaction fields, then mint and append a block
    /// carrying the transaction payload. All-or-nothing: on any failure
    /// the chain is unchanged and no observer fires.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: f64,
        memo: &str,
    ) -> Result<String, ChainError> {
        let candidate = json!({
            "sender": sender,
            "receiver": receiver,
            "amount": amount,
            "memo": memo,
        });
        self.tx_rules
            .run(&candidate)
            .map_err(ChainError::InvalidTransaction)?;

        let tx = Transaction::new(sender, receiver, amount, memo)
            .map_err(ChainError::InvalidTransaction)?;

        let index = self.chain.append(tx.to_value())?;
        self.observers.notify(&ChainEvent::BlockAppended { index });
        Ok(format!("block {index} appended"))
    }

    /// Append a block with an arbitrary structured payload.
    pub fn submit_raw_block(&mut self, payload: Value) -> Result<String, ChainError> {
        let index = self.chain.append(payload)?;
        self.observers.notify(&ChainEvent::BlockAppended { index });
        Ok(format!("block {index} appended"))
    }

    /// DEMONSTRATION ONLY: overwrite one block's payload with a canned
    /// tampered record, leaving its hash stale. The chain stays marked
    /// valid until `validate` is called.
    pub fn simulate_attack(&mut self, index: u64) -> Result<String, ChainError> {
        let tampered = json!({
            "message": "DATA TAMPERED",
            "attacker": "Mallory",
            "note": "payload was rewritten without rehashing to demonstrate detectability",
        });

        if !self.chain.corrupt_block(index, tampered) {
            return Err(ChainError::OutOfRange(index));
        }

        self.observers.notify(&ChainEvent::BlockCorrupted { index });
        Ok(format!("block {index} tampered; the chain is now invalid"))
    }

    /// Drop everything back to a fresh genesis block.
    pub fn reset(&mut self) -> Result<String, ChainError> {
        self.chain.reset();
        self.observers.notify(&ChainEvent::Reset);
        Ok("chain reset to genesis".to_string())
    }

    // --- boundary i/o ---

    pub fn export(&self, path: &std::path::Path) -> Result<String, ChainError> {
        self.chain.export_json(path)?;
        Ok(format!("chain exported to {}", path.display()))
    }

    pub fn import(&mut self, path: &std::path::Path) -> Result<String, ChainError> {
        let blocks = self.chain.import_json(path)?;
        self.observers.notify(&ChainEvent::Imported { blocks });
        Ok(format!("chain imported from {}", path.display()))
    }

    // --- reads (immutable snapshots) ---

    /// Every block in record form, chain order.
    pub fn get_chain(&self) -> Vec<Value> {
        self.chain.records()
    }

    /// Integrity report. An invalid chain is a finding, not a failure of
    /// the call, so this returns a status pair rather than an error.
    pub fn validate(&self) -> (bool, String) {
        match self.chain.verify() {
            Ok(()) => {
                info!(blocks = self.chain.len(), "chain validated");
                (true, format!("chain of {} blocks is valid", self.chain.len()))
            }
            Err(e) => (false, e.to_string()),
        }
    }

    pub fn stats(&self) -> ChainStats {
        self.chain.stats()
    }

    pub fn search(&self, text: &str) -> Vec<Value> {
        self.chain
            .search(text)
            .into_iter()
            .map(|b| b.to_record())
            .collect()
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}
