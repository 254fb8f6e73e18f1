//! The chain manager
//!
//! Single ownership point for the ordered block sequence. The chain is an
//! explicitly constructed value: whoever composes the application owns it
//! and threads it through the controller. Appends are validated before
//! acceptance; the only way to break the chain is the clearly-named
//! corruption path used for the tamper demo.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::ChainError;
use crate::model::Block;
use crate::validation::{block_pipeline, chain_pipeline, Pipeline};
use crate::crypto::canonical_json;

/// The ordered, hash-linked block sequence. Never empty: construction
/// inserts the genesis block and `reset` restores that state.
pub struct Chain {
    blocks: Vec<Block>,
    block_rules: Pipeline<Value>,
    chain_rules: Pipeline<[Value]>,
}

/// Read-only derived view of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of blocks, genesis included
    pub count: usize,
    /// Byte length of the compact canonical export
    pub size_bytes: usize,
    /// Elapsed seconds between first and last block over (count - 1);
    /// 0.0 when the chain holds a single block
    pub mean_interval_seconds: f64,
    /// Whether `verify` currently passes
    pub is_valid: bool,
}

impl Chain {
    /// Create a chain holding only a fresh genesis block.
    pub fn new() -> Self {
        let chain = Self {
            blocks: vec![Block::genesis()],
            block_rules: block_pipeline(),
            chain_rules: chain_pipeline(),
        };
        info!("chain initialized with genesis block");
        chain
    }

    /// Mint and append one block carrying `payload`.
    ///
    /// The new block is linked to the current tip and checked against the
    /// block rules before acceptance; on rejection the chain is untouched.
    /// Returns the new block's index.
    pub fn append(&mut self, payload: Value) -> Result<u64, ChainError> {
        let tip = self.tip();
        let index = tip.index() + 1;
        let block = Block::new(index, payload, tip.hash());

        self.block_rules
            .run(&block.to_record())
            .map_err(ChainError::InvalidBlock)?;

        self.blocks.push(block);
        info!(index, "block appended");
        Ok(index)
    }

    /// Check every block's own hash first (payload corruption), then the
    /// whole-chain structure (linkage breaks). Block-level failures take
    /// precedence in the report. Read-only and idempotent.
    pub fn verify(&self) -> Result<(), ChainError> {
        for block in &self.blocks {
            if !block.self_validate() {
                return Err(ChainError::HashMismatch {
                    index: block.index(),
                });
            }
        }

        let records = self.records();
        self.chain_rules
            .run(&records)
            .map_err(ChainError::InvalidChain)
    }

    /// Case-insensitive substring search over each block's canonical
    /// payload serialization, in chain order.
    pub fn search(&self, text: &str) -> Vec<&Block> {
        let needle = text.to_lowercase();
        let matches: Vec<&Block> = self
            .blocks
            .iter()
            .filter(|b| canonical_json(b.payload()).to_lowercase().contains(&needle))
            .collect();
        debug!(text, count = matches.len(), "search completed");
        matches
    }

    /// Block at `index`, if any.
    pub fn get(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    /// The newest block. The chain is never empty.
    pub fn tip(&self) -> &Block {
        self.blocks.last().expect("chain always holds genesis")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Record snapshots of every block, in chain order.
    pub fn records(&self) -> Vec<Value> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    /// Write the chain as a 2-space-indented UTF-8 JSON array of records.
    pub fn export_json(&self, path: &Path) -> Result<(), ChainError> {
        let records = self.records();
        let text = serde_json::to_string_pretty(&records)?;
        fs::write(path, text)?;
        info!(path = %path.display(), blocks = records.len(), "chain exported");
        Ok(())
    }

    /// Replace the chain with the contents of a previously exported file.
    ///
    /// The incoming record list is validated with the chain rules before
    /// anything is swapped: on any failure (I/O, parse, structure) the
    /// in-memory chain is left exactly as it was. Stale hashes on
    /// corrupted blocks survive the trip untouched.
    pub fn import_json(&mut self, path: &Path) -> Result<usize, ChainError> {
        let text = fs::read_to_string(path)?;
        let records: Vec<Value> = serde_json::from_str(&text)?;

        if let Err(e) = self.chain_rules.run(&records) {
            error!(path = %path.display(), %e, "import rejected");
            return Err(ChainError::InvalidChain(e));
        }

        let blocks = records
            .iter()
            .map(Block::from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ChainError::InvalidChain)?;

        self.blocks = blocks;
        info!(path = %path.display(), blocks = self.blocks.len(), "chain imported");
        Ok(self.blocks.len())
    }

    /// DEMONSTRATION ONLY: overwrite the payload of the block at `index`
    /// without rehashing. Returns false when out of range. Never triggers
    /// re-validation; call `verify` afterward to observe the break.
    pub fn corrupt_block(&mut self, index: u64, new_payload: Value) -> bool {
        match self.blocks.get_mut(index as usize) {
            Some(block) => {
                block.corrupt_payload(new_payload);
                warn!(index, "simulated attack: block payload overwritten");
                true
            }
            None => false,
        }
    }

    /// Truncate back to a single fresh genesis block. Irreversible; no
    /// backup is kept.
    pub fn reset(&mut self) {
        warn!("resetting chain to genesis");
        self.blocks = vec![Block::genesis()];
    }

    /// Derived, read-only statistics.
    pub fn stats(&self) -> ChainStats {
        let records = self.records();
        let size_bytes = canonical_json(&Value::Array(records)).len();

        let mean_interval_seconds = if self.blocks.len() > 1 {
            let first = self.blocks[0].created_at();
            let last = self.tip().created_at();
            let elapsed = (last - first).num_milliseconds() as f64 / 1000.0;
            let mean = elapsed / (self.blocks.len() - 1) as f64;
            (mean * 100.0).round() / 100.0
        } else {
            0.0
        };

        ChainStats {
            count: self.blocks.len(),
            size_bytes,
            mean_interval_seconds,
            is_valid: self.verify().is_ok(),
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
