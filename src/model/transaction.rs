//! Transaction payload
//!
//! A typed value-transfer record. The positive-amount invariant is
//! enforced at construction; a violating transaction never exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::validation::ValidationError;

/// A value transfer between two named parties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    sender: String,
    receiver: String,
    amount: f64,
    memo: String,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction, rejecting non-positive or non-finite amounts.
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
        memo: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::AmountNotNumeric);
        }
        if amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive);
        }

        let tx = Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            memo: memo.into(),
            created_at: Utc::now(),
        };
        debug!(sender = %tx.sender, receiver = %tx.receiver, amount, "transaction created");
        Ok(tx)
    }

    /// Render as the payload record stored in a block.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "sender": self.sender,
            "receiver": self.receiver,
            "amount": self.amount,
            "memo": self.memo,
            "created_at": self.created_at.to_rfc3339(),
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.sender, self.receiver, self.amount)
    }
}
