//! Concrete rule sets: transaction payloads, block records, chain structure

use serde_json::Value;
use tracing::debug;

use super::{Pipeline, Rule, ValidationError};
use crate::constants::GENESIS_PREVIOUS_HASH;

const TRANSACTION_FIELDS: [&str; 3] = ["sender", "receiver", "amount"];
const BLOCK_FIELDS: [&str; 5] = ["index", "created_at", "payload", "previous_hash", "hash"];

/// Pipeline for candidate transaction records.
pub fn transaction_pipeline() -> Pipeline<Value> {
    Pipeline::new(vec![
        tx_is_record as Rule<Value>,
        tx_required_fields,
        tx_amount_positive,
    ])
}

/// Pipeline for a single block's record form. Shape only; hash
/// correctness is checked by the block itself.
pub fn block_pipeline() -> Pipeline<Value> {
    Pipeline::new(vec![
        block_is_record as Rule<Value>,
        block_required_fields,
        block_index_non_negative,
        block_hash_non_empty,
    ])
}

/// Pipeline for the full ordered record list of a chain.
pub fn chain_pipeline() -> Pipeline<[Value]> {
    Pipeline::new(vec![
        chain_non_empty as Rule<[Value]>,
        chain_genesis_shape,
        chain_links_intact,
    ])
}

fn tx_is_record(tx: &Value) -> Result<(), ValidationError> {
    if tx.is_object() {
        Ok(())
    } else {
        Err(ValidationError::NotARecord("transaction"))
    }
}

fn tx_required_fields(tx: &Value) -> Result<(), ValidationError> {
    for field in TRANSACTION_FIELDS {
        match tx.get(field) {
            None => return Err(ValidationError::MissingField(field.to_string())),
            Some(v) if is_empty_value(v) => {
                return Err(ValidationError::EmptyField(field.to_string()))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn tx_amount_positive(tx: &Value) -> Result<(), ValidationError> {
    let amount = parse_amount(&tx["amount"]).ok_or(ValidationError::AmountNotNumeric)?;
    if amount <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }
    debug!(amount, "transaction amount accepted");
    Ok(())
}

fn block_is_record(block: &Value) -> Result<(), ValidationError> {
    if block.is_object() {
        Ok(())
    } else {
        Err(ValidationError::NotARecord("block"))
    }
}

fn block_required_fields(block: &Value) -> Result<(), ValidationError> {
    for field in BLOCK_FIELDS {
        if block.get(field).is_none() {
            return Err(ValidationError::MissingField(field.to_string()));
        }
    }
    Ok(())
}

fn block_index_non_negative(block: &Value) -> Result<(), ValidationError> {
    // u64 view rejects both negative and fractional indices.
    if block["index"].as_u64().is_some() {
        Ok(())
    } else {
        Err(ValidationError::InvalidIndex)
    }
}

fn block_hash_non_empty(block: &Value) -> Result<(), ValidationError> {
    match block["hash"].as_str() {
        Some(h) if !h.is_empty() => Ok(()),
        _ => Err(ValidationError::EmptyHash),
    }
}

fn chain_non_empty(records: &[Value]) -> Result<(), ValidationError> {
    if records.is_empty() {
        Err(ValidationError::EmptyChain)
    } else {
        Ok(())
    }
}

fn chain_genesis_shape(records: &[Value]) -> Result<(), ValidationError> {
    let genesis = &records[0];
    if genesis["index"].as_u64() != Some(0) {
        return Err(ValidationError::GenesisIndex);
    }
    if genesis["previous_hash"].as_str() != Some(GENESIS_PREVIOUS_HASH) {
        return Err(ValidationError::GenesisPreviousHash);
    }
    Ok(())
}

fn chain_links_intact(records: &[Value]) -> Result<(), ValidationError> {
    for i in 1..records.len() {
        if records[i]["index"].as_u64() != Some(i as u64) {
            return Err(ValidationError::IndexMismatch(i));
        }
        // Byte-for-byte string equality between the link and the
        // predecessor's stored hash.
        if records[i]["previous_hash"].as_str() != records[i - 1]["hash"].as_str()
            || records[i]["previous_hash"].as_str().is_none()
        {
            return Err(ValidationError::LinkMismatch(i));
        }
    }
    Ok(())
}

/// Amounts may arrive as JSON numbers or as numeric strings (form input).
fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
