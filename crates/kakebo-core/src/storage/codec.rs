//! Byte encodings for keys and values.
//!
//! Expense identifiers are stored as fixed-width big-endian integers so that
//! byte-ordered iteration yields numeric order. Expense records are JSON;
//! income and savings values are plain text.

use crate::error::{KakeboError, Result};
use crate::storage::types::Expense;

/// Width of an encoded identifier key.
pub const ID_KEY_LEN: usize = 8;

pub fn encode_id(id: u64) -> [u8; ID_KEY_LEN] {
    id.to_be_bytes()
}

/// Decode an identifier key; `None` if the key is not exactly 8 bytes.
pub fn decode_id(key: &[u8]) -> Option<u64> {
    let bytes: [u8; ID_KEY_LEN] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

pub fn encode_expense(expense: &Expense) -> Result<Vec<u8>> {
    serde_json::to_vec(expense).map_err(|e| KakeboError::Encode(e.to_string()))
}

/// Decode an expense record; `key` is only used to label the error.
pub fn decode_expense(key: &[u8], value: &[u8]) -> Result<Expense> {
    serde_json::from_slice(value).map_err(|e| KakeboError::Decode {
        key: describe_id_key(key),
        reason: e.to_string(),
    })
}

pub fn encode_amount(amount: i64) -> Vec<u8> {
    amount.to_string().into_bytes()
}

/// Parse a stored textual amount, degrading to zero on anything malformed.
pub fn decode_amount(value: &[u8]) -> i64 {
    std::str::from_utf8(value)
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

fn describe_id_key(key: &[u8]) -> String {
    match decode_id(key) {
        Some(id) => format!("#{}", id),
        None => format!("{:?}", key),
    }
}
