//! Logical collections stored in the engine.
//!
//! Each collection maps to one bucket and fixes how its keys and values are
//! encoded. Call sites go through [`Collection::encode_key`] instead of
//! building key bytes by hand.

use crate::error::{KakeboError, Result};
use crate::period::PeriodKey;
use crate::storage::codec::{decode_id, encode_id};

/// How keys in a collection are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// 8-byte big-endian integer
    BigEndianU64,
    /// Raw UTF-8 bytes of a period key
    Utf8,
}

/// How values in a collection are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCodec {
    Json,
    Text,
}

/// A typed key, before encoding.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    Id(u64),
    Period(&'a PeriodKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub key: KeyEncoding,
    pub value: ValueCodec,
}

pub const EXPENSES: Collection = Collection {
    name: "expenses",
    key: KeyEncoding::BigEndianU64,
    value: ValueCodec::Json,
};

pub const INCOMES: Collection = Collection {
    name: "incomes",
    key: KeyEncoding::Utf8,
    value: ValueCodec::Text,
};

pub const SAVINGS: Collection = Collection {
    name: "savings",
    key: KeyEncoding::Utf8,
    value: ValueCodec::Text,
};

/// Every collection the ledger owns.
pub const ALL: [Collection; 3] = [EXPENSES, INCOMES, SAVINGS];

impl Collection {
    /// Encode a key for this collection.
    ///
    /// A key whose shape does not match the collection is a programming
    /// error and is reported as fatal.
    pub fn encode_key(&self, key: Key<'_>) -> Result<Vec<u8>> {
        match (self.key, key) {
            (KeyEncoding::BigEndianU64, Key::Id(id)) => Ok(encode_id(id).to_vec()),
            (KeyEncoding::Utf8, Key::Period(period)) => Ok(period.as_bytes().to_vec()),
            (encoding, key) => Err(KakeboError::Fatal(format!(
                "key {:?} does not fit {} collection ({:?})",
                key, self.name, encoding
            ))),
        }
    }

    /// Render a raw key for logs and error messages.
    pub fn display_key(&self, raw: &[u8]) -> String {
        match self.key {
            KeyEncoding::BigEndianU64 => match decode_id(raw) {
                Some(id) => format!("{}#{}", self.name, id),
                None => format!("{}#{:?}", self.name, raw),
            },
            KeyEncoding::Utf8 => format!("{}/{}", self.name, String::from_utf8_lossy(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matching_keys() {
        assert_eq!(
            EXPENSES.encode_key(Key::Id(1)).unwrap(),
            vec![0, 0, 0, 0, 0, 0, 0, 1]
        );
        let period = PeriodKey::month("June", "2017");
        assert_eq!(
            INCOMES.encode_key(Key::Period(&period)).unwrap(),
            b"June 2017".to_vec()
        );
    }

    #[test]
    fn test_mismatched_key_is_fatal() {
        let period = PeriodKey::week(3);
        let err = EXPENSES.encode_key(Key::Period(&period)).unwrap_err();
        assert!(err.is_fatal());
        let err = SAVINGS.encode_key(Key::Id(3)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_display_key() {
        assert_eq!(EXPENSES.display_key(&encode_id(12)), "expenses#12");
        assert_eq!(INCOMES.display_key(b"May 2018"), "incomes/May 2018");
    }

    #[test]
    fn test_collection_names_are_unique() {
        let mut names: Vec<&str> = ALL.iter().map(|c| c.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }
}
