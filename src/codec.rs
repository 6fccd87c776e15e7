// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! Pure helpers that turn raw byte keys and values into the filters, write
//! operations and records every backend speaks.
//!
//! A record is persisted as `{key: bytes, value: bytes, keyHex: string}`. The
//! `key` field is authoritative; `keyHex` is the lowercase hex projection of
//! `key`, kept in sync on every upsert. Because hex encoding is
//! order-preserving, backends whose native binary comparison isn't
//! byte-lexicographic can range-compare and sort on `keyHex` instead.

use std::cmp::Ordering;
use std::convert::TryFrom;

use crate::error::{
    DataError,
    StoreError,
};

pub const KEY_FIELD: &str = "key";
pub const VALUE_FIELD: &str = "value";
pub const KEY_HEX_FIELD: &str = "keyHex";

pub(crate) fn check_key(key: &[u8]) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey);
    }
    Ok(())
}

pub(crate) fn check_value(value: Option<&[u8]>) -> Result<&[u8], StoreError> {
    value.ok_or(StoreError::InvalidValue)
}

/// An absent bound means "unbounded"; a present but empty one is rejected.
pub(crate) fn check_bound(bound: Option<&[u8]>) -> Result<(), StoreError> {
    match bound {
        Some(b) => check_key(b),
        None => Ok(()),
    }
}

/// The derived `keyHex` projection of a key.
pub fn key_hex(key: &[u8]) -> String {
    hex::encode(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// The sort direction as a document database spells it.
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn is_reverse(self) -> bool {
        self == SortOrder::Descending
    }
}

/// A query filter over the `key` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every record.
    All,
    /// The record whose key equals this one.
    Key(Vec<u8>),
    /// `start <= key < end`, either side optional but not both.
    Range {
        start: Option<Vec<u8>>,
        end: Option<Vec<u8>>,
    },
}

impl Filter {
    pub fn key(key: &[u8]) -> Filter {
        Filter::Key(key.to_vec())
    }

    pub fn range(start: Option<&[u8]>, end: Option<&[u8]>) -> Filter {
        match (start, end) {
            (None, None) => Filter::All,
            (start, end) => Filter::Range {
                start: start.map(<[u8]>::to_vec),
                end: end.map(<[u8]>::to_vec),
            },
        }
    }

    /// Whether a key satisfies this filter, compared byte-lexicographically.
    pub fn matches(&self, key: &[u8]) -> bool {
        match self {
            Filter::All => true,
            Filter::Key(k) => k.as_slice() == key,
            Filter::Range {
                start,
                end,
            } => {
                let above = start.as_deref().map_or(true, |s| key >= s);
                let below = end.as_deref().map_or(true, |e| key < e);
                above && below
            },
        }
    }
}

/// One buffered write. Batches apply these in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Upsert {
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        key: Vec<u8>,
    },
}

impl WriteOp {
    pub fn upsert(key: &[u8], value: Option<&[u8]>) -> Result<WriteOp, StoreError> {
        check_key(key)?;
        let value = check_value(value)?;
        Ok(WriteOp::Upsert {
            key: key.to_vec(),
            value: value.to_vec(),
        })
    }

    pub fn delete(key: &[u8]) -> Result<WriteOp, StoreError> {
        check_key(key)?;
        Ok(WriteOp::Delete {
            key: key.to_vec(),
        })
    }

    pub fn key(&self) -> &[u8] {
        match self {
            WriteOp::Upsert {
                key,
                ..
            } => key,
            WriteOp::Delete {
                key,
            } => key,
        }
    }

    pub fn filter(&self) -> Filter {
        Filter::key(self.key())
    }
}

/// A document as the backend found it: either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
}

/// A decoded `{key, value}` pair. An empty value is a value; a missing one
/// never decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: &[u8], value: &[u8]) -> Record {
        Record {
            key: key.to_vec(),
            value: value.to_vec(),
        }
    }
}

impl TryFrom<RawRecord> for Record {
    type Error = DataError;

    fn try_from(raw: RawRecord) -> Result<Record, DataError> {
        Ok(Record {
            key: raw.key.ok_or(DataError::MissingField(KEY_FIELD))?,
            value: raw.value.ok_or(DataError::MissingField(VALUE_FIELD))?,
        })
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> RawRecord {
        RawRecord {
            key: Some(record.key),
            value: Some(record.value),
        }
    }
}

/// Compare two keys in the given iteration direction.
pub(crate) fn cmp_in(order: SortOrder, a: &[u8], b: &[u8]) -> Ordering {
    match order {
        SortOrder::Ascending => a.cmp(b),
        SortOrder::Descending => b.cmp(a),
    }
}
