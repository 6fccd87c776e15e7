// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::fmt::{
    Debug,
    Display,
};

use crate::backend::common::Durability;
use crate::codec::{
    Filter,
    RawRecord,
    SortOrder,
    WriteOp,
};
use crate::error::StoreError;

pub trait BackendError: Debug + Display + Into<StoreError> {}

/// A connection to a document database. Clients are cheap to clone and
/// share one underlying connection pool.
pub trait BackendClient: Debug + Clone + Sized {
    type Error: BackendError;
    type Collection: BackendCollection<Error = Self::Error>;

    /// URI schemes this backend accepts.
    const SCHEMES: &'static [&'static str];

    fn connect(uri: &str) -> Result<Self, Self::Error>;

    fn ping(&self, database: &str) -> Result<(), Self::Error>;

    fn collection(&self, database: &str, name: &str, durability: &Durability) -> Result<Self::Collection, Self::Error>;
}

pub trait BackendCollection: Debug + Clone {
    type Error: BackendError;
    type Cursor: BackendCursor<Error = Self::Error>;

    /// `database.collection`; identical for every durability of one collection.
    fn namespace(&self) -> String;

    fn find_one(&self, filter: &Filter) -> Result<Option<RawRecord>, Self::Error>;

    /// Set `value` (and the derived key fields) on the record with this key,
    /// creating it if absent.
    fn upsert_one(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error>;

    fn delete_one(&self, filter: &Filter) -> Result<(), Self::Error>;

    /// Open a cursor over the records matching `filter`, sorted by key. The
    /// cursor is positioned before the first record.
    fn find(&self, filter: &Filter, order: SortOrder) -> Result<Self::Cursor, Self::Error>;

    /// Apply `ops` in order, stopping at the first failure. Operations applied
    /// before a failure stay applied.
    fn bulk_write(&self, ops: &[WriteOp]) -> Result<(), Self::Error>;

    fn ensure_index(&self, field: &str) -> Result<(), Self::Error>;
}

pub trait BackendCursor {
    type Error: BackendError;

    /// Move to the next record. `Ok(false)` means the cursor is exhausted.
    fn advance(&mut self) -> Result<bool, Self::Error>;

    /// The record at the current position.
    fn current(&self) -> Result<RawRecord, Self::Error>;

    fn close(&mut self) -> Result<(), Self::Error>;
}
