// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::ops::Bound;
use std::sync::{
    Arc,
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};

#[cfg(test)]
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use uuid::Uuid;

use super::{
    CursorImpl,
    ErrorImpl,
};
use crate::backend::common::Durability;
use crate::backend::traits::BackendCollection;
use crate::codec::{
    cmp_in,
    key_hex,
    Filter,
    RawRecord,
    SortOrder,
    WriteOp,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Document {
    pub(crate) value: Option<Vec<u8>>,
    pub(crate) key_hex: String,
}

impl Document {
    pub(crate) fn to_raw(&self, key: &[u8]) -> RawRecord {
        RawRecord {
            key: Some(key.to_vec()),
            value: self.value.clone(),
        }
    }
}

type Records = BTreeMap<Vec<u8>, Document>;

#[derive(Debug)]
pub(crate) struct CollectionData {
    id: Uuid,
    records: RwLock<Records>,
    indexes: RwLock<BTreeSet<String>>,
    #[cfg(test)]
    writes_until_failure: AtomicUsize,
}

impl CollectionData {
    pub(crate) fn new() -> CollectionData {
        CollectionData {
            id: Uuid::new_v4(),
            records: RwLock::new(BTreeMap::new()),
            indexes: RwLock::new(BTreeSet::new()),
            #[cfg(test)]
            writes_until_failure: AtomicUsize::new(usize::MAX),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionImpl {
    database: String,
    name: String,
    durability: Durability,
    data: Arc<CollectionData>,
}

impl CollectionImpl {
    pub(crate) fn new(database: &str, name: &str, durability: Durability, data: Arc<CollectionData>) -> CollectionImpl {
        CollectionImpl {
            database: database.to_owned(),
            name: name.to_owned(),
            durability,
            data,
        }
    }

    /// Identity of the underlying record set.
    pub fn id(&self) -> &Uuid {
        &self.data.id
    }

    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    pub fn len(&self) -> Result<usize, ErrorImpl> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ErrorImpl> {
        Ok(self.records()?.is_empty())
    }

    pub fn indexes(&self) -> Result<Vec<String>, ErrorImpl> {
        let indexes = self.data.indexes.read().map_err(|_| ErrorImpl::PoisonError)?;
        Ok(indexes.iter().cloned().collect())
    }

    /// Secondary lookup through the derived `keyHex` field.
    pub fn find_by_key_hex(&self, hex: &str) -> Result<Option<RawRecord>, ErrorImpl> {
        let records = self.records()?;
        let found = records.iter().find(|(_, doc)| doc.key_hex == hex);
        Ok(found.map(|(key, doc)| doc.to_raw(key)))
    }

    fn records(&self) -> Result<RwLockReadGuard<Records>, ErrorImpl> {
        self.data.records.read().map_err(|_| ErrorImpl::PoisonError)
    }

    fn records_mut(&self) -> Result<RwLockWriteGuard<Records>, ErrorImpl> {
        self.data.records.write().map_err(|_| ErrorImpl::PoisonError)
    }

    /// Store a document as-is, bypassing the codec. Lets tests plant records
    /// that don't decode.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), ErrorImpl> {
        let doc = Document {
            value: value.map(<[u8]>::to_vec),
            key_hex: key_hex(key),
        };
        self.records_mut()?.insert(key.to_vec(), doc);
        Ok(())
    }

    /// Let `n` more writes succeed, then fail every write after them.
    #[cfg(test)]
    pub(crate) fn fail_writes_after(&self, n: usize) {
        self.data.writes_until_failure.store(n, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn charge_write(&self) -> Result<(), ErrorImpl> {
        let remaining = self.data.writes_until_failure.load(Ordering::SeqCst);
        match remaining {
            usize::MAX => Ok(()),
            0 => Err(ErrorImpl::Injected),
            n => {
                self.data.writes_until_failure.store(n - 1, Ordering::SeqCst);
                Ok(())
            },
        }
    }

    #[cfg(not(test))]
    fn charge_write(&self) -> Result<(), ErrorImpl> {
        Ok(())
    }

    fn apply(&self, records: &mut Records, op: &WriteOp) -> Result<(), ErrorImpl> {
        self.charge_write()?;
        match op {
            WriteOp::Upsert {
                key,
                value,
            } => {
                let doc = Document {
                    value: Some(value.clone()),
                    key_hex: key_hex(key),
                };
                records.insert(key.clone(), doc);
            },
            WriteOp::Delete {
                key,
            } => {
                records.remove(key);
            },
        }
        Ok(())
    }
}

fn bounds(filter: &Filter) -> (Bound<&[u8]>, Bound<&[u8]>) {
    match filter {
        Filter::All => (Bound::Unbounded, Bound::Unbounded),
        Filter::Key(k) => (Bound::Included(k.as_slice()), Bound::Included(k.as_slice())),
        Filter::Range {
            start,
            end,
        } => {
            let lower = start.as_deref().map_or(Bound::Unbounded, Bound::Included);
            let upper = end.as_deref().map_or(Bound::Unbounded, Bound::Excluded);
            (lower, upper)
        },
    }
}

/// Records matching `filter`, in ascending key order.
fn matching<'r>(records: &'r Records, filter: &Filter) -> Vec<(&'r Vec<u8>, &'r Document)> {
    // BTreeMap::range panics on an inverted range; such a filter matches nothing.
    if let Filter::Range {
        start: Some(s),
        end: Some(e),
    } = filter
    {
        if s >= e {
            return Vec::new();
        }
    }
    records.range::<[u8], _>(bounds(filter)).collect()
}

impl BackendCollection for CollectionImpl {
    type Cursor = CursorImpl;
    type Error = ErrorImpl;

    fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<RawRecord>, Self::Error> {
        let records = self.records()?;
        let found = matching(&records, filter).into_iter().next();
        Ok(found.map(|(key, doc)| doc.to_raw(key)))
    }

    fn upsert_one(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error> {
        let op = WriteOp::Upsert {
            key: key.to_vec(),
            value: value.to_vec(),
        };
        let mut records = self.records_mut()?;
        self.apply(&mut records, &op)
    }

    fn delete_one(&self, filter: &Filter) -> Result<(), Self::Error> {
        self.charge_write()?;
        let mut records = self.records_mut()?;
        let found = matching(&records, filter).into_iter().next().map(|(key, _)| key.clone());
        if let Some(key) = found {
            records.remove(&key);
        }
        Ok(())
    }

    fn find(&self, filter: &Filter, order: SortOrder) -> Result<Self::Cursor, Self::Error> {
        let records = self.records()?;
        let mut docs: Vec<(Vec<u8>, Document)> =
            matching(&records, filter).into_iter().map(|(k, d)| (k.clone(), d.clone())).collect();
        docs.sort_by(|(a, _), (b, _)| cmp_in(order, a, b));
        Ok(CursorImpl::new(docs))
    }

    fn bulk_write(&self, ops: &[WriteOp]) -> Result<(), Self::Error> {
        let mut records = self.records_mut()?;
        for op in ops {
            self.apply(&mut records, op)?;
        }
        Ok(())
    }

    fn ensure_index(&self, field: &str) -> Result<(), Self::Error> {
        let mut indexes = self.data.indexes.write().map_err(|_| ErrorImpl::PoisonError)?;
        indexes.insert(field.to_owned());
        Ok(())
    }
}
