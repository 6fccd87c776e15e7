// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::mem;

use log::debug;

use crate::backend::BackendCollection;
use crate::codec::WriteOp;
use crate::error::StoreError;

type EmptyResult = Result<(), StoreError>;

/// An ordered list of writes, applied in one bulk operation by `write` or
/// `write_sync`. A batch is single-use: after a write (successful or not) or
/// a `close`, every further `set`, `delete` or write fails with
/// `BatchClosed`. Dropping an unwritten batch discards it.
///
/// Operations are applied in the order they were added, so a `delete`
/// followed by a `set` of the same key leaves the key set.
#[derive(Debug)]
pub struct Batch<C> {
    collection: C,
    sync_collection: C,
    ops: Vec<WriteOp>,
    closed: bool,
}

impl<C> Batch<C>
where
    C: BackendCollection,
{
    pub(crate) fn new(collection: C, sync_collection: C) -> Batch<C> {
        Batch {
            collection,
            sync_collection,
            ops: Vec::new(),
            closed: false,
        }
    }

    pub fn set<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> EmptyResult {
        self.push(|| WriteOp::upsert(key.as_ref(), Some(value.as_ref())))
    }

    pub fn delete<K: AsRef<[u8]>>(&mut self, key: K) -> EmptyResult {
        self.push(|| WriteOp::delete(key.as_ref()))
    }

    pub fn write(&mut self) -> EmptyResult {
        self.flush(false)
    }

    pub fn write_sync(&mut self) -> EmptyResult {
        self.flush(true)
    }

    /// Discard the buffered operations. Always succeeds.
    pub fn close(&mut self) -> EmptyResult {
        self.ops.clear();
        self.closed = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn push<F>(&mut self, op: F) -> EmptyResult
    where
        F: FnOnce() -> Result<WriteOp, StoreError>,
    {
        if self.closed {
            return Err(StoreError::BatchClosed);
        }
        self.ops.push(op()?);
        Ok(())
    }

    // A failed bulk write isn't retried or rolled back: the operations the
    // backend applied before the failure stay applied, and the batch closes.
    fn flush(&mut self, sync: bool) -> EmptyResult {
        if self.closed {
            return Err(StoreError::BatchClosed);
        }
        self.closed = true;
        let ops = mem::take(&mut self.ops);
        if ops.is_empty() {
            return Ok(());
        }

        let target = if sync {
            &self.sync_collection
        } else {
            &self.collection
        };
        debug!("Writing batch of {} operations to {} (sync: {})", ops.len(), target.namespace(), sync);
        target.bulk_write(&ops).map_err(StoreError::from_backend)
    }
}
