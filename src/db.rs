// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! The key-value contract as trait objects, for code that picks a backend at
//! runtime (see `Manager`). Values are `Option<&[u8]>` here so that a caller
//! forwarding a missing value gets `InvalidValue` rather than an empty write.

use crate::backend::{
    BackendCollection,
    BackendCursor,
};
use crate::batch::Batch;
use crate::codec::WriteOp;
use crate::error::StoreError;
use crate::iter::Iter;
use crate::store::Store;

pub trait Db: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError>;

    fn set(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError>;

    fn set_sync(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError>;

    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    fn delete_sync(&self, key: &[u8]) -> Result<(), StoreError>;

    fn new_batch(&self) -> Box<dyn DbBatch>;

    fn iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Box<dyn DbIterator>, StoreError>;

    fn reverse_iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Box<dyn DbIterator>, StoreError>;

    fn close(&self) -> Result<(), StoreError>;
}

pub trait DbBatch {
    fn set(&mut self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    fn write(&mut self) -> Result<(), StoreError>;

    fn write_sync(&mut self) -> Result<(), StoreError>;

    fn close(&mut self) -> Result<(), StoreError>;
}

pub trait DbIterator {
    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>);

    fn valid(&self) -> bool;

    fn key(&self) -> &[u8];

    fn value(&self) -> &[u8];

    fn next(&mut self);

    fn error(&self) -> Option<&StoreError>;

    fn close(&mut self) -> Result<(), StoreError>;
}

impl<C> Db for Store<C>
where
    C: BackendCollection + Send + Sync + 'static,
    C::Cursor: 'static,
{
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Store::get(self, key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Store::has(self, key)
    }

    fn set(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError> {
        self.put(key, value, false)
    }

    fn set_sync(&self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError> {
        self.put(key, value, true)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.remove(key, false)
    }

    fn delete_sync(&self, key: &[u8]) -> Result<(), StoreError> {
        self.remove(key, true)
    }

    fn new_batch(&self) -> Box<dyn DbBatch> {
        Box::new(Store::new_batch(self))
    }

    fn iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Box<dyn DbIterator>, StoreError> {
        Ok(Box::new(Store::iter(self, start, end)?))
    }

    fn reverse_iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Box<dyn DbIterator>, StoreError> {
        Ok(Box::new(Store::rev_iter(self, start, end)?))
    }

    fn close(&self) -> Result<(), StoreError> {
        Store::close(self)
    }
}

impl<C> DbBatch for Batch<C>
where
    C: BackendCollection,
{
    fn set(&mut self, key: &[u8], value: Option<&[u8]>) -> Result<(), StoreError> {
        self.push(|| WriteOp::upsert(key, value))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.push(|| WriteOp::delete(key))
    }

    fn write(&mut self) -> Result<(), StoreError> {
        Batch::write(self)
    }

    fn write_sync(&mut self) -> Result<(), StoreError> {
        Batch::write_sync(self)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        Batch::close(self)
    }
}

impl<R> DbIterator for Iter<R>
where
    R: BackendCursor,
{
    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        Iter::domain(self)
    }

    fn valid(&self) -> bool {
        Iter::valid(self)
    }

    fn key(&self) -> &[u8] {
        Iter::key(self)
    }

    fn value(&self) -> &[u8] {
        Iter::value(self)
    }

    fn next(&mut self) {
        Iter::next(self)
    }

    fn error(&self) -> Option<&StoreError> {
        Iter::error(self)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        Iter::close(self)
    }
}
