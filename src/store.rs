// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::convert::TryFrom;

use log::debug;

use crate::backend::{
    BackendClient,
    BackendCollection,
    Durability,
};
use crate::batch::Batch;
use crate::codec::{
    check_key,
    check_value,
    Filter,
    Record,
    SortOrder,
    KEY_FIELD,
    KEY_HEX_FIELD,
};
use crate::config::Config;
use crate::error::StoreError;
use crate::iter::Iter;
use crate::uri;

type EmptyResult = Result<(), StoreError>;

/// A byte-keyed, byte-ordered key-value store kept in one collection of a
/// document database.
///
/// A store writes through two targets that address the same collection: the
/// default one, and a "sync" one whose writes wait for the acknowledgment
/// policy in `Config::sync_concern`. A record written through either is
/// visible through both once the write returns.
#[derive(Debug, Clone)]
pub struct Store<C> {
    collection: C,
    sync_collection: C,
}

/// Opening.
impl<C> Store<C>
where
    C: BackendCollection,
{
    /// Open the store `name` at `uri` with the default configuration.
    pub fn open<B>(name: &str, uri: &str) -> Result<Store<C>, StoreError>
    where
        B: BackendClient<Collection = C>,
    {
        Store::open_with::<B>(&Config::new(name, uri))
    }

    /// Connect to `config.uri`, check the connection, and open the store.
    pub fn open_with<B>(config: &Config) -> Result<Store<C>, StoreError>
    where
        B: BackendClient<Collection = C>,
    {
        let redacted = uri::redact(&config.uri, B::SCHEMES)?;
        let connect_error = |reason: String| StoreError::ConnectError {
            database: config.database.clone(),
            uri: redacted.clone(),
            reason,
        };

        let client = B::connect(&config.uri).map_err(|e| connect_error(e.to_string()))?;
        client.ping(&config.database).map_err(|e| connect_error(e.to_string()))?;

        let store = Store::from_client(&client, config)?;
        debug!("Opened store {} at {}", store.collection.namespace(), redacted);
        Ok(store)
    }

    /// Open the store on an existing connection.
    pub fn from_client<B>(client: &B, config: &Config) -> Result<Store<C>, StoreError>
    where
        B: BackendClient<Collection = C>,
    {
        let collection = client.collection(&config.database, &config.name, &Durability::Default).map_err(StoreError::from_backend)?;
        let sync = Durability::Acknowledged(config.sync_concern.clone());
        let sync_collection = client.collection(&config.database, &config.name, &sync).map_err(StoreError::from_backend)?;

        collection.ensure_index(KEY_FIELD).map_err(StoreError::from_backend)?;
        collection.ensure_index(KEY_HEX_FIELD).map_err(StoreError::from_backend)?;

        Ok(Store {
            collection,
            sync_collection,
        })
    }
}

/// Reads, writes, and iteration.
impl<C> Store<C>
where
    C: BackendCollection,
{
    /// The value stored under `key`, or `None` if there isn't one.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Option<Vec<u8>>, StoreError> {
        let key = key.as_ref();
        check_key(key)?;
        match self.collection.find_one(&Filter::key(key)).map_err(StoreError::from_backend)? {
            Some(raw) => Ok(Some(Record::try_from(raw)?.value)),
            None => Ok(None),
        }
    }

    pub fn has<K: AsRef<[u8]>>(&self, key: K) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    pub fn set<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> EmptyResult {
        self.put(key.as_ref(), Some(value.as_ref()), false)
    }

    pub fn set_sync<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) -> EmptyResult {
        self.put(key.as_ref(), Some(value.as_ref()), true)
    }

    /// Deleting a key that isn't there succeeds.
    pub fn delete<K: AsRef<[u8]>>(&self, key: K) -> EmptyResult {
        self.remove(key.as_ref(), false)
    }

    pub fn delete_sync<K: AsRef<[u8]>>(&self, key: K) -> EmptyResult {
        self.remove(key.as_ref(), true)
    }

    pub fn new_batch(&self) -> Batch<C> {
        Batch::new(self.collection.clone(), self.sync_collection.clone())
    }

    /// Iterate over `start <= key < end` in ascending order. `None` leaves
    /// that side unbounded; an empty bound is an `InvalidKey`.
    pub fn iter(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Iter<C::Cursor>, StoreError> {
        Iter::open(&self.collection, start, end, SortOrder::Ascending)
    }

    /// Like `iter`, in descending order.
    pub fn rev_iter(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Iter<C::Cursor>, StoreError> {
        Iter::open(&self.collection, start, end, SortOrder::Descending)
    }

    /// The connection is pooled and shared, so there is nothing to release.
    /// Outstanding batches and iterators stay usable and must be closed by
    /// their owners.
    pub fn close(&self) -> EmptyResult {
        debug!("Closed store {}", self.collection.namespace());
        Ok(())
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn sync_collection(&self) -> &C {
        &self.sync_collection
    }

    pub(crate) fn put(&self, key: &[u8], value: Option<&[u8]>, sync: bool) -> EmptyResult {
        check_key(key)?;
        let value = check_value(value)?;
        self.target(sync).upsert_one(key, value).map_err(StoreError::from_backend)
    }

    pub(crate) fn remove(&self, key: &[u8], sync: bool) -> EmptyResult {
        check_key(key)?;
        self.target(sync).delete_one(&Filter::key(key)).map_err(StoreError::from_backend)
    }

    fn target(&self, sync: bool) -> &C {
        if sync {
            &self.sync_collection
        } else {
            &self.collection
        }
    }
}
