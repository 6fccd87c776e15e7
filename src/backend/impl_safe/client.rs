// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::collections::HashMap;
use std::sync::{
    Arc,
    RwLock,
};

use log::warn;

use super::collection::CollectionData;
use super::{
    CollectionImpl,
    ErrorImpl,
};
use crate::backend::common::Durability;
use crate::backend::traits::BackendClient;

type Namespaces = HashMap<(String, String), Arc<CollectionData>>;

#[derive(Debug, Clone, Default)]
pub struct ClientImpl {
    namespaces: Arc<RwLock<Namespaces>>,
}

impl ClientImpl {
    pub fn new() -> ClientImpl {
        ClientImpl::default()
    }
}

impl BackendClient for ClientImpl {
    type Collection = CollectionImpl;
    type Error = ErrorImpl;

    const SCHEMES: &'static [&'static str] = &["memory"];

    fn connect(_uri: &str) -> Result<Self, Self::Error> {
        Ok(ClientImpl::new())
    }

    fn ping(&self, _database: &str) -> Result<(), Self::Error> {
        let _namespaces = self.namespaces.read().map_err(|_| ErrorImpl::PoisonError)?;
        Ok(())
    }

    fn collection(&self, database: &str, name: &str, durability: &Durability) -> Result<Self::Collection, Self::Error> {
        if let Durability::Acknowledged(wc) = durability {
            warn!("Ignoring write concern `w={}` for {}.{}", wc.w, database, name);
        }
        let mut namespaces = self.namespaces.write().map_err(|_| ErrorImpl::PoisonError)?;
        let data = namespaces
            .entry((database.to_owned(), name.to_owned()))
            .or_insert_with(|| Arc::new(CollectionData::new()))
            .clone();
        Ok(CollectionImpl::new(database, name, durability.clone(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::traits::BackendCollection;

    #[test]
    fn test_ping_releases_lock() {
        let client = ClientImpl::connect("memory://").expect("connected");
        client.ping("db").expect("pinged");
        client.ping("db").expect("pinged again");

        // A write lock is still available after the pings.
        let collection = client.collection("db", "c", &Durability::Default).expect("collection");
        assert_eq!(collection.namespace(), "db.c");
    }

    #[test]
    fn test_clones_share_collections() {
        let client = ClientImpl::new();
        let first = client.collection("db", "c", &Durability::Default).expect("collection");
        let second = client.clone().collection("db", "c", &Durability::Default).expect("collection");
        assert_eq!(first.id(), second.id());
        assert_ne!(first.id(), ClientImpl::new().collection("db", "c", &Durability::Default).expect("collection").id());
    }
}
