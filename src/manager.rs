// Copyright 2018 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::backend::{
    BackendClient,
    BackendCollection,
    SafeMode,
};
use crate::config::Config;
use crate::db::Db;
use crate::error::StoreError;
use crate::store::Store;

/// Opens a store for a configuration.
pub type Creator = Box<dyn Fn(&Config) -> Result<Box<dyn Db>, StoreError> + Send + Sync>;

/// A table of backends by name, for callers that choose one at runtime.
///
/// There is no process-wide instance: build one with `with_defaults` (or
/// `new` and `register`) and keep it wherever the application keeps its
/// other services.
#[derive(Default)]
pub struct Manager {
    creators: BTreeMap<String, Creator>,
}

impl Manager {
    pub fn new() -> Manager {
        Default::default()
    }

    /// A manager with every backend compiled into this crate: `safe`, and
    /// `mongodb` when that feature is enabled.
    pub fn with_defaults() -> Manager {
        let mut manager = Manager::new();
        let _ = manager.creators.insert("safe".to_string(), Box::new(open_boxed::<SafeMode>));
        #[cfg(feature = "mongodb")]
        let _ = manager.creators.insert("mongodb".to_string(), Box::new(open_boxed::<crate::backend::MongoDb>));
        manager
    }

    /// Register `creator` under `name`. An existing registration is replaced
    /// only when `force` is set.
    pub fn register<S: Into<String>>(&mut self, name: S, creator: Creator, force: bool) -> Result<(), StoreError> {
        match self.creators.entry(name.into()) {
            Entry::Occupied(mut e) => {
                if !force {
                    return Err(StoreError::BackendAlreadyRegistered(e.key().clone()));
                }
                debug!("Replacing backend {}", e.key());
                e.insert(creator);
            },
            Entry::Vacant(e) => {
                e.insert(creator);
            },
        }
        Ok(())
    }

    /// Registered backend names, sorted.
    pub fn backends(&self) -> Vec<&str> {
        self.creators.keys().map(String::as_str).collect()
    }

    pub fn open(&self, backend: &str, config: &Config) -> Result<Box<dyn Db>, StoreError> {
        let creator = self.creators.get(backend).ok_or_else(|| StoreError::UnknownBackend(backend.to_string()))?;
        creator(config)
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Manager").field("backends", &self.backends()).finish()
    }
}

/// Open a store on backend `B` as a trait object.
pub fn open_boxed<B>(config: &Config) -> Result<Box<dyn Db>, StoreError>
where
    B: BackendClient,
    B::Collection: Send + Sync + 'static,
    <B::Collection as BackendCollection>::Cursor: 'static,
{
    Ok(Box::new(Store::open_with::<B>(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let manager = Manager::with_defaults();
        assert!(manager.backends().contains(&"safe"));
        #[cfg(feature = "mongodb")]
        assert!(manager.backends().contains(&"mongodb"));
        #[cfg(not(feature = "mongodb"))]
        assert_eq!(manager.backends(), vec!["safe"]);
        let mut sorted = manager.backends();
        sorted.sort_unstable();
        assert_eq!(manager.backends(), sorted);
    }

    #[test]
    fn test_register_twice() {
        let mut manager = Manager::new();
        manager.register("mem", Box::new(open_boxed::<SafeMode>), false).expect("registered");

        match manager.register("mem", Box::new(open_boxed::<SafeMode>), false) {
            Err(StoreError::BackendAlreadyRegistered(name)) => assert_eq!(name, "mem"),
            other => panic!("expected BackendAlreadyRegistered, got {:?}", other),
        }
        manager.register("mem", Box::new(open_boxed::<SafeMode>), true).expect("forced");
        assert_eq!(manager.backends(), vec!["mem"]);
    }

    #[test]
    fn test_unknown_backend() {
        let manager = Manager::new();
        match manager.open("leveldb", &Config::new("t", "memory://")) {
            Err(StoreError::UnknownBackend(name)) => assert_eq!(name, "leveldb"),
            Err(e) => panic!("expected UnknownBackend, got {}", e),
            Ok(_) => panic!("expected UnknownBackend"),
        }
    }

    #[test]
    fn test_open_through_registry() {
        let manager = Manager::with_defaults();
        let db = manager.open("safe", &Config::new("registry", "memory://")).expect("opened");
        db.set(b"k", Some(&b"v"[..])).expect("set");
        assert_eq!(db.get(b"k").expect("read"), Some(b"v".to_vec()));
        assert!(matches!(db.set(b"k", None), Err(StoreError::InvalidValue)));
        db.close().expect("closed");
    }
}
