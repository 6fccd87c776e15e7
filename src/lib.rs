// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! An ordered, byte-keyed key-value store kept in a document database.
//!
//! Each store is one collection of `{key, value, keyHex}` records. Keys and
//! values are arbitrary byte strings; keys are ordered byte-lexicographically,
//! and iteration walks a half-open range `[start, end)` in either direction.
//!
//! The store is generic over its backend:
//!
//! - `SafeMode` keeps collections in memory. It needs no server and suits
//!   tests and embedding.
//! - `MongoDb` (feature `mongodb`) talks to a MongoDB deployment.
//!
//! ```
//! use dockv::backend::SafeMode;
//! use dockv::Store;
//!
//! let store = Store::open::<SafeMode>("example", "memory://").unwrap();
//!
//! store.set(b"b", b"2").unwrap();
//! store.set(b"a", b"1").unwrap();
//! assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
//!
//! let mut batch = store.new_batch();
//! batch.set(b"c", b"3").unwrap();
//! batch.delete(b"a").unwrap();
//! batch.write().unwrap();
//!
//! let mut iter = store.iter(None, None).unwrap();
//! let mut keys = vec![];
//! while iter.valid() {
//!     keys.push(iter.key().to_vec());
//!     iter.next();
//! }
//! iter.close().unwrap();
//! assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec()]);
//! ```
//!
//! Code that picks the backend at runtime goes through `Manager`, which
//! hands out stores as `Box<dyn Db>`.

pub mod backend;
mod batch;
pub mod codec;
mod config;
mod db;
mod error;
mod iter;
mod manager;
mod store;
pub mod uri;

pub use batch::Batch;
pub use codec::{
    Filter,
    Record,
    SortOrder,
    WriteOp,
};
pub use config::{
    Config,
    DATABASE_ENV,
    DEFAULT_DATABASE,
    URI_ENV,
};
pub use db::{
    Db,
    DbBatch,
    DbIterator,
};
pub use error::{
    DataError,
    StoreError,
};
pub use iter::Iter;
pub use manager::{
    open_boxed,
    Creator,
    Manager,
};
pub use store::Store;
