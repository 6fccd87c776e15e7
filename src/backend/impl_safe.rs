// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! An in-process document collection. Records live in a `BTreeMap` keyed by
//! the raw key, so iteration order is byte-lexicographic by construction.
//! Clones of a client share the same collections.

mod client;
mod collection;
mod cursor;
mod error;

pub use client::ClientImpl;
pub use collection::CollectionImpl;
pub use cursor::CursorImpl;
pub use error::ErrorImpl;
