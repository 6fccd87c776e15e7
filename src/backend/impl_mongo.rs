// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! A MongoDB deployment, through the driver's blocking API.
//!
//! Records are `{key: BinData, value: BinData, keyHex: string}`. Point
//! lookups use `key`; ranges and sorting use `keyHex`, because BSON orders
//! binary values by length before content while lowercase hex strings sort
//! exactly like the bytes they encode.

mod client;
mod collection;
mod cursor;
mod error;

pub use client::ClientImpl;
pub use collection::CollectionImpl;
pub use cursor::CursorImpl;
pub use error::ErrorImpl;
