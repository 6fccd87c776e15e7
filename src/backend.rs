// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

mod common;
mod impl_safe;
mod traits;

#[cfg(feature = "mongodb")]
mod impl_mongo;

pub use common::*;
pub use traits::*;

pub use impl_safe::ClientImpl as SafeMode;
pub use impl_safe::CollectionImpl as SafeModeCollection;
pub use impl_safe::CursorImpl as SafeModeCursor;
pub use impl_safe::ErrorImpl as SafeModeError;

#[cfg(feature = "mongodb")]
pub use impl_mongo::ClientImpl as MongoDb;
#[cfg(feature = "mongodb")]
pub use impl_mongo::CollectionImpl as MongoDbCollection;
#[cfg(feature = "mongodb")]
pub use impl_mongo::CursorImpl as MongoDbCursor;
#[cfg(feature = "mongodb")]
pub use impl_mongo::ErrorImpl as MongoDbError;
