// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use thiserror::Error;

use crate::backend::traits::BackendError;
use crate::error::StoreError;

#[derive(Debug, Error)]
pub enum ErrorImpl {
    #[error("collection lock poisoned")]
    PoisonError,

    #[error("cursor is closed")]
    CursorClosed,

    #[error("cursor is not positioned on a record")]
    NoCurrentRecord,

    #[cfg(test)]
    #[error("injected failure")]
    Injected,
}

impl BackendError for ErrorImpl {}

impl From<ErrorImpl> for StoreError {
    fn from(e: ErrorImpl) -> StoreError {
        StoreError::io(e)
    }
}
