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
use crate::error::{
    DataError,
    StoreError,
};

#[derive(Debug, Error)]
pub enum ErrorImpl {
    #[error("mongodb error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("write failed at operation {index}: {message}")]
    WriteError {
        index: usize,
        message: String,
    },

    #[error("cursor is closed")]
    CursorClosed,

    #[error(transparent)]
    DataError(#[from] DataError),
}

impl BackendError for ErrorImpl {}

impl From<ErrorImpl> for StoreError {
    fn from(e: ErrorImpl) -> StoreError {
        match e {
            ErrorImpl::DataError(e) => StoreError::DecodeError(e),
            e => StoreError::io(e),
        }
    }
}
