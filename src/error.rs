// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::error::Error as StdError;

use thiserror::Error;

/// A stored record didn't have the shape `{key: bytes, value: bytes}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unexpected type for field {field}: expected {expected}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key cannot be empty")]
    InvalidKey,

    #[error("value cannot be nil")]
    InvalidValue,

    #[error("batch has already been closed")]
    BatchClosed,

    #[error("data error: {0}")]
    DecodeError(#[from] DataError),

    #[error("I/O error: {0}")]
    IoError(#[source] Box<dyn StdError + Send + Sync>),

    #[error("unable to connect to {database}: {uri}: {reason}")]
    ConnectError {
        database: String,
        uri: String,
        reason: String,
    },

    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("backend already registered: {0}")]
    BackendAlreadyRegistered(String),
}

impl StoreError {
    pub(crate) fn from_backend<E: Into<StoreError>>(err: E) -> StoreError {
        err.into()
    }

    pub(crate) fn io<E>(err: E) -> StoreError
    where
        E: StdError + Send + Sync + 'static,
    {
        StoreError::IoError(Box::new(err))
    }
}
