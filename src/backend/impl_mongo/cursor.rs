// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::fmt;

use mongodb::bson::{
    Bson,
    Document,
};
use mongodb::sync::Cursor;

use super::ErrorImpl;
use crate::backend::traits::BackendCursor;
use crate::codec::{
    RawRecord,
    KEY_FIELD,
    VALUE_FIELD,
};
use crate::error::DataError;

pub struct CursorImpl {
    cursor: Option<Cursor<Document>>,
}

impl CursorImpl {
    pub(crate) fn new(cursor: Cursor<Document>) -> CursorImpl {
        CursorImpl {
            cursor: Some(cursor),
        }
    }

    /// Read `{key, value}` out of a stored document. Absent (or null) fields
    /// come back as `None`; fields of any other non-binary type are an error.
    pub(crate) fn decode(doc: &Document) -> Result<RawRecord, DataError> {
        Ok(RawRecord {
            key: binary_field(doc, KEY_FIELD)?,
            value: binary_field(doc, VALUE_FIELD)?,
        })
    }
}

fn binary_field(doc: &Document, field: &'static str) -> Result<Option<Vec<u8>>, DataError> {
    match doc.get(field) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Binary(binary)) => Ok(Some(binary.bytes.clone())),
        Some(_) => Err(DataError::UnexpectedType {
            field,
            expected: "binary",
        }),
    }
}

impl fmt::Debug for CursorImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CursorImpl").field("closed", &self.cursor.is_none()).finish()
    }
}

impl BackendCursor for CursorImpl {
    type Error = ErrorImpl;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        let cursor = self.cursor.as_mut().ok_or(ErrorImpl::CursorClosed)?;
        Ok(cursor.advance()?)
    }

    fn current(&self) -> Result<RawRecord, Self::Error> {
        let cursor = self.cursor.as_ref().ok_or(ErrorImpl::CursorClosed)?;
        let doc: Document = cursor.deserialize_current()?;
        Ok(CursorImpl::decode(&doc)?)
    }

    // Dropping the driver's cursor kills it on the server.
    fn close(&mut self) -> Result<(), Self::Error> {
        self.cursor = None;
        Ok(())
    }
}
