// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use super::collection::Document;
use super::ErrorImpl;
use crate::backend::traits::BackendCursor;
use crate::codec::RawRecord;

/// A cursor over the records a query matched when it was opened.
#[derive(Debug)]
pub struct CursorImpl {
    docs: Vec<(Vec<u8>, Document)>,
    // Index of the current record, `None` before the first `advance`.
    pos: Option<usize>,
    closed: bool,
    #[cfg(test)]
    fail_at: Option<usize>,
}

impl CursorImpl {
    pub(crate) fn new(docs: Vec<(Vec<u8>, Document)>) -> CursorImpl {
        CursorImpl {
            docs,
            pos: None,
            closed: false,
            #[cfg(test)]
            fail_at: None,
        }
    }

    /// Make the `n`th call to `advance` fail.
    #[cfg(test)]
    pub(crate) fn failing_at(mut self, n: usize) -> CursorImpl {
        self.fail_at = Some(n);
        self
    }
}

impl BackendCursor for CursorImpl {
    type Error = ErrorImpl;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        if self.closed {
            return Err(ErrorImpl::CursorClosed);
        }
        let next = self.pos.map_or(0, |p| p + 1);
        #[cfg(test)]
        {
            if self.fail_at == Some(next) {
                return Err(ErrorImpl::Injected);
            }
        }
        self.pos = Some(next.min(self.docs.len()));
        Ok(next < self.docs.len())
    }

    fn current(&self) -> Result<RawRecord, Self::Error> {
        if self.closed {
            return Err(ErrorImpl::CursorClosed);
        }
        let (key, doc) = self.pos.and_then(|p| self.docs.get(p)).ok_or(ErrorImpl::NoCurrentRecord)?;
        Ok(doc.to_raw(key))
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        self.docs.clear();
        Ok(())
    }
}
