// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! A cursor over a key range.
//!
//! ```ignore
//! let mut iter = store.iter(Some(&b"b"[..]), Some(&b"d"[..]))?;
//! while iter.valid() {
//!     println!("{:?} => {:?}", iter.key(), iter.value());
//!     iter.next();
//! }
//! iter.close()?;
//! ```

use std::convert::TryFrom;

use log::{
    debug,
    warn,
};

use crate::backend::{
    BackendCollection,
    BackendCursor,
};
use crate::codec::{
    check_bound,
    Filter,
    Record,
    SortOrder,
};
use crate::error::StoreError;

#[derive(Debug)]
enum State {
    Created,
    Valid(Record),
    Invalid,
}

// What a record that doesn't decode means at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    // The first record: remembered as the iterator's error.
    Prime,
    // Any later record: the store is corrupt, so panic.
    Next,
}

/// An iterator over `start <= key < end`, ascending or descending.
///
/// The cursor is positioned on its first record when the iterator is
/// created. `valid` is a pure query; the decoding and bounds checks happen
/// when the iterator moves. Once invalid, an iterator stays invalid.
///
/// `key`, `value` and `next` panic on an invalid iterator: check `valid`
/// first.
#[derive(Debug)]
pub struct Iter<R>
where
    R: BackendCursor,
{
    cursor: Option<R>,
    start: Option<Vec<u8>>,
    end: Option<Vec<u8>>,
    order: SortOrder,
    state: State,
    last_err: Option<StoreError>,
}

impl<R> Iter<R>
where
    R: BackendCursor,
{
    pub(crate) fn open<C>(collection: &C, start: Option<&[u8]>, end: Option<&[u8]>, order: SortOrder) -> Result<Iter<R>, StoreError>
    where
        C: BackendCollection<Cursor = R>,
    {
        check_bound(start)?;
        check_bound(end)?;
        let cursor = collection.find(&Filter::range(start, end), order).map_err(StoreError::from_backend)?;
        debug!("Opened {:?} iterator on {}", order, collection.namespace());
        Ok(Iter::new(cursor, start, end, order))
    }

    pub(crate) fn new(cursor: R, start: Option<&[u8]>, end: Option<&[u8]>, order: SortOrder) -> Iter<R> {
        let mut iter = Iter {
            cursor: Some(cursor),
            start: start.map(<[u8]>::to_vec),
            end: end.map(<[u8]>::to_vec),
            order,
            state: State::Created,
            last_err: None,
        };
        iter.refresh(Step::Prime);
        iter
    }

    /// The `(start, end)` bounds this iterator was created with.
    pub fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        (self.start.as_deref(), self.end.as_deref())
    }

    pub fn valid(&self) -> bool {
        matches!(self.state, State::Valid(_))
    }

    pub fn key(&self) -> &[u8] {
        &self.current().key
    }

    pub fn value(&self) -> &[u8] {
        &self.current().value
    }

    pub fn next(&mut self) {
        self.current();
        self.refresh(Step::Next);
    }

    /// The last error other than running out of records.
    pub fn error(&self) -> Option<&StoreError> {
        self.last_err.as_ref()
    }

    /// Release the cursor. Closing twice is fine.
    pub fn close(&mut self) -> Result<(), StoreError> {
        self.state = State::Invalid;
        match self.cursor.take() {
            Some(mut cursor) => {
                debug!("Closing {:?} iterator", self.order);
                cursor.close().map_err(StoreError::from_backend)
            },
            None => Ok(()),
        }
    }

    fn current(&self) -> &Record {
        match &self.state {
            State::Valid(record) => record,
            _ => panic!("iterator is invalid"),
        }
    }

    // Forward iteration stops at `end`, reverse iteration at `start`; the
    // other side is where the cursor started.
    fn in_domain(&self, key: &[u8]) -> bool {
        if self.order.is_reverse() {
            self.start.as_deref().map_or(true, |start| key >= start)
        } else {
            self.end.as_deref().map_or(true, |end| key < end)
        }
    }

    fn invalidate(&mut self, err: Option<StoreError>) {
        if err.is_some() {
            self.last_err = err;
        }
        self.state = State::Invalid;
    }

    fn refresh(&mut self, step: Step) {
        let cursor = match self.cursor.as_mut() {
            Some(cursor) => cursor,
            None => return self.invalidate(None),
        };

        match cursor.advance() {
            Ok(true) => {},
            Ok(false) => return self.invalidate(None),
            Err(e) => return self.invalidate(Some(e.into())),
        }

        let decoded = cursor
            .current()
            .map_err(StoreError::from_backend)
            .and_then(|raw| Record::try_from(raw).map_err(StoreError::from));
        let record = match (decoded, step) {
            (Ok(record), _) => record,
            (Err(e), Step::Prime) => return self.invalidate(Some(e)),
            (Err(e), Step::Next) => panic!("unable to decode current cursor: {}", e),
        };

        self.state = if self.in_domain(&record.key) {
            State::Valid(record)
        } else {
            State::Invalid
        };
    }
}

impl<R> Drop for Iter<R>
where
    R: BackendCursor,
{
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close iterator cursor: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        SafeMode,
        SafeModeCollection,
        SafeModeCursor,
    };
    use crate::store::Store;

    fn populated() -> Store<SafeModeCollection> {
        let store = Store::open::<SafeMode>("iter", "memory://").expect("opened");
        for key in &["a", "b", "c", "d"] {
            store.set(key, key.to_uppercase()).expect("set");
        }
        store
    }

    fn keys(mut iter: Iter<SafeModeCursor>) -> Vec<Vec<u8>> {
        let mut keys = vec![];
        while iter.valid() {
            keys.push(iter.key().to_vec());
            iter.next();
        }
        iter.close().expect("closed");
        keys
    }

    #[test]
    fn test_state_is_settled_at_creation() {
        let store = populated();
        let iter = store.iter(Some(&b"b"[..]), None).expect("iter");
        assert!(iter.valid());
        assert!(iter.valid());
        assert_eq!(iter.key(), b"b");
        assert_eq!(iter.value(), b"B");
    }

    #[test]
    fn test_recheck_stops_at_end_bound() {
        // A cursor that ignores the filter and returns everything.
        let store = populated();
        let cursor = store.collection().find(&Filter::All, SortOrder::Ascending).expect("cursor");
        let iter = Iter::new(cursor, Some(&b"a"[..]), Some(&b"c"[..]), SortOrder::Ascending);
        assert_eq!(keys(iter), vec![b"a".to_vec(), b"b".to_vec()]);

        let cursor = store.collection().find(&Filter::All, SortOrder::Descending).expect("cursor");
        let iter = Iter::new(cursor, Some(&b"b"[..]), Some(&b"c"[..]), SortOrder::Descending);
        assert_eq!(keys(iter), vec![b"d".to_vec(), b"c".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_undecodable_first_record_is_an_error() {
        let store = populated();
        store.collection().insert_raw(b"0", None).expect("planted");

        let iter = store.iter(None, None).expect("iter");
        assert!(!iter.valid());
        assert!(matches!(iter.error(), Some(StoreError::DecodeError(_))));
    }

    #[test]
    #[should_panic(expected = "unable to decode current cursor")]
    fn test_undecodable_later_record_panics() {
        let store = populated();
        store.collection().insert_raw(b"bb", None).expect("planted");

        let mut iter = store.iter(Some(&b"b"[..]), None).expect("iter");
        assert_eq!(iter.key(), b"b");
        iter.next();
    }

    #[test]
    fn test_transport_error_is_recorded() {
        let store = populated();
        let cursor = store.collection().find(&Filter::All, SortOrder::Ascending).expect("cursor").failing_at(2);
        let mut iter = Iter::new(cursor, None, None, SortOrder::Ascending);

        iter.next();
        assert_eq!(iter.key(), b"b");
        iter.next();
        assert!(!iter.valid());
        assert!(matches!(iter.error(), Some(StoreError::IoError(_))));
    }

    #[test]
    fn test_exhaustion_is_not_an_error() {
        let store = populated();
        let mut iter = store.iter(Some(&b"d"[..]), None).expect("iter");
        iter.next();
        assert!(!iter.valid());
        assert!(iter.error().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let store = populated();
        let mut iter = store.iter(None, None).expect("iter");
        iter.close().expect("closed");
        iter.close().expect("closed again");
        assert!(!iter.valid());
    }

    #[test]
    #[should_panic(expected = "iterator is invalid")]
    fn test_value_on_exhausted_iterator_panics() {
        let store = populated();
        let mut iter = store.iter(Some(&b"d"[..]), None).expect("iter");
        iter.next();
        iter.value();
    }
}
