// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use dockv::backend::{
    SafeMode,
    SafeModeCollection,
    SafeModeCursor,
};
use dockv::{
    Db,
    DbIterator,
    Iter,
    Store,
    StoreError,
};
use proptest::prelude::*;
use uuid::Uuid;

fn open() -> Store<SafeModeCollection> {
    let name = format!("iter_{}", Uuid::new_v4().simple());
    Store::open::<SafeMode>(&name, "memory://").expect("opened")
}

fn populated() -> Store<SafeModeCollection> {
    let store = open();
    for key in &["a", "b", "c", "d"] {
        store.set(key, key.to_uppercase()).expect("set");
    }
    store
}

fn collect(mut iter: Iter<SafeModeCursor>) -> Vec<String> {
    let mut keys = vec![];
    while iter.valid() {
        keys.push(String::from_utf8(iter.key().to_vec()).expect("utf8"));
        iter.next();
    }
    assert!(iter.error().is_none());
    iter.close().expect("closed");
    keys
}

fn bound(key: &str) -> Option<&[u8]> {
    Some(key.as_bytes())
}

#[test]
fn test_forward() {
    let store = populated();
    assert_eq!(collect(store.iter(None, None).expect("iter")), vec!["a", "b", "c", "d"]);
    assert_eq!(collect(store.iter(bound("b"), bound("d")).expect("iter")), vec!["b", "c"]);
    assert_eq!(collect(store.iter(bound("bb"), None).expect("iter")), vec!["c", "d"]);
    assert_eq!(collect(store.iter(None, bound("b")).expect("iter")), vec!["a"]);
}

#[test]
fn test_reverse() {
    let store = populated();
    assert_eq!(collect(store.rev_iter(None, None).expect("iter")), vec!["d", "c", "b", "a"]);
    assert_eq!(collect(store.rev_iter(bound("b"), bound("d")).expect("iter")), vec!["c", "b"]);
    assert_eq!(collect(store.rev_iter(bound("b"), None).expect("iter")), vec!["d", "c", "b"]);
    assert_eq!(collect(store.rev_iter(None, bound("b")).expect("iter")), vec!["a"]);
}

#[test]
fn test_empty_ranges() {
    let store = populated();
    assert!(collect(store.iter(bound("c"), bound("c")).expect("iter")).is_empty());
    assert!(collect(store.iter(bound("d"), bound("b")).expect("iter")).is_empty());
    assert!(collect(store.rev_iter(bound("d"), bound("b")).expect("iter")).is_empty());
    assert!(collect(store.iter(bound("e"), None).expect("iter")).is_empty());
    assert!(collect(open().iter(None, None).expect("iter")).is_empty());
}

#[test]
fn test_values_and_domain() {
    let store = populated();
    let mut iter = store.iter(bound("b"), None).expect("iter");
    assert_eq!(iter.domain(), (Some(&b"b"[..]), None));
    assert_eq!(iter.key(), b"b");
    assert_eq!(iter.value(), b"B");
    iter.next();
    assert_eq!(iter.key(), b"c");
    assert_eq!(iter.value(), b"C");
}

#[test]
fn test_empty_bound() {
    let store = populated();
    assert!(matches!(store.iter(Some(&b""[..]), None), Err(StoreError::InvalidKey)));
    assert!(matches!(store.rev_iter(None, Some(&b""[..])), Err(StoreError::InvalidKey)));
}

#[test]
fn test_byte_order() {
    let store = open();
    for key in &[&[0x02u8][..], &[0x01, 0xff][..], &[0x01][..], &[0x10, 0x00][..]] {
        store.set(key, b"v").expect("set");
    }
    let mut iter = store.iter(None, None).expect("iter");
    let mut keys = vec![];
    while iter.valid() {
        keys.push(iter.key().to_vec());
        iter.next();
    }
    assert_eq!(keys, vec![vec![0x01], vec![0x01, 0xff], vec![0x02], vec![0x10, 0x00]]);
}

#[test]
fn test_iterator_sees_a_snapshot_of_its_range() {
    let store = populated();
    let iter = store.iter(None, None).expect("iter");
    store.set(b"e", b"E").expect("set");
    assert_eq!(collect(iter), vec!["a", "b", "c", "d"]);
}

#[test]
#[should_panic(expected = "iterator is invalid")]
fn test_key_on_invalid_iterator() {
    let store = open();
    let iter = store.iter(None, None).expect("iter");
    iter.key();
}

#[test]
#[should_panic(expected = "iterator is invalid")]
fn test_next_on_invalid_iterator() {
    let store = populated();
    let mut iter = store.iter(bound("d"), None).expect("iter");
    iter.next();
    iter.next();
}

#[test]
#[should_panic(expected = "iterator is invalid")]
fn test_key_after_close() {
    let store = populated();
    let mut iter = store.iter(None, None).expect("iter");
    iter.close().expect("closed");
    iter.key();
}

#[test]
fn test_iterator_through_trait_object() {
    let store = populated();
    let db: Box<dyn Db> = Box::new(store);
    let mut iter: Box<dyn DbIterator> = db.reverse_iterator(bound("a"), bound("c")).expect("iter");
    let mut keys = vec![];
    while iter.valid() {
        keys.push(iter.key().to_vec());
        iter.next();
    }
    iter.close().expect("closed");
    iter.close().expect("closed twice");
    assert_eq!(keys, vec![b"b".to_vec(), b"a".to_vec()]);
    assert!(matches!(db.iterator(Some(&b""[..]), None), Err(StoreError::InvalidKey)));
}

proptest! {
    #[test]
    fn iteration_matches_sorted_map(
        entries in prop::collection::btree_map(prop::collection::vec(any::<u8>(), 1..6), any::<u8>(), 0..24),
        start in prop::option::of(prop::collection::vec(any::<u8>(), 1..4)),
        end in prop::option::of(prop::collection::vec(any::<u8>(), 1..4)),
    ) {
        let store = open();
        for (key, value) in &entries {
            store.set(key, [*value]).expect("set");
        }

        let expected: Vec<Vec<u8>> = entries
            .keys()
            .filter(|k| start.as_ref().map_or(true, |s| *k >= s) && end.as_ref().map_or(true, |e| *k < e))
            .cloned()
            .collect();

        let mut forward = vec![];
        let mut iter = store.iter(start.as_deref(), end.as_deref()).expect("iter");
        while iter.valid() {
            forward.push(iter.key().to_vec());
            iter.next();
        }
        prop_assert_eq!(&forward, &expected);

        let mut backward = vec![];
        let mut iter = store.rev_iter(start.as_deref(), end.as_deref()).expect("iter");
        while iter.valid() {
            backward.push(iter.key().to_vec());
            iter.next();
        }
        backward.reverse();
        prop_assert_eq!(&backward, &expected);

        prop_assert_eq!(entries.len(), store.collection().len().expect("len"));
    }
}
