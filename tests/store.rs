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
    BackendCollection,
    Durability,
    SafeMode,
    SafeModeCollection,
    WriteConcern,
};
use dockv::codec::key_hex;
use dockv::{
    Config,
    Store,
    StoreError,
};
use uuid::Uuid;

fn open() -> Store<SafeModeCollection> {
    let name = format!("test_{}", Uuid::new_v4().simple());
    Store::open::<SafeMode>(&name, "memory://").expect("opened")
}

#[test]
fn test_set_get() {
    let store = open();
    assert_eq!(store.get(b"missing").expect("read"), None);
    assert!(!store.has(b"missing").expect("read"));

    store.set(b"key", b"value").expect("set");
    assert_eq!(store.get(b"key").expect("read"), Some(b"value".to_vec()));
    assert!(store.has(b"key").expect("read"));

    store.set_sync(b"key", b"other").expect("set_sync");
    assert_eq!(store.get(b"key").expect("read"), Some(b"other".to_vec()));
}

#[test]
fn test_empty_value_is_stored() {
    let store = open();
    store.set(b"key", b"").expect("set");
    assert_eq!(store.get(b"key").expect("read"), Some(vec![]));
    assert!(store.has(b"key").expect("read"));
}

#[test]
fn test_delete() {
    let store = open();
    store.set(b"a", b"1").expect("set");
    store.set(b"b", b"2").expect("set");

    store.delete(b"a").expect("deleted");
    assert_eq!(store.get(b"a").expect("read"), None);
    store.delete_sync(b"b").expect("deleted");
    assert_eq!(store.get(b"b").expect("read"), None);

    // Deleting a missing key is fine.
    store.delete(b"a").expect("deleted again");
}

#[test]
fn test_empty_key() {
    let store = open();
    assert!(matches!(store.get(b""), Err(StoreError::InvalidKey)));
    assert!(matches!(store.has(b""), Err(StoreError::InvalidKey)));
    assert!(matches!(store.set(b"", b"v"), Err(StoreError::InvalidKey)));
    assert!(matches!(store.set_sync(b"", b"v"), Err(StoreError::InvalidKey)));
    assert!(matches!(store.delete(b""), Err(StoreError::InvalidKey)));
    assert!(matches!(store.delete_sync(b""), Err(StoreError::InvalidKey)));
}

#[test]
fn test_set_is_idempotent() {
    let store = open();
    store.set(b"key", b"value").expect("set");
    store.set(b"key", b"value").expect("set");
    store.set_sync(b"key", b"value").expect("set");
    assert_eq!(store.collection().len().expect("len"), 1);
}

#[test]
fn test_binary_keys() {
    let store = open();
    let key: [u8; 4] = [0x00, 0xff, 0x10, 0x00];
    store.set(key, [0xde_u8, 0xad]).expect("set");
    assert_eq!(store.get(key).expect("read"), Some(vec![0xde, 0xad]));
    assert_eq!(store.get([0x00_u8, 0xff, 0x10]).expect("read"), None);
}

#[test]
fn test_durability_tiers_share_a_collection() {
    let store = open();
    assert_eq!(store.collection().id(), store.sync_collection().id());
    assert_eq!(store.collection().namespace(), store.sync_collection().namespace());
    assert_eq!(store.collection().durability(), &Durability::Default);
    assert_eq!(store.sync_collection().durability(), &Durability::Acknowledged(WriteConcern::majority()));

    store.set_sync(b"synced", b"1").expect("set_sync");
    store.set(b"plain", b"2").expect("set");
    assert_eq!(store.get(b"synced").expect("read"), Some(b"1".to_vec()));
    assert_eq!(store.sync_collection().len().expect("len"), 2);
}

#[test]
fn test_key_hex_is_kept() {
    let store = open();
    store.set(b"\x01\xab", b"single").expect("set");
    let mut batch = store.new_batch();
    batch.set(b"\x02", b"batched").expect("buffered");
    batch.write().expect("written");

    for (key, value) in &[(&b"\x01\xab"[..], &b"single"[..]), (&b"\x02"[..], &b"batched"[..])] {
        let raw = store.collection().find_by_key_hex(&key_hex(key)).expect("read").expect("found");
        assert_eq!(raw.key.as_deref(), Some(*key));
        assert_eq!(raw.value.as_deref(), Some(*value));
    }
    assert_eq!(key_hex(b"\x01\xab"), "01ab");
}

#[test]
fn test_indexes() {
    let store = open();
    assert_eq!(store.collection().indexes().expect("indexes"), vec!["key".to_owned(), "keyHex".to_owned()]);
}

#[test]
fn test_stores_on_one_client() {
    let client = SafeMode::new();
    let config = Config::new("shared", "memory://");
    let first = Store::from_client(&client, &config).expect("opened");
    let second = Store::from_client(&client, &config).expect("opened");
    first.set(b"k", b"v").expect("set");
    assert_eq!(second.get(b"k").expect("read"), Some(b"v".to_vec()));

    let elsewhere = Store::from_client(&client, &config.clone().database("other")).expect("opened");
    assert_eq!(elsewhere.get(b"k").expect("read"), None);
}

#[test]
fn test_open_errors() {
    assert!(matches!(Store::open::<SafeMode>("t", "not a uri"), Err(StoreError::InvalidUri(_))));
    assert!(matches!(Store::open::<SafeMode>("t", "mongodb://localhost"), Err(StoreError::InvalidUri(_))));
}

#[test]
fn test_close() {
    let store = open();
    store.set(b"k", b"v").expect("set");
    let iter = store.iter(None, None).expect("iter");
    store.close().expect("closed");
    store.close().expect("closed twice");
    assert!(iter.valid());
}
