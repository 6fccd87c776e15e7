// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{
    doc,
    Binary,
    Bson,
    Document,
};
use mongodb::error::ErrorKind;
use mongodb::options::{
    FindOneOptions,
    FindOptions,
    UpdateOptions,
};
use mongodb::sync::{
    Collection,
    Database,
};
use mongodb::IndexModel;

use super::{
    CursorImpl,
    ErrorImpl,
};
use crate::backend::common::{
    Acknowledgment,
    Durability,
};
use crate::backend::traits::BackendCollection;
use crate::codec::{
    key_hex,
    Filter,
    RawRecord,
    SortOrder,
    WriteOp,
    KEY_FIELD,
    KEY_HEX_FIELD,
    VALUE_FIELD,
};

// listIndexes on a collection that doesn't exist yet.
const NAMESPACE_NOT_FOUND: i32 = 26;

#[derive(Debug, Clone)]
pub struct CollectionImpl {
    database: Database,
    collection: Collection<Document>,
    durability: Durability,
}

fn binary(bytes: &[u8]) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: bytes.to_vec(),
    })
}

fn to_query(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::Key(key) => doc! { KEY_FIELD: binary(key) },
        Filter::Range {
            start,
            end,
        } => {
            let mut range = Document::new();
            if let Some(start) = start {
                range.insert("$gte", key_hex(start));
            }
            if let Some(end) = end {
                range.insert("$lt", key_hex(end));
            }
            doc! { KEY_HEX_FIELD: range }
        },
    }
}

fn to_update(key: &[u8], value: &[u8]) -> Document {
    doc! { "$set": { VALUE_FIELD: binary(value), KEY_HEX_FIELD: key_hex(key) } }
}

impl CollectionImpl {
    pub(crate) fn new(database: Database, collection: Collection<Document>, durability: Durability) -> CollectionImpl {
        CollectionImpl {
            database,
            collection,
            durability,
        }
    }

    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    // One `update` or `delete` command for a run of operations of the same kind.
    fn command(&self, run: &[WriteOp]) -> Document {
        let mut command = match run.first() {
            Some(WriteOp::Delete {
                ..
            }) => {
                let deletes: Vec<Document> =
                    run.iter().map(|op| doc! { "q": to_query(&op.filter()), "limit": 1 }).collect();
                doc! { "delete": self.collection.name(), "deletes": deletes, "ordered": true }
            },
            _ => {
                let updates: Vec<Document> = run
                    .iter()
                    .filter_map(|op| match op {
                        WriteOp::Upsert {
                            key,
                            value,
                        } => Some(doc! { "q": to_query(&op.filter()), "u": to_update(key, value), "upsert": true }),
                        WriteOp::Delete {
                            ..
                        } => None,
                    })
                    .collect();
                doc! { "update": self.collection.name(), "updates": updates, "ordered": true }
            },
        };
        if let Durability::Acknowledged(wc) = &self.durability {
            let w = match &wc.w {
                Acknowledgment::Nodes(n) => Bson::Int64(i64::from(*n)),
                Acknowledgment::Majority => Bson::String("majority".to_owned()),
                Acknowledgment::Custom(tag) => Bson::String(tag.clone()),
            };
            let mut concern = doc! { "w": w };
            if let Some(journal) = wc.journal {
                concern.insert("j", journal);
            }
            command.insert("writeConcern", concern);
        }
        command
    }
}

fn same_kind(a: &WriteOp, b: &WriteOp) -> bool {
    matches!(
        (a, b),
        (WriteOp::Upsert { .. }, WriteOp::Upsert { .. }) | (WriteOp::Delete { .. }, WriteOp::Delete { .. })
    )
}

// The server reports failures of an ordered write in the reply, not as a
// command error.
fn check_reply(reply: &Document, offset: usize) -> Result<(), ErrorImpl> {
    if let Ok(errors) = reply.get_array("writeErrors") {
        if let Some(Bson::Document(first)) = errors.first() {
            let index = first.get_i32("index").map_or(0, |i| i as usize);
            let message = first.get_str("errmsg").unwrap_or("unknown write error").to_owned();
            return Err(ErrorImpl::WriteError {
                index: offset + index,
                message,
            });
        }
    }
    if let Ok(concern) = reply.get_document("writeConcernError") {
        let message = concern.get_str("errmsg").unwrap_or("write concern error").to_owned();
        return Err(ErrorImpl::WriteError {
            index: offset,
            message,
        });
    }
    Ok(())
}

impl BackendCollection for CollectionImpl {
    type Cursor = CursorImpl;
    type Error = ErrorImpl;

    fn namespace(&self) -> String {
        format!("{}.{}", self.database.name(), self.collection.name())
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<RawRecord>, Self::Error> {
        let mut options = FindOneOptions::default();
        options.projection = Some(doc! { "_id": 0 });
        match self.collection.find_one(to_query(filter), options)? {
            Some(doc) => Ok(Some(CursorImpl::decode(&doc)?)),
            None => Ok(None),
        }
    }

    fn upsert_one(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error> {
        let mut options = UpdateOptions::default();
        options.upsert = Some(true);
        self.collection.update_one(to_query(&Filter::key(key)), to_update(key, value), options)?;
        Ok(())
    }

    fn delete_one(&self, filter: &Filter) -> Result<(), Self::Error> {
        self.collection.delete_one(to_query(filter), None)?;
        Ok(())
    }

    fn find(&self, filter: &Filter, order: SortOrder) -> Result<Self::Cursor, Self::Error> {
        let mut options = FindOptions::default();
        options.projection = Some(doc! { "_id": 0 });
        options.sort = Some(doc! { KEY_HEX_FIELD: order.as_i32() });
        let cursor = self.collection.find(to_query(filter), options)?;
        Ok(CursorImpl::new(cursor))
    }

    fn bulk_write(&self, ops: &[WriteOp]) -> Result<(), Self::Error> {
        let mut offset = 0;
        for run in runs(ops) {
            let reply = self.database.run_command(self.command(run), None)?;
            check_reply(&reply, offset)?;
            offset += run.len();
        }
        Ok(())
    }

    fn ensure_index(&self, field: &str) -> Result<(), Self::Error> {
        let existing = match self.collection.list_indexes(None) {
            Ok(cursor) => cursor.collect::<Result<Vec<IndexModel>, _>>()?,
            Err(e) => match *e.kind {
                ErrorKind::Command(ref c) if c.code == NAMESPACE_NOT_FOUND => Vec::new(),
                _ => return Err(e.into()),
            },
        };
        if existing.iter().any(|index| index.keys.contains_key(field)) {
            return Ok(());
        }
        let index = IndexModel::builder().keys(doc! { field: 1 }).build();
        self.collection.create_index(index, None)?;
        Ok(())
    }
}

// Consecutive operations of the same kind, in order.
fn runs(ops: &[WriteOp]) -> Vec<&[WriteOp]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=ops.len() {
        if i == ops.len() || !same_kind(&ops[start], &ops[i]) {
            runs.push(&ops[start..i]);
            start = i;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs() {
        let ops = vec![
            WriteOp::upsert(b"a", Some(&b"1"[..])).expect("op"),
            WriteOp::upsert(b"b", Some(&b"2"[..])).expect("op"),
            WriteOp::delete(b"a").expect("op"),
            WriteOp::upsert(b"a", Some(&b"3"[..])).expect("op"),
        ];
        let lens: Vec<usize> = runs(&ops).iter().map(|run| run.len()).collect();
        assert_eq!(lens, vec![2, 1, 1]);
        assert!(runs(&[]).is_empty());
    }

    #[test]
    fn test_range_query_uses_key_hex() {
        let query = to_query(&Filter::range(Some(&b"\x01"[..]), Some(&b"\xff"[..])));
        assert_eq!(query, doc! { "keyHex": { "$gte": "01", "$lt": "ff" } });
        assert_eq!(to_query(&Filter::range(None, None)), Document::new());
    }

    #[test]
    fn test_reply_write_errors() {
        let reply = doc! { "ok": 1, "n": 1, "writeErrors": [{ "index": 1, "code": 11000, "errmsg": "duplicate key" }] };
        match check_reply(&reply, 3) {
            Err(ErrorImpl::WriteError {
                index,
                message,
            }) => {
                assert_eq!(index, 4);
                assert_eq!(message, "duplicate key");
            },
            other => panic!("expected WriteError, got {:?}", other),
        }
        assert!(check_reply(&doc! { "ok": 1, "n": 2 }, 0).is_ok());
    }
}
