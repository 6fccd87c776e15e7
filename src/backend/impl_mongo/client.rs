// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use mongodb::bson::doc;
use mongodb::options::{
    Acknowledgment as MongoAcknowledgment,
    CollectionOptions,
    WriteConcern as MongoWriteConcern,
};
use mongodb::sync::Client;

use super::{
    CollectionImpl,
    ErrorImpl,
};
use crate::backend::common::{
    Acknowledgment,
    Durability,
    WriteConcern,
};
use crate::backend::traits::BackendClient;

#[derive(Debug, Clone)]
pub struct ClientImpl(Client);

pub(crate) fn write_concern(wc: &WriteConcern) -> MongoWriteConcern {
    let mut concern = MongoWriteConcern::default();
    concern.w = Some(match &wc.w {
        Acknowledgment::Nodes(n) => MongoAcknowledgment::Nodes(*n),
        Acknowledgment::Majority => MongoAcknowledgment::Majority,
        Acknowledgment::Custom(tag) => MongoAcknowledgment::Custom(tag.clone()),
    });
    concern.journal = wc.journal;
    concern
}

impl BackendClient for ClientImpl {
    type Collection = CollectionImpl;
    type Error = ErrorImpl;

    const SCHEMES: &'static [&'static str] = &["mongodb", "mongodb+srv"];

    fn connect(uri: &str) -> Result<Self, Self::Error> {
        Ok(ClientImpl(Client::with_uri_str(uri)?))
    }

    fn ping(&self, database: &str) -> Result<(), Self::Error> {
        self.0.database(database).run_command(doc! { "ping": 1 }, None)?;
        Ok(())
    }

    fn collection(&self, database: &str, name: &str, durability: &Durability) -> Result<Self::Collection, Self::Error> {
        let db = self.0.database(database);
        let mut options = CollectionOptions::default();
        if let Durability::Acknowledged(wc) = durability {
            options.write_concern = Some(write_concern(wc));
        }
        let collection = db.collection_with_options(name, options);
        Ok(CollectionImpl::new(db, collection, durability.clone()))
    }
}
