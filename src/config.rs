// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::env;
use std::fmt;

use serde_derive::{
    Deserialize,
    Serialize,
};

use crate::backend::WriteConcern;

pub const DEFAULT_DATABASE: &str = "dockv";

/// Overrides the connection URI when set and non-empty.
pub const URI_ENV: &str = "MONGODB_URI";

/// Overrides the database name when set and non-empty.
pub const DATABASE_ENV: &str = "MONGODB_DBNAME";

/// Where a store lives: `name` is the collection, `database` the database
/// holding it. `sync_concern` is the acknowledgment policy of the `*_sync`
/// write target.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub sync_concern: WriteConcern,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_owned()
}

impl Config {
    pub fn new(name: &str, uri: &str) -> Config {
        Config {
            name: name.to_owned(),
            uri: uri.to_owned(),
            database: default_database(),
            sync_concern: WriteConcern::default(),
        }
    }

    /// Like `new`, with `MONGODB_URI` and `MONGODB_DBNAME` applied on top.
    pub fn from_env(name: &str, uri: &str) -> Config {
        Config::new(name, uri).with_overrides(env::var(URI_ENV).ok(), env::var(DATABASE_ENV).ok())
    }

    pub fn database(mut self, database: &str) -> Config {
        self.database = database.to_owned();
        self
    }

    pub fn sync_concern(mut self, concern: WriteConcern) -> Config {
        self.sync_concern = concern;
        self
    }

    fn with_overrides(mut self, uri: Option<String>, database: Option<String>) -> Config {
        if let Some(uri) = uri.filter(|u| !u.is_empty()) {
            self.uri = uri;
        }
        if let Some(database) = database.filter(|d| !d.is_empty()) {
            self.database = database;
        }
        self
    }
}

// The URI may carry credentials.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("sync_concern", &self.sync_concern)
            .finish()
    }
}
