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

use serde_derive::{
    Deserialize,
    Serialize,
};

/// How many members must acknowledge a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acknowledgment {
    Nodes(u32),
    Majority,
    Custom(String),
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Acknowledgment::Nodes(n) => write!(f, "{}", n),
            Acknowledgment::Majority => f.write_str("majority"),
            Acknowledgment::Custom(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConcern {
    pub w: Acknowledgment,
    #[serde(default)]
    pub journal: Option<bool>,
}

impl WriteConcern {
    pub fn majority() -> WriteConcern {
        WriteConcern {
            w: Acknowledgment::Majority,
            journal: None,
        }
    }
}

impl Default for WriteConcern {
    fn default() -> WriteConcern {
        WriteConcern::majority()
    }
}

/// The acknowledgment policy of one write target. Both targets of a store
/// address the same collection; only this differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Durability {
    Default,
    Acknowledged(WriteConcern),
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Durability::Default => f.write_str("default"),
            Durability::Acknowledged(wc) => write!(f, "w={}", wc.w),
        }
    }
}
