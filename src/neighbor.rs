// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Neighbor identity and commercial relationship.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Commercial relationship of a neighbor, governing export and forwarding
/// rules (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The neighbor is a customer: we carry its routes everywhere and
    /// accept transit traffic to/from it.
    Customer,
    /// The neighbor is a settlement-free peer.
    Peer,
    /// The neighbor is a transit provider.
    Provider,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Customer => "cust",
            Relation::Peer => "peer",
            Relation::Provider => "prov",
        })
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cust" => Ok(Relation::Customer),
            "peer" => Ok(Relation::Peer),
            "prov" => Ok(Relation::Provider),
            _ => Err(CoreError::UnknownRelation(s.to_string())),
        }
    }
}

/// Everything the core knows about one neighbor. Transport details (the
/// socket) are the adapter's concern, not the core's; this struct carries
/// only what the Decision Engine and Relationship Policy need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborInfo {
    /// The neighbor's IPv4 address.
    pub addr: u32,
    /// Its commercial relationship to us.
    pub relation: Relation,
}
