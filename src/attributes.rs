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

//! Route attributes carried by an announcement.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Origin of a route, ordered `IGP > EGP > UNK` (best to worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Learned via an interior gateway protocol.
    Igp,
    /// Learned via an exterior gateway protocol.
    Egp,
    /// Unknown origin.
    Unk,
}

impl Origin {
    /// Numeric preference rank, higher is better.
    fn rank(self) -> u8 {
        match self {
            Origin::Igp => 2,
            Origin::Egp => 1,
            Origin::Unk => 0,
        }
    }
}

impl Ord for Origin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Origin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Igp => "IGP",
            Origin::Egp => "EGP",
            Origin::Unk => "UNK",
        })
    }
}

impl FromStr for Origin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IGP" => Ok(Origin::Igp),
            "EGP" => Ok(Origin::Egp),
            "UNK" => Ok(Origin::Unk),
            _ => Err(CoreError::UnknownOrigin(s.to_string())),
        }
    }
}

/// Per-announcement route attributes, compared only by the Decision
/// Engine's tie-break chain (no `Ord` impl here: the chain's ordering isn't
/// a total order over attributes alone, it also needs the learned-from
/// neighbor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttributes {
    /// Higher is preferred.
    pub localpref: u32,
    /// Whether this router originated the route itself.
    pub self_origin: bool,
    /// Ordered AS path, origin last. Shorter is preferred.
    pub as_path: Vec<u32>,
    /// Route origin.
    pub origin: Origin,
}

impl RouteAttributes {
    /// Returns a copy with `asn` prepended to the AS path, as is done when
    /// re-announcing a route to another neighbor.
    pub fn with_prepended_asn(&self, asn: u32) -> RouteAttributes {
        let mut as_path = Vec::with_capacity(self.as_path.len() + 1);
        as_path.push(asn);
        as_path.extend_from_slice(&self.as_path);
        RouteAttributes {
            as_path,
            ..self.clone()
        }
    }
}
