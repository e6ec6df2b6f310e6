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

//! A single accepted announcement: prefix, attributes, and learned-from
//! neighbor.

use crate::attributes::RouteAttributes;
use crate::prefix::Prefix;

/// One accepted route: a [`Prefix`] plus its [`RouteAttributes`] plus the
/// neighbor address it was learned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// The announced prefix.
    pub prefix: Prefix,
    /// Attributes carried with the announcement.
    pub attrs: RouteAttributes,
    /// Address of the neighbor that sent this announcement.
    pub learned_from: u32,
}

impl RouteEntry {
    /// Whether two entries carry identical attributes (localpref,
    /// self-origin, AS path, origin), the predicate the Aggregator and the
    /// round-trip invariant both depend on.
    pub fn attrs_equal(&self, other: &RouteEntry) -> bool {
        self.attrs == other.attrs
    }
}
