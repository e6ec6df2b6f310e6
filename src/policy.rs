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

//! The Relationship Policy: which neighbors may receive traffic or route
//! information, based on the commercial-relationship rules of spec.md §4.5.

use crate::neighbor::Relation;

/// Whether a data message from a neighbor with relation `source` may be
/// forwarded to a nexthop neighbor with relation `nexthop`. Requires at
/// least one end to be a customer.
pub fn can_forward(source: Relation, nexthop: Relation) -> bool {
    source == Relation::Customer || nexthop == Relation::Customer
}

/// Given the relation of the neighbor an announce/withdraw arrived on,
/// and the relation of a candidate export target, whether that target
/// should receive the re-announcement.
///
/// If the route came from a customer, it is re-announced to every other
/// neighbor. Otherwise (it came from a peer or a provider), it is
/// re-announced only to customers.
pub fn should_export(source: Relation, target: Relation) -> bool {
    match source {
        Relation::Customer => true,
        Relation::Peer | Relation::Provider => target == Relation::Customer,
    }
}
