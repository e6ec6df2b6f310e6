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

//! The Dispatcher and the owning [`Router`] value: a single-threaded,
//! IO-free core that turns one decoded inbound [`Message`] into zero or
//! more decoded [`Outbound`] messages.
//!
//! `Router` is the sole mutator of its [`RouteStore`]. It never touches a
//! socket or a JSON value; that is the adapter's job (see the `routerd`
//! binary and its `transport`/`message` modules).

use std::collections::HashMap;

use crate::attributes::RouteAttributes;
use crate::neighbor::{NeighborInfo, Relation};
use crate::prefix::Prefix;
use crate::route::RouteEntry;
use crate::store::{DumpedRoute, RouteStore};
use crate::{decision, policy};

/// One decoded inbound control message, tagged with no transport details.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// `handshake`: no-op, acknowledges session start.
    Handshake,
    /// `update`: announce a prefix with attributes.
    Update {
        /// The announced prefix.
        prefix: Prefix,
        /// Its attributes.
        attrs: RouteAttributes,
    },
    /// `withdraw`: revoke previously announced prefixes.
    Withdraw(Vec<Prefix>),
    /// `data`: opaque application payload addressed to `dest`.
    Data {
        /// Final destination address (not necessarily a neighbor).
        dest: u32,
        /// Opaque payload; the core never inspects its contents.
        payload: Vec<u8>,
    },
    /// `dump`: request the current forwarding table.
    Dump,
}

/// One decoded outbound control message and the neighbor it's addressed
/// to.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// Destination neighbor address.
    pub to: u32,
    /// The message body.
    pub body: OutboundBody,
}

/// Body of an [`Outbound`] message.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    /// `handshake`, sent once at startup.
    Handshake,
    /// Re-announced `update`.
    Update {
        /// The prefix.
        prefix: Prefix,
        /// Attributes, already with this router's ASN prepended.
        attrs: RouteAttributes,
    },
    /// Re-announced `withdraw`.
    Withdraw(Vec<Prefix>),
    /// Forwarded `data` payload.
    Data(Vec<u8>),
    /// `no route`: the data message in reply to was undeliverable.
    NoRoute,
    /// `table`: reply to a `dump`.
    Table(Vec<DumpedRoute>),
}

/// The router process: its ASN, its neighbor table, and its Route Store.
/// Owns all mutable state; no global state exists anywhere else in the
/// crate.
#[derive(Debug, Clone)]
pub struct Router {
    asn: u32,
    neighbors: HashMap<u32, NeighborInfo>,
    store: RouteStore,
}

impl Router {
    /// Builds a router for AS `asn` with the given neighbors.
    pub fn new(asn: u32, neighbors: impl IntoIterator<Item = NeighborInfo>) -> Self {
        Self {
            asn,
            neighbors: neighbors.into_iter().map(|n| (n.addr, n)).collect(),
            store: RouteStore::new(),
        }
    }

    /// This router's AS number.
    pub fn asn(&self) -> u32 {
        self.asn
    }

    /// The configured neighbors, in no particular order.
    pub fn neighbors(&self) -> impl Iterator<Item = &NeighborInfo> {
        self.neighbors.values()
    }

    /// Read-only access to the Route Store, e.g. for diagnostics.
    pub fn store(&self) -> &RouteStore {
        &self.store
    }

    fn relation_of(&self, addr: u32) -> Option<Relation> {
        self.neighbors.get(&addr).map(|n| n.relation)
    }

    /// Dispatches one inbound message from neighbor `from`, mutating the
    /// Route Store as needed and returning the outbound messages it
    /// triggers. Messages from an address that isn't a configured neighbor
    /// are logged and dropped, matching spec.md §7's malformed-message
    /// handling.
    pub fn handle(&mut self, from: u32, msg: Message) -> Vec<Outbound> {
        let Some(relation) = self.relation_of(from) else {
            log::warn!("dropping message from unconfigured neighbor {from:#010x}");
            return Vec::new();
        };

        match msg {
            Message::Handshake => {
                log::debug!("handshake from {from:#010x}");
                Vec::new()
            }
            Message::Update { prefix, attrs } => self.handle_update(from, relation, prefix, attrs),
            Message::Withdraw(victims) => self.handle_withdraw(from, relation, victims),
            Message::Data { dest, payload } => self.handle_data(from, relation, dest, payload),
            Message::Dump => self.handle_dump(from),
        }
    }

    fn handle_update(
        &mut self,
        from: u32,
        relation: Relation,
        prefix: Prefix,
        attrs: RouteAttributes,
    ) -> Vec<Outbound> {
        log::debug!("update from {from:#010x}: {prefix}");
        self.store.insert(
            from,
            RouteEntry {
                prefix,
                attrs: attrs.clone(),
                learned_from: from,
            },
        );
        let exported = attrs.with_prepended_asn(self.asn);
        self.export_targets(from, relation)
            .map(|to| Outbound {
                to,
                body: OutboundBody::Update {
                    prefix,
                    attrs: exported.clone(),
                },
            })
            .collect()
    }

    fn handle_withdraw(
        &mut self,
        from: u32,
        relation: Relation,
        victims: Vec<Prefix>,
    ) -> Vec<Outbound> {
        log::debug!("withdraw from {from:#010x}: {} prefix(es)", victims.len());
        self.store.withdraw(from, &victims);
        self.export_targets(from, relation)
            .map(|to| Outbound {
                to,
                body: OutboundBody::Withdraw(victims.clone()),
            })
            .collect()
    }

    fn handle_data(
        &mut self,
        from: u32,
        relation: Relation,
        dest: u32,
        payload: Vec<u8>,
    ) -> Vec<Outbound> {
        let Some(nexthop) = decision::decide(&self.store, dest) else {
            log::debug!("no route for data from {from:#010x} to {dest:#010x}");
            return vec![Outbound {
                to: from,
                body: OutboundBody::NoRoute,
            }];
        };
        let nexthop_relation = self
            .relation_of(nexthop)
            .expect("nexthop is always a learned_from address of a configured neighbor");
        if policy::can_forward(relation, nexthop_relation) {
            vec![Outbound {
                to: nexthop,
                body: OutboundBody::Data(payload),
            }]
        } else {
            log::debug!("relationship policy forbids forwarding from {from:#010x} to {nexthop:#010x}");
            vec![Outbound {
                to: from,
                body: OutboundBody::NoRoute,
            }]
        }
    }

    fn handle_dump(&self, from: u32) -> Vec<Outbound> {
        vec![Outbound {
            to: from,
            body: OutboundBody::Table(self.store.dump()),
        }]
    }

    /// Neighbors (other than `from`) that should receive a re-announcement
    /// of a route/withdraw learned on `from`.
    fn export_targets(&self, from: u32, source_relation: Relation) -> impl Iterator<Item = u32> + '_ {
        self.neighbors
            .values()
            .filter(move |n| n.addr != from)
            .filter(move |n| policy::should_export(source_relation, n.relation))
            .map(|n| n.addr)
    }
}
