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

//! The Route Store: the disaggregated ground truth and the aggregated
//! forwarding view, kept per neighbor.

use std::collections::HashMap;

use crate::aggregator::aggregate;
use crate::prefix::Prefix;
use crate::route::RouteEntry;

/// A dumped route, tagged with the neighbor ("peer") it was learned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpedRoute {
    /// The prefix.
    pub prefix: Prefix,
    /// The peer (neighbor address) it came from.
    pub peer: u32,
    /// Its attributes.
    pub attrs: crate::attributes::RouteAttributes,
}

/// Two parallel per-neighbor tables: `disaggregated` is the never-coalesced
/// source of truth, `aggregated` is the coalesced forwarding view derived
/// from it.
#[derive(Debug, Clone, Default)]
pub struct RouteStore {
    disaggregated: HashMap<u32, Vec<RouteEntry>>,
    aggregated: HashMap<u32, Vec<RouteEntry>>,
}

impl RouteStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` to both tables for neighbor `from`, then
    /// re-aggregates just that neighbor's list.
    pub fn insert(&mut self, from: u32, entry: RouteEntry) {
        self.disaggregated.entry(from).or_default().push(entry.clone());
        let bucket = self.aggregated.entry(from).or_default();
        bucket.push(entry);
        aggregate(bucket);
    }

    /// Removes from `disaggregated[from]` every entry whose (network,
    /// netmask) matches one of `victims` under the victim's own netmask,
    /// then rebuilds `aggregated` from scratch for every neighbor (not just
    /// `from`: aggregation state for `from` may need to re-expand). A
    /// withdraw of a prefix that was never announced is a no-op.
    pub fn withdraw(&mut self, from: u32, victims: &[Prefix]) {
        if let Some(entries) = self.disaggregated.get_mut(&from) {
            entries.retain(|entry| {
                !victims
                    .iter()
                    .any(|victim| entry.prefix.same_network_as(victim))
            });
        }
        self.rebuild_aggregated();
    }

    /// Rebuilds `aggregated` as a deep copy of `disaggregated`, re-running
    /// the Aggregator across every neighbor. Required because a prior
    /// aggregation may have fused the withdrawn prefix with a sibling;
    /// partial unmerging is avoided by always starting again from ground
    /// truth (spec.md §4.2).
    fn rebuild_aggregated(&mut self) {
        self.aggregated = self.disaggregated.clone();
        for bucket in self.aggregated.values_mut() {
            aggregate(bucket);
        }
    }

    /// All neighbors with at least one stored entry in either table.
    pub fn neighbors(&self) -> impl Iterator<Item = u32> + '_ {
        self.disaggregated.keys().copied()
    }

    /// The aggregated (forwarding) entries for `neighbor`.
    pub fn aggregated_for(&self, neighbor: u32) -> &[RouteEntry] {
        self.aggregated
            .get(&neighbor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The disaggregated (ground-truth) entries for `neighbor`.
    pub fn disaggregated_for(&self, neighbor: u32) -> &[RouteEntry] {
        self.disaggregated
            .get(&neighbor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All aggregated entries across every neighbor, for the Decision
    /// Engine's longest-prefix-match scan.
    pub fn all_aggregated(&self) -> impl Iterator<Item = &RouteEntry> {
        self.aggregated.values().flatten()
    }

    /// Concatenates `aggregated` across all neighbors, tagging each entry
    /// with its peer, for a `dump` reply.
    pub fn dump(&self) -> Vec<DumpedRoute> {
        self.aggregated
            .iter()
            .flat_map(|(&peer, entries)| {
                entries.iter().map(move |e| DumpedRoute {
                    prefix: e.prefix,
                    peer,
                    attrs: e.attrs.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::{mask_of_len, pack};
    use crate::attributes::{Origin, RouteAttributes};

    fn attrs() -> RouteAttributes {
        RouteAttributes {
            localpref: 100,
            self_origin: true,
            as_path: vec![1],
            origin: Origin::Igp,
        }
    }

    fn route(network: &str, len: u8, from: u32) -> RouteEntry {
        RouteEntry {
            prefix: Prefix::new(pack(network).unwrap(), mask_of_len(len)).unwrap(),
            attrs: attrs(),
            learned_from: from,
        }
    }

    #[test]
    fn insert_then_aggregate_coalesces_siblings() {
        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        store.insert(neighbor, route("192.168.0.0", 24, neighbor));
        store.insert(neighbor, route("192.168.1.0", 24, neighbor));

        assert_eq!(store.disaggregated_for(neighbor).len(), 2);
        assert_eq!(store.aggregated_for(neighbor).len(), 1);
        assert_eq!(
            store.aggregated_for(neighbor)[0].prefix.to_string(),
            "192.168.0.0/23"
        );
    }

    #[test]
    fn withdraw_reexpands_sibling_after_merge() {
        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        store.insert(neighbor, route("192.168.0.0", 24, neighbor));
        store.insert(neighbor, route("192.168.1.0", 24, neighbor));
        assert_eq!(store.aggregated_for(neighbor).len(), 1);

        let victim = Prefix::new(pack("192.168.1.0").unwrap(), mask_of_len(24)).unwrap();
        store.withdraw(neighbor, &[victim]);

        assert_eq!(store.aggregated_for(neighbor).len(), 1);
        assert_eq!(
            store.aggregated_for(neighbor)[0].prefix.to_string(),
            "192.168.0.0/24"
        );
    }

    #[test]
    fn withdraw_of_unknown_prefix_is_noop() {
        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        store.insert(neighbor, route("10.0.0.0", 8, neighbor));

        let victim = Prefix::new(pack("172.16.0.0").unwrap(), mask_of_len(16)).unwrap();
        store.withdraw(neighbor, &[victim]);

        assert_eq!(store.disaggregated_for(neighbor).len(), 1);
    }

    #[test]
    fn withdraw_everything_empties_both_tables() {
        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        let prefix = Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap();
        store.insert(neighbor, route("10.0.0.0", 8, neighbor));
        store.withdraw(neighbor, &[prefix]);

        assert!(store.disaggregated_for(neighbor).is_empty());
        assert!(store.aggregated_for(neighbor).is_empty());
    }

    #[test]
    fn round_trip_update_then_withdraw_restores_state() {
        use pretty_assertions::assert_eq;

        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        store.insert(neighbor, route("10.0.0.0", 8, neighbor));
        let before = store.aggregated_for(neighbor).to_vec();

        let new_prefix = Prefix::new(pack("10.1.0.0").unwrap(), mask_of_len(16)).unwrap();
        store.insert(
            neighbor,
            RouteEntry {
                prefix: new_prefix,
                attrs: attrs(),
                learned_from: neighbor,
            },
        );
        store.withdraw(neighbor, &[new_prefix]);

        assert_eq!(store.aggregated_for(neighbor), before.as_slice());
    }

    #[test]
    fn dump_tags_entries_with_peer() {
        let mut store = RouteStore::new();
        let neighbor = pack("192.0.0.2").unwrap();
        store.insert(neighbor, route("10.0.0.0", 8, neighbor));
        let dumped = store.dump();
        assert_eq!(dumped.len(), 1);
        assert_eq!(dumped[0].peer, neighbor);
    }
}
