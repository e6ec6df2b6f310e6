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

//! The Decision Engine: longest-prefix match followed by the BGP-style
//! tie-break chain, reducing a candidate route set to at most one nexthop.

use crate::route::RouteEntry;
use crate::store::RouteStore;

/// Returns the nexthop neighbor for destination `dest`, or `None` if no
/// stored entry covers it.
///
/// Step 1 scans every neighbor's aggregated table for entries that cover
/// `dest`, retaining only the longest prefix length(s). Step 2 applies the
/// tie-break chain in order, eliminating entries that don't match the best
/// value at each step, stopping as soon as one candidate remains:
///
/// 1. Highest `localpref`.
/// 2. `selfOrigin == true` preferred, if any candidate has it.
/// 3. Shortest AS path.
/// 4. Best origin, `IGP > EGP > UNK`.
/// 5. Lowest learned-from neighbor address (numeric `u32` order; see
///    spec.md §9's open question — numeric order is used here, not string
///    order, since implementers must pick one and document it).
pub fn decide(store: &RouteStore, dest: u32) -> Option<u32> {
    let mut candidates = longest_prefix_match(store, dest);
    if candidates.is_empty() {
        return None;
    }

    tie_break_highest_localpref(&mut candidates);
    tie_break_self_origin(&mut candidates);
    tie_break_shortest_as_path(&mut candidates);
    tie_break_best_origin(&mut candidates);
    tie_break_lowest_neighbor(&mut candidates);

    candidates.first().map(|e| e.learned_from)
}

fn longest_prefix_match(store: &RouteStore, dest: u32) -> Vec<RouteEntry> {
    let covering: Vec<&RouteEntry> = store
        .all_aggregated()
        .filter(|e| e.prefix.contains(dest))
        .collect();
    let Some(best_len) = covering.iter().map(|e| e.prefix.len()).max() else {
        return Vec::new();
    };
    covering
        .into_iter()
        .filter(|e| e.prefix.len() == best_len)
        .cloned()
        .collect()
}

fn tie_break_highest_localpref(candidates: &mut Vec<RouteEntry>) {
    if candidates.len() <= 1 {
        return;
    }
    let best = candidates.iter().map(|e| e.attrs.localpref).max().unwrap();
    candidates.retain(|e| e.attrs.localpref == best);
}

fn tie_break_self_origin(candidates: &mut Vec<RouteEntry>) {
    if candidates.len() <= 1 {
        return;
    }
    if candidates.iter().any(|e| e.attrs.self_origin) {
        candidates.retain(|e| e.attrs.self_origin);
    }
}

fn tie_break_shortest_as_path(candidates: &mut Vec<RouteEntry>) {
    if candidates.len() <= 1 {
        return;
    }
    let shortest = candidates.iter().map(|e| e.attrs.as_path.len()).min().unwrap();
    candidates.retain(|e| e.attrs.as_path.len() == shortest);
}

fn tie_break_best_origin(candidates: &mut Vec<RouteEntry>) {
    if candidates.len() <= 1 {
        return;
    }
    let best = candidates.iter().map(|e| e.attrs.origin).max().unwrap();
    candidates.retain(|e| e.attrs.origin == best);
}

fn tie_break_lowest_neighbor(candidates: &mut Vec<RouteEntry>) {
    if candidates.len() <= 1 {
        return;
    }
    let lowest = candidates.iter().map(|e| e.learned_from).min().unwrap();
    candidates.retain(|e| e.learned_from == lowest);
}
