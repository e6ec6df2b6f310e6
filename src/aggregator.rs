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

//! Fixed-point coalescing of sibling, attribute-equal prefixes.

use itertools::Itertools;

use crate::route::RouteEntry;

/// Runs the Aggregator to a fixed point on a single neighbor's entry list,
/// in place.
///
/// Repeats full passes until one finds no mergeable pair. Two entries merge
/// when their masks have equal length, their prefixes are siblings
/// (identical except for the final bit), and all four route attributes
/// match. The merged entry's network is `min(network_i, network_j)` and its
/// mask is one bit shorter. Terminates because total mask-length work
/// strictly decreases with every merge (spec.md §4.3).
pub fn aggregate(entries: &mut Vec<RouteEntry>) {
    loop {
        if !merge_one_pass(entries) {
            break;
        }
    }
}

/// Scans all pair combinations once; merges and restarts at the first
/// mergeable pair found. Returns whether a merge happened.
fn merge_one_pass(entries: &mut Vec<RouteEntry>) -> bool {
    let found = entries
        .iter()
        .enumerate()
        .tuple_combinations()
        .find(|((_, a), (_, b))| mergeable(a, b))
        .map(|((i, a), (j, b))| (i, j, merge(a, b)));

    match found {
        Some((i, j, merged)) => {
            // remove the higher index first so the lower index stays valid
            entries.remove(j);
            entries.remove(i);
            entries.push(merged);
            true
        }
        None => false,
    }
}

fn mergeable(a: &RouteEntry, b: &RouteEntry) -> bool {
    a.prefix.netmask() == b.prefix.netmask()
        && are_siblings(a.prefix.network(), b.prefix.network(), a.prefix.netmask())
        && a.attrs_equal(b)
}

/// Whether `a` and `b`, as prefixes of the given mask, are identical except
/// in their final bit (i.e. they share the same one-bit-shorter parent).
fn are_siblings(a: u32, b: u32, mask: u32) -> bool {
    if a == b {
        return false;
    }
    let parent_mask = crate::addr::shorten(mask);
    crate::addr::same_network(a, b, parent_mask)
}

fn merge(a: &RouteEntry, b: &RouteEntry) -> RouteEntry {
    let network = a.prefix.network().min(b.prefix.network());
    let parent = a
        .prefix
        .shortened()
        .expect("mergeable() only matches non-empty masks");
    let prefix = crate::prefix::Prefix::new(network, parent.netmask())
        .expect("shortened mask is CIDR-legal by construction");
    RouteEntry {
        prefix,
        attrs: a.attrs.clone(),
        learned_from: a.learned_from,
    }
}
