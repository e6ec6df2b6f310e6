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

//! # bgp-router-core
//!
//! A simplified single-AS BGP-style route processor. This crate is the
//! IO-free core: it consumes decoded control [`router::Message`]s and
//! produces decoded [`router::Outbound`] messages. Transport (one UDP
//! socket per neighbor) and JSON framing live in the `routerd` binary
//! (`src/bin/routerd/main.rs` and its `config`/`message`/`transport`
//! modules), which is a thin adapter around the [`router::Router`] defined
//! here.
//!
//! ## Main concepts
//!
//! [`router::Router`] owns the two per-neighbor tables ([`store::RouteStore`]):
//! the disaggregated ground truth and the aggregated forwarding view kept
//! in sync by the [`aggregator`]. [`decision::decide`] implements
//! longest-prefix match plus the tie-break chain. [`policy`] implements the
//! customer/peer/provider export and forwarding rules.

pub mod addr;
pub mod aggregator;
pub mod attributes;
pub mod decision;
pub mod error;
pub mod neighbor;
pub mod policy;
pub mod prefix;
pub mod route;
pub mod router;
pub mod store;

#[cfg(test)]
mod test;
