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

//! Startup configuration: CLI parsing and `port-neighborIP-relation`
//! neighbor descriptors (spec.md §6).

use std::fmt;
use std::str::FromStr;

use bgp_router_core::neighbor::{NeighborInfo, Relation};
use clap::Parser;
use thiserror::Error;

/// `routerd <asn> <neighbor>...`, where each neighbor is
/// `port-neighborIP-relation`, e.g. `10000-192.0.0.2-cust`.
#[derive(Parser, Debug)]
#[command(author, version, about = "A simplified single-AS BGP-style route processor")]
pub struct Args {
    /// This router's AS number.
    pub asn: u32,
    /// Neighbor descriptors: `port-neighborIP-relation`.
    #[arg(required = true, num_args = 1..)]
    pub neighbors: Vec<String>,
}

/// Error parsing a neighbor descriptor or building the router config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Descriptor didn't split into exactly three `-`-separated fields.
    #[error("`{0}` is not `port-neighborIP-relation`")]
    Malformed(String),
    /// The port field didn't parse as a `u16`.
    #[error("`{0}` is not a valid UDP port")]
    BadPort(String),
    /// The neighbor IP or relation field was invalid.
    #[error(transparent)]
    Core(#[from] bgp_router_core::error::CoreError),
}

/// One `port-neighborIP-relation` descriptor, resolved into a local UDP
/// port and a core [`NeighborInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborSpec {
    /// Local UDP port used to reach this neighbor.
    pub port: u16,
    /// The neighbor's routing identity (address + relation).
    pub info: NeighborInfo,
}

impl fmt::Display for NeighborSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.port,
            bgp_router_core::addr::unpack(self.info.addr),
            self.info.relation
        )
    }
}

impl FromStr for NeighborSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(port), Some(ip), Some(relation)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::Malformed(s.to_string()));
        };
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::BadPort(port.to_string()))?;
        let addr = bgp_router_core::addr::pack(ip)?;
        let relation: Relation = relation.parse()?;
        Ok(NeighborSpec {
            port,
            info: NeighborInfo { addr, relation },
        })
    }
}

/// Fully parsed startup configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// This router's AS number.
    pub asn: u32,
    /// One descriptor per neighbor.
    pub neighbors: Vec<NeighborSpec>,
}

impl RouterConfig {
    /// Parses CLI args into a validated config.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let neighbors = args
            .neighbors
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouterConfig {
            asn: args.asn,
            neighbors,
        })
    }
}
