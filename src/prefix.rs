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

//! The CIDR [`Prefix`] type: a network/netmask pair with the aggregated
//! table's invariant enforced at construction.

use std::fmt;

use crate::addr::{self, is_contiguous, prefix_len};
use crate::error::CoreError;

/// A CIDR-legal IPv4 prefix: `network` masked to `netmask`'s prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    network: u32,
    netmask: u32,
}

impl Prefix {
    /// Builds a prefix, rejecting non-CIDR-legal masks and network bits set
    /// below the mask boundary (the aggregated table's invariant from
    /// spec.md §3).
    pub fn new(network: u32, netmask: u32) -> Result<Self, CoreError> {
        if !is_contiguous(netmask) {
            return Err(CoreError::InvalidMask(netmask));
        }
        Ok(Self {
            network: network & netmask,
            netmask,
        })
    }

    /// The network address, already masked to `netmask`.
    pub fn network(&self) -> u32 {
        self.network
    }

    /// The netmask.
    pub fn netmask(&self) -> u32 {
        self.netmask
    }

    /// Prefix length (`popcount(netmask)`).
    pub fn len(&self) -> u8 {
        prefix_len(self.netmask)
    }

    /// A prefix with no addresses is never constructed by [`Prefix::new`];
    /// provided for API parity with other length-bearing collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this prefix covers address `addr`.
    pub fn contains(&self, addr: u32) -> bool {
        addr::same_network(addr, self.network, self.netmask)
    }

    /// Whether `self` and `other` describe exactly the same IP range: same
    /// mask length and same masked network.
    pub fn same_network_as(&self, other: &Prefix) -> bool {
        self.netmask == other.netmask && addr::same_network(self.network, other.network, self.netmask)
    }

    /// Returns the one-bit-shorter parent prefix, e.g. for merging siblings
    /// in the Aggregator.
    pub fn shortened(&self) -> Option<Prefix> {
        if self.netmask == 0 {
            return None;
        }
        let netmask = addr::shorten(self.netmask);
        Some(Prefix {
            network: self.network & netmask,
            netmask,
        })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            addr::unpack(self.network),
            prefix_len(self.netmask)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::{mask_of_len, pack};

    #[test]
    fn rejects_noncontiguous_mask() {
        assert!(Prefix::new(0, 0x0000_00ff).is_err());
    }

    #[test]
    fn masks_network_on_construction() {
        let p = Prefix::new(pack("10.1.2.3").unwrap(), mask_of_len(16)).unwrap();
        assert_eq!(p.network(), pack("10.1.0.0").unwrap());
        assert_eq!(p.len(), 16);
    }

    #[test]
    fn contains_checks_masked_membership() {
        let p = Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap();
        assert!(p.contains(pack("10.1.2.3").unwrap()));
        assert!(!p.contains(pack("11.0.0.0").unwrap()));
    }

    #[test]
    fn same_network_as_requires_equal_mask_length() {
        let a = Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap();
        let b = Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(16)).unwrap();
        assert!(!a.same_network_as(&b));
    }

    #[test]
    fn shortened_drops_one_bit() {
        let p = Prefix::new(pack("192.168.0.0").unwrap(), mask_of_len(24)).unwrap();
        let parent = p.shortened().unwrap();
        assert_eq!(parent.len(), 23);
        assert_eq!(parent.network(), pack("192.168.0.0").unwrap());
    }

    #[test]
    fn display_matches_cidr_notation() {
        let p = Prefix::new(pack("192.168.1.0").unwrap(), mask_of_len(24)).unwrap();
        assert_eq!(p.to_string(), "192.168.1.0/24");
    }
}
