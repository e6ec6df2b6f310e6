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

//! Error types for the routing core.

use thiserror::Error;

/// Errors raised while constructing or manipulating core routing types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A dotted-quad string did not decode to four octets in `0..=255`.
    #[error("`{0}` is not a valid dotted-quad IPv4 address")]
    InvalidAddress(String),
    /// A netmask was not a contiguous run of leading one-bits.
    #[error("netmask {0:#010x} is not CIDR-legal (non-contiguous)")]
    InvalidMask(u32),
    /// An origin string did not match `IGP`, `EGP`, or `UNK`.
    #[error("`{0}` is not a recognized origin (expected IGP, EGP, or UNK)")]
    UnknownOrigin(String),
    /// A relation string did not match `cust`, `peer`, or `prov`.
    #[error("`{0}` is not a recognized relation (expected cust, peer, or prov)")]
    UnknownRelation(String),
}
