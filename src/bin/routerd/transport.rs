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

//! The adapter's datagram transport: one UDP socket per neighbor, and the
//! bounded-poll Dispatcher loop that drives [`bgp_router_core::router::Router`].

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use bgp_router_core::addr::Ipv4;
use bgp_router_core::router::{Outbound, OutboundBody, Router};
use thiserror::Error;

use crate::config::NeighborSpec;
use crate::message;

/// The interval each neighbor socket is polled for before moving to the
/// next, per spec.md §5's "short bounded interval".
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Transport-level failure: a socket could not be bound or a send failed.
/// Per spec.md §7, this is surfaced to the host rather than swallowed.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Binding the local UDP socket failed.
    #[error("failed to bind neighbor socket on port {port}: {source}")]
    Bind {
        /// The port that failed to bind.
        port: u16,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Sending a datagram failed.
    #[error("failed to send to neighbor {neighbor}: {source}")]
    Send {
        /// Dotted-quad address of the neighbor.
        neighbor: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// One neighbor's bound, connected UDP socket.
pub struct NeighborLink {
    pub spec: NeighborSpec,
    socket: UdpSocket,
}

impl NeighborLink {
    /// Binds `0.0.0.0:<spec.port>`, connects it to the neighbor, and sets a
    /// short read timeout so the poll loop never blocks on one neighbor.
    pub fn bind(spec: NeighborSpec) -> Result<Self, AdapterError> {
        let local = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, spec.port);
        let socket = UdpSocket::bind(local).map_err(|source| AdapterError::Bind {
            port: spec.port,
            source,
        })?;
        let peer = SocketAddrV4::new(Ipv4Addr::from(spec.info.addr), spec.port);
        socket.connect(peer).map_err(|source| AdapterError::Bind {
            port: spec.port,
            source,
        })?;
        socket
            .set_read_timeout(Some(POLL_TIMEOUT))
            .map_err(|source| AdapterError::Bind {
                port: spec.port,
                source,
            })?;
        Ok(Self { spec, socket })
    }

    fn send_json(&self, json: &serde_json::Value) -> Result<(), AdapterError> {
        let bytes = serde_json::to_vec(json).expect("wire envelope always serializes");
        self.socket
            .send(&bytes)
            .map(|_| ())
            .map_err(|source| AdapterError::Send {
                neighbor: Ipv4(self.spec.info.addr).to_string(),
                source,
            })
    }

    fn recv(&self) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = [0u8; 65536];
        match self.socket.recv(&mut buf) {
            Ok(n) => Ok(Some(buf[..n].to_vec())),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Sends one `Outbound` message over the correct neighbor's link.
fn send_outbound(links: &[NeighborLink], out: &Outbound) -> Result<(), AdapterError> {
    let Some(link) = links.iter().find(|l| l.spec.info.addr == out.to) else {
        log::warn!("no transport for outbound message to {:#010x}", out.to);
        return Ok(());
    };
    let router_addr = Ipv4(link.spec.info.addr).router_side().0;
    let json = message::encode(router_addr, out);
    log::debug!("-> {}: {}", Ipv4(out.to), describe(&out.body));
    link.send_json(&json)
}

fn describe(body: &OutboundBody) -> &'static str {
    match body {
        OutboundBody::Handshake => "handshake",
        OutboundBody::Update { .. } => "update",
        OutboundBody::Withdraw(_) => "withdraw",
        OutboundBody::Data(_) => "data",
        OutboundBody::NoRoute => "no route",
        OutboundBody::Table(_) => "table",
    }
}

/// Sends the startup `handshake` to every neighbor.
pub fn send_handshakes(links: &[NeighborLink]) -> Result<(), AdapterError> {
    for link in links {
        send_outbound(
            links,
            &Outbound {
                to: link.spec.info.addr,
                body: OutboundBody::Handshake,
            },
        )?;
    }
    Ok(())
}

/// Runs the single-threaded Dispatcher poll loop forever: cycles through
/// every neighbor's socket with a bounded read timeout, decodes and
/// dispatches whatever arrives, and sends every outbound message the
/// Router produces before moving on to the next inbound message
/// (spec.md §5's ordering guarantee).
pub fn run(router: &mut Router, links: &[NeighborLink]) -> Result<(), AdapterError> {
    loop {
        for link in links {
            let datagram = match link.recv() {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("recv error on neighbor {}: {e}", Ipv4(link.spec.info.addr));
                    continue;
                }
            };
            let (src, message) = match message::decode(&datagram) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::warn!("dropping malformed message: {e}");
                    continue;
                }
            };
            if src != link.spec.info.addr {
                log::warn!(
                    "envelope src {} does not match transport neighbor {}; trusting transport",
                    Ipv4(src),
                    Ipv4(link.spec.info.addr)
                );
            }
            for out in router.handle(link.spec.info.addr, message) {
                send_outbound(links, &out)?;
            }
        }
    }
}
