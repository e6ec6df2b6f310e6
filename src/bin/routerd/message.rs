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

//! The JSON wire format (spec.md §6) and its conversion to/from the core's
//! IO-free [`bgp_router_core::router::Message`]/[`Outbound`] types. The
//! core crate never depends on `serde`; this module is the only place that
//! bridges the two.

use std::str::FromStr;

use bgp_router_core::addr::{self, mask_of_len};
use bgp_router_core::attributes::{Origin, RouteAttributes};
use bgp_router_core::prefix::Prefix;
use bgp_router_core::router::{Message, Outbound, OutboundBody};
use bgp_router_core::store::DumpedRoute;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error decoding a datagram into a [`Message`]: malformed JSON, missing
/// fields, or an unrecognized `type` (spec.md §7's "malformed message").
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The payload wasn't valid JSON, or didn't match the expected shape.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    /// A field inside `msg` failed to parse (bad address, mask, or origin).
    #[error("malformed message field: {0}")]
    Field(#[from] bgp_router_core::error::CoreError),
    /// `type` wasn't one of the recognized message types.
    #[error("unknown message type `{0}`")]
    UnknownType(String),
}

/// One wire-format envelope: `{src, dst, type, msg}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub src: String,
    pub dst: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireUpdate {
    network: String,
    netmask: String,
    localpref: u32,
    #[serde(rename = "selfOrigin")]
    self_origin: bool,
    #[serde(rename = "ASPath")]
    as_path: Vec<u32>,
    origin: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WithdrawnPrefix {
    network: String,
    netmask: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireTableEntry {
    network: String,
    netmask: String,
    peer: String,
    localpref: u32,
    #[serde(rename = "selfOrigin")]
    self_origin: bool,
    #[serde(rename = "ASPath")]
    as_path: Vec<u32>,
    origin: String,
}

/// Decodes a raw datagram into a [`Message`], returning the envelope's
/// `src` address alongside it (the adapter cross-checks this against the
/// socket the datagram actually arrived on).
pub fn decode(datagram: &[u8]) -> Result<(u32, Message), DecodeError> {
    let envelope: WireEnvelope = serde_json::from_slice(datagram)?;
    let src = addr::pack(&envelope.src).map_err(DecodeError::Field)?;
    let message = match envelope.kind.as_str() {
        "handshake" => Message::Handshake,
        "update" => {
            let body: WireUpdate = serde_json::from_value(envelope.msg)?;
            Message::Update {
                prefix: Prefix::new(addr::pack(&body.network)?, addr::pack(&body.netmask)?)?,
                attrs: RouteAttributes {
                    localpref: body.localpref,
                    self_origin: body.self_origin,
                    as_path: body.as_path,
                    origin: Origin::from_str(&body.origin)?,
                },
            }
        }
        "withdraw" => {
            let victims: Vec<WithdrawnPrefix> = serde_json::from_value(envelope.msg)?;
            let victims = victims
                .into_iter()
                .map(|v| Ok(Prefix::new(addr::pack(&v.network)?, addr::pack(&v.netmask)?)?))
                .collect::<Result<Vec<_>, DecodeError>>()?;
            Message::Withdraw(victims)
        }
        "data" => Message::Data {
            dest: addr::pack(&envelope.dst).map_err(DecodeError::Field)?,
            payload: serde_json::to_vec(&envelope.msg)?,
        },
        "dump" => Message::Dump,
        other => return Err(DecodeError::UnknownType(other.to_string())),
    };
    Ok((src, message))
}

/// Encodes an [`Outbound`] message into a wire envelope, given this
/// router's own side of the link (`.1` host on the destination's subnet).
pub fn encode(router_addr: u32, out: &Outbound) -> serde_json::Value {
    let src = addr::unpack(router_addr);
    let dst = addr::unpack(out.to);
    let (kind, msg) = match &out.body {
        OutboundBody::Handshake => ("handshake", serde_json::json!({})),
        OutboundBody::Update { prefix, attrs } => (
            "update",
            serde_json::json!({
                "network": addr::unpack(prefix.network()),
                "netmask": addr::unpack(prefix.netmask()),
                "localpref": attrs.localpref,
                "selfOrigin": attrs.self_origin,
                "ASPath": attrs.as_path,
                "origin": attrs.origin.to_string(),
            }),
        ),
        OutboundBody::Withdraw(victims) => (
            "withdraw",
            serde_json::Value::Array(
                victims
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "network": addr::unpack(p.network()),
                            "netmask": addr::unpack(p.netmask()),
                        })
                    })
                    .collect(),
            ),
        ),
        OutboundBody::Data(payload) => (
            "data",
            serde_json::from_slice(payload).unwrap_or(serde_json::Value::Null),
        ),
        OutboundBody::NoRoute => ("no route", serde_json::json!({})),
        OutboundBody::Table(entries) => ("table", table_json(entries)),
    };
    serde_json::json!({ "src": src, "dst": dst, "type": kind, "msg": msg })
}

fn table_json(entries: &[DumpedRoute]) -> serde_json::Value {
    serde_json::Value::Array(
        entries
            .iter()
            .map(|e| {
                let entry = WireTableEntry {
                    network: addr::unpack(e.prefix.network()),
                    netmask: addr::unpack(e.prefix.netmask()),
                    peer: addr::unpack(e.peer),
                    localpref: e.attrs.localpref,
                    self_origin: e.attrs.self_origin,
                    as_path: e.attrs.as_path.clone(),
                    origin: e.attrs.origin.to_string(),
                };
                serde_json::to_value(entry).expect("WireTableEntry always serializes")
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_update_message() {
        let raw = br#"{"src":"192.0.0.2","dst":"192.0.0.1","type":"update",
            "msg":{"network":"192.168.0.0","netmask":"255.255.255.0",
                   "localpref":100,"selfOrigin":true,"ASPath":[1],"origin":"IGP"}}"#;
        let (src, msg) = decode(raw).unwrap();
        assert_eq!(src, addr::pack("192.0.0.2").unwrap());
        match msg {
            Message::Update { prefix, attrs } => {
                assert_eq!(prefix.to_string(), "192.168.0.0/24");
                assert_eq!(attrs.as_path, vec![1]);
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let raw = br#"{"src":"1.2.3.4","dst":"1.2.3.1","type":"bogus","msg":{}}"#;
        assert!(matches!(decode(raw), Err(DecodeError::UnknownType(_))));
    }

    #[test]
    fn encode_update_round_trips_through_decode() {
        let out = Outbound {
            to: addr::pack("192.0.0.2").unwrap(),
            body: OutboundBody::Update {
                prefix: Prefix::new(addr::pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap(),
                attrs: RouteAttributes {
                    localpref: 100,
                    self_origin: false,
                    as_path: vec![1, 2],
                    origin: Origin::Egp,
                },
            },
        };
        let json = encode(addr::pack("192.0.0.1").unwrap(), &out);
        let bytes = serde_json::to_vec(&json).unwrap();
        let (_, decoded) = decode(&bytes).unwrap();
        match decoded {
            Message::Update { prefix, attrs } => {
                assert_eq!(prefix.to_string(), "10.0.0.0/8");
                assert_eq!(attrs.as_path, vec![1, 2]);
                assert_eq!(attrs.origin, Origin::Egp);
            }
            _ => panic!("expected update"),
        }
    }
}
