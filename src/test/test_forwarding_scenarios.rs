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

//! Scenarios 1–3 and 6 from spec.md §8.

use crate::addr::{mask_of_len, pack};
use crate::attributes::{Origin, RouteAttributes};
use crate::neighbor::{NeighborInfo, Relation};
use crate::prefix::Prefix;
use crate::router::{Message, OutboundBody, Router};

fn attrs(as_path: Vec<u32>) -> RouteAttributes {
    RouteAttributes {
        localpref: 100,
        self_origin: true,
        as_path,
        origin: Origin::Igp,
    }
}

fn cust_peer_router() -> (Router, u32, u32) {
    let cust = pack("192.0.0.2").unwrap();
    let peer = pack("172.0.0.2").unwrap();
    let router = Router::new(
        1,
        [
            NeighborInfo {
                addr: cust,
                relation: Relation::Customer,
            },
            NeighborInfo {
                addr: peer,
                relation: Relation::Peer,
            },
        ],
    );
    (router, cust, peer)
}

#[test]
fn scenario_1_simple_forward() {
    let (mut router, cust, peer) = cust_peer_router();
    router.handle(
        cust,
        Message::Update {
            prefix: Prefix::new(pack("192.0.0.0").unwrap(), mask_of_len(16)).unwrap(),
            attrs: attrs(vec![1]),
        },
    );

    let out = router.handle(
        peer,
        Message::Data {
            dest: pack("192.0.0.25").unwrap(),
            payload: b"hello".to_vec(),
        },
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, cust);
    assert_eq!(out[0].body, OutboundBody::Data(b"hello".to_vec()));
}

#[test]
fn scenario_2_no_route_by_policy() {
    let (mut router, cust, peer) = cust_peer_router();
    router.handle(
        cust,
        Message::Update {
            prefix: Prefix::new(pack("192.0.0.0").unwrap(), mask_of_len(16)).unwrap(),
            attrs: attrs(vec![1]),
        },
    );

    let out = router.handle(
        peer,
        Message::Data {
            dest: pack("10.0.0.1").unwrap(),
            payload: vec![],
        },
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, peer);
    assert_eq!(out[0].body, OutboundBody::NoRoute);
}

#[test]
fn scenario_3_longest_prefix_match_across_neighbors() {
    let cust1 = pack("10.10.0.2").unwrap();
    let cust2 = pack("10.20.0.2").unwrap();
    let mut router = Router::new(
        1,
        [
            NeighborInfo {
                addr: cust1,
                relation: Relation::Customer,
            },
            NeighborInfo {
                addr: cust2,
                relation: Relation::Customer,
            },
        ],
    );
    router.handle(
        cust1,
        Message::Update {
            prefix: Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap(),
            attrs: attrs(vec![2]),
        },
    );
    router.handle(
        cust2,
        Message::Update {
            prefix: Prefix::new(pack("10.1.0.0").unwrap(), mask_of_len(16)).unwrap(),
            attrs: attrs(vec![3]),
        },
    );

    let out = router.handle(
        cust1,
        Message::Data {
            dest: pack("10.1.2.3").unwrap(),
            payload: vec![],
        },
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, cust2);
}

#[test]
fn scenario_6_tie_break_by_as_path_length() {
    let a = pack("192.0.0.2").unwrap();
    let b = pack("192.0.0.3").unwrap();
    let mut router = Router::new(
        1,
        [
            NeighborInfo {
                addr: a,
                relation: Relation::Customer,
            },
            NeighborInfo {
                addr: b,
                relation: Relation::Customer,
            },
        ],
    );
    router.handle(
        a,
        Message::Update {
            prefix: Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap(),
            attrs: attrs(vec![2, 3]),
        },
    );
    router.handle(
        b,
        Message::Update {
            prefix: Prefix::new(pack("10.0.0.0").unwrap(), mask_of_len(8)).unwrap(),
            attrs: attrs(vec![4]),
        },
    );

    let out = router.handle(
        a,
        Message::Data {
            dest: pack("10.0.0.1").unwrap(),
            payload: vec![],
        },
    );

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, b);
}
