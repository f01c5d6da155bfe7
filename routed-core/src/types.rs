//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Core data model: node/prefix identifiers, link metrics, and the LSA
//! wire/in-memory representation.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Opaque short string identifier for a router (e.g. `r1`).
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(s: impl Into<String>) -> NodeId {
        NodeId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the numeric suffix used to derive the protocol and control
    /// ports (e.g. `r1` -> `1`).
    pub fn numeric_suffix(&self) -> Option<u16> {
        let digits: String =
            self.0.chars().skip_while(|c| !c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> NodeId {
        NodeId(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> NodeId {
        NodeId(s)
    }
}

/// Routable destination, carried as an opaque CIDR-style string. The core
/// never performs IP arithmetic on it.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct Prefix(pub String);

impl Prefix {
    pub fn new(s: impl Into<String>) -> Prefix {
        Prefix(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Prefix {
        Prefix(s.to_owned())
    }
}

/// SPF weight plus the constraint-relevant edge attributes, and the
/// neighbor-state-machine-owned liveness bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LinkMetrics {
    pub cost: u32,
    pub latency: u32,
    pub bandwidth: u32,
    pub up: bool,
}

/// A configured adjacency to a directly-connected peer. Created at startup
/// from `--links`; the `up` bit inside `metrics` is the only field mutated
/// after that, and only by the neighbor state machine.
#[derive(Clone, Debug)]
pub struct LocalLink {
    pub peer: NodeId,
    pub peer_addr: IpAddr,
    pub peer_port: u16,
    pub prefix: Prefix,
    pub metrics: LinkMetrics,
}

/// A locally-attached prefix announced but never traversed. `stub` is
/// always `true`; it is carried as an explicit field purely so the wire
/// representation matches the `{cost, stub: true}` shape of the data model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct StubLink {
    pub cost: u32,
    pub stub: bool,
}

impl StubLink {
    pub fn new(cost: u32) -> StubLink {
        StubLink { cost, stub: true }
    }
}

/// One entry in an LSA's link map: either a metrics-bearing adjacency to
/// another router, or a locally-attached stub network. Modeled as a
/// discriminated sum type rather than an untyped map, per the design notes.
/// The two variants have disjoint field sets on the wire (`up` vs. `stub`),
/// so an untagged representation round-trips without an explicit
/// discriminant key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
pub enum LinkEntry {
    Peer(LinkMetrics),
    Stub(StubLink),
}

impl LinkEntry {
    pub fn is_stub(&self) -> bool {
        matches!(self, LinkEntry::Stub(_))
    }

    pub fn as_peer(&self) -> Option<&LinkMetrics> {
        match self {
            LinkEntry::Peer(metrics) => Some(metrics),
            LinkEntry::Stub(_) => None,
        }
    }
}

/// A node's self-description: its active adjacencies plus announced stub
/// networks, versioned by a strictly-increasing (per origin) sequence
/// number.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lsa {
    pub origin: NodeId,
    /// Keyed by either a peer `NodeId`'s string form or a `Prefix`'s string
    /// form -- the two namespaces don't overlap in practice, consistent
    /// with the source's single untyped map.
    pub links: BTreeMap<String, LinkEntry>,
    pub seq: u64,
}

impl Lsa {
    pub fn new(origin: NodeId, seq: u64) -> Lsa {
        Lsa {
            origin,
            links: BTreeMap::new(),
            seq,
        }
    }

    pub fn peer_links(&self) -> impl Iterator<Item = (&str, &LinkMetrics)> {
        self.links.iter().filter_map(|(key, entry)| {
            entry.as_peer().map(|metrics| (key.as_str(), metrics))
        })
    }

    pub fn stub_links(&self) -> impl Iterator<Item = (&str, &StubLink)> {
        self.links.iter().filter_map(|(key, entry)| match entry {
            LinkEntry::Stub(stub) => Some((key.as_str(), stub)),
            LinkEntry::Peer(_) => None,
        })
    }
}
