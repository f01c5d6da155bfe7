//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Projects the LSDB into a directed weighted graph for one SPF cycle,
//! and resolves host/prefix names to the router that advertises them.

use std::collections::HashMap;

use crate::lsdb::Lsdb;
use crate::types::{LinkMetrics, NodeId, Prefix};

#[derive(Clone, Debug)]
pub struct Edge {
    pub to_node: NodeId,
    pub cost: u32,
    pub latency: u32,
    pub bandwidth: u32,
}

/// Directed weighted adjacency list, one snapshot per SPF cycle.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, Vec<Edge>>,
}

impl Graph {
    /// Builds a snapshot from the current LSDB contents. Stub links are
    /// not edges; only active (`up`) peer links are.
    pub fn build(lsdb: &Lsdb) -> Graph {
        let mut adjacency: HashMap<NodeId, Vec<Edge>> = HashMap::new();
        for lsa in lsdb.iter() {
            let entry = adjacency.entry(lsa.origin.clone()).or_default();
            for (key, metrics) in lsa.peer_links() {
                if !metrics.up {
                    continue;
                }
                entry.push(edge(key, metrics));
            }
        }
        Graph { adjacency }
    }

    pub fn neighbors(&self, node: &NodeId) -> &[Edge] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn edge(peer: &str, metrics: &LinkMetrics) -> Edge {
    Edge {
        to_node: NodeId::new(peer),
        cost: metrics.cost,
        latency: metrics.latency,
        bandwidth: metrics.bandwidth,
    }
}

/// Returns the origin advertising `prefix` as a stub network, if any.
/// First match wins, mirroring the source's unordered dictionary scan.
pub fn find_router_for_prefix(lsdb: &Lsdb, prefix: &Prefix) -> Option<NodeId> {
    lsdb.iter()
        .find(|lsa| lsa.stub_links().any(|(key, _)| key == prefix.as_str()))
        .map(|lsa| lsa.origin.clone())
}

/// Resolves a host name like `pc3` to the stub prefix convention used by
/// the emulated testbed (`172.16.3.0/24`), then to the router that
/// advertises it. Returns `None` for host names outside that convention.
pub fn find_router_for_host(lsdb: &Lsdb, hostname: &str) -> Option<NodeId> {
    let digits = hostname.strip_prefix("pc")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let prefix = Prefix::new(format!("172.16.{digits}.0/24"));
    find_router_for_prefix(lsdb, &prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LinkEntry, StubLink};

    fn lsa_with_peer(origin: &str, peer: &str, cost: u32) -> crate::types::Lsa {
        let mut lsa = crate::types::Lsa::new(NodeId::new(origin), 1);
        lsa.links.insert(
            peer.to_owned(),
            LinkEntry::Peer(LinkMetrics {
                cost,
                latency: 1,
                bandwidth: 100,
                up: true,
            }),
        );
        lsa
    }

    #[test]
    fn down_links_are_not_edges() {
        let mut lsdb = Lsdb::default();
        let mut lsa = lsa_with_peer("r1", "r2", 5);
        lsa.links.insert(
            "r3".to_owned(),
            LinkEntry::Peer(LinkMetrics {
                cost: 1,
                latency: 1,
                bandwidth: 100,
                up: false,
            }),
        );
        lsdb.accept(lsa);
        let graph = Graph::build(&lsdb);
        let neighbors = graph.neighbors(&NodeId::new("r1"));
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].to_node, NodeId::new("r2"));
    }

    #[test]
    fn stub_resolves_by_host_convention() {
        let mut lsdb = Lsdb::default();
        let mut lsa = crate::types::Lsa::new(NodeId::new("r3"), 1);
        lsa.links.insert(
            "172.16.5.0/24".to_owned(),
            LinkEntry::Stub(StubLink::new(1)),
        );
        lsdb.accept(lsa);
        assert_eq!(
            find_router_for_host(&lsdb, "pc5"),
            Some(NodeId::new("r3"))
        );
        assert_eq!(find_router_for_host(&lsdb, "not-a-pc"), None);
    }
}
