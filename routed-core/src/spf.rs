//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Constrained shortest-path computation: Dijkstra over link cost, with
//! per-edge pruning on latency and bandwidth. Tie-breaking is whatever
//! order the min-heap naturally produces for identical `(cost, latency,
//! node, path)` tuples, which is deterministic for a given input graph.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::topology::Graph;
use crate::types::NodeId;

/// Optional SPF edge predicates carried by an intent. `None` means
/// unconstrained on that dimension.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Constraint {
    pub max_latency: Option<u32>,
    pub min_bandwidth: Option<u32>,
}

impl Constraint {
    pub const NONE: Constraint = Constraint {
        max_latency: None,
        min_bandwidth: None,
    };
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct HeapEntry {
    cost: u32,
    latency: u32,
    node: NodeId,
    path: Vec<NodeId>,
}

/// Computes the least-cost path from `src` to `dst` satisfying
/// `constraint`, or `None` if no such path exists in `graph`.
pub fn compute_path(
    graph: &Graph,
    src: &NodeId,
    dst: &NodeId,
    constraint: &Constraint,
) -> Option<Vec<NodeId>> {
    let mut heap = BinaryHeap::new();
    let mut min_costs: HashMap<NodeId, u32> = HashMap::new();
    min_costs.insert(src.clone(), 0);
    heap.push(Reverse(HeapEntry {
        cost: 0,
        latency: 0,
        node: src.clone(),
        path: vec![src.clone()],
    }));

    while let Some(Reverse(HeapEntry {
        cost,
        latency,
        node,
        path,
    })) = heap.pop()
    {
        if cost > *min_costs.get(&node).unwrap_or(&u32::MAX) {
            continue;
        }
        if node == *dst {
            return Some(path);
        }

        for edge in graph.neighbors(&node) {
            if let Some(min_bw) = constraint.min_bandwidth {
                if edge.bandwidth < min_bw {
                    continue;
                }
            }
            let new_cost = cost + edge.cost;
            let new_latency = latency + edge.latency;
            if let Some(max_lat) = constraint.max_latency {
                if new_latency > max_lat {
                    continue;
                }
            }
            if new_cost < *min_costs.get(&edge.to_node).unwrap_or(&u32::MAX) {
                min_costs.insert(edge.to_node.clone(), new_cost);
                let mut new_path = path.clone();
                new_path.push(edge.to_node.clone());
                heap.push(Reverse(HeapEntry {
                    cost: new_cost,
                    latency: new_latency,
                    node: edge.to_node.clone(),
                    path: new_path,
                }));
            }
        }
    }
    None
}

/// Runs SPF under `constraint`; if that yields no path (or no constraint
/// is applicable), falls back to an unconstrained computation, logging a
/// warning on the downgrade per the reconciliation policy.
pub fn compute_path_with_fallback(
    graph: &Graph,
    src: &NodeId,
    dst: &NodeId,
    constraint: Option<&Constraint>,
) -> Option<Vec<NodeId>> {
    if let Some(constraint) = constraint {
        if *constraint != Constraint::NONE {
            if let Some(path) = compute_path(graph, src, dst, constraint) {
                return Some(path);
            }
            crate::error::Error::SpfNoPathUnderIntent(
                src.clone(),
                dst.clone(),
            )
            .log();
        }
    }
    compute_path(graph, src, dst, &Constraint::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsdb::Lsdb;
    use crate::types::{LinkEntry, LinkMetrics, Lsa};

    fn peer(cost: u32, latency: u32, bandwidth: u32) -> LinkEntry {
        LinkEntry::Peer(LinkMetrics {
            cost,
            latency,
            bandwidth,
            up: true,
        })
    }

    fn build(edges: &[(&str, &str, u32, u32, u32)]) -> Graph {
        let mut lsdb = Lsdb::default();
        let mut by_origin: HashMap<&str, Lsa> = HashMap::new();
        for &(from, to, cost, latency, bandwidth) in edges {
            let lsa = by_origin
                .entry(from)
                .or_insert_with(|| Lsa::new(NodeId::new(from), 1));
            lsa.links
                .insert(to.to_owned(), peer(cost, latency, bandwidth));
        }
        for lsa in by_origin.into_values() {
            lsdb.accept(lsa);
        }
        Graph::build(&lsdb)
    }

    fn path(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::new(*n)).collect()
    }

    #[test]
    fn triangle_convergence_prefers_cheaper_two_hop() {
        let graph = build(&[
            ("r1", "r2", 1, 1, 100),
            ("r2", "r1", 1, 1, 100),
            ("r1", "r3", 10, 1, 100),
            ("r3", "r1", 10, 1, 100),
            ("r2", "r3", 1, 1, 100),
            ("r3", "r2", 1, 1, 100),
        ]);
        let found = compute_path(
            &graph,
            &NodeId::new("r1"),
            &NodeId::new("r3"),
            &Constraint::NONE,
        );
        assert_eq!(found, Some(path(&["r1", "r2", "r3"])));
    }

    #[test]
    fn latency_constraint_prefers_longer_cheaper_path() {
        let graph = build(&[
            ("a", "b", 1, 5, 100),
            ("b", "c", 1, 5, 100),
            ("a", "c", 10, 2, 100),
            ("c", "d", 1, 1, 100),
        ]);
        let constraint = Constraint {
            max_latency: Some(12),
            min_bandwidth: Some(40),
        };
        let found = compute_path(
            &graph,
            &NodeId::new("a"),
            &NodeId::new("d"),
            &constraint,
        );
        assert_eq!(found, Some(path(&["a", "b", "c", "d"])));
    }

    #[test]
    fn bandwidth_pruning_forces_detour() {
        let graph = build(&[
            ("a", "b", 1, 5, 100),
            ("b", "c", 1, 5, 50),
            ("a", "c", 10, 2, 100),
            ("c", "d", 1, 1, 100),
        ]);
        let constraint = Constraint {
            max_latency: None,
            min_bandwidth: Some(60),
        };
        let found = compute_path(
            &graph,
            &NodeId::new("a"),
            &NodeId::new("d"),
            &constraint,
        );
        assert_eq!(found, Some(path(&["a", "c", "d"])));
    }

    #[test]
    fn unsatisfiable_intent_falls_back_to_unconstrained() {
        let graph = build(&[("a", "b", 1, 100, 10)]);
        let impossible = Constraint {
            max_latency: Some(1),
            min_bandwidth: None,
        };
        let found = compute_path_with_fallback(
            &graph,
            &NodeId::new("a"),
            &NodeId::new("b"),
            Some(&impossible),
        );
        assert_eq!(found, Some(path(&["a", "b"])));
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let graph = build(&[("a", "b", 1, 1, 100)]);
        assert_eq!(
            compute_path(
                &graph,
                &NodeId::new("a"),
                &NodeId::new("z"),
                &Constraint::NONE
            ),
            None
        );
    }
}
