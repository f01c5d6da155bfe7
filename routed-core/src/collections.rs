//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Node-local tables: configured links and their runtime neighbor state.
//! Unlike the generational-arena-backed collections this is descended
//! from, adjacencies here are static (fixed at startup from `--links`)
//! so a plain `HashMap` keyed by peer id is sufficient -- nothing is ever
//! removed from `LocalLinks`, only marked down.

use std::collections::HashMap;

use crate::neighbor::Neighbor;
use crate::types::{LocalLink, NodeId};

/// The node's configured adjacencies, keyed by peer id. Cheaply cloned so
/// callers can take a snapshot before an `.await` point rather than hold
/// the table's lock across one.
#[derive(Clone, Debug, Default)]
pub struct LocalLinks(HashMap<NodeId, LocalLink>);

impl LocalLinks {
    pub fn insert(&mut self, link: LocalLink) {
        self.0.insert(link.peer.clone(), link);
    }

    pub fn get(&self, peer: &NodeId) -> Option<&LocalLink> {
        self.0.get(peer)
    }

    pub fn get_mut(&mut self, peer: &NodeId) -> Option<&mut LocalLink> {
        self.0.get_mut(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalLink> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Runtime neighbor-state-machine state for each configured adjacency,
/// keyed by peer id.
#[derive(Debug, Default)]
pub struct Neighbors(HashMap<NodeId, Neighbor>);

impl Neighbors {
    pub fn get_or_create(&mut self, peer: &NodeId) -> &mut Neighbor {
        self.0
            .entry(peer.clone())
            .or_insert_with(|| Neighbor::new(peer.clone()))
    }

    pub fn get(&self, peer: &NodeId) -> Option<&Neighbor> {
        self.0.get(peer)
    }

    pub fn get_mut(&mut self, peer: &NodeId) -> Option<&mut Neighbor> {
        self.0.get_mut(peer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.0.values()
    }
}
