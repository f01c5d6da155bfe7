//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::debug;

use crate::neighbor::nsm;
use crate::types::{NodeId, Prefix};

/// Low-severity diagnostic events, logged at `debug` (or `info` for the
/// handful that operators care about without raising `RUST_LOG`).
#[derive(Debug)]
pub enum Debug<'a> {
    // Neighbors
    NeighborNew(&'a NodeId),
    NsmEvent(&'a NodeId, &'a nsm::State, &'a nsm::Event),
    NsmTransition(&'a NodeId, &'a nsm::State, &'a nsm::State),
    // LSDB
    LsaAccept(&'a NodeId, u64),
    LsaStaleDiscard(&'a NodeId, u64, u64),
    LsaFlood(&'a NodeId, usize),
    LsaOriginate(u64, usize, usize),
    LsdbSize(usize),
    // SPF
    SpfStart(usize),
    SpfNextHop(&'a Prefix, &'a NodeId),
}

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::NeighborNew(peer) => {
                tracing::info!(%peer, "new neighbor");
            }
            Debug::NsmEvent(peer, state, event) => {
                debug!(%peer, ?state, ?event, "neighbor state machine event");
            }
            Debug::NsmTransition(peer, old, new) => {
                tracing::info!(%peer, ?old, ?new, "neighbor state transition");
            }
            Debug::LsaAccept(origin, seq) => {
                debug!(%origin, seq, "accepted LSA");
            }
            Debug::LsaStaleDiscard(origin, seq, current) => {
                debug!(%origin, seq, current, "discarding stale LSA");
            }
            Debug::LsaFlood(origin, num_neighbors) => {
                debug!(%origin, num_neighbors, "flooded LSA");
            }
            Debug::LsaOriginate(seq, num_peers, num_stubs) => {
                debug!(seq, num_peers, num_stubs, "originated self LSA");
            }
            Debug::LsdbSize(size) => {
                debug!(size, "METRIC_LSDB_SIZE");
            }
            Debug::SpfStart(num_destinations) => {
                debug!(num_destinations, "running SPF cycle");
            }
            Debug::SpfNextHop(prefix, next_hop) => {
                tracing::info!(%prefix, %next_hop, "chosen next hop");
            }
        }
    }
}
