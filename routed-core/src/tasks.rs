//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Task plumbing that turns timer expiry into events on the instance's
//! main `tokio::select!` loop, using the same `TimeoutTask`/`IntervalTask`
//! abstractions the teacher uses for its own protocol timers.

use std::time::Duration;

use routed_utils::task::{IntervalTask, TimeoutTask};
use tokio::sync::mpsc::UnboundedSender;

use crate::types::NodeId;

/// Timer-driven inputs to the instance's main loop. Datagram arrivals are
/// delivered over their own channels (see `transport::spawn_recv_loop`);
/// this enum only covers events with no natural "sender".
#[derive(Debug)]
pub enum Event {
    /// A neighbor's inactivity timer expired without a HELLO refresh.
    NeighborInactive(NodeId),
    /// The periodic reconciliation timer ticked.
    ReconcileTick,
}

/// Spawns the per-neighbor HELLO inactivity timer. The caller is
/// responsible for calling `.reset(Some(t_dead))` on the returned handle
/// every time a HELLO arrives from this peer; left untouched, it fires
/// once and sends `Event::NeighborInactive(peer)`.
pub fn nsm_inactivity_timer(
    peer: NodeId,
    t_dead: Duration,
    tx: UnboundedSender<Event>,
) -> TimeoutTask {
    TimeoutTask::new(t_dead, move || async move {
        let _ = tx.send(Event::NeighborInactive(peer));
    })
}

/// Spawns the periodic reconciliation ticker. Each tick sends
/// `Event::ReconcileTick`; the instance does not need to reset this timer
/// itself.
pub fn reconciliation_interval(
    t_tick: Duration,
    tx: UnboundedSender<Event>,
) -> IntervalTask {
    IntervalTask::new(t_tick, true, move || {
        let tx = tx.clone();
        async move {
            let _ = tx.send(Event::ReconcileTick);
        }
    })
}
