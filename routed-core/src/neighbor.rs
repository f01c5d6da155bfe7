//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Neighbor liveness tracking: a per-adjacency HELLO timeout and the
//! two-state machine that drives it.

use routed_utils::task::TimeoutTask;

use crate::debug::Debug;
use crate::types::NodeId;

/// Runtime state for one configured adjacency, as distinct from the static
/// `LocalLink` it's paired with. Tracks only what the HELLO protocol itself
/// needs: whether the peer is currently considered alive, and the timer
/// that declares it dead.
#[derive(Debug)]
pub struct Neighbor {
    pub peer: NodeId,
    pub state: nsm::State,
    pub tasks: NeighborTasks,
}

#[derive(Debug, Default)]
pub struct NeighborTasks {
    pub inactivity_timer: Option<TimeoutTask>,
}

/// Neighbor state machine: liveness is binary, there is no negotiation
/// phase to model since adjacencies are statically configured rather than
/// discovered.
pub mod nsm {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum State {
        #[default]
        Down,
        Up,
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Event {
        HelloRcvd,
        InactivityTimer,
    }
}

impl Neighbor {
    pub fn new(peer: NodeId) -> Neighbor {
        Debug::NeighborNew(&peer).log();
        Neighbor {
            peer,
            state: nsm::State::Down,
            tasks: NeighborTasks::default(),
        }
    }

    /// Runs one FSM transition and returns whether the neighbor's
    /// bidirectional-liveness bit flipped, i.e. whether the local link's
    /// `up` metric needs to be updated and a fresh self LSA originated.
    pub fn fsm(&mut self, event: nsm::Event) -> bool {
        Debug::NsmEvent(&self.peer, &self.state, &event).log();

        let new_state = match (self.state, event) {
            (nsm::State::Down, nsm::Event::HelloRcvd) => Some(nsm::State::Up),
            (nsm::State::Up, nsm::Event::HelloRcvd) => None,
            (nsm::State::Up, nsm::Event::InactivityTimer) => {
                Some(nsm::State::Down)
            }
            (nsm::State::Down, nsm::Event::InactivityTimer) => None,
        };

        match new_state {
            Some(new_state) if new_state != self.state => {
                Debug::NsmTransition(&self.peer, &self.state, &new_state)
                    .log();
                self.state = new_state;
                true
            }
            _ => false,
        }
    }

    pub fn is_up(&self) -> bool {
        self.state == nsm::State::Up
    }
}
