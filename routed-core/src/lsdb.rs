//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! The link-state database: one LSA per known origin, replaced whenever a
//! strictly newer sequence number arrives. Entries are never aged out or
//! deleted -- see the Open Question note on LSA expiry in the design
//! notes.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::debug::Debug;
use crate::types::{Lsa, NodeId};

#[derive(Debug, Default)]
pub struct Lsdb {
    entries: HashMap<NodeId, Lsa>,
    /// In-process high-water mark for self-origination sequence numbers,
    /// so two originations within the same wall-clock second still
    /// strictly increase.
    last_self_seq: u64,
}

impl Lsdb {
    /// Accepts `lsa` iff its origin is unknown or its sequence number is
    /// strictly greater than the stored one. Returns whether it was
    /// accepted.
    pub fn accept(&mut self, lsa: Lsa) -> bool {
        let accept = match self.entries.get(&lsa.origin) {
            None => true,
            Some(current) => lsa.seq > current.seq,
        };
        if accept {
            Debug::LsaAccept(&lsa.origin, lsa.seq).log();
            self.entries.insert(lsa.origin.clone(), lsa);
        } else {
            let current_seq = self.entries[&lsa.origin].seq;
            Debug::LsaStaleDiscard(&lsa.origin, lsa.seq, current_seq).log();
        }
        accept
    }

    /// Installs a self-originated LSA unconditionally: an origination is
    /// always the authoritative view of this node's own state, regardless
    /// of what happens to be cached.
    pub fn install_self(&mut self, lsa: Lsa) {
        self.entries.insert(lsa.origin.clone(), lsa);
    }

    pub fn get(&self, origin: &NodeId) -> Option<&Lsa> {
        self.entries.get(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lsa> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produces the next strictly-increasing sequence number for a
    /// self-origination, seeded from wall-clock time.
    pub fn next_self_seq(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is after the epoch")
            .as_secs();
        let next = std::cmp::max(now, self.last_self_seq + 1);
        self.last_self_seq = next;
        next
    }
}
