//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! The intent store: user-supplied routing policies keyed by
//! (source host, destination host), and the lookup that matches an
//! intent to the router advertising its destination.

use std::collections::HashMap;

use crate::lsdb::Lsdb;
use crate::spf::Constraint;
use crate::topology::find_router_for_host;
use crate::types::NodeId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Intent {
    pub src: String,
    pub dst: String,
    pub constraint: Constraint,
}

/// Intents keyed by `(src, dst)` host-name pair; a new intent for an
/// existing pair replaces the old one.
#[derive(Debug, Default)]
pub struct IntentStore {
    entries: HashMap<(String, String), Intent>,
}

impl IntentStore {
    pub fn insert(&mut self, intent: Intent) {
        let key = (intent.src.clone(), intent.dst.clone());
        self.entries.insert(key, intent);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the first stored intent whose destination host resolves (via
    /// the LSDB's stub advertisements) to `dest_router`. First match
    /// wins, mirroring the unordered dictionary scan of the original
    /// implementation.
    pub fn applicable_for(
        &self,
        lsdb: &Lsdb,
        dest_router: &NodeId,
    ) -> Option<&Intent> {
        self.entries.values().find(|intent| {
            find_router_for_host(lsdb, &intent.dst).as_ref()
                == Some(dest_router)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LinkEntry, Lsa, StubLink};

    fn lsdb_with_stub(router: &str, prefix: &str) -> Lsdb {
        let mut lsdb = Lsdb::default();
        let mut lsa = Lsa::new(NodeId::new(router), 1);
        lsa.links
            .insert(prefix.to_owned(), LinkEntry::Stub(StubLink::new(1)));
        lsdb.accept(lsa);
        lsdb
    }

    #[test]
    fn replaces_existing_entry_for_same_key() {
        let mut store = IntentStore::default();
        store.insert(Intent {
            src: "pc1".to_owned(),
            dst: "pc5".to_owned(),
            constraint: Constraint {
                max_latency: Some(10),
                min_bandwidth: None,
            },
        });
        store.insert(Intent {
            src: "pc1".to_owned(),
            dst: "pc5".to_owned(),
            constraint: Constraint {
                max_latency: Some(99),
                min_bandwidth: None,
            },
        });
        assert_eq!(store.entries.len(), 1);
        let only = store.iter().next().unwrap();
        assert_eq!(only.constraint.max_latency, Some(99));
    }

    #[test]
    fn applicable_for_resolves_through_stub_convention() {
        let lsdb = lsdb_with_stub("r3", "172.16.5.0/24");
        let mut store = IntentStore::default();
        store.insert(Intent {
            src: "pc1".to_owned(),
            dst: "pc5".to_owned(),
            constraint: Constraint::NONE,
        });
        let found = store.applicable_for(&lsdb, &NodeId::new("r3"));
        assert!(found.is_some());
        assert!(store.applicable_for(&lsdb, &NodeId::new("r9")).is_none());
    }
}
