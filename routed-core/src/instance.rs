//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! The top-level instance: owns both transports and the shared tables,
//! and drives the reconciliation loop that ties origination, flooding,
//! SPF, and FIB installation together.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;

use crate::codec::{IntentMessage, Message};
use crate::collections::{LocalLinks, Neighbors};
use crate::config::Config;
use crate::debug::Debug;
use crate::error::{Error, IoError};
use crate::fib::FibInstaller;
use crate::flood::flood;
use crate::intent::{Intent, IntentStore};
use crate::lsdb::Lsdb;
use crate::neighbor::nsm;
use crate::output::send_hello;
use crate::spf::{Constraint, compute_path_with_fallback};
use crate::tasks::{Event, nsm_inactivity_timer, reconciliation_interval};
use crate::topology::{Graph, find_router_for_prefix};
use crate::transport::{Transport, spawn_recv_loop};
use crate::types::{LinkEntry, Lsa, NodeId, Prefix, StubLink};

/// A running node. Cheap to pass around as `Arc<Instance>`: the expensive
/// state lives behind the per-table locks, not in this struct itself.
pub struct Instance {
    config: Config,
    protocol: Arc<Transport>,
    control: Arc<Transport>,
    fib: Arc<dyn FibInstaller>,
    local_links: Mutex<LocalLinks>,
    neighbors: Mutex<Neighbors>,
    lsdb: Mutex<Lsdb>,
    intents: Mutex<IntentStore>,
}

impl Instance {
    /// Binds both transports and builds the initial (all-down) local-link
    /// table from configuration. Bind failure is the only error this
    /// function can produce; `--links`/`--stub-network` validation already
    /// happened when `config` was built.
    pub async fn new(config: Config, fib: Arc<dyn FibInstaller>) -> Result<Instance, IoError> {
        let protocol =
            Arc::new(Transport::bind(config.bind_addr, config.protocol_port).await?);
        let control =
            Arc::new(Transport::bind(config.bind_addr, config.control_port).await?);

        let mut local_links = LocalLinks::default();
        for link in &config.local_links {
            local_links.insert(link.clone());
        }

        Ok(Instance {
            config,
            protocol,
            control,
            fib,
            local_links: Mutex::new(local_links),
            neighbors: Mutex::new(Neighbors::default()),
            lsdb: Mutex::new(Lsdb::default()),
            intents: Mutex::new(IntentStore::default()),
        })
    }

    /// Runs until a shutdown signal (SIGINT/SIGTERM) is received. Peers
    /// are not notified of the shutdown; in-flight sends and timers are
    /// simply dropped at their next suspension point.
    pub async fn run(self: Arc<Self>) {
        let (protocol_tx, mut protocol_rx) = mpsc::unbounded_channel();
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        spawn_recv_loop(self.protocol.clone(), "protocol", Message::decode, protocol_tx);
        spawn_recv_loop(self.control.clone(), "control", IntentMessage::decode, control_tx);
        let _reconcile_timer = reconciliation_interval(self.config.t_tick, event_tx.clone());

        let mut shutdown = std::pin::pin!(shutdown_signal());
        loop {
            tokio::select! {
                Some((msg, src)) = protocol_rx.recv() => {
                    self.handle_protocol_message(msg, src, &event_tx).await;
                }
                Some((intent, src)) = control_rx.recv() => {
                    self.handle_intent(intent, src);
                    self.settle_then_reconcile().await;
                }
                Some(event) = event_rx.recv() => {
                    match event {
                        Event::NeighborInactive(peer) => self.handle_neighbor_inactive(peer),
                        Event::ReconcileTick => self.tick().await,
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, terminating");
                    break;
                }
            }
        }
    }

    // ===== inbound message handling =====

    async fn handle_protocol_message(
        &self,
        msg: Message,
        src: SocketAddr,
        event_tx: &mpsc::UnboundedSender<Event>,
    ) {
        match msg {
            Message::Hello { from } => self.handle_hello(from, event_tx),
            Message::Lsa(lsa) => self.handle_lsa(lsa, src).await,
            Message::Unknown(kind) => {
                Error::UnknownMessageType(src, kind).log();
            }
        }
    }

    fn handle_hello(&self, from: NodeId, event_tx: &mpsc::UnboundedSender<Event>) {
        {
            let mut neighbors = self.neighbors.lock().unwrap();
            let neighbor = neighbors.get_or_create(&from);
            neighbor.fsm(nsm::Event::HelloRcvd);
            match &mut neighbor.tasks.inactivity_timer {
                Some(timer) => timer.reset(Some(self.config.t_dead)),
                None => {
                    neighbor.tasks.inactivity_timer = Some(nsm_inactivity_timer(
                        from.clone(),
                        self.config.t_dead,
                        event_tx.clone(),
                    ));
                }
            }
        }
        if let Some(link) = self.local_links.lock().unwrap().get_mut(&from) {
            link.metrics.up = true;
        }
    }

    fn handle_neighbor_inactive(&self, peer: NodeId) {
        Error::NeighborStale(peer.clone()).log();
        if let Some(link) = self.local_links.lock().unwrap().get_mut(&peer) {
            link.metrics.up = false;
        }
        if let Some(neighbor) = self.neighbors.lock().unwrap().get_mut(&peer) {
            neighbor.fsm(nsm::Event::InactivityTimer);
        }
    }

    async fn handle_lsa(&self, lsa: Lsa, src: SocketAddr) {
        let accepted = self.lsdb.lock().unwrap().accept(lsa.clone());
        if !accepted {
            return;
        }
        let from_peer = self.peer_for_addr(src);
        let local_links = self.local_links.lock().unwrap().clone();
        flood(&self.protocol, &local_links, &lsa, from_peer.as_ref()).await;
    }

    fn peer_for_addr(&self, src: SocketAddr) -> Option<NodeId> {
        self.local_links
            .lock()
            .unwrap()
            .iter()
            .find(|link| link.peer_addr == src.ip())
            .map(|link| link.peer.clone())
    }

    fn handle_intent(&self, msg: IntentMessage, src: SocketAddr) {
        if msg.kind != "INTENT" {
            Error::UnknownMessageType(src, msg.kind).log();
            return;
        }
        let intent = Intent {
            src: msg.src,
            dst: msg.dst,
            constraint: Constraint {
                max_latency: msg.max_latency,
                min_bandwidth: msg.min_bandwidth,
            },
        };
        self.intents.lock().unwrap().insert(intent);
    }

    // ===== reconciliation =====

    async fn tick(&self) {
        self.send_hellos().await;
        self.originate_and_flood().await;
        self.settle_then_reconcile().await;
    }

    async fn send_hellos(&self) {
        let local_links = self.local_links.lock().unwrap().clone();
        let failed = send_hello(&self.protocol, &self.config.name, &local_links).await;
        if failed.is_empty() {
            return;
        }
        let mut local_links = self.local_links.lock().unwrap();
        for peer in failed {
            if let Some(link) = local_links.get_mut(&peer) {
                link.metrics.up = false;
            }
        }
    }

    async fn originate_and_flood(&self) {
        let lsa = {
            let local_links = self.local_links.lock().unwrap();
            let mut lsdb = self.lsdb.lock().unwrap();
            let seq = lsdb.next_self_seq();
            let mut lsa = Lsa::new(self.config.name.clone(), seq);

            let mut num_peers = 0;
            for link in local_links.iter() {
                if !link.metrics.up {
                    continue;
                }
                lsa.links
                    .insert(link.peer.as_str().to_owned(), LinkEntry::Peer(link.metrics));
                num_peers += 1;
            }
            let mut num_stubs = 0;
            for stub in &self.config.stub_networks {
                lsa.links.insert(
                    stub.prefix.as_str().to_owned(),
                    LinkEntry::Stub(StubLink::new(stub.cost)),
                );
                num_stubs += 1;
            }

            lsdb.install_self(lsa.clone());
            Debug::LsaOriginate(seq, num_peers, num_stubs).log();
            Debug::LsdbSize(lsdb.len()).log();
            lsa
        };

        let local_links = self.local_links.lock().unwrap().clone();
        flood(&self.protocol, &local_links, &lsa, None).await;
    }

    /// Sleeps a randomized `t_settle` before rebuilding the topology graph
    /// and installing FIB entries, giving recently-flooded LSAs a chance
    /// to arrive across the mesh.
    async fn settle_then_reconcile(&self) {
        tokio::time::sleep(self.settle_duration()).await;
        self.install_fib();
    }

    fn settle_duration(&self) -> Duration {
        let min = self.config.t_settle_min;
        let max = self.config.t_settle_max;
        if max <= min {
            return min;
        }
        rand::rng().random_range(min..=max)
    }

    fn install_fib(&self) {
        let lsdb = self.lsdb.lock().unwrap();
        let graph = Graph::build(&lsdb);
        let intents = self.intents.lock().unwrap();

        let prefixes: Vec<String> = lsdb
            .iter()
            .filter(|entry| entry.origin != self.config.name)
            .flat_map(|entry| entry.stub_links().map(|(prefix, _)| prefix.to_owned()))
            .collect();
        Debug::SpfStart(prefixes.len()).log();

        for prefix_str in prefixes {
            let prefix = Prefix::new(prefix_str);
            let Some(dest_router) = find_router_for_prefix(&lsdb, &prefix) else {
                continue;
            };
            if dest_router == self.config.name {
                continue;
            }

            let applicable = intents
                .applicable_for(&lsdb, &dest_router)
                .map(|intent| intent.constraint);
            let path = compute_path_with_fallback(
                &graph,
                &self.config.name,
                &dest_router,
                applicable.as_ref(),
            );

            match path {
                Some(path) if path.len() >= 2 => {
                    let next_hop_node = &path[1];
                    let Some(next_hop_addr) = self
                        .local_links
                        .lock()
                        .unwrap()
                        .get(next_hop_node)
                        .map(|link| link.peer_addr)
                    else {
                        continue;
                    };
                    Debug::SpfNextHop(&prefix, next_hop_node).log();
                    if let Err(error) = self.fib.install(&prefix, next_hop_addr) {
                        error.log();
                    }
                }
                _ => {
                    Error::SpfNoPath(self.config.name.clone(), prefix).log();
                }
            }
        }

        if let Some(size) = self.fib.table_size() {
            tracing::debug!(size, "METRIC_TABLE_SIZE");
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}
