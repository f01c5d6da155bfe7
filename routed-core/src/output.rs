//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Outbound message construction and the packet-sent metric line, kept
//! separate from the transport itself so the logging format is
//! independent of the socket implementation.

use std::net::SocketAddr;

use tracing::info;

use crate::codec::Message;
use crate::collections::LocalLinks;
use crate::error::IoError;
use crate::transport::Transport;
use crate::types::NodeId;

/// Encodes and sends `msg`, logging `METRIC_PACKET_SENT` on every
/// attempt regardless of outcome.
pub async fn send_message(
    transport: &Transport,
    dst: SocketAddr,
    msg: &Message,
) -> Result<usize, IoError> {
    let bytes = msg.encode();
    info!(
        r#type = msg.kind(),
        size = bytes.len(),
        to = %dst,
        "METRIC_PACKET_SENT"
    );
    transport.send(dst, &bytes).await
}

/// Sends a HELLO to every configured peer whose local link is currently
/// `up`. Send failures are the caller's responsibility to turn into a
/// link-down transition; this function only logs and continues.
pub async fn send_hello(
    transport: &Transport,
    self_name: &NodeId,
    local_links: &LocalLinks,
) -> Vec<NodeId> {
    let mut failed = Vec::new();
    for link in local_links.iter() {
        if !link.metrics.up {
            continue;
        }
        let dst = SocketAddr::new(link.peer_addr, link.peer_port);
        let msg = Message::Hello {
            from: self_name.clone(),
        };
        if send_message(transport, dst, &msg).await.is_err() {
            failed.push(link.peer.clone());
        }
    }
    failed
}
