//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Split-horizon LSA flooding: re-advertise an accepted LSA to every
//! configured peer except the one it arrived from.

use std::net::SocketAddr;

use crate::codec::Message;
use crate::collections::LocalLinks;
use crate::debug::Debug;
use crate::output::send_message;
use crate::transport::Transport;
use crate::types::{Lsa, NodeId};

/// Floods `lsa` to every peer with a configured local link, skipping
/// `exclude` (the neighbor it was received from, if known). Link-up state
/// is intentionally not checked here: a send to a down peer simply fails
/// and is logged, matching the source behavior of flooding by configured
/// peer list rather than by active-neighbor set.
pub async fn flood(
    transport: &Transport,
    local_links: &LocalLinks,
    lsa: &Lsa,
    exclude: Option<&NodeId>,
) {
    let msg = Message::Lsa(lsa.clone());
    let mut sent = 0;
    for link in local_links.iter() {
        if Some(&link.peer) == exclude {
            continue;
        }
        let dst = SocketAddr::new(link.peer_addr, link.peer_port);
        if send_message(transport, dst, &msg).await.is_ok() {
            sent += 1;
        }
    }
    Debug::LsaFlood(&lsa.origin, sent).log();
}
