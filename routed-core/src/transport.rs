//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! UDP transport: one bound socket per endpoint (protocol or control),
//! plus the receive-loop task that decodes inbound datagrams and forwards
//! them to the instance's main task over an unbounded channel.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

use crate::error::IoError;

const MAX_DATAGRAM_SIZE: usize = 4096;

/// A bound UDP endpoint. Kept as a thin wrapper (rather than exposing
/// `tokio::net::UdpSocket` directly) so tests can substitute an
/// in-process double that never touches a real socket.
#[derive(Debug)]
pub struct Transport {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl Transport {
    pub async fn bind(addr: IpAddr, port: u16) -> Result<Transport, IoError> {
        let local_addr = SocketAddr::new(addr, port);
        let socket = UdpSocket::bind(local_addr)
            .await
            .map_err(|error| IoError::BindError(local_addr, error))?;
        Ok(Transport { socket, local_addr })
    }

    pub async fn send(
        &self,
        dst: SocketAddr,
        bytes: &[u8],
    ) -> Result<usize, IoError> {
        self.socket
            .send_to(bytes, dst)
            .await
            .map_err(|error| IoError::SendError(dst, error))
    }

    pub async fn recv(&self) -> Result<(Vec<u8>, SocketAddr), IoError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let (len, src) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(IoError::RecvError)?;
        buf.truncate(len);
        Ok((buf, src))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Decodes each inbound datagram with `decode` and forwards the
/// `(message, source)` pair over `tx` to the instance's main task. Both
/// recv errors and per-datagram decode errors are logged and otherwise
/// ignored; the loop only ends when the receiving end of `tx` is dropped.
pub async fn recv_loop<T>(
    transport: Arc<Transport>,
    decode: impl Fn(&[u8]) -> Result<T, crate::error::CodecError>,
    tx: UnboundedSender<(T, SocketAddr)>,
) {
    loop {
        match transport.recv().await {
            Ok((bytes, src)) => match decode(&bytes) {
                Ok(msg) => {
                    if tx.send((msg, src)).is_err() {
                        return;
                    }
                }
                Err(error) => error.log(),
            },
            Err(error) => {
                error.log();
            }
        }
    }
}

/// Spawns `recv_loop` as a detached task, matching the teacher's
/// convention of naming background tasks by the span they run under.
pub fn spawn_recv_loop<T>(
    transport: Arc<Transport>,
    span_name: &'static str,
    decode: impl Fn(&[u8]) -> Result<T, crate::error::CodecError> + Send + 'static,
    tx: UnboundedSender<(T, SocketAddr)>,
) -> tokio::task::JoinHandle<()>
where
    T: Send + 'static,
{
    let span = tracing::debug_span!("recv_loop", endpoint = span_name);
    tokio::spawn(recv_loop(transport, decode, tx).instrument(span))
}
