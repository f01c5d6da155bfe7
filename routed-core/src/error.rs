//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::SocketAddr;

use tracing::{error, info, warn};

use crate::types::{NodeId, Prefix};

/// Control-plane errors. None of these propagate above the reconciliation
/// loop: every variant is recovered locally per its documented policy, and
/// `.log()` emits the matching `tracing` event.
#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Codec(CodecError),
    UnknownMessageType(SocketAddr, String),
    SpfNoPathUnderIntent(NodeId, NodeId),
    SpfNoPath(NodeId, Prefix),
    FibInstallFailed(Prefix, SocketAddr, String),
    NeighborStale(NodeId),
}

/// Transport I/O errors.
#[derive(Debug)]
pub enum IoError {
    BindError(SocketAddr, std::io::Error),
    SendError(SocketAddr, std::io::Error),
    RecvError(std::io::Error),
}

/// Message codec errors.
#[derive(Debug)]
pub enum CodecError {
    Envelope(String),
    Payload(String),
}

/// Fatal startup configuration errors. Unlike `Error`, these abort the
/// daemon before it starts serving traffic.
#[derive(Debug)]
pub enum ConfigError {
    MissingName,
    InvalidNodeId(String),
    InvalidLinkSpec(Vec<String>),
    InvalidStubSpec(Vec<String>),
    InvalidAddress(String, std::net::AddrParseError),
    InvalidNumber(String, std::num::ParseIntError),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::Io(error) => error.log(),
            Error::Codec(error) => error.log(),
            Error::UnknownMessageType(source, kind) => {
                tracing::trace!(%source, %kind, "{}", self);
            }
            Error::SpfNoPathUnderIntent(src, dst) => {
                warn!(%src, %dst, "{}", self);
            }
            Error::SpfNoPath(src, prefix) => {
                info!(%src, %prefix, "{}", self);
            }
            Error::FibInstallFailed(prefix, next_hop, reason) => {
                error!(%prefix, %next_hop, %reason, "{}", self);
            }
            Error::NeighborStale(peer) => {
                info!(%peer, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(error) => error.fmt(f),
            Error::Codec(error) => error.fmt(f),
            Error::UnknownMessageType(..) => {
                write!(f, "dropping message of unknown type")
            }
            Error::SpfNoPathUnderIntent(..) => {
                write!(f, "no path satisfies intent, falling back to unconstrained SPF")
            }
            Error::SpfNoPath(..) => {
                write!(f, "no path found, omitting FIB entry for this tick")
            }
            Error::FibInstallFailed(..) => {
                write!(f, "FIB install failed")
            }
            Error::NeighborStale(..) => {
                write!(f, "neighbor declared stale, marking link down")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            Error::Codec(error) => Some(error),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::Io(error)
    }
}

impl From<CodecError> for Error {
    fn from(error: CodecError) -> Error {
        Error::Codec(error)
    }
}

// ===== impl IoError =====

impl IoError {
    pub fn log(&self) {
        match self {
            IoError::BindError(addr, error) => {
                error!(%addr, %error, "{}", self);
            }
            IoError::SendError(addr, error) => {
                warn!(%addr, %error, "{}", self);
            }
            IoError::RecvError(error) => {
                warn!(%error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::BindError(..) => write!(f, "failed to bind UDP socket"),
            IoError::SendError(..) => write!(f, "failed to send datagram"),
            IoError::RecvError(..) => write!(f, "failed to receive datagram"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::BindError(_, error) => Some(error),
            IoError::SendError(_, error) => Some(error),
            IoError::RecvError(error) => Some(error),
        }
    }
}

// ===== impl CodecError =====

impl CodecError {
    pub fn log(&self) {
        warn!(error = %self, "failed to decode datagram");
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Envelope(reason) => {
                write!(f, "malformed envelope: {reason}")
            }
            CodecError::Payload(reason) => {
                write!(f, "malformed payload: {reason}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

// ===== impl ConfigError =====

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingName => write!(f, "--name is required"),
            ConfigError::InvalidNodeId(id) => {
                write!(f, "invalid node id '{id}': expected <letter><digits> (e.g. r1)")
            }
            ConfigError::InvalidLinkSpec(fields) => {
                write!(
                    f,
                    "invalid --links specification (expected 7 fields): {fields:?}"
                )
            }
            ConfigError::InvalidStubSpec(fields) => {
                write!(
                    f,
                    "invalid --stub-network specification (expected 2 fields): {fields:?}"
                )
            }
            ConfigError::InvalidAddress(addr, error) => {
                write!(f, "invalid address '{addr}': {error}")
            }
            ConfigError::InvalidNumber(value, error) => {
                write!(f, "invalid number '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
