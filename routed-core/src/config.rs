//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Validated startup configuration. Building a `Config` is the only place
//! malformed input becomes a fatal error instead of a runtime one -- once
//! built, every field is assumed sound for the rest of the process
//! lifetime.

use std::net::IpAddr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{LinkMetrics, LocalLink, NodeId, Prefix};

pub const PROTOCOL_PORT_BASE: u16 = 10000;
pub const CONTROL_PORT_BASE: u16 = 20000;

const DEFAULT_T_DEAD: Duration = Duration::from_secs(15);
const DEFAULT_T_TICK: Duration = Duration::from_secs(10);
const DEFAULT_T_SETTLE_MIN: Duration = Duration::from_secs(1);
const DEFAULT_T_SETTLE_MAX: Duration = Duration::from_secs(2);

/// A locally-attached prefix announced but never traversed, as configured
/// on the command line (before it's turned into a wire `StubLink` at
/// origination time).
#[derive(Clone, Debug)]
pub struct StubNetwork {
    pub prefix: Prefix,
    pub cost: u32,
}

/// The seven positional fields of one `--links` occurrence, still in
/// string form; validated by [`Config::build`].
#[derive(Clone, Debug, Default)]
pub struct RawLinkSpec {
    pub peer: String,
    pub peer_addr: String,
    pub prefix: String,
    pub cost: String,
    pub latency_ms: String,
    pub bandwidth_mbps: String,
    pub peer_port: String,
}

/// The two positional fields of one `--stub-network` occurrence.
#[derive(Clone, Debug, Default)]
pub struct RawStubSpec {
    pub prefix: String,
    pub cost: String,
}

/// Everything the CLI accepted, parsed and validated. Immutable for the
/// life of the daemon.
#[derive(Clone, Debug)]
pub struct Config {
    pub name: NodeId,
    pub bind_addr: IpAddr,
    pub protocol_port: u16,
    pub control_port: u16,
    pub local_links: Vec<LocalLink>,
    pub stub_networks: Vec<StubNetwork>,
    pub t_dead: Duration,
    pub t_tick: Duration,
    pub t_settle_min: Duration,
    pub t_settle_max: Duration,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        name: String,
        bind_addr: IpAddr,
        links: Vec<RawLinkSpec>,
        stubs: Vec<RawStubSpec>,
        t_dead: Option<Duration>,
        t_tick: Option<Duration>,
        t_settle_min: Option<Duration>,
        t_settle_max: Option<Duration>,
    ) -> Result<Config, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::MissingName);
        }
        let name = NodeId::new(name);
        let suffix = name
            .numeric_suffix()
            .ok_or_else(|| ConfigError::InvalidNodeId(name.as_str().to_owned()))?;

        let local_links = links
            .into_iter()
            .map(parse_link)
            .collect::<Result<Vec<_>, _>>()?;
        let stub_networks = stubs
            .into_iter()
            .map(parse_stub)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            name,
            bind_addr,
            protocol_port: PROTOCOL_PORT_BASE + suffix,
            control_port: CONTROL_PORT_BASE + suffix,
            local_links,
            stub_networks,
            t_dead: t_dead.unwrap_or(DEFAULT_T_DEAD),
            t_tick: t_tick.unwrap_or(DEFAULT_T_TICK),
            t_settle_min: t_settle_min.unwrap_or(DEFAULT_T_SETTLE_MIN),
            t_settle_max: t_settle_max.unwrap_or(DEFAULT_T_SETTLE_MAX),
        })
    }
}

fn parse_link(raw: RawLinkSpec) -> Result<LocalLink, ConfigError> {
    let peer_addr: IpAddr = raw
        .peer_addr
        .parse()
        .map_err(|e| ConfigError::InvalidAddress(raw.peer_addr.clone(), e))?;
    let cost: u32 = raw
        .cost
        .parse()
        .map_err(|e| ConfigError::InvalidNumber(raw.cost.clone(), e))?;
    let latency: u32 = raw
        .latency_ms
        .parse()
        .map_err(|e| ConfigError::InvalidNumber(raw.latency_ms.clone(), e))?;
    let bandwidth: u32 = raw
        .bandwidth_mbps
        .parse()
        .map_err(|e| ConfigError::InvalidNumber(raw.bandwidth_mbps.clone(), e))?;
    let peer_port: u16 = raw
        .peer_port
        .parse()
        .map_err(|e| ConfigError::InvalidNumber(raw.peer_port.clone(), e))?;
    if cost == 0 {
        return Err(ConfigError::InvalidLinkSpec(vec![
            raw.peer,
            raw.peer_addr,
            raw.prefix,
            raw.cost,
            raw.latency_ms,
            raw.bandwidth_mbps,
            raw.peer_port,
        ]));
    }
    Ok(LocalLink {
        peer: NodeId::new(raw.peer),
        peer_addr,
        peer_port,
        prefix: Prefix::new(raw.prefix),
        metrics: LinkMetrics {
            cost,
            latency,
            bandwidth,
            // Optimistic initial state, matching the source configuration
            // step: a configured link starts up and is only marked down
            // by a failed send or neighbor-inactivity purge.
            up: true,
        },
    })
}

fn parse_stub(raw: RawStubSpec) -> Result<StubNetwork, ConfigError> {
    let cost: u32 = raw
        .cost
        .parse()
        .map_err(|e| ConfigError::InvalidNumber(raw.cost.clone(), e))?;
    if cost == 0 {
        return Err(ConfigError::InvalidStubSpec(vec![raw.prefix, raw.cost]));
    }
    Ok(StubNetwork {
        prefix: Prefix::new(raw.prefix),
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(peer: &str, addr: &str, port: &str) -> RawLinkSpec {
        RawLinkSpec {
            peer: peer.to_owned(),
            peer_addr: addr.to_owned(),
            prefix: "10.0.0.0/30".to_owned(),
            cost: "1".to_owned(),
            latency_ms: "5".to_owned(),
            bandwidth_mbps: "100".to_owned(),
            peer_port: port.to_owned(),
        }
    }

    #[test]
    fn builds_ports_from_numeric_suffix() {
        let config = Config::build(
            "r1".to_owned(),
            "0.0.0.0".parse().unwrap(),
            vec![link("r2", "10.0.0.2", "10002")],
            vec![],
            None,
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.protocol_port, 10001);
        assert_eq!(config.control_port, 20001);
        assert_eq!(config.local_links.len(), 1);
        assert_eq!(config.t_dead, DEFAULT_T_DEAD);
    }

    #[test]
    fn rejects_node_id_without_numeric_suffix() {
        let err = Config::build(
            "router".to_owned(),
            "0.0.0.0".parse().unwrap(),
            vec![],
            vec![],
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNodeId(_)));
    }

    #[test]
    fn rejects_zero_cost_link() {
        let mut bad_link = link("r2", "10.0.0.2", "10002");
        bad_link.cost = "0".to_owned();
        let err = Config::build(
            "r1".to_owned(),
            "0.0.0.0".parse().unwrap(),
            vec![bad_link],
            vec![],
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLinkSpec(_)));
    }

    #[test]
    fn rejects_malformed_address() {
        let err = Config::build(
            "r1".to_owned(),
            "0.0.0.0".parse().unwrap(),
            vec![link("r2", "not-an-ip", "10002")],
            vec![],
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress(..)));
    }
}
