//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Command-line parsing: turns `--name`/`--links`/`--stub-network`/timer
//! overrides into a validated `routed_core::config::Config`.

use std::net::IpAddr;
use std::time::Duration;

use clap::{App, Arg};
use routed_core::config::{Config, RawLinkSpec, RawStubSpec};
use routed_core::error::ConfigError;

const LINK_FIELDS: usize = 7;
const STUB_FIELDS: usize = 2;

pub(crate) fn parse() -> Result<Config, ConfigError> {
    let matches = App::new("routed")
        .version(clap::crate_version!())
        .about("distributed, intent-aware link-state routing daemon")
        .arg(
            Arg::with_name("name")
                .long("name")
                .value_name("node-id")
                .required(true)
                .help("this node's identifier, e.g. r1"),
        )
        .arg(
            Arg::with_name("bind-addr")
                .long("bind-addr")
                .value_name("addr")
                .default_value("0.0.0.0")
                .help("address the protocol and control sockets bind to"),
        )
        .arg(
            Arg::with_name("links")
                .long("links")
                .value_names(&[
                    "peer", "peer-addr", "prefix", "cost", "latency-ms", "bandwidth-mbps",
                    "peer-port",
                ])
                .number_of_values(LINK_FIELDS as u64)
                .multiple(true)
                .help("a directly-connected peer (repeatable)"),
        )
        .arg(
            Arg::with_name("stub-network")
                .long("stub-network")
                .value_names(&["prefix", "cost"])
                .number_of_values(STUB_FIELDS as u64)
                .multiple(true)
                .help("a locally-attached stub network (repeatable)"),
        )
        .arg(
            Arg::with_name("t-dead")
                .long("t-dead")
                .value_name("seconds")
                .help("neighbor staleness timeout, default 15s"),
        )
        .arg(
            Arg::with_name("t-tick")
                .long("t-tick")
                .value_name("seconds")
                .help("reconciliation period, default 10s"),
        )
        .arg(
            Arg::with_name("t-settle-min")
                .long("t-settle-min")
                .value_name("seconds")
                .help("minimum settle delay before FIB install, default 1s"),
        )
        .arg(
            Arg::with_name("t-settle-max")
                .long("t-settle-max")
                .value_name("seconds")
                .help("maximum settle delay before FIB install, default 2s"),
        )
        .get_matches();

    let name = matches.value_of("name").unwrap_or_default().to_owned();
    let bind_addr_raw = matches.value_of("bind-addr").unwrap_or("0.0.0.0");
    let bind_addr: IpAddr = bind_addr_raw
        .parse()
        .map_err(|e| ConfigError::InvalidAddress(bind_addr_raw.to_owned(), e))?;

    let links = matches
        .values_of("links")
        .map(|values| values.map(str::to_owned).collect::<Vec<_>>())
        .unwrap_or_default()
        .chunks(LINK_FIELDS)
        .map(|chunk| RawLinkSpec {
            peer: chunk[0].clone(),
            peer_addr: chunk[1].clone(),
            prefix: chunk[2].clone(),
            cost: chunk[3].clone(),
            latency_ms: chunk[4].clone(),
            bandwidth_mbps: chunk[5].clone(),
            peer_port: chunk[6].clone(),
        })
        .collect::<Vec<_>>();

    let stubs = matches
        .values_of("stub-network")
        .map(|values| values.map(str::to_owned).collect::<Vec<_>>())
        .unwrap_or_default()
        .chunks(STUB_FIELDS)
        .map(|chunk| RawStubSpec {
            prefix: chunk[0].clone(),
            cost: chunk[1].clone(),
        })
        .collect::<Vec<_>>();

    let t_dead = parse_seconds(matches.value_of("t-dead"))?;
    let t_tick = parse_seconds(matches.value_of("t-tick"))?;
    let t_settle_min = parse_seconds(matches.value_of("t-settle-min"))?;
    let t_settle_max = parse_seconds(matches.value_of("t-settle-max"))?;

    Config::build(
        name, bind_addr, links, stubs, t_dead, t_tick, t_settle_min, t_settle_max,
    )
}

fn parse_seconds(value: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map(Some)
            .map_err(|e| ConfigError::InvalidNumber(raw.to_owned(), e)),
    }
}
