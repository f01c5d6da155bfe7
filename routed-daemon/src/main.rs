//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

mod config;

use std::sync::Arc;

use routed_core::fib::ShellFibInstaller;
use routed_core::instance::Instance;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive("routed=info".parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    init_tracing();

    let config = match config::parse() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("invalid configuration: {error}");
            std::process::exit(1);
        }
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create async runtime")
        .block_on(async move {
            info!(name = %config.name, protocol_port = config.protocol_port, control_port = config.control_port, "starting up");

            let fib = Arc::new(ShellFibInstaller);
            let instance = match Instance::new(config, fib).await {
                Ok(instance) => Arc::new(instance),
                Err(error) => {
                    error.log();
                    error!("failed to start instance");
                    std::process::exit(1);
                }
            };
            instance.run().await;
        });
}
