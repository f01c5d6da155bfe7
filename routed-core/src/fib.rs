//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! FIB installation as an abstracted side effect, so the reconciliation
//! loop can be driven in tests without touching the host routing table.

use std::net::IpAddr;
use std::process::Command;

use tracing::error;

use crate::error::Error;
use crate::types::Prefix;

/// Idempotent "replace route to prefix via next-hop" side effect.
/// Implementations must tolerate repeated calls with the same arguments
/// producing the same resulting state.
pub trait FibInstaller: Send + Sync {
    fn install(&self, prefix: &Prefix, next_hop: IpAddr) -> Result<(), Error>;

    /// Best-effort probe of the current FIB size, logged once per tick.
    /// Implementations that can't cheaply answer this may return `None`.
    fn table_size(&self) -> Option<usize> {
        None
    }
}

/// Production installer: shells out to the host's `ip route replace`.
#[derive(Debug, Default)]
pub struct ShellFibInstaller;

impl FibInstaller for ShellFibInstaller {
    fn install(&self, prefix: &Prefix, next_hop: IpAddr) -> Result<(), Error> {
        let cmd = format!("ip route replace {prefix} via {next_hop}");
        let output = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .output()
            .map_err(|e| {
                Error::FibInstallFailed(
                    prefix.clone(),
                    std::net::SocketAddr::new(next_hop, 0),
                    e.to_string(),
                )
            })?;
        if !output.status.success() {
            let reason = String::from_utf8_lossy(&output.stderr)
                .trim()
                .to_owned();
            let err = Error::FibInstallFailed(
                prefix.clone(),
                std::net::SocketAddr::new(next_hop, 0),
                reason,
            );
            err.log();
            return Err(err);
        }
        Ok(())
    }

    fn table_size(&self) -> Option<usize> {
        let output = Command::new("sh")
            .arg("-c")
            .arg("ip route | wc -l")
            .output()
            .ok()?;
        if !output.status.success() {
            error!("failed to probe routing table size");
            return None;
        }
        String::from_utf8_lossy(&output.stdout).trim().parse().ok()
    }
}

/// Test double that records every call instead of touching the kernel.
#[derive(Debug, Default)]
pub struct RecordingFibInstaller {
    pub installed: std::sync::Mutex<Vec<(Prefix, IpAddr)>>,
}

impl FibInstaller for RecordingFibInstaller {
    fn install(&self, prefix: &Prefix, next_hop: IpAddr) -> Result<(), Error> {
        self.installed
            .lock()
            .expect("recording installer lock poisoned")
            .push((prefix.clone(), next_hop));
        Ok(())
    }

    fn table_size(&self) -> Option<usize> {
        Some(
            self.installed
                .lock()
                .expect("recording installer lock poisoned")
                .len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_installer_is_idempotent_in_effect() {
        let installer = RecordingFibInstaller::default();
        let prefix = Prefix::new("10.0.1.0/24");
        let next_hop: IpAddr = "10.0.0.2".parse().unwrap();
        installer.install(&prefix, next_hop).unwrap();
        installer.install(&prefix, next_hop).unwrap();
        assert_eq!(installer.installed.lock().unwrap().len(), 2);
        assert_eq!(installer.table_size(), Some(2));
    }
}
