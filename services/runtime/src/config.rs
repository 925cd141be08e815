//! Configuration for the actor runtime.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::registry::{RegistryConfig, DEFAULT_MAILBOX_SIZE};

/// Actor runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the invocation endpoint listens on.
    pub listen_addr: SocketAddr,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Mailbox capacity of each actor instance.
    pub mailbox_size: usize,

    /// How long a caller waits for a method to complete. `None` waits forever.
    pub invoke_timeout: Option<Duration>,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_addr = lookup("KACTOR_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("KACTOR_LISTEN_ADDR must be a socket address")?;

        let log_level = lookup("KACTOR_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let mailbox_size = match lookup("KACTOR_MAILBOX_SIZE") {
            Some(v) => v
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| {
                    format!("KACTOR_MAILBOX_SIZE must be a positive integer, got {v:?}")
                })?,
            None => DEFAULT_MAILBOX_SIZE,
        };

        // Zero disables the timeout.
        let invoke_timeout = match lookup("KACTOR_INVOKE_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v.parse().with_context(|| {
                    format!("KACTOR_INVOKE_TIMEOUT_SECS must be an integer, got {v:?}")
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let shutdown_timeout = match lookup("KACTOR_SHUTDOWN_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().with_context(|| {
                format!("KACTOR_SHUTDOWN_TIMEOUT_SECS must be an integer, got {v:?}")
            })?),
            None => Duration::from_secs(10),
        };

        Ok(Self {
            listen_addr,
            log_level,
            mailbox_size,
            invoke_timeout,
            shutdown_timeout,
        })
    }

    /// Registry settings derived from this configuration.
    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            mailbox_size: self.mailbox_size,
        }
    }
}
