use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use switchboard::boot::DEFAULT_REQUESTS;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Delay between chain requests, for human-readable pacing
    pub pacing: Duration,
    /// Software the boot chain is asked to start when none is given
    pub boot_requests: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pacing_ms: u64 = lookup("SWITCHBOARD_PACING_MS")
            .unwrap_or_else(|| "0".to_string())
            .trim()
            .parse()
            .context("SWITCHBOARD_PACING_MS must be a whole number of milliseconds")?;

        let boot_requests = match lookup("SWITCHBOARD_BOOT_REQUESTS") {
            Some(raw) => parse_requests(&raw),
            None => DEFAULT_REQUESTS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            pacing: Duration::from_millis(pacing_ms),
            boot_requests,
        })
    }
}

fn parse_requests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
