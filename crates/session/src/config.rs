//! Session configuration
//!
//! Read from environment variables, falling back to defaults for anything missing or
//! unparseable:
//!
//! - `COLOR_MATCH_SEED`: deck seed (default: derived from the wall clock)
//! - `COLOR_MATCH_RESOLVE_DELAY_MS`: pair resolve delay (default: 500)
//! - `COLOR_MATCH_LOG_PATH`: append-only JSONL event log (default: disabled)

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::RESOLVE_DELAY_MS;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    pub resolve_delay_ms: u32,
    pub log_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            resolve_delay_ms: RESOLVE_DELAY_MS,
            log_path: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (environment, test fixtures)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("COLOR_MATCH_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let resolve_delay_ms = lookup("COLOR_MATCH_RESOLVE_DELAY_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(RESOLVE_DELAY_MS);

        let log_path = lookup("COLOR_MATCH_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            seed,
            resolve_delay_ms,
            log_path,
        }
    }

    pub fn resolve_delay(&self) -> Duration {
        Duration::from_millis(self.resolve_delay_ms as u64)
    }
}

/// Seed from the sub-second part of the wall clock.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
