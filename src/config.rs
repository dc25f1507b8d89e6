use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::{PoolError, Result};

/// Default cook time per order.
pub const DEFAULT_PROCESSING_TIME_MS: u64 = 10_000;

const ENV_PROCESSING_MS: &str = "KITCHEN_PROCESSING_MS";
const ENV_INITIAL_BOTS: &str = "KITCHEN_INITIAL_BOTS";

/// Kitchen settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Time every bot spends on every order, in milliseconds
    pub processing_time_ms: u64,
    /// Bots created when the kitchen opens
    pub initial_bots: usize,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            processing_time_ms: DEFAULT_PROCESSING_TIME_MS,
            initial_bots: 0,
        }
    }
}

impl KitchenConfig {
    /// Defaults overridden by `KITCHEN_PROCESSING_MS` and `KITCHEN_INITIAL_BOTS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default = Self::default();
        Ok(Self {
            processing_time_ms: parse_var(&lookup, ENV_PROCESSING_MS)?
                .unwrap_or(default.processing_time_ms),
            initial_bots: parse_var(&lookup, ENV_INITIAL_BOTS)?.unwrap_or(default.initial_bots),
        })
    }

    /// Only whole milliseconds are kept; anything finer is rounded down and
    /// durations past `u64::MAX` ms saturate.
    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time_ms = u64::try_from(processing_time.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_initial_bots(mut self, initial_bots: usize) -> Self {
        self.initial_bots = initial_bots;
        self
    }

    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(PoolError::Config {
                key: key.to_string(),
                value,
            }),
        },
    }
}
