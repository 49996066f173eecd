// ABOUTME: Configuration module for the stepdeck application
// ABOUTME: Provides viewer settings with environment variable and CLI overrides

use crate::errors::{DeckError, Result};
use std::env;

const DEFAULT_HINT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_CLICK_SPLIT: f32 = 0.3;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_TICK_MS: u64 = 100;

/// Global configuration for the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How long the startup hint banner stays up; 0 disables it
    pub hint_timeout_ms: u64,
    /// Fraction of the width that counts as "go back" for clicks
    pub click_split: f32,
    /// Debounce time for deck file events in watch mode
    pub debounce_ms: u64,
    /// Event poll interval of the viewer loop
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hint_timeout_ms: DEFAULT_HINT_TIMEOUT_MS,
            click_split: DEFAULT_CLICK_SPLIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let click_split = lookup("STEPDECK_CLICK_SPLIT")
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|split| valid_split(*split))
            .unwrap_or(DEFAULT_CLICK_SPLIT);

        Self {
            hint_timeout_ms: parse_u64("STEPDECK_HINT_TIMEOUT_MS", DEFAULT_HINT_TIMEOUT_MS),
            click_split,
            debounce_ms: parse_u64("STEPDECK_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS),
            tick_ms: parse_u64("STEPDECK_TICK_MS", DEFAULT_TICK_MS).max(1),
        }
    }

    /// Apply command line overrides on top of this config
    pub fn with_overrides(mut self, click_split: Option<f32>, no_hints: bool) -> Result<Self> {
        if let Some(split) = click_split {
            if !valid_split(split) {
                return Err(DeckError::ConfigError(format!(
                    "click split must be between 0 and 1, got {}",
                    split
                )));
            }
            self.click_split = split;
        }
        if no_hints {
            self.hint_timeout_ms = 0;
        }
        Ok(self)
    }

    pub fn hints_enabled(&self) -> bool {
        self.hint_timeout_ms > 0
    }
}

fn valid_split(split: f32) -> bool {
    split > 0.0 && split < 1.0
}
