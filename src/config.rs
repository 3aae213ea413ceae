use serde::Deserialize;
use tracing::warn;

use crate::session::error::{Result, SessionError};

pub const ENV_LOG: &str = "AUDIO_SESSION_BRIDGE_LOG";
pub const ENV_STAND_IN: &str = "AUDIO_SESSION_BRIDGE_STAND_IN";
pub const ENV_DETAIL: &str = "AUDIO_SESSION_BRIDGE_DETAIL";
pub const ENV_POLL_MS: &str = "AUDIO_SESSION_BRIDGE_POLL_MS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// tracing EnvFilter directive
    pub log_filter: String,
    /// Use the stand-in session even where AVAudioSession exists
    pub force_stand_in: bool,
    /// Whether the demo starts with the detailed snapshot
    pub detail_by_default: bool,
    /// Demo re-read interval ("frame" tick)
    pub poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            force_stand_in: false,
            detail_by_default: false,
            poll_interval_ms: 16, // ~60 fps
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl BridgeConfig {
    /// Defaults overridden by `AUDIO_SESSION_BRIDGE_*` variables.
    /// Values that do not parse are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }

        if let Some(value) = lookup(ENV_STAND_IN) {
            match parse_flag(&value) {
                Some(flag) => config.force_stand_in = flag,
                None => warn!("Ignoring {}={}: expected a boolean", ENV_STAND_IN, value),
            }
        }

        if let Some(value) = lookup(ENV_DETAIL) {
            match parse_flag(&value) {
                Some(flag) => config.detail_by_default = flag,
                None => warn!("Ignoring {}={}: expected a boolean", ENV_DETAIL, value),
            }
        }

        if let Some(value) = lookup(ENV_POLL_MS) {
            match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval_ms = ms,
                _ => warn!(
                    "Ignoring {}={}: expected a positive integer",
                    ENV_POLL_MS, value
                ),
            }
        }

        config
    }

    /// Parses a JSON object; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(SessionError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_lookup_overrides() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (ENV_LOG, "debug"),
            (ENV_STAND_IN, "yes"),
            (ENV_POLL_MS, "33"),
        ]));
        assert_eq!(config.log_filter, "debug");
        assert!(config.force_stand_in);
        assert!(!config.detail_by_default);
        assert_eq!(config.poll_interval_ms, 33);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (ENV_STAND_IN, "maybe"),
            (ENV_POLL_MS, "0"),
        ]));
        assert_eq!(config, BridgeConfig::default());
    }
}
