//! Context store configuration.

use serde::Deserialize;

/// Tuning knobs for the context store.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextConfig {
    /// Minutes of inactivity before a conversation is eligible for
    /// eviction. The window slides: any access refreshes it.
    #[serde(default = "default_idle_timeout_minutes")]
    pub idle_timeout_minutes: i64,

    /// Interval between background eviction sweeps, in seconds.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

fn default_idle_timeout_minutes() -> i64 {
    10
}

fn default_sweep_interval_seconds() -> u64 {
    300
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout_minutes(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let config = ContextConfig::default();
        assert_eq!(config.idle_timeout_minutes, 10);
        assert_eq!(config.sweep_interval_seconds, 300);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: ContextConfig =
            serde_json::from_str("{\"idle_timeout_minutes\": 2}").expect("deserialize");
        assert_eq!(config.idle_timeout_minutes, 2);
        assert_eq!(config.sweep_interval_seconds, 300);
    }
}
