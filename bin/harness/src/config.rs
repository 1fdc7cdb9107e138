//! Harness configuration.
//!
//! Loaded from environment variables via the `config` crate, e.g.
//! `CONTEXT__IDLE_TIMEOUT_MINUTES=2 lectern-harness`.

use lectern_context::ContextConfig;
use serde::Deserialize;

/// Configuration for the text harness.
#[derive(Debug, Default, Deserialize)]
pub struct HarnessConfig {
    /// Context store configuration.
    #[serde(default)]
    pub context: ContextConfig,
}

impl HarnessConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a supplied value fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
