//! # Runtime Configuration
//!
//! Router defaults overridden from the environment:
//!
//! | Variable             | Effect                                          |
//! |----------------------|-------------------------------------------------|
//! | `WR_MOCK_MODE`       | `true`/`false`, skip payload rehydration        |
//! | `WR_REPLAY_CAPACITY` | positive integer, or `unbounded`                |
//! | `WR_TOPOLOGY`        | path of the JSON topology file                  |
//! | `WR_LOG_LEVEL`       | `trace`, `debug`, `info`, `warn` or `error`     |

use std::path::PathBuf;

use tracing::Level;
use window_router::RouterConfig;

use crate::error::ConfigError;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Configuration shared by every window's router.
    pub router: RouterConfig,
    /// Topology file; the built-in demo topology is used when absent.
    pub topology: Option<PathBuf>,
    /// Maximum log level.
    pub log_level: Level,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            topology: None,
            log_level: Level::INFO,
        }
    }
}

impl RuntimeConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("WR_MOCK_MODE") {
            config.router.mock_mode = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid("WR_MOCK_MODE", value)),
            };
        }

        if let Some(value) = lookup("WR_REPLAY_CAPACITY") {
            config.router.replay_capacity = if value.trim().eq_ignore_ascii_case("unbounded") {
                None
            } else {
                let capacity = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("WR_REPLAY_CAPACITY", value.clone()))?;
                Some(capacity)
            };
        }

        if let Some(value) = lookup("WR_TOPOLOGY") {
            if !value.trim().is_empty() {
                config.topology = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = lookup("WR_LOG_LEVEL") {
            config.log_level = value
                .trim()
                .parse()
                .map_err(|_| invalid("WR_LOG_LEVEL", value.clone()))?;
        }

        config.router.validate()?;
        Ok(config)
    }
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { var, value }
}
