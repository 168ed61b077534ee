//! Router configuration and validation.
//!
//! # Example
//!
//! ```ignore
//! use window_router::RouterConfig;
//!
//! let config = RouterConfig::default()
//!     .with_mock_mode(true)
//!     .with_replay_capacity(Some(10_000));
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::MOCK_DOMAIN_PREFIX;

/// Router configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Skip payload rehydration before dispatch.
    pub mock_mode: bool,
    /// Maximum message ids remembered by the replay guard (`None` = unbounded).
    pub replay_capacity: Option<usize>,
    /// Scheme of synthetic domains accepted verbatim as origins.
    pub mock_domain_prefix: String,
    /// Message names belonging to the messaging protocol itself. Logged at debug.
    pub internal_names: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            replay_capacity: Some(100_000),
            mock_domain_prefix: MOCK_DOMAIN_PREFIX.to_string(),
            internal_names: vec![
                "postrobot_method".to_string(),
                "postrobot_hello".to_string(),
                "postrobot_open_tunnel".to_string(),
            ],
        }
    }
}

impl RouterConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replay_capacity == Some(0) {
            return Err(ConfigError::ZeroReplayCapacity);
        }

        if self.mock_domain_prefix.is_empty() {
            return Err(ConfigError::EmptyMockPrefix);
        }

        Ok(())
    }

    /// Builder-style method to toggle mock mode
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// Builder-style method to set the replay capacity
    pub fn with_replay_capacity(mut self, capacity: Option<usize>) -> Self {
        self.replay_capacity = capacity;
        self
    }

    /// Builder-style method to replace the internal message names
    pub fn with_internal_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.internal_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `name` is one of the protocol's own message names.
    pub fn is_internal_name(&self, name: &str) -> bool {
        self.internal_names.iter().any(|n| n == name)
    }
}
