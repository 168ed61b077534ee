//! Runtime error types.

use shared_types::WindowId;
use thiserror::Error;

/// Errors building a window graph from a topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Topology could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Window {0} is declared more than once")]
    DuplicateWindow(WindowId),

    #[error("Window {window} names unknown {relation} {target}")]
    UnknownRelation {
        window: WindowId,
        relation: &'static str,
        target: WindowId,
    },

    #[error("Topology declares no windows")]
    Empty,
}

/// Errors feeding the event loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),

    #[error("Event queue is closed")]
    QueueClosed,
}

/// Errors loading runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error(transparent)]
    Router(#[from] window_router::ConfigError),
}
