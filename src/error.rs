// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapter error types.
//!
//! Every public operation fails with one of these kinds. Transport failures
//! never leak out raw; they are wrapped at the operation boundary with the
//! original message embedded.

use crate::config::ConfigError;
use crate::services::transport::TransportError;

/// Adapter error type.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Session restoration failed: {0}")]
    Session(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Tracker {0} not found")]
    NotFound(String),

    #[error("Failed to get trackers: {0}")]
    TrackerList(String),

    #[error("Failed to get hardware info: {0}")]
    HardwareInfo(String),

    #[error("Failed to get position: {0}")]
    Position(String),

    #[error("Failed to get position history: {0}")]
    PositionHistory(String),

    #[error("Tractive API error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AdapterError {
    /// True if the operation was rejected because no session is live.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, AdapterError::NotAuthenticated)
    }

    /// True if the referenced tracker is missing from the cached listing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::NotFound(_))
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
