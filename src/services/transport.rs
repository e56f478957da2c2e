// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transport seam between the session adapter and the Tractive service.
//!
//! A [`Connector`] opens a [`TransportSession`] for one set of credentials.
//! The session performs authentication and the raw per-tracker fetches;
//! results come back as JSON values because their shape is not stable
//! across API versions. Normalization happens in the adapter, not here.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Errors raised by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request sent before authentication")]
    Unauthenticated,

    #[error("Transport session is closed")]
    Closed,
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// Credentials returned by the service's authentication endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthToken {
    pub user_id: String,
    pub access_token: String,
}

/// Query format for position history. Only the segmented form is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFormat {
    JsonSegments,
}

impl PositionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionFormat::JsonSegments => "json_segments",
        }
    }
}

/// Opens transport sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: TransportSession;

    /// Open a session for the given credentials. Does not authenticate.
    async fn open(&self, email: &str, password: &str) -> Result<Self::Session, TransportError>;
}

/// One open connection to the service.
#[async_trait]
pub trait TransportSession: Send + Sync {
    /// Authenticate with the credentials the session was opened with.
    async fn authenticate(&mut self) -> Result<AuthToken, TransportError>;

    /// IDs of all trackers on the account, in upstream order.
    async fn tracker_ids(&self) -> Result<Vec<String>, TransportError>;

    /// Tracker detail record (`_id`, `model_number`, `fw_version`, ...).
    async fn tracker_details(&self, tracker_id: &str) -> Result<Value, TransportError>;

    /// Hardware report (`battery_level`, `charging`, ...).
    async fn hw_info(&self, tracker_id: &str) -> Result<Value, TransportError>;

    /// Latest position report; `Value::Null` when the tracker has none.
    async fn pos_report(&self, tracker_id: &str) -> Result<Value, TransportError>;

    /// Position history for `[time_from, time_to]` (epoch seconds).
    async fn positions(
        &self,
        tracker_id: &str,
        time_from: i64,
        time_to: i64,
        format: PositionFormat,
    ) -> Result<Value, TransportError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), TransportError>;
}
