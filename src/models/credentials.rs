// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential and session records handed to the caller for persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a successful authentication. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Tractive user ID, exactly as returned by the service
    pub user_id: String,
    /// Bearer token, exactly as returned by the service
    pub access_token: String,
    /// Email used to log in
    pub email: String,
    /// When the authentication completed
    pub authenticated_at: DateTime<Utc>,
}

impl Credentials {
    /// Session data suitable for storing and later passing to
    /// `TrackerClient::restore_session`.
    pub fn session_data(&self) -> SessionData {
        SessionData {
            email: Some(self.email.clone()),
            user_id: Some(self.user_id.clone()),
            access_token: Some(self.access_token.clone()),
        }
    }
}

/// Previously stored session data. All fields optional since it comes back
/// from caller-side storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}
