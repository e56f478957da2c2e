// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session adapter for the Tractive service.
//!
//! `TrackerClient` owns at most one authenticated transport session and turns
//! raw transport results into canonical records. Operations run one after
//! another; the tracker listing cache is replaced wholesale by each
//! `list_trackers` call and is not safe to share between concurrent callers.
//!
//! Tolerated partial failures:
//! - hardware-info enrichment during listing (defaults substituted)
//! - unrecognized individual history records (skipped)
//! - geofence and live-tracking placeholders (always succeed)
//!
//! Everything else is wrapped into the matching [`AdapterError`] kind.

use crate::config::{Config, DEFAULT_HISTORY_HOURS};
use crate::error::{AdapterError, Result};
use crate::models::{
    Credentials, Geofence, HardwareInfo, LatestPosition, LiveTrackingState, PositionRecord,
    SessionData, TrackerPosition, TrackerRecord,
};
use crate::services::normalize::{self, HwStatus};
use crate::services::tractive::TractiveConnector;
use crate::services::transport::{Connector, PositionFormat, TransportSession};
use crate::time_utils::HistoryWindow;
use chrono::Utc;
use serde_json::Value;

/// Adapter holding one Tractive session.
pub struct TrackerClient<C: Connector> {
    connector: C,
    session: Option<C::Session>,
    user_id: Option<String>,
    access_token: Option<String>,
    /// Merged detail records from the last listing, keyed by `_id`
    trackers: Option<Vec<Value>>,
    history_hours: u32,
}

impl<C: Connector> TrackerClient<C> {
    /// Create an unauthenticated client.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: None,
            user_id: None,
            access_token: None,
            trackers: None,
            history_hours: DEFAULT_HISTORY_HOURS,
        }
    }

    /// Create an unauthenticated client using the configured history window.
    pub fn from_config(connector: C, config: &Config) -> Self {
        Self::new(connector).with_history_hours(config.history_hours)
    }

    /// Override the window used by [`Self::get_position_history`].
    pub fn with_history_hours(mut self, hours: u32) -> Self {
        self.history_hours = hours;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Live session, or `NotAuthenticated`. Checked before any network call.
    fn session(&self) -> Result<&C::Session> {
        self.session.as_ref().ok_or(AdapterError::NotAuthenticated)
    }

    fn cached_tracker(&self, tracker_id: &str) -> Option<&Value> {
        self.trackers
            .iter()
            .flatten()
            .find(|details| normalize::tracker_id_of(details) == Some(tracker_id))
    }

    // ─── Session Lifecycle ───────────────────────────────────────────────────

    /// Open a session and authenticate.
    ///
    /// On success the session stays live for subsequent calls. On failure the
    /// newly opened session is released and the client is left without one.
    /// A session that was already live is closed first.
    pub async fn authenticate(&mut self, email: &str, password: &str) -> Result<Credentials> {
        if self.session.is_some() {
            self.close().await;
        }

        let mut session = self.connector.open(email, password).await.map_err(|e| {
            tracing::error!(email, error = %e, "Authentication failed");
            AdapterError::Authentication(e.to_string())
        })?;

        let token = match session.authenticate().await {
            Ok(token) if token.user_id.is_empty() || token.access_token.is_empty() => {
                Err("Response missing user_id or access_token".to_string())
            }
            Ok(token) => Ok(token),
            Err(e) => Err(e.to_string()),
        };

        let token = match token {
            Ok(token) => token,
            Err(msg) => {
                tracing::error!(email, error = %msg, "Authentication failed");
                if let Err(e) = session.close().await {
                    tracing::warn!(error = %e, "Failed to release session after failed login");
                }
                return Err(AdapterError::Authentication(msg));
            }
        };

        self.session = Some(session);
        self.user_id = Some(token.user_id.clone());
        self.access_token = Some(token.access_token.clone());
        self.trackers = None;

        tracing::info!(email, user_id = %token.user_id, "Successfully authenticated user");

        Ok(Credentials {
            user_id: token.user_id,
            access_token: token.access_token,
            email: email.to_string(),
            authenticated_at: Utc::now(),
        })
    }

    /// Check stored session data before re-authentication.
    ///
    /// Token reuse is not supported: this only validates that the data names
    /// an account, and the caller must still call [`Self::authenticate`].
    pub async fn restore_session(&self, session_data: &SessionData) -> Result<()> {
        let email = session_data
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("Session restoration failed: no email in session data");
                AdapterError::Session("No email in session data".to_string())
            })?;

        tracing::info!(email, "Session restoration attempted");
        Ok(())
    }

    /// Release the session, if any.
    ///
    /// Release failures are logged, never returned; the session and all
    /// per-session state are cleared regardless. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                tracing::error!(error = %e, "Error closing Tractive session");
            }
        }
        self.user_id = None;
        self.access_token = None;
        self.trackers = None;
    }

    // ─── Trackers ────────────────────────────────────────────────────────────

    /// List all trackers, enriched with battery and charging state.
    ///
    /// A failed hardware-info fetch for one tracker is logged and replaced by
    /// defaults (battery 0, not charging); the tracker is still listed. The
    /// merged details are cached for [`Self::get_hardware_info`].
    pub async fn list_trackers(&mut self) -> Result<Vec<TrackerRecord>> {
        let session = self.session()?;

        let wrap = |e: &dyn std::fmt::Display| {
            tracing::error!(error = %e, "Failed to get trackers");
            AdapterError::TrackerList(e.to_string())
        };

        let tracker_ids = session.tracker_ids().await.map_err(|e| wrap(&e))?;

        let mut merged = Vec::with_capacity(tracker_ids.len());
        for tracker_id in &tracker_ids {
            let mut details = session
                .tracker_details(tracker_id)
                .await
                .map_err(|e| wrap(&e))?;

            let hw = match session.hw_info(tracker_id).await {
                Ok(report) => HwStatus::from_report(&report),
                Err(e) => {
                    tracing::warn!(
                        tracker_id = %tracker_id,
                        error = %e,
                        "Failed to get hw_info for tracker, using defaults"
                    );
                    HwStatus::default()
                }
            };

            normalize::merge_hw_status(&mut details, hw);
            merged.push(details);
        }

        let records: Vec<TrackerRecord> = merged.iter().map(normalize::tracker_record).collect();
        tracing::info!(count = records.len(), "Trackers listed");

        self.trackers = Some(merged);
        Ok(records)
    }

    /// Hardware info for a tracker from the last listing, with freshly
    /// fetched battery and charging state.
    pub async fn get_hardware_info(&self, tracker_id: &str) -> Result<HardwareInfo> {
        let session = self.session()?;
        let cached = self.cached_tracker(tracker_id).ok_or_else(|| {
            tracing::error!(tracker_id, "Tracker not in cached listing");
            AdapterError::NotFound(tracker_id.to_string())
        })?;

        let report = session.hw_info(tracker_id).await.map_err(|e| {
            tracing::error!(tracker_id, error = %e, "Failed to get hardware info");
            AdapterError::HardwareInfo(e.to_string())
        })?;

        Ok(normalize::hardware_info(tracker_id, cached, &report))
    }

    // ─── Positions ───────────────────────────────────────────────────────────

    /// Latest position of a tracker, or [`LatestPosition::NoData`].
    pub async fn get_latest_position(&self, tracker_id: &str) -> Result<LatestPosition> {
        let session = self.session()?;

        let wrap = |msg: String| {
            tracing::error!(tracker_id, error = %msg, "Failed to get position");
            AdapterError::Position(msg)
        };

        let report = session
            .pos_report(tracker_id)
            .await
            .map_err(|e| wrap(e.to_string()))?;

        let position = match normalize::latest_position(&report).map_err(wrap)? {
            Some(position) => position,
            None => {
                tracing::debug!(tracker_id, "No position data available");
                return Ok(LatestPosition::no_data());
            }
        };

        Ok(LatestPosition::Available(TrackerPosition {
            tracker_id: tracker_id.to_string(),
            position,
        }))
    }

    /// Position history over the client's default window.
    pub async fn get_position_history(&self, tracker_id: &str) -> Result<Vec<PositionRecord>> {
        self.get_position_history_hours(tracker_id, self.history_hours)
            .await
    }

    /// Position history for `[now - hours, now]`, oldest first as returned
    /// upstream, capped at 100 records.
    pub async fn get_position_history_hours(
        &self,
        tracker_id: &str,
        hours: u32,
    ) -> Result<Vec<PositionRecord>> {
        let session = self.session()?;
        let window = HistoryWindow::last_hours(hours);

        let raw = session
            .positions(
                tracker_id,
                window.time_from,
                window.time_to,
                PositionFormat::JsonSegments,
            )
            .await
            .map_err(|e| {
                tracing::error!(tracker_id, error = %e, "Failed to get position history");
                AdapterError::PositionHistory(e.to_string())
            })?;

        let positions = normalize::position_history(&raw);
        tracing::debug!(tracker_id, hours, count = positions.len(), "Position history");
        Ok(positions)
    }

    // ─── Placeholders ────────────────────────────────────────────────────────
    //
    // Provisional: geofences and live tracking have no upstream integration
    // yet. These still require a live session but otherwise always succeed.

    /// Geofences for a tracker. Always empty for now.
    pub async fn get_geofences(&self, tracker_id: &str) -> Result<Vec<Geofence>> {
        self.session()?;
        tracing::debug!(tracker_id, "Geofences not integrated, returning none");
        Ok(Vec::new())
    }

    /// Live-tracking state. Always reports disabled for now.
    pub async fn get_live_tracking_state(&self, tracker_id: &str) -> Result<LiveTrackingState> {
        self.session()?;
        Ok(LiveTrackingState::unavailable(tracker_id))
    }

    /// Toggle live tracking. Echoes the requested state without contacting
    /// the service.
    pub async fn toggle_live_tracking(
        &self,
        tracker_id: &str,
        enable: bool,
    ) -> Result<LiveTrackingState> {
        self.session()?;
        tracing::debug!(tracker_id, enable, "Live tracking toggle is a placeholder");
        Ok(LiveTrackingState::placeholder_toggle(tracker_id, enable))
    }
}

impl TrackerClient<TractiveConnector> {
    /// HTTP-backed client configured from the environment.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let connector = TractiveConnector::new(&config)?;
        Ok(Self::from_config(connector, &config))
    }
}
