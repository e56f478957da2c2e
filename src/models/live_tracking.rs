// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geofence and live-tracking records.
//!
//! Neither feature is integrated with the service yet; the client only ever
//! produces placeholder values of these types.

use serde::{Deserialize, Serialize};

/// Geofence attached to a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub id: String,
    pub name: String,
    /// Fence type reported by the service (e.g. "circle", "polygon")
    pub fence_type: String,
    pub active: bool,
}

/// Live-tracking state for a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTrackingState {
    pub tracker_id: String,
    pub live_tracking_enabled: bool,
    /// Human-readable note on where the state came from
    pub message: String,
}

impl LiveTrackingState {
    /// State reported while the live-tracking query is not integrated.
    pub fn unavailable(tracker_id: &str) -> Self {
        Self {
            tracker_id: tracker_id.to_string(),
            live_tracking_enabled: false,
            message: "Live tracking state not available".to_string(),
        }
    }

    /// State reported by the placeholder toggle.
    pub fn placeholder_toggle(tracker_id: &str, enable: bool) -> Self {
        let verb = if enable { "enabled" } else { "disabled" };
        Self {
            tracker_id: tracker_id.to_string(),
            live_tracking_enabled: enable,
            message: format!("Live tracking {} (placeholder)", verb),
        }
    }
}
