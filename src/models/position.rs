// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Canonical position records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One position fix, independent of the upstream encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Fix time; `None` if upstream did not send a parseable one
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Speed as reported upstream
    pub speed: Option<f64>,
    /// Position uncertainty in meters (upstream `pos_uncertainty`)
    pub accuracy: f64,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Heading in degrees (history only)
    pub course: Option<f64>,
    /// Positioning sensor, e.g. "GPS" or "KNOWN_WIFI" (history only)
    pub sensor_used: Option<String>,
}

/// Latest position of a specific tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerPosition {
    pub tracker_id: String,
    #[serde(flatten)]
    pub position: PositionRecord,
}

/// Result of a latest-position fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LatestPosition {
    Available(TrackerPosition),
    NoData { error: String },
}

impl LatestPosition {
    pub const NO_DATA_MESSAGE: &'static str = "No position data available";

    /// Sentinel for a tracker with no reported position.
    pub fn no_data() -> Self {
        LatestPosition::NoData {
            error: Self::NO_DATA_MESSAGE.to_string(),
        }
    }

    /// The position, if one was reported.
    pub fn position(&self) -> Option<&TrackerPosition> {
        match self {
            LatestPosition::Available(p) => Some(p),
            LatestPosition::NoData { .. } => None,
        }
    }
}
