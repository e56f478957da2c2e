// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Canonical records returned by the adapter.

pub mod credentials;
pub mod live_tracking;
pub mod position;
pub mod tracker;

pub use credentials::{Credentials, SessionData};
pub use live_tracking::{Geofence, LiveTrackingState};
pub use position::{LatestPosition, PositionRecord, TrackerPosition};
pub use tracker::{HardwareInfo, TrackerRecord};
