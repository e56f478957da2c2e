// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Canonical tracker and hardware-info records.

use serde::{Deserialize, Serialize};

/// Tracker as shown to the caller, merged from the upstream detail record and
/// a hardware-info fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerRecord {
    /// Tracker ID (upstream `_id`)
    pub id: String,
    /// Tracker display name
    pub name: String,
    /// Name of the pet wearing the tracker
    pub pet_name: String,
    /// Hardware model (upstream `model_number`)
    pub model: String,
    /// Firmware version (upstream `fw_version`)
    pub firmware: String,
    /// Battery percentage, 0 when unknown
    pub battery: u8,
    /// Whether the tracker is on the charger
    pub charging: bool,
    /// Time of the last position update
    pub last_seen: String,
}

/// Hardware information for one tracker: static fields from the cached
/// listing, volatile fields (`battery_level`, `charging`) freshly fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub tracker_id: String,
    pub battery_level: u8,
    pub firmware_version: String,
    pub model: String,
    pub capabilities: Vec<String>,
    pub hardware_id: String,
    pub charging: bool,
}
