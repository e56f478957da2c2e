// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalization of upstream Tractive payloads into canonical records.
//!
//! The service returns tracker and position data in several shapes:
//! position fixes may be JSON objects keyed by field name or positional
//! arrays, history may be wrapped in an object under varying keys, and any
//! field may be missing. Everything here works on `serde_json::Value` and
//! never fails on an unexpected shape; it substitutes defaults or skips the
//! offending record.

use crate::models::{HardwareInfo, PositionRecord, TrackerRecord};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Maximum number of history records returned per query.
pub const MAX_HISTORY_RECORDS: usize = 100;

/// Wrapper keys tried, in order, when history comes back as an object.
pub const HISTORY_WRAPPER_KEYS: [&str; 3] = ["positions", "segments", "data"];

/// Positional records need at least timestamp, latitude and longitude.
const MIN_SEQUENCE_LEN: usize = 3;

const UNKNOWN: &str = "Unknown";

// ─────────────────────────────────────────────────────────────────────────────
// Value helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Short name of a JSON value's type, for log fields.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Null, or an empty string, array or object.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Upstream time: epoch seconds (integer, fractional or numeric string) or
/// an RFC3339 string. Sub-second parts are kept.
fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => n.as_f64().and_then(from_fractional_epoch),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                DateTime::from_timestamp(secs, 0)
            } else if let Ok(secs) = s.parse::<f64>() {
                from_fractional_epoch(secs)
            } else {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
        _ => None,
    }
}

fn from_fractional_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Scalar rendered as text; `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalar field rendered as text, or `default` if missing or null.
fn text_field(obj: Option<&Map<String, Value>>, key: &str, default: &str) -> String {
    obj.and_then(|m| m.get(key))
        .and_then(scalar_text)
        .unwrap_or_else(|| default.to_string())
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(as_number)
}

// ─────────────────────────────────────────────────────────────────────────────
// Trackers
// ─────────────────────────────────────────────────────────────────────────────

/// Volatile hardware state merged into each tracker detail record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HwStatus {
    pub battery_level: u8,
    pub charging: bool,
}

impl HwStatus {
    /// Read `battery_level` (clamped to 0-100) and `charging` from a
    /// hardware report, defaulting each independently.
    pub fn from_report(report: &Value) -> Self {
        let battery_level = report
            .get("battery_level")
            .and_then(as_number)
            .map(|b| b.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(0);
        let charging = report
            .get("charging")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self {
            battery_level,
            charging,
        }
    }
}

/// Upstream `_id` of a tracker detail record.
pub fn tracker_id_of(details: &Value) -> Option<&str> {
    details.get("_id").and_then(Value::as_str)
}

/// Write hardware state into a detail record so the cached listing carries
/// it. Non-object details are replaced by an object holding only the state.
pub fn merge_hw_status(details: &mut Value, hw: HwStatus) {
    if !details.is_object() {
        *details = Value::Object(Map::new());
    }
    if let Value::Object(map) = details {
        map.insert("battery_level".to_string(), Value::from(hw.battery_level));
        map.insert("charging".to_string(), Value::from(hw.charging));
    }
}

/// Render a merged detail record as a canonical tracker.
pub fn tracker_record(details: &Value) -> TrackerRecord {
    let obj = details.as_object();
    let hw = HwStatus::from_report(details);

    TrackerRecord {
        id: text_field(obj, "_id", UNKNOWN),
        name: text_field(obj, "name", "Unnamed"),
        pet_name: text_field(obj, "pet_name", "Unknown Pet"),
        model: text_field(obj, "model_number", "Unknown Model"),
        firmware: text_field(obj, "fw_version", UNKNOWN),
        battery: hw.battery_level,
        charging: hw.charging,
        last_seen: last_seen(details.get("time_of_last_position_update")),
    }
}

/// Epoch seconds are rendered as RFC3339; strings pass through.
fn last_seen(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ Value::Number(_)) => as_timestamp(v)
            .map(format_utc_rfc3339)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        _ => UNKNOWN.to_string(),
    }
}

/// Combine cached static fields with a fresh hardware report.
pub fn hardware_info(tracker_id: &str, cached: &Value, report: &Value) -> HardwareInfo {
    let obj = cached.as_object();
    let hw = HwStatus::from_report(report);

    let capabilities = cached
        .get("capabilities")
        .and_then(Value::as_array)
        .map(|caps| {
            caps.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    HardwareInfo {
        tracker_id: tracker_id.to_string(),
        battery_level: hw.battery_level,
        firmware_version: text_field(obj, "fw_version", UNKNOWN),
        model: text_field(obj, "model_number", UNKNOWN),
        capabilities,
        hardware_id: text_field(obj, "hw_id", UNKNOWN),
        charging: hw.charging,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Positions
// ─────────────────────────────────────────────────────────────────────────────

/// Upstream position record, classified by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPosition<'a> {
    /// `{"time": .., "latlong": [lat, lon], "speed": .., ...}`
    Mapping(&'a Map<String, Value>),
    /// `[time, lat, lon, speed?, accuracy?]`
    Sequence(&'a [Value]),
    Unrecognized,
}

impl<'a> RawPosition<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => RawPosition::Mapping(map),
            Value::Array(items) if items.len() >= MIN_SEQUENCE_LEN => {
                RawPosition::Sequence(items)
            }
            _ => RawPosition::Unrecognized,
        }
    }

    /// Canonical history record, or `None` for unrecognized shapes.
    pub fn to_history_record(self) -> Option<PositionRecord> {
        match self {
            RawPosition::Mapping(map) => Some(PositionRecord {
                speed: number_field(map, "speed"),
                course: number_field(map, "course"),
                sensor_used: map.get("sensor_used").and_then(scalar_text),
                ..mapped_position(map)
            }),
            RawPosition::Sequence(items) => {
                let at = |i: usize| items.get(i).and_then(as_number);
                Some(PositionRecord {
                    timestamp: items.first().and_then(as_timestamp),
                    latitude: at(1),
                    longitude: at(2),
                    speed: at(3),
                    accuracy: at(4).unwrap_or(0.0),
                    altitude: None,
                    course: None,
                    sensor_used: None,
                })
            }
            RawPosition::Unrecognized => None,
        }
    }
}

/// Fields shared by latest-position and history mapping records.
fn mapped_position(map: &Map<String, Value>) -> PositionRecord {
    let latlong = map.get("latlong").and_then(Value::as_array);
    let coord = |i: usize| latlong.and_then(|pair| pair.get(i)).and_then(as_number);

    PositionRecord {
        timestamp: map.get("time").and_then(as_timestamp),
        latitude: coord(0),
        longitude: coord(1),
        speed: None,
        accuracy: number_field(map, "pos_uncertainty").unwrap_or(0.0),
        altitude: number_field(map, "altitude").or_else(|| number_field(map, "alt")),
        course: None,
        sensor_used: None,
    }
}

/// Normalize a latest-position report.
///
/// Returns `Ok(None)` when the tracker has no position data, and an error
/// message when the report is not an object.
pub fn latest_position(report: &Value) -> Result<Option<PositionRecord>, String> {
    if is_blank(report) {
        return Ok(None);
    }

    let map = report
        .as_object()
        .ok_or_else(|| format!("Unexpected position report format: {}", json_kind(report)))?;

    Ok(Some(PositionRecord {
        speed: Some(number_field(map, "speed").unwrap_or(0.0)),
        ..mapped_position(map)
    }))
}

/// Locate the record sequence inside a history response.
///
/// Object responses are unwrapped through [`HISTORY_WRAPPER_KEYS`]; the
/// first key holding a non-empty value wins. Anything that is not a sequence
/// after unwrapping yields `None`.
pub fn history_records(raw: &Value) -> Option<&[Value]> {
    if is_blank(raw) {
        return None;
    }

    let unwrapped = match raw {
        Value::Object(map) => HISTORY_WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !is_blank(v)))?,
        other => other,
    };

    match unwrapped {
        Value::Array(items) => Some(items),
        other => {
            tracing::warn!(kind = json_kind(other), "Unexpected positions format");
            None
        }
    }
}

/// Normalize a position history response.
///
/// At most [`MAX_HISTORY_RECORDS`] upstream records are considered, in
/// upstream order. Records of unrecognized shape are skipped with a warning.
pub fn position_history(raw: &Value) -> Vec<PositionRecord> {
    let Some(records) = history_records(raw) else {
        return Vec::new();
    };

    records
        .iter()
        .take(MAX_HISTORY_RECORDS)
        .enumerate()
        .filter_map(|(index, value)| {
            let record = RawPosition::classify(value).to_history_record();
            if record.is_none() {
                tracing::warn!(
                    index,
                    kind = json_kind(value),
                    "Skipping unexpected position format"
                );
            }
            record
        })
        .collect()
}
