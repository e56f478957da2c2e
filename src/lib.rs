// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tractive adapter: session handling and response normalization for the
//! Tractive pet-tracking service.
//!
//! This crate authenticates against the service, fetches tracker and
//! position data through a pluggable transport, and reshapes the service's
//! inconsistent payloads into stable canonical records.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod time_utils;

pub use error::{AdapterError, Result};
pub use services::{TractiveConnector, TrackerClient};
