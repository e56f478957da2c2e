// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session adapter, normalization and transports.

pub mod client;
pub mod normalize;
pub mod tractive;
pub mod transport;

pub use client::TrackerClient;
pub use tractive::{TractiveConnector, TractiveSession};
pub use transport::{AuthToken, Connector, PositionFormat, TransportError, TransportSession};
