// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scripted in-memory transport for integration tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tractive_adapter::services::{
    AuthToken, Connector, PositionFormat, TransportError, TransportSession,
};
use tractive_adapter::TrackerClient;

pub const TEST_EMAIL: &str = "owner@example.com";
pub const TEST_PASSWORD: &str = "hunter2";
pub const TEST_USER_ID: &str = "5f1a0c9e8b7d6a5c4b3a2910";
pub const TEST_TOKEN: &str = "token-abc-123";

/// Recorded history query.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub tracker_id: String,
    pub time_from: i64,
    pub time_to: i64,
    pub format: PositionFormat,
}

/// What the mock service answers, plus what it observed.
#[allow(dead_code)]
pub struct MockState {
    pub auth: Result<AuthToken, String>,
    pub open_error: Option<String>,
    pub listing_error: Option<String>,
    /// Trackers in listing order: (id, details)
    pub trackers: Vec<(String, Value)>,
    /// Hardware reports; a missing entry answers with an error
    pub hw: HashMap<String, Value>,
    pub positions: HashMap<String, Value>,
    pub position_error: Option<String>,
    pub history: Value,
    pub history_error: Option<String>,
    pub close_error: Option<String>,

    /// Number of transport calls other than open/close
    pub requests: usize,
    pub closes: usize,
    pub history_queries: Vec<HistoryQuery>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            auth: Ok(AuthToken {
                user_id: TEST_USER_ID.to_string(),
                access_token: TEST_TOKEN.to_string(),
            }),
            open_error: None,
            listing_error: None,
            trackers: Vec::new(),
            hw: HashMap::new(),
            positions: HashMap::new(),
            position_error: None,
            history: Value::Null,
            history_error: None,
            close_error: None,
            requests: 0,
            closes: 0,
            history_queries: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Register a tracker with details and an optional hardware report.
    pub fn with_tracker(self, id: &str, pet_name: &str, hw: Option<Value>) -> Self {
        {
            let mut state = self.state();
            state.trackers.push((
                id.to_string(),
                json!({
                    "_id": id,
                    "name": format!("{} collar", pet_name),
                    "pet_name": pet_name,
                    "model_number": "TG4XL",
                    "fw_version": "5.3.1",
                    "hw_id": format!("HW-{}", id),
                    "capabilities": ["LT", "BUZZER", "LED"],
                    "time_of_last_position_update": "2026-10-19T08:00:00Z"
                }),
            ));
            if let Some(report) = hw {
                state.hw.insert(id.to_string(), report);
            }
        }
        self
    }

    pub fn requests(&self) -> usize {
        self.state().requests
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Session = MockSession;

    async fn open(&self, _email: &str, _password: &str) -> Result<MockSession, TransportError> {
        if let Some(msg) = self.state().open_error.clone() {
            return Err(TransportError::Http(msg));
        }
        Ok(MockSession {
            state: self.state.clone(),
        })
    }
}

pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    fn request(&self) -> MutexGuard<'_, MockState> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        state
    }
}

#[async_trait]
impl TransportSession for MockSession {
    async fn authenticate(&mut self) -> Result<AuthToken, TransportError> {
        self.request()
            .auth
            .clone()
            .map_err(|body| TransportError::Status { status: 401, body })
    }

    async fn tracker_ids(&self) -> Result<Vec<String>, TransportError> {
        let state = self.request();
        if let Some(msg) = &state.listing_error {
            return Err(TransportError::Http(msg.clone()));
        }
        Ok(state.trackers.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn tracker_details(&self, tracker_id: &str) -> Result<Value, TransportError> {
        self.request()
            .trackers
            .iter()
            .find(|(id, _)| id == tracker_id)
            .map(|(_, details)| details.clone())
            .ok_or_else(|| TransportError::Status {
                status: 404,
                body: "tracker not found".to_string(),
            })
    }

    async fn hw_info(&self, tracker_id: &str) -> Result<Value, TransportError> {
        self.request()
            .hw
            .get(tracker_id)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 500,
                body: "hw report unavailable".to_string(),
            })
    }

    async fn pos_report(&self, tracker_id: &str) -> Result<Value, TransportError> {
        let state = self.request();
        if let Some(msg) = &state.position_error {
            return Err(TransportError::Http(msg.clone()));
        }
        Ok(state.positions.get(tracker_id).cloned().unwrap_or(Value::Null))
    }

    async fn positions(
        &self,
        tracker_id: &str,
        time_from: i64,
        time_to: i64,
        format: PositionFormat,
    ) -> Result<Value, TransportError> {
        let mut state = self.request();
        state.history_queries.push(HistoryQuery {
            tracker_id: tracker_id.to_string(),
            time_from,
            time_to,
            format,
        });
        if let Some(msg) = &state.history_error {
            return Err(TransportError::Http(msg.clone()));
        }
        Ok(state.history.clone())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        match &state.close_error {
            Some(msg) => Err(TransportError::Http(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Client logged in against `connector`.
#[allow(dead_code)]
pub async fn authenticated_client(connector: &MockConnector) -> TrackerClient<MockConnector> {
    let mut client = TrackerClient::new(connector.clone());
    client
        .authenticate(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("mock authentication should succeed");
    client
}
