// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tractive graph API transport over HTTP.
//!
//! Handles:
//! - Password authentication (`auth/token`)
//! - Tracker listing and per-tracker detail, hardware and position fetches
//! - Tractive client/user headers on every request
//!
//! There is no retry, rate-limit or token-refresh handling here. A failed
//! request is reported once to the caller.

use crate::config::Config;
use crate::error::AdapterError;
use crate::services::transport::{
    AuthToken, Connector, PositionFormat, TransportError, TransportSession,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

const HEADER_CLIENT: &str = "X-Tractive-Client";
const HEADER_USER: &str = "X-Tractive-User";

/// Opens HTTP sessions against the Tractive API.
#[derive(Clone)]
pub struct TractiveConnector {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
}

impl TractiveConnector {
    /// Create a connector from transport configuration.
    pub fn new(config: &Config) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
        })
    }

    /// Create a connector from environment configuration.
    pub fn from_env() -> Result<Self, AdapterError> {
        let config = Config::from_env()?;
        Self::new(&config)
    }
}

#[async_trait]
impl Connector for TractiveConnector {
    type Session = TractiveSession;

    async fn open(&self, email: &str, password: &str) -> Result<TractiveSession, TransportError> {
        tracing::debug!(base_url = %self.base_url, "Opening Tractive session");
        Ok(TractiveSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            client_id: self.client_id.clone(),
            email: email.to_string(),
            password: password.to_string(),
            auth: None,
            closed: false,
        })
    }
}

/// One logged-in HTTP session.
pub struct TractiveSession {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    email: String,
    password: String,
    auth: Option<AuthToken>,
    closed: bool,
}

/// Entry in the `user/{id}/trackers` listing.
#[derive(Debug, Deserialize)]
struct TrackerRef {
    #[serde(rename = "_id")]
    id: String,
}

impl TractiveSession {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn auth(&self) -> Result<&AuthToken, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.auth.as_ref().ok_or(TransportError::Unauthenticated)
    }

    /// Authenticated GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let auth = self.auth()?;
        let url = self.url(path);
        tracing::debug!(url = %url, "Tractive GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&auth.access_token)
            .header(HEADER_CLIENT, &self.client_id)
            .header(HEADER_USER, &auth.user_id)
            .query(query)
            .send()
            .await?;

        check_response_json(response).await
    }
}

#[async_trait]
impl TransportSession for TractiveSession {
    async fn authenticate(&mut self) -> Result<AuthToken, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        let body = json!({
            "platform_email": self.email,
            "platform_token": self.password,
            "grant_type": "tractive",
        });

        let response = self
            .http
            .post(self.url("auth/token"))
            .header(HEADER_CLIENT, &self.client_id)
            .json(&body)
            .send()
            .await?;

        let token: AuthToken = check_response_json(response).await?;
        self.auth = Some(token.clone());
        Ok(token)
    }

    async fn tracker_ids(&self) -> Result<Vec<String>, TransportError> {
        let path = format!("user/{}/trackers", urlencoding::encode(&self.auth()?.user_id));
        let refs: Vec<TrackerRef> = self.get_json(&path, &[]).await?;
        Ok(refs.into_iter().map(|r| r.id).collect())
    }

    async fn tracker_details(&self, tracker_id: &str) -> Result<Value, TransportError> {
        let path = format!("tracker/{}", urlencoding::encode(tracker_id));
        self.get_json(&path, &[]).await
    }

    async fn hw_info(&self, tracker_id: &str) -> Result<Value, TransportError> {
        let path = format!("device_hw_report/{}/", urlencoding::encode(tracker_id));
        self.get_json(&path, &[]).await
    }

    async fn pos_report(&self, tracker_id: &str) -> Result<Value, TransportError> {
        let path = format!("device_pos_report/{}", urlencoding::encode(tracker_id));
        match self.get_json::<Value>(&path, &[]).await {
            // The service answers 404 for trackers that never reported a position
            Err(TransportError::Status { status: 404, .. }) => Ok(Value::Null),
            other => other,
        }
    }

    async fn positions(
        &self,
        tracker_id: &str,
        time_from: i64,
        time_to: i64,
        format: PositionFormat,
    ) -> Result<Value, TransportError> {
        let path = format!("tracker/{}/positions", urlencoding::encode(tracker_id));
        self.get_json(
            &path,
            &[
                ("time_from", time_from.to_string()),
                ("time_to", time_to.to_string()),
                ("format", format.as_str().to_string()),
            ],
        )
        .await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.closed = true;
        self.auth = None;
        tracing::debug!("Tractive session closed");
        Ok(())
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            tracing::warn!("Tractive rate limit hit (429)");
        }
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> Config {
        Config {
            // Port 1 on loopback refuses connections immediately
            api_url: "http://127.0.0.1:1/4/".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_open_does_not_authenticate() {
        let connector = TractiveConnector::new(&unreachable_config()).unwrap();
        let session = connector.open("a@b.c", "pw").await.unwrap();

        assert_eq!(session.base_url, "http://127.0.0.1:1/4");
        assert_eq!(session.url("tracker/ABC"), "http://127.0.0.1:1/4/tracker/ABC");
        assert!(session.auth.is_none());
    }

    #[tokio::test]
    async fn test_fetch_before_authenticate_fails() {
        let connector = TractiveConnector::new(&unreachable_config()).unwrap();
        let session = connector.open("a@b.c", "pw").await.unwrap();

        let err = session.tracker_ids().await.unwrap_err();
        assert!(matches!(err, TransportError::Unauthenticated), "got {:?}", err);
        assert!(matches!(
            session.positions("ABC", 0, 1, PositionFormat::JsonSegments).await,
            Err(TransportError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_connection_refused_is_http_error() {
        let connector = TractiveConnector::new(&unreachable_config()).unwrap();
        let mut session = connector.open("a@b.c", "pw").await.unwrap();

        let err = session.authenticate().await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_close_twice_reports_closed() {
        let connector = TractiveConnector::new(&unreachable_config()).unwrap();
        let mut session = connector.open("a@b.c", "pw").await.unwrap();

        session.close().await.unwrap();
        assert!(matches!(session.close().await, Err(TransportError::Closed)));
        assert!(matches!(
            session.hw_info("ABC").await,
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn test_position_format_query_value() {
        assert_eq!(PositionFormat::JsonSegments.as_str(), "json_segments");
    }
}
