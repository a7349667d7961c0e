//! Server-side relay between the form and the upstream scheduling service.
//!
//! One inbound `POST /api/generate-schedule` becomes exactly one outbound
//! `POST <API_URL>/generate-schedule` with the same JSON body. The upstream's
//! status and body come back untouched; the only errors this layer invents
//! are "no upstream configured" and "upstream unreachable".

use crate::client::GENERATE_SCHEDULE_PATH;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{debug, error, warn};
use reqwest::Client;
use serde_json::{Value, json};
use std::fmt;

/// Environment variable holding the upstream base URL.
pub const API_URL_VAR: &str = "API_URL";

/// Path appended to the upstream base URL.
pub const UPSTREAM_PATH: &str = "/generate-schedule";

/// Where the upstream base URL comes from.
#[derive(Debug, Clone)]
pub enum Upstream {
    /// Read the named environment variable on every request, so a missing
    /// value is reported per call instead of refusing to start.
    Env(String),
    Fixed(Option<String>),
}

impl Upstream {
    pub fn resolve(&self) -> Option<String> {
        let raw = match self {
            Upstream::Env(var) => std::env::var(var).ok(),
            Upstream::Fixed(url) => url.clone(),
        };
        raw.map(|url| url.trim().to_string()).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ProxyState {
    client: Client,
    upstream: Upstream,
}

impl ProxyState {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            client: Client::new(),
            upstream,
        }
    }

    pub fn from_env() -> Self {
        Self::new(Upstream::Env(API_URL_VAR.to_string()))
    }
}

#[derive(Debug)]
pub enum ProxyError {
    /// The inbound body wasn't JSON. The content type is never checked.
    InvalidBody(serde_json::Error),
    MissingUpstream,
    Unreachable(reqwest::Error, String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::InvalidBody(e) => write!(f, "Request body is not JSON: {e}"),
            ProxyError::MissingUpstream => write!(f, "{API_URL_VAR} is not set"),
            ProxyError::Unreachable(e, url) => write!(f, "Network error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ProxyError {}

impl ProxyError {
    /// What the caller gets to see. Transport details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::InvalidBody(_) => "Request body must be JSON",
            ProxyError::MissingUpstream => "API_URL not configured",
            ProxyError::Unreachable(..) => "Failed to reach schedule service",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Upstream status plus its body; `Value::Null` when the body wasn't JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub status: u16,
    pub body: Value,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(self.body)).into_response()
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(GENERATE_SCHEDULE_PATH, post(generate_schedule))
        .with_state(state)
}

/// `POST /api/generate-schedule`. Any JSON body is accepted, whatever the
/// content type says.
pub async fn generate_schedule(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Relayed, ProxyError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        let err = ProxyError::InvalidBody(e);
        warn!("rejecting schedule request: {err}");
        err
    })?;

    let Some(upstream) = state.upstream.resolve() else {
        error!("rejecting schedule request: {}", ProxyError::MissingUpstream);
        return Err(ProxyError::MissingUpstream);
    };

    forward(&state.client, &upstream, &body)
        .await
        .inspect_err(|e| error!("schedule request failed: {e}"))
}

/// Single best-effort forward: no retries, default timeouts, nothing cached.
pub async fn forward(client: &Client, upstream: &str, body: &Value) -> Result<Relayed, ProxyError> {
    let url = format!("{}{UPSTREAM_PATH}", upstream.trim_end_matches('/'));
    debug!("forwarding schedule request to {url}");

    let response = client
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| ProxyError::Unreachable(e, url.clone()))?;

    let status = response.status().as_u16();
    let body = match response.json::<Value>().await {
        Ok(body) => body,
        Err(e) => {
            warn!("upstream {url} replied {status} with a non-JSON body: {e}");
            Value::Null
        }
    };

    debug!("upstream {url} replied {status}");
    Ok(Relayed { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{GENERIC_FAILURE, ScheduleApi};
    use crate::{Division, GenerationOptions, ScheduleRequest, Team};
    use mockito::Matcher;

    fn sample_body() -> Value {
        json!({
            "league": [
                { "name": "Team 1", "divisionId": 1 },
                { "name": "Team 2", "divisionId": 1 }
            ],
            "divisions": [{ "id": 1, "name": "Division 1" }],
            "options": { "inDivisionPlayTwice": true, "outOfDivisionPlayOnce": false, "numWeeks": 12 }
        })
    }

    async fn call(state: ProxyState, body: Value) -> (StatusCode, Value) {
        let response = generate_schedule(State(state), Bytes::from(body.to_string()))
            .await
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn blank_upstream_counts_as_missing() {
        assert_eq!(Upstream::Fixed(None).resolve(), None);
        assert_eq!(Upstream::Fixed(Some("   ".into())).resolve(), None);
        assert_eq!(
            Upstream::Fixed(Some(" http://scheduler ".into())).resolve().as_deref(),
            Some("http://scheduler")
        );
    }

    #[test]
    fn unset_env_var_counts_as_missing() {
        let upstream = Upstream::Env("FFSCHED_TEST_UPSTREAM_THAT_IS_NEVER_SET".into());
        assert_eq!(upstream.resolve(), None);
    }

    #[tokio::test]
    async fn missing_upstream_fails_without_network_call() {
        let (status, body) = call(ProxyState::new(Upstream::Fixed(None)), sample_body()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "API_URL not configured" }));
    }

    #[tokio::test]
    async fn forwards_body_and_relays_success() {
        let mut upstream = mockito::Server::new_async().await;
        let reply = json!({
            "matchups": [{ "matchups": [{ "team1": { "name": "Team 1" }, "team2": { "name": "Team 2" } }] }]
        });
        let mock = upstream
            .mock("POST", UPSTREAM_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(sample_body()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply.to_string())
            .create_async()
            .await;

        let state = ProxyState::new(Upstream::Fixed(Some(upstream.url())));
        let (status, body) = call(state, sample_body()).await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, reply);
    }

    #[tokio::test]
    async fn upstream_error_payload_is_relayed_unchanged() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("POST", UPSTREAM_PATH)
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"odd number of teams in Division 1"}"#)
            .create_async()
            .await;

        let state = ProxyState::new(Upstream::Fixed(Some(format!("{}/", upstream.url()))));
        let (status, body) = call(state, sample_body()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "error": "odd number of teams in Division 1" }));
    }

    #[tokio::test]
    async fn non_json_upstream_body_becomes_null() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("POST", UPSTREAM_PATH)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let state = ProxyState::new(Upstream::Fixed(Some(upstream.url())));
        let (status, body) = call(state, sample_body()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn unreachable_upstream_hides_transport_details() {
        let url = closed_port_url();
        let state = ProxyState::new(Upstream::Fixed(Some(url.clone())));
        let (status, body) = call(state, sample_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to reach schedule service" }));
        assert!(!body.to_string().contains(&url));
    }

    async fn serve(state: ProxyState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn scenario_request() -> ScheduleRequest {
        ScheduleRequest {
            league: (1..=10)
                .map(|n| Team { name: format!("Team {n}"), division_id: if n <= 5 { 1 } else { 2 } })
                .collect(),
            divisions: vec![
                Division { id: 1, name: "Division 1".into() },
                Division { id: 2, name: "Division 2".into() },
            ],
            options: GenerationOptions {
                in_division_play_twice: true,
                out_of_division_play_once: true,
                num_weeks: Some(12),
            },
        }
    }

    #[tokio::test]
    async fn client_through_proxy_to_upstream() {
        let mut upstream = mockito::Server::new_async().await;
        let mock = upstream
            .mock("POST", UPSTREAM_PATH)
            .match_body(Matcher::Json(serde_json::to_value(scenario_request()).unwrap()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"matchups":[{"matchups":[{"team1":{"name":"Team 1"},"team2":{"name":"Team 2"}}]}]}"#,
            )
            .create_async()
            .await;

        let proxy = serve(ProxyState::new(Upstream::Fixed(Some(upstream.url())))).await;
        let schedule = ScheduleApi::new(proxy)
            .unwrap()
            .generate_schedule(&scenario_request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(schedule.weeks().len(), 1);
        let game = &schedule.weeks()[0].games()[0];
        assert_eq!((game.team1_name(), game.team2_name()), ("Team 1", "Team 2"));
    }

    #[tokio::test]
    async fn client_sees_configuration_error_from_proxy() {
        let proxy = serve(ProxyState::new(Upstream::Fixed(None))).await;
        let err = ScheduleApi::new(proxy)
            .unwrap()
            .generate_schedule(&scenario_request())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "API_URL not configured");
        assert_ne!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let response = generate_schedule(
            State(ProxyState::new(Upstream::Fixed(Some("http://unused".into())))),
            Bytes::from_static(b"{not json"),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Request body must be JSON" }));
    }

    #[tokio::test]
    async fn json_without_content_type_is_still_forwarded() {
        let mut upstream = mockito::Server::new_async().await;
        let mock = upstream
            .mock("POST", UPSTREAM_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(sample_body()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"matchups":[]}"#)
            .create_async()
            .await;

        let proxy = serve(ProxyState::new(Upstream::Fixed(Some(upstream.url())))).await;
        let response = reqwest::Client::new()
            .post(format!("{proxy}{GENERATE_SCHEDULE_PATH}"))
            .header("content-type", "text/plain")
            .body(sample_body().to_string())
            .send()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "matchups": [] }));
    }

    #[tokio::test]
    async fn malformed_body_over_http_gets_json_error() {
        let proxy = serve(ProxyState::new(Upstream::Fixed(None))).await;
        let response = reqwest::Client::new()
            .post(format!("{proxy}{GENERATE_SCHEDULE_PATH}"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({ "error": "Request body must be JSON" })
        );
    }
}
