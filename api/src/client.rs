use crate::{ScheduleRequest, ScheduleResponse};
use log::debug;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Route served by the proxy (see [`crate::proxy`]).
pub const GENERATE_SCHEDULE_PATH: &str = "/api/generate-schedule";

/// Shown whenever the proxy didn't hand us a message of its own.
pub const GENERIC_FAILURE: &str = "Failed to generate schedule";

/// Client for the schedule proxy endpoint.
#[derive(Debug, Clone)]
pub struct ScheduleApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    /// The HTTP client itself could not be built.
    Setup(reqwest::Error),
    Network(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// Non-2xx reply. `message` is the `error` field of the body, when there was one.
    Rejected { status: u16, message: Option<String> },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Setup(e) => write!(f, "Failed to build HTTP client: {e}"),
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Rejected { status, message: Some(msg) } => {
                write!(f, "Request rejected ({status}): {msg}")
            }
            ApiError::Rejected { status, message: None } => {
                write!(f, "Request rejected ({status})")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The single line the form shows to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message: Some(msg), .. } => msg.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl ScheduleApi {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent("ffsched/0.1 (terminal schedule builder)")
            .build()
            .map_err(ApiError::Setup)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit the league to the proxy and wait for the generated schedule.
    pub async fn generate_schedule(&self, request: &ScheduleRequest) -> ApiResult<ScheduleResponse> {
        let url = format!("{}{GENERATE_SCHEDULE_PATH}", self.base_url.trim_end_matches('/'));
        debug!(
            "submitting {} teams in {} divisions to {url}",
            request.league.len(),
            request.divisions.len()
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ScheduleResponse>()
                .await
                .map_err(|e| ApiError::Parsing(e, url));
        }

        // Error bodies are best effort: anything unreadable becomes the generic message.
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(ToOwned::to_owned));
        Err(ApiError::Rejected { status: status.as_u16(), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Division, GenerationOptions, Team};
    use mockito::Matcher;
    use serde_json::json;

    fn sample_request() -> ScheduleRequest {
        ScheduleRequest {
            league: vec![
                Team { name: "Team 1".into(), division_id: 1 },
                Team { name: "Team 2".into(), division_id: 2 },
            ],
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
    async fn returns_schedule_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::to_value(sample_request()).unwrap()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "matchups": [
                        { "matchups": [{ "team1": { "name": "Team 1" }, "team2": { "name": "Team 2" } }] }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url()).unwrap();
        let schedule = api.generate_schedule(&sample_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(schedule.weeks().len(), 1);
        assert_eq!(schedule.weeks()[0].games()[0].team1_name(), "Team 1");
        assert_eq!(schedule.weeks()[0].games()[0].team2_name(), "Team 2");
    }

    #[tokio::test]
    async fn trailing_slash_on_base_url_is_ignored() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(200)
            .with_body(r#"{"matchups":[]}"#)
            .create_async()
            .await;

        let api = ScheduleApi::new(format!("{}/", server.url())).unwrap();
        let schedule = api.generate_schedule(&sample_request()).await.unwrap();

        mock.assert_async().await;
        assert!(schedule.weeks().is_empty());
    }

    #[tokio::test]
    async fn error_payload_becomes_user_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"API_URL not configured"}"#)
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url()).unwrap();
        let err = api.generate_schedule(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
        assert_eq!(err.user_message(), "API_URL not configured");
    }

    #[tokio::test]
    async fn unreadable_error_body_falls_back_to_generic_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url()).unwrap();
        let err = api.generate_schedule(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Rejected { status: 502, message: None }));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn null_success_body_is_a_parse_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let api = ScheduleApi::new(server.url()).unwrap();
        let err = api.generate_schedule(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Parsing(..)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let api = ScheduleApi::new(format!("http://127.0.0.1:{port}")).unwrap();
        let err = api.generate_schedule(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Network(..)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn construction_reports_instead_of_panicking() {
        let api = ScheduleApi::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:3000");
    }
}
