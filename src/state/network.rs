use crate::state::messages::{NetworkRequest, NetworkResponse};
use ff_schedule_api::ScheduleRequest;
use ff_schedule_api::client::ScheduleApi;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: ScheduleApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: ScheduleApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests are handled one at a time, in the order they were sent.
    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::GenerateSchedule { seq, request } => {
                    self.handle_generate_schedule(seq, request).await
                }
            };

            debug!("network request complete");
            let is_ok = !matches!(response, NetworkResponse::SubmitFailed { .. });
            self.stop_loading_animation(is_ok).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_generate_schedule(&self, seq: u64, request: ScheduleRequest) -> NetworkResponse {
        debug!("generating schedule (submission #{seq}) via {}", self.client.base_url());
        match self.client.generate_schedule(&request).await {
            Ok(schedule) => {
                info!("submission #{seq}: received {} weeks", schedule.weeks().len());
                NetworkResponse::ScheduleLoaded { seq, schedule }
            }
            Err(err) => {
                warn!("submission #{seq} failed: {err}");
                NetworkResponse::SubmitFailed { seq, message: err.user_message() }
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::league_form::LeagueForm;
    use ff_schedule_api::client::GENERATE_SCHEDULE_PATH;

    async fn submit_once(proxy_url: String) -> NetworkResponse {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(100);
        tokio::spawn(NetworkWorker::new(ScheduleApi::new(proxy_url).unwrap(), req_rx, resp_tx).run());

        let request = LeagueForm::default().to_request();
        req_tx
            .send(NetworkRequest::GenerateSchedule { seq: 7, request })
            .await
            .unwrap();

        while let Some(response) = resp_rx.recv().await {
            if !matches!(response, NetworkResponse::LoadingStateChanged { .. }) {
                return response;
            }
        }
        panic!("worker stopped without answering");
    }

    #[tokio::test]
    async fn successful_submission_yields_schedule() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"matchups":[{"matchups":[{"team1":{"name":"Team 1"},"team2":{"name":"Team 2"}}]}]}"#)
            .create_async()
            .await;

        match submit_once(server.url()).await {
            NetworkResponse::ScheduleLoaded { seq, schedule } => {
                assert_eq!(seq, 7);
                assert_eq!(schedule.weeks().len(), 1);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_submission_carries_user_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_SCHEDULE_PATH)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"API_URL not configured"}"#)
            .create_async()
            .await;

        match submit_once(server.url()).await {
            NetworkResponse::SubmitFailed { seq, message } => {
                assert_eq!(seq, 7);
                assert_eq!(message, "API_URL not configured");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
