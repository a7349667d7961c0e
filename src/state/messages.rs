use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use ff_schedule_api::{ScheduleRequest, ScheduleResponse};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// `seq` identifies the submission so a stale reply can be told apart.
    GenerateSchedule { seq: u64, request: ScheduleRequest },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { seq: u64, schedule: ScheduleResponse },
    SubmitFailed { seq: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
}
