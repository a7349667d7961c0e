use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, RowAction};
use crate::state::schedule_view::export_csv;
use chrono::Local;
use ff_schedule_api::{ScheduleRequest, ScheduleResponse};
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    League,
    Schedule,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self::with_settings(settings)
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            state: AppState::new(),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // Submission: begin here, finish from the network response handlers
    // -----------------------------------------------------------------------

    /// Snapshot the form for sending. `None` while a submission is still
    /// outstanding; the generate control is disabled until it resolves.
    pub fn begin_submit(&mut self) -> Option<(u64, ScheduleRequest)> {
        let seq = self.state.submission.begin()?;
        self.state.last_error = None;
        self.state.status = None;
        let request = self.state.league.form.to_request();
        info!(
            "submission #{seq}: {} teams, {} divisions, {} weeks",
            request.league.len(),
            request.divisions.len(),
            self.state.league.form.num_weeks()
        );
        Some((seq, request))
    }

    /// Enter on the league form. Returns the request when the row was the
    /// generate button.
    pub fn activate_league_row(&mut self) -> Option<(u64, ScheduleRequest)> {
        match self.state.league.activate() {
            RowAction::Submit => self.begin_submit(),
            RowAction::None => None,
        }
    }

    pub fn on_schedule_loaded(&mut self, seq: u64, schedule: ScheduleResponse) {
        if !self.state.submission.finish(seq) {
            warn!("dropping reply to superseded submission #{seq}");
            return;
        }
        self.state.last_error = None;
        self.state.schedule.load(schedule);
        // Leaving the form, so whatever is half typed is kept as entered.
        self.state.league.commit_edit();
        self.update_tab(MenuItem::Schedule);
    }

    /// The previous schedule, if any, stays on screen.
    pub fn on_submit_failed(&mut self, seq: u64, message: String) {
        if !self.state.submission.finish(seq) {
            warn!("dropping error for superseded submission #{seq}: {message}");
            return;
        }
        self.state.last_error = Some(message);
    }

    pub fn is_generating(&self) -> bool {
        self.state.submission.is_loading()
    }

    // -----------------------------------------------------------------------
    // Schedule tab
    // -----------------------------------------------------------------------

    pub fn schedule_next_week(&mut self) {
        self.state.schedule.next_week();
    }

    pub fn schedule_prev_week(&mut self) {
        self.state.schedule.prev_week();
    }

    pub fn export_schedule(&mut self) {
        let Some(schedule) = self.state.schedule.schedule.as_ref() else {
            self.state.status = Some("Nothing to export yet: generate a schedule first".to_string());
            return;
        };
        let stamp = Local::now().format("%H:%M");
        match export_csv(schedule, &self.settings.export_dir) {
            Ok(path) => {
                info!("exported schedule to {}", path.display());
                self.state.status = Some(format!("[{stamp}] exported {}", path.display()));
            }
            Err(e) => {
                warn!("schedule export failed: {e}");
                self.state.status = Some(format!("[{stamp}] export failed: {e}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
