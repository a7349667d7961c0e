use crate::app::MenuItem;
use crate::state::league_form::{FormRow, LeagueForm, TeamUpdate};
use crate::state::schedule_view::ScheduleView;

// ---------------------------------------------------------------------------
// League editor: cursor and in-place text editing over the league form
// ---------------------------------------------------------------------------

/// Text being typed into a form row. Nothing touches the form until commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub row: FormRow,
    pub buffer: String,
}

/// What pressing Enter on a row asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    None,
    Submit,
}

#[derive(Debug, Default)]
pub struct LeagueEditor {
    pub form: LeagueForm,
    pub cursor: usize,
    pub edit: Option<EditState>,
}

impl LeagueEditor {
    pub fn current_row(&self) -> FormRow {
        let rows = self.form.rows();
        rows[self.cursor.min(rows.len() - 1)]
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn move_down(&mut self) {
        let last = self.form.rows().len() - 1;
        self.cursor = (self.cursor + 1).min(last);
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn focus(&mut self, row: FormRow) {
        if let Some(pos) = self.form.rows().iter().position(|r| *r == row) {
            self.cursor = pos;
        }
    }

    fn clamp_cursor(&mut self) {
        let last = self.form.rows().len() - 1;
        self.cursor = self.cursor.min(last);
    }

    /// Enter on the focused row: edit text, flip a checkbox, or press a button.
    pub fn activate(&mut self) -> RowAction {
        match self.current_row() {
            FormRow::Division(_) | FormRow::Team(_) | FormRow::NumWeeks => {
                self.begin_edit();
            }
            FormRow::AddDivision => self.add_division(),
            FormRow::AddTeam => self.add_team(),
            FormRow::InDivisionTwice => self.form.toggle_in_division_twice(),
            FormRow::OutOfDivisionOnce => self.form.toggle_out_of_division_once(),
            FormRow::Generate => return RowAction::Submit,
        }
        RowAction::None
    }

    /// `a`: add to whichever section the cursor is in.
    pub fn add_in_section(&mut self) {
        if self.current_row().in_division_section() {
            self.add_division();
        } else {
            self.add_team();
        }
    }

    fn add_division(&mut self) {
        self.form.add_division();
        let index = self.form.divisions.len() - 1;
        self.focus(FormRow::Division(index));
        self.begin_edit();
    }

    fn add_team(&mut self) {
        let index = self.form.add_team(None);
        self.focus(FormRow::Team(index));
        self.begin_edit();
    }

    /// `d`/Delete on a division or team row. Returns how many teams were removed.
    pub fn remove_current(&mut self) -> usize {
        let removed = match self.current_row() {
            FormRow::Division(index) => {
                let id = self.form.divisions[index].id;
                self.form.remove_division(id)
            }
            FormRow::Team(index) => {
                self.form.remove_team(index);
                1
            }
            _ => 0,
        };
        self.clamp_cursor();
        removed
    }

    pub fn cycle_division(&mut self, forward: bool) {
        if let FormRow::Team(index) = self.current_row() {
            self.form.cycle_team_division(index, forward);
        }
    }

    pub fn begin_edit(&mut self) {
        let row = self.current_row();
        let buffer = match row {
            FormRow::Division(index) => self.form.divisions[index].name.clone(),
            FormRow::Team(index) => self.form.teams[index].name.clone(),
            FormRow::NumWeeks => self.form.num_weeks().to_string(),
            _ => return,
        };
        self.edit = Some(EditState { row, buffer });
    }

    pub fn push_char(&mut self, c: char) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if edit.row == FormRow::NumWeeks && !c.is_ascii_digit() {
            return;
        }
        edit.buffer.push(c);
    }

    pub fn pop_char(&mut self) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Apply the buffer. A week count that doesn't parse to at least 1 is dropped.
    pub fn commit_edit(&mut self) {
        let Some(EditState { row, buffer }) = self.edit.take() else {
            return;
        };
        match row {
            FormRow::Division(index) => {
                if let Some(id) = self.form.divisions.get(index).map(|d| d.id) {
                    self.form.update_division_name(id, buffer);
                }
            }
            FormRow::Team(index) => self.form.update_team(
                index,
                TeamUpdate { name: Some(buffer), ..TeamUpdate::default() },
            ),
            FormRow::NumWeeks => {
                if let Ok(weeks) = buffer.parse::<u32>()
                    && weeks >= 1
                {
                    self.form.set_num_weeks(weeks);
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Submission tracking: at most one request in flight
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SubmissionState {
    in_flight: Option<u64>,
    last_seq: u64,
}

impl SubmissionState {
    /// Start a submission unless one is already outstanding.
    pub fn begin(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        Some(self.last_seq)
    }

    /// Close the submission. False for a reply that doesn't belong to the
    /// outstanding one, which the caller should drop.
    pub fn finish(&mut self, seq: u64) -> bool {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// One-line feedback such as "exported to ./schedule.csv".
    pub status: Option<String>,
    pub league: LeagueEditor,
    pub schedule: ScheduleView,
    pub submission: SubmissionState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
