use ff_schedule_api::{Division, GenerationOptions, ScheduleRequest, Team};

pub const DEFAULT_NUM_WEEKS: u32 = 13;

/// Divisions, teams and options as currently entered. This is the only copy;
/// nothing is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueForm {
    pub divisions: Vec<Division>,
    pub teams: Vec<Team>,
    pub options: GenerationOptions,
}

/// Partial edit applied by [`LeagueForm::update_team`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub division_id: Option<u32>,
}

/// One selectable line of the league form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Division(usize),
    AddDivision,
    InDivisionTwice,
    OutOfDivisionOnce,
    NumWeeks,
    Team(usize),
    AddTeam,
    Generate,
}

impl FormRow {
    pub fn in_division_section(&self) -> bool {
        matches!(self, FormRow::Division(_) | FormRow::AddDivision)
    }
}

impl Default for LeagueForm {
    /// Two divisions of five teams each, so a schedule can be generated straight away.
    fn default() -> Self {
        let divisions = vec![
            Division { id: 1, name: "Division 1".to_string() },
            Division { id: 2, name: "Division 2".to_string() },
        ];
        let teams = (1..=10)
            .map(|n| Team {
                name: format!("Team {n}"),
                division_id: if n <= 5 { 1 } else { 2 },
            })
            .collect();
        Self { divisions, teams, ..Self::empty() }
    }
}

impl LeagueForm {
    pub fn empty() -> Self {
        Self {
            divisions: Vec::new(),
            teams: Vec::new(),
            options: GenerationOptions {
                num_weeks: Some(DEFAULT_NUM_WEEKS),
                ..GenerationOptions::default()
            },
        }
    }

    // -----------------------------------------------------------------------
    // Divisions
    // -----------------------------------------------------------------------

    /// Appends an unnamed division and returns its id (one past the current max).
    pub fn add_division(&mut self) -> u32 {
        let id = self.divisions.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        self.divisions.push(Division { id, name: String::new() });
        id
    }

    pub fn update_division_name(&mut self, id: u32, name: impl Into<String>) {
        if let Some(division) = self.divisions.iter_mut().find(|d| d.id == id) {
            division.name = name.into();
        }
    }

    /// Removes the division and every team in it. Returns how many teams went with it.
    pub fn remove_division(&mut self, id: u32) -> usize {
        self.divisions.retain(|d| d.id != id);
        let before = self.teams.len();
        self.teams.retain(|t| t.division_id != id);
        before - self.teams.len()
    }

    pub fn division_label(&self, id: u32) -> String {
        self.divisions
            .iter()
            .find(|d| d.id == id)
            .map(Division::label)
            .unwrap_or_else(|| format!("Division {id}"))
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// Appends an unnamed team and returns its index. Without an explicit
    /// division it lands in the first one (or id 1 when there are none).
    pub fn add_team(&mut self, division_id: Option<u32>) -> usize {
        let division_id = division_id
            .or_else(|| self.divisions.first().map(|d| d.id))
            .unwrap_or(1);
        self.teams.push(Team { name: String::new(), division_id });
        self.teams.len() - 1
    }

    pub fn update_team(&mut self, index: usize, update: TeamUpdate) {
        let Some(team) = self.teams.get_mut(index) else {
            return;
        };
        if let Some(name) = update.name {
            team.name = name;
        }
        if let Some(division_id) = update.division_id {
            team.division_id = division_id;
        }
    }

    pub fn remove_team(&mut self, index: usize) {
        if index < self.teams.len() {
            self.teams.remove(index);
        }
    }

    /// Moves a team to the next (or previous) division in list order, wrapping.
    /// A team whose division no longer exists goes to the first one.
    pub fn cycle_team_division(&mut self, index: usize, forward: bool) {
        let Some(team) = self.teams.get(index) else {
            return;
        };
        if self.divisions.is_empty() {
            return;
        }
        let count = self.divisions.len();
        let next = match self.divisions.iter().position(|d| d.id == team.division_id) {
            Some(pos) if forward => (pos + 1) % count,
            Some(pos) => (pos + count - 1) % count,
            None => 0,
        };
        let division_id = self.divisions[next].id;
        self.update_team(index, TeamUpdate { division_id: Some(division_id), ..TeamUpdate::default() });
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    pub fn toggle_in_division_twice(&mut self) {
        self.options.in_division_play_twice = !self.options.in_division_play_twice;
    }

    pub fn toggle_out_of_division_once(&mut self) {
        self.options.out_of_division_play_once = !self.options.out_of_division_play_once;
    }

    pub fn num_weeks(&self) -> u32 {
        self.options.num_weeks.unwrap_or(DEFAULT_NUM_WEEKS)
    }

    pub fn set_num_weeks(&mut self, weeks: u32) {
        self.options.num_weeks = Some(weeks.max(1));
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Snapshot of the form as the body for the proxy. Not validated: a team
    /// pointing at a missing division goes out as-is.
    pub fn to_request(&self) -> ScheduleRequest {
        ScheduleRequest {
            league: self.teams.clone(),
            divisions: self.divisions.clone(),
            options: self.options.clone(),
        }
    }

    pub fn rows(&self) -> Vec<FormRow> {
        let mut rows: Vec<FormRow> = (0..self.divisions.len()).map(FormRow::Division).collect();
        rows.extend([
            FormRow::AddDivision,
            FormRow::InDivisionTwice,
            FormRow::OutOfDivisionOnce,
            FormRow::NumWeeks,
        ]);
        rows.extend((0..self.teams.len()).map(FormRow::Team));
        rows.extend([FormRow::AddTeam, FormRow::Generate]);
        rows
    }
}
