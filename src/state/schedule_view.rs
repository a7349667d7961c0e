use ff_schedule_api::ScheduleResponse;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_NAME: &str = "schedule.csv";

/// The last schedule received and which week is on screen.
#[derive(Debug, Default)]
pub struct ScheduleView {
    pub schedule: Option<ScheduleResponse>,
    pub selected_week: usize,
}

impl ScheduleView {
    /// Replace the schedule. Selection goes back to the first week.
    pub fn load(&mut self, schedule: ScheduleResponse) {
        self.schedule = Some(schedule);
        self.selected_week = 0;
    }

    pub fn week_count(&self) -> usize {
        self.schedule.as_ref().map_or(0, |s| s.weeks().len())
    }

    pub fn week_labels(&self) -> Vec<String> {
        (1..=self.week_count()).map(|n| format!("Week {n}")).collect()
    }

    pub fn next_week(&mut self) {
        let last = self.week_count().saturating_sub(1);
        self.selected_week = (self.selected_week + 1).min(last);
    }

    pub fn prev_week(&mut self) {
        self.selected_week = self.selected_week.saturating_sub(1);
    }

    /// `"<team1> vs <team2>"` for every matchup in the selected week, in
    /// received order. Missing teams render as blanks.
    pub fn selected_matchups(&self) -> Vec<String> {
        let Some(week) = self
            .schedule
            .as_ref()
            .and_then(|s| s.weeks().get(self.selected_week))
        else {
            return Vec::new();
        };
        week.games()
            .iter()
            .map(|m| format!("{} vs {}", m.team1_name(), m.team2_name()))
            .collect()
    }

    /// Indices of at most `max` week labels, keeping the selected week visible.
    pub fn week_window(&self, max: usize) -> Range<usize> {
        let count = self.week_count();
        let max = max.max(1);
        if count <= max {
            return 0..count;
        }
        let start = self
            .selected_week
            .saturating_sub(max / 2)
            .min(count - max);
        start..start + max
    }
}

/// Whole schedule (every week, not just the selected one) as CSV.
pub fn schedule_csv(schedule: &ScheduleResponse) -> String {
    let mut rows = vec![csv_row(["Week", "Team 1", "Team 2"])];
    for (i, week) in schedule.weeks().iter().enumerate() {
        let week_number = (i + 1).to_string();
        for game in week.games() {
            rows.push(csv_row([week_number.as_str(), game.team1_name(), game.team2_name()]));
        }
    }
    rows.join("\n")
}

fn csv_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes `schedule.csv` into `dir` and returns the full path.
pub fn export_csv(schedule: &ScheduleResponse, dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("create dir failed: {e}"))?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, schedule_csv(schedule))
        .map_err(|e| format!("write {} failed: {e}", path.display()))?;
    Ok(path)
}
