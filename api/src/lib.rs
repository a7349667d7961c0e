pub mod client;
pub mod proxy;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request side: what the form sends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: u32,
    pub name: String, // may be empty, rendered as "Division {id}"
}

impl Division {
    /// Name shown in pickers; falls back to the id when the user left it blank.
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Division {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub division_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub in_division_play_twice: bool,
    pub out_of_division_play_once: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_weeks: Option<u32>,
}

/// Body of `POST /api/generate-schedule`, forwarded verbatim to the upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub league: Vec<Team>,
    pub divisions: Vec<Division>,
    pub options: GenerationOptions,
}

// ---------------------------------------------------------------------------
// Response side: every field optional, the upstream owns the shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub matchups: Option<Vec<Week>>,
}

impl ScheduleResponse {
    pub fn weeks(&self) -> &[Week] {
        self.matchups.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    #[serde(default)]
    pub matchups: Option<Vec<Matchup>>,
}

impl Week {
    pub fn games(&self) -> &[Matchup] {
        self.matchups.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub team1: Option<TeamRef>,
    #[serde(default)]
    pub team2: Option<TeamRef>,
}

impl Matchup {
    pub fn team1_name(&self) -> &str {
        team_ref_name(self.team1.as_ref())
    }

    pub fn team2_name(&self) -> &str {
        team_ref_name(self.team2.as_ref())
    }
}

/// Team as echoed back by the upstream. Only the name is relied on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<u32>,
}

fn team_ref_name(team: Option<&TeamRef>) -> &str {
    team.and_then(|t| t.name.as_deref()).unwrap_or_default()
}
