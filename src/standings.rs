use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Win-loss-OT triple as reported for home, road and last-10 splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
}

impl Record {
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ot_losses)
    }
}

/// One team's row in a standings table as of a single date.
///
/// Only `abbrev` is required. Rank fields are `None` when upstream omitted them or sent
/// something that was not a number; counting stats fall back to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub abbrev: String,
    pub team_name: String,
    pub conference_abbrev: Option<String>,
    pub division_abbrev: Option<String>,
    pub league_sequence: Option<u32>,
    pub conference_sequence: Option<u32>,
    pub division_sequence: Option<u32>,
    pub wildcard_sequence: Option<u32>,
    pub games_played: u32,
    pub points: i32,
    pub wins: i32,
    pub losses: i32,
    pub ot_losses: i32,
    pub regulation_wins: i32,
    pub regulation_plus_ot_wins: i32,
    pub goal_for: i32,
    pub goal_against: i32,
    pub goal_differential: i32,
    pub point_pctg: f64,
    pub home: Record,
    pub road: Record,
    pub last_10: Record,
    pub streak_code: Option<String>,
    pub streak_count: u32,
}

impl TeamStanding {
    /// Minimal row used by tests and placeholders.
    pub fn new(abbrev: impl Into<String>) -> Self {
        Self {
            abbrev: abbrev.into(),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        if self.team_name.trim().is_empty() {
            &self.abbrev
        } else {
            &self.team_name
        }
    }

    /// Season record as `W-L-OT`.
    pub fn record_label(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ot_losses)
    }

    pub fn streak_label(&self) -> String {
        match self.streak_code.as_deref() {
            Some(code) if self.streak_count > 0 => format!("{code}{}", self.streak_count),
            Some(code) => code.to_string(),
            None => String::new(),
        }
    }
}

/// Full league table for one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub date: String,
    pub teams: Vec<TeamStanding>,
}

impl StandingsSnapshot {
    pub fn new(date: impl Into<String>, teams: Vec<TeamStanding>) -> Self {
        Self {
            date: date.into(),
            teams,
        }
    }

    pub fn empty(date: impl Into<String>) -> Self {
        Self::new(date, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn get(&self, abbrev: &str) -> Option<&TeamStanding> {
        self.teams.iter().find(|t| t.abbrev == abbrev)
    }

    /// True when league sequences are exactly a permutation of `1..=N`.
    pub fn has_valid_league_sequence(&self) -> bool {
        let n = self.teams.len() as u32;
        let mut seen = HashSet::with_capacity(self.teams.len());
        for team in &self.teams {
            let Some(seq) = team.league_sequence else {
                return false;
            };
            if seq == 0 || seq > n || !seen.insert(seq) {
                return false;
            }
        }
        true
    }

    /// Teams ordered by league rank; unranked teams go last, in input order.
    pub fn by_league_sequence(&self) -> Vec<&TeamStanding> {
        let mut teams: Vec<&TeamStanding> = self.teams.iter().collect();
        teams.sort_by_key(|t| t.league_sequence.unwrap_or(u32::MAX));
        teams
    }
}
