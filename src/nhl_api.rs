use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{fetch_text, http_client};
use crate::schedule::{GameRecord, GameSide, PeriodType};
use crate::standings::{Record, StandingsSnapshot, TeamStanding};

pub const DEFAULT_API_BASE: &str = "https://api-web.nhle.com/v1";

/// Largest magnitude accepted for a season count (points, goals, wins...).
pub const MAX_COUNT: f64 = 100_000.0;
/// Largest accepted rank; anything above is treated as unranked.
pub const MAX_RANK: f64 = 1_000.0;

/// Thin wrapper over the public NHL web API. Everything leaving here is already typed.
pub struct NhlClient {
    client: &'static Client,
    base: String,
}

impl NhlClient {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client(Some(timeout_secs))?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn fetch_standings(&self, date: &str) -> Result<StandingsSnapshot> {
        let url = format!("{}/standings/{date}", self.base);
        debug!(%url, "fetching standings");
        let body = fetch_text(self.client, &url).context("standings request failed")?;
        parse_standings_json(&body, date)
    }

    pub fn fetch_team_schedule(&self, abbrev: &str, season: &str) -> Result<Vec<GameRecord>> {
        let url = format!("{}/club-schedule-season/{abbrev}/{season}", self.base);
        debug!(%url, "fetching team schedule");
        let body = fetch_text(self.client, &url).context("team schedule request failed")?;
        parse_club_schedule_json(&body)
    }

    pub fn fetch_daily_games(&self, date: &str) -> Result<Vec<GameRecord>> {
        let url = format!("{}/schedule/{date}", self.base);
        debug!(%url, "fetching daily schedule");
        let body = fetch_text(self.client, &url).context("daily schedule request failed")?;
        parse_daily_schedule_json(&body, date)
    }

    /// The seven-day block starting at `start`, keyed by date.
    pub fn fetch_game_week(&self, start: &str) -> Result<Vec<(String, Vec<GameRecord>)>> {
        let url = format!("{}/schedule/{start}", self.base);
        debug!(%url, "fetching game week");
        let body = fetch_text(self.client, &url).context("weekly schedule request failed")?;
        parse_weekly_schedule_json(&body)
    }
}

pub fn parse_standings_json(raw: &str, date: &str) -> Result<StandingsSnapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(StandingsSnapshot::empty(date));
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid standings json")?;
    let mut teams = Vec::new();
    if let Some(rows) = root.get("standings").and_then(|v| v.as_array()) {
        for row in rows {
            match normalize_team_standing(row) {
                Some(team) => teams.push(team),
                None => warn!("dropping standings row without a team abbreviation"),
            }
        }
    }
    Ok(StandingsSnapshot::new(date, teams))
}

/// Map one upstream standings row onto [`TeamStanding`]. Field-name drift is handled
/// here and nowhere else.
pub fn normalize_team_standing(v: &Value) -> Option<TeamStanding> {
    let abbrev = pick_text(v, &["teamAbbrev", "abbrev", "triCode", "teamAbbreviation"])?;
    let team_name = pick_text(v, &["teamName", "teamCommonName", "name"])
        .or_else(|| {
            let place = pick_text(v, &["placeName"])?;
            let common = pick_text(v, &["teamCommonName"]).unwrap_or_default();
            Some(format!("{place} {common}").trim().to_string())
        })
        .unwrap_or_default();

    let f = FieldReader { row: v, abbrev: &abbrev };
    Some(TeamStanding {
        team_name,
        conference_abbrev: pick_text(v, &["conferenceAbbrev", "conferenceName"]),
        division_abbrev: pick_text(v, &["divisionAbbrev", "divisionName"]),
        league_sequence: f.rank("leagueSequence"),
        conference_sequence: f.rank("conferenceSequence"),
        division_sequence: f.rank("divisionSequence"),
        wildcard_sequence: f.rank("wildcardSequence"),
        games_played: f.count("gamesPlayed").max(0) as u32,
        points: f.count("points"),
        wins: f.count("wins"),
        losses: f.count("losses"),
        ot_losses: f.count("otLosses"),
        regulation_wins: f.count("regulationWins"),
        regulation_plus_ot_wins: f.count("regulationPlusOtWins"),
        goal_for: f.count("goalFor"),
        goal_against: f.count("goalAgainst"),
        goal_differential: f.count("goalDifferential"),
        point_pctg: f.ratio("pointPctg"),
        home: f.record("homeWins", "homeLosses", "homeOtLosses"),
        road: f.record("roadWins", "roadLosses", "roadOtLosses"),
        last_10: f.record("l10Wins", "l10Losses", "l10OtLosses"),
        streak_code: pick_text(v, &["streakCode"]),
        streak_count: f.count("streakCount").max(0) as u32,
        abbrev,
    })
}

/// Numeric field access that treats absent as neutral and logs malformed values.
struct FieldReader<'a> {
    row: &'a Value,
    abbrev: &'a str,
}

impl FieldReader<'_> {
    fn raw(&self, key: &str) -> Option<&Value> {
        self.row.get(key).filter(|v| !v.is_null())
    }

    fn malformed(&self, key: &str, value: &Value) {
        warn!(team = self.abbrev, field = key, %value, "malformed numeric field");
    }

    fn out_of_range(&self, key: &str, value: &Value) {
        warn!(team = self.abbrev, field = key, %value, "numeric field out of range");
    }

    fn count(&self, key: &str) -> i32 {
        let Some(value) = self.raw(key) else {
            return 0;
        };
        match as_number(value) {
            Some(n) if n.abs() <= MAX_COUNT => n.round() as i32,
            Some(_) => {
                self.out_of_range(key, value);
                0
            }
            None => {
                self.malformed(key, value);
                0
            }
        }
    }

    fn rank(&self, key: &str) -> Option<u32> {
        let value = self.raw(key)?;
        match as_number(value) {
            Some(n) if (1.0..=MAX_RANK).contains(&n) => Some(n.round() as u32),
            Some(n) if n > MAX_RANK => {
                self.out_of_range(key, value);
                None
            }
            // Upstream sends 0 for "not ranked here", e.g. wild card for division leaders.
            Some(_) => None,
            None => {
                self.malformed(key, value);
                None
            }
        }
    }

    fn ratio(&self, key: &str) -> f64 {
        let Some(value) = self.raw(key) else {
            return 0.0;
        };
        match as_number(value) {
            Some(n) => n,
            None => {
                self.malformed(key, value);
                0.0
            }
        }
    }

    fn record(&self, wins: &str, losses: &str, ot: &str) -> Record {
        Record {
            wins: self.count(wins).max(0) as u32,
            losses: self.count(losses).max(0) as u32,
            ot_losses: self.count(ot).max(0) as u32,
        }
    }
}

pub fn parse_club_schedule_json(raw: &str) -> Result<Vec<GameRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    Ok(parse_games(root.get("games")))
}

/// Games for `date` out of the week-shaped daily schedule payload.
pub fn parse_daily_schedule_json(raw: &str, date: &str) -> Result<Vec<GameRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid daily schedule json")?;

    if let Some(week) = root.get("gameWeek").and_then(|v| v.as_array()) {
        let day = week
            .iter()
            .find(|d| d.get("date").and_then(|x| x.as_str()) == Some(date))
            .or_else(|| week.first());
        return Ok(parse_games(day.and_then(|d| d.get("games"))));
    }
    Ok(parse_games(root.get("games")))
}

/// Every day of the `gameWeek` block. Days without a date are skipped.
pub fn parse_weekly_schedule_json(raw: &str) -> Result<Vec<(String, Vec<GameRecord>)>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid weekly schedule json")?;
    let Some(week) = root.get("gameWeek").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };
    Ok(week
        .iter()
        .filter_map(|day| {
            let date = pick_text(day, &["date"])?;
            Some((date, parse_games(day.get("games"))))
        })
        .collect())
}

fn parse_games(value: Option<&Value>) -> Vec<GameRecord> {
    let Some(arr) = value.and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    arr.iter().filter_map(normalize_game).collect()
}

pub fn normalize_game(v: &Value) -> Option<GameRecord> {
    let home = normalize_side(v.get("homeTeam")?)?;
    let away = normalize_side(v.get("awayTeam")?)?;
    let id = v.get("id").and_then(as_number).map(|n| n as u64).unwrap_or(0);
    let start_time_utc = pick_text(v, &["startTimeUTC"]);
    let date = pick_text(v, &["gameDate"])
        .or_else(|| start_time_utc.as_ref().and_then(|s| s.get(..10)).map(str::to_string))
        .unwrap_or_default();
    let game_state = pick_text(v, &["gameState"]).unwrap_or_default();
    let last_period_type = v
        .get("gameOutcome")
        .and_then(|o| o.get("lastPeriodType"))
        .and_then(|x| x.as_str())
        .and_then(parse_period_type);

    Some(GameRecord {
        id,
        date,
        start_time_utc,
        game_state,
        home,
        away,
        last_period_type,
        venue: pick_text(v, &["venue"]),
        broadcasts: v
            .get("tvBroadcasts")
            .and_then(|b| b.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|b| pick_text(b, &["network"]))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn normalize_side(v: &Value) -> Option<GameSide> {
    let abbrev = pick_text(v, &["abbrev", "teamAbbrev", "triCode"])?;
    let score = v
        .get("score")
        .and_then(as_number)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32);
    Some(GameSide { abbrev, score })
}

fn parse_period_type(raw: &str) -> Option<PeriodType> {
    match raw.to_ascii_uppercase().as_str() {
        "REG" => Some(PeriodType::Regulation),
        "OT" => Some(PeriodType::Overtime),
        "SO" => Some(PeriodType::Shootout),
        _ => None,
    }
}

/// Localized fields arrive either as plain strings or as `{"default": "..."}`.
fn as_text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("default").and_then(|v| v.as_str())?,
        _ => return None,
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn pick_text(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(text) = value.get(*key).and_then(as_text) {
            return Some(text);
        }
    }
    None
}

fn as_number(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return n.is_finite().then_some(n);
    }
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
