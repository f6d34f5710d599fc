use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodType {
    Regulation,
    Overtime,
    Shootout,
}

impl PeriodType {
    pub fn note(self) -> Option<&'static str> {
        match self {
            PeriodType::Regulation => None,
            PeriodType::Overtime => Some("OT"),
            PeriodType::Shootout => Some("SO"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodType::Regulation => "Regulation",
            PeriodType::Overtime => "Overtime",
            PeriodType::Shootout => "Shootout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    NoResult,
}

impl GameResult {
    pub fn letter(self) -> &'static str {
        match self {
            GameResult::Win => "W",
            GameResult::Loss => "L",
            GameResult::NoResult => "—",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSide {
    pub abbrev: String,
    pub score: Option<u32>,
}

/// One scheduled or completed game, normalized from the schedule endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    /// `YYYY-MM-DD`; string order is chronological.
    pub date: String,
    pub start_time_utc: Option<String>,
    pub game_state: String,
    pub home: GameSide,
    pub away: GameSide,
    pub last_period_type: Option<PeriodType>,
    pub venue: Option<String>,
    /// TV networks, in upstream order.
    #[serde(default)]
    pub broadcasts: Vec<String>,
}

impl GameRecord {
    pub fn new(
        date: impl Into<String>,
        home: impl Into<String>,
        away: impl Into<String>,
        home_score: Option<u32>,
        away_score: Option<u32>,
    ) -> Self {
        Self {
            date: date.into(),
            game_state: "OFF".to_string(),
            home: GameSide {
                abbrev: home.into(),
                score: home_score,
            },
            away: GameSide {
                abbrev: away.into(),
                score: away_score,
            },
            ..Self::default()
        }
    }

    pub fn has_scores(&self) -> bool {
        self.home.score.is_some() && self.away.score.is_some()
    }

    pub fn is_live(&self) -> bool {
        matches!(self.game_state.as_str(), "LIVE" | "CRIT")
    }

    pub fn is_final(&self) -> bool {
        matches!(self.game_state.as_str(), "FINAL" | "OFFICIAL")
            || self.last_period_type.is_some()
            || (self.has_scores() && self.game_state == "OFF")
    }

    pub fn involves(&self, abbrev: &str) -> bool {
        self.home.abbrev == abbrev || self.away.abbrev == abbrev
    }

    /// Abbreviation of the winning side for a final game with two distinct scores.
    pub fn winner(&self) -> Option<&str> {
        if !self.is_final() {
            return None;
        }
        let (home, away) = (self.home.score?, self.away.score?);
        if home > away {
            Some(&self.home.abbrev)
        } else if away > home {
            Some(&self.away.abbrev)
        } else {
            None
        }
    }

    pub fn result_for(&self, abbrev: &str) -> GameResult {
        let (own, opp) = if self.home.abbrev == abbrev {
            (self.home.score, self.away.score)
        } else if self.away.abbrev == abbrev {
            (self.away.score, self.home.score)
        } else {
            return GameResult::NoResult;
        };
        let (own, opp) = (own.unwrap_or(0), opp.unwrap_or(0));
        if own > opp {
            GameResult::Win
        } else if own < opp {
            GameResult::Loss
        } else {
            GameResult::NoResult
        }
    }

    /// Started or about to start, but not final yet. A day holding one of these still
    /// needs refreshing after the calendar date has moved on.
    pub fn is_unsettled(&self) -> bool {
        self.is_live() || self.game_state == "PRE"
    }

    pub fn matchup_text(&self) -> String {
        format!("{} @ {}", self.away.abbrev, self.home.abbrev)
    }

    /// `away - home`, with an `(OT)`/`(SO)` suffix once decided past regulation.
    pub fn score_text(&self) -> Option<String> {
        let (a, h) = (self.away.score?, self.home.score?);
        let note = self
            .last_period_type
            .and_then(PeriodType::note)
            .map(|n| format!(" ({n})"))
            .unwrap_or_default();
        Some(format!("{a} - {h}{note}"))
    }

    pub fn broadcast_text(&self) -> String {
        self.broadcasts.join(", ")
    }

    /// Calendar date in Eastern time, falling back to the upstream game date.
    pub fn local_date(&self) -> String {
        self.start_time_utc
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
            .map(|dt| {
                (dt.with_timezone(&Utc) - chrono::Duration::hours(5))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .unwrap_or_else(|| self.date.clone())
    }

    pub fn sort_key(&self) -> String {
        self.start_time_utc
            .clone()
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Most recent final game for `abbrev` in a season schedule, with its result.
pub fn last_completed_game<'a>(
    games: &'a [GameRecord],
    abbrev: &str,
) -> Option<(GameResult, &'a GameRecord)> {
    games
        .iter()
        .filter(|g| g.involves(abbrev) && g.is_final())
        .max_by_key(|g| g.sort_key())
        .map(|g| (g.result_for(abbrev), g))
}

/// Last-game letter for the standings table: prefer the streak code when it already says
/// W or L, otherwise look at the schedule.
pub fn last_result_letter(
    streak_code: Option<&str>,
    schedule: Option<&[GameRecord]>,
    abbrev: &str,
) -> GameResult {
    match streak_code {
        Some("W") => return GameResult::Win,
        Some("L") => return GameResult::Loss,
        _ => {}
    }
    schedule
        .and_then(|games| last_completed_game(games, abbrev))
        .map(|(result, _)| result)
        .unwrap_or(GameResult::NoResult)
}

/// Season identifier such as `20242025`; seasons roll over in October.
pub fn season_for_date(date: NaiveDate) -> String {
    let start = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{start}{}", start + 1)
}

pub fn current_season() -> String {
    season_for_date(Utc::now().date_naive())
}

/// Short status line for a day's game: start time, live score or final score.
pub fn status_text(game: &GameRecord) -> String {
    let score = match (game.away.score, game.home.score) {
        (Some(a), Some(h)) => Some(format!("{a} - {h}")),
        _ => None,
    };
    if game.is_live() {
        return match score {
            Some(s) => format!("LIVE {s}"),
            None => "LIVE".to_string(),
        };
    }
    if game.is_final() {
        return match game.score_text() {
            Some(s) => format!("FINAL {s}"),
            None => "FINAL".to_string(),
        };
    }
    format_start_time(game.start_time_utc.as_deref())
}

/// Start time rendered in Eastern (fixed UTC-5, as the league's schedule pages do).
pub fn format_start_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "TBD".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => {
            let eastern = dt.with_timezone(&Utc) - chrono::Duration::hours(5);
            let text = eastern.format("%I:%M %p").to_string();
            text.trim_start_matches('0').to_string()
        }
        Err(_) => "TBD".to_string(),
    }
}
