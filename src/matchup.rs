use crate::schedule::{GameRecord, GameResult, PeriodType};
use crate::standings::TeamStanding;

/// Each head-to-head win adds this much to a side's strength.
pub const H2H_WIN_BONUS: f64 = 1.4;
/// Strength gaps below this are called a toss-up.
pub const CLOSE_THRESHOLD: f64 = 0.75;

/// Coefficients of the matchup strength sum. Goals against counts negatively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthWeights {
    pub points: f64,
    pub goal_differential: f64,
    pub point_pctg: f64,
    pub wins: f64,
    pub regulation_plus_ot_wins: f64,
    pub goal_against: f64,
}

impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            points: 1.3,
            goal_differential: 0.7,
            point_pctg: 0.4,
            wins: 0.35,
            regulation_plus_ot_wins: 0.5,
            goal_against: -0.25,
        }
    }
}

/// Coarse comparative score from standings fields. Not a predictive model.
pub fn compute_matchup_strength(team: &TeamStanding, weights: &StrengthWeights) -> f64 {
    weights.points * team.points as f64
        + weights.goal_differential * team.goal_differential as f64
        + weights.point_pctg * team.point_pctg
        + weights.wins * team.wins as f64
        + weights.regulation_plus_ot_wins * team.regulation_plus_ot_wins as f64
        + weights.goal_against * team.goal_against as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    pub fn label(self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
        }
    }
}

/// One game between the pair, seen from team A.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadToHeadGame {
    pub date: String,
    pub location: Location,
    pub result: GameResult,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub period: Option<PeriodType>,
}

impl HeadToHeadGame {
    pub fn score_text(&self) -> String {
        format!("{} – {}", self.team_a_score, self.team_b_score)
    }

    pub fn note(&self) -> &'static str {
        self.period.and_then(PeriodType::note).unwrap_or("—")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,
    pub games: Vec<HeadToHeadGame>,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub summary: String,
}

/// Games played strictly between `team_a` and `team_b` with both scores known, newest first.
pub fn aggregate_head_to_head(games: &[GameRecord], team_a: &str, team_b: &str) -> HeadToHead {
    let mut rows: Vec<HeadToHeadGame> = games
        .iter()
        .filter_map(|game| head_to_head_row(game, team_a, team_b))
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let team_a_wins = rows.iter().filter(|g| g.result == GameResult::Win).count() as u32;
    let team_b_wins = rows.iter().filter(|g| g.result == GameResult::Loss).count() as u32;
    let summary = if rows.is_empty() {
        format!("No head-to-head games between {team_a} and {team_b} yet.")
    } else {
        format!(
            "{team_a} has beaten {team_b} {team_a_wins} times this season (versus {team_b_wins} losses)."
        )
    };

    HeadToHead {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        games: rows,
        team_a_wins,
        team_b_wins,
        summary,
    }
}

fn head_to_head_row(game: &GameRecord, team_a: &str, team_b: &str) -> Option<HeadToHeadGame> {
    if team_a == team_b {
        return None;
    }
    let (location, a_score, b_score) = if game.home.abbrev == team_a && game.away.abbrev == team_b
    {
        (Location::Home, game.home.score?, game.away.score?)
    } else if game.away.abbrev == team_a && game.home.abbrev == team_b {
        (Location::Away, game.away.score?, game.home.score?)
    } else {
        return None;
    };
    let result = if a_score > b_score {
        GameResult::Win
    } else if a_score < b_score {
        GameResult::Loss
    } else {
        GameResult::NoResult
    };
    Some(HeadToHeadGame {
        date: game.date.clone(),
        location,
        result,
        team_a_score: a_score,
        team_b_score: b_score,
        period: game.last_period_type,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    TeamA,
    TeamB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Close,
    Favored(Side),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPrediction {
    pub strength_a: f64,
    pub strength_b: f64,
    pub verdict: Verdict,
    pub summary: String,
}

impl MatchupPrediction {
    pub fn diff(&self) -> f64 {
        (self.strength_a - self.strength_b).abs()
    }
}

/// Strength of both sides plus head-to-head bonus, with a close-call band.
pub fn predict_matchup(
    team_a: &TeamStanding,
    team_b: &TeamStanding,
    h2h: Option<&HeadToHead>,
    weights: &StrengthWeights,
) -> MatchupPrediction {
    let (a_wins, b_wins) = h2h
        .map(|h| (h.team_a_wins, h.team_b_wins))
        .unwrap_or((0, 0));
    let strength_a = compute_matchup_strength(team_a, weights) + a_wins as f64 * H2H_WIN_BONUS;
    let strength_b = compute_matchup_strength(team_b, weights) + b_wins as f64 * H2H_WIN_BONUS;

    let diff = (strength_a - strength_b).abs();
    let label_a = matchup_label(team_a);
    let label_b = matchup_label(team_b);
    let (verdict, summary) = if diff < CLOSE_THRESHOLD {
        (
            Verdict::Close,
            format!(
                "Expected to be very close: {label_a} ({strength_a:.1}) vs {label_b} ({strength_b:.1})."
            ),
        )
    } else {
        let (side, favorite) = if strength_a > strength_b {
            (Side::TeamA, label_a)
        } else {
            (Side::TeamB, label_b)
        };
        (
            Verdict::Favored(side),
            format!(
                "{favorite} holds the edge ({strength_a:.1} vs {strength_b:.1}, diff {diff:.1})."
            ),
        )
    };

    MatchupPrediction {
        strength_a,
        strength_b,
        verdict,
        summary,
    }
}

fn matchup_label(team: &TeamStanding) -> String {
    if team.team_name.trim().is_empty() {
        team.abbrev.clone()
    } else {
        format!("{} {}", team.abbrev, team.team_name)
    }
}
