use crate::standings::{StandingsSnapshot, TeamStanding};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTrend {
    Improved,
    Worsened,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankArrow {
    Up,
    Down,
    Steady,
}

impl RankArrow {
    pub fn symbol(self) -> &'static str {
        match self {
            RankArrow::Up => "↑",
            RankArrow::Down => "↓",
            RankArrow::Steady => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedStat {
    Wins,
    Points,
    PointPctg,
    GoalFor,
    GoalAgainst,
    GoalDifferential,
}

impl TrackedStat {
    pub const ALL: [TrackedStat; 6] = [
        TrackedStat::Wins,
        TrackedStat::Points,
        TrackedStat::PointPctg,
        TrackedStat::GoalFor,
        TrackedStat::GoalAgainst,
        TrackedStat::GoalDifferential,
    ];

    pub fn higher_is_better(self) -> bool {
        !matches!(self, TrackedStat::GoalAgainst)
    }

    pub fn value(self, team: &TeamStanding) -> f64 {
        match self {
            TrackedStat::Wins => team.wins as f64,
            TrackedStat::Points => team.points as f64,
            TrackedStat::PointPctg => team.point_pctg,
            TrackedStat::GoalFor => team.goal_for as f64,
            TrackedStat::GoalAgainst => team.goal_against as f64,
            TrackedStat::GoalDifferential => team.goal_differential as f64,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackedStat::Wins => "W",
            TrackedStat::Points => "Pts",
            TrackedStat::PointPctg => "P%",
            TrackedStat::GoalFor => "GF",
            TrackedStat::GoalAgainst => "GA",
            TrackedStat::GoalDifferential => "DIFF",
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            TrackedStat::PointPctg => format!("{value:.3}"),
            _ => format!("{value:.0}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatDelta {
    pub stat: TrackedStat,
    pub current: f64,
    pub reference: Option<f64>,
    pub trend: StatTrend,
}

impl StatDelta {
    /// "ref → current" text for changed stats.
    pub fn change_text(&self) -> Option<String> {
        let reference = self.reference?;
        if self.trend == StatTrend::Unchanged {
            return None;
        }
        Some(format!(
            "{} → {}",
            self.stat.format(reference),
            self.stat.format(self.current)
        ))
    }
}

/// Places gained since the reference snapshot. Zero whenever either side has no rank.
pub fn compute_rank_delta(
    current: &StandingsSnapshot,
    reference: &StandingsSnapshot,
    abbrev: &str,
) -> i32 {
    let now = current.get(abbrev).and_then(|t| t.league_sequence);
    let then = reference.get(abbrev).and_then(|t| t.league_sequence);
    match (now, then) {
        (Some(now), Some(then)) => i32::try_from(i64::from(then) - i64::from(now)).unwrap_or(0),
        _ => 0,
    }
}

pub fn rank_arrow(delta: i32) -> RankArrow {
    if delta > 0 {
        RankArrow::Up
    } else if delta < 0 {
        RankArrow::Down
    } else {
        RankArrow::Steady
    }
}

/// Values are compared as f64 so integer counts and percentages behave alike.
pub fn classify_stat_trend(
    current: impl Into<f64>,
    reference: impl Into<f64>,
    higher_is_better: bool,
) -> StatTrend {
    let current = current.into();
    let reference = reference.into();
    if !current.is_finite() || !reference.is_finite() {
        return StatTrend::Unchanged;
    }
    let (better, worse) = if higher_is_better {
        (current > reference, current < reference)
    } else {
        (current < reference, current > reference)
    };
    if better {
        StatTrend::Improved
    } else if worse {
        StatTrend::Worsened
    } else {
        StatTrend::Unchanged
    }
}

/// One delta row per tracked stat. A team missing from the reference gets no reference
/// values and an unchanged trend everywhere.
pub fn stat_deltas(team: &TeamStanding, reference: &StandingsSnapshot) -> Vec<StatDelta> {
    let previous = reference.get(&team.abbrev);
    TrackedStat::ALL
        .iter()
        .map(|&stat| {
            let current = stat.value(team);
            let reference = previous.map(|p| stat.value(p));
            let trend = reference
                .map(|r| classify_stat_trend(current, r, stat.higher_is_better()))
                .unwrap_or(StatTrend::Unchanged);
            StatDelta {
                stat,
                current,
                reference,
                trend,
            }
        })
        .collect()
}

/// Tooltip-style "prev → now" text for a moved rank.
pub fn rank_change_text(
    current: &StandingsSnapshot,
    reference: &StandingsSnapshot,
    abbrev: &str,
) -> Option<String> {
    let now = current.get(abbrev)?.league_sequence?;
    let then = reference.get(abbrev)?.league_sequence?;
    (now != then).then(|| format!("{then} → {now}"))
}
