use crate::standings::TeamStanding;

/// Top three in a division qualify outright.
pub const DIVISION_SPOTS: u32 = 3;
/// Two wild cards per conference.
pub const WILDCARD_SPOTS: u32 = 2;
/// Cutoff is read off the 8th best qualifier by points.
pub const CUTOFF_INDEX: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayoffProjection {
    pub in_playoffs: bool,
    /// Team points minus cutoff points; zero when fewer than eight teams qualify.
    pub points_gap_to_cutoff: i32,
    pub cutoff_points: Option<i32>,
    pub explanation: String,
}

pub fn qualifies(team: &TeamStanding) -> bool {
    team.division_sequence.is_some_and(|r| r <= DIVISION_SPOTS)
        || team.wildcard_sequence.is_some_and(|r| r <= WILDCARD_SPOTS)
}

/// Points of the 8th best qualifying team league-wide, if there are at least eight.
pub fn cutoff_points(teams: &[TeamStanding]) -> Option<i32> {
    let mut points: Vec<i32> = teams
        .iter()
        .filter(|t| qualifies(t))
        .map(|t| t.points)
        .collect();
    points.sort_by(|a, b| b.cmp(a));
    points.get(CUTOFF_INDEX).copied()
}

/// "If the season ended today" status for `team` within the snapshot `teams`.
pub fn project_playoff_status(team: &TeamStanding, teams: &[TeamStanding]) -> PlayoffProjection {
    let in_playoffs = qualifies(team);
    let cutoff = cutoff_points(teams);
    let gap = cutoff.map(|c| team.points.saturating_sub(c)).unwrap_or(0);

    PlayoffProjection {
        in_playoffs,
        points_gap_to_cutoff: gap,
        cutoff_points: cutoff,
        explanation: explain(team, in_playoffs, cutoff, gap),
    }
}

fn explain(team: &TeamStanding, in_playoffs: bool, cutoff: Option<i32>, gap: i32) -> String {
    let mut lines = Vec::with_capacity(5);
    if in_playoffs {
        lines.push("✔ IN PLAYOFFS".to_string());
        if team.division_sequence.is_some_and(|r| r <= DIVISION_SPOTS) {
            lines.push(format!("Division rank: {}", rank_text(team.division_sequence)));
        } else {
            lines.push(format!("Wild card rank: {}", rank_text(team.wildcard_sequence)));
        }
    } else {
        lines.push("✖ OUT OF PLAYOFFS".to_string());
        lines.push(format!("Division rank: {}", rank_text(team.division_sequence)));
        lines.push(format!("Wild card rank: {}", rank_text(team.wildcard_sequence)));
    }
    lines.push(format!(
        "Conference rank: {}",
        rank_text(team.conference_sequence)
    ));
    lines.push(format!("Points: {}", team.points));

    if let Some(cutoff) = cutoff {
        if in_playoffs && gap > 0 {
            lines.push(format!("+{gap} points ahead of cutoff"));
        } else if !in_playoffs && cutoff > 0 {
            lines.push(format!("{} points behind cutoff", gap.unsigned_abs()));
        }
    }
    lines.join("\n")
}

fn rank_text(rank: Option<u32>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_else(|| "—".to_string())
}
