use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nhl_terminal::matchup::aggregate_head_to_head;
use nhl_terminal::nhl_api::parse_standings_json;
use nhl_terminal::playoffs::project_playoff_status;
use nhl_terminal::schedule::GameRecord;
use nhl_terminal::standings::{StandingsSnapshot, TeamStanding};
use nhl_terminal::state::{AppState, Delta, apply_delta};

const ABBREVS: [&str; 32] = [
    "ANA", "BOS", "BUF", "CGY", "CAR", "CHI", "COL", "CBJ", "DAL", "DET", "EDM", "FLA", "LAK",
    "MIN", "MTL", "NSH", "NJD", "NYI", "NYR", "OTT", "PHI", "PIT", "SJS", "SEA", "STL", "TBL",
    "TOR", "UTA", "VAN", "VGK", "WSH", "WPG",
];

fn league(shift: u32) -> Vec<TeamStanding> {
    ABBREVS
        .iter()
        .enumerate()
        .map(|(i, abbrev)| {
            let seq = (i as u32 + shift) % 32 + 1;
            TeamStanding {
                team_name: format!("{abbrev} Club"),
                league_sequence: Some(seq),
                division_sequence: Some(i as u32 % 8 + 1),
                wildcard_sequence: Some(i as u32 % 10 + 1),
                points: 100 - seq as i32,
                wins: 50 - seq as i32 / 2,
                goal_for: 200,
                goal_against: 150 + seq as i32,
                goal_differential: 50 - seq as i32,
                point_pctg: 0.7 - seq as f64 / 100.0,
                ..TeamStanding::new(*abbrev)
            }
        })
        .collect()
}

fn standings_json() -> String {
    let rows: Vec<String> = league(0)
        .iter()
        .map(|t| {
            format!(
                r#"{{"teamAbbrev":{{"default":"{}"}},"teamName":{{"default":"{}"}},"leagueSequence":{},"divisionSequence":{},"points":{},"wins":{},"goalFor":{},"goalAgainst":{},"goalDifferential":{},"pointPctg":{}}}"#,
                t.abbrev,
                t.team_name,
                t.league_sequence.unwrap_or(0),
                t.division_sequence.unwrap_or(0),
                t.points,
                t.wins,
                t.goal_for,
                t.goal_against,
                t.goal_differential,
                t.point_pctg
            )
        })
        .collect();
    format!(r#"{{"standings":[{}]}}"#, rows.join(","))
}

fn bench_standings_parse(c: &mut Criterion) {
    let raw = standings_json();
    c.bench_function("standings_parse", |b| {
        b.iter(|| {
            let snapshot = parse_standings_json(black_box(&raw), "2024-01-15").unwrap();
            black_box(snapshot.len());
        })
    });
}

fn bench_standings_rows(c: &mut Criterion) {
    let mut state = AppState::new(2, "2024-01-15".to_string());
    apply_delta(
        &mut state,
        Delta::SetStandings(StandingsSnapshot::new("2024-01-15", league(0))),
    );
    apply_delta(
        &mut state,
        Delta::SetReference {
            days: 2,
            snapshot: StandingsSnapshot::new("2024-01-13", league(3)),
        },
    );
    c.bench_function("standings_rows", |b| {
        b.iter(|| {
            let rows = black_box(&state).standings_rows();
            black_box(rows.len());
        })
    });
}

fn bench_playoff_projection(c: &mut Criterion) {
    let teams = league(0);
    c.bench_function("playoff_projection", |b| {
        b.iter(|| {
            for team in &teams {
                black_box(project_playoff_status(black_box(team), &teams));
            }
        })
    });
}

fn bench_head_to_head(c: &mut Criterion) {
    let games: Vec<GameRecord> = (0..82u32)
        .map(|i| {
            let opp = ABBREVS[(i as usize) % 32];
            let date = format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1);
            if i % 2 == 0 {
                GameRecord::new(date, "BOS", opp, Some(i % 5), Some(i % 3))
            } else {
                GameRecord::new(date, opp, "BOS", Some(i % 4), Some(i % 6))
            }
        })
        .collect();
    c.bench_function("head_to_head", |b| {
        b.iter(|| {
            let h2h = aggregate_head_to_head(black_box(&games), "BOS", "TOR");
            black_box(h2h.team_a_wins);
        })
    });
}

criterion_group!(
    perf,
    bench_standings_parse,
    bench_standings_rows,
    bench_playoff_projection,
    bench_head_to_head
);
criterion_main!(perf);
