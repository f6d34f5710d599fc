use nhl_terminal::playoffs::{cutoff_points, project_playoff_status, qualifies};
use nhl_terminal::standings::TeamStanding;

fn team(abbrev: &str, points: i32, division: Option<u32>, wildcard: Option<u32>) -> TeamStanding {
    TeamStanding {
        points,
        division_sequence: division,
        wildcard_sequence: wildcard,
        conference_sequence: Some(1),
        ..TeamStanding::new(abbrev)
    }
}

/// Eight qualifiers with points 100, 98, ... 86 plus two teams on the outside.
fn league() -> Vec<TeamStanding> {
    let mut teams: Vec<TeamStanding> = (0..6)
        .map(|i| team(&format!("D{i}"), 100 - 2 * i, Some((i % 3 + 1) as u32), None))
        .collect();
    teams.push(team("W1", 88, Some(4), Some(1)));
    teams.push(team("W2", 86, Some(5), Some(2)));
    teams.push(team("O1", 84, Some(6), Some(3)));
    teams.push(team("O2", 80, Some(7), Some(4)));
    teams
}

#[test]
fn division_top_three_always_qualifies() {
    let t = team("BOS", 10, Some(2), None);
    assert!(qualifies(&t));
    let proj = project_playoff_status(&t, &league());
    assert!(proj.in_playoffs);
    assert!(proj.explanation.starts_with("✔ IN PLAYOFFS"));
}

#[test]
fn wildcard_spots_qualify() {
    assert!(qualifies(&team("X", 0, Some(5), Some(2))));
    assert!(!qualifies(&team("X", 0, Some(5), Some(3))));
    assert!(!qualifies(&team("X", 0, None, None)));
}

#[test]
fn cutoff_is_eighth_best_qualifier() {
    let teams = league();
    assert_eq!(cutoff_points(&teams), Some(86));

    let out = teams.iter().find(|t| t.abbrev == "O1").expect("O1");
    let proj = project_playoff_status(out, &teams);
    assert!(!proj.in_playoffs);
    assert_eq!(proj.points_gap_to_cutoff, -2);
    assert_eq!(proj.cutoff_points, Some(86));
    assert!(proj.explanation.starts_with("✖ OUT OF PLAYOFFS"));
    assert!(proj.explanation.contains("2 points behind cutoff"));

    let leader = teams.iter().find(|t| t.abbrev == "D0").expect("D0");
    let proj = project_playoff_status(leader, &teams);
    assert_eq!(proj.points_gap_to_cutoff, 14);
    assert!(proj.explanation.contains("+14 points ahead of cutoff"));
}

#[test]
fn fewer_than_eight_qualifiers_has_zero_gap() {
    let mut teams = league();
    teams.retain(|t| t.abbrev != "W2");
    assert_eq!(teams.iter().filter(|t| qualifies(t)).count(), 7);
    assert_eq!(cutoff_points(&teams), None);
    for t in &teams {
        let proj = project_playoff_status(t, &teams);
        assert_eq!(proj.points_gap_to_cutoff, 0);
        assert_eq!(proj.cutoff_points, None);
        assert!(!proj.explanation.contains("cutoff"));
    }
}

#[test]
fn qualification_ignores_points() {
    let teams = league();
    let rich_outsider = team("RICH", 200, Some(8), Some(5));
    let proj = project_playoff_status(&rich_outsider, &teams);
    assert!(!proj.in_playoffs);
    assert_eq!(proj.points_gap_to_cutoff, 114);
}

#[test]
fn projection_is_idempotent() {
    let teams = league();
    for t in &teams {
        assert_eq!(
            project_playoff_status(t, &teams),
            project_playoff_status(t, &teams)
        );
    }
}

#[test]
fn extreme_points_saturate_the_gap() {
    let mut teams: Vec<TeamStanding> = (0..8)
        .map(|i| team(&format!("Q{i}"), i32::MAX, Some(i % 3 + 1), None))
        .collect();
    teams.push(team("LOW", i32::MIN, Some(9), Some(9)));

    let low = teams.last().expect("LOW").clone();
    let proj = project_playoff_status(&low, &teams);
    assert!(!proj.in_playoffs);
    assert_eq!(proj.cutoff_points, Some(i32::MAX));
    assert_eq!(proj.points_gap_to_cutoff, i32::MIN);
    assert!(proj.explanation.contains("2147483648 points behind cutoff"));

    let top = project_playoff_status(&teams[0], &teams);
    assert_eq!(top.points_gap_to_cutoff, 0);
}

#[test]
fn parsed_extreme_points_are_neutralized() {
    let raw = r#"{"standings": [
        {"teamAbbrev": "OUT", "points": -1e12, "divisionSequence": 6, "wildcardSequence": 5}
    ]}"#;
    let snapshot =
        nhl_terminal::nhl_api::parse_standings_json(raw, "2024-01-15").expect("should parse");
    let mut teams = league();
    teams.extend(snapshot.teams);
    let out = teams.last().expect("OUT").clone();
    assert_eq!(out.points, 0);
    let proj = project_playoff_status(&out, &teams);
    assert_eq!(proj.points_gap_to_cutoff, -86);
}
