use nhl_terminal::comparison::{RankArrow, StatTrend, TrackedStat};
use nhl_terminal::persist::{load_favorites, save_favorites};
use nhl_terminal::predictions::PickOutcome;
use nhl_terminal::schedule::{GameRecord, GameResult, PeriodType};
use nhl_terminal::standings::{StandingsSnapshot, TeamStanding};
use nhl_terminal::state::{
    AppState, Delta, MatchupFocus, ResultsColumn, Screen, SortColumn, SortOrder, apply_delta,
};

fn team(abbrev: &str, seq: u32, points: i32, division: u32) -> TeamStanding {
    TeamStanding {
        team_name: format!("{abbrev} Club"),
        league_sequence: Some(seq),
        division_sequence: Some(division),
        points,
        wins: points / 2,
        ..TeamStanding::new(abbrev)
    }
}

fn scheduled(id: u64, date: &str, home: &str, away: &str, start: &str) -> GameRecord {
    let mut game = GameRecord::new(date, home, away, None, None);
    game.id = id;
    game.game_state = "FUT".to_string();
    game.start_time_utc = Some(start.to_string());
    game
}

fn set_games(state: &mut AppState, date: &str, games: Vec<GameRecord>) {
    apply_delta(
        state,
        Delta::SetGames {
            date: date.to_string(),
            games,
        },
    );
}

fn state_with_standings() -> AppState {
    let mut state = AppState::new(2, "2024-01-15".to_string());
    let mut bos = team("BOS", 1, 58, 1);
    bos.streak_code = Some("OT".to_string());
    let teams = vec![bos, team("TOR", 2, 52, 2), team("MTL", 3, 40, 5)];
    apply_delta(
        &mut state,
        Delta::SetStandings(StandingsSnapshot::new("2024-01-15", teams)),
    );
    state
}

#[test]
fn rows_carry_rank_movement_and_trends() {
    let mut state = state_with_standings();
    let reference = StandingsSnapshot::new(
        "2024-01-13",
        vec![team("BOS", 2, 55, 1), team("TOR", 1, 52, 1)],
    );
    apply_delta(
        &mut state,
        Delta::SetReference {
            days: 2,
            snapshot: reference,
        },
    );

    let rows = state.standings_rows();
    assert_eq!(rows.len(), 3);
    let bos = &rows[0];
    assert_eq!(bos.team.abbrev, "BOS");
    assert_eq!(bos.rank_delta, 1);
    assert_eq!(bos.arrow, RankArrow::Up);
    assert_eq!(bos.rank_change.as_deref(), Some("2 → 1"));
    assert_eq!(
        bos.stat(TrackedStat::Points).map(|d| d.trend),
        Some(StatTrend::Improved)
    );

    let tor = &rows[1];
    assert_eq!(tor.arrow, RankArrow::Down);
    assert_eq!(
        tor.stat(TrackedStat::Points).map(|d| d.trend),
        Some(StatTrend::Unchanged)
    );

    let mtl = &rows[2];
    assert_eq!(mtl.rank_delta, 0);
    assert!(!mtl.playoff.in_playoffs);
}

#[test]
fn stale_reference_is_ignored() {
    let mut state = state_with_standings();
    state.compare_earlier();
    apply_delta(
        &mut state,
        Delta::SetReference {
            days: 2,
            snapshot: StandingsSnapshot::new("2024-01-13", vec![team("BOS", 3, 50, 1)]),
        },
    );
    assert!(state.reference.is_empty());
    assert_eq!(state.reference_date(), "2024-01-12");
}

#[test]
fn sort_cycles_through_three_states() {
    let mut state = state_with_standings();
    state.sort_column = SortColumn::Points;
    state.sort_order = SortOrder::Original;

    state.cycle_sort_order();
    let asc: Vec<String> = state
        .standings_rows()
        .iter()
        .map(|r| r.team.abbrev.clone())
        .collect();
    assert_eq!(asc, vec!["MTL", "TOR", "BOS"]);

    state.cycle_sort_order();
    assert_eq!(state.sort_order, SortOrder::Descending);
    assert_eq!(state.standings_rows()[0].team.abbrev, "BOS");

    state.cycle_sort_order();
    assert_eq!(state.sort_order, SortOrder::Original);
    assert_eq!(state.standings_rows()[2].team.abbrev, "MTL");
}

#[test]
fn last_result_uses_streak_then_schedule() {
    let mut state = state_with_standings();
    let rows = state.standings_rows();
    assert_eq!(rows[0].last_result, GameResult::NoResult);
    drop(rows);

    assert_eq!(state.schedules_to_request(), vec!["BOS", "TOR", "MTL"]);

    apply_delta(
        &mut state,
        Delta::SetTeamSchedule {
            abbrev: "BOS".to_string(),
            games: vec![
                GameRecord::new("2024-01-10", "BOS", "TOR", Some(4), Some(1)),
                GameRecord::new("2024-01-13", "MTL", "BOS", Some(3), Some(2)),
            ],
        },
    );
    let rows = state.standings_rows();
    assert_eq!(rows[0].last_result, GameResult::Loss);
}

#[test]
fn empty_refresh_keeps_previous_table() {
    let mut state = state_with_standings();
    apply_delta(
        &mut state,
        Delta::SetStandings(StandingsSnapshot::empty("2024-01-15")),
    );
    assert_eq!(state.standings.len(), 3);
    assert!(state.logs.back().is_some_and(|l| l.contains("empty")));
}

#[test]
fn selection_follows_team_across_refresh() {
    let mut state = state_with_standings();
    state.select_next();
    assert_eq!(state.selected_team().map(|t| t.abbrev.as_str()), Some("TOR"));

    let reordered = vec![
        team("TOR", 1, 60, 1),
        team("BOS", 2, 58, 2),
        team("MTL", 3, 40, 5),
    ];
    apply_delta(
        &mut state,
        Delta::SetStandings(StandingsSnapshot::new("2024-01-15", reordered)),
    );
    assert_eq!(state.selected_team().map(|t| t.abbrev.as_str()), Some("TOR"));
}

#[test]
fn favorites_toggle_and_persist() {
    let mut state = state_with_standings();
    state.toggle_favorite("TOR");
    assert!(state.standings_rows()[1].favorite);
    state.toggle_favorite("TOR");
    assert!(state.favorites.is_empty());

    state.toggle_favorite("MTL");
    let dir = std::env::temp_dir().join(format!("nhl_terminal_favs_{}", std::process::id()));
    save_favorites(Some(&dir), &state.favorites).expect("save");
    assert_eq!(load_favorites(Some(&dir)), state.favorites);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn matchup_view_uses_loaded_schedule() {
    let mut state = state_with_standings();
    state.screen = Screen::Matchup;
    let view = state.matchup_view().expect("two teams");
    assert_eq!(view.team_a.abbrev, "BOS");
    assert_eq!(view.team_b.abbrev, "TOR");
    assert!(view.head_to_head.is_none());

    apply_delta(
        &mut state,
        Delta::SetTeamSchedule {
            abbrev: "BOS".to_string(),
            games: vec![GameRecord::new("2024-01-10", "BOS", "TOR", Some(4), Some(1))],
        },
    );
    let view = state.matchup_view().expect("two teams");
    assert_eq!(view.head_to_head.as_ref().map(|h| h.team_a_wins), Some(1));

    state.matchup_focus = MatchupFocus::TeamB;
    state.select_next();
    let view = state.matchup_view().expect("two teams");
    assert_eq!(view.team_b.abbrev, "MTL");

    state.swap_matchup();
    let view = state.matchup_view().expect("two teams");
    assert_eq!(view.team_a.abbrev, "MTL");
}

#[test]
fn same_team_matchup_has_no_view() {
    let mut state = state_with_standings();
    state.matchup_b = state.matchup_a;
    assert!(state.matchup_view().is_none());
}

#[test]
fn picks_cycle_and_resolve_against_games() {
    let mut state = state_with_standings();
    state.screen = Screen::Games;
    let mut final_game = GameRecord::new("2024-01-15", "BOS", "TOR", Some(4), Some(1));
    final_game.id = 20;
    apply_delta(
        &mut state,
        Delta::SetGames {
            date: "2024-01-15".to_string(),
            games: vec![final_game],
        },
    );

    assert!(state.cycle_pick());
    let rows = state.game_rows();
    assert_eq!(
        rows[0].prediction.and_then(|p| p.pick.as_deref()),
        Some("TOR")
    );
    assert_eq!(rows[0].outcome, PickOutcome::Incorrect);

    assert!(state.cycle_pick());
    assert!(state.cycle_confidence());
    let rows = state.game_rows();
    assert_eq!(rows[0].outcome, PickOutcome::Correct);
    assert_eq!(rows[0].prediction.and_then(|p| p.confidence), Some(1));

    let summary = state.prediction_summary();
    assert_eq!((summary.total.correct, summary.total.total), (1, 1));
    assert_eq!(summary.streak, 1);

    assert!(state.cycle_pick());
    assert!(state.game_rows()[0].prediction.is_none());
}

#[test]
fn logs_are_bounded() {
    let mut state = AppState::new(2, "2024-01-15".to_string());
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
    assert_eq!(
        state.recent_logs(3),
        vec!["line 247", "line 248", "line 249"]
    );
}

#[test]
fn compare_days_stay_in_range() {
    let mut state = AppState::new(1, "2024-03-01".to_string());
    state.compare_later();
    assert_eq!(state.compare_days, 1);
    state.compare_earlier();
    assert_eq!(state.reference_date(), "2024-02-28");
    state.reset_comparison();
    assert_eq!(state.compare_days, 1);
}

#[test]
fn upcoming_rows_cover_the_next_seven_days() {
    let mut state = state_with_standings();
    let dates = state.upcoming_dates();
    assert_eq!(dates.len(), 7);
    assert_eq!(dates.last().map(String::as_str), Some("2024-01-21"));

    let mut late = scheduled(2, "2024-01-16", "SEA", "VAN", "2024-01-17T03:00:00Z");
    late.venue = Some("Climate Pledge Arena".to_string());
    late.broadcasts = vec!["SN".to_string(), "ESPN+".to_string()];
    let early = scheduled(1, "2024-01-16", "BOS", "TOR", "2024-01-17T00:00:00Z");
    set_games(&mut state, "2024-01-16", vec![late, early]);
    set_games(
        &mut state,
        "2024-01-22",
        vec![scheduled(3, "2024-01-22", "MTL", "OTT", "2024-01-23T00:00:00Z")],
    );

    let rows = state.upcoming_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].matchup, "TOR @ BOS");
    assert_eq!(rows[0].time, "7:00 PM");
    assert!(!rows[0].favorite);
    assert!(rows[0].score.is_empty());
    assert_eq!(rows[1].date, "2024-01-16");
    assert_eq!(rows[1].venue, "Climate Pledge Arena");
    assert_eq!(rows[1].tv, "SN, ESPN+");

    let to_load = state.upcoming_dates_to_load();
    assert_eq!(to_load.len(), 6);
    assert!(!to_load.contains(&"2024-01-16".to_string()));
}

#[test]
fn results_are_past_finals_with_search_and_sort() {
    let mut state = state_with_standings();
    state.screen = Screen::Results;

    let mut garden = GameRecord::new("2024-01-10", "BOS", "TOR", Some(4), Some(1));
    garden.venue = Some("TD Garden".to_string());
    garden.start_time_utc = Some("2024-01-11T00:00:00Z".to_string());
    let mut overtime = GameRecord::new("2024-01-12", "MTL", "BOS", Some(2), Some(3));
    overtime.last_period_type = Some(PeriodType::Overtime);
    overtime.venue = Some("Bell Centre".to_string());
    set_games(&mut state, "2024-01-10", vec![garden]);
    set_games(
        &mut state,
        "2024-01-11",
        vec![scheduled(9, "2024-01-11", "CHI", "DAL", "2024-01-12T01:00:00Z")],
    );
    set_games(&mut state, "2024-01-12", vec![overtime]);
    set_games(
        &mut state,
        "2024-01-15",
        vec![GameRecord::new("2024-01-15", "NYR", "NJD", Some(1), Some(0))],
    );

    let matchups = |state: &AppState| -> Vec<String> {
        state.results_rows().iter().map(|r| r.matchup.clone()).collect()
    };
    assert_eq!(matchups(&state), vec!["TOR @ BOS", "BOS @ MTL"]);
    assert_eq!(state.results_rows()[1].score, "3 - 2 (OT)");

    state.cycle_results_column();
    assert_eq!(state.results_column, ResultsColumn::Matchup);
    assert_eq!(state.results_order, SortOrder::Ascending);
    assert_eq!(matchups(&state), vec!["BOS @ MTL", "TOR @ BOS"]);
    state.cycle_results_order();
    assert_eq!(matchups(&state), vec!["TOR @ BOS", "BOS @ MTL"]);
    state.cycle_results_order();
    state.cycle_results_order();
    assert_eq!(state.results_order, SortOrder::Ascending);

    for c in "GARDEN".chars() {
        state.push_search_char(c);
    }
    assert_eq!(matchups(&state), vec!["TOR @ BOS"]);
    for _ in 0..6 {
        state.pop_search_char();
    }
    state.push_search_char('m');
    state.push_search_char('t');
    state.push_search_char('l');
    assert_eq!(matchups(&state), vec!["BOS @ MTL"]);
    state.push_search_char('x');
    assert!(state.results_rows().is_empty());
}

#[test]
fn season_weeks_start_in_october() {
    let mut state = state_with_standings();
    let weeks = state.season_week_starts();
    assert_eq!(weeks.len(), 16);
    assert_eq!(weeks.first().map(String::as_str), Some("2023-10-01"));
    assert_eq!(weeks.last().map(String::as_str), Some("2024-01-14"));

    state.weeks_requested.extend(weeks);
    assert_eq!(state.weeks_to_request(), vec!["2024-01-14".to_string()]);

    let opening_day = AppState::new(2, "2024-10-01".to_string());
    assert!(opening_day.season_week_starts().is_empty());
}

#[test]
fn game_detail_shows_records_venue_and_period() {
    let mut state = state_with_standings();
    state.screen = Screen::Games;
    let mut shootout = GameRecord::new("2024-01-15", "BOS", "TOR", Some(3), Some(2));
    shootout.id = 30;
    shootout.last_period_type = Some(PeriodType::Shootout);
    shootout.venue = Some("TD Garden".to_string());
    shootout.broadcasts = vec!["NESN".to_string()];
    let upcoming = scheduled(31, "2024-01-15", "MTL", "SEA", "2024-01-16T00:30:00Z");
    set_games(&mut state, "2024-01-15", vec![shootout, upcoming]);

    let detail = state.game_detail().expect("selected game");
    assert_eq!(detail.home.map(|t| t.record_label()).as_deref(), Some("29-0-0"));
    assert_eq!(detail.away.map(|t| t.abbrev.as_str()), Some("TOR"));
    assert_eq!(detail.score.as_deref(), Some("2 - 3 (SO)"));
    assert_eq!(detail.period, Some("Shootout"));
    assert_eq!(detail.venue, "TD Garden");
    assert_eq!(detail.tv, "NESN");

    state.select_next();
    let detail = state.game_detail().expect("second game");
    assert!(detail.away.is_none());
    assert_eq!(detail.score, None);
    assert_eq!(detail.period, None);
    assert_eq!(detail.venue, "—");
    assert_eq!(detail.status, "7:30 PM");

    state.screen = Screen::Predictions;
    assert!(state.game_detail().is_none());
}

#[test]
fn today_rolls_forward_at_midnight() {
    let mut state = state_with_standings();
    state.screen = Screen::Games;
    set_games(
        &mut state,
        "2024-01-15",
        vec![
            GameRecord::new("2024-01-15", "BOS", "TOR", Some(4), Some(1)),
            GameRecord::new("2024-01-15", "NYR", "NJD", Some(2), Some(1)),
        ],
    );
    set_games(
        &mut state,
        "2024-01-16",
        vec![
            scheduled(40, "2024-01-16", "MTL", "OTT", "2024-01-17T00:00:00Z"),
            scheduled(41, "2024-01-16", "SEA", "VAN", "2024-01-17T03:00:00Z"),
        ],
    );
    state.select_next();
    assert_eq!(state.games_selected, 1);

    assert!(!state.roll_today("2024-01-15"));
    assert!(!state.roll_today("2024-01-14"));
    assert_eq!(state.today, "2024-01-15");

    assert!(state.roll_today("2024-01-16"));
    assert_eq!(state.today, "2024-01-16");
    assert_eq!(state.games_selected, 0);
    assert_eq!(state.today_games().len(), 2);
    let dates = state.upcoming_dates();
    assert_eq!(dates.first().map(String::as_str), Some("2024-01-16"));
    assert!(state.logs.iter().any(|l| l.contains("rolled over to 2024-01-16")));

    assert!(state.cycle_pick());
    assert_eq!(
        state
            .predictions
            .get("2024-01-16", "40")
            .and_then(|p| p.pick.as_deref()),
        Some("OTT")
    );
    assert!(state.predictions.get("2024-01-15", "40").is_none());
}
