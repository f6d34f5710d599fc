use std::collections::HashMap;

use nhl_terminal::persist::{load_predictions, save_predictions};
use nhl_terminal::predictions::{
    PickOutcome, PickRecord, PredictionBook, historical_picks, pick_outcome, prediction_stats,
};
use nhl_terminal::schedule::GameRecord;

fn game(id: u64, date: &str, home: &str, away: &str, score: Option<(u32, u32)>) -> GameRecord {
    let (h, a) = match score {
        Some((h, a)) => (Some(h), Some(a)),
        None => (None, None),
    };
    let mut g = GameRecord::new(date, home, away, h, a);
    g.id = id;
    g.start_time_utc = Some(format!("{date}T23:00:00Z"));
    if score.is_none() {
        g.game_state = "FUT".to_string();
    }
    g
}

fn record(date: &str, correct: Option<bool>, confidence: Option<u8>) -> PickRecord {
    PickRecord {
        date: date.to_string(),
        sort_time: format!("{date}T23:00:00Z"),
        matchup: "TOR @ BOS".to_string(),
        pick: "BOS".to_string(),
        confidence,
        correct,
    }
}

#[test]
fn pick_outcome_tracks_game_state() {
    let finished = game(1, "2024-01-10", "BOS", "TOR", Some((4, 1)));
    assert_eq!(pick_outcome(&finished, Some("BOS")), PickOutcome::Correct);
    assert_eq!(pick_outcome(&finished, Some("TOR")), PickOutcome::Incorrect);
    assert_eq!(pick_outcome(&finished, None), PickOutcome::NoPick);

    let upcoming = game(2, "2024-01-11", "BOS", "TOR", None);
    assert_eq!(pick_outcome(&upcoming, Some("BOS")), PickOutcome::Pending);
}

#[test]
fn book_set_and_clear() {
    let mut book = PredictionBook::default();
    book.set_pick("2024-01-10", "1", Some("BOS".to_string()));
    book.set_confidence("2024-01-10", "1", Some(9));
    let p = book.get("2024-01-10", "1").expect("stored");
    assert_eq!(p.pick.as_deref(), Some("BOS"));
    assert_eq!(p.confidence, Some(5));

    book.set_pick("2024-01-10", "1", Some("TOR".to_string()));
    assert_eq!(book.get("2024-01-10", "1").and_then(|p| p.confidence), Some(5));

    book.set_pick("2024-01-10", "1", None);
    assert!(book.get("2024-01-10", "1").is_none());
}

#[test]
fn legacy_bare_pick_strings_load() {
    let raw = r#"{
        "2024-01-10": {"predictions": {"1": "BOS", "2": {"pick": "NYR", "confidence": 3}}}
    }"#;
    let book: PredictionBook = serde_json::from_str(raw).expect("legacy json");
    let first = book.get("2024-01-10", "1").expect("legacy pick");
    assert_eq!(first.pick.as_deref(), Some("BOS"));
    assert_eq!(first.confidence, None);
    assert_eq!(
        book.get("2024-01-10", "2").and_then(|p| p.confidence),
        Some(3)
    );
}

#[test]
fn historical_picks_are_newest_first_and_skip_unloaded_days() {
    let mut book = PredictionBook::default();
    book.set_pick("2024-01-09", "10", Some("NJD".to_string()));
    book.set_pick("2024-01-10", "20", Some("TOR".to_string()));
    book.set_pick("2024-01-10", "21", Some("EDM".to_string()));
    book.set_pick("2024-01-12", "30", Some("BOS".to_string()));

    let mut games = HashMap::new();
    games.insert(
        "2024-01-09".to_string(),
        vec![game(10, "2024-01-09", "NJD", "NYR", Some((3, 2)))],
    );
    games.insert(
        "2024-01-10".to_string(),
        vec![
            game(20, "2024-01-10", "BOS", "TOR", Some((4, 1))),
            game(21, "2024-01-10", "CGY", "EDM", None),
        ],
    );

    let picks = historical_picks(&book, &games);
    assert_eq!(picks.len(), 3);
    assert!(picks.iter().all(|p| p.date != "2024-01-12"));
    assert_eq!(picks.last().map(|p| p.date.as_str()), Some("2024-01-09"));

    let tor = picks.iter().find(|p| p.pick == "TOR").expect("TOR pick");
    assert_eq!(tor.correct, Some(false));
    assert_eq!(tor.matchup, "TOR @ BOS");
    let edm = picks.iter().find(|p| p.pick == "EDM").expect("EDM pick");
    assert_eq!(edm.correct, None);
}

#[test]
fn stats_count_streak_confidence_and_month() {
    let picks = vec![
        record("2024-02-03", None, Some(2)),
        record("2024-02-02", Some(true), Some(5)),
        record("2024-02-01", Some(true), Some(5)),
        record("2024-01-30", Some(false), Some(1)),
        record("2024-01-29", Some(true), None),
    ];
    let stats = prediction_stats(&picks);
    assert_eq!(stats.total.total, 5);
    assert_eq!(stats.total.correct, 3);
    // Pending skipped, then two correct before the miss.
    assert_eq!(stats.streak, 2);

    assert_eq!(stats.by_confidence.len(), 5);
    let five = stats.by_confidence[&5];
    assert_eq!((five.correct, five.total), (2, 2));
    assert!((five.percentage() - 100.0).abs() < 1e-9);
    let one = stats.by_confidence[&1];
    assert_eq!((one.correct, one.total), (0, 1));
    assert_eq!(stats.by_confidence[&2].total, 0);

    let feb = stats.by_month["2024-02"];
    assert_eq!((feb.correct, feb.total), (2, 2));
    let jan = stats.by_month["2024-01"];
    assert_eq!((jan.correct, jan.total), (1, 2));
}

#[test]
fn empty_history_has_zeroed_stats() {
    let stats = prediction_stats(&[]);
    assert_eq!(stats.total.total, 0);
    assert_eq!(stats.total.percentage(), 0.0);
    assert_eq!(stats.streak, 0);
    assert!(stats.by_month.is_empty());
}

#[test]
fn predictions_round_trip_through_disk() {
    let dir = std::env::temp_dir().join(format!("nhl_terminal_preds_{}", std::process::id()));
    let mut book = PredictionBook::default();
    book.set_pick("2024-01-10", "20", Some("BOS".to_string()));
    book.set_confidence("2024-01-10", "20", Some(4));

    save_predictions(Some(&dir), &book).expect("save");
    let loaded = load_predictions(Some(&dir));
    assert_eq!(loaded, book);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_data_dir_loads_empty_book() {
    assert_eq!(load_predictions(None), PredictionBook::default());
    assert!(save_predictions(None, &PredictionBook::default()).is_ok());
}
