use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::schedule::GameRecord;

pub const MIN_CONFIDENCE: u8 = 1;
pub const MAX_CONFIDENCE: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub pick: Option<String>,
    pub confidence: Option<u8>,
}

/// Older files stored a bare abbreviation per game.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredPrediction {
    Pick(String),
    Full(Prediction),
}

impl From<StoredPrediction> for Prediction {
    fn from(value: StoredPrediction) -> Self {
        match value {
            StoredPrediction::Pick(pick) => Prediction {
                pick: Some(pick),
                confidence: None,
            },
            StoredPrediction::Full(p) => p,
        }
    }
}

fn deserialize_predictions<'de, D>(deserializer: D) -> Result<HashMap<String, Prediction>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = HashMap::<String, StoredPrediction>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(id, p)| (id, p.into())).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPredictions {
    #[serde(default, deserialize_with = "deserialize_predictions")]
    pub predictions: HashMap<String, Prediction>,
}

/// Every pick the user has made, keyed by `YYYY-MM-DD` then game id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionBook {
    pub days: BTreeMap<String, DayPredictions>,
}

impl PredictionBook {
    pub fn get(&self, date: &str, game_id: &str) -> Option<&Prediction> {
        self.days.get(date)?.predictions.get(game_id)
    }

    /// Set or clear the pick, keeping any confidence already chosen.
    pub fn set_pick(&mut self, date: &str, game_id: &str, pick: Option<String>) {
        let day = self.days.entry(date.to_string()).or_default();
        match pick {
            Some(pick) => {
                let entry = day.predictions.entry(game_id.to_string()).or_default();
                entry.pick = Some(pick);
            }
            None => {
                day.predictions.remove(game_id);
            }
        }
    }

    pub fn set_confidence(&mut self, date: &str, game_id: &str, confidence: Option<u8>) {
        let confidence = confidence.map(|c| c.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE));
        let day = self.days.entry(date.to_string()).or_default();
        let entry = day.predictions.entry(game_id.to_string()).or_default();
        entry.confidence = confidence;
    }

    pub fn dates(&self) -> impl Iterator<Item = &String> {
        self.days.keys()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    NoPick,
    Pending,
    Correct,
    Incorrect,
}

impl PickOutcome {
    pub fn label(self) -> &'static str {
        match self {
            PickOutcome::NoPick => "No pick",
            PickOutcome::Pending => "Pending",
            PickOutcome::Correct => "Correct (+1)",
            PickOutcome::Incorrect => "Incorrect",
        }
    }
}

pub fn pick_outcome(game: &GameRecord, pick: Option<&str>) -> PickOutcome {
    let Some(pick) = pick.filter(|p| !p.is_empty()) else {
        return PickOutcome::NoPick;
    };
    match game.winner() {
        None => PickOutcome::Pending,
        Some(winner) if winner == pick => PickOutcome::Correct,
        Some(_) => PickOutcome::Incorrect,
    }
}

/// A resolved-or-pending pick joined with its game.
#[derive(Debug, Clone, PartialEq)]
pub struct PickRecord {
    pub date: String,
    pub sort_time: String,
    pub matchup: String,
    pub pick: String,
    pub confidence: Option<u8>,
    /// `None` while the game is not final.
    pub correct: Option<bool>,
}

/// Join every stored pick with its game, newest first. Dates without loaded games are
/// skipped.
pub fn historical_picks(
    book: &PredictionBook,
    games_by_date: &HashMap<String, Vec<GameRecord>>,
) -> Vec<PickRecord> {
    let mut out = Vec::new();
    for (date, day) in &book.days {
        let Some(games) = games_by_date.get(date) else {
            continue;
        };
        for game in games {
            let Some(pred) = day.predictions.get(&game.id.to_string()) else {
                continue;
            };
            let Some(pick) = pred.pick.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };
            let correct = match pick_outcome(game, Some(pick)) {
                PickOutcome::Correct => Some(true),
                PickOutcome::Incorrect => Some(false),
                PickOutcome::Pending | PickOutcome::NoPick => None,
            };
            out.push(PickRecord {
                date: date.clone(),
                sort_time: game.sort_key(),
                matchup: format!("{} @ {}", game.away.abbrev, game.home.abbrev),
                pick: pick.to_string(),
                confidence: pred.confidence,
                correct,
            });
        }
    }
    out.sort_by(|a, b| b.sort_time.cmp(&a.sort_time));
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accuracy {
    pub correct: u32,
    pub total: u32,
}

impl Accuracy {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionStats {
    /// Pending picks count toward `total.total` but never toward `correct`.
    pub total: Accuracy,
    pub streak: u32,
    pub by_confidence: BTreeMap<u8, Accuracy>,
    pub by_month: BTreeMap<String, Accuracy>,
}

/// Summary over picks as returned by [`historical_picks`] (newest first).
pub fn prediction_stats(picks: &[PickRecord]) -> PredictionStats {
    let mut stats = PredictionStats::default();
    for c in MIN_CONFIDENCE..=MAX_CONFIDENCE {
        stats.by_confidence.insert(c, Accuracy::default());
    }

    for p in picks {
        stats.total.total += 1;
        if p.correct == Some(true) {
            stats.total.correct += 1;
        }
    }

    for p in picks {
        match p.correct {
            None => continue,
            Some(true) => stats.streak += 1,
            Some(false) => break,
        }
    }

    for p in picks {
        let Some(correct) = p.correct else { continue };
        if let Some(conf) = p.confidence
            && let Some(acc) = stats.by_confidence.get_mut(&conf)
        {
            acc.record(correct);
        }
        let month = p.date.get(..7).unwrap_or(&p.date).to_string();
        stats.by_month.entry(month).or_default().record(correct);
    }

    stats
}
