use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::predictions::PredictionBook;

const FAVORITES_FILE: &str = "favorites.json";
const PREDICTIONS_FILE: &str = "predictions.json";

pub fn favorites_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FAVORITES_FILE)
}

pub fn predictions_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREDICTIONS_FILE)
}

/// Favorite team abbreviations. A missing or unreadable file is an empty set.
pub fn load_favorites(data_dir: Option<&Path>) -> BTreeSet<String> {
    data_dir
        .and_then(|dir| load_json::<Vec<String>>(&favorites_path(dir)))
        .map(|list| list.into_iter().collect())
        .unwrap_or_default()
}

pub fn save_favorites(data_dir: Option<&Path>, favorites: &BTreeSet<String>) -> Result<()> {
    let Some(dir) = data_dir else {
        return Ok(());
    };
    let list: Vec<&String> = favorites.iter().collect();
    write_json(&favorites_path(dir), &list).context("save favorites")
}

pub fn load_predictions(data_dir: Option<&Path>) -> PredictionBook {
    data_dir
        .and_then(|dir| load_json::<PredictionBook>(&predictions_path(dir)))
        .unwrap_or_default()
}

pub fn save_predictions(data_dir: Option<&Path>, book: &PredictionBook) -> Result<()> {
    let Some(dir) = data_dir else {
        return Ok(());
    };
    write_json(&predictions_path(dir), book).context("save predictions")
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable json file");
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create data dir")?;
    }
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write temp file")?;
    fs::rename(&tmp, path).context("swap temp file")?;
    Ok(())
}
