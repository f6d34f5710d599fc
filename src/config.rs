use std::env;
use std::path::PathBuf;

use crate::nhl_api::DEFAULT_API_BASE;

const APP_DIR: &str = "nhl_terminal";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    /// Default reference offset for rank arrows and stat colors.
    pub compare_days: u32,
    pub standings_poll_secs: u64,
    pub games_poll_secs: u64,
    pub request_timeout_secs: u64,
    /// Favorites and prediction files. `None` disables persistence.
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            compare_days: 2,
            standings_poll_secs: 300,
            games_poll_secs: 60,
            request_timeout_secs: 10,
            data_dir: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_dir = env_path("NHL_DATA_DIR").or_else(default_data_dir);
        let log_dir = env_path("NHL_LOG_DIR").or_else(|| data_dir.as_ref().map(|d| d.join("logs")));
        Self {
            api_base: env::var("NHL_API_BASE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base),
            compare_days: env_u64("NHL_COMPARE_DAYS")
                .map(|v| v.clamp(1, 365) as u32)
                .unwrap_or(defaults.compare_days),
            standings_poll_secs: env_u64("NHL_STANDINGS_POLL_SECS")
                .unwrap_or(defaults.standings_poll_secs)
                .max(60),
            games_poll_secs: env_u64("NHL_GAMES_POLL_SECS")
                .unwrap_or(defaults.games_poll_secs)
                .max(15),
            request_timeout_secs: env_u64("NHL_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs)
                .clamp(1, 120),
            data_dir,
            log_dir,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(raw))
}

fn default_data_dir() -> Option<PathBuf> {
    // Prefer XDG data.
    if let Some(base) = env_path("XDG_DATA_HOME") {
        return Some(base.join(APP_DIR));
    }
    let home = env_path("HOME")?;
    Some(home.join(".local").join("share").join(APP_DIR))
}
