use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Local};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::nhl_api::NhlClient;
use crate::schedule::{GameRecord, current_season};
use crate::standings::StandingsSnapshot;
use crate::state::{Delta, ProviderCommand};

/// Background fetch loop. Results flow back as [`Delta`]s; the UI thread never blocks
/// on the network.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, config: AppConfig) {
    thread::spawn(move || {
        let client = match NhlClient::new(&config.api_base, config.request_timeout_secs) {
            Ok(client) => client,
            Err(err) => {
                warn!(%err, "http client init failed");
                let _ = tx.send(Delta::Log(format!("[ERR] HTTP client init failed: {err}")));
                return;
            }
        };
        let mut cache = FetchCache::default();

        let standings_interval = Duration::from_secs(config.standings_poll_secs);
        let games_interval = Duration::from_secs(config.games_poll_secs);
        let mut last_standings: Option<Instant> = None;
        let mut last_games: Option<Instant> = None;

        loop {
            let today = today();

            if last_standings.is_none_or(|t| t.elapsed() >= standings_interval) {
                push_standings(&client, &mut cache, &today, true, &tx);
                last_standings = Some(Instant::now());
            }
            if last_games.is_none_or(|t| t.elapsed() >= games_interval) {
                push_games(&client, &mut cache, &today, &today, true, &tx);
                // Games that ran past midnight belong to a date that is no longer today.
                for date in cache.unsettled_dates(&today) {
                    push_games(&client, &mut cache, &today, &date, true, &tx);
                }
                last_games = Some(Instant::now());
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::FetchStandings { force } => {
                        push_standings(&client, &mut cache, &today, force, &tx);
                        if force {
                            last_standings = Some(Instant::now());
                        }
                    }
                    ProviderCommand::FetchReference { days_ago } => {
                        let date = (Local::now().date_naive()
                            - ChronoDuration::days(days_ago as i64))
                        .format("%Y-%m-%d")
                        .to_string();
                        let snapshot = cache.standings(&client, &date, false, &tx);
                        let _ = tx.send(Delta::SetReference {
                            days: days_ago,
                            snapshot,
                        });
                    }
                    ProviderCommand::FetchTeamSchedule { abbrev } => {
                        let games = cache.team_schedule(&client, &abbrev, &tx);
                        let _ = tx.send(Delta::SetTeamSchedule { abbrev, games });
                    }
                    ProviderCommand::FetchGames { date, force } => {
                        push_games(&client, &mut cache, &today, &date, force, &tx);
                    }
                    ProviderCommand::FetchWeek { start } => {
                        for (date, games) in cache.game_week(&client, &start, &tx) {
                            let _ = tx.send(Delta::SetGames { date, games });
                        }
                    }
                }
            }

            thread::sleep(Duration::from_millis(200));
        }
    });
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn push_standings(
    client: &NhlClient,
    cache: &mut FetchCache,
    today: &str,
    force: bool,
    tx: &Sender<Delta>,
) {
    let snapshot = cache.standings(client, today, force, tx);
    let _ = tx.send(Delta::SetStandings(snapshot));
}

fn push_games(
    client: &NhlClient,
    cache: &mut FetchCache,
    today: &str,
    date: &str,
    force: bool,
    tx: &Sender<Delta>,
) {
    // Today's slate is still changing; past days are settled once their games end.
    let force = force && (date == today || cache.is_unsettled(date));
    let games = cache.daily_games(client, date, force, tx);
    let _ = tx.send(Delta::SetGames {
        date: date.to_string(),
        games,
    });
}

/// Session memo of upstream responses. Nothing expires; forced refreshes replace entries.
#[derive(Default)]
struct FetchCache {
    standings: HashMap<String, StandingsSnapshot>,
    schedules: HashMap<(String, String), Vec<GameRecord>>,
    games: HashMap<String, Vec<GameRecord>>,
}

impl FetchCache {
    fn is_unsettled(&self, date: &str) -> bool {
        self.games
            .get(date)
            .is_some_and(|games| games.iter().any(GameRecord::is_unsettled))
    }

    /// Past dates whose memo still holds a game in progress.
    fn unsettled_dates(&self, today: &str) -> Vec<String> {
        self.games
            .keys()
            .filter(|d| d.as_str() < today && self.is_unsettled(d))
            .cloned()
            .collect()
    }

    /// Week block starting at `start`; every day in it replaces its memo entry.
    fn game_week(
        &mut self,
        client: &NhlClient,
        start: &str,
        tx: &Sender<Delta>,
    ) -> Vec<(String, Vec<GameRecord>)> {
        match client.fetch_game_week(start) {
            Ok(days) => {
                info!(start, days = days.len(), "game week loaded");
                for (date, games) in &days {
                    self.games.insert(date.clone(), games.clone());
                }
                days
            }
            Err(err) => {
                warn!(start, error = %format!("{err:#}"), "game week fetch failed");
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Results fetch for week of {start} failed: {err}"
                )));
                Vec::new()
            }
        }
    }

    fn standings(
        &mut self,
        client: &NhlClient,
        date: &str,
        force: bool,
        tx: &Sender<Delta>,
    ) -> StandingsSnapshot {
        if !force && let Some(hit) = self.standings.get(date) {
            debug!(date, "standings memo hit");
            return hit.clone();
        }
        match client.fetch_standings(date) {
            Ok(snapshot) => {
                info!(date, teams = snapshot.len(), "standings loaded");
                self.standings.insert(date.to_string(), snapshot.clone());
                snapshot
            }
            Err(err) => {
                warn!(date, error = %format!("{err:#}"), "standings fetch failed");
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Standings fetch for {date} failed: {err}"
                )));
                self.standings
                    .get(date)
                    .cloned()
                    .unwrap_or_else(|| StandingsSnapshot::empty(date))
            }
        }
    }

    fn team_schedule(
        &mut self,
        client: &NhlClient,
        abbrev: &str,
        tx: &Sender<Delta>,
    ) -> Vec<GameRecord> {
        let key = (abbrev.to_string(), current_season());
        if let Some(hit) = self.schedules.get(&key) {
            debug!(team = abbrev, "schedule memo hit");
            return hit.clone();
        }
        match client.fetch_team_schedule(abbrev, &key.1) {
            Ok(games) => {
                info!(team = abbrev, season = %key.1, games = games.len(), "schedule loaded");
                self.schedules.insert(key, games.clone());
                games
            }
            Err(err) => {
                warn!(team = abbrev, error = %format!("{err:#}"), "schedule fetch failed");
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Schedule fetch for {abbrev} failed: {err}"
                )));
                Vec::new()
            }
        }
    }

    fn daily_games(
        &mut self,
        client: &NhlClient,
        date: &str,
        force: bool,
        tx: &Sender<Delta>,
    ) -> Vec<GameRecord> {
        if !force && let Some(hit) = self.games.get(date) {
            debug!(date, "daily games memo hit");
            return hit.clone();
        }
        match client.fetch_daily_games(date) {
            Ok(games) => {
                self.games.insert(date.to_string(), games.clone());
                games
            }
            Err(err) => {
                warn!(date, error = %format!("{err:#}"), "daily games fetch failed");
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Games fetch for {date} failed: {err}"
                )));
                self.games.get(date).cloned().unwrap_or_default()
            }
        }
    }
}
