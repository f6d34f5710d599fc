use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDate};

use crate::comparison::{
    RankArrow, StatDelta, compute_rank_delta, rank_arrow, rank_change_text, stat_deltas,
};
use crate::matchup::{
    HeadToHead, MatchupPrediction, StrengthWeights, aggregate_head_to_head, predict_matchup,
};
use crate::playoffs::{PlayoffProjection, project_playoff_status, qualifies};
use crate::predictions::{
    PickOutcome, PickRecord, Prediction, PredictionBook, PredictionStats, historical_picks,
    pick_outcome, prediction_stats,
};
use crate::schedule::{
    GameRecord, GameResult, PeriodType, format_start_time, last_result_letter, status_text,
};
use crate::standings::{StandingsSnapshot, TeamStanding};

const MAX_LOGS: usize = 200;
/// Today plus the six days after it.
pub const UPCOMING_DAYS: u32 = 7;
/// Days covered by one weekly schedule request.
pub const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Standings,
    Matchup,
    Games,
    Predictions,
    Upcoming,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Rank,
    Team,
    GamesPlayed,
    Wins,
    Points,
    PointPctg,
    GoalFor,
    GoalAgainst,
    GoalDifferential,
    Streak,
    Playoffs,
}

impl SortColumn {
    const ORDER: [SortColumn; 11] = [
        SortColumn::Rank,
        SortColumn::Team,
        SortColumn::GamesPlayed,
        SortColumn::Wins,
        SortColumn::Points,
        SortColumn::PointPctg,
        SortColumn::GoalFor,
        SortColumn::GoalAgainst,
        SortColumn::GoalDifferential,
        SortColumn::Streak,
        SortColumn::Playoffs,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|c| *c == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Rank => "Rank",
            SortColumn::Team => "Team",
            SortColumn::GamesPlayed => "GP",
            SortColumn::Wins => "W",
            SortColumn::Points => "Pts",
            SortColumn::PointPctg => "P%",
            SortColumn::GoalFor => "GF",
            SortColumn::GoalAgainst => "GA",
            SortColumn::GoalDifferential => "DIFF",
            SortColumn::Streak => "Streak",
            SortColumn::Playoffs => "Playoffs",
        }
    }
}

/// Tri-state header sort, the table returns to upstream order on the third press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Original,
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::Original => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Original,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Original => "original",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Sortable columns of the season results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsColumn {
    Date,
    Matchup,
    Score,
    Venue,
    Tv,
}

impl ResultsColumn {
    pub fn next(self) -> Self {
        match self {
            ResultsColumn::Date => ResultsColumn::Matchup,
            ResultsColumn::Matchup => ResultsColumn::Score,
            ResultsColumn::Score => ResultsColumn::Venue,
            ResultsColumn::Venue => ResultsColumn::Tv,
            ResultsColumn::Tv => ResultsColumn::Date,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResultsColumn::Date => "Date",
            ResultsColumn::Matchup => "Matchup",
            ResultsColumn::Score => "Score",
            ResultsColumn::Venue => "Venue",
            ResultsColumn::Tv => "TV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupFocus {
    TeamA,
    TeamB,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub today: String,
    pub standings: StandingsSnapshot,
    pub standings_loading: bool,
    /// Empty until the reference fetch lands, and again if it failed.
    pub reference: StandingsSnapshot,
    pub compare_days: u32,
    pub default_compare_days: u32,
    pub selected: usize,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    pub advanced: bool,
    pub favorites: BTreeSet<String>,
    pub schedules: HashMap<String, Vec<GameRecord>>,
    pub schedules_requested: HashSet<String>,
    pub matchup_a: usize,
    pub matchup_b: usize,
    pub matchup_focus: MatchupFocus,
    pub games_by_date: HashMap<String, Vec<GameRecord>>,
    pub games_selected: usize,
    pub upcoming_selected: usize,
    pub results_selected: usize,
    pub results_filter: String,
    /// Keystrokes go to `results_filter` while set.
    pub results_searching: bool,
    pub results_column: ResultsColumn,
    pub results_order: SortOrder,
    pub weeks_requested: HashSet<String>,
    pub predictions: PredictionBook,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(2, Local::now().date_naive().format("%Y-%m-%d").to_string())
    }
}

impl AppState {
    pub fn new(compare_days: u32, today: String) -> Self {
        Self {
            screen: Screen::Standings,
            standings: StandingsSnapshot::empty(today.clone()),
            today,
            standings_loading: true,
            reference: StandingsSnapshot::default(),
            compare_days,
            default_compare_days: compare_days,
            selected: 0,
            sort_column: SortColumn::Rank,
            sort_order: SortOrder::Original,
            advanced: false,
            favorites: BTreeSet::new(),
            schedules: HashMap::with_capacity(32),
            schedules_requested: HashSet::with_capacity(32),
            matchup_a: 0,
            matchup_b: 1,
            matchup_focus: MatchupFocus::TeamA,
            games_by_date: HashMap::with_capacity(8),
            games_selected: 0,
            upcoming_selected: 0,
            results_selected: 0,
            results_filter: String::new(),
            results_searching: false,
            results_column: ResultsColumn::Date,
            results_order: SortOrder::Original,
            weeks_requested: HashSet::new(),
            predictions: PredictionBook::default(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Oldest first.
    pub fn recent_logs(&self, n: usize) -> Vec<&str> {
        let skip = self.logs.len().saturating_sub(n);
        self.logs.iter().skip(skip).map(String::as_str).collect()
    }

    /// `YYYY-MM-DD` for `days` before today.
    pub fn date_days_ago(&self, days: u32) -> String {
        self.date_offset(-(days as i64))
    }

    pub fn date_days_ahead(&self, days: u32) -> String {
        self.date_offset(days as i64)
    }

    fn date_offset(&self, days: i64) -> String {
        match NaiveDate::parse_from_str(&self.today, "%Y-%m-%d") {
            Ok(today) => (today + ChronoDuration::days(days))
                .format("%Y-%m-%d")
                .to_string(),
            Err(_) => self.today.clone(),
        }
    }

    /// Move `today` forward once the local date changes. Picks and the games screen
    /// follow the new date; returns true when it moved.
    pub fn roll_today(&mut self, today: &str) -> bool {
        if today <= self.today.as_str() {
            return false;
        }
        self.push_log(format!("[INFO] Date rolled over to {today}"));
        self.today = today.to_string();
        self.games_selected = 0;
        self.upcoming_selected = 0;
        true
    }

    pub fn reference_date(&self) -> String {
        self.date_days_ago(self.compare_days)
    }

    pub fn compare_earlier(&mut self) {
        self.compare_days = (self.compare_days + 1).min(365);
    }

    pub fn compare_later(&mut self) {
        self.compare_days = self.compare_days.saturating_sub(1).max(1);
    }

    pub fn reset_comparison(&mut self) {
        self.compare_days = self.default_compare_days;
    }

    pub fn toggle_favorite(&mut self, abbrev: &str) {
        if !self.favorites.remove(abbrev) {
            self.favorites.insert(abbrev.to_string());
        }
    }

    pub fn cycle_sort_column(&mut self) {
        self.sort_column = self.sort_column.next();
        self.sort_order = SortOrder::Ascending;
    }

    pub fn cycle_sort_order(&mut self) {
        self.sort_order = self.sort_order.next();
    }

    // Standings table

    pub fn standings_rows(&self) -> Vec<StandingsRow<'_>> {
        let mut rows: Vec<StandingsRow<'_>> = self
            .standings
            .teams
            .iter()
            .map(|team| self.build_row(team))
            .collect();

        if self.sort_order != SortOrder::Original {
            let column = self.sort_column;
            rows.sort_by(|a, b| compare_rows(a, b, column));
            if self.sort_order == SortOrder::Descending {
                rows.reverse();
            }
        }
        rows
    }

    fn build_row<'a>(&'a self, team: &'a TeamStanding) -> StandingsRow<'a> {
        let rank_delta = compute_rank_delta(&self.standings, &self.reference, &team.abbrev);
        StandingsRow {
            team,
            rank_delta,
            arrow: rank_arrow(rank_delta),
            rank_change: rank_change_text(&self.standings, &self.reference, &team.abbrev),
            stats: stat_deltas(team, &self.reference),
            playoff: project_playoff_status(team, &self.standings.teams),
            favorite: self.favorites.contains(&team.abbrev),
            last_result: last_result_letter(
                team.streak_code.as_deref(),
                self.schedules.get(&team.abbrev).map(Vec::as_slice),
                &team.abbrev,
            ),
        }
    }

    pub fn selected_team(&self) -> Option<&TeamStanding> {
        let rows = self.standings_rows();
        rows.get(self.selected).map(|r| r.team)
    }

    /// Teams whose last result can't be read off the streak and whose schedule is unknown.
    pub fn schedules_to_request(&self) -> Vec<String> {
        self.standings
            .teams
            .iter()
            .filter(|t| !matches!(t.streak_code.as_deref(), Some("W") | Some("L")))
            .map(|t| t.abbrev.clone())
            .filter(|a| !self.schedules.contains_key(a) && !self.schedules_requested.contains(a))
            .collect()
    }

    // Matchup

    pub fn ranked_teams(&self) -> Vec<&TeamStanding> {
        self.standings.by_league_sequence()
    }

    pub fn matchup_teams(&self) -> Option<(&TeamStanding, &TeamStanding)> {
        let teams = self.ranked_teams();
        Some((*teams.get(self.matchup_a)?, *teams.get(self.matchup_b)?))
    }

    pub fn matchup_view(&self) -> Option<MatchupView<'_>> {
        let (a, b) = self.matchup_teams()?;
        if a.abbrev == b.abbrev {
            return None;
        }
        let h2h = self
            .schedules
            .get(&a.abbrev)
            .map(|games| aggregate_head_to_head(games, &a.abbrev, &b.abbrev));
        let prediction = predict_matchup(a, b, h2h.as_ref(), &StrengthWeights::default());
        Some(MatchupView {
            team_a: a,
            team_b: b,
            head_to_head: h2h,
            prediction,
        })
    }

    pub fn toggle_matchup_focus(&mut self) {
        self.matchup_focus = match self.matchup_focus {
            MatchupFocus::TeamA => MatchupFocus::TeamB,
            MatchupFocus::TeamB => MatchupFocus::TeamA,
        };
    }

    pub fn swap_matchup(&mut self) {
        std::mem::swap(&mut self.matchup_a, &mut self.matchup_b);
    }

    fn shift_matchup(&mut self, forward: bool) {
        let total = self.standings.len();
        if total == 0 {
            return;
        }
        let slot = match self.matchup_focus {
            MatchupFocus::TeamA => &mut self.matchup_a,
            MatchupFocus::TeamB => &mut self.matchup_b,
        };
        *slot = if forward {
            (*slot + 1) % total
        } else {
            (*slot + total - 1) % total
        };
    }

    // Games & predictions

    pub fn today_games(&self) -> &[GameRecord] {
        self.games_by_date
            .get(&self.today)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn game_rows(&self) -> Vec<GameRow<'_>> {
        self.today_games()
            .iter()
            .map(|game| {
                let prediction = self.predictions.get(&self.today, &game.id.to_string());
                let pick = prediction.and_then(|p| p.pick.as_deref());
                GameRow {
                    game,
                    status: status_text(game),
                    prediction,
                    outcome: pick_outcome(game, pick),
                    favorite: self.favorites.contains(&game.home.abbrev)
                        || self.favorites.contains(&game.away.abbrev),
                }
            })
            .collect()
    }

    pub fn selected_game(&self) -> Option<&GameRecord> {
        self.today_games().get(self.games_selected)
    }

    /// No pick -> away -> home -> no pick. Returns true when the book changed.
    pub fn cycle_pick(&mut self) -> bool {
        let Some(game) = self.selected_game() else {
            return false;
        };
        let game_id = game.id.to_string();
        let (away, home) = (game.away.abbrev.clone(), game.home.abbrev.clone());
        let current = self
            .predictions
            .get(&self.today, &game_id)
            .and_then(|p| p.pick.clone());
        let next = match current.as_deref() {
            None => Some(away),
            Some(p) if p == away => Some(home),
            Some(_) => None,
        };
        let today = self.today.clone();
        self.predictions.set_pick(&today, &game_id, next);
        true
    }

    /// Step confidence 1..=5 for the selected game's pick; wraps back to unset.
    pub fn cycle_confidence(&mut self) -> bool {
        let Some(game) = self.selected_game() else {
            return false;
        };
        let game_id = game.id.to_string();
        let current = self
            .predictions
            .get(&self.today, &game_id)
            .and_then(|p| p.confidence);
        let next = match current {
            None => Some(1),
            Some(c) if c >= 5 => None,
            Some(c) => Some(c + 1),
        };
        let today = self.today.clone();
        self.predictions.set_confidence(&today, &game_id, next);
        true
    }

    /// Dates in the prediction book whose games haven't been loaded yet.
    pub fn prediction_dates_to_load(&self) -> Vec<String> {
        self.predictions
            .dates()
            .filter(|d| !self.games_by_date.contains_key(*d))
            .cloned()
            .collect()
    }

    pub fn prediction_history(&self) -> Vec<PickRecord> {
        historical_picks(&self.predictions, &self.games_by_date)
    }

    pub fn prediction_summary(&self) -> PredictionStats {
        prediction_stats(&self.prediction_history())
    }

    // Upcoming week & season results

    pub fn upcoming_dates(&self) -> Vec<String> {
        (0..UPCOMING_DAYS).map(|d| self.date_days_ahead(d)).collect()
    }

    pub fn upcoming_dates_to_load(&self) -> Vec<String> {
        self.upcoming_dates()
            .into_iter()
            .filter(|d| !self.games_by_date.contains_key(d))
            .collect()
    }

    /// Every game from today through the next six days, in start order.
    pub fn upcoming_rows(&self) -> Vec<ScheduleRow<'_>> {
        let mut games: Vec<&GameRecord> = self
            .upcoming_dates()
            .iter()
            .filter_map(|d| self.games_by_date.get(d))
            .flatten()
            .collect();
        games.sort_by_key(|g| g.sort_key());
        games.into_iter().map(|g| self.schedule_row(g)).collect()
    }

    /// Start dates of the weekly blocks covering the season so far, oldest first.
    pub fn season_week_starts(&self) -> Vec<String> {
        let Ok(today) = NaiveDate::parse_from_str(&self.today, "%Y-%m-%d") else {
            return Vec::new();
        };
        let season_year = if today.month() >= 10 {
            today.year()
        } else {
            today.year() - 1
        };
        let Some(mut start) = NaiveDate::from_ymd_opt(season_year, 10, 1) else {
            return Vec::new();
        };
        let mut starts = Vec::new();
        while start < today {
            starts.push(start.format("%Y-%m-%d").to_string());
            start += ChronoDuration::days(WEEK_DAYS);
        }
        starts
    }

    /// Weeks not asked for yet, plus the latest week, whose later days may have been
    /// unplayed when it was last fetched.
    pub fn weeks_to_request(&self) -> Vec<String> {
        let starts = self.season_week_starts();
        let latest = starts.last().cloned();
        starts
            .into_iter()
            .filter(|w| !self.weeks_requested.contains(w) || Some(w) == latest.as_ref())
            .collect()
    }

    /// Final games before today that match the search text, in the chosen order.
    pub fn results_rows(&self) -> Vec<ScheduleRow<'_>> {
        let mut dates: Vec<&String> = self
            .games_by_date
            .keys()
            .filter(|d| d.as_str() < self.today.as_str())
            .collect();
        dates.sort();
        let mut games: Vec<&GameRecord> = dates
            .into_iter()
            .filter_map(|d| self.games_by_date.get(d))
            .flat_map(|day| {
                let mut day: Vec<&GameRecord> = day.iter().filter(|g| g.is_final()).collect();
                day.sort_by_key(|g| g.sort_key());
                day
            })
            .collect();

        if self.results_order != SortOrder::Original {
            let column = self.results_column;
            games.sort_by(|a, b| compare_results(a, b, column));
            if self.results_order == SortOrder::Descending {
                games.reverse();
            }
        }

        let needle = self.results_filter.trim().to_lowercase();
        games
            .into_iter()
            .map(|g| self.schedule_row(g))
            .filter(|row| needle.is_empty() || row.matches(&needle))
            .collect()
    }

    pub fn cycle_results_column(&mut self) {
        self.results_column = self.results_column.next();
        self.results_order = SortOrder::Ascending;
    }

    pub fn cycle_results_order(&mut self) {
        self.results_order = self.results_order.next();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.results_filter.push(c);
        self.results_selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.results_filter.pop();
        self.results_selected = 0;
    }

    fn schedule_row<'a>(&'a self, game: &'a GameRecord) -> ScheduleRow<'a> {
        ScheduleRow {
            game,
            date: game.local_date(),
            matchup: game.matchup_text(),
            score: game.score_text().unwrap_or_default(),
            time: format_start_time(game.start_time_utc.as_deref()),
            venue: game.venue.clone().unwrap_or_default(),
            tv: game.broadcast_text(),
            favorite: self.favorites.contains(&game.home.abbrev)
                || self.favorites.contains(&game.away.abbrev),
        }
    }

    /// Game under the cursor on whichever games-like screen is showing.
    pub fn focused_game(&self) -> Option<&GameRecord> {
        match self.screen {
            Screen::Games => self.selected_game(),
            Screen::Upcoming => self
                .upcoming_rows()
                .get(self.upcoming_selected)
                .map(|r| r.game),
            Screen::Results => self
                .results_rows()
                .get(self.results_selected)
                .map(|r| r.game),
            _ => None,
        }
    }

    pub fn game_detail(&self) -> Option<GameDetail<'_>> {
        self.focused_game().map(|game| self.detail_for(game))
    }

    pub fn detail_for<'a>(&'a self, game: &'a GameRecord) -> GameDetail<'a> {
        let period = if game.is_final() {
            Some(
                game.last_period_type
                    .map(PeriodType::label)
                    .unwrap_or("Regulation"),
            )
        } else {
            None
        };
        GameDetail {
            game,
            away: self.standings.get(&game.away.abbrev),
            home: self.standings.get(&game.home.abbrev),
            status: status_text(game),
            score: game.score_text(),
            period,
            venue: game.venue.clone().unwrap_or_else(|| "—".to_string()),
            tv: game.broadcast_text(),
        }
    }

    // Navigation

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Standings => {
                let total = self.standings.len();
                if total > 0 {
                    self.selected = (self.selected + 1).min(total - 1);
                }
            }
            Screen::Matchup => self.shift_matchup(true),
            Screen::Games => {
                let total = self.today_games().len();
                if total > 0 {
                    self.games_selected = (self.games_selected + 1).min(total - 1);
                }
            }
            Screen::Upcoming => {
                let total = self.upcoming_rows().len();
                if total > 0 {
                    self.upcoming_selected = (self.upcoming_selected + 1).min(total - 1);
                }
            }
            Screen::Results => {
                let total = self.results_rows().len();
                if total > 0 {
                    self.results_selected = (self.results_selected + 1).min(total - 1);
                }
            }
            Screen::Predictions => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Standings => self.selected = self.selected.saturating_sub(1),
            Screen::Matchup => self.shift_matchup(false),
            Screen::Games => self.games_selected = self.games_selected.saturating_sub(1),
            Screen::Upcoming => self.upcoming_selected = self.upcoming_selected.saturating_sub(1),
            Screen::Results => self.results_selected = self.results_selected.saturating_sub(1),
            Screen::Predictions => {}
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.standings.len();
        self.selected = self.selected.min(total.saturating_sub(1));
        if total > 0 {
            self.matchup_a = self.matchup_a.min(total - 1);
            self.matchup_b = self.matchup_b.min(total - 1);
        }
        let games = self.today_games().len();
        self.games_selected = self.games_selected.min(games.saturating_sub(1));
        match self.screen {
            Screen::Upcoming => {
                let total = self.upcoming_rows().len();
                self.upcoming_selected = self.upcoming_selected.min(total.saturating_sub(1));
            }
            Screen::Results => {
                let total = self.results_rows().len();
                self.results_selected = self.results_selected.min(total.saturating_sub(1));
            }
            _ => {}
        }
    }
}

/// One standings line with everything the comparator derives for it.
#[derive(Debug, Clone)]
pub struct StandingsRow<'a> {
    pub team: &'a TeamStanding,
    pub rank_delta: i32,
    pub arrow: RankArrow,
    pub rank_change: Option<String>,
    pub stats: Vec<StatDelta>,
    pub playoff: PlayoffProjection,
    pub favorite: bool,
    pub last_result: GameResult,
}

impl StandingsRow<'_> {
    pub fn stat(&self, stat: crate::comparison::TrackedStat) -> Option<&StatDelta> {
        self.stats.iter().find(|s| s.stat == stat)
    }
}

fn compare_rows(a: &StandingsRow<'_>, b: &StandingsRow<'_>, column: SortColumn) -> Ordering {
    let (x, y) = (a.team, b.team);
    match column {
        SortColumn::Rank => x
            .league_sequence
            .unwrap_or(u32::MAX)
            .cmp(&y.league_sequence.unwrap_or(u32::MAX)),
        SortColumn::Team => x.abbrev.to_lowercase().cmp(&y.abbrev.to_lowercase()),
        SortColumn::GamesPlayed => x.games_played.cmp(&y.games_played),
        SortColumn::Wins => x.wins.cmp(&y.wins),
        SortColumn::Points => x.points.cmp(&y.points),
        SortColumn::PointPctg => x.point_pctg.total_cmp(&y.point_pctg),
        SortColumn::GoalFor => x.goal_for.cmp(&y.goal_for),
        SortColumn::GoalAgainst => x.goal_against.cmp(&y.goal_against),
        SortColumn::GoalDifferential => x.goal_differential.cmp(&y.goal_differential),
        SortColumn::Streak => streak_value(x).cmp(&streak_value(y)),
        SortColumn::Playoffs => qualifies(x).cmp(&qualifies(y)),
    }
}

fn streak_value(team: &TeamStanding) -> i64 {
    let sign = match team.streak_code.as_deref() {
        Some("W") => 1,
        Some("L") => -1,
        _ => 0,
    };
    sign * team.streak_count as i64
}

#[derive(Debug, Clone)]
pub struct MatchupView<'a> {
    pub team_a: &'a TeamStanding,
    pub team_b: &'a TeamStanding,
    /// `None` until team A's schedule is loaded.
    pub head_to_head: Option<HeadToHead>,
    pub prediction: MatchupPrediction,
}

#[derive(Debug, Clone)]
pub struct GameRow<'a> {
    pub game: &'a GameRecord,
    pub status: String,
    pub prediction: Option<&'a Prediction>,
    pub outcome: PickOutcome,
    pub favorite: bool,
}

/// One line of the upcoming or results tables.
#[derive(Debug, Clone)]
pub struct ScheduleRow<'a> {
    pub game: &'a GameRecord,
    pub date: String,
    pub matchup: String,
    /// Empty until both scores exist.
    pub score: String,
    pub time: String,
    pub venue: String,
    pub tv: String,
    pub favorite: bool,
}

impl ScheduleRow<'_> {
    /// Case-insensitive match of an already lowercased needle against any cell.
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.date,
            &self.matchup,
            &self.score,
            &self.time,
            &self.venue,
            &self.tv,
        ]
        .iter()
        .any(|cell| cell.to_lowercase().contains(needle))
    }
}

fn compare_results(a: &GameRecord, b: &GameRecord, column: ResultsColumn) -> Ordering {
    match column {
        ResultsColumn::Date => a.sort_key().cmp(&b.sort_key()),
        ResultsColumn::Matchup => a.matchup_text().cmp(&b.matchup_text()),
        ResultsColumn::Score => (a.away.score, a.home.score).cmp(&(b.away.score, b.home.score)),
        ResultsColumn::Venue => a.venue.cmp(&b.venue),
        ResultsColumn::Tv => a.broadcast_text().cmp(&b.broadcast_text()),
    }
}

/// Everything the detail pane shows for one game.
#[derive(Debug, Clone)]
pub struct GameDetail<'a> {
    pub game: &'a GameRecord,
    pub away: Option<&'a TeamStanding>,
    pub home: Option<&'a TeamStanding>,
    pub status: String,
    pub score: Option<String>,
    /// How a final game was decided; `None` before it ends.
    pub period: Option<&'static str>,
    pub venue: String,
    pub tv: String,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetStandings(StandingsSnapshot),
    SetReference {
        days: u32,
        snapshot: StandingsSnapshot,
    },
    SetTeamSchedule {
        abbrev: String,
        games: Vec<GameRecord>,
    },
    SetGames {
        date: String,
        games: Vec<GameRecord>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchStandings { force: bool },
    FetchReference { days_ago: u32 },
    FetchTeamSchedule { abbrev: String },
    FetchGames { date: String, force: bool },
    FetchWeek { start: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetStandings(snapshot) => {
            let selected_abbrev = state.selected_team().map(|t| t.abbrev.clone());
            let matchup = state
                .matchup_teams()
                .map(|(a, b)| (a.abbrev.clone(), b.abbrev.clone()));
            state.standings_loading = false;
            if snapshot.is_empty() && !state.standings.is_empty() {
                // Keep the last good table rather than blanking the screen.
                state.push_log("[WARN] Standings came back empty; keeping previous table");
                return;
            }
            if !snapshot.is_empty() && !snapshot.has_valid_league_sequence() {
                state.push_log("[WARN] League sequence is not a clean 1..N ranking");
            }
            state.standings = snapshot;

            let reselect = selected_abbrev.and_then(|abbrev| {
                state
                    .standings_rows()
                    .iter()
                    .position(|r| r.team.abbrev == abbrev)
            });
            if let Some(idx) = reselect {
                state.selected = idx;
            }
            if let Some((a, b)) = matchup {
                let ranked: Vec<String> =
                    state.ranked_teams().iter().map(|t| t.abbrev.clone()).collect();
                if let Some(idx) = ranked.iter().position(|x| *x == a) {
                    state.matchup_a = idx;
                }
                if let Some(idx) = ranked.iter().position(|x| *x == b) {
                    state.matchup_b = idx;
                }
            }
            state.clamp_selection();
        }
        Delta::SetReference { days, snapshot } => {
            if days != state.compare_days {
                // A newer comparison request superseded this one.
                return;
            }
            if snapshot.is_empty() {
                state.push_log(format!(
                    "[INFO] No standings for {}; comparison unavailable",
                    snapshot.date
                ));
            }
            state.reference = snapshot;
        }
        Delta::SetTeamSchedule { abbrev, games } => {
            state.schedules_requested.remove(&abbrev);
            state.schedules.insert(abbrev, games);
        }
        Delta::SetGames { date, games } => {
            state.games_by_date.insert(date, games);
            state.clamp_selection();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
