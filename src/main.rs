use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::{info, warn};

use nhl_terminal::comparison::{StatTrend, TrackedStat};
use nhl_terminal::config::AppConfig;
use nhl_terminal::logging::init_logging;
use nhl_terminal::matchup::{Side, StrengthWeights, Verdict, compute_matchup_strength};
use nhl_terminal::persist;
use nhl_terminal::predictions::PickOutcome;
use nhl_terminal::provider::spawn_provider;
use nhl_terminal::schedule::GameResult;
use nhl_terminal::standings::TeamStanding;
use nhl_terminal::state::{
    AppState, Delta, GameDetail, MatchupFocus, ProviderCommand, ScheduleRow, Screen, SortOrder,
    StandingsRow, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    data_dir: Option<PathBuf>,
}

impl App {
    fn new(config: &AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        let mut state = AppState::new(config.compare_days, today());
        let data_dir = config.data_dir.clone();
        state.favorites = persist::load_favorites(data_dir.as_deref());
        state.predictions = persist::load_predictions(data_dir.as_deref());
        Self {
            state,
            should_quit: false,
            cmd_tx,
            data_dir,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }
        if self.state.results_searching {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Standings,
            KeyCode::Char('2') => {
                self.state.screen = Screen::Matchup;
                self.request_matchup_schedule();
            }
            KeyCode::Char('3') => self.state.screen = Screen::Games,
            KeyCode::Char('4') => {
                self.state.screen = Screen::Predictions;
                self.request_prediction_games();
            }
            KeyCode::Char('5') => {
                self.state.screen = Screen::Upcoming;
                self.request_upcoming_games();
                self.state.clamp_selection();
            }
            KeyCode::Char('6') => {
                self.state.screen = Screen::Results;
                self.request_season_weeks();
                self.state.clamp_selection();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.select_next();
                if self.state.screen == Screen::Matchup {
                    self.request_matchup_schedule();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.select_prev();
                if self.state.screen == Screen::Matchup {
                    self.request_matchup_schedule();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('r') => {
                self.send(ProviderCommand::FetchStandings { force: true }, "Standings refresh");
                self.send(
                    ProviderCommand::FetchGames {
                        date: self.state.today.clone(),
                        force: true,
                    },
                    "Games refresh",
                );
            }
            _ => match self.state.screen {
                Screen::Standings => self.on_standings_key(key),
                Screen::Matchup => self.on_matchup_key(key),
                Screen::Games => self.on_games_key(key),
                Screen::Results => self.on_results_key(key),
                Screen::Predictions | Screen::Upcoming => {}
            },
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => self.state.results_searching = true,
            KeyCode::Char('s') => self.state.cycle_results_column(),
            KeyCode::Char('o') => self.state.cycle_results_order(),
            KeyCode::Esc => {
                self.state.results_filter.clear();
                self.state.results_selected = 0;
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.results_searching = false,
            KeyCode::Esc => {
                self.state.results_searching = false;
                self.state.results_filter.clear();
                self.state.results_selected = 0;
            }
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_standings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') => {
                let Some(abbrev) = self.state.selected_team().map(|t| t.abbrev.clone()) else {
                    return;
                };
                self.state.toggle_favorite(&abbrev);
                self.save_favorites();
            }
            KeyCode::Char('s') => self.state.cycle_sort_column(),
            KeyCode::Char('o') => self.state.cycle_sort_order(),
            KeyCode::Char('a') => self.state.advanced = !self.state.advanced,
            KeyCode::Char('[') => {
                self.state.compare_earlier();
                self.request_reference();
            }
            KeyCode::Char(']') => {
                self.state.compare_later();
                self.request_reference();
            }
            KeyCode::Char('c') => self.request_reference(),
            KeyCode::Char('x') => {
                self.state.reset_comparison();
                self.request_reference();
            }
            _ => {}
        }
    }

    fn on_matchup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.toggle_matchup_focus(),
            KeyCode::Char('w') => {
                self.state.swap_matchup();
                self.request_matchup_schedule();
            }
            _ => {}
        }
    }

    fn on_games_key(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Char('p') | KeyCode::Enter => self.state.cycle_pick(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('-') => {
                self.state.cycle_confidence()
            }
            _ => false,
        };
        if changed {
            self.save_predictions();
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        }
    }

    fn request_reference(&mut self) {
        self.state.reference = Default::default();
        let days = self.state.compare_days;
        self.send(
            ProviderCommand::FetchReference { days_ago: days },
            "Comparison fetch",
        );
        self.state.push_log(format!(
            "[INFO] Comparing against {}",
            self.state.reference_date()
        ));
    }

    fn request_schedule(&mut self, abbrev: String) {
        if self.state.schedules.contains_key(&abbrev)
            || !self.state.schedules_requested.insert(abbrev.clone())
        {
            return;
        }
        self.send(ProviderCommand::FetchTeamSchedule { abbrev }, "Schedule fetch");
    }

    fn request_matchup_schedule(&mut self) {
        if let Some(abbrev) = self.state.matchup_teams().map(|(a, _)| a.abbrev.clone()) {
            self.request_schedule(abbrev);
        }
    }

    fn request_prediction_games(&mut self) {
        for date in self.state.prediction_dates_to_load() {
            self.send(ProviderCommand::FetchGames { date, force: false }, "Games fetch");
        }
    }

    fn request_upcoming_games(&mut self) {
        for date in self.state.upcoming_dates_to_load() {
            self.send(ProviderCommand::FetchGames { date, force: false }, "Games fetch");
        }
    }

    fn request_season_weeks(&mut self) {
        let weeks = self.state.weeks_to_request();
        if weeks.is_empty() {
            return;
        }
        self.state
            .push_log(format!("[INFO] Loading results: {} week blocks", weeks.len()));
        for start in weeks {
            self.state.weeks_requested.insert(start.clone());
            self.send(ProviderCommand::FetchWeek { start }, "Results fetch");
        }
    }

    /// Local midnight passed: move picks and the games screen to the new day.
    fn on_new_day(&mut self) {
        info!(today = %self.state.today, "date rolled over");
        self.send(
            ProviderCommand::FetchGames {
                date: self.state.today.clone(),
                force: true,
            },
            "Games refresh",
        );
        match self.state.screen {
            Screen::Upcoming => self.request_upcoming_games(),
            Screen::Results => self.request_season_weeks(),
            _ => {}
        }
    }

    fn after_deltas(&mut self) {
        for abbrev in self.state.schedules_to_request() {
            self.request_schedule(abbrev);
        }
        if self.state.screen == Screen::Matchup {
            self.request_matchup_schedule();
        }
    }

    fn save_favorites(&mut self) {
        if let Err(err) = persist::save_favorites(self.data_dir.as_deref(), &self.state.favorites)
        {
            warn!(error = %format!("{err:#}"), "favorites not saved");
            self.state.push_log(format!("[WARN] Favorites not saved: {err}"));
        }
    }

    fn save_predictions(&mut self) {
        if let Err(err) =
            persist::save_predictions(self.data_dir.as_deref(), &self.state.predictions)
        {
            warn!(error = %format!("{err:#}"), "predictions not saved");
            self.state.push_log(format!("[WARN] Predictions not saved: {err}"));
        }
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    let _log_guard = init_logging(config.log_dir.as_deref());
    info!(api = %config.api_base, compare_days = config.compare_days, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, config.clone());

    let mut app = App::new(&config, Some(cmd_tx));
    app.request_reference();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.save_favorites();
    app.save_predictions();

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        if app.state.roll_today(&today()) {
            app.on_new_day();
        }

        let mut touched = false;
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
            touched = true;
        }
        if touched {
            app.after_deltas();
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Standings => render_standings(frame, chunks[1], &app.state),
        Screen::Matchup => render_matchup(frame, chunks[1], &app.state),
        Screen::Games => render_games(frame, chunks[1], &app.state),
        Screen::Predictions => render_predictions(frame, chunks[1], &app.state),
        Screen::Upcoming => render_upcoming(frame, chunks[1], &app.state),
        Screen::Results => render_results(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::Standings => {
            let sort = match state.sort_order {
                SortOrder::Original => "league order".to_string(),
                order => format!("{} {}", state.sort_column.label(), order.label()),
            };
            let compare = if state.reference.is_empty() {
                format!("vs {} (no data)", state.reference_date())
            } else {
                format!("vs {}", state.reference.date)
            };
            format!(
                "NHL STANDINGS | {} | {compare} | Sort: {sort}{}",
                state.today,
                if state.advanced { " | ADV" } else { "" }
            )
        }
        Screen::Matchup => "NHL MATCHUP".to_string(),
        Screen::Games => format!("NHL GAMES | {}", state.today),
        Screen::Predictions => "NHL PREDICTIONS".to_string(),
        Screen::Upcoming => format!(
            "NHL UPCOMING | {} to {}",
            state.today,
            state.date_days_ahead(6)
        ),
        Screen::Results => {
            let sort = match state.results_order {
                SortOrder::Original => "chronological".to_string(),
                order => format!("{} {}", state.results_column.label(), order.label()),
            };
            let search = if state.results_searching {
                format!("Search: {}_", state.results_filter)
            } else if state.results_filter.is_empty() {
                "Search: -".to_string()
            } else {
                format!("Search: {}", state.results_filter)
            };
            format!("NHL RESULTS | Sort: {sort} | {search}")
        }
    }
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Standings => {
            "1-6 Screens | j/k Move | f Fav | s Col | o Order | a Adv | [/] Days | x Reset | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Matchup => {
            "1-6 Screens | j/k Change team | Tab Switch side | w Swap | ? Help | q Quit".to_string()
        }
        Screen::Games => {
            "1-6 Screens | j/k Move | p Pick | +/- Confidence | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Predictions => "1-6 Screens | ? Help | q Quit".to_string(),
        Screen::Upcoming => "1-6 Screens | j/k Move | r Refresh | ? Help | q Quit".to_string(),
        Screen::Results if state.results_searching => {
            "Type to filter | Enter Keep | Esc Clear".to_string()
        }
        Screen::Results => {
            "1-6 Screens | j/k Move | / Search | s Col | o Order | Esc Clear | ? Help | q Quit"
                .to_string()
        }
    }
}

fn trend_style(trend: Option<StatTrend>) -> Style {
    match trend {
        Some(StatTrend::Improved) => Style::default().fg(Color::Green),
        Some(StatTrend::Worsened) => Style::default().fg(Color::Red),
        _ => Style::default(),
    }
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(6)])
        .split(area);

    let rows = state.standings_rows();
    if rows.is_empty() {
        let msg = if state.standings_loading {
            "Loading standings..."
        } else {
            "No standings available"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            sections[0],
        );
        return;
    }

    let table_area = sections[0];
    let visible = table_area.height.saturating_sub(1) as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);

    let mut lines = vec![Line::styled(
        standings_header(state.advanced),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for idx in start..end {
        lines.push(standings_line(&rows[idx], idx == state.selected, state.advanced));
    }
    frame.render_widget(Paragraph::new(lines), table_area);

    let detail = rows
        .get(state.selected)
        .map(standings_detail)
        .unwrap_or_default();
    let panel = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Selected").borders(Borders::ALL));
    frame.render_widget(panel, sections[1]);
}

fn standings_header(advanced: bool) -> String {
    let mut text = format!(
        "  {:<6} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>6} {:>4} {:>4} {:>5} {:>8} {:>8} {:>8} {:>6} {:>4} {:>8}",
        "Rank", "Team", "GP", "W", "L", "OT", "Pts", "ROW", "P%", "GF", "GA", "DIFF", "Home",
        "Road", "L10", "Streak", "Last", "Playoffs"
    );
    if advanced {
        text.push_str(&format!(" {:>3} {:>4} {:>3} {:>4}", "RW", "Conf", "Div", "Wild"));
    }
    text
}

fn standings_line(row: &StandingsRow<'_>, selected: bool, advanced: bool) -> Line<'static> {
    let team = row.team;
    let base = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let stat_span = |stat: TrackedStat, width: usize| {
        let delta = row.stat(stat);
        let text = format!(" {:>width$}", stat.format(stat.value(team)));
        Span::styled(text, base.patch(trend_style(delta.map(|d| d.trend))))
    };

    let rank = team
        .league_sequence
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let arrow_style = match row.rank_delta {
        d if d > 0 => Style::default().fg(Color::Green),
        d if d < 0 => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    let fav = if row.favorite { "★ " } else { "  " };
    let last_style = match row.last_result {
        GameResult::Win => Style::default().fg(Color::Green),
        GameResult::Loss => Style::default().fg(Color::Red),
        GameResult::NoResult => Style::default().fg(Color::DarkGray),
    };
    let playoff = if row.playoff.in_playoffs {
        Span::styled(format!(" {:>8}", "IN"), base.fg(Color::Green))
    } else {
        Span::styled(
            format!(" {:>8}", format!("{:+}", row.playoff.points_gap_to_cutoff)),
            base.fg(Color::Red),
        )
    };

    let mut spans = vec![
        Span::styled(fav.to_string(), base.fg(Color::Yellow)),
        Span::styled(format!("{rank:>3}"), base),
        Span::styled(format!("{:<3}", row.arrow.symbol()), base.patch(arrow_style)),
        Span::styled(format!(" {:<24}", truncate(team.display_name(), 24)), base),
        Span::styled(format!(" {:>3}", team.games_played), base),
        stat_span(TrackedStat::Wins, 3),
        Span::styled(format!(" {:>3}", team.losses), base),
        Span::styled(format!(" {:>3}", team.ot_losses), base),
        stat_span(TrackedStat::Points, 4),
        Span::styled(format!(" {:>4}", team.regulation_plus_ot_wins), base),
        stat_span(TrackedStat::PointPctg, 6),
        stat_span(TrackedStat::GoalFor, 4),
        stat_span(TrackedStat::GoalAgainst, 4),
        stat_span(TrackedStat::GoalDifferential, 5),
        Span::styled(
            format!(
                " {:>8} {:>8} {:>8}",
                team.home.label(),
                team.road.label(),
                team.last_10.label()
            ),
            base,
        ),
        Span::styled(format!(" {:>6}", team.streak_label()), base),
        Span::styled(format!(" {:>4}", row.last_result.letter()), base.patch(last_style)),
        playoff,
    ];
    if advanced {
        let rank = |r: Option<u32>| r.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        spans.push(Span::styled(
            format!(
                " {:>3} {:>4} {:>3} {:>4}",
                team.regulation_wins,
                rank(team.conference_sequence),
                rank(team.division_sequence),
                rank(team.wildcard_sequence)
            ),
            base,
        ));
    }
    Line::from(spans)
}

fn standings_detail(row: &StandingsRow<'_>) -> String {
    let mut lines = vec![row.playoff.explanation.replace('\n', " | ")];
    if let Some(change) = &row.rank_change {
        lines.push(change.clone());
    }
    let changes: Vec<String> = row
        .stats
        .iter()
        .filter_map(|d| d.change_text().map(|t| format!("{} {t}", d.stat.label())))
        .collect();
    if !changes.is_empty() {
        lines.push(changes.join("  "));
    }
    lines.join("\n")
}

fn render_matchup(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.matchup_view() else {
        let msg = if state.standings.is_empty() {
            "Standings not loaded yet"
        } else {
            "Pick two different teams (j/k, Tab to switch side)"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Length(4), Constraint::Min(3)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let favored = match view.prediction.verdict {
        Verdict::Favored(side) => Some(side),
        Verdict::Close => None,
    };
    let sides = [
        (view.team_a, MatchupFocus::TeamA, Side::TeamA),
        (view.team_b, MatchupFocus::TeamB, Side::TeamB),
    ];
    for (i, (team, focus, side)) in sides.into_iter().enumerate() {
        let mut title = team.display_name().to_string();
        if state.matchup_focus == focus {
            title = format!("> {title}");
        }
        let border = if favored == Some(side) {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let panel = Paragraph::new(team_card(team)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(panel, cols[i]);
    }

    let prediction = Paragraph::new(view.prediction.summary.clone())
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Prediction").borders(Borders::ALL));
    frame.render_widget(prediction, rows[1]);

    let h2h_text = match &view.head_to_head {
        None => "Loading head-to-head...".to_string(),
        Some(h2h) => {
            let mut lines = vec![h2h.summary.clone(), String::new()];
            for game in &h2h.games {
                lines.push(format!(
                    "{}  {:<4}  {}  {:<7}  {}",
                    game.date,
                    game.location.label(),
                    game.result.letter(),
                    game.score_text(),
                    game.note()
                ));
            }
            lines.join("\n")
        }
    };
    let h2h = Paragraph::new(h2h_text)
        .block(Block::default().title("Head to head").borders(Borders::ALL));
    frame.render_widget(h2h, rows[2]);
}

fn team_card(team: &TeamStanding) -> String {
    let strength = compute_matchup_strength(team, &StrengthWeights::default());
    let rank = |r: Option<u32>| r.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    [
        format!("League rank: {}", rank(team.league_sequence)),
        format!(
            "Division: {} ({})",
            rank(team.division_sequence),
            team.division_abbrev.as_deref().unwrap_or("-")
        ),
        format!("Record: {}", team.record_label()),
        format!("Points: {} ({:.3})", team.points, team.point_pctg),
        format!("Goals: {} for / {} against ({:+})", team.goal_for, team.goal_against, team.goal_differential),
        format!("ROW: {}", team.regulation_plus_ot_wins),
        format!("Home {}  Road {}", team.home.label(), team.road.label()),
        format!("L10 {}  Streak {}", team.last_10.label(), team.streak_label()),
        format!("Strength: {strength:.1}"),
    ]
    .join("\n")
}

fn render_games(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.game_rows();
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No games today").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);
    render_game_detail(frame, sections[1], state.game_detail().as_ref());
    let area = sections[0];

    let visible = area.height.saturating_sub(1) as usize;
    let (start, end) = visible_range(state.games_selected, rows.len(), visible);
    let mut lines = vec![Line::styled(
        format!(
            "  {:<14} {:<13} {:<7} {:<5} {:<5} {:<12}",
            "Status", "Matchup", "Score", "Pick", "Conf", "Result"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for idx in start..end {
        let row = &rows[idx];
        let game = row.game;
        let base = if idx == state.games_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let score = match (game.away.score, game.home.score) {
            (Some(a), Some(h)) => format!("{a}-{h}"),
            _ => "-".to_string(),
        };
        let pick = row
            .prediction
            .and_then(|p| p.pick.clone())
            .unwrap_or_else(|| "-".to_string());
        let conf = row
            .prediction
            .and_then(|p| p.confidence)
            .map(|c| "●".repeat(c as usize))
            .unwrap_or_else(|| "-".to_string());
        let outcome_style = match row.outcome {
            PickOutcome::Correct => base.fg(Color::Green),
            PickOutcome::Incorrect => base.fg(Color::Red),
            _ => base.fg(Color::DarkGray),
        };
        let status_style = if game.is_live() {
            base.fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            base
        };
        let fav = if row.favorite { "★ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(fav.to_string(), base.fg(Color::Yellow)),
            Span::styled(format!("{:<14}", row.status), status_style),
            Span::styled(
                format!(" {:<13}", format!("{} @ {}", game.away.abbrev, game.home.abbrev)),
                base,
            ),
            Span::styled(format!(" {score:<7}"), base),
            Span::styled(format!(" {pick:<5}"), base),
            Span::styled(format!(" {conf:<5}"), base),
            Span::styled(format!(" {:<12}", row.outcome.label()), outcome_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_upcoming(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.upcoming_rows();
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No games in the next 7 days")
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }
    render_schedule_table(frame, area, state, &rows, state.upcoming_selected);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.results_rows();
    if rows.is_empty() {
        let msg = if state.results_filter.is_empty() {
            "Loading season results..."
        } else {
            "No results match the search"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }
    render_schedule_table(frame, area, state, &rows, state.results_selected);
}

fn render_schedule_table(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    rows: &[ScheduleRow<'_>],
    selected: usize,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);

    let table_area = sections[0];
    let visible = table_area.height.saturating_sub(1) as usize;
    let (start, end) = visible_range(selected, rows.len(), visible);
    let mut lines = vec![Line::styled(
        format!(
            "  {:<10} {:<11} {:<12} {:<8} {:<26} {}",
            "Date", "Matchup", "Score", "Time", "Venue", "TV"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (idx, row) in rows.iter().enumerate().take(end).skip(start) {
        let base = if idx == selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let fav = if row.favorite { "★ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(fav.to_string(), base.fg(Color::Yellow)),
            Span::styled(
                format!(
                    "{:<10} {:<11} {:<12} {:<8} {:<26} {}",
                    row.date,
                    row.matchup,
                    row.score,
                    row.time,
                    truncate(&row.venue, 26),
                    row.tv
                ),
                base,
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), table_area);

    let detail = rows.get(selected).map(|row| state.detail_for(row.game));
    render_game_detail(frame, sections[1], detail.as_ref());
}

fn render_game_detail(frame: &mut Frame, area: Rect, detail: Option<&GameDetail<'_>>) {
    let text = detail.map(game_detail_text).unwrap_or_default();
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Game").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn game_detail_text(detail: &GameDetail<'_>) -> String {
    let side = |abbrev: &str, team: Option<&TeamStanding>| match team {
        Some(t) => format!("{} {} ({})", abbrev, t.display_name(), t.record_label()),
        None => abbrev.to_string(),
    };
    let game = detail.game;
    let mut lines = vec![format!(
        "{}  @  {}",
        side(&game.away.abbrev, detail.away),
        side(&game.home.abbrev, detail.home)
    )];
    let mut status = format!("{}  {}", game.local_date(), detail.status);
    if let Some(score) = &detail.score {
        status.push_str(&format!("  |  Score {score}"));
    }
    if let Some(period) = detail.period {
        status.push_str(&format!("  |  Decided in {period}"));
    }
    lines.push(status);
    let tv = if detail.tv.is_empty() { "-" } else { detail.tv.as_str() };
    lines.push(format!("Venue: {}  |  TV: {tv}", detail.venue));
    lines.join("\n")
}

fn render_predictions(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(area);

    let stats = state.prediction_summary();
    let mut summary = vec![
        format!(
            "Overall: {}/{} ({:.1}%)",
            stats.total.correct,
            stats.total.total,
            stats.total.percentage()
        ),
        format!("Current streak: {}", stats.streak),
        String::new(),
        "By confidence:".to_string(),
    ];
    for (conf, acc) in &stats.by_confidence {
        summary.push(format!(
            "  {:<5} {}/{} ({:.0}%)",
            "●".repeat(*conf as usize),
            acc.correct,
            acc.total,
            acc.percentage()
        ));
    }
    summary.push(String::new());
    summary.push("By month:".to_string());
    for (month, acc) in stats.by_month.iter().rev() {
        summary.push(format!(
            "  {month}  {}/{} ({:.0}%)",
            acc.correct,
            acc.total,
            acc.percentage()
        ));
    }
    frame.render_widget(
        Paragraph::new(summary.join("\n"))
            .block(Block::default().title("Summary").borders(Borders::ALL)),
        cols[0],
    );

    let history = state.prediction_history();
    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::styled(
            "No picks yet",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        history
            .iter()
            .take(cols[1].height.saturating_sub(2) as usize)
            .map(|p| {
                let (label, style) = match p.correct {
                    Some(true) => ("✔", Style::default().fg(Color::Green)),
                    Some(false) => ("✖", Style::default().fg(Color::Red)),
                    None => ("…", Style::default().fg(Color::DarkGray)),
                };
                Line::from(vec![
                    Span::raw(format!(
                        "{}  {:<11} pick {:<4} {:<5} ",
                        p.date,
                        p.matchup,
                        p.pick,
                        p.confidence.map(|c| "●".repeat(c as usize)).unwrap_or_default()
                    )),
                    Span::styled(label, style),
                ])
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title("History").borders(Borders::ALL)),
        cols[1],
    );
}

fn console_text(state: &AppState) -> String {
    let recent = state.recent_logs(3);
    if recent.is_empty() {
        "No alerts yet".to_string()
    } else {
        recent.join("\n")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Window of `visible` rows around `selected`, kept inside `0..total`.
fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    let shown = visible.min(total);
    let start = selected
        .saturating_sub(shown / 2)
        .min(total.saturating_sub(shown));
    (start, start + shown)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = popup_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "NHL Terminal - Help",
        "",
        "Global:",
        "  1 / 2 / 3       Standings / Matchup / Games",
        "  4 / 5 / 6       Predictions / Upcoming week / Season results",
        "  j/k or ↑/↓      Move",
        "  r               Refresh standings and games",
        "  ?               Toggle help",
        "  q               Quit",
        "",
        "Standings:",
        "  f               Toggle favorite",
        "  s / o           Sort column / order (asc, desc, original)",
        "  a               Advanced columns",
        "  [ / ]           Compare further back / closer",
        "  c / x           Re-fetch comparison / reset to default",
        "",
        "Matchup:",
        "  Tab             Switch which side j/k changes",
        "  w               Swap teams",
        "",
        "Games:",
        "  p / Enter       Cycle pick (away, home, none)",
        "  + / -           Cycle confidence 1-5",
        "",
        "Results:",
        "  /               Search (Enter keeps, Esc clears)",
        "  s / o           Sort column / order",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn popup_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |len: u16, pct: u16| (u32::from(len) * u32::from(pct.min(100)) / 100) as u16;
    let (width, height) = (scale(area.width, percent_x), scale(area.height, percent_y));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
