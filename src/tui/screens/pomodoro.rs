use std::time::Duration;

use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::{BackendClient, StatsSnapshot};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::display;
use crate::reporter::{SaveNotice, SessionReporter};
use crate::stats::{self, month_name, StatsQuery};
use crate::timer::{IntervalScheduler, TickId, TickOutcome, TickScheduler, TimerEngine, TimerStatus};
use crate::tui::event::{AppEvent, EventHandler};
use crate::tui::widgets::countdown::CountdownWidget;
use crate::tui::widgets::stats_panel::StatsPanelWidget;
use crate::tui::worker::{BackendEvent, BackendJob, BackendWorker};
use crate::tui::Tui;

/// How long the input thread blocks per poll.
const INPUT_POLL: Duration = Duration::from_millis(250);

/// State of the Pomodoro screen.
///
/// Input handlers mutate this and return the backend work they want done;
/// the run loop hands that work to the worker. Rendering only reads.
pub struct PomodoroScreen<S: TickScheduler, C: Clock> {
    engine: TimerEngine<S>,
    reporter: SessionReporter,
    clock: C,
    stats: StatsSnapshot,
    stats_loading: bool,
    years: Vec<i32>,
    baseline_year: i32,
    year_filter: Option<i32>,
    month_filter: Option<u32>,
    /// Some while the user is typing a new duration.
    minutes_input: Option<String>,
    notice: Option<SaveNotice>,
    should_quit: bool,
}

impl<S: TickScheduler, C: Clock> PomodoroScreen<S, C> {
    pub fn new(engine: TimerEngine<S>, clock: C, baseline_year: i32) -> Self {
        Self {
            engine,
            reporter: SessionReporter::new(),
            clock,
            stats: StatsSnapshot::default(),
            stats_loading: false,
            years: vec![baseline_year],
            baseline_year,
            year_filter: None,
            month_filter: None,
            minutes_input: None,
            notice: None,
            should_quit: false,
        }
    }

    /// Work to kick off as soon as the screen is up.
    pub fn startup_jobs(&mut self) -> Vec<BackendJob> {
        vec![self.stats_job(), BackendJob::LoadYears]
    }

    pub fn query(&self) -> StatsQuery {
        StatsQuery::new(self.year_filter, self.month_filter)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn engine(&self) -> &TimerEngine<S> {
        &self.engine
    }

    pub fn reporter(&self) -> &SessionReporter {
        &self.reporter
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    #[cfg(test)]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn notice(&self) -> Option<&SaveNotice> {
        self.notice.as_ref()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Vec<BackendJob> {
        if self.minutes_input.is_some() {
            self.handle_minutes_key(code);
            return Vec::new();
        }

        match code {
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                self.engine.start();
            }
            KeyCode::Char('p') => {
                self.engine.pause();
            }
            KeyCode::Char('r') => {
                self.engine.reset();
            }
            KeyCode::Char('m') => {
                // Duration is locked while the countdown runs.
                if self.engine.status() != TimerStatus::Running {
                    self.minutes_input = Some(self.engine.configured_minutes().to_string());
                }
            }
            KeyCode::Char('w') => return self.save_jobs(),
            KeyCode::Char('l') => return vec![self.stats_job()],
            KeyCode::Char(']') => self.year_filter = self.cycle_year(true),
            KeyCode::Char('[') => self.year_filter = self.cycle_year(false),
            KeyCode::Char('.') => self.month_filter = cycle_month(self.month_filter, true),
            KeyCode::Char(',') => self.month_filter = cycle_month(self.month_filter, false),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Vec::new()
    }

    fn handle_minutes_key(&mut self, code: KeyCode) {
        let Some(input) = self.minutes_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let typed = std::mem::take(input);
                self.minutes_input = None;
                self.engine.configure(&typed);
            }
            KeyCode::Esc => self.minutes_input = None,
            _ => {}
        }
    }

    pub fn handle_tick(&mut self, id: TickId) {
        if let TickOutcome::Completed(_) = self.engine.tick(id) {
            self.reporter.on_completion();
        }
    }

    pub fn handle_backend(&mut self, event: BackendEvent) -> Vec<BackendJob> {
        match event {
            BackendEvent::SaveFinished(result) => {
                let notice = self.reporter.finish_save(result);
                let refresh = notice.refresh_stats();
                self.notice = Some(notice);
                if refresh {
                    return vec![self.stats_job(), BackendJob::LoadYears];
                }
            }
            BackendEvent::StatsLoaded(result) => {
                self.stats = stats::resolve_stats(result);
                self.stats_loading = false;
            }
            BackendEvent::YearsLoaded(result) => {
                self.years = stats::resolve_years(result, self.baseline_year);
            }
        }
        Vec::new()
    }

    fn save_jobs(&mut self) -> Vec<BackendJob> {
        match self
            .reporter
            .begin_save(self.year_filter, self.month_filter, &self.clock)
        {
            Some(request) => {
                self.notice = None;
                vec![BackendJob::Save(request)]
            }
            None => Vec::new(),
        }
    }

    fn stats_job(&mut self) -> BackendJob {
        self.stats_loading = true;
        BackendJob::LoadStats(self.query())
    }

    /// Step through "all years" followed by the known years.
    fn cycle_year(&self, forward: bool) -> Option<i32> {
        let choices: Vec<Option<i32>> = std::iter::once(None)
            .chain(self.years.iter().copied().map(Some))
            .collect();
        let current = choices
            .iter()
            .position(|c| *c == self.year_filter)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        choices[next]
    }
}

/// Step through "all months" then January..December.
fn cycle_month(current: Option<u32>, forward: bool) -> Option<u32> {
    let index = current.unwrap_or(0);
    let next = if forward { (index + 1) % 13 } else { (index + 12) % 13 };
    if next == 0 {
        None
    } else {
        Some(next)
    }
}

/// What the user walks away with.
pub struct PomodoroOutcome {
    /// Completed pomodoros that never reached the backend.
    pub unsaved: u32,
}

/// Run the interactive Pomodoro timer until the user quits.
pub fn run(terminal: &mut Tui, config: &AppConfig, client: BackendClient) -> Result<PomodoroOutcome> {
    let events = EventHandler::new(INPUT_POLL);

    let tick_tx = events.sender();
    let scheduler = IntervalScheduler::new(move |id| tick_tx.send(AppEvent::Tick(id)).is_ok());
    let engine = TimerEngine::with_minutes(scheduler, config.timer.default_minutes);

    let worker = BackendWorker::spawn(client, events.sender())?;
    let mut screen = PomodoroScreen::new(engine, SystemClock, config.stats.baseline_year);
    for job in screen.startup_jobs() {
        worker.submit(job);
    }

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            render(frame, area, &screen);
        })?;

        let jobs = match events.next()? {
            AppEvent::Key(key) if key.kind == KeyEventKind::Press => screen.handle_key(key.code),
            AppEvent::Key(_) | AppEvent::Resize(_, _) => Vec::new(),
            AppEvent::Tick(id) => {
                screen.handle_tick(id);
                Vec::new()
            }
            AppEvent::Backend(event) => screen.handle_backend(event),
        };
        for job in jobs {
            worker.submit(job);
        }

        if screen.should_quit() {
            break;
        }
    }

    Ok(PomodoroOutcome {
        unsaved: screen.reporter().completed_count(),
    })
}

pub fn render<S: TickScheduler, C: Clock>(
    frame: &mut ratatui::Frame,
    area: Rect,
    screen: &PomodoroScreen<S, C>,
) {
    let outer = Block::default()
        .title(" Pomodoro ")
        .borders(Borders::ALL);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::vertical([
        Constraint::Min(12),   // ring + session panel
        Constraint::Min(8),    // statistics
        Constraint::Length(1), // notice
        Constraint::Length(1), // key hint
    ])
    .split(inner);

    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let snapshot = screen.engine().snapshot();
    let projection = display::project(&snapshot);
    frame.render_widget(
        CountdownWidget::new(&projection).running(snapshot.is_running()),
        top[0],
    );

    render_session(frame, top[1], screen);

    frame.render_widget(
        StatsPanelWidget::new(screen.stats(), screen.query()).loading(screen.stats_loading),
        rows[1],
    );

    let notice = match screen.notice() {
        Some(notice) => {
            let color = if notice.is_success() { Color::Green } else { Color::Red };
            Paragraph::new(format!("  {}", notice.text())).style(Style::default().fg(color))
        }
        None if screen.reporter().is_saving() => {
            Paragraph::new("  Saving...").style(Style::default().fg(Color::Yellow))
        }
        None => Paragraph::new(""),
    };
    frame.render_widget(notice, rows[2]);

    frame.render_widget(Paragraph::new(key_hint(screen)), rows[3]);
}

fn render_session<S: TickScheduler, C: Clock>(
    frame: &mut ratatui::Frame,
    area: Rect,
    screen: &PomodoroScreen<S, C>,
) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (status, status_color) = match screen.engine.status() {
        TimerStatus::Idle => ("Ready", Color::White),
        TimerStatus::Running => ("Focus", Color::Green),
        TimerStatus::Paused => ("Paused", Color::Yellow),
    };

    let duration = match &screen.minutes_input {
        Some(typed) => Span::styled(format!("{typed}_ min"), bold.fg(Color::Cyan)),
        None => Span::raw(format!("{} min", screen.engine.configured_minutes())),
    };

    let year = screen
        .year_filter
        .map(|y| y.to_string())
        .unwrap_or_else(|| "All years".into());
    let month = screen
        .month_filter
        .map(month_name)
        .unwrap_or_else(|| "All months".into());

    let lines = vec![
        Line::from(vec![
            Span::raw("  Status:     "),
            Span::styled(status, bold.fg(status_color)),
        ]),
        Line::from(vec![Span::raw("  Duration:   "), duration]),
        Line::from(vec![
            Span::raw("  Completed:  "),
            Span::styled(screen.reporter.completed_count().to_string(), bold.fg(Color::Red)),
        ]),
        Line::raw(""),
        Line::from(vec![Span::raw("  Year:       "), Span::raw(year)]),
        Line::from(vec![Span::raw("  Month:      "), Span::raw(month)]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Session ").borders(Borders::ALL)),
        area,
    );
}

fn key_hint<S: TickScheduler, C: Clock>(screen: &PomodoroScreen<S, C>) -> Line<'static> {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    if screen.minutes_input.is_some() {
        return Line::from(vec![
            key("  [0-9]", Color::Green),
            Span::raw(" type minutes  "),
            key("[Enter]", Color::Green),
            Span::raw(" apply  "),
            key("[Esc]", Color::Red),
            Span::raw(" cancel"),
        ]);
    }

    let mut spans = if screen.engine.status() == TimerStatus::Running {
        vec![key("  [p]", Color::Green), Span::raw(" pause  ")]
    } else {
        vec![
            key("  [s]", Color::Green),
            Span::raw(" start  "),
            key("[m]", Color::Green),
            Span::raw(" minutes  "),
        ]
    };
    spans.extend([key("[r]", Color::Green), Span::raw(" reset  ")]);
    if screen.reporter.can_save() {
        spans.extend([key("[w]", Color::Green), Span::raw(" save  ")]);
    }
    spans.extend([
        key("[ ]", Color::Cyan),
        Span::raw(" year  "),
        key(", .", Color::Cyan),
        Span::raw(" month  "),
        key("[l]", Color::Cyan),
        Span::raw(" load  "),
        key("[q]", Color::Red),
        Span::raw(" quit"),
    ]);
    Line::from(spans)
}
