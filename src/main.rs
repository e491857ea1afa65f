use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset as Series, GraphType,
    Paragraph, Wrap,
};

use club_compare::clubs::ClubIndex;
use club_compare::config::AppConfig;
use club_compare::dataset::Dataset;
use club_compare::density::CurveKind;
use club_compare::export;
use club_compare::head_to_head::HeadToHead;
use club_compare::report::{Comparison, window_label};
use club_compare::state::{AppState, ClubPicker, Focus};

const MOUSE_SCROLL_LINES: u16 = 3;

struct App {
    dataset: Dataset,
    index: ClubIndex,
    state: AppState,
    export_path: PathBuf,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    fn new(dataset: Dataset, index: ClubIndex, export_path: PathBuf) -> Self {
        let mut state = AppState::new(&index);
        state.push_log(format!(
            "[INFO] Loaded {} clubs, {} matches ({} since {})",
            index.len(),
            dataset.matches.len(),
            dataset.recent.len(),
            dataset.cutoff.format("%Y-%m-%d")
        ));
        if dataset.skipped_matches > 0 {
            state.push_log(format!(
                "[WARN] Skipped {} incomplete match rows",
                dataset.skipped_matches
            ));
        }
        Self {
            dataset,
            index,
            state,
            export_path,
            rng: StdRng::from_entropy(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('e') if ctrl => self.export(),
            KeyCode::Char('u') if ctrl => self.state.focused_picker_mut().clear_query(&self.index),
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_focus(),
            KeyCode::Down => self.state.focused_picker_mut().select_next(),
            KeyCode::Up => self.state.focused_picker_mut().select_prev(),
            KeyCode::PageDown => self.state.scroll_report_down(5),
            KeyCode::PageUp => self.state.scroll_report_up(5),
            KeyCode::Enter => {
                self.state
                    .run_comparison(&self.dataset, &self.index, &mut self.rng);
            }
            KeyCode::Backspace => self.state.focused_picker_mut().pop_char(&self.index),
            KeyCode::Char(ch) if !ctrl => {
                self.state.focused_picker_mut().push_char(ch, &self.index)
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.state.scroll_report_down(MOUSE_SCROLL_LINES),
            MouseEventKind::ScrollUp => self.state.scroll_report_up(MOUSE_SCROLL_LINES),
            _ => {}
        }
    }

    fn export(&mut self) {
        let Some(comparison) = &self.state.comparison else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        match export::export_comparison(&self.export_path, comparison, self.state.plot.as_ref()) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} club rows, {} density rows to {}",
                report.club_rows,
                report.density_rows,
                self.export_path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] {err}")),
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut config = AppConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let rest = config.apply_args(&args)?;
    club_compare::init_file_logging(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;
    if !rest.is_empty() {
        tracing::warn!("ignoring unknown arguments: {rest:?}");
    }

    let dataset = Dataset::load_dir(&config.data_dir, config.today(), config.recent_days)
        .with_context(|| format!("failed to load dataset from {}", config.data_dir.display()))?;
    let index = ClubIndex::new(&dataset.clubs);
    if index.is_empty() {
        bail!("no clubs found in {}", config.data_dir.display());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(dataset, index, config.export_path.clone());
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
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
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(chunks[1]);

    let pickers = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);
    render_picker(
        frame,
        pickers[0],
        "Club 1",
        &app.state.picker_a,
        app.state.focus == Focus::ClubA,
    );
    render_picker(
        frame,
        pickers[1],
        "Club 2",
        &app.state.picker_b,
        app.state.focus == Focus::ClubB,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Percentage(45),
        ])
        .split(body[1]);
    render_report(frame, right[0], &app.state);
    render_probability_bars(frame, right[1], app.state.comparison.as_ref());
    render_density(frame, right[2], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "Type to search | Tab Switch club | ↑/↓ Select | Enter Compare | PgUp/PgDn Scroll | Ctrl-E Export | F1 Help | Esc Quit",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    format!(
        " CLUB COMPARE | {} clubs | {} matches | {} since {}",
        app.index.len(),
        app.dataset.matches.len(),
        app.dataset.recent.len(),
        app.dataset.cutoff.format("%Y-%m-%d")
    )
}

fn render_picker(frame: &mut Frame, area: Rect, title: &str, picker: &ClubPicker, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let cursor = if focused { "_" } else { "" };
    let search = Paragraph::new(format!("Search: {}{cursor}", picker.query));
    frame.render_widget(search, sections[0]);

    let list_area = sections[1];
    if picker.options.is_empty() {
        let empty = Paragraph::new("No matching club").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let selected = picker.selected.unwrap_or(0);
    let (start, end) = visible_range(selected, picker.options.len(), list_area.height as usize);
    let lines = (start..end)
        .map(|idx| {
            let name = &picker.options[idx];
            if picker.selected == Some(idx) {
                Line::from(Span::styled(
                    format!("> {name}"),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ))
            } else {
                Line::from(format!("  {name}"))
            }
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_report(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.report_text.is_empty() {
        "Pick two clubs and press Enter.".to_string()
    } else {
        state.report_text.clone()
    };
    let report = Paragraph::new(text)
        .block(Block::default().title("Results").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((state.report_scroll, 0));
    frame.render_widget(report, area);
}

fn render_probability_bars(frame: &mut Frame, area: Rect, comparison: Option<&Comparison>) {
    let block = Block::default()
        .title("Recent Laplace probabilities (%)")
        .borders(Borders::ALL);
    let Some(c) = comparison else {
        frame.render_widget(block, area);
        return;
    };
    frame.render_widget(probability_bar_chart(&c.recent).block(block), area);
}

// Smoothed probabilities are shown side by side as-is; they do not sum to 100.
fn probability_bar_chart(h2h: &HeadToHead) -> BarChart<'static> {
    let bar = |label: &'static str, p: f64, color: Color| {
        let pct = (p * 100.0).round() as u64;
        Bar::default()
            .label(label.into())
            .value(pct)
            .text_value(format!("{pct}"))
            .style(Style::default().fg(color))
    };
    let bars = [
        bar("Club 1", h2h.proba_a, Color::Blue),
        bar("Draw", h2h.proba_draw, Color::Green),
        bar("Club 2", h2h.proba_b, Color::Red),
    ];

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
}

fn render_density(frame: &mut Frame, area: Rect, state: &AppState) {
    let (Some(plot), Some(comparison)) = (&state.plot, &state.comparison) else {
        let empty = Paragraph::new("No comparison yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Density").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let title = format!(
        "Probability density ({}, since {})",
        window_label(comparison.recent_days).to_lowercase(),
        comparison.cutoff.format("%Y-%m-%d")
    );
    if plot.matches == 0 {
        let empty = Paragraph::new("No head-to-head matches in the recent window")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let y_max = (plot.y_max() * 1.1).max(0.1);
    let mean_lines = plot
        .curves
        .iter()
        .map(|c| vertical_line(c.mu, y_max))
        .collect::<Vec<_>>();
    let marker_line = vertical_line(plot.marker, y_max);

    let mut series = Vec::new();
    for (curve, line) in plot.curves.iter().zip(&mean_lines) {
        let color = curve_color(curve.kind);
        series.push(
            Series::default()
                .name(curve_label(curve.kind, curve.mu, comparison))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&curve.points),
        );
        series.push(
            Series::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(line),
        );
    }
    series.push(
        Series::default()
            .name(format!("Random draw: {:.2}", plot.marker))
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Gray))
            .data(&marker_line),
    );

    let chart = Chart::new(series)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Rate")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![Span::raw("0"), Span::raw("0.5"), Span::raw("1")]),
        )
        .y_axis(
            Axis::default()
                .title("Density")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.1}"))]),
        );
    frame.render_widget(chart, area);
}

// Sparse points read as a dashed marker line.
fn vertical_line(x: f64, y_max: f64) -> Vec<(f64, f64)> {
    const STEPS: usize = 24;
    (0..=STEPS)
        .map(|i| (x, y_max * i as f64 / STEPS as f64))
        .collect()
}

fn curve_color(kind: CurveKind) -> Color {
    match kind {
        CurveKind::WinA => Color::Blue,
        CurveKind::WinB => Color::Red,
        CurveKind::Draw => Color::Green,
    }
}

fn curve_label(kind: CurveKind, mu: f64, comparison: &Comparison) -> String {
    match kind {
        CurveKind::WinA => format!("Win rate {}: {mu:.2}", comparison.club_a.name),
        CurveKind::WinB => format!("Win rate {}: {mu:.2}", comparison.club_b.name),
        CurveKind::Draw => format!("Draw: {mu:.2}"),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Club Compare - Help",
        "",
        "Pickers:",
        "  type         Filter by name or acronym",
        "  Backspace    Delete last character",
        "  Ctrl-U       Clear search",
        "  ↑/↓          Move selection",
        "  Tab          Switch Club 1 / Club 2",
        "",
        "Results:",
        "  Enter        Compare selected clubs",
        "  PgUp/PgDn    Scroll report",
        "  Ctrl-E       Export workbook",
        "",
        "  F1           Toggle help",
        "  Esc          Close help / quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
