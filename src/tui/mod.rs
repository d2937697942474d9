//! Ratatui-based terminal UI.
//!
//! The TUI mounts a [`Dashboard`] on start, polls it every tick, and draws
//! whatever view the current status maps to: a loading animation, the
//! failure screen, or the three vaccination charts.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::dashboard::Dashboard;
use crate::data::VaccinationSource;
use crate::domain::LoadStatus;
use crate::error::AppError;
use crate::render::{
    BarChartModel, ChartSet, FAILURE_MESSAGE, PAGE_HEADING, PAGE_TITLE, PieChartModel, View,
};

mod charts;

use charts::{DoseBarChart, SlicePieChart, bar_y_max, fmt_count, ratatui_color};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SPINNER_INTERVAL: Duration = Duration::from_millis(300);

/// Inner radius of the gender donut relative to its outer radius.
const GENDER_HOLE: f64 = 0.4 / 0.7;

/// Start the TUI.
pub fn run(source: Arc<dyn VaccinationSource>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Dashboard::mount(source));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dashboard: Dashboard,
    spinner_frame: usize,
    last_spin: Instant,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            spinner_frame: 0,
            last_spin: Instant::now(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.dashboard.poll() {
                needs_redraw = true;
            }
            if self.tick_spinner() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(POLL_INTERVAL).map_err(|e| AppError::data(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Advance the loading animation. Returns `true` when a frame changed.
    fn tick_spinner(&mut self) -> bool {
        if self.dashboard.status() != LoadStatus::InProgress {
            return false;
        }
        if self.last_spin.elapsed() < SPINNER_INTERVAL {
            return false;
        }
        self.last_spin = Instant::now();
        self.spinner_frame = (self.spinner_frame + 1) % 4;
        true
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                PAGE_TITLE,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(PAGE_HEADING, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.dashboard.view() {
            View::Empty => {}
            View::Loading => self.draw_loading(frame, area),
            View::Failure => draw_failure(frame, area),
            View::Charts(charts) => draw_charts(frame, area, &charts),
        }
    }

    fn draw_loading(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let dots = "●".repeat(self.spinner_frame);
        let pad = " ".repeat(3 - self.spinner_frame.min(3));
        let text = Text::from(vec![
            Line::from(format!("{dots}{pad}")),
            Line::from(Span::styled("Loading", Style::default().fg(Color::Gray))),
        ]);
        let p = Paragraph::new(text).alignment(Alignment::Center);
        frame.render_widget(p, centered_rows(area, 2));
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let status = self.dashboard.status();
        let line = Line::from(vec![
            Span::styled("q quit", Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                format!("status: {}", status.display_name()),
                Style::default().fg(Color::Yellow),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_failure(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let red = Style::default().fg(Color::Red);
    let text = Text::from(vec![
        Line::from(Span::styled(" \\   / ", red)),
        Line::from(Span::styled("   X   ", red)),
        Line::from(Span::styled(" /   \\ ", red)),
        Line::from(""),
        Line::from(Span::styled(
            FAILURE_MESSAGE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ]);
    let p = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(p, centered_rows(area, 5));
}

fn draw_charts(frame: &mut ratatui::Frame<'_>, area: Rect, charts: &ChartSet) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let pies = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    draw_coverage(frame, rows[0], &charts.coverage);
    draw_pie(frame, pies[0], &charts.gender, GENDER_HOLE);
    draw_pie(frame, pies[1], &charts.age, 0.0);
}

fn draw_coverage(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &BarChartModel) {
    let legend = chart.series.iter().flat_map(|s| {
        [
            Span::styled(" ◆ ", Style::default().fg(ratatui_color(s.color))),
            Span::raw(s.name),
        ]
    });
    let mut title = vec![Span::raw(format!(" {} ", chart.title))];
    title.extend(legend);
    title.push(Span::raw(" "));

    let block = Block::default().title(Line::from(title)).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let (chart_rect, insets) = chart_layout(inner);
    frame.render_widget(DoseBarChart { chart }, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, chart);
    }
}

fn draw_pie(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &PieChartModel, hole: f64) {
    let block = Block::default()
        .title(format!(" {} ", chart.title))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let legend_height = chart.slices.len() as u16;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
        .split(inner);

    frame.render_widget(
        SlicePieChart {
            chart,
            inner_radius: hole,
        },
        parts[0],
    );

    let lines: Vec<Line> = chart
        .slices
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(ratatui_color(s.color))),
                Span::styled(s.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {} ({:.1}%)", s.count, s.share * 100.0),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), parts[1]);
}

/// Columns available to each date label, at least one.
fn label_slot(width: u16, groups: usize) -> u16 {
    let groups = u16::try_from(groups).unwrap_or(u16::MAX).max(1);
    (width / groups).max(1)
}

/// A `height`-row strip vertically centered in `area`.
fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + (area.height - height) / 2,
        width: area.width,
        height,
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 1,
        top: 1,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 4
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Y ticks on the left inset, one date label per bar pair underneath.
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    model: &BarChartModel,
) {
    let style = Style::default().fg(Color::Gray);
    let y_max = bar_y_max(model);

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_count(u * y_max);
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let n = model.groups.len();
    if n == 0 {
        return;
    }
    let y = chart.y + chart.height;
    if y >= inner.y + inner.height {
        return;
    }
    let slot = label_slot(chart.width, n);
    for (i, group) in model.groups.iter().enumerate() {
        let label: String = group.label.chars().take(slot as usize).collect();
        let label_len = label.chars().count() as u16;
        let center = chart.x + ((i as f64 + 0.5) / n as f64 * chart.width as f64) as u16;
        let start = center.saturating_sub(label_len / 2).max(chart.x);
        if start + label_len > chart.x + chart.width {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_layout_falls_back_when_small() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 12, 5));
        assert_eq!(rect, Rect::new(0, 0, 12, 5));
        assert!(insets.is_none());

        let (rect, insets) = chart_layout(Rect::new(2, 3, 80, 20));
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(10, 4, 71, 18));
    }

    #[test]
    fn label_slot_survives_huge_group_counts() {
        assert_eq!(label_slot(70, 7), 10);
        assert_eq!(label_slot(70, 100), 1);
        assert_eq!(label_slot(70, 65_536), 1);
        assert_eq!(label_slot(70, usize::MAX), 1);
    }

    #[test]
    fn centered_rows_stays_inside() {
        assert_eq!(centered_rows(Rect::new(0, 0, 10, 10), 2), Rect::new(0, 4, 10, 2));
        assert_eq!(centered_rows(Rect::new(0, 0, 10, 1), 5), Rect::new(0, 0, 10, 1));
    }
}
