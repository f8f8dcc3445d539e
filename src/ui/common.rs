//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::{format_countdown, format_duration};

/// Render the header bar with the overall verdict.
///
/// Displays: overall symbol and label, each metric's value, countdown to the
/// next scheduled fetch.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" SOLWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref dashboard) = app.dashboard else {
        let line = Line::from(vec![title, Span::raw("│ Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let overall_style = app.theme.status_style(dashboard.overall.tier);
    let mut spans = vec![
        Span::styled(format!(" {} ", dashboard.overall.symbol), overall_style),
        title,
        Span::raw("│ "),
        Span::styled(dashboard.overall.label, overall_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │"),
    ];

    for metric in &dashboard.metrics {
        spans.push(Span::raw(format!(" {} ", metric.kind.name())));
        spans.push(Span::styled(
            metric.display_value(),
            app.theme.status_style(metric.judgment.tier),
        ));
    }

    if let Some(secs) = dashboard.seconds_until_refresh(Utc::now()) {
        spans.push(Span::raw(" │ next fetch in "));
        spans.push(Span::styled(
            format_countdown(secs),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view; the Notices tab shows a count.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let notice_count = app.dashboard.as_ref().map_or(0, |d| d.notices.len());

    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| match view {
            View::Notices if notice_count > 0 => {
                Line::from(format!(" {}:{} ({}) ", i + 1, view.label(), notice_count))
            }
            _ => Line::from(format!(" {}:{} ", i + 1, view.label())),
        })
        .collect();

    let selected = View::ALL.iter().position(|v| *v == app.current_view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | r:retry q:quit", err)
    } else if let Some(ref dashboard) = app.dashboard {
        let elapsed = dashboard.last_updated.elapsed();

        let controls = match app.current_view {
            View::Metrics => "↑↓:select Enter:detail Tab:switch r:refresh ?:help q:quit",
            View::Imagery | View::Notices => "↑↓:select Tab:switch r:refresh ?:help q:quit",
        };

        let refresh = app
            .refresh_interval
            .map(|d| format!(" every {}", format_duration(d)))
            .unwrap_or_default();

        format!(
            " {}{} | Collected {} | Updated {:.0}s ago | {}",
            app.source_description(),
            refresh,
            dashboard.collected_at.format("%H:%M UTC"),
            elapsed.as_secs_f64(),
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2/3       Metrics/Imagery/Notices"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Metric detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now (skip cache)"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 19u16.min(area.height.saturating_sub(2));
    let help_area = centered(area, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// A `width` x `height` rectangle centered in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// An empty-state paragraph inside a bordered block.
pub fn render_empty(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let empty = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block);
    frame.render_widget(empty, area);
}
