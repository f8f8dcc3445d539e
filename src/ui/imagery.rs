//! Imagery view rendering.
//!
//! The terminal cannot show the images themselves, so this view lists how
//! fresh each one is.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use solwatch_types::Tier;

use crate::app::App;
use crate::data::duration::format_countdown;
use crate::ui::common::render_empty;

/// Images older than this are flagged as stale.
const STALE_AFTER_HOURS: i64 = 6;

/// Render the Imagery view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        return;
    };
    if dashboard.images.is_empty() {
        render_empty(frame, app, area, "Imagery (0)", "No images fetched yet");
        return;
    }

    let now = Utc::now();

    let header = Row::new(vec![
        Cell::from("Image"),
        Cell::from("Updated"),
        Cell::from("Age"),
        Cell::from("Size"),
        Cell::from("Type"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = dashboard
        .images
        .iter()
        .map(|image| {
            if let Some(ref err) = image.error {
                return Row::new(vec![
                    Cell::from(image.label.clone()),
                    Cell::from(format!("failed: {}", err))
                        .style(app.theme.status_style(Tier::Elevated)),
                    Cell::from("-"),
                    Cell::from("-"),
                    Cell::from("-"),
                ]);
            }

            let timestamp = image.timestamp();
            let age_style = if is_stale(timestamp, now) {
                app.theme.status_style(Tier::Elevated)
            } else {
                Style::default()
            };
            let kind = if image.animated { "animation" } else { "still" };

            Row::new(vec![
                Cell::from(image.label.clone()),
                Cell::from(format!("{} UTC", timestamp.format("%Y-%m-%d %H:%M"))),
                Cell::from(format_age(timestamp, now)).style(age_style),
                Cell::from(image.content_length.map(format_size).unwrap_or_else(|| "-".into())),
                Cell::from(kind),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),    // Image
        Constraint::Fill(2),    // Updated
        Constraint::Length(9),  // Age
        Constraint::Length(9),  // Size
        Constraint::Length(10), // Type
    ];

    let selected = app.selected_index.min(rows.len().saturating_sub(1));
    let title = format!(" Imagery ({}) ", rows.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn is_stale(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - timestamp).num_hours() >= STALE_AFTER_HOURS
}

fn format_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds().max(0) as u64;
    format_countdown(secs)
}

/// Format a byte count (e.g., 2048 -> "2.0K", 1572864 -> "1.5M").
fn format_size(n: u64) -> String {
    if n >= 1024 * 1024 {
        format!("{:.1}M", n as f64 / (1024.0 * 1024.0))
    } else if n >= 1024 {
        format!("{:.1}K", n as f64 / 1024.0)
    } else {
        format!("{}B", n)
    }
}
