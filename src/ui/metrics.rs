//! Metrics view rendering.
//!
//! Displays one row per metric with its latest value, observation time,
//! recent trend and verdict.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::MetricStatus;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Metrics view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Metric"),
        Cell::from("Value"),
        Cell::from("Observed"),
        Cell::from("Trend"),
        Cell::from("Δ"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = dashboard
        .metrics
        .iter()
        .map(|m| {
            let status_style = app.theme.status_style(m.judgment.tier);

            let sparkline = render_sparkline(&app.history.sparkline(m.kind));
            let delta = app
                .history
                .trend(m.kind)
                .map(|d| format!("{:+.2}", d))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(m.kind.description()),
                Cell::from(m.display_value()).style(value_style(m, status_style)),
                Cell::from(m.display_timestamp()),
                Cell::from(sparkline),
                Cell::from(delta),
                Cell::from(format!("{} {}", m.judgment.symbol, status_label(m))).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // Metric
        Constraint::Length(10), // Value
        Constraint::Length(21), // Observed
        Constraint::Length(8),  // Trend
        Constraint::Length(7),  // Δ
        Constraint::Fill(3),    // Status
    ];

    let selected = app.selected_index.min(rows.len().saturating_sub(1));
    let title = format!(
        " Metrics [{}/{}] {} {} ",
        selected + 1,
        rows.len(),
        dashboard.overall.symbol,
        dashboard.overall.label
    );

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

/// Verdict text, with a hint when the reading is a placeholder.
fn status_label(metric: &MetricStatus) -> String {
    if metric.credential_missing {
        format!("{} (no API key)", metric.judgment.label)
    } else if metric.notice.is_some() && metric.reading.is_some() {
        format!("{} (unparsed)", metric.judgment.label)
    } else {
        metric.judgment.label.to_string()
    }
}

/// Sentinel values are dimmed so they are not mistaken for real data.
fn value_style(metric: &MetricStatus, status_style: Style) -> Style {
    if metric.notice.is_some() {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        status_style
    }
}

pub(crate) fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    // Take last 8 values
    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
