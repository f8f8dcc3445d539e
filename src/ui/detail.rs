//! Detail overlay rendering.
//!
//! Displays a modal overlay for the selected metric: its reading, verdict,
//! any notice, the payload fields it is read from, and the threshold legend.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::common::centered;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the metric detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(metric) = app.selected_metric() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);
    let overlay_area = centered(area, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(8), // Reading and verdict
        Constraint::Min(6),    // Threshold legend
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(metric.judgment.tier);
    let schema = app.schemas.get(metric.kind);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut header_lines = vec![
        Line::from(vec![Span::styled(format!(" {} ", metric.kind.description()), bold)]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Value: "),
            Span::styled(metric.display_value(), bold),
            Span::raw("    Observed: "),
            Span::styled(metric.display_timestamp(), bold),
        ]),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", metric.judgment.symbol, metric.judgment.label),
                status_style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![Span::styled(
            format!(
                " Fields: time \"{}\", value \"{}\"",
                schema.time_field, schema.value_field
            ),
            dim,
        )]),
    ];

    if let Some(ref notice) = metric.notice {
        header_lines.push(Line::from(vec![Span::styled(
            format!(" {} error: {}", notice.kind.label(), notice.message),
            app.theme.status_style(solwatch_types::Tier::Elevated),
        )]));
    } else if metric.credential_missing {
        header_lines.push(Line::from(vec![Span::styled(
            " Set OWM_UV_KEY or uv_api_key to enable this metric",
            dim,
        )]));
    }

    let header_block = Block::default()
        .title(format!(" {} Detail ", metric.kind.name()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let header = Paragraph::new(header_lines).block(header_block).wrap(Wrap { trim: false });
    frame.render_widget(header, chunks[0]);

    // ===== THRESHOLD LEGEND =====
    let legend_header = Row::new(vec![Cell::from("Range"), Cell::from("Tier")])
        .height(1)
        .style(app.theme.header);

    let legend_rows: Vec<Row> = metric
        .kind
        .bands()
        .iter()
        .map(|(range, tier)| {
            let current = metric.reading.is_some() && *tier == metric.judgment.tier;
            let marker = if current { "▶ " } else { "  " };
            let row = Row::new(vec![
                Cell::from(format!("{}{}", marker, range)),
                Cell::from(format!("{} {}", tier.tag(), tier)).style(app.theme.status_style(*tier)),
            ]);
            if current {
                row.style(app.theme.selected)
            } else {
                row
            }
        })
        .collect();

    let legend = Table::new(legend_rows, [Constraint::Fill(1), Constraint::Fill(1)])
        .header(legend_header)
        .block(
            Block::default()
                .title(" Thresholds ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(legend, chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑↓:other metric  Esc:close ",
        dim,
    )]));
    frame.render_widget(footer, chunks[2]);
}
