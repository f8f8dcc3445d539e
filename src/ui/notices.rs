//! Notices view rendering.
//!
//! Lists every fetch, parse and image problem from the latest snapshot. An
//! error from the data source itself is shown first.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use solwatch_types::Tier;

use crate::app::App;
use crate::data::NoticeKind;
use crate::ui::common::render_empty;

/// Render the Notices view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        return;
    };

    if dashboard.notices.is_empty() && app.load_error.is_none() {
        render_empty(frame, app, area, "Notices (0)", "All feeds parsed cleanly");
        return;
    }

    let header = Row::new(vec![Cell::from("Kind"), Cell::from("Source"), Cell::from("Message")])
        .height(1)
        .style(app.theme.header);

    let source_row = app.load_error.as_ref().map(|err| {
        Row::new(vec![
            Cell::from("source").style(app.theme.status_style(Tier::High)),
            Cell::from(app.source_description().to_string()),
            Cell::from(err.clone()),
        ])
    });

    let rows: Vec<Row> = source_row
        .into_iter()
        .chain(dashboard.notices.iter().map(|notice| {
            Row::new(vec![
                Cell::from(notice.kind.label()).style(kind_style(app, notice.kind)),
                Cell::from(notice.subject.clone()),
                Cell::from(notice.message.clone()),
            ])
        }))
        .collect();

    let widths = [
        Constraint::Length(8), // Kind
        Constraint::Fill(1),   // Source
        Constraint::Fill(3),   // Message
    ];

    let selected = app.selected_index.min(rows.len().saturating_sub(1));
    let title = format!(" Notices ({}) ", rows.len());

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

fn kind_style(app: &App, kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Fetch => app.theme.status_style(Tier::High),
        NoticeKind::Parse | NoticeKind::Image => app.theme.status_style(Tier::Elevated),
    }
}
