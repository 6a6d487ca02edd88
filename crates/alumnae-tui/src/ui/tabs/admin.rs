use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use alumnae_core::directory::AdminSummary;
use alumnae_core::utils::{format_cohort, format_percent, truncate};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.admin_summary();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    render_summary_cards(frame, &summary, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    render_bulk_upload(frame, body[0]);
    render_pending_table(frame, app, body[1]);
}

fn card(frame: &mut Frame, title: &str, value: Span<'static>, note: String, area: Rect) {
    let lines = vec![
        Line::from(value),
        Line::from(Span::styled(note, styles::muted_style())),
    ];
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary_cards(frame: &mut Frame, summary: &AdminSummary, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    card(
        frame,
        "Awaiting Approval",
        Span::styled(format!("{} members", summary.pending), styles::highlight_style()),
        format!("{} rejected so far", summary.rejected),
        cards[0],
    );
    card(
        frame,
        "Dues Collected",
        Span::styled(summary.dues_display(), styles::success_style()),
        format!("{} of members paid", format_percent(summary.paid_percent)),
        cards[1],
    );
    card(
        frame,
        "Unpaid Members",
        Span::styled(format!("{} members", summary.unpaid_count), styles::error_style()),
        "Reminder messages needed".to_string(),
        cards[2],
    );
}

fn render_bulk_upload(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Contact spreadsheet", styles::list_item_style())),
        Line::from(Span::styled(".xlsx and .csv files", styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[b]", styles::help_key_style()),
            Span::styled(" Upload", styles::muted_style()),
        ]),
    ];
    let block = Block::default()
        .title(" Bulk Contact Update ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_pending_table(frame: &mut Frame, app: &App, area: Rect) {
    let pending = app.pending_members();

    let block = Block::default()
        .title(format!(" Membership Approval ({}) ", pending.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if pending.is_empty() {
        let message = Line::from(Span::styled(
            "No registrations are waiting for approval.",
            styles::muted_style(),
        ));
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Cohort"),
        Cell::from("Region"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = pending
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let style = if i == app.admin_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate(&member.name, 20)),
                Cell::from(format_cohort(member.cohort)),
                Cell::from(truncate(&member.region, 16)),
                Cell::from(Span::styled(
                    member.approval_status.to_string(),
                    styles::approval_style(member.approval_status),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Min(8),
    ];

    let mut state = TableState::default();
    state.select(Some(app.admin_selection));
    frame.render_stateful_widget(Table::new(rows, widths).header(header).block(block), area, &mut state);
}
