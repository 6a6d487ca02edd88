use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use alumnae_core::models::{board, BoardColumn};
use alumnae_core::utils::truncate;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.has_remote() && app.gatherings.is_empty() {
        render_offline(frame, area);
        return;
    }

    let columns = board(&app.gatherings);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            columns
                .iter()
                .map(|_| Constraint::Ratio(1, columns.len() as u32))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        render_column(frame, app, column, i == app.gathering_column, chunks[i]);
    }
}

fn render_column(frame: &mut Frame, app: &App, column: &BoardColumn<'_>, focused: bool, area: Rect) {
    let inner_width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();

    for (row, gathering) in column.items.iter().enumerate() {
        let selected = focused && row == app.gathering_row;
        let title_style = if selected {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };

        lines.push(Line::from(Span::styled(
            truncate(&gathering.title, inner_width),
            title_style,
        )));
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", gathering.kind), styles::highlight_style()),
            Span::styled(gathering.date.clone(), styles::muted_style()),
        ]));
        lines.push(Line::from(Span::styled(
            truncate(&gathering.location, inner_width),
            styles::muted_style(),
        )));
        let signups = if gathering.accepts_signups() {
            styles::success_style()
        } else {
            styles::muted_style()
        };
        lines.push(Line::from(Span::styled(gathering.participants_display(), signups)));
        lines.push(Line::from(""));
    }

    if column.items.is_empty() {
        lines.push(Line::from(Span::styled("Nothing here", styles::muted_style())));
    }

    let block = Block::default()
        .title(format!(" {} ({}) ", column.status.title(), column.items.len()))
        .title_style(styles::column_style(column.status))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    // Keep the selected card in view
    let scroll = if focused {
        let card_top = (app.gathering_row * 5) as u16;
        let visible = area.height.saturating_sub(2);
        card_top.saturating_sub(visible.saturating_sub(5))
    } else {
        0
    };

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn render_offline(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  The gatherings board lives on the remote backend.",
            styles::list_item_style(),
        )),
        Line::from(Span::styled(
            "  Set ALUMNAE_API_URL and ALUMNAE_API_KEY, then press u to refresh.",
            styles::muted_style(),
        )),
    ];
    let block = Block::default()
        .title(" Gatherings ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
