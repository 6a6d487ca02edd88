use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

use alumnae_core::directory::{BirthdayFilter, FilterState, PaymentFilter, PAGE_SIZE};
use alumnae_core::utils::{format_cohort, truncate};

use crate::app::{App, AppState, FilterItem};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search and active filters
            Constraint::Min(5),    // Member table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_member_table(frame, app, chunks[1]);
    render_pagination(frame, app, chunks[2]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let filter = app.directory.state().filter();

    let mut spans = vec![
        Span::styled(" Search: ", styles::muted_style()),
        Span::styled(
            format!("{}{}", app.search_input, if searching { "▌" } else { "" }),
            styles::search_style(),
        ),
    ];

    let summary = filter_summary(filter);
    if !summary.is_empty() {
        spans.push(Span::styled("   Filters: ", styles::muted_style()));
        spans.push(Span::styled(summary, styles::highlight_style()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Short description of the non-search filters, empty when none are set.
fn filter_summary(filter: &FilterState) -> String {
    let mut parts = Vec::new();
    if !filter.regions.is_empty() {
        parts.push(filter.regions.iter().cloned().collect::<Vec<_>>().join("/"));
    }
    if !filter.tags.is_empty() {
        parts.push(
            filter
                .tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    if filter.cohort_range != FilterState::full_cohort_range() {
        let (lo, hi) = (*filter.cohort_range.start(), *filter.cohort_range.end());
        parts.push(if lo == hi {
            format!("cohort {}", lo)
        } else if hi == u32::MAX {
            format!("cohort {}+", lo)
        } else {
            format!("cohort {}-{}", lo, hi)
        });
    }
    if filter.payment != PaymentFilter::All {
        parts.push(filter.payment.to_string());
    }
    if filter.birthday != BirthdayFilter::All {
        parts.push(format!("birthday: {}", filter.birthday));
    }
    parts.join(", ")
}

fn render_member_table(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.directory.state().current_page();

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Cohort"),
        Cell::from("Region"),
        Cell::from("Job"),
        Cell::from("Company"),
        Cell::from("Dues"),
        Cell::from("Tags"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let style = if i == app.row_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(truncate(&member.name, 20)),
                Cell::from(format_cohort(member.cohort)),
                Cell::from(truncate(&member.region, 16)),
                Cell::from(truncate(&member.job, 16)),
                Cell::from(truncate(&member.company, 18)),
                Cell::from(Span::styled(
                    member.payment_status.to_string(),
                    styles::payment_style(member.payment_status),
                )),
                Cell::from(Span::styled(truncate(&member.tags_display(), 24), styles::tag_style())),
            ])
            .style(style)
        })
        .collect();

    let title = if app.directory.state().filter().is_active() {
        format!(" Members ({} of {}) ", page.total_count, app.directory.state().roster().len())
    } else {
        format!(" Members ({}) ", page.total_count)
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(matches!(app.state, AppState::Normal)));

    if rows.is_empty() {
        let message = if app.directory.state().roster().is_empty() {
            "No members yet. Press n to register the first one."
        } else {
            "No members match. Press r to clear filters or Esc to clear the search."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style()))).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let widths = [
        Constraint::Length(20),
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(7),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);

    let mut state = TableState::default();
    state.select(Some(app.row_selection));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.directory.state().current_page();
    if page.total_pages == 0 {
        return;
    }

    let first = page.start_index(PAGE_SIZE) + 1;
    let last = first + page.items.len().saturating_sub(1);

    let prev = if page.has_prev() { "◀ [ " } else { "    " };
    let next = if page.has_next() { " ] ▶" } else { "    " };
    let line = Line::from(vec![
        Span::styled(prev, styles::help_key_style()),
        Span::styled(format!("Page {} of {}", page.page, page.total_pages), styles::list_item_style()),
        Span::styled(next, styles::help_key_style()),
        Span::styled(format!("   {}-{} of {}", first, last, page.total_count), styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Region/tag toggles plus the payment, birthday and cohort settings.
pub fn render_filter_panel(frame: &mut Frame, app: &App) {
    let outer = frame.area();
    let width = 48.min(outer.width);
    let area = Rect::new(
        outer.x + outer.width.saturating_sub(width),
        outer.y + 6,
        width,
        outer.height.saturating_sub(8),
    );
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let filter = app.directory.state().filter();
    let editing_cohort = matches!(app.state, AppState::EditingCohortRange);

    let cohort_value = if editing_cohort {
        format!("{}▌", app.cohort_input)
    } else if filter.cohort_range == FilterState::full_cohort_range() {
        "All".to_string()
    } else {
        format!("{}-{}", filter.cohort_range.start(), filter.cohort_range.end())
    };

    let settings = vec![
        Line::from(vec![
            Span::styled(" [p] Dues      ", styles::help_key_style()),
            Span::raw(filter.payment.to_string()),
        ]),
        Line::from(vec![
            Span::styled(" [b] Birthday  ", styles::help_key_style()),
            Span::raw(filter.birthday.to_string()),
        ]),
        Line::from(vec![
            Span::styled(" [c] Cohort    ", styles::help_key_style()),
            Span::styled(cohort_value, styles::input_style(editing_cohort)),
        ]),
        Line::from(Span::styled(" [r] Clear filters", styles::muted_style())),
    ];

    let settings_block = Block::default()
        .title(" Filters ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(settings).block(settings_block), chunks[0]);

    let items: Vec<ListItem> = app
        .filter_items()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let (label, checked) = match &item {
                FilterItem::Region(region) => (region.clone(), filter.regions.contains(region)),
                FilterItem::Tag(tag) => (format!("#{}", tag), filter.tags.contains(tag)),
            };
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if i == app.filter_selection && !editing_cohort {
                styles::selected_style()
            } else if checked {
                styles::highlight_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(format!(" {}{}", mark, label))).style(style)
        })
        .collect();

    let list_block = Block::default()
        .title(" Regions & Tags (Space) ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!editing_cohort));

    let mut state = ListState::default();
    state.select(Some(app.filter_selection));
    frame.render_stateful_widget(List::new(items).block(list_block), chunks[1], &mut state);
}
