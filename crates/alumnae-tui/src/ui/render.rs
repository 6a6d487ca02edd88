use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use alumnae_core::directory::FormField;
use alumnae_core::models::{GatheringField, ProfileField};
use alumnae_core::utils::format_cohort;

use crate::app::{App, AppState, Tab};

use super::styles;
use super::tabs::{admin, archive, dashboard, directory, gatherings};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Filtering | AppState::EditingCohortRange => directory::render_filter_panel(frame, app),
        AppState::ViewingMember => render_member_detail(frame, app),
        AppState::EditingMember => render_member_form(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::EditingProfile => render_profile_form(frame, app),
        AppState::CreatingGathering => render_gathering_form(frame, app),
        AppState::ConfirmingGatheringDelete => render_gathering_delete_overlay(frame, app),
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Alumnae Directory";
    let backend = format!("[{}]", app.store_name());
    let help_hint = "[?] Help";

    let used = title.len() + backend.len() + help_hint.len() + 6;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(backend, styles::muted_style()),
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, tab.title()),
            styles::tab_style(*tab == app.current_tab),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Directory => directory::render(frame, app, area),
        Tab::Gatherings => gatherings::render(frame, app, area),
        Tab::Archive => archive::render(frame, app, area),
        Tab::Admin => admin::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (left_text, left_style) = match &app.status {
        Some(notice) => (format!(" {}", notice.line()), styles::notice_style(notice.kind)),
        None if app.refreshing => (" Refreshing...".to_string(), styles::muted_style()),
        None => (String::new(), styles::muted_style()),
    };

    let shortcuts = match (app.state, app.current_tab) {
        (AppState::Searching, _) => "Enter:apply  Esc:clear",
        (AppState::EditingMember | AppState::EditingProfile | AppState::CreatingGathering, _) => {
            "↑/↓:field  Enter:save  Esc:cancel"
        }
        (_, Tab::Dashboard) => "e:edit profile  p:unpaid  b:birthdays  u:refresh  q:quit",
        (_, Tab::Directory) => "/:search  f:filters  n:new  e:edit  d:delete  [/]:page  q:quit",
        (_, Tab::Gatherings) => "h/l:column  </>:move  s:sign up  n:new  d:delete  q:quit",
        (_, Tab::Archive) => "t:photos/newsletters  ↑/↓:select  u:refresh  q:quit",
        (_, Tab::Admin) => "↑/↓:select  a:approve  x:reject  b:bulk upload  q:quit",
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 38, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Alumnae Directory", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Switch tabs"),
        help_line("←/→", "Previous/next tab"),
        help_line("↑/↓", "Move selection"),
        help_line("Enter", "Open / confirm"),
        help_line("Esc", "Go back"),
        help_line("u", "Refresh from the store"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Directory", styles::highlight_style())),
        help_line("/", "Search name, cohort, job and tags"),
        help_line("f", "Region and tag filters"),
        help_line("p / b", "Cycle payment / birthday filter"),
        help_line("c", "Cohort range"),
        help_line("r", "Clear filters (keeps search)"),
        help_line("n / e", "Register / edit member"),
        help_line("d / D", "Delete member / delete all"),
        help_line("[ / ]", "Previous / next page"),
        Line::from(""),
        Line::from(Span::styled(" Gatherings", styles::highlight_style())),
        help_line("h / l", "Previous / next column"),
        help_line("< / >", "Move card between columns"),
        help_line("s", "Sign up"),
        Line::from(""),
        Line::from(Span::styled(" Archive", styles::highlight_style())),
        help_line("t", "Photos / newsletters"),
        Line::from(""),
        Line::from(Span::styled(" Admin", styles::highlight_style())),
        help_line("a / x", "Approve / reject registration"),
        help_line("b", "Bulk contact upload"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn form_line(label: &str, value: &str, focused: bool, required: bool) -> Line<'static> {
    let marker = if required { "*" } else { " " };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {}{:<13}", marker, label), styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), styles::input_style(focused)),
    ])
}

fn render_form(frame: &mut Frame, title: String, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16 + 4;
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    let mut content = lines;
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        " Enter to save, Esc to cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_member_form(frame: &mut Frame, app: &App) {
    let current = app.current_form_field();
    let lines = FormField::ALL
        .iter()
        .map(|&field| {
            form_line(
                field.label(),
                app.member_form.value(field),
                field == current,
                field.is_required(),
            )
        })
        .collect();

    let title = if app.editing_id.is_some() {
        " Edit Member "
    } else {
        " Register Member "
    };
    render_form(frame, title.to_string(), lines);
}

fn render_profile_form(frame: &mut Frame, app: &App) {
    let current = app.current_profile_field();
    let lines = ProfileField::ALL
        .iter()
        .map(|&field| form_line(field.label(), app.profile_form.value(field), field == current, false))
        .collect();
    render_form(frame, " My Profile ".to_string(), lines);
}

fn render_gathering_form(frame: &mut Frame, app: &App) {
    let current = app.current_gathering_field();
    let lines = GatheringField::ALL
        .iter()
        .map(|&field| {
            form_line(
                field.label(),
                app.gathering_form.value(field),
                field == current,
                field == GatheringField::Title,
            )
        })
        .collect();
    render_form(frame, " New Gathering ".to_string(), lines);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<14}", label), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}

fn render_member_detail(frame: &mut Frame, app: &App) {
    let Some(member) = app.directory.state().selected() else {
        return;
    };

    let area = centered_rect_fixed(64, 20, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {}", member.name), styles::title_style()),
            Span::styled(format!("  {}", format_cohort(member.cohort)), styles::muted_style()),
        ]),
        Line::from(""),
        detail_line("Region", member.region.clone()),
        detail_line("Job", member.job.clone()),
        detail_line("Company", member.company.clone()),
        detail_line("Email", member.email.clone()),
        detail_line("Phone", member.phone.clone()),
        detail_line("Birthday", member.birthday_display()),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "Dues"), styles::muted_style()),
            Span::styled(member.payment_status.to_string(), styles::payment_style(member.payment_status)),
        ]),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "Tags"), styles::muted_style()),
            Span::styled(member.tags_display(), styles::tag_style()),
        ]),
        Line::from(""),
    ];
    lines.push(Line::from(Span::raw(format!(" {}", member.introduction))));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [E]", styles::help_key_style()),
        Span::raw("dit  "),
        Span::styled("[D]", styles::help_key_style()),
        Span::raw("elete  "),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::raw(" Close"),
    ]));

    let block = Block::default()
        .title(" Member ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_confirm(frame: &mut Frame, title: &str, question: String, warning: Option<&str>) {
    let area = centered_rect_fixed(54, if warning.is_some() { 9 } else { 7 }, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(""), Line::from(format!("  {}", question))];
    if let Some(warning) = warning {
        lines.push(Line::from(Span::styled(format!("  {}", warning), styles::error_style())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("[Y]", styles::help_key_style()),
        Span::raw("es    "),
        Span::styled("[N]", styles::help_key_style()),
        Span::raw("o"),
    ]));

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    render_confirm(frame, "Quit", "Are you sure you want to quit?".to_string(), None);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    match app.pending_delete_label() {
        Some(name) => render_confirm(frame, "Delete", format!("Delete {}?", name), None),
        None => render_confirm(
            frame,
            "Delete All",
            format!("Delete all {} members?", app.directory.state().roster().len()),
            Some("This cannot be undone."),
        ),
    }
}

fn render_gathering_delete_overlay(frame: &mut Frame, app: &App) {
    let title = app.pending_gathering_title().unwrap_or("this gathering");
    render_confirm(frame, "Delete", format!("Delete '{}'?", title), None);
}
