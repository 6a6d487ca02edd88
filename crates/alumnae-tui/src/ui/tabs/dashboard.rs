use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use alumnae_core::directory::{CountEntry, DashboardStats};
use alumnae_core::utils::{format_cohort, format_cohort_str, format_percent, truncate};

use crate::app::App;
use crate::ui::styles;

/// Width of the longest bar in a breakdown.
const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(columns[0]);

    render_profile(frame, app, left[0]);
    render_summary(frame, &stats, left[1]);
    render_breakdowns(frame, &stats, columns[1]);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let profile = &app.profile;
    let lines = vec![
        Line::from(Span::styled(profile.headline(), styles::title_style())),
        Line::from(vec![
            Span::raw(profile.job.clone()),
            Span::styled(" at ", styles::muted_style()),
            Span::raw(profile.company.clone()),
        ]),
        Line::from(""),
        Line::from(Span::styled(profile.introduction.clone(), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[e]", styles::help_key_style()),
            Span::styled(" Edit profile", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" My Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_summary(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Members      ", styles::muted_style()),
            Span::styled(stats.total.to_string(), styles::title_style()),
        ]),
        Line::from(vec![
            Span::styled("Dues paid    ", styles::muted_style()),
            Span::styled(format!("{} ", stats.paid_count), styles::success_style()),
            Span::styled(format!("({})", format_percent(stats.paid_percent)), styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled("Dues unpaid  ", styles::muted_style()),
            Span::styled(stats.unpaid_count.to_string(), styles::error_style()),
            Span::styled("   [p] show", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("Birthdays today ({})", stats.today_birthdays.len()),
                styles::highlight_style(),
            ),
            Span::styled("   [b] show", styles::muted_style()),
        ]),
    ];

    if stats.today_birthdays.is_empty() {
        lines.push(Line::from(Span::styled("  No birthdays today", styles::muted_style())));
    }
    for member in &stats.today_birthdays {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(member.name.clone()),
            Span::styled(
                format!(" ({})", format_cohort(member.cohort)),
                styles::muted_style(),
            ),
        ]));
    }

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_breakdowns(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let mut lines = Vec::new();
    push_breakdown(&mut lines, "Top cohorts", &stats.by_cohort, format_cohort_str);
    lines.push(Line::from(""));
    push_breakdown(&mut lines, "Top regions", &stats.by_region, |key| key.to_string());
    lines.push(Line::from(""));
    push_breakdown(&mut lines, "Top jobs", &stats.by_job, |key| key.to_string());

    let block = Block::default()
        .title(" Community ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn push_breakdown(
    lines: &mut Vec<Line<'static>>,
    heading: &str,
    entries: &[CountEntry],
    label: impl Fn(&str) -> String,
) {
    lines.push(Line::from(Span::styled(heading.to_string(), styles::highlight_style())));
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("  No data", styles::muted_style())));
        return;
    }

    let max = entries.iter().map(|e| e.count).max().unwrap_or(1);
    for entry in entries {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<18}", truncate(&label(&entry.key), 18))),
            Span::styled(bar(entry.count, max), styles::title_style()),
            Span::styled(format!(" {}", entry.count), styles::muted_style()),
        ]));
    }
}

/// Text bar scaled so `max` fills `BAR_WIDTH`. Non-zero counts get at least one block.
fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let width = ((count * BAR_WIDTH) / max).max(1);
    "█".repeat(width)
}
