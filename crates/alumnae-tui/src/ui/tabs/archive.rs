use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use alumnae_core::utils::truncate;

use crate::app::{App, ArchiveView};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    match app.archive_view {
        ArchiveView::Photos => {
            render_photo_list(frame, app, chunks[0]);
            render_photo_detail(frame, app, chunks[1]);
        }
        ArchiveView::Newsletters => {
            render_newsletter_list(frame, app, chunks[0]);
            render_newsletter_detail(frame, app, chunks[1]);
        }
    }
}

fn render_photo_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .photos
        .iter()
        .enumerate()
        .map(|(i, photo)| {
            let line = Line::from(vec![
                Span::styled(format!("{:<14}", photo.taken_display()), styles::muted_style()),
                Span::raw(truncate(&photo.title, 32)),
            ]);
            let style = if i == app.photo_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Photos ({})  [t] Newsletters ", app.photos.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let message = if app.has_remote() {
            format!(
                "No photos yet. Upload to '{}' with: alumnae --upload-photo PATH TITLE [YYYY-MM-DD]",
                app.config.photo_bucket
            )
        } else {
            "The archive lives on the remote backend. Set ALUMNAE_API_URL and ALUMNAE_API_KEY.".to_string()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let mut state = ListState::default();
    state.select(Some(app.photo_selection));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_photo_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_photo() {
        Some(photo) => {
            let mut lines = vec![
                Line::from(Span::styled(photo.title.clone(), styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Taken    ", styles::muted_style()),
                    Span::raw(photo.taken_display()),
                ]),
            ];
            if let Some(created) = photo.created_at {
                lines.push(Line::from(vec![
                    Span::styled("Added    ", styles::muted_style()),
                    Span::raw(created.format("%Y. %m. %d %H:%M").to_string()),
                ]));
            }
            lines.push(Line::from(""));
            if let Some(description) = &photo.description {
                lines.push(Line::from(Span::raw(description.clone())));
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled("Link", styles::muted_style())));
            lines.push(Line::from(Span::styled(photo.photo_url.clone(), styles::highlight_style())));
            (" Photo ".to_string(), lines)
        }
        None => (
            " No Photo Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a photo from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_newsletter_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .newsletters
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let line = Line::from(vec![
                Span::styled(format!("{:<8}", format!("No. {}", issue.number)), styles::muted_style()),
                Span::raw(issue.published.format("%Y. %m").to_string()),
            ]);
            let style = if i == app.newsletter_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Newsletters ({})  [t] Photos ", app.newsletters.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    state.select(Some(app.newsletter_selection));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_newsletter_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_newsletter() {
        Some(issue) => {
            let mut lines = vec![
                Line::from(Span::styled(issue.title(), styles::title_style())),
                Line::from(Span::styled(issue.published_display(), styles::muted_style())),
                Line::from(""),
                Line::from(Span::styled("PDF", styles::muted_style())),
            ];
            lines.push(match app.newsletter_url(issue) {
                Some(url) => Line::from(Span::styled(url, styles::highlight_style())),
                None => Line::from(Span::styled(
                    "Available once the remote backend is configured.",
                    styles::muted_style(),
                )),
            });
            lines
        }
        None => vec![Line::from(Span::styled("No issues yet", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Issue ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
