use ratatui::style::{Color, Modifier, Style};

use alumnae_core::directory::NoticeKind;
use alumnae_core::models::{ApprovalStatus, GatheringStatus, PaymentStatus};

// Color palette
pub const PRIMARY: Color = Color::Rgb(96, 112, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(200, 152, 72);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 72);
const STATUS_BG: Color = Color::Rgb(32, 32, 40);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BG).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Form input being edited.
pub fn input_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White).bg(HIGHLIGHT)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn payment_style(status: PaymentStatus) -> Style {
    match status {
        PaymentStatus::Paid => success_style(),
        PaymentStatus::Unpaid => error_style(),
    }
}

pub fn approval_style(status: ApprovalStatus) -> Style {
    match status {
        ApprovalStatus::Pending => Style::default().fg(ACCENT),
        ApprovalStatus::Approved => success_style(),
        ApprovalStatus::Rejected => error_style(),
    }
}

pub fn notice_style(kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Success => success_style(),
        NoticeKind::Info => list_item_style(),
        NoticeKind::Error => error_style(),
    }
}

/// Column heading color on the gatherings board.
pub fn column_style(status: GatheringStatus) -> Style {
    let color = match status {
        GatheringStatus::Planning => MUTED,
        GatheringStatus::Open => SECONDARY,
        GatheringStatus::Upcoming => ACCENT,
        GatheringStatus::Done => PRIMARY,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn tag_style() -> Style {
    Style::default().fg(PRIMARY)
}
