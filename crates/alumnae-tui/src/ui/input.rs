//! Keyboard input handling for the TUI.
//!
//! Overlays and text-entry modes get first pick of every key; anything left
//! falls through to the global keys and then to the current tab.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use alumnae_core::directory::FormField;
use alumnae_core::models::{GatheringField, GatheringStatus, ProfileField};

use crate::app::{can_add_cohort_char, can_add_form_char, can_add_search_char, App, AppState, Tab};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::Quitting => return Ok(true),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete().await,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingGatheringDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_gathering_delete().await,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_gathering_delete(),
                _ => {}
            }
            return Ok(false);
        }
        AppState::Searching => return handle_search_input(app, key),
        AppState::Filtering => return handle_filter_input(app, key),
        AppState::EditingCohortRange => return handle_cohort_input(app, key),
        AppState::ViewingMember => return handle_member_detail_input(app, key),
        AppState::EditingMember => return handle_member_form_input(app, key).await,
        AppState::EditingProfile => return handle_profile_form_input(app, key),
        AppState::CreatingGathering => return handle_gathering_form_input(app, key).await,
        AppState::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.current_tab = Tab::ALL[index];
            return Ok(false);
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
            return Ok(false);
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
            return Ok(false);
        }
        KeyCode::Char('u') => {
            app.refresh_all_background();
            return Ok(false);
        }
        _ => {}
    }

    match app.current_tab {
        Tab::Dashboard => handle_dashboard_input(app, key),
        Tab::Directory => handle_directory_input(app, key),
        Tab::Gatherings => handle_gatherings_input(app, key).await,
        Tab::Archive => handle_archive_input(app, key),
        Tab::Admin => handle_admin_input(app, key).await,
    }
    Ok(false)
}

/// Shared editing for single-line text inputs.
fn edit_text(buffer: &mut String, key: KeyEvent, can_add: fn(usize, char) -> bool) -> bool {
    match key.code {
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Char(c) if can_add(buffer.chars().count(), c) => {
            buffer.push(c);
            true
        }
        _ => false,
    }
}

/// Up/Down/Tab/BackTab over `len` form fields.
fn move_field(index: &mut usize, len: usize, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Down | KeyCode::Tab => {
            *index = (*index + 1) % len;
            true
        }
        KeyCode::Up | KeyCode::BackTab => {
            *index = (*index + len - 1) % len;
            true
        }
        _ => false,
    }
}

// ===== Dashboard =====

fn handle_dashboard_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.start_profile_edit(),
        KeyCode::Char('p') => app.show_unpaid(),
        KeyCode::Char('b') => app.show_birthdays_today(),
        _ => {}
    }
}

fn handle_profile_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if move_field(&mut app.profile_field, ProfileField::ALL.len(), key) {
        return Ok(false);
    }
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.save_profile(),
        _ => {
            let field = app.current_profile_field();
            edit_text(app.profile_form.value_mut(field), key, can_add_form_char);
        }
    }
    Ok(false)
}

// ===== Directory =====

fn handle_directory_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('f') => {
            app.filter_selection = 0;
            app.state = AppState::Filtering;
        }
        KeyCode::Char('p') => app.cycle_payment_filter(),
        KeyCode::Char('b') => app.cycle_birthday_filter(),
        KeyCode::Char('c') => app.start_cohort_input(),
        KeyCode::Char('r') => app.reset_filters(),
        KeyCode::Char('n') => app.start_register(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') => app.request_delete_highlighted(),
        KeyCode::Char('D') => app.request_delete_all(),
        KeyCode::Enter => app.open_member_detail(),
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.set_search(String::new());
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.row_selection = app.row_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.row_selection + 1 < app.page_members().len() {
                app.row_selection += 1;
            }
        }
        KeyCode::Char(']') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('[') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Home => app.first_page(),
        KeyCode::End => app.last_page(),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.set_search(String::new());
        }
        KeyCode::Enter => {
            // Keep the query applied
            app.state = AppState::Normal;
        }
        _ => {
            let mut query = app.search_input.clone();
            if edit_text(&mut query, key, can_add_search_char) {
                app.set_search(query);
            }
        }
    }
    Ok(false)
}

fn handle_filter_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let item_count = app.filter_items().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') => app.state = AppState::Normal,
        KeyCode::Up | KeyCode::Char('k') => {
            app.filter_selection = app.filter_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.filter_selection + 1 < item_count {
                app.filter_selection += 1;
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_filter_item(),
        KeyCode::Char('p') => app.cycle_payment_filter(),
        KeyCode::Char('b') => app.cycle_birthday_filter(),
        KeyCode::Char('c') => app.start_cohort_input(),
        KeyCode::Char('r') => app.reset_filters(),
        _ => {}
    }
    Ok(false)
}

fn handle_cohort_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.state = AppState::Filtering,
        KeyCode::Enter => app.apply_cohort_input(),
        _ => {
            edit_text(&mut app.cohort_input, key, can_add_cohort_char);
        }
    }
    Ok(false)
}

fn handle_member_detail_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_member_detail(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') => app.request_delete_highlighted(),
        _ => {}
    }
    Ok(false)
}

async fn handle_member_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if move_field(&mut app.form_field, FormField::ALL.len(), key) {
        return Ok(false);
    }
    match key.code {
        KeyCode::Esc => {
            app.editing_id = None;
            app.state = if app.directory.state().selected().is_some() {
                AppState::ViewingMember
            } else {
                AppState::Normal
            };
        }
        KeyCode::Enter => app.submit_member_form().await,
        _ => {
            let field = app.current_form_field();
            edit_text(app.member_form.value_mut(field), key, can_add_form_char);
        }
    }
    Ok(false)
}

// ===== Gatherings =====

async fn handle_gatherings_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') => {
            app.select_gathering_column(app.gathering_column.saturating_sub(1));
        }
        KeyCode::Char('l') => {
            let last = GatheringStatus::ALL.len() - 1;
            app.select_gathering_column((app.gathering_column + 1).min(last));
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_gathering_row(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_gathering_row(true),
        KeyCode::Char('>') => app.move_gathering(true).await,
        KeyCode::Char('<') => app.move_gathering(false).await,
        KeyCode::Char('s') => app.sign_up_selected().await,
        KeyCode::Char('n') => app.start_gathering_create(),
        KeyCode::Char('d') => app.request_gathering_delete(),
        _ => {}
    }
}

async fn handle_gathering_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if move_field(&mut app.gathering_field, GatheringField::ALL.len(), key) {
        return Ok(false);
    }
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.submit_gathering_form().await,
        _ => {
            let field = app.current_gathering_field();
            edit_text(app.gathering_form.value_mut(field), key, can_add_form_char);
        }
    }
    Ok(false)
}

// ===== Archive =====

fn handle_archive_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') | KeyCode::Tab => app.toggle_archive_view(),
        KeyCode::Up | KeyCode::Char('k') => app.move_archive_selection(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_archive_selection(true),
        KeyCode::Home => app.jump_archive_selection(false),
        KeyCode::End => app.jump_archive_selection(true),
        _ => {}
    }
}

// ===== Admin =====

async fn handle_admin_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_admin_selection(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_admin_selection(true),
        KeyCode::Char('a') => app.approve_highlighted().await,
        KeyCode::Char('x') => app.reject_highlighted().await,
        KeyCode::Char('b') => app.bulk_upload(),
        _ => {}
    }
}
