//! src/controller/key_map.rs
//! ============================================================================
//! # Key Map
//!
//! Focus-aware translation of key presses into [`Action`]s. Pure: reads the
//! UI state, never changes it.
//!
//! Priority: global chords, then the open overlay, then the focused control.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

use crate::controller::actions::Action;
use crate::model::ui_state::{Focus, UIOverlay, UIState};

#[must_use]
pub fn map_key(key: KeyEvent, ui: &UIState) -> Action {
    trace!(code = ?key.code, modifiers = ?key.modifiers, focus = ?ui.focus, "Mapping key");

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('r') => Action::Reload,
            _ => Action::NoOp,
        };
    }

    if ui.overlay != UIOverlay::None {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter => Action::CloseOverlay,
            _ => Action::NoOp,
        };
    }

    match key.code {
        KeyCode::Tab => return Action::FocusNext,
        KeyCode::BackTab => return Action::FocusPrev,
        _ => {}
    }

    match ui.focus {
        Focus::Search => search_keys(key),
        focus => {
            if let Some(action) = command_keys(key, ui) {
                return action;
            }
            match focus {
                Focus::Sort => sort_keys(key),
                Focus::Levels => level_keys(key),
                Focus::Cards => card_keys(key),
                Focus::Search => Action::NoOp,
            }
        }
    }
}

/// Single-letter commands, available whenever focus is not on text input.
fn command_keys(key: KeyEvent, ui: &UIState) -> Option<Action> {
    Some(match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('/') => Action::FocusOn(Focus::Search),
        KeyCode::Char('x') => Action::ClearFilters,
        KeyCode::Esc if ui.notification.is_some() => Action::DismissNotification,
        _ => return None,
    })
}

fn search_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => Action::SearchInput(c),
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Left => Action::SearchCursor { forward: false },
        KeyCode::Right => Action::SearchCursor { forward: true },
        KeyCode::Esc => Action::ClearSearch,
        KeyCode::Enter | KeyCode::Down => Action::FocusOn(Focus::Cards),
        _ => Action::NoOp,
    }
}

fn sort_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => {
            Action::CycleSort { forward: false }
        }
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => {
            Action::CycleSort { forward: true }
        }
        KeyCode::Backspace | KeyCode::Delete => Action::SetSort(None),
        _ => Action::NoOp,
    }
}

fn level_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLevelCursor(-1),
        KeyCode::Right | KeyCode::Char('l') => Action::MoveLevelCursor(1),
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleLevelAtCursor,
        KeyCode::Char(c @ '0'..='9') => Action::ToggleLevel(i64::from(c as u8 - b'0')),
        KeyCode::Char('c') => Action::ClearLevels,
        _ => Action::NoOp,
    }
}

fn card_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveSelection(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveSelection(1),
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::SelectFirst,
        KeyCode::End | KeyCode::Char('G') => Action::SelectLast,
        _ => Action::NoOp,
    }
}
