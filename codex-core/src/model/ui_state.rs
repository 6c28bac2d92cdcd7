//! src/model/ui_state.rs
//! ============================================================================
//! # UI State
//!
//! Everything about the screen that is not part of the data view: which
//! control has focus, the level-checkbox cursor, card selection, the search
//! input buffer, the open overlay and the current notification.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;

use compact_str::CompactString;

use crate::model::criteria::LEVEL_RANGE;

/// Redraw flags, or-ed together until the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    StatusBar = 2,
    Overlay = 4,
    Notification = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Which control receives keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Focus {
    Sort = 0,
    Levels = 1,
    #[default]
    Search = 2,
    Cards = 3,
}

impl Focus {
    const ORDER: [Self; 4] = [Self::Sort, Self::Levels, Self::Search, Self::Cards];

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self as usize + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ORDER[(self as usize + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sort => "Sort",
            Self::Levels => "Levels",
            Self::Search => "Search",
            Self::Cards => "Cards",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    /// Load failure details with a retry hint.
    Error = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss_ms: Option<u32>,
}

#[derive(Debug)]
pub struct UIState {
    redraw_flags: AtomicU32,

    pub focus: Focus,
    pub overlay: UIOverlay,

    /// Highlighted level checkbox.
    pub level_cursor: i64,

    /// Index into the displayed cards.
    pub selected_card: usize,

    /// Cards that fit on one screen, written by the renderer.
    page_cards: AtomicUsize,

    pub input: CompactString,
    pub input_cursor: usize,

    pub notification: Option<Notification>,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            redraw_flags: AtomicU32::new(u32::from(RedrawFlag::All.bits())),
            focus: Focus::default(),
            overlay: UIOverlay::None,
            level_cursor: *LEVEL_RANGE.start(),
            selected_card: 0,
            page_cards: AtomicUsize::new(1),
            input: CompactString::new(""),
            input_cursor: 0,
            notification: None,
        }
    }

    // Redraw flags ----------------------------------------------------------

    #[inline]
    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.redraw_flags
            .fetch_or(u32::from(flag.bits()), Ordering::Relaxed);
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_flags.load(Ordering::Relaxed) != 0
    }

    #[inline]
    pub fn clear_redraw(&self) {
        self.redraw_flags.store(0, Ordering::Relaxed);
    }

    // Focus -----------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.request_redraw(RedrawFlag::All);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        self.request_redraw(RedrawFlag::All);
    }

    // Level cursor ----------------------------------------------------------

    /// Move the checkbox cursor, wrapping within the level range.
    pub fn move_level_cursor(&mut self, delta: i64) {
        let lo = *LEVEL_RANGE.start();
        let span = LEVEL_RANGE.end() - lo + 1;
        self.level_cursor = lo + (self.level_cursor - lo + delta).rem_euclid(span);
        self.request_redraw(RedrawFlag::Main);
    }

    // Card selection --------------------------------------------------------

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_cards.load(Ordering::Relaxed).max(1)
    }

    #[inline]
    pub fn set_page_size(&self, cards: usize) {
        self.page_cards.store(cards.max(1), Ordering::Relaxed);
    }

    /// Move the selection by `delta` cards, clamped to `[0, len)`.
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected_card = 0;
            return;
        }
        let last = len - 1;
        self.selected_card = self.selected_card.saturating_add_signed(delta).min(last);
        self.request_redraw(RedrawFlag::Main);
    }

    pub fn select_first(&mut self) {
        self.selected_card = 0;
        self.request_redraw(RedrawFlag::Main);
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected_card = len.saturating_sub(1);
        self.request_redraw(RedrawFlag::Main);
    }

    /// Keep the selection valid after the displayed set changed.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected_card >= len {
            self.selected_card = len.saturating_sub(1);
        }
    }

    // Notifications ---------------------------------------------------------

    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss_ms: Option<u32>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss_ms,
        });
        self.request_redraw(RedrawFlag::Notification);
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info, Some(3000));
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success, Some(2000));
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning, Some(5000));
    }

    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, None);
    }

    pub fn dismiss_notification(&mut self) {
        if self.notification.take().is_some() {
            self.request_redraw(RedrawFlag::All);
        }
    }

    /// Drop an expired notification. Returns `true` if one was removed.
    pub fn update_notification(&mut self) -> bool {
        if let Some(notification) = &self.notification
            && let Some(auto_dismiss_ms) = notification.auto_dismiss_ms
            && notification.timestamp.elapsed().as_millis() > u128::from(auto_dismiss_ms)
        {
            self.notification = None;
            self.request_redraw(RedrawFlag::All);
            return true;
        }
        false
    }

    // Search input ----------------------------------------------------------

    pub fn clear_input(&mut self) {
        self.input = CompactString::new("");
        self.input_cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
    }

    /// Delete the character left of the cursor. Returns `false` at the start.
    pub fn delete_char_before(&mut self) -> bool {
        let Some((pos, _)) = self.input.as_str()[..self.input_cursor]
            .char_indices()
            .next_back()
        else {
            return false;
        };
        self.input.remove(pos);
        self.input_cursor = pos;
        true
    }

    pub fn move_input_cursor(&mut self, forward: bool) {
        let cur = self.input_cursor;
        let text = self.input.as_str();
        self.input_cursor = if forward {
            text[cur..].chars().next().map_or(cur, |c| cur + c.len_utf8())
        } else {
            text[..cur]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i)
        };
    }
}
