//! src/controller/actions.rs
//! ============================================================================
//! # Actions
//!
//! Every user input and internal event the application responds to. Terminal
//! keys are mapped to these by the key map; background results arrive as
//! [`Action::TaskResult`].

use crate::controller::event_loop::TaskResult;
use crate::model::criteria::SortColumn;
use crate::model::ui_state::Focus;

#[derive(Debug)]
pub enum Action {
    /// Quit the application.
    Quit,

    /// Fetch and parse the source again.
    Reload,

    /// Internal tick for notification expiry and the loading overlay.
    Tick,

    /// A terminal resize event.
    Resize(u16, u16),

    /// A result from the background load task.
    TaskResult(TaskResult),

    /// No state change.
    NoOp,

    // Focus / overlays -------------------------------------------------------
    FocusNext,
    FocusPrev,
    FocusOn(Focus),
    ToggleHelp,
    CloseOverlay,
    DismissNotification,

    // Sort selector ----------------------------------------------------------
    CycleSort { forward: bool },
    SetSort(Option<SortColumn>),

    // Level checkboxes -------------------------------------------------------
    MoveLevelCursor(i64),
    ToggleLevelAtCursor,
    ToggleLevel(i64),
    ClearLevels,

    // Search box -------------------------------------------------------------
    SearchInput(char),
    SearchBackspace,
    SearchCursor { forward: bool },
    ClearSearch,

    /// Reset search, levels and sort.
    ClearFilters,

    // Cards ------------------------------------------------------------------
    MoveSelection(isize),
    PageUp,
    PageDown,
    SelectFirst,
    SelectLast,
}

impl Action {
    /// Actions that change criteria, and therefore the displayed set.
    #[must_use]
    pub const fn changes_criteria(&self) -> bool {
        matches!(
            self,
            Self::CycleSort { .. }
                | Self::SetSort(_)
                | Self::ToggleLevelAtCursor
                | Self::ToggleLevel(_)
                | Self::ClearLevels
                | Self::SearchInput(_)
                | Self::SearchBackspace
                | Self::ClearSearch
                | Self::ClearFilters
        )
    }
}
