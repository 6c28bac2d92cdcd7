//! src/model/view_state.rs
//! ============================================================================
//! # View-State Store
//!
//! Records, criteria, load status and the currently displayed sequence.
//! Every change goes through [`transition`]; each event recomputes the whole
//! pipeline, so `displayed` always equals `apply_indices(records, criteria)`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::data::parser::ParsedTable;
use crate::data::record::{Field, SpellRecord};
use crate::model::criteria::{Criteria, SortColumn};
use crate::model::pipeline;

/// Where the record set came from and how that went.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,

    Loading {
        source: String,
        started: Instant,
    },

    Ready {
        source: String,
        loaded_at: DateTime<Local>,
        dropped_rows: usize,
        missing_columns: Vec<Field>,
    },

    Failed {
        message: String,
        retryable: bool,
    },
}

impl LoadStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// One-word label for the status bar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Everything that can change the view state.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    LoadStarted { source: String },
    DataLoaded { source: String, table: ParsedTable },
    LoadFailed { message: String, retryable: bool },
    SetSearchName(String),
    ToggleLevel { level: i64, included: bool },
    SetSortKey(Option<SortColumn>),
    ClearFilters,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    records: Arc<[SpellRecord]>,
    criteria: Criteria,
    displayed: Vec<usize>,
    status: LoadStatus,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[SpellRecord] {
        &self.records
    }

    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Positions into [`Self::records`], in display order.
    #[must_use]
    pub fn displayed_indices(&self) -> &[usize] {
        &self.displayed
    }

    pub fn displayed(&self) -> impl ExactSizeIterator<Item = &SpellRecord> + '_ {
        self.displayed.iter().map(|&i| &self.records[i])
    }

    #[must_use]
    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    pub fn set_search_name(&mut self, name: impl Into<String>) {
        self.apply(ViewEvent::SetSearchName(name.into()));
    }

    pub fn toggle_level(&mut self, level: i64, included: bool) {
        self.apply(ViewEvent::ToggleLevel { level, included });
    }

    pub fn set_sort_key(&mut self, sort: Option<SortColumn>) {
        self.apply(ViewEvent::SetSortKey(sort));
    }

    /// In-place form of [`transition`].
    pub fn apply(&mut self, event: ViewEvent) {
        *self = transition(std::mem::take(self), event);
    }

    fn recompute(&mut self) {
        self.displayed = pipeline::apply_indices(&self.records, &self.criteria);
    }
}

/// The single state transition function.
#[must_use]
pub fn transition(mut state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::LoadStarted { source } => {
            debug!(%source, "Load started");
            state.status = LoadStatus::Loading {
                source,
                started: Instant::now(),
            };
            // Records stay on screen until the new set arrives.
            return state;
        }

        ViewEvent::DataLoaded { source, table } => {
            debug!(
                %source,
                records = table.records.len(),
                dropped = table.dropped_rows,
                "Data loaded"
            );
            state.records = table.records.into();
            state.status = LoadStatus::Ready {
                source,
                loaded_at: Local::now(),
                dropped_rows: table.dropped_rows,
                missing_columns: table.missing_columns,
            };
        }

        ViewEvent::LoadFailed { message, retryable } => {
            debug!(%message, retryable, "Load failed");
            state.status = LoadStatus::Failed { message, retryable };
            return state;
        }

        ViewEvent::SetSearchName(name) => {
            debug!(name = %name, "Search name changed");
            state.criteria.name_substring = name;
        }

        ViewEvent::ToggleLevel { level, included } => {
            debug!(level, included, "Level toggled");
            if included {
                state.criteria.levels.insert(level);
            } else {
                state.criteria.levels.remove(&level);
            }
        }

        ViewEvent::SetSortKey(sort) => {
            debug!(?sort, "Sort key changed");
            state.criteria.sort = sort;
        }

        ViewEvent::ClearFilters => {
            debug!("Filters cleared");
            state.criteria = Criteria::default();
        }
    }

    state.recompute();
    state
}
