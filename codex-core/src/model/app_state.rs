// codex-core/src/model/app_state.rs
// Top-level state owned by the event loop: config, data view and UI.

use std::sync::Arc;

use tracing::trace;

use crate::config::Config;
use crate::model::ui_state::{RedrawFlag, UIState};
use crate::model::view_state::{ViewEvent, ViewState};

#[derive(Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub view: ViewState,
    pub ui: UIState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Config::default()))
    }
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            view: ViewState::new(),
            ui: UIState::new(),
        }
    }

    /// Feed an event to the view store and keep the UI consistent with it.
    pub fn apply_view_event(&mut self, event: ViewEvent) {
        trace!(?event, "Applying view event");
        self.view.apply(event);
        self.ui.clamp_selection(self.view.displayed_len());
        self.ui.request_redraw(RedrawFlag::All);
    }

    /// Push the search input buffer into the criteria.
    pub fn sync_search_from_input(&mut self) {
        let name = self.ui.input.to_string();
        if name != self.view.criteria().name_substring {
            self.apply_view_event(ViewEvent::SetSearchName(name));
        }
    }
}
