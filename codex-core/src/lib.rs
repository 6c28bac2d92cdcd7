pub mod error;

pub mod config;

pub mod data {
    pub mod record;
    pub use record::{Field, SpellRecord};

    pub mod parser;
    pub use parser::ParsedTable;
}

pub mod source {
    pub mod raw_source;
    pub use raw_source::{RawSource, SourceLocation};

    pub mod file_source;

    pub mod http_source;
}

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod key_map;

    pub mod action_dispatcher;

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};
}

pub mod model {
    pub mod app_state;

    pub mod criteria;
    pub use criteria::{Criteria, SortColumn};

    pub mod pipeline;

    pub mod view_state;
    pub use view_state::{LoadStatus, ViewEvent, ViewState};

    pub mod ui_state;
    pub use ui_state::{Focus, Notification, NotificationLevel, RedrawFlag, UIOverlay, UIState};
}

pub mod tasks {
    pub mod load_task;
}

pub mod view {
    pub mod theme;

    pub mod cards;

    pub mod ui;

    pub mod components {
        pub mod control_panel;
        pub use control_panel::ControlPanel;
        pub mod spell_cards;
        pub use spell_cards::SpellCards;
        pub mod status_bar;
        pub use status_bar::StatusBar;
        pub mod help_overlay;
        pub use help_overlay::HelpOverlay;
        pub mod loading_overlay;
        pub use loading_overlay::LoadingOverlay;
        pub mod error_overlay;
        pub use error_overlay::ErrorOverlay;
        pub mod notification_overlay;
        pub use notification_overlay::NotificationOverlay;
    }

    #[cfg(test)]
    pub mod test_support;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use model::{app_state::AppState, ui_state::UIState, view_state::ViewState};
