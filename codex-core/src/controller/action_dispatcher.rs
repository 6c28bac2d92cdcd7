//! ActionDispatcher: applies [`Action`]s to the [`AppState`] and owns the
//! background load.
//!
//! Criteria changes go through the view store's transition function; every
//! other action only touches UI state. At most one load runs at a time: a
//! reload cancels the previous task and results from superseded tasks are
//! ignored.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::actions::Action;
use crate::controller::event_loop::TaskResult;
use crate::data::record::Field;
use crate::model::app_state::AppState;
use crate::model::criteria::SortColumn;
use crate::model::ui_state::{RedrawFlag, UIOverlay};
use crate::model::view_state::ViewEvent;
use crate::source::raw_source::RawSource;
use crate::tasks::load_task::{LoadHandle, spawn_load_task};

pub struct ActionDispatcher {
    source: Arc<dyn RawSource>,
    task_tx: UnboundedSender<TaskResult>,
    shutdown: CancellationToken,
    current_load: Option<LoadHandle>,
}

impl ActionDispatcher {
    pub fn new(
        source: Arc<dyn RawSource>,
        task_tx: UnboundedSender<TaskResult>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            task_tx,
            shutdown,
            current_load: None,
        }
    }

    /// Start a load, cancelling any load already running.
    pub fn start_load(&mut self, app: &mut AppState) {
        if let Some(previous) = self.current_load.take() {
            previous.cancel();
        }

        let handle = spawn_load_task(
            Arc::clone(&self.source),
            self.task_tx.clone(),
            &self.shutdown,
        );
        info!(task_id = handle.task_id, source = %self.source.describe(), "Load requested");
        self.current_load = Some(handle);

        if app.ui.overlay == UIOverlay::Error {
            app.ui.overlay = UIOverlay::None;
        }
        app.apply_view_event(ViewEvent::LoadStarted {
            source: self.source.describe(),
        });
    }

    /// Cancel the running load, if any.
    pub fn cancel_load(&mut self) {
        if let Some(handle) = self.current_load.take() {
            handle.cancel();
        }
    }

    /// Stop the running load and wait for it to exit.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.current_load.take() {
            handle.cancel_and_wait().await;
        }
    }

    /// Apply one action. Returns `false` when the application should exit.
    pub fn handle(&mut self, app: &mut AppState, action: Action) -> bool {
        let resets_selection = action.changes_criteria();

        match action {
            Action::Quit => {
                info!("Quit requested");
                self.cancel_load();
                return false;
            }

            Action::NoOp => return true,

            Action::Reload => self.start_load(app),

            Action::Tick => {
                app.ui.update_notification();
                if app.view.status().is_loading() {
                    app.ui.request_redraw(RedrawFlag::Overlay);
                }
            }

            Action::Resize(..) => app.ui.request_redraw(RedrawFlag::All),

            Action::TaskResult(result) => self.handle_task_result(app, result),

            Action::FocusNext => app.ui.focus_next(),
            Action::FocusPrev => app.ui.focus_prev(),
            Action::FocusOn(focus) => {
                app.ui.focus = focus;
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::ToggleHelp => {
                app.ui.overlay = if app.ui.overlay == UIOverlay::Help {
                    UIOverlay::None
                } else {
                    UIOverlay::Help
                };
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::CloseOverlay => {
                app.ui.overlay = UIOverlay::None;
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::DismissNotification => app.ui.dismiss_notification(),

            Action::CycleSort { forward } => {
                let next = SortColumn::cycle(app.view.criteria().sort, forward);
                app.apply_view_event(ViewEvent::SetSortKey(next));
            }

            Action::SetSort(sort) => app.apply_view_event(ViewEvent::SetSortKey(sort)),

            Action::MoveLevelCursor(delta) => app.ui.move_level_cursor(delta),

            Action::ToggleLevelAtCursor => {
                let level = app.ui.level_cursor;
                Self::toggle_level(app, level);
            }

            Action::ToggleLevel(level) => {
                app.ui.level_cursor = level;
                Self::toggle_level(app, level);
            }

            Action::ClearLevels => {
                let selected: Vec<i64> = app.view.criteria().levels.iter().copied().collect();
                for level in selected {
                    app.apply_view_event(ViewEvent::ToggleLevel {
                        level,
                        included: false,
                    });
                }
            }

            Action::SearchInput(ch) => {
                app.ui.insert_char(ch);
                app.sync_search_from_input();
            }

            Action::SearchBackspace => {
                if app.ui.delete_char_before() {
                    app.sync_search_from_input();
                }
            }

            Action::SearchCursor { forward } => {
                app.ui.move_input_cursor(forward);
                app.ui.request_redraw(RedrawFlag::Main);
            }

            Action::ClearSearch => {
                app.ui.clear_input();
                app.sync_search_from_input();
            }

            Action::ClearFilters => {
                app.ui.clear_input();
                app.apply_view_event(ViewEvent::ClearFilters);
                app.ui.show_info("Filters cleared");
            }

            Action::MoveSelection(delta) => {
                let len = app.view.displayed_len();
                app.ui.move_selection(delta, len);
            }

            Action::PageUp => Self::page(app, false),
            Action::PageDown => Self::page(app, true),

            Action::SelectFirst => app.ui.select_first(),

            Action::SelectLast => {
                let len = app.view.displayed_len();
                app.ui.select_last(len);
            }
        }

        if resets_selection {
            app.ui.select_first();
        }
        true
    }

    fn page(app: &mut AppState, down: bool) {
        let len = app.view.displayed_len();
        let page = isize::try_from(app.ui.page_size()).unwrap_or(isize::MAX);
        app.ui.move_selection(if down { page } else { -page }, len);
    }

    fn toggle_level(app: &mut AppState, level: i64) {
        let included = !app.view.criteria().levels.contains(&level);
        app.apply_view_event(ViewEvent::ToggleLevel { level, included });
    }

    fn handle_task_result(&mut self, app: &mut AppState, result: TaskResult) {
        let task_id = result.task_id();
        if self.current_load.as_ref().map(|h| h.task_id) != Some(task_id) {
            debug!(task_id, "Ignoring result from superseded load");
            return;
        }
        self.current_load = None;

        match result {
            TaskResult::Loaded {
                source,
                table,
                elapsed,
                ..
            } => {
                let count = table.records.len();
                let dropped = table.dropped_rows;
                let clean = table.is_clean();
                let missing = missing_columns_label(&table.missing_columns);

                app.apply_view_event(ViewEvent::DataLoaded { source, table });
                app.ui.select_first();
                info!(count, dropped, "Spell table ready in {:?}", elapsed);

                if clean {
                    app.ui.show_success(format!("Loaded {count} spells"));
                } else if dropped > 0 {
                    app.ui.show_warning(format!(
                        "Loaded {count} spells; {dropped} malformed rows dropped"
                    ));
                } else if let Some(missing) = missing {
                    app.ui
                        .show_warning(format!("Loaded {count} spells; missing columns: {missing}"));
                }
            }

            TaskResult::LoadFailed { source, error, .. } => {
                warn!(%source, "Load failed: {}", error);
                let message = error.to_string();
                let retryable = error.is_retryable();
                app.apply_view_event(ViewEvent::LoadFailed {
                    message: message.clone(),
                    retryable,
                });

                // Earlier records stay browsable; only an empty view gets the modal.
                if app.view.total_len() == 0 {
                    app.ui.overlay = UIOverlay::Error;
                } else if retryable {
                    app.ui
                        .show_error(format!("Reload failed: {message} (Ctrl+R to retry)"));
                } else {
                    app.ui.show_error(format!("Reload failed: {message}"));
                }
            }
        }
    }
}

fn missing_columns_label(missing: &[Field]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    Some(
        missing
            .iter()
            .map(|f| f.header())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::ParsedTable;
    use crate::data::record::SpellRecord;
    use crate::error::AppError;
    use crate::model::ui_state::NotificationLevel;
    use crate::model::view_state::LoadStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct CsvText(&'static str);

    #[async_trait]
    impl RawSource for CsvText {
        fn describe(&self) -> String {
            "memory".into()
        }

        async fn fetch_raw(&self) -> Result<String, AppError> {
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl RawSource for Unreachable {
        fn describe(&self) -> String {
            "unreachable".into()
        }

        async fn fetch_raw(&self) -> Result<String, AppError> {
            Err(AppError::http_status("unreachable", 500))
        }
    }

    const SPELLS: &str = "Name,Level,School\nFireball,3,Evocation\nFrost Ray,1,Evocation\nShield,1,Abjuration\n";

    fn setup(
        source: Arc<dyn RawSource>,
    ) -> (
        ActionDispatcher,
        AppState,
        mpsc::UnboundedReceiver<TaskResult>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = ActionDispatcher::new(source, tx, CancellationToken::new());
        (dispatcher, AppState::default(), rx)
    }

    async fn load(
        dispatcher: &mut ActionDispatcher,
        app: &mut AppState,
        rx: &mut mpsc::UnboundedReceiver<TaskResult>,
    ) {
        dispatcher.start_load(app);
        assert!(app.view.status().is_loading());
        let result = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(dispatcher.handle(app, Action::TaskResult(result)));
    }

    fn shown(app: &AppState) -> Vec<&str> {
        app.view.displayed().map(SpellRecord::name).collect()
    }

    #[tokio::test]
    async fn load_then_filter_by_typing() {
        let (mut d, mut app, mut rx) = setup(Arc::new(CsvText(SPELLS)));
        load(&mut d, &mut app, &mut rx).await;

        assert_eq!(app.view.total_len(), 3);
        assert!(matches!(app.view.status(), LoadStatus::Ready { .. }));
        // Every expected column except Name/Level/School is missing.
        assert_eq!(
            app.ui.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );

        d.handle(&mut app, Action::SearchInput('f'));
        assert_eq!(shown(&app), ["Fireball", "Frost Ray"]);
        d.handle(&mut app, Action::SearchInput('r'));
        assert_eq!(shown(&app), ["Frost Ray"]);

        d.handle(&mut app, Action::ClearSearch);
        assert_eq!(app.view.displayed_len(), 3);
    }

    #[tokio::test]
    async fn level_toggles_and_sort_cycle() {
        let (mut d, mut app, mut rx) = setup(Arc::new(CsvText(SPELLS)));
        load(&mut d, &mut app, &mut rx).await;

        d.handle(&mut app, Action::ToggleLevel(1));
        assert_eq!(shown(&app), ["Frost Ray", "Shield"]);
        d.handle(&mut app, Action::ToggleLevel(1));
        assert_eq!(app.view.displayed_len(), 3);

        d.handle(&mut app, Action::MoveLevelCursor(2));
        d.handle(&mut app, Action::ToggleLevelAtCursor);
        assert_eq!(shown(&app), ["Fireball"]);
        d.handle(&mut app, Action::ClearLevels);
        assert!(app.view.criteria().levels.is_empty());

        d.handle(&mut app, Action::CycleSort { forward: true });
        assert_eq!(app.view.criteria().sort, Some(SortColumn::Name));
        assert_eq!(shown(&app), ["Fireball", "Frost Ray", "Shield"]);
        d.handle(&mut app, Action::CycleSort { forward: true });
        assert_eq!(app.view.criteria().sort, Some(SortColumn::Level));
        assert_eq!(shown(&app), ["Frost Ray", "Shield", "Fireball"]);
        d.handle(&mut app, Action::SetSort(None));
        assert_eq!(app.view.criteria().sort, None);
    }

    #[tokio::test]
    async fn criteria_change_resets_selection() {
        let (mut d, mut app, mut rx) = setup(Arc::new(CsvText(SPELLS)));
        load(&mut d, &mut app, &mut rx).await;

        d.handle(&mut app, Action::SelectLast);
        assert_eq!(app.ui.selected_card, 2);
        d.handle(&mut app, Action::CycleSort { forward: true });
        assert_eq!(app.ui.selected_card, 0);

        app.ui.set_page_size(2);
        d.handle(&mut app, Action::PageDown);
        assert_eq!(app.ui.selected_card, 2);
        d.handle(&mut app, Action::PageUp);
        assert_eq!(app.ui.selected_card, 0);
    }

    #[tokio::test]
    async fn failure_opens_error_overlay_and_reload_closes_it() {
        let (mut d, mut app, mut rx) = setup(Arc::new(Unreachable));
        load(&mut d, &mut app, &mut rx).await;

        match app.view.status() {
            LoadStatus::Failed { message, retryable } => {
                assert!(message.contains("500"));
                assert!(*retryable);
            }
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(app.ui.overlay, UIOverlay::Error);

        d.handle(&mut app, Action::Reload);
        assert_eq!(app.ui.overlay, UIOverlay::None);
        assert!(app.view.status().is_loading());
        d.cancel_load();
    }

    #[tokio::test]
    async fn superseded_results_are_ignored() {
        let (mut d, mut app, _rx) = setup(Arc::new(CsvText(SPELLS)));
        d.start_load(&mut app);

        let stale = TaskResult::Loaded {
            task_id: u64::MAX,
            source: "old".into(),
            table: ParsedTable {
                records: vec![SpellRecord::from_pairs([(Field::Name, "Stale")])],
                ..ParsedTable::default()
            },
            elapsed: Duration::ZERO,
        };
        d.handle(&mut app, Action::TaskResult(stale));
        assert_eq!(app.view.total_len(), 0);
        assert!(app.view.status().is_loading());
        d.cancel_load();
    }

    #[tokio::test]
    async fn overlays_and_quit() {
        let (mut d, mut app, _rx) = setup(Arc::new(CsvText(SPELLS)));
        d.handle(&mut app, Action::ToggleHelp);
        assert_eq!(app.ui.overlay, UIOverlay::Help);
        d.handle(&mut app, Action::CloseOverlay);
        assert_eq!(app.ui.overlay, UIOverlay::None);
        assert!(!d.handle(&mut app, Action::Quit));
    }

    #[tokio::test]
    async fn quit_cancels_running_load() {
        let (mut d, mut app, _rx) = setup(Arc::new(CsvText(SPELLS)));
        d.start_load(&mut app);
        assert!(d.current_load.is_some());
        assert!(!d.handle(&mut app, Action::Quit));
        assert!(d.current_load.is_none());
    }

    #[tokio::test]
    async fn clean_table_reports_success() {
        let header: Vec<&str> = Field::ALL.iter().map(|f| f.header()).collect();
        let row = vec!["x"; Field::ALL.len()];
        let csv = format!("{}\n{}\n", header.join(","), row.join(","));
        let text: &'static str = Box::leak(csv.into_boxed_str());

        let (mut d, mut app, mut rx) = setup(Arc::new(CsvText(text)));
        load(&mut d, &mut app, &mut rx).await;

        assert_eq!(app.view.total_len(), 1);
        assert_eq!(
            app.ui.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
    }

    /// Serves the table once, then fails every later fetch.
    struct FailsAfterFirst(AtomicBool);

    #[async_trait]
    impl RawSource for FailsAfterFirst {
        fn describe(&self) -> String {
            "flaky".into()
        }

        async fn fetch_raw(&self) -> Result<String, AppError> {
            if self.0.swap(true, Ordering::SeqCst) {
                Err(AppError::http_status("flaky", 503))
            } else {
                Ok(SPELLS.to_string())
            }
        }
    }

    #[tokio::test]
    async fn failed_reload_keeps_records_and_notifies() {
        let source = Arc::new(FailsAfterFirst(AtomicBool::new(false)));
        let (mut d, mut app, mut rx) = setup(source);
        load(&mut d, &mut app, &mut rx).await;
        assert_eq!(app.view.total_len(), 3);

        load(&mut d, &mut app, &mut rx).await;
        assert!(app.view.status().is_failed());
        assert_eq!(app.view.total_len(), 3);
        assert_eq!(app.ui.overlay, UIOverlay::None);

        let Some(n) = app.ui.notification.as_ref() else {
            panic!("expected an error notification");
        };
        assert_eq!(n.level, NotificationLevel::Error);
        assert!(n.message.contains("503"));
        assert!(n.message.contains("Ctrl+R"));
        assert_eq!(n.auto_dismiss_ms, None);
    }

    #[tokio::test]
    async fn shutdown_stops_running_load() {
        let (mut d, mut app, mut rx) = setup(Arc::new(CsvText(SPELLS)));
        d.start_load(&mut app);
        d.shutdown().await;
        drop(d);
        // Either the load finished first or it was cancelled; nothing else arrives.
        while let Some(result) = rx.recv().await {
            assert!(matches!(result, TaskResult::Loaded { .. }));
        }
    }
}
