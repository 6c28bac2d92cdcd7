//! src/view/ui.rs
//! ============================================================
//! Frame renderer: header, control panel, card grid, status bar,
//! then whichever overlays the state asks for.

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};
use tracing::{instrument, trace};

use crate::{
    model::{
        app_state::AppState,
        ui_state::{NotificationLevel, UIOverlay},
        view_state::LoadStatus,
    },
    view::{
        components::{
            control_panel::ControlPanel,
            error_overlay::ErrorOverlay,
            help_overlay::{HelpOverlay, centered_rect},
            loading_overlay::LoadingOverlay,
            notification_overlay::NotificationOverlay,
            spell_cards::SpellCards,
            status_bar::StatusBar,
        },
        theme,
    },
};

/// Width of the left-hand control column.
const CONTROL_WIDTH: u16 = 32;

pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MainLayout {
    header: Rect,
    controls: Rect,
    cards: Rect,
    status: Rect,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    main: Option<MainLayout>,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
    /// Frames that reused the cached layout vs. recomputed it.
    pub layout_hits: u64,
    pub layout_misses: u64,
}

impl RenderStats {
    pub fn average(&self) -> Duration {
        match u32::try_from(self.frames) {
            Ok(frames) if frames > 0 => self.total / frames,
            _ => Duration::ZERO,
        }
    }
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            cache: LayoutCache::default(),
            stats: RenderStats::default(),
        }
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, app: &AppState) {
        let start = Instant::now();
        let layout = self.layout(f.area());

        Self::draw_header(f, app, layout.header);
        ControlPanel::new().render(f, &app.view, &app.ui, layout.controls);
        SpellCards::new(app.config.ui.columns()).render(f, &app.view, &app.ui, layout.cards);
        StatusBar::new().render(f, &app.view, &app.ui, layout.status);

        Self::draw_overlays(f, app);

        let elapsed = start.elapsed();
        self.stats.total += elapsed;
        self.stats.frames += 1;
        if elapsed > Duration::from_millis(16) {
            self.stats.slow += 1;
            trace!(?elapsed, "Slow frame");
        }
    }

    fn draw_header(f: &mut Frame<'_>, app: &AppState, area: Rect) {
        let source = match app.view.status() {
            LoadStatus::Loading { source, .. } | LoadStatus::Ready { source, .. } => {
                source.as_str()
            }
            _ => app.config.source.location.as_str(),
        };

        let header = Line::from(vec![
            Span::styled(" Hex Codex ", theme::header_style()),
            Span::styled(format!(" {source}"), theme::hint_style()),
        ]);
        Paragraph::new(header)
            .style(theme::base_style())
            .render(area, f.buffer_mut());
    }

    fn draw_overlays(f: &mut Frame<'_>, app: &AppState) {
        let screen = f.area();

        if let LoadStatus::Loading { source, started } = app.view.status() {
            if app.view.total_len() == 0 {
                let rect = centered_rect(50, 25, screen);
                LoadingOverlay::new().render(f, source, started.elapsed(), rect);
            }
        }

        match app.ui.overlay {
            UIOverlay::Help => HelpOverlay::new().render(f, screen),
            UIOverlay::Error => {
                if let LoadStatus::Failed { message, retryable } = app.view.status() {
                    let rect = centered_rect(60, 30, screen);
                    ErrorOverlay::new(message, *retryable).render(f, rect);
                }
            }
            UIOverlay::None => {}
        }

        if let Some(n) = &app.ui.notification {
            let rect = Self::notification_rect(screen, n.level);
            NotificationOverlay::new().render_notification(f, n, rect);
        }
    }

    fn layout(&mut self, screen: Rect) -> MainLayout {
        if let Some(main) = self.cache.main {
            if self.cache.screen == screen {
                self.stats.layout_hits += 1;
                return main;
            }
        }
        self.stats.layout_misses += 1;

        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(screen);
        let [controls, cards] =
            Layout::horizontal([Constraint::Length(CONTROL_WIDTH), Constraint::Fill(1)])
                .areas(body);

        let main = MainLayout {
            header,
            controls,
            cards,
            status,
        };
        self.cache.screen = screen;
        self.cache.main = Some(main);
        main
    }

    fn notification_rect(screen: Rect, level: NotificationLevel) -> Rect {
        let height = if level == NotificationLevel::Error { 5 } else { 4 };
        let width = u16::try_from(u32::from(screen.width) * 60 / 100).unwrap_or(screen.width);
        Rect {
            x: screen.x + (screen.width - width) / 2,
            y: screen.y + 2,
            width,
            height: height.min(screen.height.saturating_sub(2)),
        }
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}
