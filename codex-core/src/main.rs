//! src/main.rs
//! Hex Codex terminal entry point.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{signal, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use codex_core::{
    Logger,
    config::{Config, SourceConfig},
    controller::{action_dispatcher::ActionDispatcher, event_loop::EventLoop},
    model::app_state::AppState,
    source::raw_source,
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    setup_panic_handler();

    let app = App::new()
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    state: AppState,
    event_loop: EventLoop,
    dispatcher: ActionDispatcher,
    ui_renderer: UIRenderer,
    shutdown: CancellationToken,
    _log_guard: Option<WorkerGuard>,
}

impl App {
    async fn new() -> Result<Self> {
        let (config, config_error) = match Config::load().await {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };

        let log_guard = match Logger::init_tracing(&config.log) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Logging disabled: {e:#}");
                None
            }
        };
        info!("Starting Hex Codex");
        if let Some(e) = config_error {
            warn!("Failed to load config, using defaults: {e:#}");
        }

        theme::init_theme();

        let source = raw_source::from_config(&config.source).or_else(|e| {
            warn!(
                location = %config.source.location,
                "Unusable source location, falling back to default: {e}"
            );
            raw_source::from_config(&SourceConfig::default())
        })?;

        let config = Arc::new(config);
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let event_loop = EventLoop::new(task_rx, config.ui.tick_rate);
        let dispatcher = ActionDispatcher::new(source, task_tx, shutdown.clone());
        let state = AppState::new(Arc::clone(&config));

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            state,
            event_loop,
            dispatcher,
            ui_renderer: UIRenderer::new(),
            shutdown,
            _log_guard: log_guard,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        self.dispatcher.start_load(&mut self.state);

        loop {
            self.render()?;

            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }

                action = self.event_loop.next_action(&self.state.ui) => {
                    let Some(action) = action else {
                        info!("Event sources closed");
                        break;
                    };
                    debug!(?action, "Dispatching action");
                    if !self.dispatcher.handle(&mut self.state, action) {
                        info!("Quit requested");
                        break;
                    }
                }
            }
        }

        self.dispatcher.shutdown().await;

        let stats = self.ui_renderer.stats();
        info!(
            frames = stats.frames,
            slow = stats.slow,
            average = ?stats.average(),
            layout_hits = stats.layout_hits,
            layout_misses = stats.layout_misses,
            "Event loop terminated cleanly"
        );
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if !self.state.ui.needs_redraw() {
            return Ok(());
        }

        let state = &self.state;
        let renderer = &mut self.ui_renderer;
        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, state))
            .context("Failed to draw terminal")?;

        self.state.ui.clear_redraw();
        Ok(())
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {e}");
                        return;
                    }
                };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                    () = shutdown.cancelled() => return,
                }
            }

            #[cfg(not(unix))]
            {
                tokio::select! {
                    res = signal::ctrl_c() => {
                        if let Err(e) = res {
                            warn!("Failed to listen for Ctrl+C: {e}");
                            return;
                        }
                        info!("Received Ctrl+C");
                    }
                    () = shutdown.cancelled() => return,
                }
            }

            shutdown.cancel();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {e}");
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
