//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop
//!
//! Merges the three things that can wake the application into a single
//! stream of [`Action`]s:
//! - terminal events from crossterm's `EventStream`
//! - results from the background load task
//! - a periodic tick (notification expiry, loading overlay animation)

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::controller::actions::Action;
use crate::controller::key_map::map_key;
use crate::data::parser::ParsedTable;
use crate::error::AppError;
use crate::model::ui_state::UIState;

/// Report from a background task.
#[derive(Debug)]
pub enum TaskResult {
    Loaded {
        task_id: u64,
        source: String,
        table: ParsedTable,
        elapsed: Duration,
    },

    LoadFailed {
        task_id: u64,
        source: String,
        error: AppError,
    },
}

impl TaskResult {
    #[must_use]
    pub const fn task_id(&self) -> u64 {
        match self {
            Self::Loaded { task_id, .. } | Self::LoadFailed { task_id, .. } => *task_id,
        }
    }
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    event_stream: EventStream,
    tick: Interval,
}

impl EventLoop {
    pub fn new(task_rx: mpsc::UnboundedReceiver<TaskResult>, tick_rate: Duration) -> Self {
        info!(?tick_rate, "Initializing event loop");
        let mut tick = tokio::time::interval(tick_rate);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            task_rx,
            event_stream: EventStream::new(),
            tick,
        }
    }

    /// Wait for the next action. `None` once the terminal stream has ended.
    pub async fn next_action(&mut self, ui: &UIState) -> Option<Action> {
        tokio::select! {
            maybe_event = self.event_stream.next() => match maybe_event {
                Some(Ok(event)) => Some(Self::handle_terminal_event(event, ui)),
                Some(Err(e)) => {
                    warn!("Terminal event error: {}", e);
                    Some(Action::NoOp)
                }
                None => {
                    info!("Terminal event stream closed");
                    None
                }
            },

            Some(task_result) = self.task_rx.recv() => {
                debug!(task_id = task_result.task_id(), "Task result received");
                Some(Action::TaskResult(task_result))
            }

            _ = self.tick.tick() => Some(Action::Tick),
        }
    }

    fn handle_terminal_event(event: TermEvent, ui: &UIState) -> Action {
        match event {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                let action = map_key(key, ui);
                debug!(code = ?key.code, ?action, "Key mapped");
                action
            }

            TermEvent::Resize(w, h) => {
                info!("Terminal resize: {}x{}", w, h);
                Action::Resize(w, h)
            }

            other => {
                trace!("Unhandled terminal event: {:?}", other);
                Action::NoOp
            }
        }
    }
}
