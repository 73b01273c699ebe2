//! Session loop with a periodic tick and a background saver.
//!
//! [`run_session`] is the top-level async function that owns the
//! [`GameStore`] for the lifetime of a session:
//!
//! - **Single writer**: timer ticks and incoming requests are serialized
//!   through one `tokio::select!` loop, so mutations never interleave
//! - **Periodic tick**: a [`Command::Tick`] every `tick_interval`
//! - **Fire-and-forget persistence**: after each accepted command the
//!   latest snapshot is handed to a writer task over a `watch` channel;
//!   only the newest snapshot is written
//! - **Clean shutdown**: when every request sender is dropped, the final
//!   snapshot is flushed and the writer is joined

use std::sync::Arc;
use std::time::Duration;

use cadence_types::{Command, CommandOutcome, Notification};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::engine::GameStore;
use crate::persistence::{self, PersistError, SaveStore};

/// Errors that can occur while running a session.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The background saver task panicked or was cancelled.
    #[error("saver task failed: {source}")]
    Saver {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// The final snapshot could not be written.
    #[error("final save failed: {source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: PersistError,
    },
}

/// One command submitted to a running session.
#[derive(Debug)]
pub struct SessionRequest {
    /// The command to apply.
    pub command: Command,
    /// Where to send the answer. Dropping the receiver is allowed.
    pub reply: oneshot::Sender<SessionReply>,
}

/// The answer to a [`SessionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReply {
    /// Whether the command was applied, and why not.
    pub outcome: CommandOutcome,
    /// Notifications drained from the queue after the command.
    pub notifications: Vec<Notification>,
}

/// Handle for submitting commands to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<SessionRequest>,
}

impl SessionHandle {
    /// Submit a command and wait for its reply.
    ///
    /// Returns `None` once the session has stopped.
    pub async fn submit(&self, command: Command) -> Option<SessionReply> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(SessionRequest { command, reply })
            .await
            .ok()?;
        rx.await.ok()
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands received from the handle.
    pub commands: u64,
    /// Timer ticks applied.
    pub ticks: u64,
}

/// Create the request channel for [`run_session`].
pub fn channel(capacity: usize) -> (SessionHandle, mpsc::Receiver<SessionRequest>) {
    let (requests, rx) = mpsc::channel(capacity.max(1));
    (SessionHandle { requests }, rx)
}

fn spawn_saver(
    store: Arc<dyn SaveStore>,
    mut snapshots: watch::Receiver<Option<String>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let blob = snapshots.borrow_and_update().clone();
            let Some(blob) = blob else {
                continue;
            };
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.save(&blob)).await {
                Ok(Ok(())) => debug!("snapshot saved"),
                Ok(Err(err)) => warn!(error = %err, "snapshot save failed"),
                Err(err) => warn!(error = %err, "snapshot writer crashed"),
            }
        }
    })
}

fn publish(store: &GameStore, snapshots: &watch::Sender<Option<String>>) {
    match persistence::encode(store.aggregate()) {
        Ok(blob) => {
            snapshots.send_replace(Some(blob));
        }
        Err(err) => warn!(error = %err, "snapshot encoding failed"),
    }
}

/// Run a session until every [`SessionHandle`] is dropped.
///
/// # Errors
///
/// Returns [`RunnerError`] if the saver task fails or the final snapshot
/// cannot be written.
pub async fn run_session(
    mut store: GameStore,
    saves: Arc<dyn SaveStore>,
    mut requests: mpsc::Receiver<SessionRequest>,
    tick_interval: Duration,
) -> Result<SessionSummary, RunnerError> {
    let (snapshots, snapshot_rx) = watch::channel(None);
    let saver = spawn_saver(Arc::clone(&saves), snapshot_rx);

    let mut timer = tokio::time::interval(tick_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately.
    timer.tick().await;

    let mut summary = SessionSummary {
        commands: 0,
        ticks: 0,
    };
    info!(tick_interval_secs = tick_interval.as_secs(), "session starting");

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let applied = store.apply(&Command::Tick);
                summary.ticks = summary.ticks.saturating_add(1);
                if applied.outcome.success {
                    publish(&store, &snapshots);
                }
            }
            request = requests.recv() => {
                let Some(SessionRequest { command, reply }) = request else {
                    break;
                };
                summary.commands = summary.commands.saturating_add(1);
                let applied = store.apply(&command);
                if applied.outcome.success {
                    publish(&store, &snapshots);
                }
                if applied.save_requested {
                    info!(command = command.name(), "save requested");
                }
                let notifications = store.drain_notifications();
                // The caller may have given up on the reply.
                let _ = reply.send(SessionReply {
                    outcome: applied.outcome,
                    notifications,
                });
            }
        }
    }

    // Stop the background writer, then flush the final state synchronously.
    drop(snapshots);
    saver.await?;
    let blob = persistence::encode(store.aggregate())?;
    tokio::task::spawn_blocking(move || saves.save(&blob)).await??;
    info!(
        commands = summary.commands,
        ticks = summary.ticks,
        level = store.aggregate().economy.level,
        "session ended"
    );
    Ok(summary)
}
