//! Session runtime.
//!
//! A session owns one [`GameState`] inside a single tokio task. Callers talk to it
//! through a cloneable [`SessionHandle`]: commands go in over an mpsc channel, and
//! every state change is published as an immutable [`GameSnapshot`] on a watch
//! channel.
//!
//! When a selection completes a pair, the session spawns a one-shot timer task that
//! sleeps for the resolve delay and sends the pair's [`ConcealTicket`] back. The
//! ticket carries the board generation, so a timer that fires after a restart is
//! dropped by the state instead of touching the new board.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::core::{reducer, ConcealTicket, GameSnapshot, GameState};
use crate::event_log::{EventLog, LogRecord};
use crate::protocol::build_observation;
use crate::types::{SelectOutcome, TILE_COUNT};

const COMMAND_QUEUE: usize = 32;

/// Command delivered to the session loop.
#[derive(Debug)]
enum SessionCommand {
    Select {
        index: usize,
        reply: oneshot::Sender<SelectOutcome>,
    },
    Restart {
        reply: oneshot::Sender<u32>,
    },
    Conceal(ConcealTicket),
    Shutdown,
}

/// Entry point for starting sessions.
pub struct Session;

impl Session {
    /// Start a session on the current tokio runtime and deal the first board.
    pub fn spawn(config: SessionConfig) -> SessionHandle {
        let mut state = GameState::with_resolve_delay(config.seed, config.resolve_delay_ms);
        state.start();

        let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(COMMAND_QUEUE);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(state.snapshot()));

        let log = config.log_path.clone().map(|path| EventLog::spawn(path).0);
        if let Some(log) = &log {
            log.record(LogRecord::Started {
                seed: config.seed,
                resolve_delay_ms: config.resolve_delay_ms,
            });
        }

        let worker = SessionLoop {
            state,
            cmd_tx: cmd_tx.downgrade(),
            snapshot_tx,
            resolve_delay: config.resolve_delay(),
            log: log.clone(),
            observation_seq: 0,
        };
        let task = tokio::spawn(worker.run(cmd_rx));

        SessionHandle {
            cmd_tx,
            snapshot_rx,
            task: Arc::new(std::sync::Mutex::new(Some(task))),
            log,
        }
    }
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<Arc<GameSnapshot>>,
    task: Arc<std::sync::Mutex<Option<JoinHandle<()>>>>,
    log: Option<EventLog>,
}

impl SessionHandle {
    /// Reveal a tile.
    ///
    /// Fails if `index` is not a board position or the session has stopped.
    pub async fn select(&self, index: usize) -> Result<SelectOutcome> {
        ensure!(
            index < TILE_COUNT,
            "tile index {index} out of range (board has {TILE_COUNT} tiles)"
        );
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Select { index, reply }).await?;
        rx.await.context("session stopped before replying")
    }

    /// Deal a new board. Returns the new generation.
    pub async fn restart(&self) -> Result<u32> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Restart { reply }).await?;
        rx.await.context("session stopped before replying")
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        self.snapshot_rx.borrow().clone()
    }

    /// Stop the session loop and wait for it to exit. Anything recorded to the
    /// event log by then is on disk when this returns.
    pub async fn shutdown(&self) -> Result<()> {
        // A closed channel means the loop is already gone.
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;

        let task = self
            .task
            .lock()
            .map_err(|_| anyhow!("session task handle poisoned"))?
            .take();
        if let Some(task) = task {
            task.await.context("session task panicked")?;
        }
        if let Some(log) = &self.log {
            log.flush().await;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    /// Append to the event log, if one is configured.
    pub(crate) fn record(&self, rec: LogRecord) {
        if let Some(log) = &self.log {
            log.record(rec);
        }
    }

    async fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("session is closed"))
    }
}

struct SessionLoop {
    state: GameState,
    /// Weak so the loop ends once every handle is dropped.
    cmd_tx: mpsc::WeakSender<SessionCommand>,
    snapshot_tx: watch::Sender<Arc<GameSnapshot>>,
    resolve_delay: Duration,
    log: Option<EventLog>,
    observation_seq: u64,
}

impl SessionLoop {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<SessionCommand>) {
        self.log_observation();

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                SessionCommand::Select { index, reply } => {
                    let (next, outcome) = reducer::select(&self.state, index);
                    self.state = next;
                    let reason = match outcome {
                        SelectOutcome::Ignored(reason) => Some(reason.as_str()),
                        _ => None,
                    };
                    self.record(LogRecord::Select {
                        index,
                        outcome: outcome.as_str(),
                        reason,
                    });
                    if outcome.completes_pair() {
                        self.schedule_conceal();
                    }
                    self.publish();
                    let _ = reply.send(outcome);
                }
                SessionCommand::Restart { reply } => {
                    self.state = reducer::start(&self.state);
                    let generation = self.state.generation();
                    self.record(LogRecord::Restart { generation });
                    self.publish();
                    let _ = reply.send(generation);
                }
                SessionCommand::Conceal(ticket) => {
                    let next = reducer::conceal(&self.state, ticket);
                    let applied = next.pending().is_none() && self.state.pending().is_some();
                    self.state = next;
                    self.record(LogRecord::Conceal {
                        generation: ticket.generation,
                        attempt: ticket.attempt,
                        applied,
                    });
                    self.publish();
                }
                SessionCommand::Shutdown => break,
            }
        }
    }

    fn schedule_conceal(&self) {
        let Some(pending) = self.state.pending() else {
            return;
        };
        let Some(tx) = self.cmd_tx.upgrade() else {
            return;
        };
        let delay = self.resolve_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The session may have shut down in the meantime.
            let _ = tx.send(SessionCommand::Conceal(pending.ticket)).await;
        });
    }

    /// Publish a new snapshot if anything observable changed.
    fn publish(&mut self) {
        let next = self.state.snapshot();
        let changed = self.snapshot_tx.send_if_modified(|current| {
            if **current == next {
                return false;
            }
            *current = Arc::new(next);
            true
        });
        if changed {
            self.log_observation();
        }
    }

    fn log_observation(&mut self) {
        if self.log.is_none() {
            return;
        }
        self.observation_seq += 1;
        let obs = build_observation(self.observation_seq, &self.snapshot_tx.borrow());
        self.record(LogRecord::Observation(obs));
    }

    fn record(&self, rec: LogRecord) {
        if let Some(log) = &self.log {
            log.record(rec);
        }
    }
}
