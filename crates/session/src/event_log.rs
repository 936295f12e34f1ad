//! Append-only JSONL event log.
//!
//! Records are queued on an unbounded channel and written by a dedicated task so the
//! session loop never waits on the filesystem. Write failures end the writer quietly;
//! the game keeps running without a log.
//!
//! The session loop records state transitions and every published observation; the
//! line driver records raw inbound lines and the acks and errors it sends back.

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::protocol::{AckMessage, ErrorMessage, ObservationMessage};

/// One line of the event log
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogRecord {
    Started {
        seed: u32,
        resolve_delay_ms: u32,
    },
    /// Raw (trimmed) inbound protocol line
    Inbound {
        line: String,
    },
    Select {
        index: usize,
        outcome: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<&'static str>,
    },
    Restart {
        generation: u32,
    },
    Conceal {
        generation: u32,
        attempt: u32,
        applied: bool,
    },
    Quit {
        seq: u64,
    },
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

enum LogCommand {
    Record(LogRecord),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task
#[derive(Debug, Clone)]
pub struct EventLog {
    tx: mpsc::UnboundedSender<LogCommand>,
}

impl EventLog {
    /// Spawn a writer appending to `path`. Must be called inside a tokio runtime.
    pub fn spawn(path: String) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogCommand>();
        let handle = tokio::spawn(async move {
            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[Session] Event log {} unavailable: {}", path, e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(1024);
            while let Some(cmd) = rx.recv().await {
                match cmd {
                    LogCommand::Record(rec) => {
                        buf.clear();
                        if serde_json::to_writer(&mut buf, &rec).is_err() {
                            continue;
                        }
                        buf.push(b'\n');
                        if file.write_all(&buf).await.is_err() {
                            break;
                        }
                    }
                    LogCommand::Flush(done) => {
                        let _ = file.flush().await;
                        let _ = done.send(());
                    }
                }
            }

            let _ = file.flush().await;
        });
        (Self { tx }, handle)
    }

    pub fn record(&self, rec: LogRecord) {
        let _ = self.tx.send(LogCommand::Record(rec));
    }

    /// Wait until everything recorded so far has reached the file.
    ///
    /// Returns immediately if the writer has already stopped.
    pub async fn flush(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(LogCommand::Flush(done)).is_ok() {
            let _ = rx.await;
        }
    }
}
