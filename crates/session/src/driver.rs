//! Line-oriented driver.
//!
//! Turns inbound protocol lines into session calls and session snapshots into
//! outbound observation lines. Transport-agnostic: the binary wires it to stdio.

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event_log::LogRecord;
use crate::protocol::{
    build_observation, create_error, create_restart_ack, create_select_ack, parse_message,
    AckMessage, ErrorCode, ErrorMessage, ParsedMessage,
};
use crate::session::SessionHandle;
use crate::types::TILE_COUNT;

/// What to do after one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReply {
    /// JSON line to send back, if any
    pub line: Option<String>,
    /// The client asked to end the session
    pub quit: bool,
}

impl LineReply {
    fn send(line: String) -> Self {
        Self {
            line: Some(line),
            quit: false,
        }
    }
}

/// Handle one inbound line. Blank lines produce no reply.
///
/// Non-blank lines and the replies to them go to the session's event log.
pub async fn handle_line(session: &SessionHandle, line: &str) -> Result<LineReply> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineReply {
            line: None,
            quit: false,
        });
    }
    session.record(LogRecord::Inbound {
        line: line.to_string(),
    });

    let msg = match parse_message(line) {
        Ok(msg) => msg,
        Err(e) => {
            let err = create_error(0, ErrorCode::InvalidJson, &e.to_string());
            return error_reply(session, err);
        }
    };

    let seq = msg.seq();
    match msg {
        ParsedMessage::Select(m) => {
            if m.index >= TILE_COUNT as u64 {
                let err = create_error(
                    seq,
                    ErrorCode::OutOfRange,
                    &format!("tile index {} out of range (0..{})", m.index, TILE_COUNT),
                );
                return error_reply(session, err);
            }
            match session.select(m.index as usize).await {
                Ok(outcome) => ack_reply(session, create_select_ack(seq, outcome)),
                Err(e) => error_reply(session, closed_error(seq, &e)),
            }
        }
        ParsedMessage::Restart(_) => match session.restart().await {
            Ok(_) => ack_reply(session, create_restart_ack(seq)),
            Err(e) => error_reply(session, closed_error(seq, &e)),
        },
        ParsedMessage::Quit(_) => {
            session.record(LogRecord::Quit { seq });
            Ok(LineReply {
                line: None,
                quit: true,
            })
        }
        ParsedMessage::Unknown(_) => {
            let err = create_error(seq, ErrorCode::UnknownCommand, "unknown message type");
            error_reply(session, err)
        }
    }
}

fn ack_reply(session: &SessionHandle, ack: AckMessage) -> Result<LineReply> {
    let line = serde_json::to_string(&ack)?;
    session.record(LogRecord::Ack(ack));
    Ok(LineReply::send(line))
}

fn error_reply(session: &SessionHandle, err: ErrorMessage) -> Result<LineReply> {
    let line = serde_json::to_string(&err)?;
    session.record(LogRecord::Error(err));
    Ok(LineReply::send(line))
}

fn closed_error(seq: u64, e: &anyhow::Error) -> ErrorMessage {
    create_error(seq, ErrorCode::SessionClosed, &format!("{e:#}"))
}

/// Forward the current snapshot, then the latest snapshot after each change, as
/// observation lines. Changes that land before the stream task runs are merged into
/// one observation; the last state is always sent. The event log keeps one
/// observation per published snapshot. Ends when the session stops or `out` is
/// closed.
pub fn spawn_observation_stream(
    session: &SessionHandle,
    out: mpsc::UnboundedSender<String>,
) -> JoinHandle<()> {
    let mut snapshots = session.subscribe();
    tokio::spawn(async move {
        let mut seq: u64 = 0;
        loop {
            let snap = snapshots.borrow_and_update().clone();
            seq += 1;
            match serde_json::to_string(&build_observation(seq, &snap)) {
                Ok(line) => {
                    if out.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("[Session] Failed to encode observation: {}", e),
            }
            if snapshots.changed().await.is_err() {
                break;
            }
        }
    })
}
