//! Protocol module - line-delimited JSON messages
//!
//! Every message has a `type` and a `seq`; outbound messages also carry `ts`
//! (milliseconds since the Unix epoch).
//!
//! Inbound: `select` (with `index`), `restart`, `quit`.
//! Outbound: `observation`, `ack`, `error`.

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, Phase};
use crate::types::{IgnoreReason, SelectOutcome};

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SelectType {
    #[default]
    #[serde(rename = "select")]
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RestartType {
    #[default]
    #[serde(rename = "restart")]
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuitType {
    #[default]
    #[serde(rename = "quit")]
    Quit,
}

/// Reveal one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SelectType,
    #[serde(default)]
    pub seq: u64,
    pub index: u64,
}

/// Deal a new board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: RestartType,
    #[serde(default)]
    pub seq: u64,
}

/// End the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuitMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: QuitType,
    #[serde(default)]
    pub seq: u64,
}

/// Parse one inbound line.
///
/// Well-formed JSON with an unrecognised `type` is returned as
/// [`ParsedMessage::Unknown`] rather than an error.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "select")]
        Select(SelectMessage),
        #[serde(rename = "restart")]
        Restart(RestartMessage),
        #[serde(rename = "quit")]
        Quit(QuitMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Select(m)) => Ok(ParsedMessage::Select(m)),
        Ok(InboundMessage::Restart(m)) => Ok(ParsedMessage::Restart(m)),
        Ok(InboundMessage::Quit(m)) => Ok(ParsedMessage::Quit(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type.as_deref() {
                Some("select") | Some("restart") | Some("quit") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Select(SelectMessage),
    Restart(RestartMessage),
    Quit(QuitMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Select(m) => m.seq,
            ParsedMessage::Restart(m) => m.seq,
            ParsedMessage::Quit(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    NotStarted,
    Playing,
    Resolving,
    Won,
}

impl From<Phase> for PhaseName {
    fn from(value: Phase) -> Self {
        match value {
            Phase::NotStarted => PhaseName::NotStarted,
            Phase::Playing => PhaseName::Playing,
            Phase::Resolving => PhaseName::Resolving,
            Phase::Won => PhaseName::Won,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: u32,
    pub color: String,
    pub matched: bool,
    pub revealed: bool,
}

/// Full board state (sent after every change)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub generation: u32,
    pub phase: PhaseName,
    pub attempts: u32,
    pub matches: u32,
    pub selection: Vec<u8>,
    pub tiles: Vec<TileView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckOutcome {
    Restarted,
    Revealed,
    Matched,
    Won,
    Mismatched,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    NotStarted,
    AlreadyMatched,
    AlreadySelected,
    SelectionFull,
}

impl From<IgnoreReason> for IgnoredReason {
    fn from(value: IgnoreReason) -> Self {
        match value {
            IgnoreReason::NotStarted => IgnoredReason::NotStarted,
            IgnoreReason::AlreadyMatched => IgnoredReason::AlreadyMatched,
            IgnoreReason::AlreadySelected => IgnoredReason::AlreadySelected,
            IgnoreReason::SelectionFull => IgnoredReason::SelectionFull,
        }
    }
}

/// Command acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub outcome: AckOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<IgnoredReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_json")]
    InvalidJson,
    #[serde(rename = "unknown_command")]
    UnknownCommand,
    #[serde(rename = "out_of_range")]
    OutOfRange,
    #[serde(rename = "session_closed")]
    SessionClosed,
}

/// Error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Utility Functions ==============

/// Build an observation from a snapshot
pub fn build_observation(seq: u64, snap: &GameSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        generation: snap.generation,
        phase: snap.phase.into(),
        attempts: snap.attempts,
        matches: snap.matches,
        selection: snap.selection.to_vec(),
        tiles: snap
            .tiles
            .iter()
            .map(|t| TileView {
                id: t.id,
                color: t.color.as_str().to_string(),
                matched: t.matched,
                revealed: t.revealed,
            })
            .collect(),
    }
}

/// Ack for a select command
pub fn create_select_ack(seq: u64, outcome: SelectOutcome) -> AckMessage {
    let (outcome, reason) = match outcome {
        SelectOutcome::Revealed => (AckOutcome::Revealed, None),
        SelectOutcome::Matched { finished: true } => (AckOutcome::Won, None),
        SelectOutcome::Matched { finished: false } => (AckOutcome::Matched, None),
        SelectOutcome::Mismatched { .. } => (AckOutcome::Mismatched, None),
        SelectOutcome::Ignored(r) => (AckOutcome::Ignored, Some(r.into())),
    };
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        outcome,
        reason,
    }
}

/// Ack for a restart command
pub fn create_restart_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        outcome: AckOutcome::Restarted,
        reason: None,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
