//! Session module - async owner of a running game
//!
//! This crate wraps the deterministic core in a tokio task that presentation code can
//! drive and observe:
//!
//! 1. **Spawn**: [`Session::spawn`] deals the first board and publishes a snapshot
//! 2. **Command**: [`SessionHandle::select`] / [`SessionHandle::restart`] go through the
//!    session loop one at a time
//! 3. **Observe**: [`SessionHandle::subscribe`] yields a `watch` receiver of immutable
//!    [`GameSnapshot`](crate::core::GameSnapshot)s, updated after every change
//! 4. **Resolve**: a completed pair is concealed by a scheduled one-shot task after the
//!    resolve delay; restarts invalidate timers that are still in flight
//!
//! # Line Protocol
//!
//! [`driver`] maps a line-delimited JSON protocol onto a session:
//!
//! ```text
//! Client -> Session: {"type":"select","seq":1,"index":4}
//! Session -> Client: {"type":"ack","seq":1,"ts":1700000000000,"outcome":"revealed"}
//! Session -> Client: {"type":"observation","seq":2,"ts":1700000000000,"generation":1,"phase":"playing",...}
//! Client -> Session: {"type":"restart","seq":2}
//! Client -> Session: {"type":"quit"}
//! ```
//!
//! # Environment Variables
//!
//! - `COLOR_MATCH_SEED`: deck seed
//! - `COLOR_MATCH_RESOLVE_DELAY_MS`: conceal delay (default 500)
//! - `COLOR_MATCH_LOG_PATH`: JSONL event log path (disabled when unset)

pub mod config;
pub mod driver;
pub mod event_log;
pub mod protocol;
pub mod session;

pub use color_match_core as core;
pub use color_match_types as types;

pub use config::SessionConfig;
pub use driver::{handle_line, spawn_observation_stream, LineReply};
pub use event_log::{EventLog, LogRecord};
pub use session::{Session, SessionHandle};
