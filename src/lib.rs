//! Color Match (workspace facade crate).
//!
//! Re-exports the workspace crates under stable module names: `core` for the
//! deterministic game rules, `session` for the async container and line protocol, and
//! `types` for shared constants and enums.

pub use color_match_core as core;
pub use color_match_session as session;
pub use color_match_types as types;
