//! The coplay turn-protocol engine.
//!
//! This crate turns raw model output into validated, applied turns. It
//! owns the conversation history, the fail-closed turn validator, and
//! the [`TurnEngine`] state machine that cycles awaiting-model,
//! validating, applying or retrying until the session ends. World
//! state lives in `coplay-world`; transport and rendering live in the
//! runner behind the [`ChatClient`] seam.
//!
//! # Modules
//!
//! - [`history`] -- The append-only conversation history
//! - [`validate`] -- JSON extraction and fail-closed turn validation
//! - [`config`] -- Engine configuration
//! - [`engine`] -- The turn engine and the chat client seam
//! - [`error`] -- Engine error types

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod validate;

pub use config::EngineConfig;
pub use engine::{ChatClient, TurnEngine, TurnPhase};
pub use error::{ChatError, EngineError, TurnRejection};
pub use history::ConversationHistory;
pub use validate::{ActionMode, ValidatedTurn, extract_object, validate};
