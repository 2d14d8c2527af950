//! Engine error types.
//!
//! Three layers fail differently: the transport ([`ChatError`]) fails
//! fatally, validation ([`TurnRejection`]) feeds the corrective retry
//! cycle, and the engine itself ([`EngineError`]) surfaces what the
//! presentation layer must react to.

use thiserror::Error;

/// A failure in the model transport.
///
/// Produced by [`ChatClient`](crate::engine::ChatClient)
/// implementations; the engine treats it as fatal for the session.
#[derive(Debug, Clone, Error)]
#[error("chat transport failed: {0}")]
pub struct ChatError(pub String);

/// Why a model response was rejected during validation.
///
/// Every variant is recoverable: the raw response stays in the history
/// and the model is re-prompted with a corrective message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnRejection {
    /// No `{` .. `}` span was found in the response text.
    #[error("no JSON object found in the response")]
    NoObject,
    /// The extracted span is not parseable JSON.
    #[error("extracted span is not valid JSON: {0}")]
    Parse(String),
    /// The JSON object violates the turn schema (unknown key, wrong shape).
    #[error("turn violates the schema: {0}")]
    Schema(String),
    /// Grid mode only: the action token is outside the closed set.
    #[error("action `{0}` is not a grid action token")]
    UnknownAction(String),
}

/// A failure surfaced by [`TurnEngine::step`](crate::engine::TurnEngine::step).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The model transport failed. The session ends; applied mutations stay.
    #[error("model transport failed: {0}")]
    Transport(String),
    /// The optional retry cap was exceeded without a valid turn.
    ///
    /// Recoverable: the session stays open and the caller may step again.
    #[error("retry budget exhausted after {attempts} rejected responses")]
    RetryBudgetExhausted {
        /// How many responses were rejected in this step.
        attempts: u32,
    },
    /// The session has already ended (quit, turn budget, or transport failure).
    #[error("the session has already ended")]
    SessionEnded,
}
