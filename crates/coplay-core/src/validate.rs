//! Turn validation: raw model text in, a validated turn out.
//!
//! Validation happens in three stages, each fail-closed:
//!
//! 1. extraction cuts the span from the first `{` to the last `}` and
//!    requires it to parse into a JSON object,
//! 2. the object must deserialize into the [`Turn`] schema, which
//!    rejects unknown keys at every level,
//! 3. in grid mode the action token must belong to the closed
//!    [`GridAction`] enumeration.
//!
//! A rejected response never reaches the world model; the engine feeds
//! the rejection into its corrective retry cycle.

use coplay_types::{ActionIntent, GridAction, Turn};
use tracing::debug;

use crate::error::TurnRejection;

/// Which action grammar the session's world variant accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// The closed grid token set; anything else rejects the turn.
    Grid,
    /// Free verb phrases, resolved heuristically by the graph strategy.
    Phrase,
}

/// A turn that survived every validation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTurn {
    /// The deserialized turn, defaults filled in.
    pub turn: Turn,
    /// The action, narrowed to the variant's grammar.
    pub intent: ActionIntent,
}

/// Extract the JSON object span from raw model text.
///
/// Models wrap their JSON in prose more often than not; everything
/// before the first `{` and after the last `}` is discarded.
///
/// # Errors
///
/// Returns [`TurnRejection::NoObject`] if no such span exists and
/// [`TurnRejection::Parse`] if the span is not valid JSON.
pub fn extract_object(text: &str) -> Result<serde_json::Value, TurnRejection> {
    let start = text.find('{').ok_or(TurnRejection::NoObject)?;
    let end = text.rfind('}').ok_or(TurnRejection::NoObject)?;
    if end < start {
        return Err(TurnRejection::NoObject);
    }
    // Brace positions are byte offsets of ASCII characters, so the
    // range is always on a char boundary; `get` keeps the lint table's
    // no-indexing rule satisfied all the same.
    let span = text.get(start..=end).ok_or(TurnRejection::NoObject)?;
    let value: serde_json::Value =
        serde_json::from_str(span).map_err(|e| TurnRejection::Parse(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(TurnRejection::NoObject)
    }
}

/// Validate one raw model response into a [`ValidatedTurn`].
///
/// # Errors
///
/// Returns a [`TurnRejection`] naming the failed stage; the caller is
/// expected to re-prompt, not to apply anything.
pub fn validate(raw: &str, mode: ActionMode) -> Result<ValidatedTurn, TurnRejection> {
    let value = extract_object(raw)?;
    let turn: Turn =
        serde_json::from_value(value).map_err(|e| TurnRejection::Schema(e.to_string()))?;
    let intent = match mode {
        ActionMode::Grid => {
            let action = GridAction::parse(&turn.action)
                .ok_or_else(|| TurnRejection::UnknownAction(turn.action.clone()))?;
            ActionIntent::Grid(action)
        }
        ActionMode::Phrase => ActionIntent::Phrase(turn.action.clone()),
    };
    debug!(action = intent.describe(), "turn validated");
    Ok(ValidatedTurn { turn, intent })
}
