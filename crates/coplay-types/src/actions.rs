//! Action enumerations for both world variants.
//!
//! Grid worlds use the closed [`GridAction`] token set; graph worlds accept
//! a free-form verb phrase that the resolver matches heuristically. The
//! validated form of either is an [`ActionIntent`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grid actions (closed enumeration)
// ---------------------------------------------------------------------------

/// One discrete action token in a grid world.
///
/// This is the complete enumeration: any other token fails turn validation
/// in grid mode. Movement is a unit step; `Wait` and `Interact` leave the
/// coordinate unchanged, with `Interact` additionally triggering an
/// item-pickup check at the actor's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAction {
    /// Step one cell up (decreasing y).
    MoveUp,
    /// Step one cell down (increasing y).
    MoveDown,
    /// Step one cell left (decreasing x).
    MoveLeft,
    /// Step one cell right (increasing x).
    MoveRight,
    /// Do nothing this round.
    Wait,
    /// Interact with the current cell (picks up an item if one is here).
    Interact,
}

impl GridAction {
    /// Parse a wire token into a grid action.
    ///
    /// Matching is exact on the snake_case token set; anything else is
    /// `None` and must reject the whole turn in grid mode.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "move_up" => Some(Self::MoveUp),
            "move_down" => Some(Self::MoveDown),
            "move_left" => Some(Self::MoveLeft),
            "move_right" => Some(Self::MoveRight),
            "wait" => Some(Self::Wait),
            "interact" => Some(Self::Interact),
            _ => None,
        }
    }

    /// The wire token for this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::Wait => "wait",
            Self::Interact => "interact",
        }
    }

    /// Unit step for movement actions, as `(dx, dy)`.
    ///
    /// `Wait` and `Interact` return `(0, 0)`.
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::MoveUp => (0, -1),
            Self::MoveDown => (0, 1),
            Self::MoveLeft => (-1, 0),
            Self::MoveRight => (1, 0),
            Self::Wait | Self::Interact => (0, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated intents
// ---------------------------------------------------------------------------

/// A validated action, ready for the resolver.
///
/// Produced by the turn validator: grid mode yields `Grid`, graph mode
/// yields `Phrase` with the raw verb phrase preserved for keyword matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionIntent {
    /// A token from the closed grid enumeration.
    Grid(GridAction),
    /// A free-form verb phrase for the graph resolver.
    Phrase(String),
}

impl ActionIntent {
    /// Human-readable form for reaction strings and prompts.
    pub fn describe(&self) -> &str {
        match self {
            Self::Grid(action) => action.as_str(),
            Self::Phrase(text) => text.as_str(),
        }
    }
}

/// A discrete intent originating from the human via the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanIntent {
    /// The human acts in the world this round.
    Act(ActionIntent),
    /// A free-text hint appended to the conversation before the next model call.
    Hint(String),
    /// End the session, keeping all mutations already applied.
    Quit,
}
