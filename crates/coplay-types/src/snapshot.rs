//! Read-only views handed to the presentation layer after each turn.
//!
//! The engine never exposes the mutable world model directly. After a
//! completed (or failed) turn the presentation layer receives a
//! [`WorldSnapshot`] plus a [`TurnReport`] with the last turn's display
//! fields. Rendering and input polling live entirely outside the engine.

use serde::{Deserialize, Serialize};

/// A read-only copy of the world state for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// The variant-specific scene: grid coordinates or the current place.
    pub scene: SceneView,
    /// The agent's inventory, in acquisition order.
    pub inventory: Vec<String>,
    /// The human's inventory, if a human actor shares the world.
    pub human_inventory: Option<Vec<String>>,
    /// The agent's append-only self-description.
    pub identity: String,
    /// The append-only free-text scratchpad (goals, rules).
    pub notes: String,
    /// The five append-only memory journals.
    pub memory: MemoryView,
}

/// The variant-specific part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneView {
    /// A bounded grid world.
    Grid(GridView),
    /// A graph world of named places.
    Graph {
        /// The agent's current place.
        location: String,
        /// Items lying at the current place.
        items_here: Vec<String>,
        /// Exit directions leading out of the current place.
        exits_here: Vec<String>,
    },
}

/// Grid-world positions and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    /// Board width in cells.
    pub width: u32,
    /// Board height in cells.
    pub height: u32,
    /// The agent's `(x, y)` cell.
    pub agent: (u32, u32),
    /// The human's `(x, y)` cell, if a human actor shares the world.
    pub human: Option<(u32, u32)>,
}

/// The five memory journals, copied for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryView {
    /// What happened to the agent.
    pub experience: Vec<String>,
    /// What the agent realized.
    pub insights: Vec<String>,
    /// What the agent decided follows.
    pub conclusions: Vec<String>,
    /// What the agent wants.
    pub wishes: Vec<String>,
    /// What the agent dreads.
    pub fears: Vec<String>,
}

/// The display fields produced by one completed turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The 1-based turn number that just completed.
    pub turn: u32,
    /// The agent's inner monologue.
    pub thoughts: String,
    /// What the agent said aloud.
    pub speech: String,
    /// The agent's meta-feedback on the game design.
    pub design_feedback: String,
    /// What the agent reported perceiving.
    pub perceptions: String,
    /// The world's reaction to the agent's action.
    pub reaction: String,
    /// The world's reaction to the human's action, if any, this round.
    pub human_reaction: Option<String>,
    /// Human-readable effects of the applied world patch.
    pub patch_effects: Vec<String>,
}
