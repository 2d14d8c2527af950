//! Shared type definitions for the coplay turn protocol.
//!
//! This crate is the single source of truth for the wire contract between
//! the turn engine and the language-model backend, and for the read-only
//! views handed to the presentation layer.
//!
//! # Modules
//!
//! - [`actions`] -- The closed grid action enumeration and validated action intents
//! - [`chat`] -- Role-tagged chat messages exchanged with the model backend
//! - [`turn`] -- The fail-closed turn schema and the whitelisted world-patch grammar
//! - [`snapshot`] -- World snapshots and per-turn reports for the presentation layer

pub mod actions;
pub mod chat;
pub mod snapshot;
pub mod turn;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionIntent, GridAction, HumanIntent};
pub use chat::{ChatMessage, Role};
pub use snapshot::{GridView, MemoryView, SceneView, TurnReport, WorldSnapshot};
pub use turn::{
    CreatePlace, ItemSpawn, ModifyRule, OpenExit, SetGoal, SetTrait, Turn, WorldPatch,
};
