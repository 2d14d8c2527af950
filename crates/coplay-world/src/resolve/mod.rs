//! Action resolution: validated intents become world mutations.
//!
//! Two strategies exist, one per world variant:
//!
//! - [`grid`] resolves the closed token set against the grid board,
//! - [`graph`] resolves free verb phrases against the place graph via
//!   keyword-family matching.
//!
//! Resolution never fails. An intent that does not fit the world (a
//! grid token in a graph session, an unknown phrase, a mismatched
//! variant from the presentation layer) resolves to a descriptive
//! no-effect reaction string instead of an error.

pub mod graph;
pub mod grid;

use coplay_types::ActionIntent;

use crate::world::{Actor, WorldModel};

/// Resolve a validated intent for one actor, returning the world's reaction.
pub fn resolve(world: &mut WorldModel, actor: Actor, intent: &ActionIntent) -> String {
    match intent {
        ActionIntent::Grid(action) => grid::resolve(world, actor, *action),
        ActionIntent::Phrase(phrase) => graph::resolve(world, actor, phrase),
    }
}
