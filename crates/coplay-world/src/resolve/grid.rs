//! Grid strategy: the closed action token set on a bounded board.
//!
//! Movement is a unit step clamped independently per axis; out-of-bounds
//! moves are silently clamped, never rejected. `interact` performs an
//! item-pickup check at the actor's cell. `wait` does nothing.

use coplay_types::GridAction;
use tracing::debug;

use crate::world::{Actor, WorldModel};

/// Resolve one grid action for one actor.
///
/// Only the acting actor's own state changes; in a shared round the
/// human's action is resolved by a separate call before the agent's.
pub fn resolve(world: &mut WorldModel, actor: Actor, action: GridAction) -> String {
    let name = actor.name();
    match action {
        GridAction::MoveUp
        | GridAction::MoveDown
        | GridAction::MoveLeft
        | GridAction::MoveRight
        | GridAction::Wait => match world.grid_step(actor, action) {
            Ok((x, y)) => {
                debug!(actor = name, action = action.as_str(), x, y, "grid step");
                format!("{name} {} -> ({x}, {y})", action.as_str())
            }
            Err(e) => {
                debug!(actor = name, error = %e, "grid action rejected");
                format!("{name} cannot act here.")
            }
        },
        GridAction::Interact => match world.grid_pickup(actor) {
            Ok(Some(item)) => format!("{name} picks up {item}."),
            Ok(None) => format!("{name} interacts, but nothing happens."),
            Err(e) => {
                debug!(actor = name, error = %e, "grid action rejected");
                format!("{name} cannot act here.")
            }
        },
    }
}
