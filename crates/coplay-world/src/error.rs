//! Error types for the `coplay-world` crate.
//!
//! Only invariant-protecting primitives are fallible. Patch
//! sub-operations and action resolution never surface these errors to
//! the caller; they degrade to per-operation no-ops or descriptive
//! reaction strings instead.

/// Errors that can occur during world-model operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A place name does not exist in the world graph.
    #[error("unknown place: {0}")]
    UnknownPlace(String),

    /// A place with this name already exists in the world graph.
    #[error("place already exists: {0}")]
    PlaceExists(String),

    /// An item is not present where the operation expects it.
    #[error("item {item:?} is not at {place:?}")]
    ItemNotPresent {
        /// The item that was looked for.
        item: String,
        /// The place that was searched.
        place: String,
    },

    /// The operation needs a grid world but this session runs a graph world.
    #[error("world has no grid board")]
    NotAGridWorld,

    /// The operation needs a graph world but this session runs a grid world.
    #[error("world has no place graph location for this actor")]
    NoLocation,

    /// The actor does not participate in this session.
    #[error("actor is not part of this world")]
    UnknownActor,
}
