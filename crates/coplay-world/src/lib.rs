//! World state and mutation for the coplay turn protocol.
//!
//! This crate owns everything that can change during a session: the
//! [`WorldModel`] with its places, positions, inventories, identity,
//! notes, and memory journals; the whitelisted additive [`patch`]
//! engine; and the [`resolve`] module mapping validated action intents
//! onto world mutations.
//!
//! # Modules
//!
//! - [`place`] -- A named location node with items, exits, and traits
//! - [`memory`] -- The five append-only memory journals
//! - [`world`] -- The mutable world model and its invariant-preserving primitives
//! - [`starting`] -- Canonical starting worlds for both variants
//! - [`patch`] -- The whitelisted world-patch engine
//! - [`resolve`] -- Grid and graph action resolution strategies

pub mod error;
pub mod memory;
pub mod patch;
pub mod place;
pub mod resolve;
pub mod starting;
pub mod world;

pub use error::WorldError;
pub use memory::{MemoryCategory, MemoryJournal};
pub use place::Place;
pub use world::{Actor, DoorRule, GridBoard, WorldModel};
