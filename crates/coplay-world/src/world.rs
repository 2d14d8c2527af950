//! The mutable world model and its invariant-preserving primitives.
//!
//! One [`WorldModel`] is owned by one session. Mutation happens only on
//! the thread driving the turn engine, only through the methods here.
//! The invariants the methods protect:
//!
//! - an actor's location always names an existing place,
//! - an item removed from a place lands in exactly one inventory,
//! - identity, notes, and memory are append-only,
//! - grid coordinates always stay inside the board.

use std::collections::BTreeMap;

use coplay_types::{GridAction, GridView, SceneView, WorldSnapshot};

use crate::error::WorldError;
use crate::memory::{MemoryCategory, MemoryJournal};
use crate::place::Place;

/// One of the (at most two) entities acting in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Actor {
    /// The AI-driven agent.
    Agent,
    /// The human-driven actor, present only in shared-world variants.
    Human,
}

impl Actor {
    /// Display name used in reaction strings and prompts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Agent => "Ava",
            Self::Human => "Ben",
        }
    }
}

/// The guarded "open door" rule of the graph variant.
///
/// The open family succeeds only when the actor holds `required_item`
/// and stands at `required_place`; success adds the `dir -> to` exit to
/// that place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorRule {
    /// The key item that must be in the actor's inventory.
    pub required_item: String,
    /// The place the actor must stand at.
    pub required_place: String,
    /// The direction of the exit the door opens.
    pub dir: String,
    /// The place the exit leads to.
    pub to: String,
}

// ---------------------------------------------------------------------------
// Grid board
// ---------------------------------------------------------------------------

/// A bounded grid with per-actor positions and per-cell items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBoard {
    width: u32,
    height: u32,
    positions: BTreeMap<Actor, (u32, u32)>,
    items: BTreeMap<(u32, u32), String>,
}

impl GridBoard {
    /// Create an empty board. Dimensions of zero are raised to one cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            positions: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    /// Board width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Put an actor on the board, clamping the position inside it.
    pub fn place_actor(&mut self, actor: Actor, pos: (u32, u32)) {
        self.positions.insert(actor, self.clamp(pos));
    }

    /// An actor's current cell, if the actor is on the board.
    pub fn position(&self, actor: Actor) -> Option<(u32, u32)> {
        self.positions.get(&actor).copied()
    }

    /// Apply one action's movement delta, clamped per axis to the board.
    ///
    /// Out-of-bounds moves are silently clamped, never rejected.
    pub fn step(&mut self, actor: Actor, action: GridAction) -> Result<(u32, u32), WorldError> {
        let (x, y) = self.position(actor).ok_or(WorldError::UnknownActor)?;
        let (dx, dy) = action.delta();
        let nx = i64::from(x)
            .saturating_add(dx)
            .clamp(0, i64::from(self.width).saturating_sub(1));
        let ny = i64::from(y)
            .saturating_add(dy)
            .clamp(0, i64::from(self.height).saturating_sub(1));
        let clamped = (
            u32::try_from(nx).unwrap_or(0),
            u32::try_from(ny).unwrap_or(0),
        );
        self.positions.insert(actor, clamped);
        Ok(clamped)
    }

    /// Drop an item on a cell, clamped inside the board.
    pub fn put_item(&mut self, pos: (u32, u32), item: impl Into<String>) {
        self.items.insert(self.clamp(pos), item.into());
    }

    /// The item lying on a cell, if any.
    pub fn item_at(&self, pos: (u32, u32)) -> Option<&str> {
        self.items.get(&pos).map(String::as_str)
    }

    /// Remove and return the item on a cell.
    pub fn take_item_at(&mut self, pos: (u32, u32)) -> Option<String> {
        self.items.remove(&pos)
    }

    fn clamp(&self, (x, y): (u32, u32)) -> (u32, u32) {
        (
            x.min(self.width.saturating_sub(1)),
            y.min(self.height.saturating_sub(1)),
        )
    }
}

// ---------------------------------------------------------------------------
// World model
// ---------------------------------------------------------------------------

/// The complete mutable state of one session's world.
///
/// Grid variants carry a [`GridBoard`]; graph variants carry per-actor
/// locations into the place graph. The place graph, inventories,
/// identity, notes, and memory journals exist in both variants (a grid
/// session simply starts with an empty graph, which patches may grow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldModel {
    grid: Option<GridBoard>,
    places: BTreeMap<String, Place>,
    locations: BTreeMap<Actor, String>,
    inventories: BTreeMap<Actor, Vec<String>>,
    identity: String,
    notes: String,
    memory: MemoryJournal,
    door_rule: Option<DoorRule>,
}

impl WorldModel {
    /// Create a graph world from a place map and the agent's start place.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPlace`] if `start` is not a key of
    /// `places`.
    pub fn graph(places: BTreeMap<String, Place>, start: &str) -> Result<Self, WorldError> {
        if !places.contains_key(start) {
            return Err(WorldError::UnknownPlace(start.to_owned()));
        }
        let mut locations = BTreeMap::new();
        locations.insert(Actor::Agent, start.to_owned());
        let mut inventories = BTreeMap::new();
        inventories.insert(Actor::Agent, Vec::new());
        Ok(Self {
            grid: None,
            places,
            locations,
            inventories,
            identity: String::new(),
            notes: String::new(),
            memory: MemoryJournal::new(),
            door_rule: None,
        })
    }

    /// Create a grid world with the agent centered on the board.
    ///
    /// When `with_human` is set, the human actor starts in the top-left
    /// corner and gets an independent inventory.
    pub fn grid(width: u32, height: u32, with_human: bool) -> Self {
        let mut board = GridBoard::new(width, height);
        board.place_actor(Actor::Agent, (board.width() / 2, board.height() / 2));
        let mut inventories = BTreeMap::new();
        inventories.insert(Actor::Agent, Vec::new());
        if with_human {
            board.place_actor(Actor::Human, (0, 0));
            inventories.insert(Actor::Human, Vec::new());
        }
        Self {
            grid: Some(board),
            places: BTreeMap::new(),
            locations: BTreeMap::new(),
            inventories,
            identity: String::new(),
            notes: String::new(),
            memory: MemoryJournal::new(),
            door_rule: None,
        }
    }

    /// Builder: install the guarded door rule for the graph resolver.
    #[must_use]
    pub fn with_door_rule(mut self, rule: DoorRule) -> Self {
        self.door_rule = Some(rule);
        self
    }

    /// Builder: seed the agent's identity text.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// True when a human actor participates in this session.
    pub fn has_human(&self) -> bool {
        self.inventories.contains_key(&Actor::Human)
    }

    // -------------------------------------------------------------------
    // Place graph
    // -------------------------------------------------------------------

    /// Look up a place by name.
    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    /// True if the place exists.
    pub fn contains_place(&self, name: &str) -> bool {
        self.places.contains_key(name)
    }

    /// The number of places in the graph.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Iterate all places by name.
    pub fn places(&self) -> impl Iterator<Item = (&String, &Place)> {
        self.places.iter()
    }

    /// Add or overwrite an exit on an existing place.
    ///
    /// The target may dangle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPlace`] if `from` does not exist.
    pub fn add_exit(&mut self, from: &str, dir: &str, to: &str) -> Result<(), WorldError> {
        let place = self
            .places
            .get_mut(from)
            .ok_or_else(|| WorldError::UnknownPlace(from.to_owned()))?;
        place.exits.insert(dir.to_owned(), to.to_owned());
        Ok(())
    }

    /// Append an item to an existing place. Duplicates are permitted.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPlace`] if `at` does not exist.
    pub fn add_item(&mut self, at: &str, item: &str) -> Result<(), WorldError> {
        let place = self
            .places
            .get_mut(at)
            .ok_or_else(|| WorldError::UnknownPlace(at.to_owned()))?;
        place.items.push(item.to_owned());
        Ok(())
    }

    /// Create an empty place connected from an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PlaceExists`] if `name` is already taken,
    /// [`WorldError::UnknownPlace`] if `connect_from` does not exist.
    pub fn create_place(
        &mut self,
        name: &str,
        connect_from: &str,
        dir: &str,
    ) -> Result<(), WorldError> {
        if self.places.contains_key(name) {
            return Err(WorldError::PlaceExists(name.to_owned()));
        }
        self.add_exit(connect_from, dir, name)?;
        self.places.insert(name.to_owned(), Place::new());
        Ok(())
    }

    /// Create an empty place with no connecting exit.
    ///
    /// Used when an actor walks through a dangling exit: the target
    /// materializes as an empty place on first visit, which keeps the
    /// location invariant intact without forbidding dangling exits.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PlaceExists`] if `name` is already taken.
    pub fn create_place_unconnected(&mut self, name: &str) -> Result<(), WorldError> {
        if self.places.contains_key(name) {
            return Err(WorldError::PlaceExists(name.to_owned()));
        }
        self.places.insert(name.to_owned(), Place::new());
        Ok(())
    }

    /// Set a key/value trait on an existing place.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPlace`] if the place does not exist.
    pub fn set_place_trait(
        &mut self,
        place: &str,
        key: &str,
        value: &str,
    ) -> Result<(), WorldError> {
        let place = self
            .places
            .get_mut(place)
            .ok_or_else(|| WorldError::UnknownPlace(place.to_owned()))?;
        place.traits.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    // -------------------------------------------------------------------
    // Actors: locations, inventories, item transfer
    // -------------------------------------------------------------------

    /// An actor's current place in a graph world.
    pub fn location(&self, actor: Actor) -> Option<&str> {
        self.locations.get(&actor).map(String::as_str)
    }

    /// Move an actor to another place.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPlace`] if the target does not
    /// exist: the location invariant always points at a real place,
    /// even though exits may dangle.
    pub fn move_actor(&mut self, actor: Actor, to: &str) -> Result<(), WorldError> {
        if !self.places.contains_key(to) {
            return Err(WorldError::UnknownPlace(to.to_owned()));
        }
        if !self.inventories.contains_key(&actor) {
            return Err(WorldError::UnknownActor);
        }
        self.locations.insert(actor, to.to_owned());
        Ok(())
    }

    /// An actor's inventory, in acquisition order.
    pub fn inventory(&self, actor: Actor) -> &[String] {
        self.inventories.get(&actor).map_or(&[], Vec::as_slice)
    }

    /// True if the actor holds the item.
    pub fn has_item(&self, actor: Actor, item: &str) -> bool {
        self.inventory(actor).iter().any(|i| i == item)
    }

    /// Move an item from the actor's current place into its inventory.
    ///
    /// The transfer is atomic: the item leaves the place only if it
    /// also enters the inventory, so it is never duplicated or lost.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoLocation`] if the actor has no graph
    /// location, [`WorldError::ItemNotPresent`] if the item is not here.
    pub fn take_item_here(&mut self, actor: Actor, item: &str) -> Result<(), WorldError> {
        let here = self
            .locations
            .get(&actor)
            .cloned()
            .ok_or(WorldError::NoLocation)?;
        let taken = self
            .places
            .get_mut(&here)
            .and_then(|place| place.remove_item(item))
            .ok_or_else(|| WorldError::ItemNotPresent {
                item: item.to_owned(),
                place: here.clone(),
            })?;
        self.inventories.entry(actor).or_default().push(taken);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Grid board
    // -------------------------------------------------------------------

    /// The grid board, if this is a grid world.
    pub const fn board(&self) -> Option<&GridBoard> {
        self.grid.as_ref()
    }

    /// Mutable access to the grid board, for seeding items and positions.
    ///
    /// The board's own methods keep every coordinate clamped, so this
    /// cannot break the bounds invariant.
    pub fn board_mut(&mut self) -> Option<&mut GridBoard> {
        self.grid.as_mut()
    }

    /// Apply one grid action's movement to an actor, clamped per axis.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotAGridWorld`] in a graph session,
    /// [`WorldError::UnknownActor`] if the actor is not on the board.
    pub fn grid_step(&mut self, actor: Actor, action: GridAction) -> Result<(u32, u32), WorldError> {
        self.grid
            .as_mut()
            .ok_or(WorldError::NotAGridWorld)?
            .step(actor, action)
    }

    /// Pick up the item at the actor's current cell, if any.
    ///
    /// First come, first served: once taken, the cell is empty for the
    /// other actor in the same round.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotAGridWorld`] in a graph session,
    /// [`WorldError::UnknownActor`] if the actor is not on the board.
    pub fn grid_pickup(&mut self, actor: Actor) -> Result<Option<String>, WorldError> {
        let board = self.grid.as_mut().ok_or(WorldError::NotAGridWorld)?;
        let pos = board.position(actor).ok_or(WorldError::UnknownActor)?;
        let Some(item) = board.take_item_at(pos) else {
            return Ok(None);
        };
        self.inventories.entry(actor).or_default().push(item.clone());
        Ok(Some(item))
    }

    // -------------------------------------------------------------------
    // Identity, notes, memory (append-only)
    // -------------------------------------------------------------------

    /// The agent's append-only self-description.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Concatenate a new fact onto the identity. Nothing is ever deleted.
    pub fn append_identity(&mut self, text: &str) {
        append_joined(&mut self.identity, text);
    }

    /// The append-only free-text scratchpad.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Concatenate a line onto the notes. Nothing is ever deleted.
    pub fn append_note(&mut self, text: &str) {
        append_joined(&mut self.notes, text);
    }

    /// The memory journals.
    pub const fn memory(&self) -> &MemoryJournal {
        &self.memory
    }

    /// Append one entry to a memory category.
    pub fn record_memory(&mut self, category: MemoryCategory, text: impl Into<String>) {
        self.memory.append(category, text);
    }

    /// The guarded door rule, if this world has one.
    pub const fn door_rule(&self) -> Option<&DoorRule> {
        self.door_rule.as_ref()
    }

    // -------------------------------------------------------------------
    // Presentation
    // -------------------------------------------------------------------

    /// A read-only copy of the world for the presentation layer.
    pub fn snapshot(&self) -> WorldSnapshot {
        let scene = self.grid.as_ref().map_or_else(
            || {
                let location = self
                    .location(Actor::Agent)
                    .unwrap_or_default()
                    .to_owned();
                let here = self.places.get(&location);
                SceneView::Graph {
                    items_here: here.map(|p| p.items.clone()).unwrap_or_default(),
                    exits_here: here
                        .map(|p| p.exits.keys().cloned().collect())
                        .unwrap_or_default(),
                    location,
                }
            },
            |board| {
                SceneView::Grid(GridView {
                    width: board.width(),
                    height: board.height(),
                    agent: board.position(Actor::Agent).unwrap_or((0, 0)),
                    human: board.position(Actor::Human),
                })
            },
        );
        WorldSnapshot {
            scene,
            inventory: self.inventory(Actor::Agent).to_vec(),
            human_inventory: self
                .has_human()
                .then(|| self.inventory(Actor::Human).to_vec()),
            identity: self.identity.clone(),
            notes: self.notes.clone(),
            memory: self.memory.view(),
        }
    }
}

/// Append `text` to an accumulating field with a `" | "` separator.
fn append_joined(field: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !field.is_empty() {
        field.push_str(" | ");
    }
    field.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_world() -> WorldModel {
        let mut places = BTreeMap::new();
        places.insert(
            "Room".to_owned(),
            Place::new().with_items(["Key"]).with_exit("north", "Hallway"),
        );
        places.insert(
            "Hallway".to_owned(),
            Place::new().with_exit("south", "Room"),
        );
        // Fallback keeps the helper panic-free; dependent assertions
        // fail loudly if construction ever breaks.
        WorldModel::graph(places, "Room").unwrap_or_else(|_| WorldModel::grid(1, 1, false))
    }

    #[test]
    fn graph_start_must_exist() {
        let result = WorldModel::graph(BTreeMap::new(), "Nowhere");
        assert_eq!(result.err(), Some(WorldError::UnknownPlace("Nowhere".to_owned())));
    }

    #[test]
    fn move_actor_rejects_dangling_target() {
        let mut world = two_room_world();
        assert!(world.add_exit("Hallway", "east", "Garden").is_ok());
        // The exit may dangle, but the location invariant may not.
        assert_eq!(
            world.move_actor(Actor::Agent, "Garden").err(),
            Some(WorldError::UnknownPlace("Garden".to_owned()))
        );
        assert_eq!(world.location(Actor::Agent), Some("Room"));
    }

    #[test]
    fn take_item_moves_exactly_once() {
        let mut world = two_room_world();
        assert!(world.take_item_here(Actor::Agent, "Key").is_ok());
        assert_eq!(world.inventory(Actor::Agent), ["Key"]);
        assert_eq!(
            world.place("Room").map(|p| p.items.clone()),
            Some(Vec::new())
        );
        // A second take finds nothing.
        assert!(world.take_item_here(Actor::Agent, "Key").is_err());
        assert_eq!(world.inventory(Actor::Agent), ["Key"]);
    }

    #[test]
    fn create_place_refuses_existing_name() {
        let mut world = two_room_world();
        assert_eq!(
            world.create_place("Room", "Hallway", "west").err(),
            Some(WorldError::PlaceExists("Room".to_owned()))
        );
        // Failed creation leaves no stray exit behind.
        assert!(
            world
                .place("Hallway")
                .is_some_and(|p| !p.exits.contains_key("west"))
        );
    }

    #[test]
    fn grid_clamps_on_every_edge() {
        let mut world = WorldModel::grid(3, 2, false);
        // Agent starts centered at (1, 1); walk far past every edge.
        for _ in 0..5 {
            let pos = world.grid_step(Actor::Agent, GridAction::MoveLeft);
            assert!(pos.is_ok());
        }
        assert_eq!(
            world.board().and_then(|b| b.position(Actor::Agent)),
            Some((0, 1))
        );
        for _ in 0..5 {
            let _ = world.grid_step(Actor::Agent, GridAction::MoveDown);
            let _ = world.grid_step(Actor::Agent, GridAction::MoveRight);
        }
        assert_eq!(
            world.board().and_then(|b| b.position(Actor::Agent)),
            Some((2, 1))
        );
    }

    #[test]
    fn grid_pickup_is_first_come_first_served() {
        let mut world = WorldModel::grid(5, 5, true);
        if let Some(board) = world.grid.as_mut() {
            board.place_actor(Actor::Agent, (1, 1));
            board.place_actor(Actor::Human, (1, 1));
            board.put_item((1, 1), "Coin");
        }
        assert_eq!(world.grid_pickup(Actor::Human).ok().flatten().as_deref(), Some("Coin"));
        assert_eq!(world.grid_pickup(Actor::Agent).ok().flatten(), None);
        assert_eq!(world.inventory(Actor::Human), ["Coin"]);
        assert!(world.inventory(Actor::Agent).is_empty());
    }

    #[test]
    fn identity_and_notes_are_append_only() {
        let mut world = two_room_world();
        world.append_identity("Ava, curious explorer");
        world.append_identity("likes gardens");
        assert_eq!(world.identity(), "Ava, curious explorer | likes gardens");
        world.append_note("Goal: find the flower");
        world.append_note("");
        assert_eq!(world.notes(), "Goal: find the flower");
    }

    #[test]
    fn snapshot_reflects_graph_scene() {
        let world = two_room_world();
        let snapshot = world.snapshot();
        assert_eq!(
            snapshot.scene,
            SceneView::Graph {
                location: "Room".to_owned(),
                items_here: vec!["Key".to_owned()],
                exits_here: vec!["north".to_owned()],
            }
        );
        assert!(snapshot.human_inventory.is_none());
    }
}
