//! Canonical starting worlds for both session variants.

use std::collections::BTreeMap;

use crate::place::Place;
use crate::world::{DoorRule, WorldModel};

/// Default identity for the agent in the graph variant.
const AGENT_IDENTITY: &str = "Ava, curious AI explorer";

/// The three-place text-adventure world.
///
/// Ava starts in the Room with a Key on the floor; the Hallway lies to
/// the north; the Garden (with a Flower) is locked behind the guarded
/// door until the Key is used in the Hallway.
pub fn lifesim_world() -> WorldModel {
    let mut places = BTreeMap::new();
    places.insert(
        "Room".to_owned(),
        Place::new().with_items(["Key"]).with_exit("north", "Hallway"),
    );
    places.insert(
        "Hallway".to_owned(),
        Place::new().with_exit("south", "Room"),
    );
    places.insert(
        "Garden".to_owned(),
        Place::new().with_items(["Flower"]).with_exit("west", "Hallway"),
    );
    // The map is statically valid, so the fallback never triggers.
    WorldModel::graph(places, "Room")
        .unwrap_or_else(|_| WorldModel::grid(1, 1, false))
        .with_identity(AGENT_IDENTITY)
        .with_door_rule(DoorRule {
            required_item: "Key".to_owned(),
            required_place: "Hallway".to_owned(),
            dir: "east".to_owned(),
            to: "Garden".to_owned(),
        })
}

/// A shared grid world: Ava centered, Ben in the top-left corner.
pub fn coplay_grid(width: u32, height: u32) -> WorldModel {
    WorldModel::grid(width, height, true).with_identity(AGENT_IDENTITY)
}

/// A solo grid world for the agent alone.
pub fn solo_grid(width: u32, height: u32) -> WorldModel {
    WorldModel::grid(width, height, false).with_identity(AGENT_IDENTITY)
}
