//! The whitelisted world-patch engine.
//!
//! Applies the bounded "design" mutations an agent may propose about its
//! own world. Every sub-operation is validated independently; one whose
//! preconditions fail is a silent per-operation no-op and never fails
//! the enclosing turn. The grammar is additive only: there is no delete
//! primitive, so a misbehaving model can enlarge the world but never
//! destroy existing state.
//!
//! Unknown patch keys never reach this module; the turn validator
//! rejects them upstream.

use coplay_types::WorldPatch;
use tracing::debug;

use crate::world::WorldModel;

/// Apply a validated patch, returning human-readable effect descriptions.
///
/// The returned list contains one line per sub-operation that actually
/// took effect; skipped sub-operations leave no trace beyond a debug log.
pub fn apply(world: &mut WorldModel, patch: &WorldPatch) -> Vec<String> {
    let mut effects = Vec::new();

    if let Some(op) = &patch.open_exit {
        match world.add_exit(&op.from, &op.dir, &op.to) {
            Ok(()) => effects.push(format!(
                "New exit: {} leads {} to {}.",
                op.from, op.dir, op.to
            )),
            Err(e) => debug!(error = %e, from = %op.from, "open_exit skipped"),
        }
    }

    for (label, op) in [("add_item", &patch.add_item), ("create_item", &patch.create_item)] {
        if let Some(op) = op {
            match world.add_item(&op.at, &op.item) {
                Ok(()) => effects.push(format!("{} now lies at {}.", op.item, op.at)),
                Err(e) => debug!(error = %e, at = %op.at, "{label} skipped"),
            }
        }
    }

    if let Some(op) = &patch.create_place {
        match world.create_place(&op.name, &op.connect_from, &op.dir) {
            Ok(()) => effects.push(format!(
                "A new place appears: {}, reachable {} from {}.",
                op.name, op.dir, op.connect_from
            )),
            Err(e) => debug!(error = %e, name = %op.name, "create_place skipped"),
        }
    }

    if let Some(op) = &patch.set_goal {
        world.append_note(&format!("Goal: {}", op.text));
        effects.push(format!("Goal noted: {}.", op.text));
    }

    if let Some(op) = &patch.set_trait {
        if op.target == "ava" {
            world.append_identity(&format!("{}: {}", op.key, op.value));
            effects.push(format!("Ava takes on the trait {} = {}.", op.key, op.value));
        } else if op.target == "world" {
            world.append_note(&format!("Rule: {} = {}", op.key, op.value));
            effects.push(format!("World rule noted: {} = {}.", op.key, op.value));
        } else {
            match world.set_place_trait(&op.target, &op.key, &op.value) {
                Ok(()) => effects.push(format!(
                    "{} takes on the trait {} = {}.",
                    op.target, op.key, op.value
                )),
                Err(e) => debug!(error = %e, target = %op.target, "set_trait skipped"),
            }
        }
    }

    if let Some(op) = &patch.modify_rule {
        world.append_note(&format!("Rule: {}", op.text));
        effects.push(format!("World rule noted: {}.", op.text));
    }

    effects
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use coplay_types::{CreatePlace, ItemSpawn, ModifyRule, OpenExit, SetGoal, SetTrait};

    use super::*;
    use crate::place::Place;

    fn hallway_world() -> WorldModel {
        let mut places = BTreeMap::new();
        places.insert("Hallway".to_owned(), Place::new());
        WorldModel::graph(places, "Hallway").unwrap_or_else(|_| WorldModel::grid(1, 1, false))
    }

    #[test]
    fn open_exit_may_dangle() {
        let mut world = hallway_world();
        let patch = WorldPatch {
            open_exit: Some(OpenExit {
                from: "Hallway".to_owned(),
                dir: "east".to_owned(),
                to: "Garden".to_owned(),
            }),
            ..WorldPatch::default()
        };
        let effects = apply(&mut world, &patch);
        assert_eq!(effects.len(), 1);
        assert_eq!(
            world
                .place("Hallway")
                .and_then(|p| p.exits.get("east"))
                .map(String::as_str),
            Some("Garden")
        );
        // The target does not exist yet; that is legal.
        assert!(!world.contains_place("Garden"));
    }

    #[test]
    fn open_exit_from_unknown_place_is_noop() {
        let mut world = hallway_world();
        let patch = WorldPatch {
            open_exit: Some(OpenExit {
                from: "Attic".to_owned(),
                dir: "down".to_owned(),
                to: "Hallway".to_owned(),
            }),
            ..WorldPatch::default()
        };
        assert!(apply(&mut world, &patch).is_empty());
    }

    #[test]
    fn create_place_existing_name_leaves_world_unchanged() {
        let mut world = hallway_world();
        let before = world.clone();
        let patch = WorldPatch {
            create_place: Some(CreatePlace {
                name: "Hallway".to_owned(),
                connect_from: "Hallway".to_owned(),
                dir: "north".to_owned(),
            }),
            ..WorldPatch::default()
        };
        assert!(apply(&mut world, &patch).is_empty());
        assert_eq!(world, before);
    }

    #[test]
    fn other_sub_operations_still_apply_next_to_a_failing_one() {
        let mut world = hallway_world();
        let patch = WorldPatch {
            // Fails: place exists.
            create_place: Some(CreatePlace {
                name: "Hallway".to_owned(),
                connect_from: "Hallway".to_owned(),
                dir: "north".to_owned(),
            }),
            // Applies regardless.
            add_item: Some(ItemSpawn {
                at: "Hallway".to_owned(),
                item: "Lantern".to_owned(),
            }),
            set_goal: Some(SetGoal {
                text: "Explore".to_owned(),
            }),
            ..WorldPatch::default()
        };
        let effects = apply(&mut world, &patch);
        assert_eq!(effects.len(), 2);
        assert_eq!(
            world.place("Hallway").map(|p| p.items.clone()),
            Some(vec!["Lantern".to_owned()])
        );
        assert!(world.notes().contains("Goal: Explore"));
    }

    #[test]
    fn additivity_patches_never_shrink_the_world() {
        let mut world = hallway_world();
        let patches = [
            WorldPatch {
                create_place: Some(CreatePlace {
                    name: "Garden".to_owned(),
                    connect_from: "Hallway".to_owned(),
                    dir: "east".to_owned(),
                }),
                ..WorldPatch::default()
            },
            WorldPatch {
                add_item: Some(ItemSpawn {
                    at: "Garden".to_owned(),
                    item: "Flower".to_owned(),
                }),
                create_item: Some(ItemSpawn {
                    at: "Garden".to_owned(),
                    item: "Flower".to_owned(),
                }),
                ..WorldPatch::default()
            },
        ];
        let mut place_count = world.place_count();
        let mut item_count = 0usize;
        for patch in &patches {
            apply(&mut world, patch);
            let places_now = world.place_count();
            let items_now: usize = world.places().map(|(_, p)| p.items.len()).sum();
            assert!(places_now >= place_count, "places must never shrink");
            assert!(items_now >= item_count, "items must never vanish");
            place_count = places_now;
            item_count = items_now;
        }
        // Duplicates are permitted.
        assert_eq!(
            world.place("Garden").map(|p| p.items.len()),
            Some(2)
        );
    }

    #[test]
    fn set_trait_dispatches_on_target() {
        let mut world = hallway_world();
        let ava = WorldPatch {
            set_trait: Some(SetTrait {
                target: "ava".to_owned(),
                key: "mood".to_owned(),
                value: "curious".to_owned(),
            }),
            ..WorldPatch::default()
        };
        apply(&mut world, &ava);
        assert!(world.identity().contains("mood: curious"));

        let place = WorldPatch {
            set_trait: Some(SetTrait {
                target: "Hallway".to_owned(),
                key: "light".to_owned(),
                value: "dim".to_owned(),
            }),
            ..WorldPatch::default()
        };
        apply(&mut world, &place);
        assert_eq!(
            world
                .place("Hallway")
                .and_then(|p| p.traits.get("light"))
                .map(String::as_str),
            Some("dim")
        );

        let rules = WorldPatch {
            set_trait: Some(SetTrait {
                target: "world".to_owned(),
                key: "gravity".to_owned(),
                value: "low".to_owned(),
            }),
            ..WorldPatch::default()
        };
        apply(&mut world, &rules);
        assert!(world.notes().contains("Rule: gravity = low"));

        // Any other target is a no-op.
        let stranger = WorldPatch {
            set_trait: Some(SetTrait {
                target: "Ben".to_owned(),
                key: "mood".to_owned(),
                value: "tired".to_owned(),
            }),
            ..WorldPatch::default()
        };
        assert!(apply(&mut world, &stranger).is_empty());
    }

    #[test]
    fn modify_rule_appends_to_notes() {
        let mut world = hallway_world();
        let patch = WorldPatch {
            modify_rule: Some(ModifyRule {
                text: "Doors stay open once opened".to_owned(),
            }),
            ..WorldPatch::default()
        };
        let effects = apply(&mut world, &patch);
        assert_eq!(effects.len(), 1);
        assert!(world.notes().contains("Rule: Doors stay open once opened"));
    }
}
