//! Graph strategy: heuristic keyword matching over free verb phrases.
//!
//! The phrase is lowercased once and matched against keyword families in
//! a fixed priority order: movement, look, take, guarded open, then a
//! generic no-effect fallback. The first family with a keyword hit wins,
//! even if a later family would have matched more specifically. This is
//! a deliberately loose command resolver, not a parser; ambiguous
//! phrasing resolves to whichever family's keyword appears first in the
//! priority order.

use tracing::debug;

use crate::world::{Actor, WorldModel};

/// Movement verbs.
const MOVE_KEYWORDS: &[&str] = &["go", "walk", "head", "move"];

/// Recognized direction tokens, matched inside the phrase.
const DIRECTIONS: &[&str] = &["north", "south", "east", "west", "up", "down"];

/// Look/observe verbs.
const LOOK_KEYWORDS: &[&str] = &["look", "observe", "examine", "survey"];

/// Take/pick-up verbs.
const TAKE_KEYWORDS: &[&str] = &["take", "pick", "grab"];

/// Resolve one verb phrase for one actor.
pub fn resolve(world: &mut WorldModel, actor: Actor, phrase: &str) -> String {
    let name = actor.name();
    let Some(here) = world.location(actor).map(ToOwned::to_owned) else {
        return format!("{name} cannot act here.");
    };
    let lowered = phrase.to_lowercase();

    if contains_any(&lowered, MOVE_KEYWORDS) {
        return resolve_move(world, actor, &here, &lowered);
    }
    if contains_any(&lowered, LOOK_KEYWORDS) {
        let items = world
            .place(&here)
            .map(|p| p.items.clone())
            .unwrap_or_default();
        return if items.is_empty() {
            "You see nothing special.".to_owned()
        } else {
            format!("You see {}.", items.join(", "))
        };
    }
    if contains_any(&lowered, TAKE_KEYWORDS) {
        return resolve_take(world, actor, &here, &lowered);
    }
    if lowered.contains("open") && lowered.contains("door") {
        return resolve_open_door(world, actor, &here);
    }

    debug!(actor = name, phrase, "no keyword family matched");
    "The action has no obvious effect.".to_owned()
}

/// Movement family: find a direction token, follow the exit if present.
fn resolve_move(world: &mut WorldModel, actor: Actor, here: &str, lowered: &str) -> String {
    let name = actor.name();
    let direction = DIRECTIONS
        .iter()
        .find(|d| contains_word(lowered, d))
        .copied();
    let target = direction.and_then(|d| {
        world
            .place(here)
            .and_then(|p| p.exits.get(d))
            .cloned()
    });
    match (direction, target) {
        (Some(dir), Some(to)) => {
            // Exits may dangle; a dangling target becomes a real (empty)
            // place the moment someone walks through.
            if !world.contains_place(&to) {
                let _ = world.create_place_unconnected(&to);
            }
            match world.move_actor(actor, &to) {
                Ok(()) => format!("{name} goes {dir} to {to}."),
                Err(e) => {
                    debug!(actor = name, error = %e, "move rejected");
                    "There is no exit that way.".to_owned()
                }
            }
        }
        _ => "There is no exit that way.".to_owned(),
    }
}

/// Take family: scan the phrase for a known item lying here.
fn resolve_take(world: &mut WorldModel, actor: Actor, here: &str, lowered: &str) -> String {
    let name = actor.name();
    let candidate = world
        .place(here)
        .map(|p| p.items.clone())
        .unwrap_or_default()
        .into_iter()
        .find(|item| lowered.contains(&item.to_lowercase()));
    match candidate {
        Some(item) => match world.take_item_here(actor, &item) {
            Ok(()) => format!("{name} takes {item}."),
            Err(e) => {
                debug!(actor = name, error = %e, "take rejected");
                "Nothing to pick up here.".to_owned()
            }
        },
        None => "Nothing to pick up here.".to_owned(),
    }
}

/// Guarded open family: needs the key item in inventory and the right place.
fn resolve_open_door(world: &mut WorldModel, actor: Actor, here: &str) -> String {
    let name = actor.name();
    let Some(rule) = world.door_rule().cloned() else {
        return "There is no door to open here.".to_owned();
    };
    if here == rule.required_place && world.has_item(actor, &rule.required_item) {
        match world.add_exit(&rule.required_place, &rule.dir, &rule.to) {
            Ok(()) => format!(
                "{name} opens the door with the {}. {} is now reachable to the {}.",
                rule.required_item, rule.to, rule.dir
            ),
            Err(e) => {
                debug!(actor = name, error = %e, "open rejected");
                "The door will not budge.".to_owned()
            }
        }
    } else {
        format!(
            "The door is locked. A {} would help.",
            rule.required_item
        )
    }
}

/// True if any keyword occurs as a substring of the phrase.
fn contains_any(phrase: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_word(phrase, k))
}

/// Substring containment; loose by documented policy.
fn contains_word(phrase: &str, word: &str) -> bool {
    phrase.contains(word)
}
