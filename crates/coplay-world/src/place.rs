//! A named location node with items, exits, and traits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node in the world graph.
///
/// Exits map a direction key to a target place name. The target is not
/// required to exist: dangling exits are legal and are how new places
/// get discovered later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Items lying here, in arrival order. Duplicates are permitted.
    pub items: Vec<String>,
    /// Outgoing exits: direction -> target place name.
    pub exits: BTreeMap<String, String>,
    /// Free-form key/value traits set via the patch grammar.
    pub traits: BTreeMap<String, String>,
}

impl Place {
    /// Create an empty place.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            exits: BTreeMap::new(),
            traits: BTreeMap::new(),
        }
    }

    /// Builder: seed the place with items.
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Builder: add one exit.
    #[must_use]
    pub fn with_exit(mut self, dir: impl Into<String>, to: impl Into<String>) -> Self {
        self.exits.insert(dir.into(), to.into());
        self
    }

    /// Remove the first occurrence of `item`, returning it if present.
    ///
    /// Case-sensitive exact match; the caller owns putting the item
    /// into exactly one inventory afterwards.
    pub fn remove_item(&mut self, item: &str) -> Option<String> {
        let index = self.items.iter().position(|i| i == item)?;
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_seeds_items_and_exits() {
        let place = Place::new()
            .with_items(["Key", "Note"])
            .with_exit("north", "Hallway");
        assert_eq!(place.items, vec!["Key", "Note"]);
        assert_eq!(place.exits.get("north").map(String::as_str), Some("Hallway"));
    }

    #[test]
    fn remove_item_takes_first_occurrence_only() {
        let mut place = Place::new().with_items(["Coin", "Coin"]);
        assert_eq!(place.remove_item("Coin").as_deref(), Some("Coin"));
        assert_eq!(place.items, vec!["Coin"]);
        assert!(place.remove_item("Key").is_none());
    }
}
