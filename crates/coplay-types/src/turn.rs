//! The turn wire schema and the whitelisted world-patch grammar.
//!
//! One [`Turn`] is deserialized per model response. The schema fails
//! closed: unknown keys at the top level or inside the patch grammar
//! reject the whole turn (`deny_unknown_fields` everywhere). Absent
//! fields take documented defaults; a field present with the wrong
//! shape is a validation failure, never a partial acceptance.

use serde::{Deserialize, Serialize};

/// The agent's validated intent for one round.
///
/// Constructed once per turn from model output and discarded after its
/// effects land in the world model and conversation history. The `action`
/// field carries the raw wire token; grid mode narrows it against the
/// closed enumeration during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    /// Short inner monologue, displayed but never applied to the world.
    #[serde(default)]
    pub thoughts: String,
    /// The action token or verb phrase. Defaults to `wait`.
    #[serde(default = "default_action")]
    pub action: String,
    /// What the agent says aloud this round.
    #[serde(default)]
    pub speech: String,
    /// Meta-feedback on the game design, displayed only.
    #[serde(default)]
    pub design_feedback: String,
    /// Free text merged into the agent's append-only identity.
    #[serde(default)]
    pub self_update: Option<String>,
    /// Bounded, additive world changes proposed by the agent.
    #[serde(default)]
    pub world_patch: Option<WorldPatch>,
    /// What the agent perceives this round, displayed only.
    #[serde(default)]
    pub perceptions: Option<String>,
    /// One experience entry for the memory journal.
    #[serde(default)]
    pub experience: Option<String>,
    /// One insight entry for the memory journal.
    #[serde(default)]
    pub insights: Option<String>,
    /// One conclusion entry for the memory journal.
    #[serde(default)]
    pub conclusions: Option<String>,
    /// One wish entry for the memory journal.
    #[serde(default)]
    pub wishes: Option<String>,
    /// One fear entry for the memory journal.
    #[serde(default)]
    pub fears: Option<String>,
}

/// Default action when the model omits the field.
fn default_action() -> String {
    "wait".to_owned()
}

impl Default for Turn {
    fn default() -> Self {
        Self {
            thoughts: String::new(),
            action: default_action(),
            speech: String::new(),
            design_feedback: String::new(),
            self_update: None,
            world_patch: None,
            perceptions: None,
            experience: None,
            insights: None,
            conclusions: None,
            wishes: None,
            fears: None,
        }
    }
}

impl Turn {
    /// Iterate the non-empty memory entries as `(category name, text)` pairs.
    ///
    /// At most one entry per category, matching the journal's
    /// one-entry-per-turn policy.
    pub fn memory_entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("experience", self.experience.as_deref()),
            ("insights", self.insights.as_deref()),
            ("conclusions", self.conclusions.as_deref()),
            ("wishes", self.wishes.as_deref()),
            ("fears", self.fears.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, text)| match text {
            Some(t) if !t.trim().is_empty() => Some((name, t)),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// World patch grammar
// ---------------------------------------------------------------------------

/// A bounded, additive, whitelisted proposal to alter the world graph.
///
/// Every sub-operation is independently optional and independently
/// validated before effect. The grammar has no delete primitive: a
/// misbehaving model response can enlarge the world but never destroy
/// existing state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldPatch {
    /// Add or overwrite an exit on an existing place.
    #[serde(default)]
    pub open_exit: Option<OpenExit>,
    /// Append an item to an existing place.
    #[serde(default)]
    pub add_item: Option<ItemSpawn>,
    /// Append a goal line to the free-text notes.
    #[serde(default)]
    pub set_goal: Option<SetGoal>,
    /// Create a new place connected from an existing one.
    #[serde(default)]
    pub create_place: Option<CreatePlace>,
    /// Append an item to an existing place (alias of `add_item`).
    #[serde(default)]
    pub create_item: Option<ItemSpawn>,
    /// Set a trait on the agent, a place, or the world rules.
    #[serde(default)]
    pub set_trait: Option<SetTrait>,
    /// Append a world-rule note to the free-text notes.
    #[serde(default)]
    pub modify_rule: Option<ModifyRule>,
}

impl WorldPatch {
    /// True when no sub-operation is present.
    pub const fn is_empty(&self) -> bool {
        self.open_exit.is_none()
            && self.add_item.is_none()
            && self.set_goal.is_none()
            && self.create_place.is_none()
            && self.create_item.is_none()
            && self.set_trait.is_none()
            && self.modify_rule.is_none()
    }
}

/// Add or overwrite `places[from].exits[dir] = to`.
///
/// `from` must already exist; `to` may dangle — dangling exits are how
/// new places get discovered later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenExit {
    /// The place the exit departs from. Must exist.
    pub from: String,
    /// The direction key for the new exit.
    pub dir: String,
    /// The target place name. May not exist yet.
    pub to: String,
}

/// Append `item` to the item list of the place `at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpawn {
    /// The place receiving the item. Must exist.
    pub at: String,
    /// The item name. Duplicates are permitted.
    pub item: String,
}

/// Append a goal line to the free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetGoal {
    /// The goal text, e.g. "Find the flower".
    pub text: String,
}

/// Create an empty place and connect it from an existing one.
///
/// Takes effect only if `name` does not already exist and
/// `connect_from` does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePlace {
    /// The new place name. Must not exist yet.
    pub name: String,
    /// The existing place to connect from.
    pub connect_from: String,
    /// The direction of the connecting exit from `connect_from`.
    pub dir: String,
}

/// Set a key/value trait on a target.
///
/// `target == "ava"` merges into the agent identity; an existing place
/// name sets an entry in that place's trait map; `target == "world"`
/// appends a rule note; anything else is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetTrait {
    /// `"ava"`, `"world"`, or a place name.
    pub target: String,
    /// The trait key.
    pub key: String,
    /// The trait value.
    pub value: String,
}

/// Append a world-rule note to the free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifyRule {
    /// The rule text.
    pub text: String,
}
