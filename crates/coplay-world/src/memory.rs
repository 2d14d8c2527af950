//! The agent's five append-only memory journals.
//!
//! Each turn contributes at most one entry per category. Entries are
//! never rewritten, reordered, or evicted for the lifetime of the
//! session; unbounded growth is an accepted limitation of the
//! session-scoped process model.

use coplay_types::MemoryView;
use serde::{Deserialize, Serialize};

/// One of the five reflective memory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    /// What happened to the agent.
    Experience,
    /// What the agent realized.
    Insights,
    /// What the agent decided follows.
    Conclusions,
    /// What the agent wants.
    Wishes,
    /// What the agent dreads.
    Fears,
}

impl MemoryCategory {
    /// Parse a turn-schema field name into a category.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "experience" => Some(Self::Experience),
            "insights" => Some(Self::Insights),
            "conclusions" => Some(Self::Conclusions),
            "wishes" => Some(Self::Wishes),
            "fears" => Some(Self::Fears),
            _ => None,
        }
    }
}

/// The five append-only journals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryJournal {
    experience: Vec<String>,
    insights: Vec<String>,
    conclusions: Vec<String>,
    wishes: Vec<String>,
    fears: Vec<String>,
}

impl MemoryJournal {
    /// Create empty journals.
    pub const fn new() -> Self {
        Self {
            experience: Vec::new(),
            insights: Vec::new(),
            conclusions: Vec::new(),
            wishes: Vec::new(),
            fears: Vec::new(),
        }
    }

    /// Append one entry to a category journal.
    pub fn append(&mut self, category: MemoryCategory, text: impl Into<String>) {
        self.journal_mut(category).push(text.into());
    }

    /// The entries of one category, oldest first.
    pub fn entries(&self, category: MemoryCategory) -> &[String] {
        match category {
            MemoryCategory::Experience => &self.experience,
            MemoryCategory::Insights => &self.insights,
            MemoryCategory::Conclusions => &self.conclusions,
            MemoryCategory::Wishes => &self.wishes,
            MemoryCategory::Fears => &self.fears,
        }
    }

    /// Total entry count across all categories.
    pub fn len(&self) -> usize {
        self.experience
            .len()
            .saturating_add(self.insights.len())
            .saturating_add(self.conclusions.len())
            .saturating_add(self.wishes.len())
            .saturating_add(self.fears.len())
    }

    /// True when no category holds any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the journals into a presentation view.
    pub fn view(&self) -> MemoryView {
        MemoryView {
            experience: self.experience.clone(),
            insights: self.insights.clone(),
            conclusions: self.conclusions.clone(),
            wishes: self.wishes.clone(),
            fears: self.fears.clone(),
        }
    }

    fn journal_mut(&mut self, category: MemoryCategory) -> &mut Vec<String> {
        match category {
            MemoryCategory::Experience => &mut self.experience,
            MemoryCategory::Insights => &mut self.insights,
            MemoryCategory::Conclusions => &mut self.conclusions,
            MemoryCategory::Wishes => &mut self.wishes,
            MemoryCategory::Fears => &mut self.fears,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_ordered_per_category() {
        let mut journal = MemoryJournal::new();
        journal.append(MemoryCategory::Experience, "woke up");
        journal.append(MemoryCategory::Experience, "found a key");
        journal.append(MemoryCategory::Fears, "the dark");
        assert_eq!(
            journal.entries(MemoryCategory::Experience),
            ["woke up", "found a key"]
        );
        assert_eq!(journal.entries(MemoryCategory::Fears), ["the dark"]);
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn category_parse_matches_schema_fields() {
        for name in ["experience", "insights", "conclusions", "wishes", "fears"] {
            assert!(MemoryCategory::parse(name).is_some(), "{name} should parse");
        }
        assert!(MemoryCategory::parse("perceptions").is_none());
        assert!(MemoryCategory::parse("dreams").is_none());
    }

    #[test]
    fn view_copies_all_journals() {
        let mut journal = MemoryJournal::new();
        journal.append(MemoryCategory::Wishes, "see the garden");
        let view = journal.view();
        assert_eq!(view.wishes, ["see the garden"]);
        assert!(view.experience.is_empty());
    }
}
