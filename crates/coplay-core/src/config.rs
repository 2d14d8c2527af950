//! Engine configuration.

use crate::validate::ActionMode;

/// Tunables for one session's turn engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Which action grammar the world variant accepts.
    pub mode: ActionMode,
    /// The session ends after this many completed turns.
    pub max_turns: u32,
    /// Rejected responses allowed per step before giving up.
    ///
    /// `None` retries indefinitely, trusting the model to converge.
    pub max_retries: Option<u32>,
}

impl EngineConfig {
    /// Defaults for a grid session.
    pub const fn grid() -> Self {
        Self {
            mode: ActionMode::Grid,
            max_turns: 20,
            max_retries: None,
        }
    }

    /// Defaults for a graph (text-adventure) session.
    pub const fn graph() -> Self {
        Self {
            mode: ActionMode::Phrase,
            max_turns: 12,
            max_retries: None,
        }
    }

    /// Builder: override the turn budget.
    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Builder: cap the per-step retry count.
    #[must_use]
    pub const fn with_retry_cap(mut self, cap: u32) -> Self {
        self.max_retries = Some(cap);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_defaults_differ_in_mode() {
        assert_eq!(EngineConfig::grid().mode, ActionMode::Grid);
        assert_eq!(EngineConfig::graph().mode, ActionMode::Phrase);
        assert_eq!(EngineConfig::grid().max_retries, None);
    }

    #[test]
    fn builders_override_the_defaults() {
        let config = EngineConfig::graph().with_max_turns(3).with_retry_cap(2);
        assert_eq!(config.max_turns, 3);
        assert_eq!(config.max_retries, Some(2));
    }
}
