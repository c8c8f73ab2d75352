//! Per-session collaborators and tuning.

use std::fmt;

use wayfarer_core::rng::{DeterministicRng, SeededRng};
use wayfarer_rules::domain::combat::CombatRules;

use super::entry_actions::{AuthoredEntryActions, EntryActions};

/// Everything a [`Game`](super::game::Game) needs besides its content.
pub struct SessionOptions {
    /// Combat tuning.
    pub rules: CombatRules,
    /// Source of every die roll in the session.
    pub rng: Box<dyn DeterministicRng>,
    /// Runs scene entry effects.
    pub entry_actions: Box<dyn EntryActions>,
}

impl SessionOptions {
    /// Default rules and authored entry actions, with dice seeded from `seed`
    /// or from OS entropy when `None`.
    #[must_use]
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(SeededRng::from_entropy, SeededRng::seeded);
        Self {
            rules: CombatRules::default(),
            rng: Box::new(rng),
            entry_actions: Box::new(AuthoredEntryActions),
        }
    }

    /// Replaces the combat rules.
    #[must_use]
    pub fn with_rules(mut self, rules: CombatRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the dice.
    #[must_use]
    pub fn with_rng(mut self, rng: impl DeterministicRng + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replaces the entry-action collaborator.
    #[must_use]
    pub fn with_entry_actions(mut self, entry_actions: impl EntryActions + 'static) -> Self {
        self.entry_actions = Box::new(entry_actions);
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::seeded(None)
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
