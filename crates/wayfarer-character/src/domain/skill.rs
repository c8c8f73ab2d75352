//! Named skill levels.

use serde::{Deserialize, Serialize};

use super::combatant::CombatantId;

/// Name of the skill every combatant fights with.
pub const COMBAT_SKILL: &str = "Combat";

/// A named skill level held by a combatant.
///
/// The owner back-reference is an identifier, never serialized. It is bound
/// when the skill is attached to a combatant and rebuilt after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    name: String,
    level: i32,
    #[serde(skip)]
    owner: Option<CombatantId>,
}

impl Skill {
    /// Creates an unowned skill.
    #[must_use]
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Self {
            name: name.into(),
            level,
            owner: None,
        }
    }

    /// The skill name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current level.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// The combatant holding this skill, if bound.
    #[must_use]
    pub fn owner(&self) -> Option<CombatantId> {
        self.owner
    }

    pub(crate) fn set_level(&mut self, level: i32) {
        self.level = level;
    }

    pub(crate) fn bind(&mut self, owner: CombatantId) {
        self.owner = Some(owner);
    }

    pub(crate) fn unbound(&self) -> Self {
        Self::new(self.name.clone(), self.level)
    }
}
