//! Session-level events for the presentation layer.

use wayfarer_content::domain::scene::SceneId;

use super::game::SessionId;

/// The session moved to another scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneChanged {
    /// The session.
    pub session: SessionId,
    /// Scene left.
    pub from: SceneId,
    /// Scene entered.
    pub to: SceneId,
    /// Whether entry actions ran (false when restoring a save).
    pub entry_actions_executed: bool,
}

/// A combat gate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatEnded {
    /// The session.
    pub session: SessionId,
    /// `false` means the adventure is over.
    pub player_survived: bool,
}

/// A skill-test gate was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTestResolved {
    /// The session.
    pub session: SessionId,
    /// Name of the tested skill.
    pub skill: String,
    /// `true` follows the first path, `false` the second.
    pub skillful: bool,
}
