//! Scenes, paths and gates.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};
use wayfarer_character::domain::skill::Skill;

use super::adventure::OpponentTemplate;

/// Authored scene identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub u32);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A directed edge toward another scene, or a dead end.
#[derive(Debug)]
pub struct Path {
    text: String,
    target: Option<SceneId>,
    visible: Cell<bool>,
}

impl Path {
    /// A visible path leading to `target`.
    #[must_use]
    pub fn new(text: impl Into<String>, target: SceneId) -> Self {
        Self {
            text: text.into(),
            target: Some(target),
            visible: Cell::new(true),
        }
    }

    /// A visible path that leads nowhere.
    #[must_use]
    pub fn dead_end(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: None,
            visible: Cell::new(true),
        }
    }

    /// Starts the path hidden, so the first render pass skips it.
    #[must_use]
    pub fn hidden(self) -> Self {
        self.visible.set(false);
        self
    }

    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Target scene, `None` for a dead end.
    #[must_use]
    pub fn target(&self) -> Option<SceneId> {
        self.target
    }

    /// Whether the next render pass will show this path.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Hides the path from the next render pass only.
    pub fn hide(&self) {
        self.visible.set(false);
    }
}

/// A path as shown by one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedPath<'a> {
    /// Index into the scene's authored paths; what `select_path` expects.
    pub index: usize,
    /// Display text.
    pub text: &'a str,
    /// Target scene, `None` for a dead end.
    pub target: Option<SceneId>,
}

impl RenderedPath<'_> {
    /// `true` when selecting this path goes nowhere.
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.target.is_none()
    }
}

/// A combat requirement: the player must defeat the opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatGate {
    /// Authored opponent; a fresh combatant is spawned from it on entry.
    pub opponent: OpponentTemplate,
}

/// A skill-test requirement. The first path is taken on success, the second
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTestGate {
    /// Skill to test. Its level is used when the player lacks the skill.
    pub skill: Skill,
}

/// At most one gate per scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Combat must be resolved first.
    Combat(CombatGate),
    /// A skill test must be resolved first.
    SkillTest(SkillTestGate),
}

/// The shape of a scene, which alone decides the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Free traversal through authored paths.
    Normal,
    /// Combat gate.
    CombatGate,
    /// Skill-test gate.
    SkillTestGate,
    /// The adventure ends here.
    Terminal,
}

/// An authored effect applied to the player when a scene is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneAction {
    /// Add `delta` to stamina.
    AdjustStamina {
        /// Signed change.
        delta: i32,
    },
    /// Add `delta` to the combat skill level.
    AdjustSkill {
        /// Signed change.
        delta: i32,
    },
    /// Add `delta` to damage.
    AdjustDamage {
        /// Signed change.
        delta: i32,
    },
    /// Hide one of this scene's paths for the next render.
    HidePath {
        /// Index of the path to hide.
        path: usize,
    },
}

/// One narrative node.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    text: String,
    image: Option<String>,
    paths: Vec<Path>,
    gate: Option<Gate>,
    terminal: bool,
    actions: Vec<SceneAction>,
}

impl Scene {
    /// A plain scene with no paths.
    #[must_use]
    pub fn new(id: SceneId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            image: None,
            paths: Vec::new(),
            gate: None,
            terminal: false,
            actions: Vec::new(),
        }
    }

    /// Appends a path.
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.push(path);
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Gates the scene behind combat against `opponent`.
    #[must_use]
    pub fn with_combat(mut self, opponent: OpponentTemplate) -> Self {
        self.gate = Some(Gate::Combat(CombatGate { opponent }));
        self
    }

    /// Gates the scene behind a test of `skill`.
    #[must_use]
    pub fn with_skill_test(mut self, skill: Skill) -> Self {
        self.gate = Some(Gate::SkillTest(SkillTestGate { skill }));
        self
    }

    /// Marks the scene as an ending.
    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Appends an entry action.
    #[must_use]
    pub fn with_action(mut self, action: SceneAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Scene identifier.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Image reference, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Authored paths in order.
    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The gate, if the scene has one.
    #[must_use]
    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }

    /// Whether the adventure ends here.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Entry actions in authored order.
    #[must_use]
    pub fn actions(&self) -> &[SceneAction] {
        &self.actions
    }

    /// Which of the four mutually exclusive shapes this scene has.
    #[must_use]
    pub fn kind(&self) -> SceneKind {
        if self.terminal {
            return SceneKind::Terminal;
        }
        match self.gate {
            Some(Gate::Combat(_)) => SceneKind::CombatGate,
            Some(Gate::SkillTest(_)) => SceneKind::SkillTestGate,
            None => SceneKind::Normal,
        }
    }

    /// One render pass over the paths.
    ///
    /// A hidden path is skipped and made visible again: invisibility lasts
    /// exactly one pass.
    #[must_use]
    pub fn render_paths(&self) -> Vec<RenderedPath<'_>> {
        let mut rendered = Vec::with_capacity(self.paths.len());
        for (index, path) in self.paths.iter().enumerate() {
            if !path.is_visible() {
                path.visible.set(true);
                continue;
            }
            rendered.push(RenderedPath {
                index,
                text: path.text(),
                target: path.target(),
            });
        }
        rendered
    }

    pub(crate) fn has_gate_and_terminal(&self) -> bool {
        self.terminal && self.gate.is_some()
    }
}
