//! The adventure graph and the workspace it was loaded from.

use std::collections::{BTreeMap, HashSet};

use wayfarer_character::domain::combatant::{Combatant, DEFAULT_DAMAGE};
use wayfarer_core::error::DomainError;

use super::scene::{Gate, Scene, SceneAction, SceneId};

/// Authored starting stats of the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTemplate {
    /// Player name.
    pub name: String,
    /// Starting combat skill level.
    pub skill: i32,
    /// Starting stamina.
    pub stamina: i32,
    /// Starting damage.
    pub damage: i32,
    /// Additional named skills (e.g. `Luck`) and their starting levels.
    pub skills: BTreeMap<String, i32>,
}

impl PlayerTemplate {
    /// A template with default damage and no extra skills.
    #[must_use]
    pub fn new(name: impl Into<String>, skill: i32, stamina: i32) -> Self {
        Self {
            name: name.into(),
            skill,
            stamina,
            damage: DEFAULT_DAMAGE,
            skills: BTreeMap::new(),
        }
    }

    /// Builds a fresh player with no listeners.
    #[must_use]
    pub fn create_player(&self) -> Combatant {
        self.skills.iter().fold(
            Combatant::new(self.name.clone(), self.skill, self.stamina).with_damage(self.damage),
            |player, (name, level)| player.with_skill(name.clone(), *level),
        )
    }
}

/// Authored opponent of a combat gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentTemplate {
    /// Opponent name.
    pub name: String,
    /// Combat skill level.
    pub skill: i32,
    /// Starting stamina.
    pub stamina: i32,
    /// Damage per winning round.
    pub damage: i32,
}

impl OpponentTemplate {
    /// A template with default damage.
    #[must_use]
    pub fn new(name: impl Into<String>, skill: i32, stamina: i32) -> Self {
        Self {
            name: name.into(),
            skill,
            stamina,
            damage: DEFAULT_DAMAGE,
        }
    }

    /// Spawns a live opponent.
    #[must_use]
    pub fn spawn(&self) -> Combatant {
        Combatant::new(self.name.clone(), self.skill, self.stamina).with_damage(self.damage)
    }
}

/// The authored content graph for one storyline. Read-only after load.
#[derive(Debug)]
pub struct Adventure {
    name: String,
    start: SceneId,
    player: PlayerTemplate,
    scenes: BTreeMap<SceneId, Scene>,
}

impl Adventure {
    /// Assembles and validates an adventure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Content` for duplicate scene ids, a missing start
    /// scene, a scene that is both terminal and gated, or a `HidePath` action
    /// naming a path the scene lacks. Returns `DomainError::ContentReference`
    /// for the first path targeting a scene id that does not exist.
    pub fn new(
        name: impl Into<String>,
        start: SceneId,
        player: PlayerTemplate,
        scenes: Vec<Scene>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let mut by_id = BTreeMap::new();
        for scene in scenes {
            let id = scene.id();
            if by_id.insert(id, scene).is_some() {
                return Err(DomainError::Content(format!("duplicate scene id {id}")));
            }
        }

        if !by_id.contains_key(&start) {
            return Err(DomainError::Content(format!(
                "start scene {start} is not defined"
            )));
        }

        let ids: HashSet<SceneId> = by_id.keys().copied().collect();
        for scene in by_id.values() {
            validate_scene(scene, &ids)?;
        }

        Ok(Self {
            name,
            start,
            player,
            scenes: by_id,
        })
    }

    /// Adventure name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the start scene.
    #[must_use]
    pub fn start_id(&self) -> SceneId {
        self.start
    }

    /// The start scene.
    ///
    /// # Panics
    ///
    /// Never: `new` rejects adventures whose start scene is missing.
    #[must_use]
    pub fn start_scene(&self) -> &Scene {
        self.scenes
            .get(&self.start)
            .expect("start scene validated at construction")
    }

    /// Looks up a scene by id.
    #[must_use]
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    /// Number of scenes.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Authored starting player.
    #[must_use]
    pub fn player_template(&self) -> &PlayerTemplate {
        &self.player
    }

    /// Authoring invariants that are not enforced at runtime: a combat gate
    /// needs a path to resume through, a skill test needs two.
    #[must_use]
    pub fn authoring_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for scene in self.scenes.values() {
            match scene.gate() {
                Some(Gate::Combat(_)) if scene.paths().is_empty() => warnings.push(format!(
                    "scene {} is combat-gated but has no path to resume through",
                    scene.id()
                )),
                Some(Gate::SkillTest(_)) if scene.paths().len() < 2 => warnings.push(format!(
                    "scene {} is skill-test-gated but declares {} path(s), needs 2",
                    scene.id(),
                    scene.paths().len()
                )),
                _ => {}
            }
        }
        warnings
    }
}

fn validate_scene(scene: &Scene, ids: &HashSet<SceneId>) -> Result<(), DomainError> {
    if scene.has_gate_and_terminal() {
        return Err(DomainError::Content(format!(
            "scene {} is terminal and gated at the same time",
            scene.id()
        )));
    }

    for (index, path) in scene.paths().iter().enumerate() {
        if let Some(target) = path.target() {
            if !ids.contains(&target) {
                return Err(DomainError::ContentReference {
                    scene_id: scene.id().0,
                    origin: format!("path {} ({:?})", index + 1, path.text()),
                    target_id: target.0,
                });
            }
        }
    }

    for action in scene.actions() {
        if let SceneAction::HidePath { path } = action {
            if *path >= scene.paths().len() {
                return Err(DomainError::Content(format!(
                    "scene {} hides path {path} but has {} path(s)",
                    scene.id(),
                    scene.paths().len()
                )));
            }
        }
    }
    Ok(())
}

/// A loaded adventure plus the identity it was loaded under.
#[derive(Debug)]
pub struct Workspace {
    id: String,
    adventure: Adventure,
    content_hash: String,
}

impl Workspace {
    /// Binds an adventure to its workspace id and content hash.
    #[must_use]
    pub fn new(id: impl Into<String>, adventure: Adventure, content_hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            adventure,
            content_hash: content_hash.into(),
        }
    }

    /// Workspace identifier, recorded in save games.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The adventure.
    #[must_use]
    pub fn adventure(&self) -> &Adventure {
        &self.adventure
    }

    /// SHA-256 of the source document, lowercase hex.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}
