//! Adventure document loading.
//!
//! Adventures are authored as YAML. Loading parses the document, builds the
//! scene graph, validates every scene reference and hashes the source so a
//! save game can tell which revision of the content it was made against.

use std::collections::BTreeMap;
use std::path::Path as FsPath;
use std::rc::Rc;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use wayfarer_character::domain::combatant::DEFAULT_DAMAGE;
use wayfarer_character::domain::skill::Skill;
use wayfarer_core::error::DomainError;

use crate::domain::adventure::{Adventure, OpponentTemplate, PlayerTemplate, Workspace};
use crate::domain::scene::{Path, Scene, SceneAction, SceneId};

/// Resolves a workspace id recorded in a save game back to loaded content.
pub trait WorkspaceResolver {
    /// Loads (or looks up) the workspace with the given id.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the workspace cannot be found or loaded.
    fn resolve(&self, workspace_id: &str) -> Result<Rc<Workspace>, DomainError>;
}

/// Treats the workspace id as the path of a YAML adventure file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWorkspaceLoader;

impl WorkspaceResolver for FileWorkspaceLoader {
    fn resolve(&self, workspace_id: &str) -> Result<Rc<Workspace>, DomainError> {
        load_workspace(FsPath::new(workspace_id)).map(Rc::new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AdventureSource {
    name: String,
    start: u32,
    player: PlayerSource,
    scenes: Vec<SceneSource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayerSource {
    name: String,
    skill: i32,
    stamina: i32,
    #[serde(default = "default_damage")]
    damage: i32,
    #[serde(default)]
    skills: BTreeMap<String, i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneSource {
    id: u32,
    #[serde(default)]
    text: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    paths: Vec<PathSource>,
    #[serde(default)]
    combat: Option<CombatSource>,
    #[serde(default)]
    skill_test: Option<SkillTestSource>,
    #[serde(default)]
    end: bool,
    #[serde(default)]
    actions: Vec<SceneAction>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathSource {
    text: String,
    #[serde(default)]
    to: Option<u32>,
    #[serde(default = "default_visible")]
    visible: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CombatSource {
    opponent: OpponentSource,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OpponentSource {
    name: String,
    skill: i32,
    stamina: i32,
    #[serde(default = "default_damage")]
    damage: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SkillTestSource {
    skill: String,
    #[serde(default)]
    level: i32,
}

fn default_damage() -> i32 {
    DEFAULT_DAMAGE
}

fn default_visible() -> bool {
    true
}

impl SceneSource {
    fn into_scene(self) -> Result<Scene, DomainError> {
        let id = SceneId(self.id);
        let mut scene = Scene::new(id, self.text);
        if let Some(image) = self.image {
            scene = scene.with_image(image);
        }

        for source in self.paths {
            let path = match source.to {
                Some(to) => Path::new(source.text, SceneId(to)),
                None => Path::dead_end(source.text),
            };
            scene = scene.with_path(if source.visible { path } else { path.hidden() });
        }

        match (self.combat, self.skill_test) {
            (Some(_), Some(_)) => {
                return Err(DomainError::Content(format!(
                    "scene {id} declares both a combat gate and a skill test"
                )));
            }
            (Some(combat), None) => {
                let o = combat.opponent;
                scene = scene.with_combat(OpponentTemplate {
                    name: o.name,
                    skill: o.skill,
                    stamina: o.stamina,
                    damage: o.damage,
                });
            }
            (None, Some(test)) => {
                scene = scene.with_skill_test(Skill::new(test.skill, test.level));
            }
            (None, None) => {}
        }

        if self.end {
            scene = scene.terminal();
        }
        Ok(self
            .actions
            .into_iter()
            .fold(scene, Scene::with_action))
    }
}

/// Parses and validates an adventure document.
///
/// # Errors
///
/// Returns `DomainError::Content` for malformed YAML or structural problems,
/// and `DomainError::ContentReference` when a path targets an unknown scene.
pub fn parse_adventure(source: &str) -> Result<Adventure, DomainError> {
    let doc: AdventureSource = serde_yaml::from_str(source)
        .map_err(|e| DomainError::Content(format!("adventure document is malformed: {e}")))?;

    let scenes = doc
        .scenes
        .into_iter()
        .map(SceneSource::into_scene)
        .collect::<Result<Vec<_>, _>>()?;

    let player = PlayerTemplate {
        name: doc.player.name,
        skill: doc.player.skill,
        stamina: doc.player.stamina,
        damage: doc.player.damage,
        skills: doc.player.skills,
    };

    Adventure::new(doc.name, SceneId(doc.start), player, scenes)
}

/// Hex-encoded SHA-256 of an adventure source.
#[must_use]
pub fn content_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

/// Parses an adventure and binds it to `workspace_id`.
///
/// # Errors
///
/// See [`parse_adventure`].
pub fn load_workspace_str(
    workspace_id: impl Into<String>,
    source: &str,
) -> Result<Workspace, DomainError> {
    let workspace_id = workspace_id.into();
    let adventure = parse_adventure(source)?;
    let hash = content_hash(source);

    for warning in adventure.authoring_warnings() {
        warn!(workspace_id = %workspace_id, "{warning}");
    }
    info!(
        workspace_id = %workspace_id,
        adventure = adventure.name(),
        scenes = adventure.scene_count(),
        content_hash = %hash,
        "adventure loaded"
    );

    Ok(Workspace::new(workspace_id, adventure, hash))
}

/// Reads an adventure file; its path becomes the workspace id.
///
/// # Errors
///
/// Returns `DomainError::Content` if the file cannot be read, otherwise see
/// [`parse_adventure`].
pub fn load_workspace(path: &FsPath) -> Result<Workspace, DomainError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Content(format!("reading {}: {e}", path.display())))?;
    load_workspace_str(path.display().to_string(), &source)
}
