//! The collaborator that runs a scene's entry effects.

use tracing::debug;
use wayfarer_character::domain::combatant::Combatant;
use wayfarer_content::domain::scene::{Scene, SceneAction};

/// Runs whatever should happen when a scene is entered for real.
///
/// The controller calls this only for `open_scene(_, true)`; restoring a save
/// opens the saved scene without it.
pub trait EntryActions {
    /// Applies the entry effects of `scene` to `player`.
    fn execute(&mut self, scene: &Scene, player: &mut Combatant);
}

/// Applies the scene's authored [`SceneAction`]s in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthoredEntryActions;

impl EntryActions for AuthoredEntryActions {
    fn execute(&mut self, scene: &Scene, player: &mut Combatant) {
        for action in scene.actions() {
            debug!(scene_id = %scene.id(), ?action, "applying entry action");
            match *action {
                SceneAction::AdjustStamina { delta } => {
                    player.set_stamina(player.stamina().saturating_add(delta));
                }
                SceneAction::AdjustSkill { delta } => {
                    player.set_skill_level(player.skill_level().saturating_add(delta));
                }
                SceneAction::AdjustDamage { delta } => {
                    player.set_damage(player.damage().saturating_add(delta));
                }
                SceneAction::HidePath { path } => {
                    if let Some(path) = scene.paths().get(path) {
                        path.hide();
                    }
                }
            }
        }
    }
}

/// Does nothing on entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntryActions;

impl EntryActions for NoEntryActions {
    fn execute(&mut self, _scene: &Scene, _player: &mut Combatant) {}
}
