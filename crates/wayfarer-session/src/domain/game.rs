//! The game controller.
//!
//! A [`Game`] stands on exactly one scene at a time. What it accepts next is
//! decided by that scene's authored shape (plus whether the player is still
//! alive), never by flags the controller keeps on the side. Every transition
//! is caused by an explicit call: path selection, a combat round, a skill-test
//! result, a restart or a restore.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};
use uuid::Uuid;
use wayfarer_character::domain::combatant::Combatant;
use wayfarer_character::domain::skill::Skill;
use wayfarer_content::domain::adventure::{Adventure, Workspace};
use wayfarer_content::domain::scene::{Gate, RenderedPath, Scene, SceneId, SceneKind};
use wayfarer_core::error::DomainError;
use wayfarer_core::event::{EventChannel, Handler};
use wayfarer_core::rng::DeterministicRng;
use wayfarer_rules::domain::combat::{CombatRules, RoundReport};
use wayfarer_rules::domain::skill_test::{SkillTestRoll, roll_skill_test};

use super::entry_actions::EntryActions;
use super::events::{CombatEnded, SceneChanged, SkillTestResolved};
use super::options::SessionOptions;

/// Identity of one play session, used in log fields and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the session accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Path selection.
    Normal,
    /// Combat rounds until someone dies.
    CombatGate,
    /// One skill test.
    SkillTestGate,
    /// Only a restart (or a restore) leaves this state.
    Terminal,
}

impl From<SceneKind> for GameState {
    fn from(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Normal => Self::Normal,
            SceneKind::CombatGate => Self::CombatGate,
            SceneKind::SkillTestGate => Self::SkillTestGate,
            SceneKind::Terminal => Self::Terminal,
        }
    }
}

/// One play session over a loaded adventure.
pub struct Game {
    id: SessionId,
    workspace: Rc<Workspace>,
    current_scene: SceneId,
    player: Combatant,
    opponent: Option<Combatant>,
    rules: CombatRules,
    rng: Box<dyn DeterministicRng>,
    entry_actions: Box<dyn EntryActions>,
    scene_changed: EventChannel<SceneChanged>,
    combat_ended: EventChannel<CombatEnded>,
    skill_test_resolved: EventChannel<SkillTestResolved>,
}

impl Game {
    /// Starts a new session: a fresh player from the adventure's template,
    /// entering the start scene with its entry actions.
    #[must_use]
    pub fn new(workspace: Rc<Workspace>, options: SessionOptions) -> Self {
        let player = workspace.adventure().player_template().create_player();
        let mut game = Self::with_player(workspace, player, options);
        let workspace = Rc::clone(&game.workspace);
        game.enter(workspace.adventure().start_scene(), true);
        info!(
            session_id = %game.id,
            adventure = workspace.adventure().name(),
            "session started"
        );
        game
    }

    /// Builds a session around an existing player, positioned on the start
    /// scene without running anything or emitting events.
    ///
    /// Used when restoring a save; follow up with `open_scene(_, false)`.
    #[must_use]
    pub fn with_player(workspace: Rc<Workspace>, player: Combatant, options: SessionOptions) -> Self {
        let current_scene = workspace.adventure().start_id();
        Self {
            id: SessionId::new(),
            workspace,
            current_scene,
            player,
            opponent: None,
            rules: options.rules,
            rng: options.rng,
            entry_actions: options.entry_actions,
            scene_changed: EventChannel::new(),
            combat_ended: EventChannel::new(),
            skill_test_resolved: EventChannel::new(),
        }
    }

    /// Session identity.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The workspace this session plays.
    #[must_use]
    pub fn workspace(&self) -> &Rc<Workspace> {
        &self.workspace
    }

    /// The adventure this session plays.
    #[must_use]
    pub fn adventure(&self) -> &Adventure {
        self.workspace.adventure()
    }

    /// Combat tuning in effect.
    #[must_use]
    pub fn rules(&self) -> CombatRules {
        self.rules
    }

    /// Id of the scene the session stands on.
    #[must_use]
    pub fn current_scene_id(&self) -> SceneId {
        self.current_scene
    }

    /// The scene the session stands on.
    ///
    /// # Panics
    ///
    /// Never in practice: the current id is validated on every transition.
    #[must_use]
    pub fn current_scene(&self) -> &Scene {
        self.workspace
            .adventure()
            .scene(self.current_scene)
            .expect("current scene id is validated on entry")
    }

    /// The current player.
    #[must_use]
    pub fn player(&self) -> &Combatant {
        &self.player
    }

    /// The current player, for subscribing handlers or external effects.
    pub fn player_mut(&mut self) -> &mut Combatant {
        &mut self.player
    }

    /// The live opponent while on a combat gate.
    #[must_use]
    pub fn opponent(&self) -> Option<&Combatant> {
        self.opponent.as_ref()
    }

    /// The live opponent, for subscribing attack-result handlers.
    pub fn opponent_mut(&mut self) -> Option<&mut Combatant> {
        self.opponent.as_mut()
    }

    /// What the session accepts next. A dead player is always `Terminal`.
    #[must_use]
    pub fn state(&self) -> GameState {
        if self.player.is_dead() {
            return GameState::Terminal;
        }
        self.current_scene().kind().into()
    }

    /// One render pass over the current scene's paths.
    #[must_use]
    pub fn render_paths(&self) -> Vec<RenderedPath<'_>> {
        self.current_scene().render_paths()
    }

    /// Registers a scene-change handler.
    pub fn subscribe_scene_changed(&mut self, handler: Handler<SceneChanged>) -> bool {
        self.scene_changed.subscribe(handler)
    }

    /// Registers a combat-ended handler.
    pub fn subscribe_combat_ended(&mut self, handler: Handler<CombatEnded>) -> bool {
        self.combat_ended.subscribe(handler)
    }

    /// Registers a skill-test handler.
    pub fn subscribe_skill_test_resolved(&mut self, handler: Handler<SkillTestResolved>) -> bool {
        self.skill_test_resolved.subscribe(handler)
    }

    /// Moves to `target`.
    ///
    /// With `execute_entry_actions` the scene's entry effects run before the
    /// transition completes. Without it the scene is entered with no side
    /// effects on the player; restoring a save relies on this.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Precondition` if `target` is not in the adventure.
    pub fn open_scene(&mut self, target: SceneId, execute_entry_actions: bool) -> Result<(), DomainError> {
        let workspace = Rc::clone(&self.workspace);
        let scene = workspace.adventure().scene(target).ok_or_else(|| {
            DomainError::Precondition(format!(
                "scene {target} does not exist in {}",
                workspace.adventure().name()
            ))
        })?;
        self.enter(scene, execute_entry_actions);
        Ok(())
    }

    /// Follows the path at `index` of the current scene.
    ///
    /// Returns the scene moved to, or `None` for a dead end (nothing changes).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Precondition` outside `Normal` or when `index` is
    /// out of range.
    pub fn select_path(&mut self, index: usize) -> Result<Option<SceneId>, DomainError> {
        self.require(GameState::Normal, "select a path")?;
        let scene = self.current_scene();
        let path = scene.paths().get(index).ok_or_else(|| {
            DomainError::Precondition(format!(
                "scene {} has no path {index} ({} paths)",
                scene.id(),
                scene.paths().len()
            ))
        })?;

        match path.target() {
            Some(target) => {
                self.open_scene(target, true)?;
                Ok(Some(target))
            }
            None => {
                debug!(session_id = %self.id, scene_id = %self.current_scene, index, "dead end");
                Ok(None)
            }
        }
    }

    /// Fights one round against the gate's opponent, the player attacking.
    ///
    /// When either side dies, combat-ended handlers hear whether the player
    /// survived. A survivor moves on through the gate's first path; a dead
    /// player leaves the session `Terminal`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Precondition` outside `CombatGate`, when the
    /// opponent is already dead, or when the gate has no first path to
    /// follow. A refused call rolls no dice.
    pub fn fight_round(&mut self) -> Result<RoundReport, DomainError> {
        self.require(GameState::CombatGate, "fight")?;
        let resume = self.gate_target(0)?;
        let Some(opponent) = self.opponent.as_mut() else {
            return Err(DomainError::Precondition(format!(
                "scene {} has no live opponent",
                self.current_scene
            )));
        };
        if opponent.is_dead() {
            return Err(DomainError::Precondition(format!(
                "{} is already defeated",
                opponent.name()
            )));
        }

        let report = self
            .rules
            .resolve_round(&mut self.player, opponent, self.rng.as_mut());
        let opponent_dead = opponent.is_dead();
        let player_survived = !self.player.is_dead();
        if player_survived && !opponent_dead {
            return Ok(report);
        }

        info!(session_id = %self.id, scene_id = %self.current_scene, player_survived, "combat ended");
        self.combat_ended.publish(&CombatEnded {
            session: self.id,
            player_survived,
        });
        if player_survived {
            self.open_scene(resume, true)?;
        }
        Ok(report)
    }

    /// Applies an externally decided skill-test outcome: the gate's first
    /// path when `skillful`, its second otherwise.
    ///
    /// Returns the scene moved to.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Precondition` outside `SkillTestGate` or when the
    /// chosen path is missing or leads nowhere.
    pub fn resolve_skill_test(&mut self, skillful: bool) -> Result<SceneId, DomainError> {
        let gate = self.skill_gate()?.clone();
        let target = self.gate_target(if skillful { 0 } else { 1 })?;

        info!(session_id = %self.id, skill = gate.name(), skillful, "skill test resolved");
        self.skill_test_resolved.publish(&SkillTestResolved {
            session: self.id,
            skill: gate.name().to_owned(),
            skillful,
        });
        self.open_scene(target, true)?;
        Ok(target)
    }

    /// Rolls the current gate's skill test and resolves it.
    ///
    /// The player's own skill of that name is used when they have one,
    /// otherwise the gate's authored level.
    ///
    /// # Errors
    ///
    /// As [`Game::resolve_skill_test`].
    pub fn test_skill(&mut self) -> Result<SkillTestRoll, DomainError> {
        let gate = self.skill_gate()?;
        let level = self
            .player
            .skill(gate.name())
            .map_or(gate.level(), Skill::level);
        let roll = roll_skill_test(level, self.rng.as_mut());
        self.resolve_skill_test(roll.skillful)?;
        Ok(roll)
    }

    /// Starts over at the adventure's start scene with a fresh player built
    /// from the template. Damage and stat-change handlers carry over.
    ///
    /// Allowed from any state.
    pub fn restart(&mut self) {
        let workspace = Rc::clone(&self.workspace);
        let mut fresh = workspace
            .adventure()
            .player_template()
            .create_player()
            .with_damage(self.player.damage());
        fresh.adopt_stat_listeners(&mut self.player);
        self.player = fresh;
        info!(session_id = %self.id, "session restarted");
        self.enter(workspace.adventure().start_scene(), true);
    }

    fn enter(&mut self, scene: &Scene, execute_entry_actions: bool) {
        let from = self.current_scene;
        self.current_scene = scene.id();
        self.opponent = match scene.gate() {
            Some(Gate::Combat(gate)) => Some(gate.opponent.spawn()),
            _ => None,
        };
        if execute_entry_actions {
            self.entry_actions.execute(scene, &mut self.player);
        }

        debug!(
            session_id = %self.id,
            from = %from,
            to = %scene.id(),
            entry_actions = execute_entry_actions,
            "scene opened"
        );
        self.scene_changed.publish(&SceneChanged {
            session: self.id,
            from,
            to: scene.id(),
            entry_actions_executed: execute_entry_actions,
        });
    }

    fn require(&self, expected: GameState, action: &str) -> Result<(), DomainError> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(DomainError::Precondition(format!(
                "cannot {action} in state {state:?} (scene {})",
                self.current_scene
            )))
        }
    }

    fn skill_gate(&self) -> Result<&Skill, DomainError> {
        self.require(GameState::SkillTestGate, "resolve a skill test")?;
        match self.current_scene().gate() {
            Some(Gate::SkillTest(gate)) => Ok(&gate.skill),
            _ => Err(DomainError::Precondition(format!(
                "scene {} has no skill test",
                self.current_scene
            ))),
        }
    }

    fn gate_target(&self, index: usize) -> Result<SceneId, DomainError> {
        let scene = self.current_scene();
        scene
            .paths()
            .get(index)
            .and_then(|path| path.target())
            .ok_or_else(|| {
                DomainError::Precondition(format!(
                    "gate scene {} has no path {} to follow",
                    scene.id(),
                    index + 1
                ))
            })
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("workspace", &self.workspace.id())
            .field("current_scene", &self.current_scene)
            .field("player", &self.player.name())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
