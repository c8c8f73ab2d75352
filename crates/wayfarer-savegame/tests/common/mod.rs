//! Shared helpers for save-game integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use wayfarer_character::domain::combatant::Combatant;
use wayfarer_content::application::loader::{WorkspaceResolver, load_workspace_str};
use wayfarer_content::domain::adventure::Workspace;
use wayfarer_content::domain::scene::{Scene, SceneId};
use wayfarer_core::error::DomainError;
use wayfarer_savegame::application::manager::SaveGameManager;
use wayfarer_session::domain::entry_actions::EntryActions;
use wayfarer_session::domain::game::Game;
use wayfarer_session::domain::options::SessionOptions;
use wayfarer_test_support::fixtures::DARK_TOWER;
use wayfarer_test_support::{FixedClock, MockRng, fixed_time};

/// Workspace id the fixture adventure is loaded under.
pub const WORKSPACE_ID: &str = "dark-tower.yaml";

/// The fixture adventure as a shared workspace.
pub fn dark_tower() -> Rc<Workspace> {
    Rc::new(load_workspace_str(WORKSPACE_ID, DARK_TOWER).unwrap())
}

/// Resolves exactly one in-memory workspace.
pub struct FixtureResolver(pub Rc<Workspace>);

impl WorkspaceResolver for FixtureResolver {
    fn resolve(&self, workspace_id: &str) -> Result<Rc<Workspace>, DomainError> {
        if workspace_id == self.0.id() {
            Ok(Rc::clone(&self.0))
        } else {
            Err(DomainError::Content(format!("unknown workspace {workspace_id}")))
        }
    }
}

/// Records which scenes had their entry actions run.
#[derive(Clone, Default)]
pub struct CountingEntryActions {
    pub entered: Rc<RefCell<Vec<SceneId>>>,
}

impl EntryActions for CountingEntryActions {
    fn execute(&mut self, scene: &Scene, _player: &mut Combatant) {
        self.entered.borrow_mut().push(scene.id());
    }
}

/// Deterministic session options: dice always roll 1.
pub fn options() -> SessionOptions {
    SessionOptions::seeded(Some(11)).with_rng(MockRng)
}

/// A new session over `workspace` with deterministic options.
pub fn new_game(workspace: Rc<Workspace>) -> Game {
    Game::new(workspace, options())
}

/// A manager whose clock is pinned to `fixed_time()`.
pub fn manager(save_dir: &Path) -> SaveGameManager {
    SaveGameManager::new(save_dir, Box::new(FixedClock(fixed_time())))
}
