//! Opening either an adventure or a save game from one path.

use std::path::Path;
use std::rc::Rc;

use wayfarer_character::domain::events::StatChanged;
use wayfarer_content::application::loader::WorkspaceResolver;
use wayfarer_content::domain::adventure::Workspace;
use wayfarer_core::error::DomainError;
use wayfarer_core::event::Handler;
use wayfarer_session::domain::options::SessionOptions;

use super::manager::{RestoredSession, SaveGameManager};
use crate::domain::save_game::is_save_file_name;

/// What a path turned out to hold.
#[derive(Debug)]
pub enum Opened {
    /// Adventure content; start a new session over it.
    Adventure(Rc<Workspace>),
    /// A save game, already rebuilt into a session.
    SaveGame(Box<RestoredSession>),
}

impl SaveGameManager {
    /// Opens `path` as a save game when its name ends in the save suffix,
    /// otherwise as an adventure through `resolver`.
    ///
    /// `options` and `listener` are only used for save games.
    ///
    /// # Errors
    ///
    /// See [`SaveGameManager::open`] for save games; adventures fail with the
    /// resolver's error.
    pub fn open_entity(
        &self,
        path: &Path,
        resolver: &dyn WorkspaceResolver,
        options: SessionOptions,
        listener: Handler<StatChanged>,
    ) -> Result<Opened, DomainError> {
        let is_save = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_save_file_name);
        if is_save {
            let restored = self.open(path, resolver, options, listener)?;
            Ok(Opened::SaveGame(Box::new(restored)))
        } else {
            let workspace = resolver.resolve(&path.display().to_string())?;
            Ok(Opened::Adventure(workspace))
        }
    }
}
