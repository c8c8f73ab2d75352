//! Saving and opening sessions on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use tracing::{info, warn};
use wayfarer_character::domain::combatant::Combatant;
use wayfarer_character::domain::events::StatChanged;
use wayfarer_content::application::loader::WorkspaceResolver;
use wayfarer_core::clock::Clock;
use wayfarer_core::error::DomainError;
use wayfarer_core::event::{EventChannel, Handler};
use wayfarer_session::domain::game::Game;
use wayfarer_session::domain::options::SessionOptions;

use crate::domain::save_game::{SaveGame, SaveGameHandle, parse_save_file_name, save_file_name};

/// A session rebuilt from a save, ready to replace the current one.
#[derive(Debug)]
pub struct RestoredSession {
    /// The fresh session, standing on the saved scene.
    pub game: Game,
    /// The document it was built from.
    pub save_game: SaveGame,
}

/// Writes and reads save games in one directory.
pub struct SaveGameManager {
    save_dir: PathBuf,
    clock: Box<dyn Clock>,
    save_created: EventChannel<SaveGameHandle>,
    save_opened: EventChannel<SaveGame>,
}

impl SaveGameManager {
    /// Creates a manager for `save_dir`. The directory is created on first save.
    #[must_use]
    pub fn new(save_dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Self {
        Self {
            save_dir: save_dir.into(),
            clock,
            save_created: EventChannel::new(),
            save_opened: EventChannel::new(),
        }
    }

    /// The directory saves are written to.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Registers a handler for successful saves.
    pub fn subscribe_save_created(&mut self, handler: Handler<SaveGameHandle>) -> bool {
        self.save_created.subscribe(handler)
    }

    /// Registers a handler for successful opens.
    pub fn subscribe_save_opened(&mut self, handler: Handler<SaveGame>) -> bool {
        self.save_opened.subscribe(handler)
    }

    /// Saves `game` under a name derived from the adventure and the clock.
    ///
    /// The session is only read. Handlers are notified after the file is in
    /// place, never on failure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the document cannot be
    /// serialized or written.
    pub fn save(&self, game: &Game) -> Result<SaveGameHandle, DomainError> {
        fs::create_dir_all(&self.save_dir).map_err(|e| {
            DomainError::persistence(format!("creating {}", self.save_dir.display()), e)
        })?;

        // An existing save is never replaced; the stamp moves forward a
        // millisecond at a time until the name is free.
        let mut created_at = self.clock.now();
        let mut path = self
            .save_dir
            .join(save_file_name(game.adventure().name(), created_at));
        while path.exists() {
            created_at += TimeDelta::milliseconds(1);
            path = self
                .save_dir
                .join(save_file_name(game.adventure().name(), created_at));
        }

        let save_game = SaveGame::capture(game, created_at);
        let document = serde_json::to_string_pretty(&save_game)
            .map_err(|e| DomainError::persistence("serializing save game", e))?;
        write_atomically(&path, document.as_bytes())?;

        let handle = SaveGameHandle { path, created_at };
        info!(
            session_id = %game.id(),
            path = %handle.path.display(),
            scene_id = %save_game.scene_id,
            "save created"
        );
        self.save_created.publish(&handle);
        Ok(handle)
    }

    /// Rebuilds a session from the save at `path`.
    ///
    /// The restored player gets new skill back-references and exactly one
    /// stat-change handler, `listener`. The saved scene is entered without
    /// replaying its entry actions. Nothing is produced unless every step
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the file cannot be read or
    /// parsed, the player snapshot is unusable, the workspace cannot be
    /// resolved, or the saved scene no longer exists.
    pub fn open(
        &self,
        path: &Path,
        resolver: &dyn WorkspaceResolver,
        options: SessionOptions,
        listener: Handler<StatChanged>,
    ) -> Result<RestoredSession, DomainError> {
        let text = fs::read_to_string(path)
            .map_err(|e| DomainError::persistence(format!("reading {}", path.display()), e))?;
        let save_game: SaveGame = serde_json::from_str(&text)
            .map_err(|e| DomainError::persistence(format!("parsing {}", path.display()), e))?;

        let player = Combatant::from_snapshot(save_game.player.clone()).map_err(|e| {
            DomainError::persistence(format!("restoring player from {}", path.display()), e)
        })?;
        let workspace = resolver.resolve(&save_game.workspace_id).map_err(|e| {
            DomainError::persistence(
                format!("resolving workspace {}", save_game.workspace_id),
                e,
            )
        })?;
        if workspace.adventure().scene(save_game.scene_id).is_none() {
            return Err(DomainError::persistence_msg(format!(
                "saved scene {} is not in workspace {}",
                save_game.scene_id, save_game.workspace_id
            )));
        }
        if workspace.content_hash() != save_game.content_hash {
            warn!(
                workspace_id = %save_game.workspace_id,
                saved_hash = %save_game.content_hash,
                current_hash = %workspace.content_hash(),
                "adventure content changed since this save"
            );
        }

        let mut game = Game::with_player(workspace, player, options);
        game.player_mut().subscribe_stat_changes(listener);
        game.open_scene(save_game.scene_id, false)?;

        info!(
            session_id = %game.id(),
            path = %path.display(),
            scene_id = %save_game.scene_id,
            "save opened"
        );
        self.save_opened.publish(&save_game);
        Ok(RestoredSession { game, save_game })
    }

    /// Saves in the save directory, newest first. A missing directory means
    /// no saves.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the directory cannot be read.
    pub fn list_saves(&self) -> Result<Vec<SaveGameHandle>, DomainError> {
        let entries = match fs::read_dir(&self.save_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::persistence(
                    format!("listing {}", self.save_dir.display()),
                    e,
                ));
            }
        };

        let mut saves = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                DomainError::persistence(format!("listing {}", self.save_dir.display()), e)
            })?;
            let path = entry.path();
            if let Some(file_name) = path.file_name().and_then(|s| s.to_str())
                && let Some((_, created_at)) = parse_save_file_name(file_name)
            {
                saves.push(SaveGameHandle {
                    path: path.clone(),
                    created_at,
                });
            }
        }

        saves.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(saves)
    }
}

impl fmt::Debug for SaveGameManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveGameManager")
            .field("save_dir", &self.save_dir)
            .field("save_created", &self.save_created)
            .field("save_opened", &self.save_opened)
            .finish_non_exhaustive()
    }
}

/// Writes to a sibling temp file, then renames over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), DomainError> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, bytes)
        .map_err(|e| DomainError::persistence(format!("writing {}", temp_path.display()), e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DomainError::persistence(format!("moving save into {}", path.display()), e)
    })
}
