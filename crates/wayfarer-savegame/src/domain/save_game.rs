//! The persisted save document and its file naming.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use wayfarer_character::domain::combatant::PlayerSnapshot;
use wayfarer_content::domain::scene::SceneId;
use wayfarer_session::domain::game::Game;

/// Suffix every save file carries.
pub const SAVE_SUFFIX: &str = ".saveGame.json";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%3f";

/// Second-resolution stamps written before milliseconds were added.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A point-in-time snapshot of a session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Workspace the session was playing; resolved again on open.
    pub workspace_id: String,
    /// SHA-256 of the adventure source at save time.
    pub content_hash: String,
    /// Player stats and skills. No listeners, no back-references.
    pub player: PlayerSnapshot,
    /// Scene the player stood on.
    pub scene_id: SceneId,
    /// When the save was made.
    pub created_at: DateTime<Utc>,
}

impl SaveGame {
    /// Captures `game` without touching it.
    #[must_use]
    pub fn capture(game: &Game, created_at: DateTime<Utc>) -> Self {
        Self {
            workspace_id: game.workspace().id().to_owned(),
            content_hash: game.workspace().content_hash().to_owned(),
            player: game.player().snapshot(),
            scene_id: game.current_scene_id(),
            created_at,
        }
    }
}

/// Where a save landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveGameHandle {
    /// Full path of the save file.
    pub path: PathBuf,
    /// Creation time encoded in the file name.
    pub created_at: DateTime<Utc>,
}

/// `<adventure name without whitespace>#<timestamp>.saveGame.json`.
///
/// Path separators, `:` and `#` in the name become `_` so the name stays a
/// single file component and the timestamp can be split back off.
#[must_use]
pub fn save_file_name(adventure_name: &str, created_at: DateTime<Utc>) -> String {
    let mut stem: String = adventure_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if matches!(c, '/' | '\\' | ':' | '#') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        stem.push_str("adventure");
    }
    format!("{stem}#{}{SAVE_SUFFIX}", created_at.format(TIMESTAMP_FORMAT))
}

/// Splits a save file name back into its adventure stem and timestamp.
#[must_use]
pub fn parse_save_file_name(file_name: &str) -> Option<(&str, DateTime<Utc>)> {
    let stem = file_name.strip_suffix(SAVE_SUFFIX)?;
    let (name, stamp) = stem.rsplit_once('#')?;
    let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(stamp, LEGACY_TIMESTAMP_FORMAT))
        .ok()?
        .and_utc();
    Some((name, created_at))
}

/// Whether `file_name` follows the save naming convention.
#[must_use]
pub fn is_save_file_name(file_name: &str) -> bool {
    file_name.ends_with(SAVE_SUFFIX)
}
