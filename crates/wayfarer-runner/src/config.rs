//! Runner configuration from the environment.

use std::path::PathBuf;

use wayfarer_rules::domain::combat::{CombatRules, InstantKill};
use wayfarer_session::domain::options::SessionOptions;

use crate::error::AppError;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Adventure YAML (or a save file) to open.
    pub adventure: PathBuf,
    /// Where saves are written.
    pub save_dir: PathBuf,
    /// Dice seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Instant-kill pattern for combat.
    pub instant_kill: InstantKill,
}

impl Config {
    /// Reads `WAYFARER_*` variables; the first CLI argument overrides
    /// `WAYFARER_ADVENTURE`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a value is missing or unparsable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    /// Builds a config from an optional argument and a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a value is missing or unparsable.
    pub fn from_lookup(
        argument: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let adventure = argument
            .or_else(|| lookup("WAYFARER_ADVENTURE"))
            .ok_or_else(|| {
                AppError::Config(
                    "WAYFARER_ADVENTURE must be set or an adventure path given as argument"
                        .to_owned(),
                )
            })?;
        let save_dir = lookup("WAYFARER_SAVE_DIR").unwrap_or_else(|| "saves".to_owned());
        let seed = lookup("WAYFARER_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| AppError::Config(format!("WAYFARER_SEED must be a valid u64: {e}")))
            })
            .transpose()?;
        let instant_kill = match lookup("WAYFARER_INSTANT_KILL").as_deref() {
            None | Some("off") => InstantKill::Disabled,
            Some(raw) => match raw.parse::<u32>() {
                Ok(face @ 1..=6) => InstantKill::DoubleOf(face),
                _ => {
                    return Err(AppError::Config(format!(
                        "WAYFARER_INSTANT_KILL must be `off` or a die face 1-6, got {raw:?}"
                    )));
                }
            },
        };

        Ok(Self {
            adventure: PathBuf::from(adventure),
            save_dir: PathBuf::from(save_dir),
            seed,
            instant_kill,
        })
    }

    /// Fresh session options; each new or restored session gets its own.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::seeded(self.seed).with_rules(CombatRules {
            instant_kill: self.instant_kill,
        })
    }
}
