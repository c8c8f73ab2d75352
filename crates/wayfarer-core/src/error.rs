//! Domain error types.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed underlying cause carried by persistence failures.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A path or gate references a scene id the adventure does not define.
    #[error("scene {scene_id}: {origin} references unknown scene {target_id}")]
    ContentReference {
        /// The scene declaring the dangling reference.
        scene_id: u32,
        /// Which part of the scene holds the reference (e.g. "path 2").
        origin: String,
        /// The scene id that could not be resolved.
        target_id: u32,
    },

    /// The adventure document is malformed.
    #[error("content error: {0}")]
    Content(String),

    /// Reading or writing a save document failed.
    #[error("persistence error: {message}")]
    Persistence {
        /// What was being attempted.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<BoxedCause>,
    },

    /// An operation was invoked with arguments or in a state correct callers
    /// never produce.
    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl DomainError {
    /// Wraps `source` as a persistence failure with a context message.
    pub fn persistence<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Self::Persistence {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A persistence failure with no underlying cause.
    pub fn persistence_msg(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            source: None,
        }
    }
}
