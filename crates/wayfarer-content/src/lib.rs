//! Wayfarer: Scene Graph & content loading bounded context.
//!
//! Responsible for the authored adventure: scenes, the paths between them,
//! combat and skill-test gates, and loading/validating adventure documents
//! into an immutable graph.

pub mod application;
pub mod domain;
