//! Wayfarer: Session & Progress bounded context.
//!
//! Owns the game controller: the current scene, the current player, and the
//! rules for moving between scenes and resolving gates.

pub mod domain;
