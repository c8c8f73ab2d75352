//! File-backed save games for the Wayfarer engine.
//!
//! A save game is a JSON document holding a value snapshot of the player and
//! the scene they stood on. Opening one builds a brand-new session; the
//! caller swaps it in only once the whole restore has succeeded.

pub mod application;
pub mod domain;
