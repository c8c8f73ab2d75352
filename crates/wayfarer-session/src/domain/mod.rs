//! Domain layer for the Session & Progress context.

pub mod entry_actions;
pub mod events;
pub mod game;
pub mod options;
