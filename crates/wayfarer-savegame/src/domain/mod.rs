//! Domain layer for save games.

pub mod save_game;
