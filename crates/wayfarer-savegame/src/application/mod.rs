//! Application layer: saving, opening and listing save games.

pub mod manager;
pub mod opened;
