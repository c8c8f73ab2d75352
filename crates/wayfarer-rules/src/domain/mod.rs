//! Domain layer for the Rules & Resolution context.

pub mod combat;

/// Faces on each die.
pub const DIE_FACES: u32 = 6;
