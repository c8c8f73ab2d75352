//! Application layer for the Scene Graph context.

pub mod loader;
