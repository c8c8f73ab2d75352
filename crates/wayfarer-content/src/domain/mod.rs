//! Domain layer for the Scene Graph context.

pub mod adventure;
pub mod scene;
