//! Shared test doubles and fixtures for the Wayfarer engine.
//!
//! Depends on `wayfarer-core` only, so every context crate can use it as a
//! dev-dependency without pulling in a second copy of itself.

mod clock;
pub mod fixtures;
mod recorder;
mod rng;

pub use clock::{FixedClock, fixed_time};
pub use recorder::Recorder;
pub use rng::{MockRng, SequenceRng};
