//! Wayfarer: Rules & Resolution bounded context.
//!
//! Responsible for the dice: resolving one combat round between two
//! combatants and rolling skill tests. All randomness comes from an
//! injected `DeterministicRng`.

pub mod domain;
