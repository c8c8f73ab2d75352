//! Wayfarer Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: dice, time, errors and typed event channels. It
//! contains no I/O.

pub mod clock;
pub mod error;
pub mod event;
pub mod rng;
