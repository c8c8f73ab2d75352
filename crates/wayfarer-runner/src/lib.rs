//! Wayfarer terminal runner.
//!
//! A thin presentation layer over the session API: reads commands from a
//! line-oriented input, prints scenes and events to an output.

pub mod command;
pub mod config;
pub mod error;
pub mod play;
