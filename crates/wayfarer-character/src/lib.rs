//! Wayfarer: Combatant & Skill bounded context.
//!
//! Responsible for the stat holders that fight: stamina, damage and named
//! skill levels, plus the change notifications every mutation emits.

pub mod domain;
