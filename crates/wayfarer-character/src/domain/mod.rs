//! Domain layer for the Combatant & Skill context.

pub mod combatant;
pub mod events;
pub mod skill;
