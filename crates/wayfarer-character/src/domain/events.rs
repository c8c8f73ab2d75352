//! Events emitted by combatants.

use super::combatant::CombatantId;

/// Emitted by every stat mutator, whether or not the value actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChanged {
    /// The combatant whose stat changed.
    pub combatant: CombatantId,
    /// The field name: `Stamina`, `Damage` or the skill name.
    pub field: String,
    /// Value before the mutation.
    pub previous: i32,
    /// Value after the mutation.
    pub current: i32,
    /// Human-readable description, e.g. `Stamina was 12, now is 10`.
    pub message: String,
}

impl StatChanged {
    pub(crate) fn new(combatant: CombatantId, field: &str, previous: i32, current: i32) -> Self {
        Self {
            combatant,
            field: field.to_owned(),
            previous,
            current,
            message: format!("{field} was {previous}, now is {current}"),
        }
    }
}

/// How one side's roll compares to the opposing roll in the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Strictly higher force.
    Win,
    /// Strictly lower force.
    Lose,
    /// Equal forces; nobody is hurt.
    Tie,
}

impl RoundOutcome {
    /// Classifies `force` against `opposing_force`.
    #[must_use]
    pub fn classify(force: i32, opposing_force: i32) -> Self {
        match force.cmp(&opposing_force) {
            std::cmp::Ordering::Greater => Self::Win,
            std::cmp::Ordering::Less => Self::Lose,
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }
}

/// One combatant's roll in a combat round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackResult {
    /// The combatant who rolled.
    pub combatant: CombatantId,
    /// First die, in `[1, 6]`.
    pub die1: u32,
    /// Second die, in `[1, 6]`.
    pub die2: u32,
    /// Combat skill level at the time of the roll.
    pub skill_level: i32,
    /// Dice sum plus skill level.
    pub force: i32,
    /// The roll matched the instant-kill pattern.
    pub instant_kill: bool,
    /// Outcome relative to the opposing roll.
    pub outcome: RoundOutcome,
}

impl AttackResult {
    /// Sum of both dice, without the skill bonus.
    #[must_use]
    pub fn dice_total(&self) -> u32 {
        self.die1 + self.die2
    }
}

/// Emitted to the attacker's listeners once a round is fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEnded {
    /// The combatant who initiated the round.
    pub attacker: CombatantId,
    /// The opposing combatant.
    pub defender: CombatantId,
}
