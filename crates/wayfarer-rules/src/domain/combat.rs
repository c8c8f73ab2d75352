//! Combat round resolution.

use tracing::debug;
use wayfarer_character::domain::combatant::Combatant;
use wayfarer_character::domain::events::{AttackResult, RoundEnded, RoundOutcome};
use wayfarer_core::rng::DeterministicRng;

use super::DIE_FACES;

/// Dice pattern on the attacker's roll that kills the defender outright.
///
/// This is an authoring/tuning parameter, not a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstantKill {
    /// No roll kills instantly.
    #[default]
    Disabled,
    /// Both dice showing this face (e.g. `DoubleOf(6)` for double six).
    DoubleOf(u32),
}

impl InstantKill {
    /// Whether `(die1, die2)` matches the pattern.
    #[must_use]
    pub fn matches(self, die1: u32, die2: u32) -> bool {
        match self {
            Self::Disabled => false,
            Self::DoubleOf(face) => die1 == face && die2 == face,
        }
    }
}

/// Tunable combat parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombatRules {
    /// Instant-kill pattern for the attacker's roll.
    pub instant_kill: InstantKill,
}

/// Both sides' rolls for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// The attacker's roll, classified against the defender's.
    pub attacker: AttackResult,
    /// The defender's roll, classified against the attacker's.
    pub defender: AttackResult,
}

impl CombatRules {
    /// Resolves one attack round.
    ///
    /// 1. The attacker rolls two dice; force is the dice sum plus skill.
    /// 2. If the roll matches the instant-kill pattern the defender's stamina
    ///    drops to zero at once, whatever the comparison below yields.
    /// 3. The defender rolls the same way.
    /// 4. The strictly stronger side deals its damage to the other; a tie
    ///    hurts nobody.
    /// 5. Each roll is classified against the other.
    /// 6. Each side's attack-result handlers get their own roll; only the
    ///    attacker's handlers hear that the round ended.
    ///
    /// Stamina changes go through `set_stamina`, so stat-change handlers see
    /// them like any other mutation.
    pub fn resolve_round(
        &self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        rng: &mut dyn DeterministicRng,
    ) -> RoundReport {
        let mut attacker_roll = roll(attacker, rng);
        if self
            .instant_kill
            .matches(attacker_roll.die1, attacker_roll.die2)
        {
            attacker_roll.instant_kill = true;
            defender.set_stamina(0);
        }

        let mut defender_roll = roll(defender, rng);

        match attacker_roll.force.cmp(&defender_roll.force) {
            std::cmp::Ordering::Greater => {
                defender.set_stamina(defender.stamina().saturating_sub(attacker.damage()));
            }
            std::cmp::Ordering::Less => {
                attacker.set_stamina(attacker.stamina().saturating_sub(defender.damage()));
            }
            std::cmp::Ordering::Equal => {}
        }

        attacker_roll.outcome = RoundOutcome::classify(attacker_roll.force, defender_roll.force);
        defender_roll.outcome = RoundOutcome::classify(defender_roll.force, attacker_roll.force);

        debug!(
            attacker = attacker.name(),
            attacker_force = attacker_roll.force,
            defender = defender.name(),
            defender_force = defender_roll.force,
            instant_kill = attacker_roll.instant_kill,
            "combat round resolved"
        );

        attacker.notify_attack_result(&attacker_roll);
        defender.notify_attack_result(&defender_roll);
        attacker.notify_round_ended(&RoundEnded {
            attacker: attacker.id(),
            defender: defender.id(),
        });

        RoundReport {
            attacker: attacker_roll,
            defender: defender_roll,
        }
    }
}

fn roll(combatant: &Combatant, rng: &mut dyn DeterministicRng) -> AttackResult {
    let die1 = rng.next_u32_range(1, DIE_FACES);
    let die2 = rng.next_u32_range(1, DIE_FACES);
    let skill_level = combatant.skill_level();
    AttackResult {
        combatant: combatant.id(),
        die1,
        die2,
        skill_level,
        force: dice_force(die1, die2).saturating_add(skill_level),
        instant_kill: false,
        outcome: RoundOutcome::Tie,
    }
}

/// Two dice never exceed 12, so the sum always fits in an `i32`.
fn dice_force(die1: u32, die2: u32) -> i32 {
    i32::try_from(die1 + die2).unwrap_or(i32::MAX)
}
