//! The combatant: a stat holder that emits change notifications.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::error::DomainError;
use wayfarer_core::event::{EventChannel, Handler};

use super::events::{AttackResult, RoundEnded, StatChanged};
use super::skill::{COMBAT_SKILL, Skill};

/// Damage dealt per winning round when none is authored.
pub const DEFAULT_DAMAGE: i32 = 2;

const STAMINA_FIELD: &str = "Stamina";
const DAMAGE_FIELD: &str = "Damage";

/// Process-local identity of a combatant instance.
///
/// Never persisted: a restored or copied combatant always gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombatantId(Uuid);

impl CombatantId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Serializable value snapshot of a combatant: stats and skills only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Combatant name.
    pub name: String,
    /// Stamina at snapshot time.
    pub stamina: i32,
    /// Per-hit damage at snapshot time.
    pub damage: i32,
    /// All skills, the combat skill included.
    pub skills: Vec<Skill>,
}

/// An entity with stamina, damage and skills that can fight.
///
/// Every mutator emits a [`StatChanged`] to the stat-change channel.
#[derive(Debug)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    /// Index 0 is always the combat skill.
    skills: Vec<Skill>,
    stamina: i32,
    damage: i32,
    stat_changed: EventChannel<StatChanged>,
    attack_results: EventChannel<AttackResult>,
    round_ended: EventChannel<RoundEnded>,
}

impl Combatant {
    /// Creates a combatant with the default damage.
    #[must_use]
    pub fn new(name: impl Into<String>, combat_skill_level: i32, stamina: i32) -> Self {
        let mut combatant = Self {
            id: CombatantId::new(),
            name: name.into(),
            skills: vec![Skill::new(COMBAT_SKILL, combat_skill_level)],
            stamina,
            damage: DEFAULT_DAMAGE,
            stat_changed: EventChannel::new(),
            attack_results: EventChannel::new(),
            round_ended: EventChannel::new(),
        };
        combatant.rebind_skills();
        combatant
    }

    /// Sets the initial damage without emitting an event.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    /// Adds (or replaces) a named skill without emitting an event.
    ///
    /// Passing the combat skill name replaces the combat skill level.
    #[must_use]
    pub fn with_skill(mut self, name: impl Into<String>, level: i32) -> Self {
        let mut skill = Skill::new(name, level);
        skill.bind(self.id);
        match self.skills.iter_mut().find(|s| s.name() == skill.name()) {
            Some(existing) => *existing = skill,
            None => self.skills.push(skill),
        }
        self
    }

    /// Rebuilds a combatant from a snapshot, binding every skill to the new
    /// instance. Listener channels start empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Precondition` if the snapshot has no combat skill.
    pub fn from_snapshot(snapshot: PlayerSnapshot) -> Result<Self, DomainError> {
        let PlayerSnapshot {
            name,
            stamina,
            damage,
            mut skills,
        } = snapshot;

        let combat_index = skills
            .iter()
            .position(|s| s.name() == COMBAT_SKILL)
            .ok_or_else(|| {
                DomainError::Precondition(format!("combatant {name} has no {COMBAT_SKILL} skill"))
            })?;
        skills.swap(0, combat_index);

        let mut combatant = Self {
            id: CombatantId::new(),
            name,
            skills,
            stamina,
            damage,
            stat_changed: EventChannel::new(),
            attack_results: EventChannel::new(),
            round_ended: EventChannel::new(),
        };
        combatant.rebind_skills();
        Ok(combatant)
    }

    /// Captures stats and skills. Listeners are never part of a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            stamina: self.stamina,
            damage: self.damage,
            skills: self.skills.iter().map(Skill::unbound).collect(),
        }
    }

    /// Points every skill's owner back-reference at this instance.
    pub fn rebind_skills(&mut self) {
        let id = self.id;
        for skill in &mut self.skills {
            skill.bind(id);
        }
    }

    /// Independent copy with identical stats and no listeners.
    #[must_use]
    pub fn create_copy(&self) -> Self {
        let mut copy = Self {
            id: CombatantId::new(),
            name: self.name.clone(),
            skills: self.skills.clone(),
            stamina: self.stamina,
            damage: self.damage,
            stat_changed: EventChannel::new(),
            attack_results: EventChannel::new(),
            round_ended: EventChannel::new(),
        };
        copy.rebind_skills();
        copy
    }

    /// This instance's identity.
    #[must_use]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    /// Combatant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current stamina.
    #[must_use]
    pub fn stamina(&self) -> i32 {
        self.stamina
    }

    /// Damage dealt on winning a round.
    #[must_use]
    pub fn damage(&self) -> i32 {
        self.damage
    }

    /// Current combat skill level.
    #[must_use]
    pub fn skill_level(&self) -> i32 {
        self.skills[0].level()
    }

    /// All skills, the combat skill first.
    #[must_use]
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Looks up a skill by name.
    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name() == name)
    }

    /// `true` once stamina has dropped to zero or below.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.stamina <= 0
    }

    /// Sets the combat skill level and emits a change event.
    pub fn set_skill_level(&mut self, level: i32) {
        let previous = self.skills[0].level();
        self.skills[0].set_level(level);
        self.fire(COMBAT_SKILL, previous, level);
    }

    /// Sets stamina and emits a change event.
    pub fn set_stamina(&mut self, stamina: i32) {
        let previous = self.stamina;
        self.stamina = stamina;
        self.fire(STAMINA_FIELD, previous, stamina);
    }

    /// Sets damage and emits a change event.
    pub fn set_damage(&mut self, damage: i32) {
        let previous = self.damage;
        self.damage = damage;
        self.fire(DAMAGE_FIELD, previous, damage);
    }

    /// Registers a stat-change handler. Returns `false` if already registered.
    pub fn subscribe_stat_changes(&mut self, handler: Handler<StatChanged>) -> bool {
        self.stat_changed.subscribe(handler)
    }

    /// Registers an attack-result handler. Re-adding the same handler is a no-op.
    pub fn subscribe_attack_results(&mut self, handler: Handler<AttackResult>) -> bool {
        self.attack_results.subscribe(handler)
    }

    /// Registers a round-ended handler. Re-adding the same handler is a no-op.
    pub fn subscribe_round_ended(&mut self, handler: Handler<RoundEnded>) -> bool {
        self.round_ended.subscribe(handler)
    }

    /// Removes all stat-change handlers. Attack-result and round-ended
    /// handlers are left in place.
    pub fn clear_listeners(&mut self) {
        self.stat_changed.clear();
    }

    /// Moves the stat-change handlers of `previous` onto this combatant.
    pub fn adopt_stat_listeners(&mut self, previous: &mut Combatant) {
        self.stat_changed = previous.stat_changed.take();
    }

    /// Number of stat-change handlers.
    #[must_use]
    pub fn stat_listener_count(&self) -> usize {
        self.stat_changed.len()
    }

    /// Number of attack-result handlers.
    #[must_use]
    pub fn attack_listener_count(&self) -> usize {
        self.attack_results.len()
    }

    /// Delivers `result` to this combatant's attack-result handlers.
    pub fn notify_attack_result(&self, result: &AttackResult) {
        self.attack_results.publish(result);
    }

    /// Delivers a round-ended notification to this combatant's handlers.
    pub fn notify_round_ended(&self, event: &RoundEnded) {
        self.round_ended.publish(event);
    }

    fn fire(&self, field: &str, previous: i32, current: i32) {
        tracing::trace!(combatant = %self.name, field, previous, current, "stat changed");
        self.stat_changed
            .publish(&StatChanged::new(self.id, field, previous, current));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::domain::events::RoundOutcome;
    use wayfarer_test_support::Recorder;

    fn hero() -> Combatant {
        Combatant::new("Hero", 10, 20)
            .with_damage(3)
            .with_skill("Luck", 8)
    }

    #[test]
    fn test_is_dead_tracks_non_positive_stamina() {
        for stamina in [-5, -1, 0] {
            assert!(Combatant::new("x", 1, stamina).is_dead(), "stamina {stamina}");
        }
        for stamina in [1, 2, 40] {
            assert!(!Combatant::new("x", 1, stamina).is_dead(), "stamina {stamina}");
        }
    }

    #[test]
    fn test_setters_emit_field_previous_and_new_value() {
        let recorder = Recorder::<StatChanged>::new();
        let mut combatant = hero();
        combatant.subscribe_stat_changes(recorder.handler());

        combatant.set_stamina(18);
        combatant.set_damage(4);
        combatant.set_skill_level(11);

        let events = recorder.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].field, "Stamina");
        assert_eq!((events[0].previous, events[0].current), (20, 18));
        assert_eq!(events[1].field, "Damage");
        assert_eq!((events[1].previous, events[1].current), (3, 4));
        assert_eq!(events[2].field, "Combat");
        assert_eq!((events[2].previous, events[2].current), (10, 11));
        assert_eq!(events[2].message, "Combat was 10, now is 11");
        assert!(events.iter().all(|e| e.combatant == combatant.id()));
    }

    #[test]
    fn test_setter_emits_even_when_value_is_unchanged() {
        let recorder = Recorder::<StatChanged>::new();
        let mut combatant = hero();
        combatant.subscribe_stat_changes(recorder.handler());

        combatant.set_stamina(20);

        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_stat_listeners_notified_in_registration_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut combatant = hero();
        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            combatant.subscribe_stat_changes(Rc::new(move |_: &StatChanged| {
                order.borrow_mut().push(tag);
            }));
        }

        combatant.set_damage(1);

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_create_copy_has_equal_stats_and_no_listeners() {
        let recorder = Recorder::<StatChanged>::new();
        let attacks = Recorder::<AttackResult>::new();
        let mut original = hero();
        original.subscribe_stat_changes(recorder.handler());
        original.subscribe_attack_results(attacks.handler());

        let copy = original.create_copy();

        assert_eq!(copy.name(), "Hero");
        assert_eq!(copy.stamina(), 20);
        assert_eq!(copy.damage(), 3);
        assert_eq!(copy.skill_level(), 10);
        assert_eq!(copy.skill("Luck").map(Skill::level), Some(8));
        assert_eq!(copy.stat_listener_count(), 0);
        assert_eq!(copy.attack_listener_count(), 0);
        assert_ne!(copy.id(), original.id());
        assert!(copy.skills().iter().all(|s| s.owner() == Some(copy.id())));
    }

    #[test]
    fn test_mutating_copy_leaves_original_untouched() {
        let original_events = Recorder::<StatChanged>::new();
        let mut original = hero();
        original.subscribe_stat_changes(original_events.handler());
        let mut copy = original.create_copy();

        copy.set_stamina(1);
        copy.set_damage(9);
        copy.set_skill_level(2);
        original.set_stamina(15);

        assert_eq!(original.stamina(), 15);
        assert_eq!(original.damage(), 3);
        assert_eq!(original.skill_level(), 10);
        assert_eq!(copy.stamina(), 1);
        assert_eq!(original_events.len(), 1);
    }

    #[test]
    fn test_attack_listener_added_twice_is_notified_once() {
        let attacks = Recorder::<AttackResult>::new();
        let mut combatant = hero();
        let handler = attacks.handler();

        assert!(combatant.subscribe_attack_results(Rc::clone(&handler)));
        assert!(!combatant.subscribe_attack_results(handler));
        combatant.notify_attack_result(&AttackResult {
            combatant: combatant.id(),
            die1: 3,
            die2: 4,
            skill_level: 10,
            force: 17,
            instant_kill: false,
            outcome: RoundOutcome::Win,
        });

        assert_eq!(attacks.len(), 1);
    }

    #[test]
    fn test_clear_listeners_keeps_attack_listeners() {
        let stats = Recorder::<StatChanged>::new();
        let attacks = Recorder::<AttackResult>::new();
        let mut combatant = hero();
        combatant.subscribe_stat_changes(stats.handler());
        combatant.subscribe_attack_results(attacks.handler());

        combatant.clear_listeners();
        combatant.set_stamina(3);

        assert!(stats.is_empty());
        assert_eq!(combatant.attack_listener_count(), 1);
    }

    #[test]
    fn test_snapshot_round_trip_rebinds_skills_to_new_instance() {
        let original = hero();
        let snapshot = original.snapshot();
        assert!(snapshot.skills.iter().all(|s| s.owner().is_none()));

        let restored = Combatant::from_snapshot(snapshot).unwrap();

        assert_eq!(restored.name(), "Hero");
        assert_eq!(restored.stamina(), 20);
        assert_eq!(restored.damage(), 3);
        assert_eq!(restored.skill_level(), 10);
        assert_eq!(restored.skill("Luck").map(Skill::level), Some(8));
        assert_ne!(restored.id(), original.id());
        assert!(restored.skills().iter().all(|s| s.owner() == Some(restored.id())));
        assert_eq!(restored.stat_listener_count(), 0);
    }

    #[test]
    fn test_from_snapshot_moves_combat_skill_first() {
        let snapshot = PlayerSnapshot {
            name: "Hero".to_owned(),
            stamina: 5,
            damage: 2,
            skills: vec![Skill::new("Luck", 7), Skill::new("Combat", 9)],
        };

        let restored = Combatant::from_snapshot(snapshot).unwrap();

        assert_eq!(restored.skill_level(), 9);
        assert_eq!(restored.skills()[1].name(), "Luck");
    }

    #[test]
    fn test_from_snapshot_without_combat_skill_is_rejected() {
        let snapshot = PlayerSnapshot {
            name: "Ghost".to_owned(),
            stamina: 5,
            damage: 2,
            skills: vec![Skill::new("Luck", 7)],
        };

        let result = Combatant::from_snapshot(snapshot);

        match result.unwrap_err() {
            DomainError::Precondition(msg) => assert!(msg.contains("Ghost")),
            other => panic!("expected Precondition, got {other:?}"),
        }
    }

    #[test]
    fn test_adopt_stat_listeners_moves_handlers() {
        let stats = Recorder::<StatChanged>::new();
        let mut old = hero();
        old.subscribe_stat_changes(stats.handler());
        let mut fresh = Combatant::new("Hero", 10, 20);

        fresh.adopt_stat_listeners(&mut old);
        fresh.set_stamina(19);
        old.set_stamina(1);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats.events()[0].combatant, fresh.id());
    }
}
