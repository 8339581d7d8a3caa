//! Equipment, ticks, character lifecycle, persistence and event dispatch.

use super::events::{DotTick, EventEffect, InboundEvent, TickReport, TimedEvent};
use super::{ClassEngine, Loadout};
use crate::combat::EquipEvent;
use crate::effects::{BuffCleanup, EffectKey, RemovalReason};
use crate::perks::{PerkMutation, evaluate_periodic, gated_rows};
use crate::state::{CharacterId, GameTime};
#[cfg(feature = "serde")]
use crate::{
    class::ClassId,
    error::PersistenceError,
    persistence::CharacterSnapshot,
};

impl ClassEngine {
    pub fn on_equip_changed(&mut self, event: &EquipEvent) {
        self.state_mut(event.character).loadout = Loadout {
            weapon: Some(event.weapon),
            offhand: event.offhand,
        };
    }

    /// Clears every buff on `character`, firing cleanup for each, and drops
    /// combo and charge state. Progress and class selection survive.
    pub fn on_character_died(
        &mut self,
        character: CharacterId,
        cleanup: &mut impl BuffCleanup,
    ) -> usize {
        if let Some(state) = self.characters.get_mut(&character) {
            state.perks.counters.clear();
            state.perks.meters.clear();
        }
        self.ledger.clear_all(character, RemovalReason::Died, cleanup)
    }

    /// Forgets `character` entirely after clearing its buffs with cleanup.
    pub fn on_character_removed(
        &mut self,
        character: CharacterId,
        cleanup: &mut impl BuffCleanup,
    ) -> usize {
        self.characters.remove(&character);
        self.ledger.clear_all(character, RemovalReason::Removed, cleanup)
    }

    /// Periodic maintenance.
    ///
    /// Expired buffs are swept on every call; the sweep is idempotent, so
    /// calling more often than the tick interval is harmless. Poison damage
    /// and periodic perks fire at most once per interval.
    pub fn on_tick(&mut self, now: GameTime, cleanup: &mut impl BuffCleanup) -> TickReport {
        let mut report = TickReport {
            expired: self.ledger.sweep(now, cleanup),
            ..TickReport::default()
        };

        let interval = self.config.sweep_interval_ms;
        if self.last_dot_tick.is_none_or(|last| now.since(last) >= interval) {
            self.last_dot_tick = Some(now);
            report.dots = self
                .ledger
                .characters()
                .filter_map(|target| {
                    let poison = self.ledger.get(target, EffectKey::POISON)?;
                    (!poison.is_expired(now) && poison.magnitude > 0.0).then(|| DotTick {
                        target,
                        source: poison.source,
                        damage: poison.magnitude,
                        stacks: poison.stacks,
                    })
                })
                .collect();
        }

        let mut mutations = Vec::new();
        for (&owner, state) in &self.characters {
            let gear = state.loadout.categories();
            let rows = gated_rows(state.class_levels(), |d| d.matches_any(gear));
            mutations.extend(evaluate_periodic(&rows, owner, now, &state.perks));
        }
        for mutation in mutations {
            match mutation {
                PerkMutation::Grant {
                    recipient,
                    spec,
                    ..
                } => {
                    self.grant(recipient, spec, now);
                    report.granted.push((recipient, spec.key));
                }
                other => self.commit_bookkeeping(other),
            }
        }

        let timeout = self.config.combo_timeout_ms;
        report.combos_reset = self
            .characters
            .values_mut()
            .map(|s| s.perks.expire_counters(now, timeout))
            .sum();

        report
    }

    /// Encodes `character`'s progress and class selection. Unknown
    /// characters encode as an empty record.
    #[cfg(feature = "serde")]
    pub fn serialize_character(&self, character: CharacterId) -> Result<Vec<u8>, PersistenceError> {
        let snapshot = match self.characters.get(&character) {
            Some(state) => CharacterSnapshot::capture(&state.progress, &state.active),
            None => CharacterSnapshot::default(),
        };
        snapshot.encode()
    }

    /// Replaces `character`'s progress and class selection from `blob`.
    ///
    /// A corrupt blob leaves the character on a fresh default record and
    /// returns the error so the caller can log it. On success, returns the
    /// active entries that had to be dropped to keep the class cap valid.
    #[cfg(feature = "serde")]
    pub fn restore_character(
        &mut self,
        character: CharacterId,
        blob: &[u8],
    ) -> Result<Vec<ClassId>, PersistenceError> {
        let decoded = CharacterSnapshot::decode(blob);
        let config = self.config.clone();
        let state = self.state_mut(character);
        match decoded {
            Ok(snapshot) => {
                let restored = snapshot.restore(&config);
                state.progress = restored.progress;
                state.active = restored.active;
                Ok(restored.dropped)
            }
            Err(error) => {
                state.progress = Default::default();
                state.active = Default::default();
                Err(error)
            }
        }
    }

    /// Routes one scripted event to the matching entry point.
    pub fn handle(&mut self, timed: &TimedEvent, cleanup: &mut impl BuffCleanup) -> EventEffect {
        let now = timed.at;
        match &timed.event {
            InboundEvent::AddXp {
                character,
                class,
                amount,
            } => EventEffect::Level(self.add_xp(*character, *class, *amount)),
            InboundEvent::SetActiveClass { character, class } => {
                self.set_sole_active_class(*character, *class);
                EventEffect::Activation(Ok(()))
            }
            InboundEvent::AddActiveClass { character, class } => {
                EventEffect::Activation(self.add_active_class(*character, *class))
            }
            InboundEvent::RemoveActiveClass { character, class } => {
                EventEffect::Deactivated(self.remove_active_class(*character, *class))
            }
            InboundEvent::ResetClassProgress { character, class } => {
                EventEffect::Reset(self.reset_class_progress(*character, *class))
            }
            InboundEvent::Equip(event) => {
                self.on_equip_changed(event);
                EventEffect::Equipped
            }
            InboundEvent::DamageAboutToApply(event) => {
                EventEffect::Damage(self.on_damage_about_to_apply(event, now))
            }
            InboundEvent::DamageApplied(applied) => {
                EventEffect::Applied(self.on_damage_applied(applied))
            }
            InboundEvent::BlockSucceeded(event) => {
                EventEffect::Block(self.on_block_succeeded(event, now))
            }
            InboundEvent::CharacterDied { character } => {
                EventEffect::Cleared(self.on_character_died(*character, cleanup))
            }
            InboundEvent::CharacterRemoved { character } => {
                EventEffect::Cleared(self.on_character_removed(*character, cleanup))
            }
            InboundEvent::Tick => EventEffect::Tick(self.on_tick(now, cleanup)),
        }
    }
}
