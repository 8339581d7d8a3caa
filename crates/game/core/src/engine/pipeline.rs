//! Damage and block resolution.
//!
//! Every hit runs three stages in a fixed order:
//!
//! 1. **Offense**: class bonuses and damage-boost buffs first, then the
//!    attacker's triggered perks in ascending unlock level.
//! 2. **Defense**: the defender's capped reduction scales the offensive
//!    multiplier. True damage bypasses it.
//! 3. **Post**: buff grants, poison, counters and area pulses are committed.
//!
//! Rows are evaluated against the state as it was when the hit arrived, so
//! nothing committed in stage 3 can change stages 1 or 2 of the same hit.

use super::events::{BlockOutcome, DamageOutcome, DamageStage, SpeedChange, TriggeredPerk};
use super::{CharacterState, ClassEngine};
use crate::class::{ClassDefinition, WeaponCategories};
use crate::combat::{AppliedDamage, BlockEvent, DamageEvent, HitTraits, compose_multiplier};
use crate::effects::{BuffSpec, EffectKind};
use crate::perks::{
    BlockContext, HitContext, PerkMutation, apply_poison, evaluate_block, evaluate_hit, gated_rows,
};
use crate::progression::LevelChange;
use crate::state::{CharacterId, GameTime};

impl ClassEngine {
    /// Resolves a hit before the host applies it.
    pub fn on_damage_about_to_apply(
        &mut self,
        event: &DamageEvent,
        now: GameTime,
    ) -> DamageOutcome {
        let traits = HitTraits::classify(event);
        let mut outcome = DamageOutcome::neutral(traits);

        // ===== stage 1: offense =====
        let empty = CharacterState::default();
        let attacker = self.characters.get(&event.attacker).unwrap_or(&empty);
        let classes = attacker.class_levels();

        let mut bonus = compose_multiplier(event.weapon, classes.iter().copied()) - 1.0;
        bonus += self
            .ledger
            .active(event.attacker, now)
            .filter(|b| b.key.kind == EffectKind::DamageBoost)
            .map(|b| b.magnitude)
            .sum::<f32>();

        let rows = gated_rows(classes, |d| d.matches(event.weapon));
        let ctx = HitContext {
            event,
            traits,
            now,
            ledger: &self.ledger,
            state: &attacker.perks,
            config: &self.config,
        };
        let mutations = evaluate_hit(&rows, &ctx);

        for mutation in mutations.iter().filter(|m| m.is_offense()) {
            match *mutation {
                PerkMutation::Bonus { fraction, .. } => bonus += fraction,
                PerkMutation::TrueDamage { amount, .. } => outcome.true_damage += amount,
                PerkMutation::Elemental { kind, amount, .. } => outcome.extra.add(kind, amount),
                _ => {}
            }
            outcome.triggered.push(TriggeredPerk {
                perk: mutation.perk(),
                stage: DamageStage::Offense,
            });
        }
        outcome.offense_multiplier = (1.0 + bonus).max(0.0);

        // ===== stage 2: defense =====
        outcome.reduction = self.damage_reduction(event.target, now);
        outcome.multiplier = outcome.offense_multiplier * (1.0 - outcome.reduction);

        // ===== stage 3: post =====
        for mutation in mutations.into_iter().filter(|m| !m.is_offense()) {
            if !mutation.is_bookkeeping() {
                outcome.triggered.push(TriggeredPerk {
                    perk: mutation.perk(),
                    stage: DamageStage::Post,
                });
            }
            self.commit_hit_mutation(mutation, now, &mut outcome);
        }

        outcome
    }

    fn commit_hit_mutation(
        &mut self,
        mutation: PerkMutation,
        now: GameTime,
        outcome: &mut DamageOutcome,
    ) {
        match mutation {
            PerkMutation::Grant {
                recipient,
                spec,
                ..
            } => {
                if let Some(change) = self.grant(recipient, spec, now) {
                    outcome.speed_changes.push(change);
                }
            }
            PerkMutation::Poison {
                target,
                source,
                skill,
                baseline,
                ..
            } => {
                let application = apply_poison(
                    &mut self.ledger,
                    target,
                    source,
                    skill,
                    baseline,
                    now,
                    &self.config.poison,
                );
                outcome.speed_changes.push(SpeedChange {
                    character: target,
                    baseline: application.baseline,
                    multiplier: self.movement_multiplier(target, now),
                });
                outcome.poison = Some(application);
            }
            PerkMutation::Area { pulse, .. } => outcome.area_pulses.push(pulse),
            other => self.commit_bookkeeping(other),
        }
    }

    /// Applies a buff grant; movement effects also report the new speed.
    pub(super) fn grant(
        &mut self,
        recipient: CharacterId,
        spec: BuffSpec,
        now: GameTime,
    ) -> Option<SpeedChange> {
        let baseline = self.ledger.trigger(recipient, spec, now).baseline;
        matches!(
            spec.key.kind,
            EffectKind::MovementSlow | EffectKind::MovementDisable
        )
        .then(|| SpeedChange {
            character: recipient,
            baseline,
            multiplier: self.movement_multiplier(recipient, now),
        })
    }

    pub(super) fn commit_bookkeeping(&mut self, mutation: PerkMutation) {
        match mutation {
            PerkMutation::Counter {
                perk,
                owner,
                counter,
            } => {
                self.state_mut(owner).perks.counters.insert(perk, counter);
            }
            PerkMutation::Charge { perk, owner, meter } => {
                self.state_mut(owner).perks.meters.insert(perk, meter);
            }
            PerkMutation::Periodic { perk, owner, at } => {
                self.state_mut(owner).perks.periodic.insert(perk, at);
            }
            _ => {}
        }
    }

    /// Awards XP for damage that landed. Only active classes whose predicate
    /// matches the weapon earn XP.
    pub fn on_damage_applied(&mut self, applied: &AppliedDamage) -> Vec<LevelChange> {
        let amount = f64::from(applied.damage.total()) * self.config.xp_multiplier;
        let Some(state) = self.characters.get_mut(&applied.attacker) else {
            return Vec::new();
        };
        if !(amount.is_finite() && amount > 0.0) {
            return Vec::new();
        }

        let eligible: Vec<_> = state
            .active
            .iter()
            .filter(|class| ClassDefinition::get(*class).matches(applied.weapon))
            .collect();
        eligible
            .into_iter()
            .map(|class| state.progress.add_xp(class, amount))
            .collect()
    }

    /// Resolves a successful block for the defender.
    ///
    /// Perks are gated on what blocked the hit (falling back to the
    /// defender's loadout) and evaluated before the block's own XP lands.
    pub fn on_block_succeeded(&mut self, event: &BlockEvent, now: GameTime) -> BlockOutcome {
        let mut outcome = BlockOutcome::default();
        let Some(defender) = self.characters.get(&event.defender) else {
            return outcome;
        };

        let blocker = match event.blocker {
            Some(category) => WeaponCategories::from(category),
            None => defender.loadout.categories(),
        };
        let classes = defender.class_levels();
        let rows = gated_rows(classes.iter().copied(), |d| d.matches_any(blocker));
        let ctx = BlockContext {
            event,
            now,
            state: &defender.perks,
            config: &self.config,
        };
        let mutations = evaluate_block(&rows, &ctx);

        for mutation in mutations {
            if !mutation.is_bookkeeping() {
                outcome.triggered.push(mutation.perk());
            }
            match mutation {
                PerkMutation::Grant {
                    recipient,
                    spec,
                    ..
                } => {
                    self.grant(recipient, spec, now);
                    outcome.granted.push((recipient, spec.key));
                }
                PerkMutation::Reflect { amount, .. } => outcome.reflected += amount,
                PerkMutation::Area { pulse, .. } => outcome.area_pulses.push(pulse),
                other => self.commit_bookkeeping(other),
            }
        }

        let amount = f64::from(event.blocked) * self.config.xp_multiplier;
        if amount.is_finite() && amount > 0.0 {
            let state = self.state_mut(event.defender);
            for (class, _) in classes {
                if ClassDefinition::get(class).matches_any(blocker) {
                    outcome.level_changes.push(state.progress.add_xp(class, amount));
                }
            }
        }

        outcome
    }
}
