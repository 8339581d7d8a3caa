//! Perk row evaluation.
//!
//! Each gated perk is a row; evaluating a row is a pure function of the
//! inbound event plus read-only views of the ledger and perk state, and
//! yields [`PerkMutation`]s that the engine commits afterwards. Rows are
//! always visited in ascending unlock level, ties broken by class order, so
//! the result does not depend on which classes happen to be active.

use super::counters::{ChargeMeter, ChargeStep, ComboStep, HitCounter, PerkState};
use super::definition::{
    PerkDefinition, PerkEffect, PerkId, PerkTrigger, Recipient, Requirement,
};
use crate::class::{ClassDefinition, ClassId};
use crate::combat::{
    BlockEvent, DamageEvent, DamageKind, DamageTypes, HitTraits, distance_multiplier,
};
use crate::config::ProgressionConfig;
use crate::effects::{BuffLedger, BuffSpec};
use crate::state::{CharacterId, GameTime, Vec3};

/// One unlocked perk of one active class whose gate passed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerkRow {
    pub class: ClassId,
    pub level: u8,
    pub perk: &'static PerkDefinition,
}

/// Collects unlocked perks from `classes` whose definition passes `gate`,
/// in evaluation order.
pub fn gated_rows(
    classes: impl IntoIterator<Item = (ClassId, u8)>,
    gate: impl Fn(&ClassDefinition) -> bool,
) -> Vec<PerkRow> {
    let mut rows: Vec<PerkRow> = classes
        .into_iter()
        .filter(|(class, _)| gate(ClassDefinition::get(*class)))
        .flat_map(|(class, level)| {
            ClassDefinition::get(class)
                .unlocked_perks(level)
                .map(move |perk| PerkRow { class, level, perk })
        })
        .collect();
    rows.sort_by_key(|row| (row.perk.unlock_level, row.class.index()));
    rows
}

/// Area pulse the host should resolve against nearby characters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaPulse {
    pub perk: PerkId,
    pub source: CharacterId,
    pub center: Vec3,
    pub radius: f32,
    pub damage: DamageTypes,
    /// Character already struck by the triggering hit.
    pub exclude: Option<CharacterId>,
}

/// A single state change or output produced by a perk row.
#[derive(Clone, Debug, PartialEq)]
pub enum PerkMutation {
    /// Fraction added to the offensive multiplier.
    Bonus { perk: PerkId, fraction: f32 },
    /// Damage added after reduction.
    TrueDamage { perk: PerkId, amount: f32 },
    Elemental {
        perk: PerkId,
        kind: DamageKind,
        amount: f32,
    },
    Grant {
        perk: PerkId,
        recipient: CharacterId,
        spec: BuffSpec,
    },
    Poison {
        perk: PerkId,
        target: CharacterId,
        source: CharacterId,
        skill: f32,
        baseline: Option<f32>,
    },
    Area { perk: PerkId, pulse: AreaPulse },
    Reflect { perk: PerkId, amount: f32 },
    Counter {
        perk: PerkId,
        owner: CharacterId,
        counter: HitCounter,
    },
    Charge {
        perk: PerkId,
        owner: CharacterId,
        meter: ChargeMeter,
    },
    Periodic {
        perk: PerkId,
        owner: CharacterId,
        at: GameTime,
    },
}

impl PerkMutation {
    pub fn perk(&self) -> PerkId {
        match self {
            Self::Bonus { perk, .. }
            | Self::TrueDamage { perk, .. }
            | Self::Elemental { perk, .. }
            | Self::Grant { perk, .. }
            | Self::Poison { perk, .. }
            | Self::Area { perk, .. }
            | Self::Reflect { perk, .. }
            | Self::Counter { perk, .. }
            | Self::Charge { perk, .. }
            | Self::Periodic { perk, .. } => *perk,
        }
    }

    /// Mutations that shape the outgoing hit itself.
    pub fn is_offense(&self) -> bool {
        matches!(
            self,
            Self::Bonus { .. } | Self::TrueDamage { .. } | Self::Elemental { .. }
        )
    }

    /// Pure bookkeeping that is not worth reporting as a trigger.
    pub fn is_bookkeeping(&self) -> bool {
        matches!(
            self,
            Self::Counter { .. } | Self::Charge { .. } | Self::Periodic { .. }
        )
    }
}

/// Read-only inputs for attacker-side rows.
#[derive(Clone, Copy)]
pub struct HitContext<'a> {
    pub event: &'a DamageEvent,
    pub traits: HitTraits,
    pub now: GameTime,
    pub ledger: &'a BuffLedger,
    /// Attacker's perk state.
    pub state: &'a PerkState,
    pub config: &'a ProgressionConfig,
}

impl HitContext<'_> {
    fn holds(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::OwnerHas(key) => {
                self.ledger.is_active_at(self.event.attacker, key, self.now)
            }
            Requirement::OpponentHas(key) => {
                self.ledger.is_active_at(self.event.target, key, self.now)
            }
        }
    }
}

/// Evaluates attacker rows for one hit.
pub fn evaluate_hit(rows: &[PerkRow], ctx: &HitContext<'_>) -> Vec<PerkMutation> {
    let mut out = Vec::new();
    for row in rows {
        let perk = row.perk;
        let fires = match perk.trigger {
            PerkTrigger::OnHit => true,
            PerkTrigger::OnProjectileHit => ctx.traits.contains(HitTraits::PROJECTILE),
            PerkTrigger::OnStealthHit => ctx.traits.contains(HitTraits::STEALTH),
            PerkTrigger::OnBackstab => ctx.traits.contains(HitTraits::BACKSTAB),
            PerkTrigger::OnConsecutiveHits { count } => {
                let (counter, step) = ctx.state.counter(perk.id).step(
                    ctx.now,
                    count,
                    ctx.config.combo_timeout_ms,
                );
                out.push(PerkMutation::Counter {
                    perk: perk.id,
                    owner: ctx.event.attacker,
                    counter,
                });
                step == ComboStep::Fired
            }
            PerkTrigger::Passive | PerkTrigger::OnBlock | PerkTrigger::Periodic { .. } => false,
        };
        if fires {
            hit_effect(perk, ctx, &mut out);
        }
    }
    out
}

fn hit_effect(perk: &PerkDefinition, ctx: &HitContext<'_>, out: &mut Vec<PerkMutation>) {
    let event = ctx.event;
    let id = perk.id;
    match perk.effect {
        PerkEffect::PercentDamage(fraction) => out.push(PerkMutation::Bonus { perk: id, fraction }),
        PerkEffect::FlatDamage(amount) => out.push(PerkMutation::TrueDamage { perk: id, amount }),
        PerkEffect::Elemental { kind, fraction } => {
            let amount = event.damage.total() * fraction;
            if amount > 0.0 {
                out.push(PerkMutation::Elemental {
                    perk: id,
                    kind,
                    amount,
                });
            }
        }
        PerkEffect::Conditional {
            requirement,
            fraction,
        } => {
            if ctx.holds(requirement) {
                out.push(PerkMutation::Bonus { perk: id, fraction });
            }
        }
        PerkEffect::DistanceScaled { min, max, range } => {
            // Without a launch point there is no travel distance to scale by.
            if let Some(origin) = event.geometry.origin {
                let multiplier =
                    distance_multiplier(origin, event.geometry.hit_point, min, max, range);
                out.push(PerkMutation::Bonus {
                    perk: id,
                    fraction: multiplier - 1.0,
                });
            }
        }
        PerkEffect::Grant(grant) => {
            let mut spec = BuffSpec::new(grant.key, grant.magnitude, Some(grant.duration_ms))
                .from_source(event.attacker);
            let recipient = match grant.recipient {
                Recipient::Owner => event.attacker,
                Recipient::Opponent => {
                    spec = spec.with_baseline(event.target_base_speed);
                    event.target
                }
            };
            out.push(PerkMutation::Grant {
                perk: id,
                recipient,
                spec,
            });
        }
        PerkEffect::Poison => out.push(PerkMutation::Poison {
            perk: id,
            target: event.target,
            source: event.attacker,
            skill: event.attacker_skill,
            baseline: event.target_base_speed,
        }),
        PerkEffect::AreaEffect { radius, fraction } => out.push(PerkMutation::Area {
            perk: id,
            pulse: AreaPulse {
                perk: id,
                source: event.attacker,
                center: event.geometry.hit_point,
                radius,
                damage: event.damage.scaled(fraction),
                exclude: Some(event.target),
            },
        }),
        PerkEffect::StaminaCost(_)
        | PerkEffect::DamageReduction(_)
        | PerkEffect::Reverb { .. }
        | PerkEffect::Reflect(_) => {}
    }
}

/// Read-only inputs for defender-side block rows.
#[derive(Clone, Copy)]
pub struct BlockContext<'a> {
    pub event: &'a BlockEvent,
    pub now: GameTime,
    /// Defender's perk state.
    pub state: &'a PerkState,
    pub config: &'a ProgressionConfig,
}

/// Evaluates defender rows for one successful block.
pub fn evaluate_block(rows: &[PerkRow], ctx: &BlockContext<'_>) -> Vec<PerkMutation> {
    let event = ctx.event;
    let mut out = Vec::new();
    for row in rows.iter().filter(|r| r.perk.trigger == PerkTrigger::OnBlock) {
        let id = row.perk.id;
        match row.perk.effect {
            PerkEffect::Grant(grant) => {
                let recipient = match grant.recipient {
                    Recipient::Owner => event.defender,
                    Recipient::Opponent => event.attacker,
                };
                let spec = BuffSpec::new(grant.key, grant.magnitude, Some(grant.duration_ms))
                    .from_source(event.defender);
                out.push(PerkMutation::Grant {
                    perk: id,
                    recipient,
                    spec,
                });
            }
            PerkEffect::Reverb { radius } => {
                let (meter, step) = ctx
                    .state
                    .meter(id)
                    .step(event.blocked, ctx.config.reverb_threshold);
                out.push(PerkMutation::Charge {
                    perk: id,
                    owner: event.defender,
                    meter,
                });
                if let ChargeStep::Discharged(amount) = step {
                    out.push(PerkMutation::Area {
                        perk: id,
                        pulse: AreaPulse {
                            perk: id,
                            source: event.defender,
                            center: event.position.unwrap_or(Vec3::ZERO),
                            radius,
                            damage: DamageTypes::of(DamageKind::Blunt, amount),
                            exclude: None,
                        },
                    });
                }
            }
            PerkEffect::Reflect(fraction) => {
                let amount = event.blocked.max(0.0) * fraction;
                if amount > 0.0 {
                    out.push(PerkMutation::Reflect { perk: id, amount });
                }
            }
            _ => {}
        }
    }
    out
}

/// Evaluates periodic rows for `owner` at `now`. A periodic perk fires on
/// its first evaluation and then at most once per interval.
pub fn evaluate_periodic(
    rows: &[PerkRow],
    owner: CharacterId,
    now: GameTime,
    state: &PerkState,
) -> Vec<PerkMutation> {
    let mut out = Vec::new();
    for row in rows {
        let PerkTrigger::Periodic { interval_ms } = row.perk.trigger else {
            continue;
        };
        let id = row.perk.id;
        let due = state
            .last_fired(id)
            .is_none_or(|at| now.since(at) >= interval_ms);
        if !due {
            continue;
        }
        out.push(PerkMutation::Periodic {
            perk: id,
            owner,
            at: now,
        });
        if let PerkEffect::Grant(grant) = row.perk.effect {
            if grant.recipient == Recipient::Owner {
                out.push(PerkMutation::Grant {
                    perk: id,
                    recipient: owner,
                    spec: BuffSpec::new(grant.key, grant.magnitude, Some(grant.duration_ms))
                        .from_source(owner),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{HitGeometry, TargetAwareness};
    use crate::effects::{EffectKey, EffectTag};

    const ATTACKER: CharacterId = CharacterId(1);
    const TARGET: CharacterId = CharacterId(2);

    fn sword_hit() -> DamageEvent {
        DamageEvent::new(
            ATTACKER,
            TARGET,
            crate::class::WeaponCategory::Sword,
            DamageTypes::of(DamageKind::Slash, 100.0),
        )
    }

    fn ids(mutations: &[PerkMutation]) -> Vec<PerkId> {
        mutations.iter().map(PerkMutation::perk).collect()
    }

    #[test]
    fn rows_are_ordered_by_unlock_level_then_class() {
        let rows = gated_rows([(ClassId::Lancer, 20), (ClassId::SwordMaster, 20)], |_| true);
        let order: Vec<(u8, ClassId)> = rows
            .iter()
            .map(|r| (r.perk.unlock_level, r.class))
            .collect();
        assert_eq!(
            order,
            vec![
                (10, ClassId::SwordMaster),
                (10, ClassId::Lancer),
                (20, ClassId::SwordMaster),
                (20, ClassId::Lancer),
            ]
        );
    }

    #[test]
    fn gate_filters_whole_classes() {
        let rows = gated_rows([(ClassId::Archer, 50), (ClassId::Wizard, 50)], |d| {
            d.id == ClassId::Wizard
        });
        assert!(rows.iter().all(|r| r.class == ClassId::Wizard));
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn stealth_hit_triggers_shadow_step_and_assassinate() {
        let config = ProgressionConfig::default();
        let ledger = BuffLedger::new();
        let state = PerkState::default();
        let event = sword_hit().with_awareness(TargetAwareness::UNAWARE);
        let rows = gated_rows([(ClassId::Assassin, 50)], |_| true);
        let ctx = HitContext {
            event: &event,
            traits: HitTraits::classify(&event),
            now: GameTime::ZERO,
            ledger: &ledger,
            state: &state,
            config: &config,
        };

        let out = evaluate_hit(&rows, &ctx);

        assert!(out.iter().any(|m| matches!(
            m,
            PerkMutation::Grant { recipient, spec, .. }
                if *recipient == ATTACKER
                    && spec.key == EffectKey::attack_speed(EffectTag::ShadowStep)
        )));
        assert!(out.contains(&PerkMutation::TrueDamage {
            perk: PerkId {
                class: ClassId::Assassin,
                tier: 5,
            },
            amount: 30.0,
        }));
        // Venom always poisons on hit.
        assert!(out.iter().any(
            |m| matches!(m, PerkMutation::Poison { target, .. } if *target == TARGET)
        ));
    }

    #[test]
    fn conditional_bonus_reads_opponent_buffs() {
        let config = ProgressionConfig::default();
        let mut ledger = BuffLedger::new();
        let state = PerkState::default();
        let event = sword_hit().with_awareness(TargetAwareness::ALERTED);
        let rows = gated_rows([(ClassId::Assassin, 40)], |_| true);
        let exploit = PerkId {
            class: ClassId::Assassin,
            tier: 4,
        };

        let unpoisoned = {
            let ctx = HitContext {
                event: &event,
                traits: HitTraits::classify(&event),
                now: GameTime::ZERO,
                ledger: &ledger,
                state: &state,
                config: &config,
            };
            evaluate_hit(&rows, &ctx)
        };
        assert!(!ids(&unpoisoned).contains(&exploit));

        ledger.trigger(TARGET, BuffSpec::new(EffectKey::POISON, 1.0, Some(10_000)), GameTime::ZERO);
        let ctx = HitContext {
            event: &event,
            traits: HitTraits::classify(&event),
            now: GameTime::ZERO,
            ledger: &ledger,
            state: &state,
            config: &config,
        };
        assert!(evaluate_hit(&rows, &ctx).contains(&PerkMutation::Bonus {
            perk: exploit,
            fraction: 0.15
        }));
    }

    #[test]
    fn distance_bonus_uses_launch_origin() {
        let config = ProgressionConfig::default();
        let ledger = BuffLedger::new();
        let state = PerkState::default();
        let rows = gated_rows([(ClassId::Archer, 20)], |_| true);
        let event = DamageEvent::new(
            ATTACKER,
            TARGET,
            crate::class::WeaponCategory::Bow,
            DamageTypes::of(DamageKind::Pierce, 40.0),
        )
        .with_projectile(Vec3::ZERO)
        .with_geometry(HitGeometry {
            origin: Some(Vec3::ZERO),
            hit_point: Vec3::new(0.0, 0.0, 25.0),
            ..HitGeometry::default()
        });
        let ctx = HitContext {
            event: &event,
            traits: HitTraits::classify(&event),
            now: GameTime::ZERO,
            ledger: &ledger,
            state: &state,
            config: &config,
        };

        let out = evaluate_hit(&rows, &ctx);
        let bonus = out.iter().find_map(|m| match m {
            PerkMutation::Bonus { fraction, .. } => Some(*fraction),
            _ => None,
        });
        assert!((bonus.unwrap() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn combo_row_fires_only_on_threshold() {
        let config = ProgressionConfig::default();
        let ledger = BuffLedger::new();
        let mut state = PerkState::default();
        let event = DamageEvent::new(
            ATTACKER,
            TARGET,
            crate::class::WeaponCategory::Unarmed,
            DamageTypes::of(DamageKind::Blunt, 10.0),
        );
        let rows = gated_rows([(ClassId::Brawler, 20)], |_| true);
        let one_two = PerkId {
            class: ClassId::Brawler,
            tier: 2,
        };

        let mut fired = Vec::new();
        for ms in [0, 500, 1_000, 1_500] {
            let ctx = HitContext {
                event: &event,
                traits: HitTraits::empty(),
                now: GameTime::from_millis(ms),
                ledger: &ledger,
                state: &state,
                config: &config,
            };
            let out = evaluate_hit(&rows, &ctx);
            for m in &out {
                if let PerkMutation::Counter {
                    perk,
                    counter,
                    ..
                } = m
                {
                    state.counters.insert(*perk, *counter);
                }
            }
            fired.push(out.contains(&PerkMutation::TrueDamage {
                perk: one_two,
                amount: 12.0,
            }));
        }
        assert_eq!(fired, vec![false, true, false, true]);
    }

    #[test]
    fn reverb_discharges_on_block_after_charging() {
        let config = ProgressionConfig::default();
        let mut state = PerkState::default();
        let rows = gated_rows([(ClassId::Bulwark, 20)], |_| true);
        let reverb = PerkId {
            class: ClassId::Bulwark,
            tier: 2,
        };

        let mut pulses = Vec::new();
        for blocked in [100.0, 60.0, 10.0] {
            let event = BlockEvent::new(TARGET, ATTACKER, blocked);
            let ctx = BlockContext {
                event: &event,
                now: GameTime::ZERO,
                state: &state,
                config: &config,
            };
            let out = evaluate_block(&rows, &ctx);
            for m in &out {
                match m {
                    PerkMutation::Charge { perk, meter, .. } => {
                        state.meters.insert(*perk, *meter);
                    }
                    PerkMutation::Area { pulse, .. } => pulses.push(pulse.damage.total()),
                    _ => {}
                }
            }
        }
        assert_eq!(pulses, vec![160.0]);
        assert_eq!(state.meter(reverb).accumulated(), 0.0);
    }

    #[test]
    fn periodic_rows_respect_interval() {
        let rows = gated_rows([(ClassId::Wizard, 40)], |_| true);
        let surge = PerkId {
            class: ClassId::Wizard,
            tier: 4,
        };
        let mut state = PerkState::default();

        let first = evaluate_periodic(&rows, ATTACKER, GameTime::ZERO, &state);
        assert_eq!(first.len(), 2);
        state.periodic.insert(surge, GameTime::ZERO);

        assert!(evaluate_periodic(&rows, ATTACKER, GameTime::from_secs(5), &state).is_empty());
        assert_eq!(evaluate_periodic(&rows, ATTACKER, GameTime::from_secs(10), &state).len(), 2);
    }
}
