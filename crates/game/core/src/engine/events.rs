//! Inbound event envelope and the structured outcomes the engine returns.

use crate::class::ClassId;
use crate::combat::{AppliedDamage, BlockEvent, DamageEvent, DamageTypes, EquipEvent, HitTraits};
use crate::effects::EffectKey;
use crate::error::ActivationError;
use crate::perks::{AreaPulse, PerkId, PoisonApplication};
use crate::progression::LevelChange;
use crate::state::{CharacterId, GameTime};

/// Stage of the damage pipeline a perk fired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageStage {
    Offense,
    Defense,
    Post,
}

impl DamageStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageStage::Offense => "offense",
            DamageStage::Defense => "defense",
            DamageStage::Post => "post",
        }
    }
}

/// A perk that fired while resolving an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggeredPerk {
    pub perk: PerkId,
    pub stage: DamageStage,
}

/// Movement speed the host should write back for `character`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedChange {
    pub character: CharacterId,
    /// Base speed captured when the slow first applied, if the host sent one.
    pub baseline: Option<f32>,
    /// Combined movement multiplier now in effect.
    pub multiplier: f32,
}

/// Result of resolving one hit before the host applies it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Multiplier for the raw damage: `offense_multiplier * (1 - reduction)`.
    pub multiplier: f32,
    pub offense_multiplier: f32,
    /// Defender reduction fraction, already capped.
    pub reduction: f32,
    /// Added after reduction, never reduced.
    pub true_damage: f32,
    /// Elemental damage appended by perks, before reduction.
    pub extra: DamageTypes,
    pub traits: HitTraits,
    pub area_pulses: Vec<AreaPulse>,
    pub speed_changes: Vec<SpeedChange>,
    pub poison: Option<PoisonApplication>,
    pub triggered: Vec<TriggeredPerk>,
}

impl DamageOutcome {
    pub fn neutral(traits: HitTraits) -> Self {
        Self {
            multiplier: 1.0,
            offense_multiplier: 1.0,
            reduction: 0.0,
            true_damage: 0.0,
            extra: DamageTypes::zero(),
            traits,
            area_pulses: Vec::new(),
            speed_changes: Vec::new(),
            poison: None,
            triggered: Vec::new(),
        }
    }

    /// Per-type damage the host should apply, excluding true damage.
    pub fn apply_to(&self, raw: &DamageTypes) -> DamageTypes {
        let mut damage = raw.scaled(self.multiplier);
        for (kind, amount) in self.extra.iter() {
            damage.add(kind, amount * (1.0 - self.reduction));
        }
        damage
    }

    /// Total damage including true damage.
    pub fn total(&self, raw: &DamageTypes) -> f32 {
        self.apply_to(raw).total() + self.true_damage
    }

    pub fn fired(&self, perk: PerkId) -> bool {
        self.triggered.iter().any(|t| t.perk == perk)
    }
}

/// Result of a successful block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockOutcome {
    pub level_changes: Vec<LevelChange>,
    /// Damage to return to the attacker.
    pub reflected: f32,
    pub area_pulses: Vec<AreaPulse>,
    pub granted: Vec<(CharacterId, EffectKey)>,
    pub triggered: Vec<PerkId>,
}

/// Damage-over-time emitted by a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotTick {
    pub target: CharacterId,
    pub source: Option<CharacterId>,
    pub damage: f32,
    pub stacks: u8,
}

/// Result of one [`crate::ClassEngine::on_tick`] call.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub expired: usize,
    pub dots: Vec<DotTick>,
    pub granted: Vec<(CharacterId, EffectKey)>,
    pub combos_reset: usize,
}

/// Result of an administrative progress reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetOutcome {
    pub had_progress: bool,
    /// Class removed from the active set to keep the class cap valid.
    pub deactivated: Option<ClassId>,
}

/// Every input the engine accepts, in a form that can be scripted and
/// replayed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InboundEvent {
    AddXp {
        character: CharacterId,
        class: ClassId,
        amount: f64,
    },
    SetActiveClass {
        character: CharacterId,
        class: ClassId,
    },
    AddActiveClass {
        character: CharacterId,
        class: ClassId,
    },
    RemoveActiveClass {
        character: CharacterId,
        class: ClassId,
    },
    ResetClassProgress {
        character: CharacterId,
        class: ClassId,
    },
    Equip(EquipEvent),
    DamageAboutToApply(DamageEvent),
    DamageApplied(AppliedDamage),
    BlockSucceeded(BlockEvent),
    CharacterDied {
        character: CharacterId,
    },
    CharacterRemoved {
        character: CharacterId,
    },
    Tick,
}

impl InboundEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboundEvent::AddXp { .. } => "add_xp",
            InboundEvent::SetActiveClass { .. } => "set_active_class",
            InboundEvent::AddActiveClass { .. } => "add_active_class",
            InboundEvent::RemoveActiveClass { .. } => "remove_active_class",
            InboundEvent::ResetClassProgress { .. } => "reset_class_progress",
            InboundEvent::Equip(_) => "equip",
            InboundEvent::DamageAboutToApply(_) => "damage_about_to_apply",
            InboundEvent::DamageApplied(_) => "damage_applied",
            InboundEvent::BlockSucceeded(_) => "block_succeeded",
            InboundEvent::CharacterDied { .. } => "character_died",
            InboundEvent::CharacterRemoved { .. } => "character_removed",
            InboundEvent::Tick => "tick",
        }
    }
}

/// An inbound event stamped with game time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEvent {
    pub at: GameTime,
    pub event: InboundEvent,
}

impl TimedEvent {
    pub fn new(at: GameTime, event: InboundEvent) -> Self {
        Self { at, event }
    }
}

/// What [`crate::ClassEngine::handle`] produced for one event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventEffect {
    Level(LevelChange),
    Activation(Result<(), ActivationError>),
    Deactivated(bool),
    Reset(ResetOutcome),
    Equipped,
    Damage(DamageOutcome),
    Applied(Vec<LevelChange>),
    Block(BlockOutcome),
    Cleared(usize),
    Tick(TickReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageKind;

    #[test]
    fn extra_damage_is_reduced_but_true_damage_is_not() {
        let mut outcome = DamageOutcome::neutral(HitTraits::empty());
        outcome.offense_multiplier = 1.2;
        outcome.reduction = 0.5;
        outcome.multiplier = 0.6;
        outcome.extra = DamageTypes::of(DamageKind::Fire, 10.0);
        outcome.true_damage = 8.0;

        let raw = DamageTypes::of(DamageKind::Slash, 100.0);
        let applied = outcome.apply_to(&raw);
        assert!((applied.get(DamageKind::Slash) - 60.0).abs() < 1e-4);
        assert!((applied.get(DamageKind::Fire) - 5.0).abs() < 1e-4);
        assert!((outcome.total(&raw) - 73.0).abs() < 1e-4);
    }
}
