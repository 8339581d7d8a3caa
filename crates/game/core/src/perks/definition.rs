use std::fmt;

use crate::class::ClassId;
use crate::combat::DamageKind;
use crate::effects::EffectKey;

/// Identity of a perk: its class and tier (1..=5, unlocking at `tier * 10`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkId {
    pub class: ClassId,
    pub tier: u8,
}

impl fmt::Display for PerkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.tier)
    }
}

/// When a perk fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerkTrigger {
    /// Always applies while the gate passes.
    Passive,
    /// Perk owner successfully blocked a hit.
    OnBlock,
    /// Perk owner landed any hit.
    OnHit,
    /// Perk owner landed a projectile hit.
    OnProjectileHit,
    /// Perk owner hit a target with no alert state and no current target.
    OnStealthHit,
    /// Perk owner hit a target from behind.
    OnBackstab,
    /// Every `count`-th qualifying hit within the combo window.
    OnConsecutiveHits { count: u8 },
    /// Fires on the tick sweep at most once per interval.
    Periodic { interval_ms: u64 },
}

/// Who receives a granted effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Owner,
    Opponent,
}

/// Precondition for a conditional damage bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    OwnerHas(EffectKey),
    OpponentHas(EffectKey),
}

/// A status effect granted by a perk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffGrant {
    pub recipient: Recipient,
    pub key: EffectKey,
    pub magnitude: f32,
    pub duration_ms: u64,
}

/// What a perk does when it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerkEffect {
    /// Bonus fraction added to the damage multiplier.
    PercentDamage(f32),
    /// True damage appended to the hit; ignores defender reduction.
    FlatDamage(f32),
    /// Fraction of the raw hit added as elemental damage.
    Elemental { kind: DamageKind, fraction: f32 },
    /// Stamina cost scalar for attacks with a matching weapon.
    StaminaCost(f32),
    /// Damage reduction fraction on hits the owner takes.
    DamageReduction(f32),
    /// Bonus fraction applied only while the requirement holds.
    Conditional {
        requirement: Requirement,
        fraction: f32,
    },
    /// Bonus interpolated from `min` to `max` over `range` metres of travel.
    DistanceScaled { min: f32, max: f32, range: f32 },
    Grant(BuffGrant),
    /// Adds a poison stack scaled by the owner's weapon skill.
    Poison,
    /// Pulse around the hit dealing `fraction` of the raw damage.
    AreaEffect { radius: f32, fraction: f32 },
    /// Accumulates blocked damage; discharges a pulse once charged.
    Reverb { radius: f32 },
    /// Returns `fraction` of blocked damage to the attacker.
    Reflect(f32),
}

/// Immutable description of one perk slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerkDefinition {
    pub id: PerkId,
    pub name: &'static str,
    pub unlock_level: u8,
    pub trigger: PerkTrigger,
    pub effect: PerkEffect,
}

impl PerkDefinition {
    pub const fn new(
        class: ClassId,
        tier: u8,
        name: &'static str,
        trigger: PerkTrigger,
        effect: PerkEffect,
    ) -> Self {
        Self {
            id: PerkId { class, tier },
            name,
            unlock_level: tier * 10,
            trigger,
            effect,
        }
    }

    pub fn is_unlocked(&self, level: u8) -> bool {
        level >= self.unlock_level
    }

    pub fn is_passive(&self) -> bool {
        matches!(self.trigger, PerkTrigger::Passive)
    }
}
