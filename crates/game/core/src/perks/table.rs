//! Canonical perk table: five perks per class at levels 10/20/30/40/50.

use super::definition::{
    BuffGrant, PerkDefinition, PerkEffect, PerkTrigger, Recipient, Requirement,
};
use crate::class::ClassId;
use crate::combat::DamageKind;
use crate::effects::{EffectKey, EffectKind, EffectTag};

use ClassId::*;
use PerkEffect::*;
use PerkTrigger::*;

const fn grant_owner(key: EffectKey, magnitude: f32, duration_ms: u64) -> PerkEffect {
    Grant(BuffGrant {
        recipient: Recipient::Owner,
        key,
        magnitude,
        duration_ms,
    })
}

const fn grant_opponent(key: EffectKey, magnitude: f32, duration_ms: u64) -> PerkEffect {
    Grant(BuffGrant {
        recipient: Recipient::Opponent,
        key,
        magnitude,
        duration_ms,
    })
}

pub const SWORD_MASTER_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(
        SwordMaster,
        1,
        "Riposte",
        OnBlock,
        grant_owner(
            EffectKey::tagged(EffectKind::DamageBoost, EffectTag::Riposte),
            0.25,
            5_000,
        ),
    ),
    PerkDefinition::new(
        SwordMaster,
        2,
        "Blade Dance",
        OnConsecutiveHits { count: 3 },
        grant_owner(EffectKey::attack_speed(EffectTag::BladeDance), 1.15, 6_000),
    ),
    PerkDefinition::new(SwordMaster, 3, "Measured Strikes", Passive, StaminaCost(0.85)),
    PerkDefinition::new(
        SwordMaster,
        4,
        "Cleave",
        OnHit,
        AreaEffect {
            radius: 3.0,
            fraction: 0.2,
        },
    ),
    PerkDefinition::new(SwordMaster, 5, "Duelist", OnHit, FlatDamage(8.0)),
];

pub const ARCHER_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Archer, 1, "Steady Draw", Passive, StaminaCost(0.9)),
    PerkDefinition::new(
        Archer,
        2,
        "Wind Reader",
        OnProjectileHit,
        DistanceScaled {
            min: 1.0,
            max: 1.5,
            range: 50.0,
        },
    ),
    PerkDefinition::new(Archer, 3, "Hunter's Mark", OnStealthHit, PercentDamage(0.25)),
    PerkDefinition::new(
        Archer,
        4,
        "Volley",
        OnConsecutiveHits { count: 3 },
        grant_owner(EffectKey::attack_speed(EffectTag::Volley), 1.2, 5_000),
    ),
    PerkDefinition::new(Archer, 5, "Piercing Shot", OnProjectileHit, FlatDamage(10.0)),
];

pub const CRUSHER_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Crusher, 1, "Heavy Blows", Passive, PercentDamage(0.05)),
    PerkDefinition::new(
        Crusher,
        2,
        "Stagger",
        OnHit,
        grant_opponent(
            EffectKey::tagged(EffectKind::MovementSlow, EffectTag::Stagger),
            0.3,
            3_000,
        ),
    ),
    PerkDefinition::new(Crusher, 3, "Bone Breaker", Passive, PercentDamage(0.05)),
    PerkDefinition::new(
        Crusher,
        4,
        "Ground Slam",
        OnConsecutiveHits { count: 4 },
        AreaEffect {
            radius: 4.0,
            fraction: 0.5,
        },
    ),
    PerkDefinition::new(Crusher, 5, "Juggernaut", Passive, DamageReduction(0.10)),
];

pub const ASSASSIN_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Assassin, 1, "Backstab", OnBackstab, PercentDamage(0.5)),
    PerkDefinition::new(Assassin, 2, "Venom", OnHit, Poison),
    PerkDefinition::new(
        Assassin,
        3,
        "Shadow Step",
        OnStealthHit,
        grant_owner(EffectKey::attack_speed(EffectTag::ShadowStep), 1.25, 8_000),
    ),
    PerkDefinition::new(
        Assassin,
        4,
        "Exploit Weakness",
        OnHit,
        Conditional {
            requirement: Requirement::OpponentHas(EffectKey::POISON),
            fraction: 0.15,
        },
    ),
    PerkDefinition::new(Assassin, 5, "Assassinate", OnStealthHit, FlatDamage(30.0)),
];

pub const BRAWLER_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Brawler, 1, "Iron Fist", OnHit, FlatDamage(5.0)),
    PerkDefinition::new(
        Brawler,
        2,
        "One-Two",
        OnConsecutiveHits { count: 2 },
        FlatDamage(12.0),
    ),
    PerkDefinition::new(
        Brawler,
        3,
        "Rage",
        OnBlock,
        grant_owner(EffectKey::attack_speed(EffectTag::Rage), 1.3, 8_000),
    ),
    PerkDefinition::new(
        Brawler,
        4,
        "Berserker",
        OnHit,
        Conditional {
            requirement: Requirement::OwnerHas(EffectKey::attack_speed(EffectTag::Rage)),
            fraction: 0.15,
        },
    ),
    PerkDefinition::new(
        Brawler,
        5,
        "Adrenaline Rush",
        OnConsecutiveHits { count: 5 },
        grant_owner(
            EffectKey::tagged(EffectKind::StaminaRegen, EffectTag::Adrenaline),
            1.5,
            6_000,
        ),
    ),
];

pub const WIZARD_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Wizard, 1, "Arcane Focus", Passive, PercentDamage(0.05)),
    PerkDefinition::new(
        Wizard,
        2,
        "Elemental Infusion",
        OnHit,
        Elemental {
            kind: DamageKind::Fire,
            fraction: 0.10,
        },
    ),
    PerkDefinition::new(Wizard, 3, "Efficient Casting", Passive, StaminaCost(0.8)),
    PerkDefinition::new(
        Wizard,
        4,
        "Mana Surge",
        Periodic {
            interval_ms: 10_000,
        },
        grant_owner(
            EffectKey::tagged(EffectKind::StaminaRegen, EffectTag::ManaSurge),
            1.25,
            5_000,
        ),
    ),
    PerkDefinition::new(
        Wizard,
        5,
        "Frostbite",
        OnHit,
        grant_opponent(
            EffectKey::tagged(EffectKind::MovementSlow, EffectTag::Chill),
            0.2,
            2_000,
        ),
    ),
];

pub const LANCER_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Lancer, 1, "Long Reach", Passive, StaminaCost(0.9)),
    PerkDefinition::new(
        Lancer,
        2,
        "Impressive Throw",
        OnProjectileHit,
        DistanceScaled {
            min: 1.0,
            max: 1.6,
            range: 40.0,
        },
    ),
    PerkDefinition::new(
        Lancer,
        3,
        "Impale",
        OnProjectileHit,
        grant_opponent(EffectKey::MOVEMENT_DISABLE, 1.0, 1_500),
    ),
    PerkDefinition::new(
        Lancer,
        4,
        "Phalanx",
        OnBlock,
        grant_owner(
            EffectKey::tagged(EffectKind::DamageReduction, EffectTag::Phalanx),
            0.15,
            4_000,
        ),
    ),
    PerkDefinition::new(
        Lancer,
        5,
        "Skewer",
        OnHit,
        AreaEffect {
            radius: 2.0,
            fraction: 0.3,
        },
    ),
];

pub const BULWARK_PERKS: [PerkDefinition; 5] = [
    PerkDefinition::new(Bulwark, 1, "Shield Wall", Passive, DamageReduction(0.05)),
    PerkDefinition::new(Bulwark, 2, "Reverb", OnBlock, Reverb { radius: 5.0 }),
    PerkDefinition::new(
        Bulwark,
        3,
        "Stalwart",
        OnBlock,
        grant_owner(
            EffectKey::tagged(EffectKind::DamageReduction, EffectTag::Stalwart),
            0.10,
            4_000,
        ),
    ),
    PerkDefinition::new(Bulwark, 4, "Retaliation", OnBlock, Reflect(0.25)),
    PerkDefinition::new(Bulwark, 5, "Bastion", Passive, DamageReduction(0.10)),
];
