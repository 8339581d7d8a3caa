//! Deterministic class progression and perk resolution.
//!
//! `class-core` owns the canonical rules (XP curve, class registry, perk
//! table, buff ledger, damage pipeline) and exposes pure APIs that hosts and
//! offline tools share. All per-character mutation flows through
//! [`engine::ClassEngine`]; time is always supplied by the caller, so an
//! identical event sequence always yields identical state.
pub mod class;
pub mod combat;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
#[cfg(feature = "serde")]
pub mod persistence;
pub mod perks;
pub mod progression;
pub mod state;

pub use class::{
    ActiveClassSet, ClassDefinition, ClassId, WeaponCategories, WeaponCategory, active_limit,
    check_activation, is_weapon_compatible,
};
pub use combat::{
    AppliedDamage, BlockEvent, DamageEvent, DamageKind, DamageTypes, EquipEvent, HitGeometry,
    HitTraits, TargetAwareness, compose_multiplier, simulate_damage_bonus,
};
pub use config::{PoisonConfig, ProgressionConfig};
pub use effects::{
    BuffCleanup, BuffInstance, BuffLedger, BuffSpec, BuffSummary, EffectKey, EffectKind,
    EffectTag, NoCleanup, RemovalReason,
};
pub use engine::{
    BlockOutcome, CharacterState, ClassEngine, DamageOutcome, DamageStage, DotTick, EventEffect,
    InboundEvent, Loadout, ResetOutcome, SpeedChange, TickReport, TimedEvent, TriggeredPerk,
};
pub use error::{ActivationError, PersistenceError};
#[cfg(feature = "serde")]
pub use persistence::{CharacterSnapshot, RestoredCharacter};
pub use perks::{AreaPulse, PerkDefinition, PerkEffect, PerkId, PerkTrigger, PoisonApplication};
pub use progression::{LevelChange, ProgressBook, ProgressRecord, level_for_xp, xp_for_level};
pub use state::{CharacterId, GameTime, Vec3};
