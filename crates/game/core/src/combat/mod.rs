//! Combat inputs and pure combat math.
//!
//! - [`event`]: inbound hit/block/equip events built by the host adapter
//! - [`damage`]: per-type damage amounts
//! - [`geometry`]: backstab, stealth and distance classification
//! - [`multiplier`]: side-effect free multiplier composition

pub mod damage;
pub mod event;
pub mod geometry;
pub mod multiplier;

pub use damage::{DamageKind, DamageTypes};
pub use event::{
    AppliedDamage, BlockEvent, DamageEvent, EquipEvent, HitGeometry, TargetAwareness,
};
pub use geometry::{
    BACKSTAB_ANGLE_DEG, HitTraits, angle_between, distance_multiplier, is_backstab,
    is_backstab_angle, is_stealth_hit,
};
pub use multiplier::{
    class_bonus, compose_multiplier, passive_reduction, simulate_damage_bonus, stamina_multiplier,
};
