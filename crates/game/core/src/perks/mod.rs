//! Perk definitions, the canonical perk table and trigger evaluation.
//!
//! Passive perks feed the pure multiplier math in [`crate::combat`];
//! triggered perks are evaluated here into [`PerkMutation`]s.

pub mod counters;
pub mod definition;
pub mod evaluate;
pub mod poison;
pub mod table;

pub use counters::{ChargeMeter, ChargeStep, ComboStep, HitCounter, PerkState};
pub use definition::{
    BuffGrant, PerkDefinition, PerkEffect, PerkId, PerkTrigger, Recipient, Requirement,
};
pub use evaluate::{
    AreaPulse, BlockContext, HitContext, PerkMutation, PerkRow, evaluate_block, evaluate_hit,
    evaluate_periodic, gated_rows,
};
pub use poison::{PoisonApplication, apply_poison, damage_per_tick, slow_fraction, speed_multiplier};
