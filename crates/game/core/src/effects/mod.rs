//! Buff/debuff ledger.
//!
//! Time-bounded and stack-bounded status effects per character, with
//! expiry sweeps and cleanup callbacks on every removal path.

pub mod key;
pub mod ledger;

pub use key::{EffectKey, EffectKind, EffectTag};
pub use ledger::{
    BuffCleanup, BuffInstance, BuffLedger, BuffSpec, BuffSummary, NoCleanup, RemovalReason,
};
