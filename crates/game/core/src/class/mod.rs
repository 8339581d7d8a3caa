//! Class registry and activation policy.
//!
//! - [`ClassId`]: the single enum-keyed class identity
//! - [`ClassDefinition`]: immutable per-class data (weapons, scaling, perks)
//! - [`WeaponCategory`]: weapon classification shared by XP and damage rules
//! - [`ActiveClassSet`]: the at-most-two active classes of a character

pub mod active;
pub mod definition;
pub mod id;
pub mod weapon;

pub use active::{ActiveClassSet, active_limit, check_activation};
pub use definition::{ClassDefinition, is_weapon_compatible};
pub use id::ClassId;
pub use weapon::{WeaponCategories, WeaponCategory};
