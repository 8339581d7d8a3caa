//! Data-driven progression content and loaders.
//!
//! This crate houses shipped data and the loaders that read it:
//! - Progression balance (TOML)
//! - Weapon name overrides for category classification (RON)
//! - Replayable event scripts (RON)
//!
//! The class and perk tables themselves are static data in `class-core`;
//! content here only tunes or drives them.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, EventScript, ScriptLoader, WeaponCatalog};
