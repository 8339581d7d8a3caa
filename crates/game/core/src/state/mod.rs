//! Identifiers and primitive value types shared by every engine module.

mod ids;

pub use ids::{CharacterId, GameTime, Vec3};
