//! Hit classification from geometry and target AI state.

use bitflags::bitflags;

use super::event::{DamageEvent, HitGeometry, TargetAwareness};
use crate::state::Vec3;

/// Angle from the target's forward vector beyond which a hit is a backstab.
/// The boundary itself is not a backstab.
pub const BACKSTAB_ANGLE_DEG: f32 = 120.0;

bitflags! {
    /// Derived properties of a single hit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HitTraits: u8 {
        const PROJECTILE = 1 << 0;
        const BACKSTAB = 1 << 1;
        const STEALTH = 1 << 2;
    }
}

impl HitTraits {
    pub fn classify(event: &DamageEvent) -> Self {
        let mut traits = Self::empty();
        if event.projectile {
            traits |= Self::PROJECTILE;
        }
        if is_backstab(&event.geometry) {
            traits |= Self::BACKSTAB;
        }
        if event.awareness.is_some_and(is_stealth_hit) {
            traits |= Self::STEALTH;
        }
        traits
    }
}

/// Angle in degrees between two vectors, `None` if either has zero length.
pub fn angle_between(a: Vec3, b: Vec3) -> Option<f32> {
    let a = a.normalized()?;
    let b = b.normalized()?;
    Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Exclusive backstab threshold: exactly 120° is a frontal hit.
pub fn is_backstab_angle(angle_deg: f32) -> bool {
    angle_deg > BACKSTAB_ANGLE_DEG
}

/// A hit is a backstab when the direction from the target to the hit point
/// points more than 120° away from where the target faces.
pub fn is_backstab(geometry: &HitGeometry) -> bool {
    let to_hit = geometry.hit_point - geometry.target_position;
    angle_between(geometry.target_forward, to_hit).is_some_and(is_backstab_angle)
}

/// A stealth hit lands on a target with no alert state and no current
/// target. The attacker's own sneak state is irrelevant.
pub fn is_stealth_hit(awareness: TargetAwareness) -> bool {
    !awareness.alerted && !awareness.has_target
}

/// Linear interpolation between `min` and `max` by travel distance from
/// `origin` to `hit_point`, clamped to `[0, range]`.
pub fn distance_multiplier(origin: Vec3, hit_point: Vec3, min: f32, max: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return max;
    }
    let fraction = (origin.distance(hit_point) / range).clamp(0.0, 1.0);
    min + (max - min) * fraction
}
