//! Inbound combat events, constructed by the host adapter per hit/block.

use super::damage::DamageTypes;
use crate::class::WeaponCategory;
use crate::state::{CharacterId, Vec3};

/// One attack resolution, before damage is applied to the target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    pub attacker: CharacterId,
    pub target: CharacterId,
    pub weapon: WeaponCategory,
    /// Raw per-type damage before any class modifiers.
    pub damage: DamageTypes,
    /// Attacker's skill level for the weapon, used by skill-scaled perks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attacker_skill: f32,
    /// True if the hit came from a projectile (arrow, bolt, thrown spear).
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub geometry: HitGeometry,
    /// Target AI state, `None` for players or hosts without AI data.
    #[cfg_attr(feature = "serde", serde(default))]
    pub awareness: Option<TargetAwareness>,
    /// Target's unmodified movement speed, captured for exact restoration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_base_speed: Option<f32>,
}

impl DamageEvent {
    pub fn new(
        attacker: CharacterId,
        target: CharacterId,
        weapon: WeaponCategory,
        damage: DamageTypes,
    ) -> Self {
        Self {
            attacker,
            target,
            weapon,
            damage,
            attacker_skill: 0.0,
            projectile: false,
            geometry: HitGeometry::default(),
            awareness: None,
            target_base_speed: None,
        }
    }

    pub fn with_skill(mut self, skill: f32) -> Self {
        self.attacker_skill = skill;
        self
    }

    pub fn with_projectile(mut self, origin: Vec3) -> Self {
        self.projectile = true;
        self.geometry.origin = Some(origin);
        self
    }

    pub fn with_geometry(mut self, geometry: HitGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_awareness(mut self, awareness: TargetAwareness) -> Self {
        self.awareness = Some(awareness);
        self
    }

    pub fn with_target_base_speed(mut self, speed: f32) -> Self {
        self.target_base_speed = Some(speed);
        self
    }
}

/// Spatial data for a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitGeometry {
    /// Where the attack was launched (projectile spawn point or swing origin).
    /// Distance perks measure from here, never from the attacker's current
    /// position.
    pub origin: Option<Vec3>,
    pub hit_point: Vec3,
    pub target_position: Vec3,
    pub target_forward: Vec3,
}

impl Default for HitGeometry {
    fn default() -> Self {
        Self {
            origin: None,
            hit_point: Vec3::ZERO,
            target_position: Vec3::ZERO,
            target_forward: Vec3::FORWARD,
        }
    }
}

/// Target AI alert state at the moment of the hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetAwareness {
    pub alerted: bool,
    pub has_target: bool,
}

impl TargetAwareness {
    pub const UNAWARE: Self = Self {
        alerted: false,
        has_target: false,
    };
    pub const ALERTED: Self = Self {
        alerted: true,
        has_target: true,
    };
}

/// A successful block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEvent {
    pub defender: CharacterId,
    pub attacker: CharacterId,
    pub blocked: f32,
    /// What blocked the hit; falls back to the defender's loadout when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocker: Option<WeaponCategory>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<Vec3>,
}

impl BlockEvent {
    pub fn new(defender: CharacterId, attacker: CharacterId, blocked: f32) -> Self {
        Self {
            defender,
            attacker,
            blocked,
            blocker: None,
            position: None,
        }
    }

    pub fn with_blocker(mut self, blocker: WeaponCategory) -> Self {
        self.blocker = Some(blocker);
        self
    }
}

/// Damage that actually landed, reported after the host applied it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedDamage {
    pub attacker: CharacterId,
    pub target: CharacterId,
    pub weapon: WeaponCategory,
    pub damage: DamageTypes,
}

/// New equipment in a character's hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipEvent {
    pub character: CharacterId,
    pub weapon: WeaponCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offhand: Option<WeaponCategory>,
}
