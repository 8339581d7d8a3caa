//! Per-type damage amounts.

#[cfg(feature = "serde")]
use std::collections::BTreeMap;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Damage type carried by a hit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumCount, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    // Physical subtypes
    Blunt,
    Slash,
    Pierce,
    Chop,
    // Elemental subtypes
    Fire,
    Frost,
    Lightning,
    Poison,
    Spirit,
}

impl DamageKind {
    pub fn is_physical(self) -> bool {
        matches!(self, Self::Blunt | Self::Slash | Self::Pierce | Self::Chop)
    }
}

/// Damage amounts indexed by [`DamageKind`].
///
/// Serializes as a map of the non-zero entries, e.g. `{Slash: 30.0}`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BTreeMap<DamageKind, f32>", into = "BTreeMap<DamageKind, f32>")
)]
pub struct DamageTypes {
    amounts: [f32; DamageKind::COUNT],
}

impl DamageTypes {
    pub const fn zero() -> Self {
        Self {
            amounts: [0.0; DamageKind::COUNT],
        }
    }

    /// Single-type damage.
    pub fn of(kind: DamageKind, amount: f32) -> Self {
        let mut damage = Self::zero();
        damage.set(kind, amount);
        damage
    }

    pub fn with(mut self, kind: DamageKind, amount: f32) -> Self {
        self.set(kind, amount);
        self
    }

    pub fn get(&self, kind: DamageKind) -> f32 {
        self.amounts[kind as usize]
    }

    pub fn set(&mut self, kind: DamageKind, amount: f32) {
        self.amounts[kind as usize] = amount;
    }

    pub fn add(&mut self, kind: DamageKind, amount: f32) {
        self.amounts[kind as usize] += amount;
    }

    /// Sum across all types, ignoring negative entries.
    pub fn total(&self) -> f32 {
        self.amounts.iter().map(|a| a.max(0.0)).sum()
    }

    pub fn physical(&self) -> f32 {
        self.iter()
            .filter(|(kind, _)| kind.is_physical())
            .map(|(_, amount)| amount.max(0.0))
            .sum()
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            amounts: self.amounts.map(|a| a * factor),
        }
    }

    /// Non-zero entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (DamageKind, f32)> + '_ {
        DamageKind::iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, amount)| *amount != 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.amounts.iter().all(|a| *a == 0.0)
    }
}

#[cfg(feature = "serde")]
impl From<BTreeMap<DamageKind, f32>> for DamageTypes {
    fn from(map: BTreeMap<DamageKind, f32>) -> Self {
        let mut damage = Self::zero();
        for (kind, amount) in map {
            damage.set(kind, amount);
        }
        damage
    }
}

#[cfg(feature = "serde")]
impl From<DamageTypes> for BTreeMap<DamageKind, f32> {
    fn from(damage: DamageTypes) -> Self {
        damage.iter().collect()
    }
}
