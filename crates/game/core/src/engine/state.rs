use arrayvec::ArrayVec;

use crate::class::{ActiveClassSet, ClassId, WeaponCategories, WeaponCategory};
use crate::config::ProgressionConfig;
use crate::perks::PerkState;
use crate::progression::ProgressBook;

/// What a character currently holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pub weapon: Option<WeaponCategory>,
    pub offhand: Option<WeaponCategory>,
}

impl Loadout {
    pub fn categories(&self) -> WeaponCategories {
        self.weapon
            .into_iter()
            .chain(self.offhand)
            .fold(WeaponCategories::empty(), |acc, w| acc | w.flag())
    }
}

/// Everything the engine tracks for one character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterState {
    pub progress: ProgressBook,
    pub active: ActiveClassSet,
    pub perks: PerkState,
    pub loadout: Loadout,
}

impl CharacterState {
    /// `(class, level)` for every active class, in activation order.
    pub fn class_levels(
        &self,
    ) -> ArrayVec<(ClassId, u8), { ProgressionConfig::MAX_ACTIVE_CLASSES }> {
        self.active
            .iter()
            .map(|class| (class, self.progress.level(class)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loadout_combines_both_hands() {
        let loadout = Loadout {
            weapon: Some(WeaponCategory::Sword),
            offhand: Some(WeaponCategory::Shield),
        };
        assert_eq!(loadout.categories(), WeaponCategories::SWORD | WeaponCategories::SHIELD);
        assert!(Loadout::default().categories().is_empty());
    }
}
