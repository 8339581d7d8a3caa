use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};

/// Broad weapon family used to decide which classes a hit or block counts for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WeaponCategory {
    Sword,
    Axe,
    Bow,
    Crossbow,
    /// Clubs, maces, sledges and hammers.
    Blunt,
    Knife,
    Spear,
    /// Atgeirs and other two-handed pole weapons.
    Polearm,
    Unarmed,
    /// Staves and other spell foci.
    Magic,
    Shield,
    /// Pickaxes, torches, fishing rods; never counts for any class.
    Tool,
}

bitflags! {
    /// Set of weapon categories, used for class predicates and loadouts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct WeaponCategories: u16 {
        const SWORD = 1 << 0;
        const AXE = 1 << 1;
        const BOW = 1 << 2;
        const CROSSBOW = 1 << 3;
        const BLUNT = 1 << 4;
        const KNIFE = 1 << 5;
        const SPEAR = 1 << 6;
        const POLEARM = 1 << 7;
        const UNARMED = 1 << 8;
        const MAGIC = 1 << 9;
        const SHIELD = 1 << 10;
        const TOOL = 1 << 11;

        const RANGED = Self::BOW.bits() | Self::CROSSBOW.bits();
    }
}

impl WeaponCategory {
    pub const fn flag(self) -> WeaponCategories {
        match self {
            Self::Sword => WeaponCategories::SWORD,
            Self::Axe => WeaponCategories::AXE,
            Self::Bow => WeaponCategories::BOW,
            Self::Crossbow => WeaponCategories::CROSSBOW,
            Self::Blunt => WeaponCategories::BLUNT,
            Self::Knife => WeaponCategories::KNIFE,
            Self::Spear => WeaponCategories::SPEAR,
            Self::Polearm => WeaponCategories::POLEARM,
            Self::Unarmed => WeaponCategories::UNARMED,
            Self::Magic => WeaponCategories::MAGIC,
            Self::Shield => WeaponCategories::SHIELD,
            Self::Tool => WeaponCategories::TOOL,
        }
    }

    pub fn is_ranged(self) -> bool {
        WeaponCategories::RANGED.contains(self.flag())
    }

    /// Classifies a host item by its prefab or display name.
    ///
    /// Order matters: "crossbow" must win over "bow" and "pickaxe" over "axe".
    /// An empty name means the character is fighting bare-handed.
    pub fn classify(item_name: &str) -> Self {
        let name = item_name.trim().to_ascii_lowercase();
        if name.is_empty() || name.contains("unarmed") || name.contains("fist") {
            return Self::Unarmed;
        }

        const RULES: &[(&[&str], WeaponCategory)] = &[
            (&["pickaxe", "torch", "fishingrod"], WeaponCategory::Tool),
            (&["crossbow"], WeaponCategory::Crossbow),
            (&["knife", "dagger"], WeaponCategory::Knife),
            (&["atgeir", "halberd", "polearm"], WeaponCategory::Polearm),
            (&["spear", "lance"], WeaponCategory::Spear),
            (&["bow"], WeaponCategory::Bow),
            (&["sword", "blade", "mistwalker"], WeaponCategory::Sword),
            (&["mace", "club", "sledge", "hammer"], WeaponCategory::Blunt),
            (&["axe"], WeaponCategory::Axe),
            (&["staff", "wand"], WeaponCategory::Magic),
            (&["shield", "buckler"], WeaponCategory::Shield),
        ];

        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| name.contains(n)))
            .map_or(Self::Tool, |(_, category)| *category)
    }
}

impl From<WeaponCategory> for WeaponCategories {
    fn from(category: WeaponCategory) -> Self {
        category.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_host_item_names() {
        assert_eq!(WeaponCategory::classify("SwordIron"), WeaponCategory::Sword);
        assert_eq!(WeaponCategory::classify("BowFineWood"), WeaponCategory::Bow);
        assert_eq!(WeaponCategory::classify("CrossbowArbalest"), WeaponCategory::Crossbow);
        assert_eq!(WeaponCategory::classify("MaceBronze"), WeaponCategory::Blunt);
        assert_eq!(WeaponCategory::classify("KnifeFlint"), WeaponCategory::Knife);
        assert_eq!(WeaponCategory::classify("SpearBronze"), WeaponCategory::Spear);
        assert_eq!(WeaponCategory::classify("AtgeirIron"), WeaponCategory::Polearm);
        assert_eq!(WeaponCategory::classify("StaffFireball"), WeaponCategory::Magic);
        assert_eq!(WeaponCategory::classify("ShieldBanded"), WeaponCategory::Shield);
        assert_eq!(WeaponCategory::classify("AxeBlackMetal"), WeaponCategory::Axe);
        assert_eq!(WeaponCategory::classify(""), WeaponCategory::Unarmed);
        assert_eq!(WeaponCategory::classify("PickaxeIron"), WeaponCategory::Tool);
        assert_eq!(WeaponCategory::classify("Torch"), WeaponCategory::Tool);
    }

    #[test]
    fn ranged_set() {
        assert!(WeaponCategory::Bow.is_ranged());
        assert!(WeaponCategory::Crossbow.is_ranged());
        assert!(!WeaponCategory::Spear.is_ranged());
    }
}
