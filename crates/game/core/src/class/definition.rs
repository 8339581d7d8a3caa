use super::id::ClassId;
use super::weapon::{WeaponCategories, WeaponCategory};
use crate::perks::PerkDefinition;
use crate::perks::table::{
    ARCHER_PERKS, ASSASSIN_PERKS, BRAWLER_PERKS, BULWARK_PERKS, CRUSHER_PERKS, LANCER_PERKS,
    SWORD_MASTER_PERKS, WIZARD_PERKS,
};

/// Immutable class data, one per [`ClassId`].
#[derive(Debug, PartialEq)]
pub struct ClassDefinition {
    pub id: ClassId,
    pub display_name: &'static str,
    /// Weapons whose hits (or blocks) count for this class.
    pub weapons: WeaponCategories,
    /// Damage bonus fraction gained per class level with a matching weapon.
    pub damage_per_level: f32,
    /// Perks in ascending unlock order.
    pub perks: &'static [PerkDefinition],
}

/// Base bonus at level 50 is +10%.
const DAMAGE_PER_LEVEL: f32 = 0.002;

static CLASSES: [ClassDefinition; 8] = [
    ClassDefinition {
        id: ClassId::SwordMaster,
        display_name: "Sword Master",
        weapons: WeaponCategories::SWORD,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &SWORD_MASTER_PERKS,
    },
    ClassDefinition {
        id: ClassId::Archer,
        display_name: "Archer",
        weapons: WeaponCategories::RANGED,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &ARCHER_PERKS,
    },
    ClassDefinition {
        id: ClassId::Crusher,
        display_name: "Crusher",
        weapons: WeaponCategories::BLUNT.union(WeaponCategories::AXE),
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &CRUSHER_PERKS,
    },
    ClassDefinition {
        id: ClassId::Assassin,
        display_name: "Assassin",
        weapons: WeaponCategories::KNIFE,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &ASSASSIN_PERKS,
    },
    ClassDefinition {
        id: ClassId::Brawler,
        display_name: "Brawler",
        weapons: WeaponCategories::UNARMED,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &BRAWLER_PERKS,
    },
    ClassDefinition {
        id: ClassId::Wizard,
        display_name: "Wizard",
        weapons: WeaponCategories::MAGIC,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &WIZARD_PERKS,
    },
    ClassDefinition {
        id: ClassId::Lancer,
        display_name: "Lancer",
        weapons: WeaponCategories::SPEAR.union(WeaponCategories::POLEARM),
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &LANCER_PERKS,
    },
    ClassDefinition {
        id: ClassId::Bulwark,
        display_name: "Bulwark",
        weapons: WeaponCategories::SHIELD,
        damage_per_level: DAMAGE_PER_LEVEL,
        perks: &BULWARK_PERKS,
    },
];

impl ClassDefinition {
    /// Canonical definition for `id`.
    pub fn get(id: ClassId) -> &'static ClassDefinition {
        let definition = &CLASSES[id.index()];
        debug_assert_eq!(definition.id, id, "class table out of order");
        definition
    }

    pub fn all() -> &'static [ClassDefinition] {
        &CLASSES
    }

    pub fn matches(&self, weapon: WeaponCategory) -> bool {
        self.weapons.contains(weapon.flag())
    }

    /// True if any item in `loadout` counts for this class.
    pub fn matches_any(&self, loadout: WeaponCategories) -> bool {
        self.weapons.intersects(loadout)
    }

    /// Perks unlocked at `level`, ascending.
    pub fn unlocked_perks(&self, level: u8) -> impl Iterator<Item = &'static PerkDefinition> {
        self.perks.iter().filter(move |p| p.is_unlocked(level))
    }
}

/// Single source of truth for whether `weapon` counts for `class`, shared by
/// XP eligibility and damage bonuses.
pub fn is_weapon_compatible(weapon: WeaponCategory, class: ClassId) -> bool {
    ClassDefinition::get(class).matches(weapon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_covers_every_class_in_order() {
        for class in ClassId::iter() {
            assert_eq!(ClassDefinition::get(class).id, class);
        }
    }

    #[test]
    fn every_class_has_five_perks_on_the_ten_level_cadence() {
        for definition in ClassDefinition::all() {
            let levels: Vec<u8> = definition.perks.iter().map(|p| p.unlock_level).collect();
            assert_eq!(levels, vec![10, 20, 30, 40, 50], "{}", definition.display_name);
            assert!(definition.perks.iter().all(|p| p.id.class == definition.id));
        }
    }

    #[test]
    fn weapon_predicates() {
        assert!(is_weapon_compatible(WeaponCategory::Sword, ClassId::SwordMaster));
        assert!(!is_weapon_compatible(WeaponCategory::Spear, ClassId::SwordMaster));
        assert!(is_weapon_compatible(WeaponCategory::Spear, ClassId::Lancer));
        assert!(is_weapon_compatible(WeaponCategory::Polearm, ClassId::Lancer));
        assert!(is_weapon_compatible(WeaponCategory::Crossbow, ClassId::Archer));
        assert!(is_weapon_compatible(WeaponCategory::Unarmed, ClassId::Brawler));
        assert!(is_weapon_compatible(WeaponCategory::Shield, ClassId::Bulwark));
        for class in ClassId::iter() {
            assert!(!is_weapon_compatible(WeaponCategory::Tool, class));
        }
    }

    #[test]
    fn unlocked_perks_respect_level() {
        let archer = ClassDefinition::get(ClassId::Archer);
        assert_eq!(archer.unlocked_perks(9).count(), 0);
        assert_eq!(archer.unlocked_perks(30).count(), 3);
        assert_eq!(archer.unlocked_perks(50).count(), 5);
    }
}
