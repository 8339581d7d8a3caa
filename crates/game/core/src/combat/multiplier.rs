//! Pure damage multiplier composition.
//!
//! Bonuses from all active classes whose weapon predicate matches are summed
//! as fractions above 1.0: two classes granting +15% each yield ×1.30, never
//! ×1.15×1.15. Nothing here reads or writes engine state, so these functions
//! are safe for UI previews.

use crate::class::{ClassDefinition, ClassId, WeaponCategories, WeaponCategory};
use crate::config::ProgressionConfig;
use crate::perks::PerkEffect;

/// Bonus fraction `class` grants at `level` for a matching weapon: the
/// per-level scalar plus every unlocked passive percentage perk.
pub fn class_bonus(class: ClassId, level: u8) -> f32 {
    let definition = ClassDefinition::get(class);
    let level = level.min(ProgressionConfig::MAX_LEVEL);
    let passive: f32 = definition
        .unlocked_perks(level)
        .filter(|p| p.is_passive())
        .filter_map(|p| match p.effect {
            PerkEffect::PercentDamage(fraction) => Some(fraction),
            _ => None,
        })
        .sum();
    definition.damage_per_level * f32::from(level) + passive
}

/// `1.0 + Σ bonus` over the `(class, level)` pairs whose predicate matches
/// `weapon`. Non-matching classes contribute nothing.
pub fn compose_multiplier(
    weapon: WeaponCategory,
    classes: impl IntoIterator<Item = (ClassId, u8)>,
) -> f32 {
    let bonus: f32 = classes
        .into_iter()
        .filter(|(class, _)| ClassDefinition::get(*class).matches(weapon))
        .map(|(class, level)| class_bonus(class, level))
        .sum();
    1.0 + bonus
}

/// Multiplier a single class would grant at `level` with a matching weapon.
pub fn simulate_damage_bonus(class: ClassId, level: u8) -> f32 {
    1.0 + class_bonus(class, level)
}

/// Product of unlocked passive stamina scalars from matching classes,
/// floored at `floor`.
pub fn stamina_multiplier(
    weapon: WeaponCategory,
    classes: impl IntoIterator<Item = (ClassId, u8)>,
    floor: f32,
) -> f32 {
    classes
        .into_iter()
        .filter(|(class, _)| ClassDefinition::get(*class).matches(weapon))
        .flat_map(|(class, level)| ClassDefinition::get(class).unlocked_perks(level))
        .filter(|p| p.is_passive())
        .filter_map(|p| match p.effect {
            PerkEffect::StaminaCost(scalar) => Some(scalar),
            _ => None,
        })
        .product::<f32>()
        .max(floor)
}

/// Passive damage reduction from classes whose predicate intersects the
/// defender's `loadout`. Additive, uncapped; the engine applies the cap.
pub fn passive_reduction(
    loadout: WeaponCategories,
    classes: impl IntoIterator<Item = (ClassId, u8)>,
) -> f32 {
    classes
        .into_iter()
        .filter(|(class, _)| ClassDefinition::get(*class).matches_any(loadout))
        .flat_map(|(class, level)| ClassDefinition::get(class).unlocked_perks(level))
        .filter(|p| p.is_passive())
        .filter_map(|p| match p.effect {
            PerkEffect::DamageReduction(fraction) => Some(fraction),
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn level_zero_has_no_bonus() {
        assert_eq!(class_bonus(ClassId::SwordMaster, 0), 0.0);
        assert_eq!(compose_multiplier(WeaponCategory::Sword, [(ClassId::SwordMaster, 0)]), 1.0);
    }

    #[test]
    fn sword_master_at_max_level_grants_ten_percent() {
        assert!(close(class_bonus(ClassId::SwordMaster, 50), 0.10));
        assert!(close(class_bonus(ClassId::Lancer, 50), 0.10));
    }

    #[test]
    fn passive_percent_perks_add_to_base() {
        // Crusher: Heavy Blows (+5%) at 10, Bone Breaker (+5%) at 30.
        assert!(close(class_bonus(ClassId::Crusher, 9), 0.018));
        assert!(close(class_bonus(ClassId::Crusher, 10), 0.02 + 0.05));
        assert!(close(class_bonus(ClassId::Crusher, 30), 0.06 + 0.10));
    }

    #[test]
    fn only_matching_classes_count() {
        let active = [(ClassId::SwordMaster, 50), (ClassId::Lancer, 50)];

        assert!(close(compose_multiplier(WeaponCategory::Sword, active), 1.10));
        assert!(close(compose_multiplier(WeaponCategory::Spear, active), 1.10));
        assert_eq!(compose_multiplier(WeaponCategory::Bow, active), 1.0);
    }

    #[test]
    fn simulate_returns_the_multiplier() {
        assert_eq!(simulate_damage_bonus(ClassId::SwordMaster, 0), 1.0);
        assert!(close(simulate_damage_bonus(ClassId::SwordMaster, 50), 1.10));
    }

    #[test]
    fn simulate_clamps_level() {
        assert_eq!(
            simulate_damage_bonus(ClassId::Wizard, 80),
            simulate_damage_bonus(ClassId::Wizard, 50)
        );
    }

    #[test]
    fn stamina_scalars_multiply_and_floor() {
        assert!(close(
            stamina_multiplier(WeaponCategory::Magic, [(ClassId::Wizard, 30)], 0.25),
            0.8
        ));
        assert_eq!(stamina_multiplier(WeaponCategory::Magic, [(ClassId::Wizard, 29)], 0.25), 1.0);
        assert_eq!(stamina_multiplier(WeaponCategory::Magic, [(ClassId::Wizard, 30)], 0.9), 0.9);
        assert_eq!(stamina_multiplier(WeaponCategory::Sword, [(ClassId::Wizard, 50)], 0.25), 1.0);
    }

    #[test]
    fn passive_reduction_requires_matching_loadout() {
        let shield = WeaponCategories::SWORD | WeaponCategories::SHIELD;
        assert!(close(passive_reduction(shield, [(ClassId::Bulwark, 50)]), 0.15));
        assert_eq!(passive_reduction(WeaponCategories::SWORD, [(ClassId::Bulwark, 50)]), 0.0);
    }
}
