//! Item name to weapon category mapping.

use std::collections::HashMap;
use std::path::Path;

use class_core::WeaponCategory;

use crate::loaders::{LoadResult, read_file};

const SHIPPED_OVERRIDES: &str = include_str!("../../data/weapons.ron");

/// Name heuristics plus explicit overrides for names they misclassify.
#[derive(Clone, Debug, Default)]
pub struct WeaponCatalog {
    overrides: HashMap<String, WeaponCategory>,
}

impl WeaponCatalog {
    /// Load overrides from a RON map of `"ItemName": Category`.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        let raw: HashMap<String, WeaponCategory> = ron::from_str(content)?;
        let overrides = raw
            .into_iter()
            .map(|(name, category)| (name.to_ascii_lowercase(), category))
            .collect();
        Ok(Self { overrides })
    }

    /// The overrides shipped in `data/weapons.ron`.
    pub fn shipped() -> LoadResult<Self> {
        Self::parse(SHIPPED_OVERRIDES)
    }

    /// Category for `item_name`, preferring an explicit override.
    pub fn categorize(&self, item_name: &str) -> WeaponCategory {
        self.overrides
            .get(&item_name.to_ascii_lowercase())
            .copied()
            .unwrap_or_else(|| WeaponCategory::classify(item_name))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_heuristics() {
        let catalog = WeaponCatalog::shipped().unwrap();
        assert_eq!(WeaponCategory::classify("Hammer"), WeaponCategory::Blunt);
        assert_eq!(catalog.categorize("Hammer"), WeaponCategory::Tool);
        assert_eq!(catalog.categorize("dualknivesskollhati"), WeaponCategory::Knife);
        assert_eq!(catalog.categorize("SledgeIron"), WeaponCategory::Blunt);
    }

    #[test]
    fn unknown_names_fall_back_to_heuristics() {
        let catalog = WeaponCatalog::default();
        assert_eq!(catalog.categorize("SwordIron"), WeaponCategory::Sword);
        assert_eq!(catalog.categorize("BowFineWood"), WeaponCategory::Bow);
        assert_eq!(catalog.categorize(""), WeaponCategory::Unarmed);
    }
}
