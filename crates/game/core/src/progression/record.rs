use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::table::{level_for_xp, perk_levels_crossed};
use crate::class::ClassId;

/// Cumulative progress for one (character, class) pair.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressRecord {
    xp: f64,
    /// Reserved for gating classes behind unlocks; currently always true.
    pub unlocked: bool,
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self {
            xp: 0.0,
            unlocked: true,
        }
    }

    /// Builds a record from persisted XP, discarding non-finite or negative values.
    pub fn with_xp(xp: f64) -> Self {
        Self {
            xp: if xp.is_finite() && xp > 0.0 { xp } else { 0.0 },
            unlocked: true,
        }
    }

    pub fn xp(&self) -> f64 {
        self.xp
    }

    /// Level derived from cumulative XP.
    pub fn level(&self) -> u8 {
        level_for_xp(self.xp)
    }

    /// Adds XP. Returns `(old_level, new_level)`; non-positive amounts are ignored.
    fn add(&mut self, amount: f64) -> (u8, u8) {
        let old = self.level();
        if amount.is_finite() && amount > 0.0 {
            self.xp += amount;
        }
        (old, self.level())
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an XP award.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelChange {
    pub class: ClassId,
    pub old_level: u8,
    pub new_level: u8,
    /// Every perk unlock level crossed by this award, ascending.
    pub perk_levels: ArrayVec<u8, 5>,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }

    pub fn crossed_perk_boundary(&self) -> bool {
        !self.perk_levels.is_empty()
    }
}

/// All class progress for a single character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressBook {
    records: BTreeMap<ClassId, ProgressRecord>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards XP to `class`, creating its record on first use.
    ///
    /// Non-positive or non-finite amounts are a no-op that still reports the
    /// current level, so callers can feed raw post-modifier damage directly.
    pub fn add_xp(&mut self, class: ClassId, amount: f64) -> LevelChange {
        let (old_level, new_level) = if amount.is_finite() && amount > 0.0 {
            self.records.entry(class).or_default().add(amount)
        } else {
            let level = self.level(class);
            (level, level)
        };

        LevelChange {
            class,
            old_level,
            new_level,
            perk_levels: perk_levels_crossed(old_level, new_level),
        }
    }

    /// Level for `class`, 0 if no progress exists.
    pub fn level(&self, class: ClassId) -> u8 {
        self.records.get(&class).map_or(0, ProgressRecord::level)
    }

    pub fn xp(&self, class: ClassId) -> f64 {
        self.records.get(&class).map_or(0.0, ProgressRecord::xp)
    }

    pub fn get(&self, class: ClassId) -> Option<&ProgressRecord> {
        self.records.get(&class)
    }

    /// Clears XP for `class`. Returns true if the class had any progress.
    pub fn reset(&mut self, class: ClassId) -> bool {
        self.records.remove(&class).is_some_and(|r| r.xp() > 0.0)
    }

    /// Replaces the record for `class` (used by snapshot restore).
    pub fn insert(&mut self, class: ClassId, record: ProgressRecord) {
        self.records.insert(class, record);
    }

    /// True if any class has reached `level`.
    pub fn any_at_least(&self, level: u8) -> bool {
        self.records.values().any(|r| r.level() >= level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ProgressRecord)> + '_ {
        self.records.iter().map(|(class, record)| (*class, record))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_threshold_reaches_level_ten() {
        let mut book = ProgressBook::new();
        let change = book.add_xp(ClassId::Archer, 5106.0);

        assert_eq!(change.old_level, 0);
        assert_eq!(change.new_level, 10);
        assert_eq!(change.perk_levels.as_slice(), &[10]);
    }

    #[test]
    fn one_short_stays_at_level_nine() {
        let mut book = ProgressBook::new();
        let change = book.add_xp(ClassId::Archer, 5105.0);

        assert_eq!(change.new_level, 9);
        assert!(!change.crossed_perk_boundary());
    }

    #[test]
    fn non_positive_amounts_are_ignored() {
        let mut book = ProgressBook::new();
        book.add_xp(ClassId::Crusher, 500.0);

        let change = book.add_xp(ClassId::Crusher, -100.0);
        assert!(!change.leveled_up());
        assert_eq!(book.xp(ClassId::Crusher), 500.0);

        book.add_xp(ClassId::Wizard, 0.0);
        assert!(book.get(ClassId::Wizard).is_none());
    }

    #[test]
    fn split_awards_reach_same_level_as_single_award() {
        let awards = [(37.0, 5000.0), (4145.0, 961.0), (100_000.0, 30_000.0)];

        for (a, b) in awards {
            let mut split = ProgressBook::new();
            split.add_xp(ClassId::Lancer, a);
            split.add_xp(ClassId::Lancer, b);

            let mut single = ProgressBook::new();
            single.add_xp(ClassId::Lancer, a + b);

            assert_eq!(split.level(ClassId::Lancer), single.level(ClassId::Lancer));
        }
    }

    #[test]
    fn level_never_decreases() {
        let mut book = ProgressBook::new();
        let mut last = 0;
        for amount in [10.0, 0.0, 250.0, -3.0, 9000.0, 1.0, 200_000.0] {
            let change = book.add_xp(ClassId::Brawler, amount);
            assert!(change.new_level >= last);
            last = change.new_level;
        }
        assert_eq!(last, 50);
    }

    #[test]
    fn xp_keeps_accumulating_past_max_level() {
        let mut book = ProgressBook::new();
        book.add_xp(ClassId::Bulwark, 125_530.0);
        let change = book.add_xp(ClassId::Bulwark, 10_000.0);

        assert_eq!(change.old_level, 50);
        assert_eq!(change.new_level, 50);
        assert_eq!(book.xp(ClassId::Bulwark), 135_530.0);
    }

    #[test]
    fn reset_clears_progress() {
        let mut book = ProgressBook::new();
        book.add_xp(ClassId::Assassin, 2000.0);

        assert!(book.reset(ClassId::Assassin));
        assert_eq!(book.level(ClassId::Assassin), 0);
        assert!(!book.reset(ClassId::Assassin));
    }
}
