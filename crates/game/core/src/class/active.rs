use arrayvec::ArrayVec;

use super::id::ClassId;
use crate::config::ProgressionConfig;
use crate::error::ActivationError;
use crate::progression::ProgressBook;

/// Ordered set of a character's active classes.
///
/// Invariant: at most [`ProgressionConfig::MAX_ACTIVE_CLASSES`] entries, no
/// duplicates, and more than one entry only while some class is at or above
/// the dual-class level. The set itself only enforces size and uniqueness;
/// the level rule is checked by [`check_activation`] before every insert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveClassSet {
    classes: ArrayVec<ClassId, { ProgressionConfig::MAX_ACTIVE_CLASSES }>,
}

impl ActiveClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: ClassId) -> bool {
        self.classes.contains(&class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.iter().copied()
    }

    pub fn as_slice(&self) -> &[ClassId] {
        &self.classes
    }

    /// Appends `class`; callers must have run [`check_activation`].
    pub(crate) fn push(&mut self, class: ClassId) {
        debug_assert!(!self.contains(class));
        if !self.contains(class) {
            let _ = self.classes.try_push(class);
        }
    }

    pub(crate) fn remove(&mut self, class: ClassId) -> bool {
        match self.classes.iter().position(|c| *c == class) {
            Some(index) => {
                self.classes.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.classes.clear();
    }

    /// Most recently activated class.
    pub fn last(&self) -> Option<ClassId> {
        self.classes.last().copied()
    }
}

/// Maximum active classes allowed for a character with `progress`.
pub fn active_limit(progress: &ProgressBook, config: &ProgressionConfig) -> usize {
    if progress.any_at_least(config.dual_class_level) {
        ProgressionConfig::MAX_ACTIVE_CLASSES
    } else {
        1
    }
}

/// Checks whether `class` may be added to `active` without breaking the
/// active-class invariant.
pub fn check_activation(
    active: &ActiveClassSet,
    progress: &ProgressBook,
    class: ClassId,
    config: &ProgressionConfig,
) -> Result<(), ActivationError> {
    if active.contains(class) {
        return Err(ActivationError::AlreadyActive(class));
    }
    let limit = active_limit(progress, config);
    if active.len() >= limit {
        return Err(ActivationError::LimitReached { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProgressionConfig {
        ProgressionConfig::default()
    }

    #[test]
    fn single_class_below_dual_level() {
        let progress = ProgressBook::new();
        let mut active = ActiveClassSet::new();

        assert!(check_activation(&active, &progress, ClassId::Archer, &config()).is_ok());
        active.push(ClassId::Archer);

        assert_eq!(
            check_activation(&active, &progress, ClassId::Wizard, &config()),
            Err(ActivationError::LimitReached { limit: 1 })
        );
    }

    #[test]
    fn second_class_unlocks_at_dual_level() {
        let mut progress = ProgressBook::new();
        progress.add_xp(ClassId::Archer, 125_530.0);
        let mut active = ActiveClassSet::new();
        active.push(ClassId::Archer);

        assert!(check_activation(&active, &progress, ClassId::Wizard, &config()).is_ok());
        active.push(ClassId::Wizard);

        assert_eq!(
            check_activation(&active, &progress, ClassId::Lancer, &config()),
            Err(ActivationError::LimitReached { limit: 2 })
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let progress = ProgressBook::new();
        let mut active = ActiveClassSet::new();
        active.push(ClassId::Bulwark);

        assert_eq!(
            check_activation(&active, &progress, ClassId::Bulwark, &config()),
            Err(ActivationError::AlreadyActive(ClassId::Bulwark))
        );
    }

    #[test]
    fn remove_reports_membership() {
        let mut active = ActiveClassSet::new();
        active.push(ClassId::Crusher);

        assert!(active.remove(ClassId::Crusher));
        assert!(!active.remove(ClassId::Crusher));
        assert!(active.is_empty());
    }
}
