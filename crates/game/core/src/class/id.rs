use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Identity of a playable class.
///
/// Parsing accepts the kebab-case name case-insensitively, plus the
/// alternate names some players use (`pugilist`, `mage`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ClassId {
    SwordMaster,
    Archer,
    Crusher,
    Assassin,
    #[strum(to_string = "brawler", serialize = "pugilist")]
    Brawler,
    #[strum(to_string = "wizard", serialize = "mage")]
    Wizard,
    Lancer,
    Bulwark,
}

impl ClassId {
    /// Position in the canonical class table.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("sword-master".parse::<ClassId>(), Ok(ClassId::SwordMaster));
        assert_eq!("Archer".parse::<ClassId>(), Ok(ClassId::Archer));
        assert_eq!("pugilist".parse::<ClassId>(), Ok(ClassId::Brawler));
        assert_eq!("mage".parse::<ClassId>(), Ok(ClassId::Wizard));
        assert!("paladin".parse::<ClassId>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for class in ClassId::iter() {
            assert_eq!(class.to_string().parse::<ClassId>(), Ok(class));
        }
    }

    #[test]
    fn indices_are_dense() {
        for (i, class) in ClassId::iter().enumerate() {
            assert_eq!(class.index(), i);
        }
        assert_eq!(ClassId::COUNT, 8);
    }
}
