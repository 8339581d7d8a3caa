use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

/// Kind of status effect; determines how the engine reads its magnitude.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Magnitude is an attack-speed factor (1.25 = 25% faster).
    AttackSpeed,
    /// Stacking damage-over-time; magnitude is damage per tick.
    Poison,
    /// Magnitude is the slow fraction (0.3 = 30% slower).
    MovementSlow,
    /// Character cannot move while active.
    MovementDisable,
    /// Magnitude is a damage bonus fraction for the holder's hits.
    DamageBoost,
    /// Magnitude is a damage reduction fraction for hits taken.
    DamageReduction,
    /// Magnitude is a stamina regeneration factor.
    StaminaRegen,
}

/// Perk that sourced an effect, distinguishing e.g. two attack-speed buffs.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTag {
    Rage,
    BladeDance,
    ShadowStep,
    Volley,
    Stagger,
    Chill,
    Riposte,
    Phalanx,
    Stalwart,
    Adrenaline,
    ManaSurge,
}

/// Identity of a buff/debuff slot on a character.
///
/// At most one instance per key exists per character; re-triggering the same
/// key refreshes it instead of adding a second instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectKey {
    pub kind: EffectKind,
    pub tag: Option<EffectTag>,
}

impl EffectKey {
    pub const POISON: Self = Self::untagged(EffectKind::Poison);
    pub const MOVEMENT_DISABLE: Self = Self::untagged(EffectKind::MovementDisable);

    pub const fn untagged(kind: EffectKind) -> Self {
        Self { kind, tag: None }
    }

    pub const fn tagged(kind: EffectKind, tag: EffectTag) -> Self {
        Self {
            kind,
            tag: Some(tag),
        }
    }

    pub const fn attack_speed(tag: EffectTag) -> Self {
        Self::tagged(EffectKind::AttackSpeed, tag)
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Some(tag) => write!(f, "{}:{}", self.kind, tag),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_ledger_naming() {
        assert_eq!(EffectKey::attack_speed(EffectTag::Rage).to_string(), "AttackSpeed:Rage");
        assert_eq!(EffectKey::POISON.to_string(), "Poison");
        assert_eq!(EffectKey::MOVEMENT_DISABLE.to_string(), "MovementDisable");
    }
}
