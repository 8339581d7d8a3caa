//! The class progression and perk-resolution engine.
//!
//! [`ClassEngine`] owns every per-character table (progress, active classes,
//! perk counters) plus the shared [`BuffLedger`]. Hosts feed it events with a
//! caller-supplied [`GameTime`] and write the returned decisions back into
//! their own objects; the engine never calls out.
//!
//! Queries on unknown characters return safe defaults (level 0, multiplier
//! 1.0, no buffs) and never create state.

mod events;
mod lifecycle;
mod pipeline;
mod state;

pub use events::{
    BlockOutcome, DamageOutcome, DamageStage, DotTick, EventEffect, InboundEvent, ResetOutcome,
    SpeedChange, TickReport, TimedEvent, TriggeredPerk,
};
pub use state::{CharacterState, Loadout};

use std::collections::BTreeMap;

use crate::class::{ClassId, WeaponCategory, active_limit, check_activation};
use crate::combat::{compose_multiplier, passive_reduction, stamina_multiplier};
use crate::config::ProgressionConfig;
use crate::effects::{BuffLedger, BuffSummary, EffectKey, EffectKind};
use crate::error::ActivationError;
use crate::perks::slow_fraction;
use crate::progression::LevelChange;
use crate::state::{CharacterId, GameTime};

/// Movement never drops below this fraction from slows alone; only an
/// explicit disable stops a character.
pub const MIN_MOVEMENT_MULTIPLIER: f32 = 0.1;

/// Deterministic, single-threaded class engine.
#[derive(Clone, Debug, Default)]
pub struct ClassEngine {
    config: ProgressionConfig,
    characters: BTreeMap<CharacterId, CharacterState>,
    ledger: BuffLedger,
    last_dot_tick: Option<GameTime>,
}

impl ClassEngine {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            characters: BTreeMap::new(),
            ledger: BuffLedger::new(),
            last_dot_tick: None,
        }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn ledger(&self) -> &BuffLedger {
        &self.ledger
    }

    pub fn character(&self, character: CharacterId) -> Option<&CharacterState> {
        self.characters.get(&character)
    }

    /// Characters with any tracked progress or selection.
    pub fn characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.characters.keys().copied()
    }

    fn state_mut(&mut self, character: CharacterId) -> &mut CharacterState {
        self.characters.entry(character).or_default()
    }

    // ========================================================================
    // XP / levels
    // ========================================================================

    /// Awards `amount` XP to `class`. Non-positive amounts are a no-op.
    pub fn add_xp(&mut self, character: CharacterId, class: ClassId, amount: f64) -> LevelChange {
        if !(amount.is_finite() && amount > 0.0) {
            let level = self.level(character, class);
            return LevelChange {
                class,
                old_level: level,
                new_level: level,
                perk_levels: Default::default(),
            };
        }
        self.state_mut(character).progress.add_xp(class, amount)
    }

    pub fn level(&self, character: CharacterId, class: ClassId) -> u8 {
        self.characters
            .get(&character)
            .map_or(0, |s| s.progress.level(class))
    }

    pub fn xp(&self, character: CharacterId, class: ClassId) -> f64 {
        self.characters
            .get(&character)
            .map_or(0.0, |s| s.progress.xp(class))
    }

    // ========================================================================
    // Active classes
    // ========================================================================

    pub fn active_classes(&self, character: CharacterId) -> &[ClassId] {
        self.characters
            .get(&character)
            .map_or(&[], |s| s.active.as_slice())
    }

    /// Number of classes `character` may have active right now.
    pub fn active_limit(&self, character: CharacterId) -> usize {
        self.characters
            .get(&character)
            .map_or(1, |s| active_limit(&s.progress, &self.config))
    }

    pub fn can_activate(&self, character: CharacterId, class: ClassId) -> bool {
        match self.characters.get(&character) {
            Some(s) => check_activation(&s.active, &s.progress, class, &self.config).is_ok(),
            None => true,
        }
    }

    /// Clears the active set and activates exactly `class`.
    pub fn set_sole_active_class(&mut self, character: CharacterId, class: ClassId) {
        let state = self.state_mut(character);
        state.active.clear();
        state.active.push(class);
    }

    /// Adds `class` to the active set if the class cap allows it. On failure
    /// nothing changes; existing classes are never evicted.
    pub fn add_active_class(
        &mut self,
        character: CharacterId,
        class: ClassId,
    ) -> Result<(), ActivationError> {
        let config = &self.config;
        let state = self.characters.entry(character).or_default();
        check_activation(&state.active, &state.progress, class, config)?;
        state.active.push(class);
        Ok(())
    }

    pub fn remove_active_class(&mut self, character: CharacterId, class: ClassId) -> bool {
        self.characters
            .get_mut(&character)
            .is_some_and(|s| s.active.remove(class))
    }

    /// Clears all XP for `class`. If the character then exceeds the class
    /// cap, the reset class is deactivated when active, otherwise the most
    /// recently activated one.
    pub fn reset_class_progress(&mut self, character: CharacterId, class: ClassId) -> ResetOutcome {
        let config = &self.config;
        let Some(state) = self.characters.get_mut(&character) else {
            return ResetOutcome::default();
        };
        let had_progress = state.progress.reset(class);

        let mut deactivated = None;
        if state.active.len() > active_limit(&state.progress, config) {
            let victim = if state.active.contains(class) {
                Some(class)
            } else {
                state.active.last()
            };
            if let Some(victim) = victim {
                state.active.remove(victim);
                deactivated = Some(victim);
            }
        }

        ResetOutcome {
            had_progress,
            deactivated,
        }
    }

    // ========================================================================
    // Pure multiplier queries
    // ========================================================================

    /// Class-derived multiplier for `weapon`; no buffs, no side effects.
    pub fn compose_multiplier(&self, character: CharacterId, weapon: WeaponCategory) -> f32 {
        match self.characters.get(&character) {
            Some(s) => compose_multiplier(weapon, s.class_levels()),
            None => 1.0,
        }
    }

    /// `1 + Σ(magnitude - 1)` over active attack-speed buffs.
    pub fn attack_speed_multiplier(&self, character: CharacterId, now: GameTime) -> f32 {
        1.0 + self
            .ledger
            .active(character, now)
            .filter(|b| b.key.kind == EffectKind::AttackSpeed)
            .map(|b| b.magnitude - 1.0)
            .sum::<f32>()
    }

    /// `1 + Σ(magnitude - 1)` over active stamina regeneration buffs.
    pub fn stamina_regen_multiplier(&self, character: CharacterId, now: GameTime) -> f32 {
        1.0 + self
            .ledger
            .active(character, now)
            .filter(|b| b.key.kind == EffectKind::StaminaRegen)
            .map(|b| b.magnitude - 1.0)
            .sum::<f32>()
    }

    /// Combined movement multiplier: 0 while disabled, otherwise one minus
    /// every slow (including poison stacks), floored.
    pub fn movement_multiplier(&self, character: CharacterId, now: GameTime) -> f32 {
        if self
            .ledger
            .is_active_at(character, EffectKey::MOVEMENT_DISABLE, now)
        {
            return 0.0;
        }
        let slows: f32 = self
            .ledger
            .active(character, now)
            .map(|b| match b.key.kind {
                EffectKind::MovementSlow => b.magnitude,
                EffectKind::Poison => slow_fraction(b.stacks, &self.config.poison),
                _ => 0.0,
            })
            .sum();
        (1.0 - slows).max(MIN_MOVEMENT_MULTIPLIER)
    }

    /// Stamina cost multiplier for attacks with `weapon`.
    pub fn stamina_cost_multiplier(&self, character: CharacterId, weapon: WeaponCategory) -> f32 {
        match self.characters.get(&character) {
            Some(s) => stamina_multiplier(weapon, s.class_levels(), self.config.stamina_floor),
            None => 1.0,
        }
    }

    /// Damage reduction on hits `character` takes: passive perks gated on the
    /// current loadout plus reduction buffs, capped.
    pub fn damage_reduction(&self, character: CharacterId, now: GameTime) -> f32 {
        let passive = self
            .characters
            .get(&character)
            .map_or(0.0, |s| passive_reduction(s.loadout.categories(), s.class_levels()));
        let buffs: f32 = self
            .ledger
            .active(character, now)
            .filter(|b| b.key.kind == EffectKind::DamageReduction)
            .map(|b| b.magnitude)
            .sum();
        (passive + buffs).clamp(0.0, self.config.reduction_cap)
    }

    pub fn buff_summary(&self, character: CharacterId, now: GameTime) -> Vec<BuffSummary> {
        self.ledger.summary(character, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{BuffSpec, EffectTag};

    const HERO: CharacterId = CharacterId(1);
    const MAX_XP: f64 = 125_530.0;

    fn engine() -> ClassEngine {
        ClassEngine::new(ProgressionConfig::default())
    }

    #[test]
    fn unknown_characters_get_safe_defaults() {
        let engine = engine();
        assert_eq!(engine.level(HERO, ClassId::Archer), 0);
        assert!(engine.active_classes(HERO).is_empty());
        assert_eq!(engine.compose_multiplier(HERO, WeaponCategory::Bow), 1.0);
        assert_eq!(engine.movement_multiplier(HERO, GameTime::ZERO), 1.0);
        assert!(engine.buff_summary(HERO, GameTime::ZERO).is_empty());
        assert!(engine.character(HERO).is_none());
    }

    #[test]
    fn non_positive_xp_creates_no_state() {
        let mut engine = engine();
        let change = engine.add_xp(HERO, ClassId::Archer, -5.0);
        assert!(!change.leveled_up());
        assert!(engine.character(HERO).is_none());
    }

    #[test]
    fn archer_reaches_level_ten_at_5106_xp() {
        let mut engine = engine();
        let change = engine.add_xp(HERO, ClassId::Archer, 5_106.0);
        assert_eq!(change.new_level, 10);
        assert_eq!(change.perk_levels.as_slice(), &[10]);

        let mut other = self::engine();
        let change = other.add_xp(HERO, ClassId::Archer, 5_105.0);
        assert_eq!(change.new_level, 9);
        assert!(!change.crossed_perk_boundary());
    }

    #[test]
    fn second_class_requires_a_max_level_class() {
        let mut engine = engine();
        engine.set_sole_active_class(HERO, ClassId::SwordMaster);
        assert_eq!(
            engine.add_active_class(HERO, ClassId::Lancer),
            Err(ActivationError::LimitReached { limit: 1 })
        );
        assert_eq!(engine.active_classes(HERO), &[ClassId::SwordMaster]);

        engine.add_xp(HERO, ClassId::SwordMaster, MAX_XP);
        assert!(engine.can_activate(HERO, ClassId::Lancer));
        engine.add_active_class(HERO, ClassId::Lancer).unwrap();
        assert!(!engine.can_activate(HERO, ClassId::Archer));
        assert_eq!(engine.active_classes(HERO), &[ClassId::SwordMaster, ClassId::Lancer]);
    }

    #[test]
    fn active_invariant_holds_across_operation_sequences() {
        let mut engine = engine();
        let classes = [ClassId::Archer, ClassId::Wizard, ClassId::Lancer, ClassId::Bulwark];

        for (step, class) in classes.iter().cycle().take(24).enumerate() {
            match step % 4 {
                0 => {
                    let _ = engine.add_active_class(HERO, *class);
                }
                1 => {
                    engine.remove_active_class(HERO, *class);
                }
                2 => engine.set_sole_active_class(HERO, *class),
                _ => {
                    let _ = engine.add_active_class(HERO, *class);
                }
            }
            if step == 11 {
                engine.add_xp(HERO, ClassId::Bulwark, MAX_XP);
            }
            let limit = if engine.level(HERO, ClassId::Bulwark) >= 50 { 2 } else { 1 };
            assert!(engine.active_classes(HERO).len() <= limit, "step {step}");
        }
    }

    #[test]
    fn reset_deactivates_to_restore_the_cap() {
        let mut engine = engine();
        engine.add_xp(HERO, ClassId::SwordMaster, MAX_XP);
        engine.set_sole_active_class(HERO, ClassId::SwordMaster);
        engine.add_active_class(HERO, ClassId::Lancer).unwrap();

        let outcome = engine.reset_class_progress(HERO, ClassId::SwordMaster);
        assert!(outcome.had_progress);
        assert_eq!(outcome.deactivated, Some(ClassId::SwordMaster));
        assert_eq!(engine.active_classes(HERO), &[ClassId::Lancer]);
        assert_eq!(engine.level(HERO, ClassId::SwordMaster), 0);
    }

    #[test]
    fn sword_master_and_lancer_each_count_only_for_their_weapon() {
        let mut engine = engine();
        engine.add_xp(HERO, ClassId::SwordMaster, MAX_XP);
        engine.add_xp(HERO, ClassId::Lancer, MAX_XP);
        engine.set_sole_active_class(HERO, ClassId::SwordMaster);
        engine.add_active_class(HERO, ClassId::Lancer).unwrap();

        assert!((engine.compose_multiplier(HERO, WeaponCategory::Sword) - 1.10).abs() < 1e-5);
        assert!((engine.compose_multiplier(HERO, WeaponCategory::Spear) - 1.10).abs() < 1e-5);
        assert_eq!(engine.compose_multiplier(HERO, WeaponCategory::Bow), 1.0);
    }

    #[test]
    fn attack_speed_buffs_stack_additively() {
        let mut engine = engine();
        engine.ledger.trigger(
            HERO,
            BuffSpec::new(EffectKey::attack_speed(EffectTag::Rage), 1.3, Some(8_000)),
            GameTime::ZERO,
        );
        engine.ledger.trigger(
            HERO,
            BuffSpec::new(EffectKey::attack_speed(EffectTag::BladeDance), 1.15, Some(6_000)),
            GameTime::ZERO,
        );
        assert!((engine.attack_speed_multiplier(HERO, GameTime::ZERO) - 1.45).abs() < 1e-5);
        assert!((engine.attack_speed_multiplier(HERO, GameTime::from_secs(7)) - 1.3).abs() < 1e-5);
    }

    #[test]
    fn disable_overrides_slows() {
        let mut engine = engine();
        engine.ledger.trigger(
            HERO,
            BuffSpec::new(
                EffectKey::tagged(EffectKind::MovementSlow, EffectTag::Chill),
                0.95,
                Some(2_000),
            ),
            GameTime::ZERO,
        );
        assert_eq!(engine.movement_multiplier(HERO, GameTime::ZERO), MIN_MOVEMENT_MULTIPLIER);

        let disable = BuffSpec::new(EffectKey::MOVEMENT_DISABLE, 1.0, Some(1_500));
        engine.ledger.trigger(HERO, disable, GameTime::ZERO);
        assert_eq!(engine.movement_multiplier(HERO, GameTime::ZERO), 0.0);
        assert_eq!(
            engine.movement_multiplier(HERO, GameTime::from_millis(1_500)),
            MIN_MOVEMENT_MULTIPLIER
        );
    }

    #[test]
    fn reduction_is_capped() {
        let mut engine = engine();
        for tag in [EffectTag::Phalanx, EffectTag::Stalwart] {
            engine.ledger.trigger(
                HERO,
                BuffSpec::new(EffectKey::tagged(EffectKind::DamageReduction, tag), 0.5, None),
                GameTime::ZERO,
            );
        }
        assert_eq!(engine.damage_reduction(HERO, GameTime::ZERO), 0.75);
    }
}
