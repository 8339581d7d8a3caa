//! Stacking poison debuff.
//!
//! Each application adds a stack (capped), resets the timer to the full
//! duration, and recomputes per-tick damage from the applying attacker's
//! skill. Every stack also layers a movement slow on top of the target's
//! base speed; the base speed captured on first application is kept on the
//! ledger instance so cleanup can restore it exactly.

use crate::config::PoisonConfig;
use crate::effects::{BuffLedger, BuffSpec, EffectKey};
use crate::state::{CharacterId, GameTime};

/// State of the poison debuff right after an application.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoisonApplication {
    pub target: CharacterId,
    pub stacks: u8,
    pub damage_per_tick: f32,
    pub speed_multiplier: f32,
    pub expires_at: GameTime,
    /// Target speed before any poison slow.
    pub baseline: Option<f32>,
}

/// `skill / duration_secs * stacks`.
pub fn damage_per_tick(skill: f32, stacks: u8, config: &PoisonConfig) -> f32 {
    let seconds = config.duration_secs();
    if seconds <= 0.0 {
        return 0.0;
    }
    skill.max(0.0) / seconds * f32::from(stacks)
}

/// Fraction of base speed left with `stacks` poison stacks.
pub fn speed_multiplier(stacks: u8, config: &PoisonConfig) -> f32 {
    1.0 - slow_fraction(stacks, config)
}

/// Movement slow contributed by `stacks`, capped.
pub fn slow_fraction(stacks: u8, config: &PoisonConfig) -> f32 {
    (config.slow_per_stack * f32::from(stacks)).min(config.slow_cap)
}

/// Adds a poison stack to `target` and returns the resulting state.
pub fn apply_poison(
    ledger: &mut BuffLedger,
    target: CharacterId,
    attacker: CharacterId,
    skill: f32,
    baseline: Option<f32>,
    now: GameTime,
    config: &PoisonConfig,
) -> PoisonApplication {
    let spec = BuffSpec::new(EffectKey::POISON, 0.0, Some(config.duration_ms))
        .from_source(attacker)
        .stacking(config.max_stacks)
        .with_baseline(baseline);

    let instance = ledger.trigger(target, spec, now);
    instance.magnitude = damage_per_tick(skill, instance.stacks, config);

    PoisonApplication {
        target,
        stacks: instance.stacks,
        damage_per_tick: instance.magnitude,
        speed_multiplier: speed_multiplier(instance.stacks, config),
        expires_at: instance.expires_at.unwrap_or(now),
        baseline: instance.baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::NoCleanup;

    const ATTACKER: CharacterId = CharacterId(1);
    const TARGET: CharacterId = CharacterId(2);

    #[test]
    fn second_hit_stacks_and_resets_timer() {
        let config = PoisonConfig::default();
        let mut ledger = BuffLedger::new();

        let first = apply_poison(
            &mut ledger,
            TARGET,
            ATTACKER,
            30.0,
            Some(5.0),
            GameTime::ZERO,
            &config,
        );
        assert_eq!(first.stacks, 1);
        assert!((first.damage_per_tick - 3.0).abs() < 1e-6);
        assert!((first.speed_multiplier - 0.8).abs() < 1e-6);

        let now = GameTime::from_secs(2);
        let second = apply_poison(&mut ledger, TARGET, ATTACKER, 30.0, Some(4.0), now, &config);
        assert_eq!(second.stacks, 2);
        assert!((second.damage_per_tick - 6.0).abs() < 1e-6);
        assert_eq!(second.expires_at.since(now), 10_000);
        // Baseline from the first application survives the refresh.
        assert_eq!(second.baseline, Some(5.0));
    }

    #[test]
    fn stacks_and_slow_are_capped() {
        let config = PoisonConfig::default();
        let mut ledger = BuffLedger::new();

        let mut last = None;
        for ms in 0..6 {
            last = Some(apply_poison(
                &mut ledger,
                TARGET,
                ATTACKER,
                10.0,
                None,
                GameTime::from_millis(ms * 100),
                &config,
            ));
        }
        let last = last.unwrap();
        assert_eq!(last.stacks, 3);
        assert!((last.speed_multiplier - 0.4).abs() < 1e-6);
        assert_eq!(ledger.stacks(TARGET, EffectKey::POISON), 3);
    }

    #[test]
    fn expiry_removes_poison() {
        let config = PoisonConfig::default();
        let mut ledger = BuffLedger::new();
        apply_poison(&mut ledger, TARGET, ATTACKER, 10.0, None, GameTime::ZERO, &config);

        assert_eq!(ledger.sweep(GameTime::from_millis(9_999), &mut NoCleanup), 0);
        assert_eq!(ledger.sweep(GameTime::from_secs(10), &mut NoCleanup), 1);
        assert!(!ledger.has_active(TARGET, EffectKey::POISON));
    }
}
