/// Balance configuration and tunable parameters for the progression engine.
///
/// Every field has a default matching the shipped balance, so partial TOML
/// files only need to list what they override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    /// Scalar applied to damage dealt (or blocked) before it is awarded as XP.
    pub xp_multiplier: f64,
    /// Level any class must reach before a second class may be active.
    pub dual_class_level: u8,
    /// Fixed sweep/damage-over-time tick interval in milliseconds.
    pub sweep_interval_ms: u64,
    /// Window after the last qualifying hit before a combo counter resets.
    pub combo_timeout_ms: u64,
    /// Blocked damage that must accumulate before Reverb becomes charged.
    pub reverb_threshold: f32,
    /// Lower bound for the composed stamina cost multiplier.
    pub stamina_floor: f32,
    /// Upper bound for defender-side damage reduction.
    pub reduction_cap: f32,
    pub poison: PoisonConfig,
}

/// Tuning for the stacking poison debuff.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoisonConfig {
    pub max_stacks: u8,
    pub duration_ms: u64,
    /// Movement slow contributed by each stack (0.20 = 20%).
    pub slow_per_stack: f32,
    /// Maximum total slow from poison regardless of stacks.
    pub slow_cap: f32,
}

impl ProgressionConfig {
    // ===== compile-time constants =====
    /// Highest attainable class level.
    pub const MAX_LEVEL: u8 = 50;
    /// Perk unlock cadence; every multiple of this level unlocks a perk.
    pub const PERK_INTERVAL: u8 = 10;
    /// Hard cap on simultaneously active classes.
    pub const MAX_ACTIVE_CLASSES: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_XP_MULTIPLIER: f64 = 1.0;
    pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1_000;
    pub const DEFAULT_COMBO_TIMEOUT_MS: u64 = 2_000;
    pub const DEFAULT_REVERB_THRESHOLD: f32 = 150.0;
    pub const DEFAULT_STAMINA_FLOOR: f32 = 0.25;
    pub const DEFAULT_REDUCTION_CAP: f32 = 0.75;

    pub fn new() -> Self {
        Self {
            xp_multiplier: Self::DEFAULT_XP_MULTIPLIER,
            dual_class_level: Self::MAX_LEVEL,
            sweep_interval_ms: Self::DEFAULT_SWEEP_INTERVAL_MS,
            combo_timeout_ms: Self::DEFAULT_COMBO_TIMEOUT_MS,
            reverb_threshold: Self::DEFAULT_REVERB_THRESHOLD,
            stamina_floor: Self::DEFAULT_STAMINA_FLOOR,
            reduction_cap: Self::DEFAULT_REDUCTION_CAP,
            poison: PoisonConfig::default(),
        }
    }

    pub fn with_xp_multiplier(mut self, xp_multiplier: f64) -> Self {
        self.xp_multiplier = xp_multiplier;
        self
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PoisonConfig {
    pub const DEFAULT_MAX_STACKS: u8 = 3;
    pub const DEFAULT_DURATION_MS: u64 = 10_000;
    pub const DEFAULT_SLOW_PER_STACK: f32 = 0.20;
    pub const DEFAULT_SLOW_CAP: f32 = 0.60;

    pub fn duration_secs(&self) -> f32 {
        self.duration_ms as f32 / 1_000.0
    }
}

impl Default for PoisonConfig {
    fn default() -> Self {
        Self {
            max_stacks: Self::DEFAULT_MAX_STACKS,
            duration_ms: Self::DEFAULT_DURATION_MS,
            slow_per_stack: Self::DEFAULT_SLOW_PER_STACK,
            slow_cap: Self::DEFAULT_SLOW_CAP,
        }
    }
}
