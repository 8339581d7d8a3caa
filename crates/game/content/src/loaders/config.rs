//! Progression configuration loader.

use std::path::Path;

use anyhow::ensure;
use class_core::ProgressionConfig;

use crate::loaders::{LoadResult, read_file};

const SHIPPED_CONFIG: &str = include_str!("../../data/progression.toml");

/// Loader for progression balance from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys take their built-in defaults. Values outside their valid
    /// range are rejected rather than clamped.
    pub fn load(path: &Path) -> LoadResult<ProgressionConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Parse and validate TOML config text.
    pub fn parse(content: &str) -> LoadResult<ProgressionConfig> {
        let config: ProgressionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// The balance shipped in `data/progression.toml`.
    pub fn shipped() -> LoadResult<ProgressionConfig> {
        Self::parse(SHIPPED_CONFIG)
    }

    pub fn validate(config: &ProgressionConfig) -> LoadResult<()> {
        ensure!(
            config.xp_multiplier.is_finite() && config.xp_multiplier >= 0.0,
            "xp_multiplier must be a non-negative number, got {}",
            config.xp_multiplier
        );
        ensure!(
            (1..=ProgressionConfig::MAX_LEVEL).contains(&config.dual_class_level),
            "dual_class_level must be within 1..={}, got {}",
            ProgressionConfig::MAX_LEVEL,
            config.dual_class_level
        );
        ensure!(config.sweep_interval_ms > 0, "sweep_interval_ms must be positive");
        ensure!(
            (0.0..1.0).contains(&config.reduction_cap),
            "reduction_cap must be within [0, 1), got {}",
            config.reduction_cap
        );
        ensure!(
            config.stamina_floor > 0.0 && config.stamina_floor <= 1.0,
            "stamina_floor must be within (0, 1], got {}",
            config.stamina_floor
        );
        ensure!(config.poison.max_stacks >= 1, "poison.max_stacks must be at least 1");
        ensure!(config.poison.duration_ms > 0, "poison.duration_ms must be positive");
        ensure!(
            (0.0..=1.0).contains(&config.poison.slow_cap),
            "poison.slow_cap must be within [0, 1], got {}",
            config.poison.slow_cap
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn shipped_config_matches_defaults() {
        assert_eq!(ConfigLoader::shipped().unwrap(), ProgressionConfig::default());
    }

    #[test]
    fn partial_files_keep_defaults() {
        let config =
            ConfigLoader::parse("xp_multiplier = 2.5\n[poison]\nmax_stacks = 5\n").unwrap();
        assert_eq!(config.xp_multiplier, 2.5);
        assert_eq!(config.poison.max_stacks, 5);
        assert_eq!(config.poison.duration_ms, 10_000);
        assert_eq!(config.dual_class_level, 50);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(ConfigLoader::parse("dual_class_level = 0").is_err());
        assert!(ConfigLoader::parse("reduction_cap = 1.0").is_err());
        assert!(ConfigLoader::parse("xp_multiplier = -1.0").is_err());
        assert!(ConfigLoader::parse("[poison]\nduration_ms = 0").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "combo_timeout_ms = 3000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.combo_timeout_ms, 3_000);
    }
}
