//! Pure preview of a class's damage bonus.

use anyhow::Result;
use clap::Parser;
use console::style;

use class_core::{ClassDefinition, ClassId, ProgressionConfig, simulate_damage_bonus};

/// Preview the damage bonus a class grants at a level
#[derive(Parser)]
pub struct SimulateBonus {
    /// Class to preview (e.g. sword-master, archer, mage)
    #[arg(value_name = "CLASS")]
    class: ClassId,

    /// Class level; prints every perk level when omitted
    #[arg(short, long, value_name = "LEVEL")]
    level: Option<u8>,
}

impl SimulateBonus {
    pub fn execute(self) -> Result<()> {
        let definition = ClassDefinition::get(self.class);
        println!(
            "{} {}",
            style("Class:").bold().cyan(),
            definition.display_name
        );

        let levels: Vec<u8> = match self.level {
            Some(level) => vec![level.min(ProgressionConfig::MAX_LEVEL)],
            None => (0..=ProgressionConfig::MAX_LEVEL)
                .step_by(ProgressionConfig::PERK_INTERVAL as usize)
                .collect(),
        };

        for level in levels {
            let multiplier = simulate_damage_bonus(self.class, level);
            println!("  level {:>2}: {}", level, format_bonus(multiplier));
        }

        Ok(())
    }
}

/// `+10.0%  (x1.100)` for a multiplier of 1.1.
fn format_bonus(multiplier: f32) -> String {
    format!(
        "{:>+6.1}%  (x{:.3})",
        (multiplier - 1.0) * 100.0,
        multiplier
    )
}
