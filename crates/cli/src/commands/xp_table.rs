//! Print the cumulative XP curve.

use anyhow::Result;
use clap::Parser;
use console::style;

use class_core::{ProgressionConfig, xp_for_level};

/// Print cumulative XP required for each level
#[derive(Parser)]
pub struct XpTable {
    /// Highest level to print
    #[arg(short, long, default_value_t = ProgressionConfig::MAX_LEVEL)]
    max: u8,
}

impl XpTable {
    pub fn execute(self) -> Result<()> {
        let max = self.max.clamp(1, ProgressionConfig::MAX_LEVEL);

        let header = format!("{:>5}  {:>10}  {:>8}", "Level", "Total XP", "Step");
        println!("{}", style(header).bold().cyan());

        for level in 1..=max {
            let total = xp_for_level(level);
            let step = total - xp_for_level(level - 1);
            let row = format!("{:>5}  {:>10.0}  {:>8.0}", level, total, step);
            if level % ProgressionConfig::PERK_INTERVAL == 0 {
                println!("{}  {}", row, style("perk").yellow());
            } else {
                println!("{}", row);
            }
        }

        Ok(())
    }
}
