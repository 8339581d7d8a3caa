//! List the class table.

use anyhow::Result;
use clap::Parser;
use console::style;
use strum::IntoEnumIterator;

use class_core::{ClassDefinition, WeaponCategory};

/// List classes, their weapons and perks
#[derive(Parser)]
pub struct Classes {
    /// Also list each class's perks
    #[arg(short, long)]
    perks: bool,
}

impl Classes {
    pub fn execute(self) -> Result<()> {
        for definition in ClassDefinition::all() {
            let weapons: Vec<String> = WeaponCategory::iter()
                .filter(|w| definition.matches(*w))
                .map(|w| w.to_string())
                .collect();

            println!(
                "{} ({}) - {}",
                style(definition.display_name).bold().green(),
                definition.id,
                weapons.join(", ")
            );

            if self.perks {
                for perk in definition.perks {
                    println!(
                        "    {:>2}  {:<20} {:?}",
                        perk.unlock_level, perk.name, perk.trigger
                    );
                }
            }
        }

        Ok(())
    }
}
