//! Commands that read or edit a saved character.
//!
//! Each command loads the character's blob from the save directory, applies
//! its change through a [`Session`], and writes the blob back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use console::style;
use strum::IntoEnumIterator;

use class_core::{CharacterId, ClassId, xp_for_level};
use class_runtime::{LoadStatus, RuntimeConfig, Session};

/// Character selection shared by every character command.
#[derive(Args)]
struct CharacterArgs {
    /// Character identifier
    #[arg(short, long, value_name = "ID")]
    character: u64,

    /// Custom save directory (defaults to SAVE_DATA_DIR or the platform location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl CharacterArgs {
    fn id(&self) -> CharacterId {
        CharacterId(self.character)
    }

    /// Opens a persistent session and loads the selected character.
    fn open(&self) -> Result<Session> {
        let mut config = RuntimeConfig::from_env();
        config.enable_persistence = true;
        if let Some(dir) = &self.data_dir {
            config.save_data_dir = Some(dir.clone());
        }

        let mut session = Session::open(&config).context("Failed to open session")?;
        let status = session
            .load_character(self.id())
            .with_context(|| format!("Failed to load character {}", self.id()))?;

        match status {
            LoadStatus::Fresh => {
                println!("{}", style("No saved progress; starting fresh").dim());
            }
            LoadStatus::Restored { dropped } if !dropped.is_empty() => {
                println!(
                    "{} deactivated {:?} to respect the class cap",
                    style("Note:").yellow(),
                    dropped
                );
            }
            LoadStatus::Restored { .. } => {}
            LoadStatus::Corrupted(error) => {
                println!(
                    "{} saved blob was unreadable ({}); starting fresh",
                    style("Warning:").yellow().bold(),
                    error
                );
            }
        }

        Ok(session)
    }

    fn save(&self, session: &Session) -> Result<()> {
        session
            .save_character(self.id())
            .with_context(|| format!("Failed to save character {}", self.id()))?;
        Ok(())
    }
}

/// Show a saved character's progress
#[derive(Parser)]
pub struct Show {
    #[command(flatten)]
    target: CharacterArgs,
}

impl Show {
    pub fn execute(self) -> Result<()> {
        let session = self.target.open()?;
        print_character(&session, self.target.id());
        Ok(())
    }
}

/// Reset one class's progress for a saved character
#[derive(Parser)]
pub struct Reset {
    #[command(flatten)]
    target: CharacterArgs,

    /// Class to reset
    #[arg(long, value_name = "CLASS")]
    class: ClassId,
}

impl Reset {
    pub fn execute(self) -> Result<()> {
        let mut session = self.target.open()?;
        let outcome = session.reset_class_progress(self.target.id(), self.class);
        self.target.save(&session)?;

        if outcome.had_progress {
            println!("{} {} progress reset", style("✓").green(), self.class);
        } else {
            println!("{} had no progress", self.class);
        }
        if let Some(class) = outcome.deactivated {
            println!("  {} deactivated", class);
        }
        Ok(())
    }
}

/// Set or add an active class for a saved character
#[derive(Parser)]
pub struct SetClass {
    #[command(flatten)]
    target: CharacterArgs,

    /// Class to activate
    #[arg(long, value_name = "CLASS")]
    class: ClassId,

    /// Add alongside the current class instead of replacing it
    #[arg(long)]
    add: bool,
}

impl SetClass {
    pub fn execute(self) -> Result<()> {
        let mut session = self.target.open()?;
        let id = self.target.id();

        if self.add {
            session
                .add_active_class(id, self.class)
                .with_context(|| format!("Cannot activate {}", self.class))?;
        } else {
            session.set_active_class(id, self.class);
        }
        self.target.save(&session)?;

        println!(
            "{} active: {:?}",
            style("✓").green(),
            session.engine().active_classes(id)
        );
        Ok(())
    }
}

/// Award XP to a saved character
#[derive(Parser)]
pub struct AddXp {
    #[command(flatten)]
    target: CharacterArgs,

    /// Class receiving the XP
    #[arg(long, value_name = "CLASS")]
    class: ClassId,

    /// Amount of XP
    #[arg(long, value_name = "XP")]
    amount: f64,
}

impl AddXp {
    pub fn execute(self) -> Result<()> {
        let mut session = self.target.open()?;
        let change = session.add_xp(self.target.id(), self.class, self.amount);
        self.target.save(&session)?;

        println!(
            "{} {}: level {} -> {}",
            style("✓").green(),
            self.class,
            change.old_level,
            change.new_level
        );
        for level in &change.perk_levels {
            println!("  {} perk tier at level {}", style("unlocked").yellow(), level);
        }
        Ok(())
    }
}

fn print_character(session: &Session, id: CharacterId) {
    let engine = session.engine();

    println!("{} {}", style("Character:").bold().cyan(), id);
    println!(
        "{} {:?} (limit {})",
        style("Active:").bold().cyan(),
        engine.active_classes(id),
        engine.active_limit(id)
    );
    println!();

    println!("{}", style("Classes:").bold().yellow());
    for class in ClassId::iter() {
        let xp = engine.xp(id, class);
        if xp <= 0.0 {
            continue;
        }
        let level = engine.level(id, class);
        let next = xp_for_level(level.saturating_add(1));
        println!("  {:<14} level {:>2}  xp {:>9.0} / {:.0}", class, level, xp, next);
    }
}
