//! Administrative tools for class progression.
//!
//! Previews balance (XP curve, damage bonuses, class table), edits saved
//! character progress, and replays recorded event scripts.

mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{AddXp, Classes, Replay, Reset, SetClass, Show, SimulateBonus, XpTable};

/// Class progression administration
#[derive(Parser)]
#[command(name = "classctl")]
#[command(about = "Inspect and edit class progression", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Print cumulative XP required for each level
    XpTable(XpTable),

    /// Preview the damage bonus a class grants at a level
    SimulateBonus(SimulateBonus),

    /// List classes, their weapons and perks
    Classes(Classes),

    /// Show a saved character's progress
    Show(Show),

    /// Reset one class's progress for a saved character
    Reset(Reset),

    /// Set or add an active class for a saved character
    SetClass(SetClass),

    /// Award XP to a saved character
    AddXp(AddXp),

    /// Replay a RON event script and print the outcome
    Replay(Replay),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SAVE_DATA_DIR and other env vars)
    let _ = dotenvy::dotenv();

    let _guard = logging::init()?;

    let cli = Cli::parse();

    match cli.command {
        Command::XpTable(cmd) => cmd.execute(),
        Command::SimulateBonus(cmd) => cmd.execute(),
        Command::Classes(cmd) => cmd.execute(),
        Command::Show(cmd) => cmd.execute(),
        Command::Reset(cmd) => cmd.execute(),
        Command::SetClass(cmd) => cmd.execute(),
        Command::AddXp(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
    }
}
