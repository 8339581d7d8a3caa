//! Replay a RON event script.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use class_core::{EventEffect, ProgressionConfig};
use class_runtime::{ReplayStep, RuntimeConfig, load_script, replay_fresh};

/// Replay a RON event script and print the outcome
#[derive(Parser)]
pub struct Replay {
    /// Script file to replay
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Balance TOML to use (defaults to CLASS_CONFIG_PATH or the shipped balance)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One line per event
    Summary,
    /// Pretty-printed debug format
    Debug,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let progression = self.progression()?;
        let script = load_script(&self.script)
            .with_context(|| format!("Failed to load script: {}", self.script.display()))?;

        let (_, report) = replay_fresh(progression, &script);

        println!(
            "{} {}",
            style("Script:").bold().cyan(),
            report.name.as_deref().unwrap_or("<unnamed>")
        );
        println!("{} {}", style("Events:").bold().cyan(), report.steps.len());
        println!();

        for step in &report.steps {
            match self.format {
                OutputFormat::Summary => print_summary(step),
                OutputFormat::Debug => println!("{:#?}", step),
            }
        }

        println!();
        println!(
            "{} {} level-ups, {} speed restores",
            style("Done:").bold().green(),
            report.level_ups(),
            report.restores()
        );
        Ok(())
    }

    fn progression(&self) -> Result<ProgressionConfig> {
        let mut config = RuntimeConfig::from_env();
        if let Some(path) = &self.config {
            config.config_path = Some(path.clone());
        }
        config
            .load_progression()
            .context("Failed to load progression config")
    }
}

fn print_summary(step: &ReplayStep) {
    let detail = match &step.handled.effect {
        EventEffect::Level(change) => {
            format!("{} {} -> {}", change.class, change.old_level, change.new_level)
        }
        EventEffect::Activation(Ok(())) => "ok".to_string(),
        EventEffect::Activation(Err(error)) => format!("rejected: {}", error),
        EventEffect::Deactivated(removed) => format!("removed: {}", removed),
        EventEffect::Reset(outcome) => format!(
            "had progress: {}, deactivated: {:?}",
            outcome.had_progress, outcome.deactivated
        ),
        EventEffect::Equipped => String::new(),
        EventEffect::Damage(outcome) => format!(
            "x{:.3} offense, {:.0}% reduced, +{:.1} true, {} perks",
            outcome.offense_multiplier,
            outcome.reduction * 100.0,
            outcome.true_damage,
            outcome.triggered.len()
        ),
        EventEffect::Applied(changes) => changes
            .iter()
            .map(|c| format!("{} {}", c.class, c.new_level))
            .collect::<Vec<_>>()
            .join(", "),
        EventEffect::Block(outcome) => format!(
            "{} perks, reflected {:.1}, {} pulses",
            outcome.triggered.len(),
            outcome.reflected,
            outcome.area_pulses.len()
        ),
        EventEffect::Cleared(count) => format!("{} effects cleared", count),
        EventEffect::Tick(report) => format!(
            "{} expired, {} dot ticks, {} granted",
            report.expired,
            report.dots.len(),
            report.granted.len()
        ),
    };

    let restores = if step.handled.restores.is_empty() {
        String::new()
    } else {
        format!(" [{} restore]", step.handled.restores.len())
    };

    println!(
        "{:>7}  {} {}{}",
        step.at.as_millis(),
        style(format!("{:<22}", step.kind)).dim(),
        detail,
        restores
    );
}
