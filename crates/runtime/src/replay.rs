//! Deterministic replay of recorded event scripts.
//!
//! Replaying the same [`EventScript`] against the same balance always yields
//! the same [`ReplayReport`]; hosts use this to reproduce combat logs and to
//! check balance changes offline.

use std::path::Path;

use class_content::{EventScript, ScriptLoader};
use class_core::{EventEffect, GameTime, ProgressionConfig};

use crate::error::{Result, RuntimeError};
use crate::session::{HandledEvent, Session};

/// One replayed event.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayStep {
    pub at: GameTime,
    pub kind: &'static str,
    pub handled: HandledEvent,
}

/// Everything a replay produced, in script order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayReport {
    pub name: Option<String>,
    pub steps: Vec<ReplayStep>,
}

impl ReplayReport {
    /// Number of level-ups across every step.
    pub fn level_ups(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match &step.handled.effect {
                EventEffect::Level(change) => usize::from(change.leveled_up()),
                EventEffect::Applied(changes) => changes.iter().filter(|c| c.leveled_up()).count(),
                EventEffect::Block(outcome) => outcome
                    .level_changes
                    .iter()
                    .filter(|c| c.leveled_up())
                    .count(),
                _ => 0,
            })
            .sum()
    }

    /// Number of host speed restorations requested.
    pub fn restores(&self) -> usize {
        self.steps.iter().map(|step| step.handled.restores.len()).sum()
    }
}

/// Loads a RON event script.
pub fn load_script(path: &Path) -> Result<EventScript> {
    ScriptLoader::load(path).map_err(|e| RuntimeError::Content(format!("{e:#}")))
}

/// Replays `script` against `session`, continuing from its current state.
pub fn replay(session: &mut Session, script: &EventScript) -> ReplayReport {
    tracing::info!(
        target: "runtime::replay",
        name = script.name.as_deref().unwrap_or("<unnamed>"),
        events = script.events.len(),
        "replaying script"
    );

    let steps = script
        .events
        .iter()
        .map(|timed| ReplayStep {
            at: timed.at,
            kind: timed.event.as_str(),
            handled: session.handle(timed),
        })
        .collect();

    ReplayReport {
        name: script.name.clone(),
        steps,
    }
}

/// Replays `script` on a fresh, non-persistent session.
pub fn replay_fresh(config: ProgressionConfig, script: &EventScript) -> (Session, ReplayReport) {
    let mut session = Session::new(config);
    let report = replay(&mut session, script);
    (session, report)
}
