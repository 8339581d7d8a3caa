//! Replayable event script loader.
//!
//! Scripts are RON files holding a list of timestamped engine events:
//!
//! ```ron
//! #![enable(unwrap_newtypes)]
//! (
//!     name: Some("archer-levels"),
//!     events: [
//!         (at: 0, event: SetActiveClass(character: 1, class: Archer)),
//!         (at: 0, event: AddXp(character: 1, class: Archer, amount: 5106.0)),
//!         (at: 1000, event: Tick),
//!     ],
//! )
//! ```

use std::path::Path;

use anyhow::ensure;
use class_core::TimedEvent;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A named, time-ordered event sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    #[serde(default)]
    pub name: Option<String>,
    pub events: Vec<TimedEvent>,
}

impl EventScript {
    /// Timestamp of the last event, or zero for an empty script.
    pub fn duration(&self) -> class_core::GameTime {
        self.events.last().map_or(class_core::GameTime::ZERO, |e| e.at)
    }
}

/// Loader for RON event scripts.
pub struct ScriptLoader;

impl ScriptLoader {
    pub fn load(path: &Path) -> LoadResult<EventScript> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse script RON at {:?}: {}", path, e))
    }

    /// Parse script text. Timestamps must never decrease, since the engine
    /// relies on a monotonic clock.
    pub fn parse(content: &str) -> LoadResult<EventScript> {
        let script: EventScript = ron::from_str(content)?;
        for (index, pair) in script.events.windows(2).enumerate() {
            ensure!(
                pair[1].at >= pair[0].at,
                "event {} at {} precedes event {} at {}",
                index + 1,
                pair[1].at,
                index,
                pair[0].at
            );
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use class_core::{ClassId, InboundEvent, WeaponCategory};

    const ASSASSIN: &str = include_str!("../../data/scripts/assassin_poison.ron");
    const DUAL_CLASS: &str = include_str!("../../data/scripts/dual_class.ron");

    #[test]
    fn shipped_scripts_parse() {
        let script = ScriptLoader::parse(ASSASSIN).unwrap();
        assert_eq!(script.name.as_deref(), Some("assassin-poison"));
        assert!(matches!(
            script.events[0].event,
            InboundEvent::AddXp { class: ClassId::Assassin, .. }
        ));
        let InboundEvent::DamageAboutToApply(hit) = &script.events[3].event else {
            panic!("expected a hit, got {:?}", script.events[3].event);
        };
        assert_eq!(hit.weapon, WeaponCategory::Knife);
        assert_eq!(hit.damage.total(), 20.0);
        assert_eq!(hit.target_base_speed, Some(6.0));

        let script = ScriptLoader::parse(DUAL_CLASS).unwrap();
        assert_eq!(script.duration().as_millis(), 1_000);
    }

    #[test]
    fn decreasing_timestamps_are_rejected() {
        let text = r#"#![enable(unwrap_newtypes)]
            (events: [(at: 10, event: Tick), (at: 5, event: Tick)])"#;
        assert!(ScriptLoader::parse(text).is_err());
    }
}
