//! Per-character buff/debuff bookkeeping.
//!
//! The ledger is keyed by [`CharacterId`] and owns every [`BuffInstance`]. It
//! never touches host state itself: whenever an instance leaves the ledger,
//! for any reason, the caller-supplied [`BuffCleanup`] is invoked exactly once
//! so the host can revert whatever it applied (speed fields, animation rates).

use std::collections::BTreeMap;

use super::key::EffectKey;
use crate::state::{CharacterId, GameTime};

/// One active effect on one character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffInstance {
    pub key: EffectKey,
    /// Effect strength; meaning depends on [`EffectKey::kind`].
    pub magnitude: f32,
    /// Current stack count; 1 for non-stacking effects.
    pub stacks: u8,
    /// Absolute expiry; `None` lasts until cleared explicitly.
    pub expires_at: Option<GameTime>,
    /// Character that applied the effect.
    pub source: Option<CharacterId>,
    /// Host value captured when the instance was created (e.g. base movement
    /// speed), kept unchanged across refreshes so cleanup restores it exactly.
    pub baseline: Option<f32>,
}

impl BuffInstance {
    pub fn is_expired(&self, now: GameTime) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Milliseconds left before expiry, `None` for indefinite effects.
    pub fn remaining_ms(&self, now: GameTime) -> Option<u64> {
        self.expires_at.map(|at| at.since(now))
    }
}

/// Parameters for creating or refreshing an instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffSpec {
    pub key: EffectKey,
    pub magnitude: f32,
    pub duration_ms: Option<u64>,
    pub source: Option<CharacterId>,
    /// `Some(max)` makes the effect stack up to `max`; `None` replaces.
    pub max_stacks: Option<u8>,
    pub baseline: Option<f32>,
}

impl BuffSpec {
    pub fn new(key: EffectKey, magnitude: f32, duration_ms: Option<u64>) -> Self {
        Self {
            key,
            magnitude,
            duration_ms,
            source: None,
            max_stacks: None,
            baseline: None,
        }
    }

    pub fn from_source(mut self, source: CharacterId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn stacking(mut self, max_stacks: u8) -> Self {
        self.max_stacks = Some(max_stacks.max(1));
        self
    }

    pub fn with_baseline(mut self, baseline: Option<f32>) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Why an instance left the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    Expired,
    Cleared,
    Died,
    Removed,
}

/// Callback fired once per instance leaving the ledger.
pub trait BuffCleanup {
    fn on_buff_removed(
        &mut self,
        character: CharacterId,
        buff: &BuffInstance,
        reason: RemovalReason,
    );
}

impl<F> BuffCleanup for F
where
    F: FnMut(CharacterId, &BuffInstance, RemovalReason),
{
    fn on_buff_removed(
        &mut self,
        character: CharacterId,
        buff: &BuffInstance,
        reason: RemovalReason,
    ) {
        self(character, buff, reason)
    }
}

/// Cleanup that ignores removals (tests, previews).
pub struct NoCleanup;

impl BuffCleanup for NoCleanup {
    fn on_buff_removed(&mut self, _: CharacterId, _: &BuffInstance, _: RemovalReason) {}
}

/// UI/status view of one active effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffSummary {
    pub key: EffectKey,
    pub magnitude: f32,
    pub stacks: u8,
    pub remaining_ms: Option<u64>,
}

/// All buff instances, keyed by character.
#[derive(Clone, Debug, Default)]
pub struct BuffLedger {
    entries: BTreeMap<CharacterId, Vec<BuffInstance>>,
}

impl BuffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or refreshes the instance for `spec.key` on `character`.
    ///
    /// Stacking effects gain one stack up to their max; non-stacking effects
    /// replace their magnitude. Either way the expiry resets to
    /// `now + duration` and the original baseline is preserved.
    pub fn trigger(
        &mut self,
        character: CharacterId,
        spec: BuffSpec,
        now: GameTime,
    ) -> &mut BuffInstance {
        let expires_at = spec.duration_ms.map(|ms| now + ms);
        let buffs = self.entries.entry(character).or_default();

        let index = match buffs.iter().position(|b| b.key == spec.key) {
            Some(index) => {
                let existing = &mut buffs[index];
                if let Some(max) = spec.max_stacks {
                    existing.stacks = existing.stacks.saturating_add(1).min(max);
                } else {
                    existing.stacks = 1;
                }
                existing.magnitude = spec.magnitude;
                existing.expires_at = expires_at;
                if spec.source.is_some() {
                    existing.source = spec.source;
                }
                if existing.baseline.is_none() {
                    existing.baseline = spec.baseline;
                }
                index
            }
            None => {
                buffs.push(BuffInstance {
                    key: spec.key,
                    magnitude: spec.magnitude,
                    stacks: 1,
                    expires_at,
                    source: spec.source,
                    baseline: spec.baseline,
                });
                buffs.len() - 1
            }
        };

        &mut buffs[index]
    }

    /// Removes every instance with `expires_at <= now`, firing cleanup for each.
    ///
    /// Idempotent: a second call with the same `now` finds nothing to remove.
    pub fn sweep(&mut self, now: GameTime, cleanup: &mut impl BuffCleanup) -> usize {
        let mut removed = 0;
        for (character, buffs) in self.entries.iter_mut() {
            let (expired, kept): (Vec<_>, Vec<_>) =
                buffs.drain(..).partition(|b| b.is_expired(now));
            *buffs = kept;
            for buff in &expired {
                cleanup.on_buff_removed(*character, buff, RemovalReason::Expired);
            }
            removed += expired.len();
        }
        self.entries.retain(|_, buffs| !buffs.is_empty());
        removed
    }

    /// Removes every instance on `character`, firing cleanup for each.
    pub fn clear_all(
        &mut self,
        character: CharacterId,
        reason: RemovalReason,
        cleanup: &mut impl BuffCleanup,
    ) -> usize {
        let Some(buffs) = self.entries.remove(&character) else {
            return 0;
        };
        for buff in &buffs {
            cleanup.on_buff_removed(character, buff, reason);
        }
        buffs.len()
    }

    /// Removes a single instance, firing cleanup if it existed.
    pub fn remove(
        &mut self,
        character: CharacterId,
        key: EffectKey,
        cleanup: &mut impl BuffCleanup,
    ) -> bool {
        let Some(buffs) = self.entries.get_mut(&character) else {
            return false;
        };
        let Some(index) = buffs.iter().position(|b| b.key == key) else {
            return false;
        };
        let buff = buffs.remove(index);
        if buffs.is_empty() {
            self.entries.remove(&character);
        }
        cleanup.on_buff_removed(character, &buff, RemovalReason::Cleared);
        true
    }

    pub fn get(&self, character: CharacterId, key: EffectKey) -> Option<&BuffInstance> {
        self.entries.get(&character)?.iter().find(|b| b.key == key)
    }

    /// True if an instance exists, regardless of pending expiry.
    pub fn has_active(&self, character: CharacterId, key: EffectKey) -> bool {
        self.get(character, key).is_some()
    }

    /// True if an instance exists and has not reached its expiry at `now`.
    pub fn is_active_at(&self, character: CharacterId, key: EffectKey, now: GameTime) -> bool {
        self.get(character, key).is_some_and(|b| !b.is_expired(now))
    }

    /// Magnitude of the instance, 0.0 if absent.
    pub fn magnitude(&self, character: CharacterId, key: EffectKey) -> f32 {
        self.get(character, key).map_or(0.0, |b| b.magnitude)
    }

    /// Stack count of the instance, 0 if absent.
    pub fn stacks(&self, character: CharacterId, key: EffectKey) -> u8 {
        self.get(character, key).map_or(0, |b| b.stacks)
    }

    /// Instances on `character` still in effect at `now`.
    pub fn active(
        &self,
        character: CharacterId,
        now: GameTime,
    ) -> impl Iterator<Item = &BuffInstance> + '_ {
        self.entries
            .get(&character)
            .into_iter()
            .flatten()
            .filter(move |b| !b.is_expired(now))
    }

    pub fn summary(&self, character: CharacterId, now: GameTime) -> Vec<BuffSummary> {
        let mut summary: Vec<BuffSummary> = self
            .active(character, now)
            .map(|b| BuffSummary {
                key: b.key,
                magnitude: b.magnitude,
                stacks: b.stacks,
                remaining_ms: b.remaining_ms(now),
            })
            .collect();
        summary.sort_by_key(|s| s.key);
        summary
    }

    /// Characters that currently hold at least one instance.
    pub fn characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
