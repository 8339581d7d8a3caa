//! Per-character perk state: combo counters, charge meters and periodic
//! timers. Every transition is a pure `step` returning the next value so the
//! evaluator can stay side-effect free and the engine commits afterwards.

use std::collections::BTreeMap;

use super::definition::PerkId;
use crate::state::GameTime;

/// Outcome of feeding one qualifying hit to a [`HitCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboStep {
    /// Hit counted; streak length so far.
    Counted(u8),
    /// Previous streak timed out; this hit starts a new one. Never fires.
    Restarted,
    /// Threshold reached; bonus fires and the streak resets to zero.
    Fired,
}

/// Consecutive-hit counter with a timeout window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitCounter {
    count: u8,
    last_hit_at: Option<GameTime>,
}

impl HitCounter {
    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn last_hit_at(&self) -> Option<GameTime> {
        self.last_hit_at
    }

    /// True if more than `timeout_ms` passed since the last counted hit.
    pub fn timed_out(&self, now: GameTime, timeout_ms: u64) -> bool {
        self.last_hit_at
            .is_some_and(|at| now.since(at) > timeout_ms)
    }

    /// Next counter state after a qualifying hit at `now`.
    ///
    /// Timeout is checked before the threshold: a hit arriving after the
    /// window restarts the streak at one and cannot fire, even if the stale
    /// count would have reached `threshold`.
    pub fn step(&self, now: GameTime, threshold: u8, timeout_ms: u64) -> (HitCounter, ComboStep) {
        if self.timed_out(now, timeout_ms) {
            let next = HitCounter {
                count: 1,
                last_hit_at: Some(now),
            };
            return (next, ComboStep::Restarted);
        }

        let count = self.count.saturating_add(1);
        if count >= threshold.max(1) {
            let next = HitCounter {
                count: 0,
                last_hit_at: Some(now),
            };
            (next, ComboStep::Fired)
        } else {
            let next = HitCounter {
                count,
                last_hit_at: Some(now),
            };
            (next, ComboStep::Counted(count))
        }
    }
}

/// Outcome of feeding a block to a [`ChargeMeter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeStep {
    /// Damage added; total so far.
    Accumulated(f32),
    /// Threshold reached on this block; discharges on the next one.
    Charged(f32),
    /// Meter was charged; releases the stored amount and resets.
    Discharged(f32),
}

/// Blocked-damage accumulator with an explicit charged flag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChargeMeter {
    accumulated: f32,
    charged: bool,
}

impl ChargeMeter {
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn is_charged(&self) -> bool {
        self.charged
    }

    /// Next meter state after blocking `amount`.
    ///
    /// While charged, accumulation is suspended and the block only
    /// discharges.
    pub fn step(&self, amount: f32, threshold: f32) -> (ChargeMeter, ChargeStep) {
        if self.charged {
            return (ChargeMeter::default(), ChargeStep::Discharged(self.accumulated));
        }

        let accumulated = self.accumulated + amount.max(0.0);
        if accumulated >= threshold {
            let next = ChargeMeter {
                accumulated,
                charged: true,
            };
            (next, ChargeStep::Charged(accumulated))
        } else {
            let next = ChargeMeter {
                accumulated,
                charged: false,
            };
            (next, ChargeStep::Accumulated(accumulated))
        }
    }
}

/// Mutable perk bookkeeping for one character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerkState {
    pub counters: BTreeMap<PerkId, HitCounter>,
    pub meters: BTreeMap<PerkId, ChargeMeter>,
    pub periodic: BTreeMap<PerkId, GameTime>,
}

impl PerkState {
    pub fn counter(&self, perk: PerkId) -> HitCounter {
        self.counters.get(&perk).copied().unwrap_or_default()
    }

    pub fn meter(&self, perk: PerkId) -> ChargeMeter {
        self.meters.get(&perk).copied().unwrap_or_default()
    }

    pub fn last_fired(&self, perk: PerkId) -> Option<GameTime> {
        self.periodic.get(&perk).copied()
    }

    /// Drops counters whose window has lapsed so idle streaks do not linger.
    pub fn expire_counters(&mut self, now: GameTime, timeout_ms: u64) -> usize {
        let before = self.counters.len();
        self.counters.retain(|_, c| !c.timed_out(now, timeout_ms));
        before - self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.meters.is_empty() && self.periodic.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: u64 = 2_000;

    fn at(ms: u64) -> GameTime {
        GameTime::from_millis(ms)
    }

    #[test]
    fn counter_fires_on_threshold_and_resets() {
        let c = HitCounter::default();
        let (c, step) = c.step(at(0), 3, TIMEOUT);
        assert_eq!(step, ComboStep::Counted(1));
        let (c, step) = c.step(at(500), 3, TIMEOUT);
        assert_eq!(step, ComboStep::Counted(2));
        let (c, step) = c.step(at(1_000), 3, TIMEOUT);
        assert_eq!(step, ComboStep::Fired);
        assert_eq!(c.count(), 0);

        let (_, step) = c.step(at(1_200), 3, TIMEOUT);
        assert_eq!(step, ComboStep::Counted(1));
    }

    #[test]
    fn timeout_restarts_without_firing() {
        let c = HitCounter::default();
        let (c, _) = c.step(at(0), 2, TIMEOUT);
        assert_eq!(c.count(), 1);

        // The second hit would reach the threshold, but the window lapsed.
        let (c, step) = c.step(at(2_001), 2, TIMEOUT);
        assert_eq!(step, ComboStep::Restarted);
        assert_eq!(c.count(), 1);

        let (_, step) = c.step(at(3_000), 2, TIMEOUT);
        assert_eq!(step, ComboStep::Fired);
    }

    #[test]
    fn hit_exactly_at_window_edge_still_counts() {
        let (c, _) = HitCounter::default().step(at(0), 2, TIMEOUT);
        let (_, step) = c.step(at(2_000), 2, TIMEOUT);
        assert_eq!(step, ComboStep::Fired);
    }

    #[test]
    fn meter_charges_then_discharges_on_next_block() {
        let m = ChargeMeter::default();
        let (m, step) = m.step(100.0, 150.0);
        assert_eq!(step, ChargeStep::Accumulated(100.0));
        let (m, step) = m.step(60.0, 150.0);
        assert_eq!(step, ChargeStep::Charged(160.0));
        assert!(m.is_charged());

        let (m, step) = m.step(500.0, 150.0);
        assert_eq!(step, ChargeStep::Discharged(160.0));
        assert!(!m.is_charged());
        assert_eq!(m.accumulated(), 0.0);
    }

    #[test]
    fn negative_blocks_do_not_drain_meter() {
        let (m, _) = ChargeMeter::default().step(50.0, 150.0);
        let (m, _) = m.step(-20.0, 150.0);
        assert_eq!(m.accumulated(), 50.0);
    }

    #[test]
    fn expire_counters_drops_stale_streaks() {
        let perk = PerkId {
            class: crate::class::ClassId::Brawler,
            tier: 2,
        };
        let mut state = PerkState::default();
        state.counters.insert(perk, HitCounter::default().step(at(0), 2, TIMEOUT).0);

        assert_eq!(state.expire_counters(at(1_000), TIMEOUT), 0);
        assert_eq!(state.expire_counters(at(5_000), TIMEOUT), 1);
        assert!(state.is_empty());
    }
}
