//! Fixed-interval task scheduler driven by the session's single tick source.
use serde::{Deserialize, Serialize};

use crate::constants::{
    AQUARIUM_INTERVAL_SECS, BOUNTY_INTERVAL_SECS, CRATE_INTERVAL_SECS, EVENT_INTERVAL_SECS,
    INTEREST_INTERVAL_SECS, MARKET_INTERVAL_SECS, TIP_INTERVAL_SECS, WEATHER_INTERVAL_SECS,
};

/// Periodic world tasks run by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldTask {
    BankInterest,
    AquariumIncome,
    MarketRotation,
    WeatherRotation,
    RandomEvent,
    SupplyCrate,
    VisitorTip,
    BountyReroll,
}

impl WorldTask {
    /// Standard session schedule.
    #[must_use]
    pub fn default_schedule() -> Scheduler<Self> {
        Scheduler::new()
            .every(INTEREST_INTERVAL_SECS, Self::BankInterest)
            .every(AQUARIUM_INTERVAL_SECS, Self::AquariumIncome)
            .every(MARKET_INTERVAL_SECS, Self::MarketRotation)
            .every(WEATHER_INTERVAL_SECS, Self::WeatherRotation)
            .every(EVENT_INTERVAL_SECS, Self::RandomEvent)
            .every(CRATE_INTERVAL_SECS, Self::SupplyCrate)
            .every(TIP_INTERVAL_SECS, Self::VisitorTip)
            .every(BOUNTY_INTERVAL_SECS, Self::BountyReroll)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry<K> {
    interval: f64,
    elapsed: f64,
    kind: K,
}

/// Ordered list of `(interval, task)` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler<K> {
    entries: Vec<Entry<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy> Scheduler<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task firing every `interval` seconds. Non-positive intervals are ignored.
    #[must_use]
    pub fn every(mut self, interval: f64, kind: K) -> Self {
        if interval > 0.0 && interval.is_finite() {
            self.entries.push(Entry {
                interval,
                elapsed: 0.0,
                kind,
            });
        }
        self
    }

    /// Advance every entry by `dt` seconds and return fired tasks in firing order.
    ///
    /// A large `dt` fast-forwards: a task fires once per interval elapsed.
    pub fn advance(&mut self, dt: f64) -> Vec<K> {
        let mut fired: Vec<(f64, usize, K)> = Vec::new();
        if dt <= 0.0 || !dt.is_finite() {
            return Vec::new();
        }
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let start = entry.elapsed;
            entry.elapsed += dt;
            let mut due = entry.interval;
            while entry.elapsed >= entry.interval {
                entry.elapsed -= entry.interval;
                fired.push((due - start, index, entry.kind));
                due += entry.interval;
            }
        }
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, kind)| kind).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_interval_boundaries() {
        let mut scheduler = Scheduler::new().every(2.0, 'a').every(3.0, 'b');
        assert!(scheduler.advance(1.5).is_empty());
        assert_eq!(scheduler.advance(0.5), vec!['a']);
        assert_eq!(scheduler.advance(1.0), vec!['b']);
    }

    #[test]
    fn fast_forward_fires_in_time_order() {
        let mut scheduler = Scheduler::new().every(2.0, 'a').every(3.0, 'b');
        assert_eq!(scheduler.advance(6.5), vec!['a', 'b', 'a', 'a', 'b']);
    }

    #[test]
    fn ignores_invalid_input() {
        let mut scheduler = Scheduler::new().every(0.0, 'x').every(1.0, 'y');
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.advance(-1.0).is_empty());
        assert!(scheduler.advance(f64::NAN).is_empty());
    }

    #[test]
    fn default_schedule_fires_tip_first() {
        let mut schedule = WorldTask::default_schedule();
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule.advance(45.0), vec![WorldTask::VisitorTip]);
        let fired = schedule.advance(15.0);
        assert_eq!(fired, vec![WorldTask::BankInterest, WorldTask::AquariumIncome]);
    }
}
