//! Weather and time-of-day conditions that bias the catch pool.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DAY_CYCLE_SECS;

/// Weather conditions rotated by the world scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Sunny,
    Rain,
    Storm,
}

const WEATHER_WEIGHTS: [(Weather, u32); 3] = [
    (Weather::Sunny, 60),
    (Weather::Rain, 28),
    (Weather::Storm, 12),
];

impl Weather {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Rain => "rain",
            Self::Storm => "storm",
        }
    }

    /// Get i18n key for weather state name
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::Sunny => "weather.states.Sunny",
            Self::Rain => "weather.states.Rain",
            Self::Storm => "weather.states.Storm",
        }
    }

    /// Roll the next weather from the fixed rotation table.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let total: u32 = WEATHER_WEIGHTS.iter().map(|(_, w)| *w).sum();
        let mut roll = rng.gen_range(0..total);
        for (weather, weight) in WEATHER_WEIGHTS {
            if roll < weight {
                return weather;
            }
            roll -= weight;
        }
        Self::Sunny
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    /// Resolve the phase of the in-game day from the session clock.
    #[must_use]
    pub fn from_clock(clock_secs: f64) -> Self {
        let phase = clock_secs.rem_euclid(DAY_CYCLE_SECS);
        if phase >= DAY_CYCLE_SECS / 2.0 {
            Self::Night
        } else {
            Self::Day
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    #[test]
    fn clock_splits_day_and_night() {
        assert_eq!(TimeOfDay::from_clock(0.0), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_clock(DAY_CYCLE_SECS * 0.75), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_clock(DAY_CYCLE_SECS * 1.1), TimeOfDay::Day);
    }

    #[test]
    fn weather_roll_reaches_every_state() {
        let mut rng = SmallRng::seed_from_u64(11);
        let seen: HashSet<Weather> = (0..500).map(|_| Weather::roll(&mut rng)).collect();
        assert_eq!(seen.len(), 3);
    }
}
