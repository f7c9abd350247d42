//! Ephemeral world conditions rolled by the scheduler.
//!
//! None of this is persisted: a restored session starts with fresh weather,
//! a neutral market and no active event, bounty or tournament.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{
    BOUNTY_MIN_WEIGHT_HIGH, BOUNTY_MIN_WEIGHT_LOW, BOUNTY_REWARD_MULTIPLIER, EVENT_DURATION_SECS,
    MARKET_MAX, MARKET_MIN, TOURNAMENT_DURATION_SECS, TOURNAMENT_REWARD_PER_LEVEL,
    TOURNAMENT_TARGET_PER_LEVEL,
};
use crate::data::{ContentTables, ItemCategory};
use crate::numbers::round_2dp;
use crate::weather::{TimeOfDay, Weather};

/// Timed random events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEvent {
    /// Sale prices doubled.
    GoldRush,
    /// Catch weights ×1.5.
    GiantFish,
    /// Bite delays halved.
    FishFrenzy,
}

impl RandomEvent {
    pub const ALL: [Self; 3] = [Self::GoldRush, Self::GiantFish, Self::FishFrenzy];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoldRush => "gold_rush",
            Self::GiantFish => "giant_fish",
            Self::FishFrenzy => "fish_frenzy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub kind: RandomEvent,
    pub remaining_secs: f64,
}

/// Per-species price multipliers plus the currently trending species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub multipliers: HashMap<String, f64>,
    pub trending: Option<String>,
}

impl Market {
    /// Multiplier for an item; unlisted items trade at 1.0.
    #[must_use]
    pub fn multiplier(&self, name: &str) -> f64 {
        self.multipliers.get(name).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn is_trending(&self, name: &str) -> bool {
        self.trending.as_deref() == Some(name)
    }

    /// Re-roll every species multiplier and pick a new trending species.
    pub fn rotate(&mut self, content: &ContentTables, rng: &mut impl Rng) {
        let species = content.species_names();
        self.multipliers = species
            .iter()
            .map(|name| {
                let factor = round_2dp(rng.gen_range(MARKET_MIN..=MARKET_MAX));
                ((*name).to_string(), factor)
            })
            .collect();
        self.trending = if species.is_empty() {
            None
        } else {
            Some(species[rng.gen_range(0..species.len())].to_string())
        };
    }
}

/// Wanted species paid once for a catch at or above the minimum weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    pub species: String,
    pub min_weight: f64,
    pub reward: u64,
    pub paid: bool,
}

impl Bounty {
    /// Roll a bounty over the fish available at unlocked locations.
    pub fn roll(
        content: &ContentTables,
        unlocked: impl Fn(&str) -> bool,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        let candidates: Vec<_> = content
            .locations
            .iter()
            .filter(|loc| unlocked(&loc.id))
            .flat_map(|loc| loc.items.iter())
            .filter(|item| item.category == ItemCategory::Fish && !item.boss)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let item = candidates[rng.gen_range(0..candidates.len())];
        Some(Self {
            species: item.name.clone(),
            min_weight: round_2dp(rng.gen_range(BOUNTY_MIN_WEIGHT_LOW..BOUNTY_MIN_WEIGHT_HIGH)),
            reward: item.value.saturating_mul(BOUNTY_REWARD_MULTIPLIER),
            paid: false,
        })
    }

    #[must_use]
    pub fn qualifies(&self, name: &str, weight: f64) -> bool {
        !self.paid && self.species == name && weight >= self.min_weight
    }
}

/// Timed score race over landed catch value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub remaining_secs: f64,
    pub score: u64,
    pub target: u64,
    pub reward: u64,
}

impl Tournament {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = u64::from(level.max(1));
        Self {
            remaining_secs: TOURNAMENT_DURATION_SECS,
            score: 0,
            target: TOURNAMENT_TARGET_PER_LEVEL * level,
            reward: TOURNAMENT_REWARD_PER_LEVEL * level,
        }
    }

    #[must_use]
    pub const fn won(&self) -> bool {
        self.score >= self.target
    }
}

/// Timer transitions reported by [`World::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorldExpiry {
    EventEnded(RandomEvent),
    TournamentEnded(Tournament),
}

/// World conditions shared by every action of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub weather: Weather,
    pub clock_secs: f64,
    pub event: Option<ActiveEvent>,
    pub market: Market,
    pub bounty: Option<Bounty>,
    pub tournament: Option<Tournament>,
}

impl World {
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_clock(self.clock_secs)
    }

    #[must_use]
    pub fn active_event(&self) -> Option<RandomEvent> {
        self.event.map(|event| event.kind)
    }

    #[must_use]
    pub fn event_is(&self, kind: RandomEvent) -> bool {
        self.active_event() == Some(kind)
    }

    /// Start an event unless one is already running; returns the started kind.
    pub fn roll_event(&mut self, rng: &mut impl Rng) -> Option<RandomEvent> {
        if self.event.is_some() {
            return None;
        }
        let kind = RandomEvent::ALL[rng.gen_range(0..RandomEvent::ALL.len())];
        self.event = Some(ActiveEvent {
            kind,
            remaining_secs: EVENT_DURATION_SECS,
        });
        Some(kind)
    }

    /// Advance the clock and countdowns.
    pub fn tick(&mut self, dt: f64) -> Vec<WorldExpiry> {
        let mut expired = Vec::new();
        self.clock_secs += dt;
        if let Some(event) = self.event.as_mut() {
            event.remaining_secs -= dt;
            if event.remaining_secs <= 0.0 {
                expired.push(WorldExpiry::EventEnded(event.kind));
                self.event = None;
            }
        }
        if let Some(tournament) = self.tournament.as_mut() {
            tournament.remaining_secs -= dt;
            if tournament.remaining_secs <= 0.0 {
                if let Some(done) = self.tournament.take() {
                    expired.push(WorldExpiry::TournamentEnded(done));
                }
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn market_rotation_stays_in_band() {
        let content = ContentTables::load_from_static();
        let mut market = Market::default();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        market.rotate(&content, &mut rng);
        assert!(!market.multipliers.is_empty());
        assert!(
            market
                .multipliers
                .values()
                .all(|m| (MARKET_MIN..=MARKET_MAX).contains(m))
        );
        let trending = market.trending.clone().unwrap();
        assert!(market.is_trending(&trending));
        assert!((market.multiplier("Not A Fish") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounty_only_targets_unlocked_fish() {
        let content = ContentTables::load_from_static();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let pond = content.location("pond").unwrap();
        for _ in 0..20 {
            let bounty = Bounty::roll(&content, |id| id == "pond", &mut rng).unwrap();
            assert!(pond.items.iter().any(|i| i.name == bounty.species));
            assert!(bounty.qualifies(&bounty.species, bounty.min_weight));
            assert!(!bounty.qualifies(&bounty.species, bounty.min_weight - 0.5));
        }
        assert!(Bounty::roll(&content, |_| false, &mut rng).is_none());
    }

    #[test]
    fn tick_expires_event_and_tournament() {
        let mut world = World::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let kind = world.roll_event(&mut rng).unwrap();
        assert!(world.roll_event(&mut rng).is_none());
        world.tournament = Some(Tournament::for_level(2));
        assert!(world.tick(EVENT_DURATION_SECS - 1.0).is_empty());
        let expired = world.tick(1.0);
        assert_eq!(expired, vec![WorldExpiry::EventEnded(kind)]);
        let expired = world.tick(TOURNAMENT_DURATION_SECS);
        assert!(matches!(expired.as_slice(), [WorldExpiry::TournamentEnded(t)] if !t.won()));
        assert!(world.tournament.is_none());
    }
}
