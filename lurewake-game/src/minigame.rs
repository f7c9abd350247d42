//! Reeling minigame: tension/distance physics stepped at a fixed 60 Hz.
//!
//! Holding the reel pulls the fish in and builds tension; releasing bleeds
//! tension while the fish swims back out. Angry fish pull harder, and timed
//! target prompts reward a tap with slack and progress.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANGER_MULTIPLIER, BOSS_ANGER_MULTIPLIER, BOSS_DISTANCE_BONUS, BOSS_MOOD_SWING_CHANCE,
    BOSS_REGROW_FACTOR, BOSS_STRENGTH_FACTOR, MAX_DISTANCE_FACTOR, MOOD_SWING_CHANCE,
    PERFECT_TENSION_LIMIT, REEL_SPEED_PER_POWER, REGROW_BASE, REGROW_PER_STRENGTH,
    START_DISTANCE_BASE, START_DISTANCE_PER_RARITY, TARGET_DISTANCE_RELIEF, TARGET_LIFETIME_TICKS,
    TARGET_SPAWN_CHANCE, TARGET_TENSION_RELIEF, TARGET_ZONE_MAX, TARGET_ZONE_MIN, TENSION_DECAY,
    TENSION_MAX, TENSION_RATE_BASE, TENSION_RATE_PER_STRENGTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Calm,
    Angry,
}

/// Terminal result of a reeling attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelOutcome {
    Caught,
    Broken,
    Escaped,
}

/// Timed prompt the player may tap for relief.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPrompt {
    /// Horizontal placement hint in `[0, 1]` for presentation.
    pub position: f64,
    pub ticks_left: u32,
}

/// What changed during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: Option<ReelOutcome>,
    pub mood_changed: Option<Mood>,
    pub target_spawned: bool,
    pub target_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelingMinigame {
    attempt_id: u64,
    boss: bool,
    strength: f64,
    rod_power: f64,
    tension: f64,
    distance: f64,
    max_distance: f64,
    max_tension: f64,
    mood: Mood,
    reeling: bool,
    target: Option<TargetPrompt>,
    outcome: Option<ReelOutcome>,
    ticks: u64,
}

impl ReelingMinigame {
    /// Set up a fight for an item of the given rarity.
    #[must_use]
    pub fn new(attempt_id: u64, rarity: u8, boss: bool, rod_power: f64) -> Self {
        let rarity = f64::from(rarity);
        let mut start = START_DISTANCE_BASE + START_DISTANCE_PER_RARITY * rarity;
        let mut strength = rarity;
        if boss {
            start += BOSS_DISTANCE_BONUS;
            strength *= BOSS_STRENGTH_FACTOR;
        }
        Self {
            attempt_id,
            boss,
            strength,
            rod_power: rod_power.max(f64::EPSILON),
            tension: 0.0,
            distance: start,
            max_distance: start * MAX_DISTANCE_FACTOR,
            max_tension: 0.0,
            mood: Mood::Calm,
            reeling: false,
            target: None,
            outcome: None,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn attempt_id(&self) -> u64 {
        self.attempt_id
    }

    #[must_use]
    pub const fn tension(&self) -> f64 {
        self.tension
    }

    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub const fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Highest tension seen during the fight, not the final value.
    #[must_use]
    pub const fn max_tension(&self) -> f64 {
        self.max_tension
    }

    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    #[must_use]
    pub const fn target(&self) -> Option<TargetPrompt> {
        self.target
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<ReelOutcome> {
        self.outcome
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn is_boss(&self) -> bool {
        self.boss
    }

    #[must_use]
    pub const fn is_reeling(&self) -> bool {
        self.reeling
    }

    /// Bosses are never perfect.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        !self.boss && self.max_tension < PERFECT_TENSION_LIMIT
    }

    pub fn set_reeling(&mut self, reeling: bool) {
        self.reeling = reeling;
    }

    #[must_use]
    pub fn tension_rate(&self) -> f64 {
        (TENSION_RATE_BASE + TENSION_RATE_PER_STRENGTH * self.strength) / self.rod_power.sqrt()
    }

    #[must_use]
    pub fn reel_speed(&self) -> f64 {
        REEL_SPEED_PER_POWER * self.rod_power
    }

    fn anger(&self) -> f64 {
        match (self.mood, self.boss) {
            (Mood::Calm, _) => 1.0,
            (Mood::Angry, false) => ANGER_MULTIPLIER,
            (Mood::Angry, true) => BOSS_ANGER_MULTIPLIER,
        }
    }

    fn regrow(&self) -> f64 {
        let base = (REGROW_BASE + REGROW_PER_STRENGTH * self.strength) * self.anger();
        if self.boss {
            base * BOSS_REGROW_FACTOR
        } else {
            base
        }
    }

    fn in_target_zone(&self) -> bool {
        let fraction = self.distance / self.max_distance;
        (TARGET_ZONE_MIN..=TARGET_ZONE_MAX).contains(&fraction)
    }

    /// Advance one physics step. Ticks after a terminal outcome are ignored.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();
        if self.outcome.is_some() {
            return report;
        }
        self.ticks += 1;

        let swing_chance = if self.boss {
            BOSS_MOOD_SWING_CHANCE
        } else {
            MOOD_SWING_CHANCE
        };
        if rng.r#gen::<f64>() < swing_chance {
            self.mood = match self.mood {
                Mood::Calm => Mood::Angry,
                Mood::Angry => Mood::Calm,
            };
            report.mood_changed = Some(self.mood);
        }

        if self.reeling {
            self.distance -= self.reel_speed();
            self.tension += self.tension_rate() * self.anger();
        } else {
            self.tension -= TENSION_DECAY;
            self.distance += self.regrow();
        }

        if let Some(target) = self.target.as_mut() {
            target.ticks_left = target.ticks_left.saturating_sub(1);
            if target.ticks_left == 0 {
                self.target = None;
                report.target_expired = true;
            }
        } else if self.mood == Mood::Calm
            && self.in_target_zone()
            && rng.r#gen::<f64>() < TARGET_SPAWN_CHANCE
        {
            self.target = Some(TargetPrompt {
                position: rng.gen_range(TARGET_ZONE_MIN..TARGET_ZONE_MAX),
                ticks_left: TARGET_LIFETIME_TICKS,
            });
            report.target_spawned = true;
        }

        self.settle();
        report.outcome = self.outcome;
        report
    }

    /// Tap an active target prompt. Returns whether a prompt was hit.
    pub fn tap_target(&mut self) -> bool {
        if self.outcome.is_some() || self.target.is_none() {
            return false;
        }
        self.target = None;
        self.distance -= self.max_distance * TARGET_DISTANCE_RELIEF;
        self.tension -= TARGET_TENSION_RELIEF;
        self.settle();
        true
    }

    fn settle(&mut self) {
        self.tension = self.tension.clamp(0.0, TENSION_MAX);
        self.distance = self.distance.clamp(0.0, self.max_distance);
        self.max_tension = self.max_tension.max(self.tension);
        self.outcome = if self.tension >= TENSION_MAX {
            Some(ReelOutcome::Broken)
        } else if self.distance <= 0.0 {
            Some(ReelOutcome::Caught)
        } else if self.distance >= self.max_distance {
            Some(ReelOutcome::Escaped)
        } else {
            None
        };
        if self.outcome.is_some() {
            self.target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn setup_scales_with_rarity_and_boss() {
        let fish = ReelingMinigame::new(1, 2, false, 1.0);
        assert!((fish.distance() - 60.0).abs() < f64::EPSILON);
        assert!((fish.max_distance() - 120.0).abs() < f64::EPSILON);
        let boss = ReelingMinigame::new(1, 2, true, 1.0);
        assert!((boss.distance() - 80.0).abs() < f64::EPSILON);
        assert!(boss.tension_rate() > fish.tension_rate());
        let strong_rod = ReelingMinigame::new(1, 2, false, 4.0);
        assert!((strong_rod.tension_rate() - fish.tension_rate() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn holding_forever_breaks_or_lands() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut game = ReelingMinigame::new(1, 5, false, 1.0);
        game.set_reeling(true);
        while game.outcome().is_none() {
            game.tick(&mut rng);
        }
        assert!(matches!(
            game.outcome(),
            Some(ReelOutcome::Broken | ReelOutcome::Caught)
        ));
    }

    #[test]
    fn releasing_forever_escapes() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut game = ReelingMinigame::new(1, 1, false, 1.0);
        while game.outcome().is_none() {
            game.tick(&mut rng);
        }
        assert_eq!(game.outcome(), Some(ReelOutcome::Escaped));
        assert!(game.tension().abs() < f64::EPSILON);
    }

    #[test]
    fn ticks_after_terminal_are_ignored() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut game = ReelingMinigame::new(1, 1, false, 10.0);
        game.set_reeling(true);
        while game.outcome().is_none() {
            game.tick(&mut rng);
        }
        let frozen = game.clone();
        let report = game.tick(&mut rng);
        assert!(report.outcome.is_none());
        assert_eq!(game, frozen);
    }

    #[test]
    fn boss_is_never_perfect() {
        let boss = ReelingMinigame::new(1, 1, true, 1.0);
        assert!(!boss.is_perfect());
        let fish = ReelingMinigame::new(1, 1, false, 1.0);
        assert!(fish.is_perfect());
    }

    #[test]
    fn tapping_target_relieves_distance_and_tension() {
        let mut game = ReelingMinigame::new(1, 2, false, 1.0);
        game.tension = 40.0;
        game.target = Some(TargetPrompt {
            position: 0.5,
            ticks_left: 10,
        });
        assert!(game.tap_target());
        assert!((game.distance() - 48.0).abs() < 1e-9);
        assert!((game.tension() - 25.0).abs() < 1e-9);
        assert!(game.target().is_none());
    }

    #[test]
    fn target_expires_after_lifetime() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut game = ReelingMinigame::new(1, 2, false, 1.0);
        game.target = Some(TargetPrompt {
            position: 0.5,
            ticks_left: 2,
        });
        assert!(!game.tick(&mut rng).target_expired);
        assert!(game.tick(&mut rng).target_expired);
        assert!(game.target().is_none());
    }

    #[test]
    fn tap_without_target_does_nothing() {
        let mut game = ReelingMinigame::new(1, 1, false, 1.0);
        let before = game.clone();
        assert!(!game.tap_target());
        assert_eq!(game, before);
    }
}
