//! Modifier context: every bonus and multiplier that influences an action.
//!
//! The context is rebuilt from state, content and world before each
//! selection, sale or payout, so no formula reads global state directly.
use std::collections::HashMap;

use crate::constants::{
    ECOLOGY_PER_POINT, ECOLOGY_SCORE_CAP, GOLD_RUSH_MULTIPLIER, MASTERY_BONUS_CAP,
    MASTERY_STEP_BONUS, MASTERY_STEP_CATCHES, TREND_MULTIPLIER,
};
use crate::data::{ContentTables, PrestigeUpgrade, SkillId};
use crate::state::GameState;
use crate::weather::{TimeOfDay, Weather};
use crate::world::{RandomEvent, World};

/// Prestige upgrade levels relevant to formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrestigeLevels {
    pub power: u32,
    pub luck: u32,
    pub money: u32,
    pub auto: u32,
}

/// Purchased skill levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillLevels {
    pub haggle: u32,
    pub biology: u32,
    pub luck: u32,
    pub double_hook: u32,
    pub patience: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifierContext {
    pub rod_power: f64,
    pub bait_bonus: f64,
    pub bobber_multiplier: f64,
    /// Landed catches with the equipped rod.
    pub mastery: u32,
    /// Sum of owned charm catch bonuses.
    pub charm_catch_bonus: f64,
    pub xp_charm: bool,
    /// Sums over pets with hunger above zero.
    pub pet_catch_bonus: f64,
    pub pet_money_bonus: f64,
    pub prestige: PrestigeLevels,
    pub skills: SkillLevels,
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    pub event: Option<RandomEvent>,
    pub market: HashMap<String, f64>,
    pub trending: Option<String>,
    pub combo: u32,
    pub ecology: u32,
    pub golden_hook: bool,
    pub xp_boost: bool,
    pub filter_boost: bool,
    pub location_index: usize,
}

impl Default for ModifierContext {
    fn default() -> Self {
        Self {
            rod_power: 1.0,
            bait_bonus: 1.0,
            bobber_multiplier: 1.0,
            mastery: 0,
            charm_catch_bonus: 0.0,
            xp_charm: false,
            pet_catch_bonus: 0.0,
            pet_money_bonus: 0.0,
            prestige: PrestigeLevels::default(),
            skills: SkillLevels::default(),
            weather: Weather::Sunny,
            time_of_day: TimeOfDay::Day,
            event: None,
            market: HashMap::new(),
            trending: None,
            combo: 0,
            ecology: 0,
            golden_hook: false,
            xp_boost: false,
            filter_boost: false,
            location_index: 0,
        }
    }
}

impl ModifierContext {
    /// Snapshot every modifier for the current action.
    #[must_use]
    pub fn build(state: &GameState, content: &ContentTables, world: &World, now_ms: i64) -> Self {
        let rod = state.rod_def(content);
        let bait_bonus = content
            .bait(&state.stats.bait_id)
            .map_or(1.0, |bait| bait.bonus.max(0.0));
        let bobber_multiplier = content
            .bobber(&state.stats.bobber_id)
            .map_or(1.0, |bobber| bobber.bite_multiplier.max(0.0));
        let charms = state.charms.iter().filter_map(|id| content.charm(id));
        let (charm_catch_bonus, xp_charm) = charms.fold((0.0, false), |(sum, xp), charm| {
            (sum + charm.catch_bonus.max(0.0), xp || charm.xp_boost)
        });
        let (pet_catch_bonus, pet_money_bonus) = state
            .pets
            .iter()
            .filter(|pet| pet.is_fed())
            .filter_map(|pet| content.pet(&pet.id))
            .fold((0.0, 0.0), |(catch, money), pet| {
                (catch + pet.catch_bonus.max(0.0), money + pet.money_bonus.max(0.0))
            });
        Self {
            rod_power: rod.power,
            bait_bonus,
            bobber_multiplier,
            mastery: state.mastery(&rod.id),
            charm_catch_bonus,
            xp_charm,
            pet_catch_bonus,
            pet_money_bonus,
            prestige: PrestigeLevels {
                power: state.prestige(PrestigeUpgrade::Power),
                luck: state.prestige(PrestigeUpgrade::Luck),
                money: state.prestige(PrestigeUpgrade::Money),
                auto: state.prestige(PrestigeUpgrade::Auto),
            },
            skills: SkillLevels {
                haggle: state.skill(SkillId::Haggle),
                biology: state.skill(SkillId::Biology),
                luck: state.skill(SkillId::Luck),
                double_hook: state.skill(SkillId::DoubleHook),
                patience: state.skill(SkillId::Patience),
            },
            weather: world.weather,
            time_of_day: world.time_of_day(),
            event: world.active_event(),
            market: world.market.multipliers.clone(),
            trending: world.market.trending.clone(),
            combo: state.combo,
            ecology: state.ecology,
            golden_hook: state.buffs.golden_hook,
            xp_boost: state.buffs.xp_boost_active(now_ms),
            filter_boost: state.filter_boost_until_ms.is_some_and(|until| until > now_ms),
            location_index: content
                .location_index(&state.stats.location_id)
                .unwrap_or(0),
        }
    }

    /// `1 + min(0.5, mastery / 50 × 0.01)`.
    #[must_use]
    pub fn mastery_bonus(&self) -> f64 {
        let steps = f64::from(self.mastery) / f64::from(MASTERY_STEP_CATCHES);
        1.0 + (steps * MASTERY_STEP_BONUS).min(MASTERY_BONUS_CAP)
    }

    #[must_use]
    pub fn market_multiplier(&self, name: &str) -> f64 {
        self.market.get(name).copied().unwrap_or(1.0).max(0.0)
    }

    #[must_use]
    pub fn trend_multiplier(&self, name: &str) -> f64 {
        if self.trending.as_deref() == Some(name) {
            TREND_MULTIPLIER
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn gold_rush_multiplier(&self) -> f64 {
        if self.event == Some(RandomEvent::GoldRush) {
            GOLD_RUSH_MULTIPLIER
        } else {
            1.0
        }
    }

    /// `1 + min(100, ecology) × 0.002`.
    #[must_use]
    pub fn ecology_multiplier(&self) -> f64 {
        1.0 + f64::from(self.ecology.min(ECOLOGY_SCORE_CAP)) * ECOLOGY_PER_POINT
    }

    #[must_use]
    pub fn event_is(&self, kind: RandomEvent) -> bool {
        self.event == Some(kind)
    }
}
