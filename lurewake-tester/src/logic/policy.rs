use std::fmt;

use lurewake_game::{ContentTables, GameState, PlayerAction, ReelingMinigame, SkillId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Decision-making interface for automated anglers.
pub trait AnglerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Whether to hold the reel for the next physics tick.
    fn reel(&mut self, game: &ReelingMinigame) -> bool;

    /// Whether to strike when a fish bites.
    fn hook_bite(&mut self) -> bool {
        true
    }

    /// Whether to tap the bonus target while one is showing.
    fn tap_target(&mut self, game: &ReelingMinigame) -> bool {
        let _ = game;
        false
    }

    /// Shop and inventory actions to try before the next cast.
    fn errands(&mut self, state: &GameState, content: &ContentTables) -> Vec<PlayerAction>;
}

/// Built-in angler strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnglerStrategy {
    Casual,
    Careful,
    Collector,
    Reckless,
}

impl AnglerStrategy {
    pub const ALL: [Self; 4] = [Self::Casual, Self::Careful, Self::Collector, Self::Reckless];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AnglerStrategy::Casual => "Casual",
            AnglerStrategy::Careful => "Careful",
            AnglerStrategy::Collector => "Collector",
            AnglerStrategy::Reckless => "Reckless",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn AnglerPolicy + Send> {
        match self {
            AnglerStrategy::Casual => Box::new(CasualPolicy::default()),
            AnglerStrategy::Careful => Box::new(CarefulPolicy),
            AnglerStrategy::Collector => Box::new(CollectorPolicy),
            AnglerStrategy::Reckless => Box::new(RecklessPolicy::new(seed)),
        }
    }
}

impl fmt::Display for AnglerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reels in long pulls and lets go only when the line is close to snapping.
#[derive(Default)]
struct CasualPolicy {
    easing_off: bool,
}

/// Short pulses under half tension, chases every target.
struct CarefulPolicy;

/// Careful reeling plus steady reinvestment into gear, skills and new waters.
struct CollectorPolicy;

struct RecklessPolicy {
    rng: ChaCha20Rng,
}

impl RecklessPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl AnglerPolicy for CasualPolicy {
    fn name(&self) -> &'static str {
        "Casual"
    }

    fn reel(&mut self, game: &ReelingMinigame) -> bool {
        if game.tension() >= 80.0 {
            self.easing_off = true;
        } else if game.tension() <= 20.0 {
            self.easing_off = false;
        }
        !self.easing_off
    }

    fn errands(&mut self, state: &GameState, content: &ContentTables) -> Vec<PlayerAction> {
        let mut actions = maintenance(state, content, 10.0, 2);
        actions.extend(claimable_quests(state));
        actions
    }
}

impl AnglerPolicy for CarefulPolicy {
    fn name(&self) -> &'static str {
        "Careful"
    }

    fn reel(&mut self, game: &ReelingMinigame) -> bool {
        game.tension() < 40.0
    }

    fn tap_target(&mut self, _game: &ReelingMinigame) -> bool {
        true
    }

    fn errands(&mut self, state: &GameState, content: &ContentTables) -> Vec<PlayerAction> {
        let mut actions = maintenance(state, content, 25.0, 4);
        actions.extend(claimable_quests(state));
        actions.extend(showcase_rare_fish(state));
        actions
    }
}

impl AnglerPolicy for CollectorPolicy {
    fn name(&self) -> &'static str {
        "Collector"
    }

    fn reel(&mut self, game: &ReelingMinigame) -> bool {
        game.tension() < 40.0
    }

    fn tap_target(&mut self, _game: &ReelingMinigame) -> bool {
        true
    }

    fn errands(&mut self, state: &GameState, content: &ContentTables) -> Vec<PlayerAction> {
        let mut actions = maintenance(state, content, 25.0, 4);
        actions.extend(claimable_quests(state));
        actions.extend(showcase_rare_fish(state));

        // Keep a repair fund before spending on upgrades.
        let reserve = 500;
        let spendable = state.stats.money.saturating_sub(reserve);

        if let Some(rod) = content
            .rods
            .iter()
            .filter(|rod| !state.owned_rods.contains(&rod.id) && rod.price <= spendable)
            .max_by(|a, b| a.power.total_cmp(&b.power))
        {
            let current = state.rod_def(content).power;
            if rod.power > current {
                actions.push(PlayerAction::BuyRod { id: rod.id.clone() });
                return actions;
            }
        }

        if let Some(location) = content.locations.iter().find(|location| {
            !state.unlocked_locations.contains(&location.id)
                && location.min_level <= state.stats.level
                && location.unlock_cost <= spendable
        }) {
            actions.push(PlayerAction::UnlockLocation {
                id: location.id.clone(),
            });
            actions.push(PlayerAction::Travel {
                id: location.id.clone(),
            });
            return actions;
        }

        if let Some(skill) = SkillId::ALL.iter().copied().find(|skill| {
            content.skill(*skill).is_some_and(|def| {
                let level = state.skill(*skill);
                level < def.max_level && def.cost_for_next(level) <= spendable
            })
        }) {
            actions.push(PlayerAction::UpgradeSkill { skill });
        }

        if state.stats.money > reserve * 20 {
            actions.push(PlayerAction::Deposit {
                amount: state.stats.money - reserve * 10,
            });
        }
        actions
    }
}

impl AnglerPolicy for RecklessPolicy {
    fn name(&self) -> &'static str {
        "Reckless"
    }

    fn reel(&mut self, game: &ReelingMinigame) -> bool {
        let _ = game;
        self.rng.gen_bool(0.7)
    }

    fn hook_bite(&mut self) -> bool {
        self.rng.gen_bool(0.9)
    }

    fn tap_target(&mut self, _game: &ReelingMinigame) -> bool {
        self.rng.gen_bool(0.1)
    }

    fn errands(&mut self, state: &GameState, content: &ContentTables) -> Vec<PlayerAction> {
        let mut actions = maintenance(state, content, 1.0, 1);
        if self.rng.gen_bool(0.05) {
            actions.push(PlayerAction::DailySpin);
        }
        actions
    }
}

/// Repair below `repair_below` durability and sell once fewer than `min_free` slots remain.
fn maintenance(
    state: &GameState,
    content: &ContentTables,
    repair_below: f64,
    min_free: usize,
) -> Vec<PlayerAction> {
    let mut actions = Vec::new();
    if state.settings.safe_sell {
        actions.push(PlayerAction::SetSafeSell { enabled: false });
    }
    if state.bag_free_slots() < min_free {
        actions.push(PlayerAction::SellAll);
    }
    let max = state.rod_def(content).max_durability;
    if state.stats.rod_durability < repair_below.min(max) {
        actions.push(PlayerAction::RepairRod);
    }
    actions
}

fn claimable_quests(state: &GameState) -> Vec<PlayerAction> {
    state
        .quests
        .iter()
        .filter(|quest| quest.is_complete())
        .map(|quest| PlayerAction::ClaimQuest { quest_id: quest.id })
        .collect()
}

fn showcase_rare_fish(state: &GameState) -> Vec<PlayerAction> {
    let free = (state.stats.aquarium_capacity as usize).saturating_sub(state.aquarium.len());
    state
        .bag
        .iter()
        .filter(|item| !item.is_junk() && item.rarity >= 3)
        .take(free)
        .map(|item| PlayerAction::MoveToAquarium { item_id: item.id })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casual_eases_off_near_the_snap_point() {
        let mut policy = CasualPolicy::default();
        // A boss on the starter rod snaps the line if the reel is held.
        let mut game = ReelingMinigame::new(1, 9, true, 1.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        while game.outcome().is_none() {
            if !policy.reel(&game) {
                assert!(game.tension() >= 80.0);
                return;
            }
            game.set_reeling(true);
            game.tick(&mut rng);
        }
        panic!("casual policy held the reel until {:?}", game.outcome());
    }

    #[test]
    fn maintenance_repairs_and_sells() {
        let content = ContentTables::load_from_static();
        let mut state = GameState::new(&content, 0);
        state.stats.rod_durability = 3.0;
        state.stats.bag_capacity = 0;
        let actions = maintenance(&state, &content, 10.0, 1);
        assert!(actions.contains(&PlayerAction::RepairRod));
        assert!(actions.contains(&PlayerAction::SellAll));
    }

    #[test]
    fn strategies_round_trip_labels() {
        for strategy in AnglerStrategy::ALL {
            let policy = strategy.create_policy(7);
            assert_eq!(policy.name(), strategy.label());
            assert_eq!(strategy.to_string(), strategy.label());
        }
    }
}
