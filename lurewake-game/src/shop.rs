//! Player actions outside the cast loop: purchases, upgrades, inventory moves,
//! banking, quests and prestige.
//!
//! Every action validates first and mutates only on success, so a rejected
//! action leaves the state untouched.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AUTONET_BASE_COST, AUTONET_MAX_LEVEL, BAG_UPGRADE_BASE_COST, BAG_UPGRADE_STEP, BAIT_PACK_SIZE,
    DAILY_SPIN_COOLDOWN_MS, DAILY_SPIN_PRIZES, DONATE_ECOLOGY, FILTER_BOOST_MINUTES,
    FILTER_BOOST_PRICE, GOLDEN_HOOK_PRICE, MS_PER_MINUTE, NOTICE_DAILY_SPIN, NOTICE_LEVEL_UP,
    NOTICE_PRESTIGE, NOTICE_PURCHASED, NOTICE_QUEST_CLAIMED, NOTICE_QUEST_DONE, NOTICE_SOLD,
    PET_FEED_AMOUNT, PET_FEED_PRICE, PET_HUNGER_MAX, PET_XP_PER_FEED, PET_XP_PER_LEVEL,
    PRESTIGE_MIN_LEVEL, PRESTIGE_MONEY_DIVISOR, PRESTIGE_UPGRADE_MAX, QUEST_COOLDOWN_CATCHES,
    RELEASE_ECOLOGY, REPAIR_COST_PER_POINT, XP_BOOST_MINUTES, XP_BOOST_PRICE,
};
use crate::data::{ContentTables, ItemCategory, PrestigeUpgrade, SkillId};
use crate::economy::{self, bulk_sale, sale_price};
use crate::modifiers::ModifierContext;
use crate::notice::{Notice, Notices, SoundCue, Tone};
use crate::numbers::{ceil_f64_to_u64, i64_to_u64};
use crate::quests::{QuestEvent, record_progress};
use crate::state::{AmbientMode, GameState, PetState, SortMode};
use crate::world::{Tournament, World};

/// Reasons an action is rejected. The state is never mutated on error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("{0} is full")]
    CapacityExceeded(&'static str),
    #[error("rod is broken")]
    RodBroken,
    #[error("not available while fishing")]
    WrongPhase,
    #[error("`{0}` is locked")]
    Locked(String),
    #[error("unknown id `{0}`")]
    UnknownId(String),
    #[error("already at max level")]
    MaxLevel,
    #[error("available again in {remaining_ms} ms")]
    Cooldown { remaining_ms: i64 },
    #[error("not eligible: {0}")]
    NotEligible(&'static str),
}

/// Reducer-style player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    BuyRod { id: String },
    EquipRod { id: String },
    BuyBait { id: String },
    EquipBait { id: String },
    BuyBobber { id: String },
    EquipBobber { id: String },
    RepairRod,
    UnlockLocation { id: String },
    Travel { id: String },
    BuyCharm { id: String },
    BuyPet { id: String },
    FeedPet { id: String },
    BuyDecoration { id: String },
    UpgradeSkill { skill: SkillId },
    UpgradeAutoNet,
    UpgradeBag,
    BuyGoldenHook,
    BuyXpBoost,
    BuyFilterBoost,
    Deposit { amount: u64 },
    Withdraw { amount: u64 },
    SellItem { item_id: u64 },
    SellAll,
    MoveToAquarium { item_id: u64 },
    MoveToBag { item_id: u64 },
    Release { item_id: u64 },
    Donate { item_id: u64 },
    ClaimQuest { quest_id: u64 },
    DailySpin,
    EnterTournament,
    Prestige,
    BuyPrestigeUpgrade { upgrade: PrestigeUpgrade },
    SetSortMode { mode: SortMode },
    SetSafeSell { enabled: bool },
    SetAmbient { mode: AmbientMode },
}

impl PlayerAction {
    /// Actions that would invalidate an in-flight cast.
    #[must_use]
    pub const fn requires_idle(&self) -> bool {
        matches!(
            self,
            Self::EquipRod { .. }
                | Self::BuyRod { .. }
                | Self::Travel { .. }
                | Self::RepairRod
                | Self::Prestige
        )
    }
}

/// Shared inputs for applying an action.
pub struct ActionEnv<'a, R: Rng + ?Sized> {
    pub content: &'a ContentTables,
    pub world: &'a mut World,
    pub now_ms: i64,
    pub rng: &'a mut R,
}

/// Apply an action to the state, returning the notices it produced.
///
/// # Errors
///
/// Returns an [`ActionError`] when the action is not allowed; the state is unchanged.
pub fn apply<R: Rng + ?Sized>(
    state: &mut GameState,
    env: &mut ActionEnv<'_, R>,
    action: &PlayerAction,
) -> Result<Notices, ActionError> {
    let content = env.content;
    let mut notices = Notices::new();
    match action {
        PlayerAction::BuyRod { id } => {
            let rod = content
                .rod(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.owned_rods.contains(id) {
                return Err(ActionError::NotEligible("rod already owned"));
            }
            spend(state, rod.price)?;
            state.owned_rods.insert(id.clone());
            state.stats.rod_id = id.clone();
            state.stats.rod_durability = rod.max_durability;
            purchased(&mut notices, &rod.name);
        }
        PlayerAction::EquipRod { id } => {
            let rod = content
                .rod(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if !state.owned_rods.contains(id) {
                return Err(ActionError::Locked(id.clone()));
            }
            if state.stats.rod_id != *id {
                state.stats.rod_id = id.clone();
                state.stats.rod_durability = rod.max_durability;
            }
        }
        PlayerAction::BuyBait { id } => {
            let bait = content
                .bait(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if bait.price == 0 {
                return Err(ActionError::NotEligible("bait is free"));
            }
            spend(state, bait.price)?;
            *state.bait_inventory.entry(id.clone()).or_insert(0) += BAIT_PACK_SIZE;
            state.stats.bait_id = id.clone();
            purchased(&mut notices, &bait.name);
        }
        PlayerAction::EquipBait { id } => {
            content
                .bait(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            let free = *id == content.starter_bait().id;
            if !free && state.bait_inventory.get(id).copied().unwrap_or(0) == 0 {
                return Err(ActionError::Locked(id.clone()));
            }
            state.stats.bait_id = id.clone();
        }
        PlayerAction::BuyBobber { id } => {
            let bobber = content
                .bobber(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.owned_bobbers.contains(id) {
                return Err(ActionError::NotEligible("bobber already owned"));
            }
            spend(state, bobber.price)?;
            state.owned_bobbers.insert(id.clone());
            state.stats.bobber_id = id.clone();
            purchased(&mut notices, &bobber.name);
        }
        PlayerAction::EquipBobber { id } => {
            content
                .bobber(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if !state.owned_bobbers.contains(id) {
                return Err(ActionError::Locked(id.clone()));
            }
            state.stats.bobber_id = id.clone();
        }
        PlayerAction::RepairRod => {
            let max = state.rod_def(content).max_durability;
            let missing = max - state.stats.rod_durability;
            if missing <= 0.0 {
                return Err(ActionError::NotEligible("rod is already at full durability"));
            }
            spend(state, ceil_f64_to_u64(missing * REPAIR_COST_PER_POINT))?;
            state.stats.rod_durability = max;
            notices.push(Notice::Sound(SoundCue::Coins));
        }
        PlayerAction::UnlockLocation { id } => {
            let location = content
                .location(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.unlocked_locations.contains(id) {
                return Err(ActionError::NotEligible("location already unlocked"));
            }
            if state.stats.level < location.min_level {
                return Err(ActionError::Locked(id.clone()));
            }
            spend(state, location.unlock_cost)?;
            state.unlocked_locations.insert(id.clone());
            purchased(&mut notices, &location.name);
        }
        PlayerAction::Travel { id } => {
            content
                .location(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if !state.unlocked_locations.contains(id) {
                return Err(ActionError::Locked(id.clone()));
            }
            state.stats.location_id = id.clone();
        }
        PlayerAction::BuyCharm { id } => {
            let charm = content
                .charm(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.charms.contains(id) {
                return Err(ActionError::NotEligible("charm already owned"));
            }
            spend(state, charm.price)?;
            state.charms.insert(id.clone());
            purchased(&mut notices, &charm.name);
        }
        PlayerAction::BuyPet { id } => {
            let pet = content
                .pet(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.pets.iter().any(|owned| owned.id == *id) {
                return Err(ActionError::NotEligible("pet already adopted"));
            }
            spend(state, pet.price)?;
            state.pets.push(PetState::new(id));
            purchased(&mut notices, &pet.name);
        }
        PlayerAction::FeedPet { id } => {
            let index = state
                .pets
                .iter()
                .position(|pet| pet.id == *id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.pets[index].hunger >= PET_HUNGER_MAX {
                return Err(ActionError::NotEligible("pet is not hungry"));
            }
            spend(state, PET_FEED_PRICE)?;
            let pet = &mut state.pets[index];
            pet.hunger = (pet.hunger + PET_FEED_AMOUNT).min(PET_HUNGER_MAX);
            pet.xp += PET_XP_PER_FEED;
            while pet.xp >= PET_XP_PER_LEVEL {
                pet.xp -= PET_XP_PER_LEVEL;
                pet.level += 1;
            }
        }
        PlayerAction::BuyDecoration { id } => {
            let decoration = content
                .decoration(id)
                .ok_or_else(|| ActionError::UnknownId(id.clone()))?;
            if state.decorations.contains(id) {
                return Err(ActionError::NotEligible("decoration already placed"));
            }
            spend(state, decoration.price)?;
            state.decorations.insert(id.clone());
            purchased(&mut notices, &decoration.name);
        }
        PlayerAction::UpgradeSkill { skill } => {
            let def = content
                .skill(*skill)
                .ok_or_else(|| ActionError::UnknownId(format!("{skill:?}")))?;
            let current = state.skill(*skill);
            if current >= def.max_level {
                return Err(ActionError::MaxLevel);
            }
            spend(state, def.cost_for_next(current))?;
            state.skills.insert(*skill, current + 1);
        }
        PlayerAction::UpgradeAutoNet => {
            let level = state.stats.autonet_level;
            if level >= AUTONET_MAX_LEVEL {
                return Err(ActionError::MaxLevel);
            }
            spend(state, AUTONET_BASE_COST * u64::from(level + 1))?;
            state.stats.autonet_level = level + 1;
        }
        PlayerAction::UpgradeBag => {
            let upgrades = state.stats.bag_upgrades;
            spend(state, BAG_UPGRADE_BASE_COST * u64::from(upgrades + 1))?;
            state.stats.bag_upgrades = upgrades + 1;
            state.stats.bag_capacity += BAG_UPGRADE_STEP;
        }
        PlayerAction::BuyGoldenHook => {
            if state.buffs.golden_hook {
                return Err(ActionError::NotEligible("golden hook already active"));
            }
            spend(state, GOLDEN_HOOK_PRICE)?;
            state.buffs.golden_hook = true;
        }
        PlayerAction::BuyXpBoost => {
            spend(state, XP_BOOST_PRICE)?;
            state.buffs.xp_boost_until_ms = Some(extend_timer(
                state.buffs.xp_boost_until_ms,
                env.now_ms,
                XP_BOOST_MINUTES,
            ));
        }
        PlayerAction::BuyFilterBoost => {
            spend(state, FILTER_BOOST_PRICE)?;
            state.filter_boost_until_ms = Some(extend_timer(
                state.filter_boost_until_ms,
                env.now_ms,
                FILTER_BOOST_MINUTES,
            ));
        }
        PlayerAction::Deposit { amount } => {
            spend(state, *amount)?;
            state.stats.banked = state.stats.banked.saturating_add(*amount);
        }
        PlayerAction::Withdraw { amount } => {
            if *amount > state.stats.banked {
                return Err(ActionError::InsufficientFunds {
                    needed: *amount,
                    available: state.stats.banked,
                });
            }
            state.stats.banked -= amount;
            state.stats.money = state.stats.money.saturating_add(*amount);
        }
        PlayerAction::SellItem { item_id } => {
            let Some(item) = state.take_from_bag(*item_id) else {
                return Ok(notices);
            };
            let ctx = ModifierContext::build(state, content, &*env.world, env.now_ms);
            let price = sale_price(&item.name, item.value, &ctx);
            credit(state, price, &mut notices);
            sold(&mut notices, price);
        }
        PlayerAction::SellAll => {
            let ctx = ModifierContext::build(state, content, &*env.world, env.now_ms);
            let sale = bulk_sale(&state.bag, &ctx, state.settings.safe_sell);
            if sale.sold_ids.is_empty() {
                return Err(ActionError::NotEligible("nothing to sell"));
            }
            state.bag.retain(|item| !sale.sold_ids.contains(&item.id));
            credit(state, sale.total, &mut notices);
            sold(&mut notices, sale.total);
        }
        PlayerAction::MoveToAquarium { item_id } => {
            let Some(item) = state.bag_item(*item_id) else {
                return Ok(notices);
            };
            if item.category != ItemCategory::Fish {
                return Err(ActionError::NotEligible("only fish can live in the aquarium"));
            }
            if state.aquarium_full() {
                return Err(ActionError::CapacityExceeded("aquarium"));
            }
            if let Some(item) = state.take_from_bag(*item_id) {
                state.aquarium.push(item);
            }
        }
        PlayerAction::MoveToBag { item_id } => {
            if !state.aquarium.iter().any(|item| item.id == *item_id) {
                return Ok(notices);
            }
            if state.bag_full() {
                return Err(ActionError::CapacityExceeded("bag"));
            }
            if let Some(item) = state.take_from_aquarium(*item_id) {
                state.bag.push(item);
            }
        }
        PlayerAction::Release { item_id } => {
            if state.take_from_bag(*item_id).is_some() {
                state.ecology = state.ecology.saturating_add(RELEASE_ECOLOGY);
            }
        }
        PlayerAction::Donate { item_id } => {
            let Some(item) = state.bag_item(*item_id) else {
                return Ok(notices);
            };
            if item.category != ItemCategory::Fish {
                return Err(ActionError::NotEligible("only fish can be donated"));
            }
            if state.pedia.get(&item.name).is_some_and(|entry| entry.donated) {
                return Err(ActionError::NotEligible("species already donated"));
            }
            if let Some(item) = state.take_from_bag(*item_id) {
                state.pedia.entry(item.name).or_default().donated = true;
                state.ecology = state.ecology.saturating_add(DONATE_ECOLOGY);
            }
        }
        PlayerAction::ClaimQuest { quest_id } => {
            let index = state
                .quests
                .iter()
                .position(|quest| quest.id == *quest_id)
                .ok_or_else(|| ActionError::UnknownId(quest_id.to_string()))?;
            if !state.quests[index].is_complete() {
                return Err(ActionError::NotEligible("quest is not complete"));
            }
            let quest = state.quests.remove(index);
            credit(state, quest.reward_money, &mut notices);
            let ups = economy::grant_experience(&mut state.stats, quest.reward_xp);
            level_up_notices(&ups.levels, &mut notices);
            if state.quests.is_empty() {
                state.quest_cooldown = QUEST_COOLDOWN_CATCHES;
            }
            notices.push(Notice::toast_with(
                NOTICE_QUEST_CLAIMED,
                Tone::Success,
                quest.reward_money.to_string(),
            ));
        }
        PlayerAction::DailySpin => {
            if let Some(last) = state.daily_spin_at_ms {
                let remaining = last
                    .saturating_add(DAILY_SPIN_COOLDOWN_MS)
                    .saturating_sub(env.now_ms);
                if remaining > 0 {
                    return Err(ActionError::Cooldown {
                        remaining_ms: remaining,
                    });
                }
            }
            let prize = DAILY_SPIN_PRIZES[env.rng.gen_range(0..DAILY_SPIN_PRIZES.len())];
            state.daily_spin_at_ms = Some(env.now_ms);
            credit(state, prize, &mut notices);
            notices.push(Notice::toast_with(
                NOTICE_DAILY_SPIN,
                Tone::Success,
                prize.to_string(),
            ));
            notices.push(Notice::Sound(SoundCue::Fanfare));
        }
        PlayerAction::EnterTournament => {
            if env.world.tournament.is_some() {
                return Err(ActionError::NotEligible("tournament already running"));
            }
            env.world.tournament = Some(Tournament::for_level(state.stats.level));
        }
        PlayerAction::Prestige => {
            if state.stats.level < PRESTIGE_MIN_LEVEL {
                return Err(ActionError::NotEligible("prestige requires a higher level"));
            }
            let points = prestige_points(state.money_since_prestige);
            prestige_reset(state, content, env.now_ms, points);
            log::info!(
                "prestige reset: +{points} points, prestige level {}",
                state.stats.prestige_level
            );
            notices.push(Notice::toast_with(
                NOTICE_PRESTIGE,
                Tone::Success,
                points.to_string(),
            ));
            notices.push(Notice::Sound(SoundCue::Fanfare));
        }
        PlayerAction::BuyPrestigeUpgrade { upgrade } => {
            let level = state.prestige(*upgrade);
            if level >= PRESTIGE_UPGRADE_MAX {
                return Err(ActionError::MaxLevel);
            }
            let cost = u64::from(level + 1);
            if state.stats.prestige_points < cost {
                return Err(ActionError::InsufficientFunds {
                    needed: cost,
                    available: state.stats.prestige_points,
                });
            }
            state.stats.prestige_points -= cost;
            state.prestige_upgrades.insert(*upgrade, level + 1);
        }
        PlayerAction::SetSortMode { mode } => state.settings.sort_mode = *mode,
        PlayerAction::SetSafeSell { enabled } => state.settings.safe_sell = *enabled,
        PlayerAction::SetAmbient { mode } => state.settings.ambient = *mode,
    }
    Ok(notices)
}

fn spend(state: &mut GameState, price: u64) -> Result<(), ActionError> {
    if state.stats.money < price {
        return Err(ActionError::InsufficientFunds {
            needed: price,
            available: state.stats.money,
        });
    }
    state.stats.money -= price;
    Ok(())
}

fn extend_timer(current: Option<i64>, now_ms: i64, minutes: i64) -> i64 {
    current.unwrap_or(now_ms).max(now_ms) + minutes * MS_PER_MINUTE
}

fn purchased(notices: &mut Notices, name: &str) {
    notices.push(Notice::toast_with(NOTICE_PURCHASED, Tone::Success, name));
    notices.push(Notice::Sound(SoundCue::Coins));
}

fn sold(notices: &mut Notices, amount: u64) {
    notices.push(Notice::toast_with(NOTICE_SOLD, Tone::Success, amount.to_string()));
    notices.push(Notice::floating(format!("+${amount}")));
    notices.push(Notice::Sound(SoundCue::Coins));
}

pub(crate) fn level_up_notices(levels: &[u32], notices: &mut Notices) {
    for level in levels {
        log::info!("level up: {level}");
        notices.push(Notice::toast_with(
            NOTICE_LEVEL_UP,
            Tone::Success,
            level.to_string(),
        ));
    }
    if !levels.is_empty() {
        notices.push(Notice::Sound(SoundCue::Fanfare));
    }
}

/// Credit earned money and advance money quests.
pub(crate) fn credit(state: &mut GameState, amount: u64, notices: &mut Notices) {
    if amount == 0 {
        return;
    }
    state.earn(amount);
    for quest_id in record_progress(&mut state.quests, QuestEvent::Earned(amount)) {
        notices.push(Notice::toast_with(
            NOTICE_QUEST_DONE,
            Tone::Success,
            quest_id.to_string(),
        ));
    }
}

/// Prestige points awarded for money earned since the last reset (at least one).
#[must_use]
pub fn prestige_points(money_since_prestige: u64) -> u64 {
    (money_since_prestige / PRESTIGE_MONEY_DIVISOR).max(1)
}

fn prestige_reset(state: &mut GameState, content: &ContentTables, now_ms: i64, points: u64) {
    let mut fresh = GameState::new(content, now_ms);
    fresh.stats.prestige_points = state.stats.prestige_points.saturating_add(points);
    fresh.stats.prestige_level = state.stats.prestige_level.saturating_add(1);
    fresh.prestige_upgrades = std::mem::take(&mut state.prestige_upgrades);
    fresh.achievements = std::mem::take(&mut state.achievements);
    fresh.pedia = std::mem::take(&mut state.pedia);
    fresh.settings = state.settings.clone();
    fresh.lifetime = std::mem::take(&mut state.lifetime);
    fresh.restaurant = std::mem::take(&mut state.restaurant);
    fresh.daily_spin_at_ms = state.daily_spin_at_ms;
    fresh.next_item_id = state.next_item_id;
    fresh.next_quest_id = fresh.next_quest_id.max(state.next_quest_id);
    *state = fresh;
}

/// Milliseconds left on the daily spin cooldown, zero when available.
#[must_use]
pub fn daily_spin_remaining_ms(state: &GameState, now_ms: i64) -> u64 {
    state.daily_spin_at_ms.map_or(0, |last| {
        i64_to_u64(last.saturating_add(DAILY_SPIN_COOLDOWN_MS).saturating_sub(now_ms))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CaughtItem;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Harness {
        content: ContentTables,
        world: World,
        rng: SmallRng,
        state: GameState,
    }

    impl Harness {
        fn new() -> Self {
            let content = ContentTables::load_from_static();
            let state = GameState::new(&content, 0);
            Self {
                content,
                world: World::default(),
                rng: SmallRng::seed_from_u64(7),
                state,
            }
        }

        fn act(&mut self, action: PlayerAction) -> Result<Notices, ActionError> {
            self.act_at(0, action)
        }

        fn act_at(&mut self, now_ms: i64, action: PlayerAction) -> Result<Notices, ActionError> {
            let mut env = ActionEnv {
                content: &self.content,
                world: &mut self.world,
                now_ms,
                rng: &mut self.rng,
            };
            apply(&mut self.state, &mut env, &action)
        }
    }

    fn fish(id: u64, name: &str, rarity: u8, value: u64) -> CaughtItem {
        CaughtItem {
            id,
            name: name.to_string(),
            category: ItemCategory::Fish,
            rarity,
            boss: false,
            weight: 2.0,
            value,
            shiny: false,
            golden: false,
            perfect: false,
            location_index: 0,
            caught_at_ms: 0,
        }
    }

    #[test]
    fn insufficient_funds_leaves_state_untouched() {
        let mut h = Harness::new();
        let before = h.state.clone();
        let err = h
            .act(PlayerAction::BuyRod {
                id: String::from("carbon"),
            })
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientFunds {
                needed: 9_000,
                available: before.stats.money
            }
        );
        assert_eq!(h.state, before);
    }

    #[test]
    fn buying_rod_equips_at_full_durability() {
        let mut h = Harness::new();
        h.state.stats.money = 2_000;
        h.act(PlayerAction::BuyRod {
            id: String::from("fiberglass"),
        })
        .unwrap();
        assert_eq!(h.state.stats.rod_id, "fiberglass");
        assert!((h.state.stats.rod_durability - 80.0).abs() < f64::EPSILON);
        assert_eq!(h.state.stats.money, 500);
    }

    #[test]
    fn stale_item_ids_are_silent_noops() {
        let mut h = Harness::new();
        let before = h.state.clone();
        let notices = h.act(PlayerAction::SellItem { item_id: 99 }).unwrap();
        assert!(notices.is_empty());
        let notices = h.act(PlayerAction::MoveToAquarium { item_id: 99 }).unwrap();
        assert!(notices.is_empty());
        assert_eq!(h.state, before);
    }

    #[test]
    fn sell_item_credits_money_and_quests() {
        let mut h = Harness::new();
        h.state.bag.push(fish(1, "Carp", 3, 30));
        let money = h.state.stats.money;
        h.act(PlayerAction::SellItem { item_id: 1 }).unwrap();
        assert_eq!(h.state.stats.money, money + 30);
        assert!(h.state.bag.is_empty());
        assert_eq!(h.state.quests[2].progress, 30);
    }

    #[test]
    fn aquarium_moves_transfer_without_duplication() {
        let mut h = Harness::new();
        h.state.bag.push(fish(5, "Koi", 4, 90));
        h.act(PlayerAction::MoveToAquarium { item_id: 5 }).unwrap();
        assert!(h.state.bag.is_empty());
        assert_eq!(h.state.aquarium.len(), 1);
        h.act(PlayerAction::MoveToBag { item_id: 5 }).unwrap();
        assert_eq!(h.state.bag.len(), 1);
        assert!(h.state.aquarium.is_empty());
    }

    #[test]
    fn full_aquarium_rejects_move() {
        let mut h = Harness::new();
        h.state.stats.aquarium_capacity = 0;
        h.state.bag.push(fish(5, "Koi", 4, 90));
        let err = h.act(PlayerAction::MoveToAquarium { item_id: 5 }).unwrap_err();
        assert_eq!(err, ActionError::CapacityExceeded("aquarium"));
        assert_eq!(h.state.bag.len(), 1);
    }

    #[test]
    fn release_and_donate_raise_ecology() {
        let mut h = Harness::new();
        h.state.bag.push(fish(1, "Perch", 2, 14));
        h.state.bag.push(fish(2, "Carp", 3, 30));
        h.state.bag.push(fish(3, "Carp", 3, 30));
        h.act(PlayerAction::Release { item_id: 1 }).unwrap();
        h.act(PlayerAction::Donate { item_id: 2 }).unwrap();
        assert_eq!(h.state.ecology, RELEASE_ECOLOGY + DONATE_ECOLOGY);
        assert!(h.state.pedia["Carp"].donated);
        let err = h.act(PlayerAction::Donate { item_id: 3 }).unwrap_err();
        assert!(matches!(err, ActionError::NotEligible(_)));
    }

    #[test]
    fn skill_upgrade_costs_scale_and_cap() {
        let mut h = Harness::new();
        h.state.stats.money = 100_000;
        for _ in 0..5 {
            h.act(PlayerAction::UpgradeSkill {
                skill: SkillId::Patience,
            })
            .unwrap();
        }
        // 500 × (1 + 2 + 3 + 4 + 5)
        assert_eq!(h.state.stats.money, 100_000 - 7_500);
        let err = h
            .act(PlayerAction::UpgradeSkill {
                skill: SkillId::Patience,
            })
            .unwrap_err();
        assert_eq!(err, ActionError::MaxLevel);
    }

    #[test]
    fn claiming_last_quest_starts_cooldown() {
        let mut h = Harness::new();
        for quest in &mut h.state.quests {
            quest.progress = quest.goal.target();
        }
        let ids: Vec<u64> = h.state.quests.iter().map(|q| q.id).collect();
        for id in ids {
            h.act(PlayerAction::ClaimQuest { quest_id: id }).unwrap();
        }
        assert!(h.state.quests.is_empty());
        assert_eq!(h.state.quest_cooldown, QUEST_COOLDOWN_CATCHES);
    }

    #[test]
    fn unfinished_quest_cannot_be_claimed() {
        let mut h = Harness::new();
        let id = h.state.quests[0].id;
        let err = h.act(PlayerAction::ClaimQuest { quest_id: id }).unwrap_err();
        assert!(matches!(err, ActionError::NotEligible(_)));
    }

    #[test]
    fn daily_spin_enforces_cooldown() {
        let mut h = Harness::new();
        h.act_at(1_000, PlayerAction::DailySpin).unwrap();
        let err = h.act_at(2_000, PlayerAction::DailySpin).unwrap_err();
        assert!(matches!(err, ActionError::Cooldown { .. }));
        assert!(daily_spin_remaining_ms(&h.state, 2_000) > 0);
        h.act_at(1_000 + DAILY_SPIN_COOLDOWN_MS, PlayerAction::DailySpin)
            .unwrap();
    }

    #[test]
    fn prestige_keeps_permanent_progress() {
        let mut h = Harness::new();
        h.state.stats.level = PRESTIGE_MIN_LEVEL;
        h.state.money_since_prestige = 55_000;
        h.state.stats.money = 1_000_000;
        h.state.achievements.insert(String::from("first_catch"));
        h.act(PlayerAction::Prestige).unwrap();
        assert_eq!(h.state.stats.prestige_points, 5);
        assert_eq!(h.state.stats.prestige_level, 1);
        assert_eq!(h.state.stats.level, 1);
        assert_eq!(h.state.stats.money, GameState::default().stats.money);
        assert!(h.state.achievements.contains("first_catch"));
        h.act(PlayerAction::BuyPrestigeUpgrade {
            upgrade: PrestigeUpgrade::Luck,
        })
        .unwrap();
        assert_eq!(h.state.prestige(PrestigeUpgrade::Luck), 1);
        assert_eq!(h.state.stats.prestige_points, 4);
    }

    #[test]
    fn timed_boosts_extend_from_now() {
        let mut h = Harness::new();
        h.state.stats.money = 10_000;
        h.act_at(60_000, PlayerAction::BuyXpBoost).unwrap();
        assert_eq!(
            h.state.buffs.xp_boost_until_ms,
            Some(60_000 + XP_BOOST_MINUTES * MS_PER_MINUTE)
        );
        h.act_at(60_000, PlayerAction::BuyXpBoost).unwrap();
        assert_eq!(
            h.state.buffs.xp_boost_until_ms,
            Some(60_000 + 2 * XP_BOOST_MINUTES * MS_PER_MINUTE)
        );
    }

    #[test]
    fn locked_locations_need_level() {
        let mut h = Harness::new();
        h.state.stats.money = 1_000_000;
        let err = h
            .act(PlayerAction::UnlockLocation {
                id: String::from("ocean"),
            })
            .unwrap_err();
        assert_eq!(err, ActionError::Locked(String::from("ocean")));
        let err = h
            .act(PlayerAction::Travel {
                id: String::from("river"),
            })
            .unwrap_err();
        assert_eq!(err, ActionError::Locked(String::from("river")));
    }
}
