//! Centralized balance and tuning constants for Lurewake game logic.
//!
//! These values define the deterministic math for the catch engine and the
//! session economy. Content JSON carries items and prices; every multiplier,
//! timer and threshold lives here.

// Notice keys ----------------------------------------------------------------
pub(crate) const NOTICE_CAST: &str = "toast.cast";
pub(crate) const NOTICE_BITE: &str = "toast.bite";
pub(crate) const NOTICE_BITE_MISSED: &str = "toast.bite.missed";
pub(crate) const NOTICE_NOTHING_CAUGHT: &str = "toast.nothing-caught";
pub(crate) const NOTICE_CAUGHT: &str = "toast.caught";
pub(crate) const NOTICE_CAUGHT_PERFECT: &str = "toast.caught.perfect";
pub(crate) const NOTICE_CAUGHT_GOLDEN: &str = "toast.caught.golden";
pub(crate) const NOTICE_CAUGHT_SHINY: &str = "toast.caught.shiny";
pub(crate) const NOTICE_JUNK: &str = "toast.junk";
pub(crate) const NOTICE_GRANT: &str = "toast.grant";
pub(crate) const NOTICE_LINE_BROKE: &str = "toast.line-broke";
pub(crate) const NOTICE_ESCAPED: &str = "toast.escaped";
pub(crate) const NOTICE_DOUBLE_HOOK: &str = "toast.double-hook";
pub(crate) const NOTICE_DOUBLE_HOOK_LOST: &str = "toast.double-hook.bag-full";
pub(crate) const NOTICE_LEVEL_UP: &str = "toast.level-up";
pub(crate) const NOTICE_TARGET_SPAWN: &str = "toast.target.spawn";
pub(crate) const NOTICE_TARGET_HIT: &str = "toast.target.hit";
pub(crate) const NOTICE_FISH_ANGRY: &str = "toast.fish.angry";
pub(crate) const NOTICE_QUEST_DONE: &str = "toast.quest.complete";
pub(crate) const NOTICE_QUEST_CLAIMED: &str = "toast.quest.claimed";
pub(crate) const NOTICE_BOUNTY_PAID: &str = "toast.bounty.paid";
pub(crate) const NOTICE_TOURNAMENT_WON: &str = "toast.tournament.won";
pub(crate) const NOTICE_TOURNAMENT_LOST: &str = "toast.tournament.lost";
pub(crate) const NOTICE_ACHIEVEMENT: &str = "toast.achievement";
pub(crate) const NOTICE_EVENT_START: &str = "toast.event.start";
pub(crate) const NOTICE_EVENT_END: &str = "toast.event.end";
pub(crate) const NOTICE_WEATHER: &str = "toast.weather";
pub(crate) const NOTICE_SUPPLY_CRATE: &str = "toast.supply-crate";
pub(crate) const NOTICE_VISITOR_TIP: &str = "toast.visitor-tip";
pub(crate) const NOTICE_MARKET: &str = "toast.market";
pub(crate) const NOTICE_BUFF_EXPIRED: &str = "toast.buff.expired";
pub(crate) const NOTICE_TREASURE_MAP: &str = "toast.treasure-map";
pub(crate) const NOTICE_SOLD: &str = "toast.sold";
pub(crate) const NOTICE_PURCHASED: &str = "toast.purchased";
pub(crate) const NOTICE_REJECTED: &str = "toast.rejected";
pub(crate) const NOTICE_PRESTIGE: &str = "toast.prestige";
pub(crate) const NOTICE_DAILY_SPIN: &str = "toast.daily-spin";
pub(crate) const NOTICE_BAIT_EMPTY: &str = "toast.bait.empty";

// Persistence ----------------------------------------------------------------
/// Storage key of the single persisted save record.
pub const SAVE_KEY: &str = "lurewake.save.v1";
pub(crate) const OFFLINE_MIN_MINUTES: u64 = 10;
pub(crate) const OFFLINE_MAX_MINUTES: u64 = 24 * 60;
pub(crate) const OFFLINE_INCOME_PER_LEVEL_MINUTE: f64 = 10.0;
pub(crate) const PET_HUNGER_DECAY_PER_MINUTE: f64 = 0.1;
pub(crate) const PET_HUNGER_MAX: f64 = 100.0;
pub(crate) const MS_PER_MINUTE: i64 = 60_000;

// Selection -------------------------------------------------------------------
pub(crate) const RARITY_BASE_WEIGHT: f64 = 100.0;
pub(crate) const JUNK_ROD_DIVISOR: f64 = 1.5;
pub(crate) const MASTERY_STEP_CATCHES: u32 = 50;
pub(crate) const MASTERY_STEP_BONUS: f64 = 0.01;
pub(crate) const MASTERY_BONUS_CAP: f64 = 0.5;
pub(crate) const PRESTIGE_POWER_PER_LEVEL: f64 = 0.1;
pub(crate) const PRESTIGE_LUCK_PER_LEVEL: f64 = 0.1;
pub(crate) const PRESTIGE_MONEY_PER_LEVEL: f64 = 0.1;
pub(crate) const PRESTIGE_AUTO_PER_LEVEL: f64 = 0.1;
pub(crate) const SKILL_LUCK_PER_LEVEL: f64 = 0.05;
pub(crate) const PET_BONUS_MIN_RARITY: u8 = 3;
pub(crate) const STORM_MIN_RARITY: u8 = 4;
pub(crate) const STORM_RARE_MULTIPLIER: f64 = 1.5;
pub(crate) const RAIN_MULTIPLIER: f64 = 1.2;
pub(crate) const NIGHT_MIN_RARITY: u8 = 3;
pub(crate) const NIGHT_MULTIPLIER: f64 = 1.25;
pub(crate) const GOLDEN_HOOK_MIN_RARITY: u8 = 3;
pub(crate) const GOLDEN_HOOK_MULTIPLIER: f64 = 5.0;

// Minigame physics (per tick) ---------------------------------------------------
/// Fixed physics timestep of the reeling minigame, in seconds.
pub const TICK_SECS: f64 = 1.0 / 60.0;
pub(crate) const TENSION_MAX: f64 = 100.0;
pub(crate) const PERFECT_TENSION_LIMIT: f64 = 50.0;
pub(crate) const START_DISTANCE_BASE: f64 = 50.0;
pub(crate) const START_DISTANCE_PER_RARITY: f64 = 5.0;
pub(crate) const BOSS_DISTANCE_BONUS: f64 = 20.0;
pub(crate) const MAX_DISTANCE_FACTOR: f64 = 2.0;
pub(crate) const BOSS_STRENGTH_FACTOR: f64 = 2.0;
pub(crate) const TENSION_RATE_BASE: f64 = 0.6;
pub(crate) const TENSION_RATE_PER_STRENGTH: f64 = 0.15;
pub(crate) const REEL_SPEED_PER_POWER: f64 = 0.35;
pub(crate) const TENSION_DECAY: f64 = 0.8;
pub(crate) const REGROW_BASE: f64 = 0.05;
pub(crate) const REGROW_PER_STRENGTH: f64 = 0.02;
pub(crate) const BOSS_REGROW_FACTOR: f64 = 1.5;
pub(crate) const MOOD_SWING_CHANCE: f64 = 0.005;
pub(crate) const BOSS_MOOD_SWING_CHANCE: f64 = 0.01;
pub(crate) const ANGER_MULTIPLIER: f64 = 2.5;
pub(crate) const BOSS_ANGER_MULTIPLIER: f64 = 3.5;
pub(crate) const TARGET_SPAWN_CHANCE: f64 = 0.004;
pub(crate) const TARGET_LIFETIME_TICKS: u32 = 90;
pub(crate) const TARGET_ZONE_MIN: f64 = 0.15;
pub(crate) const TARGET_ZONE_MAX: f64 = 0.85;
pub(crate) const TARGET_DISTANCE_RELIEF: f64 = 0.10;
pub(crate) const TARGET_TENSION_RELIEF: f64 = 15.0;

// Economy ---------------------------------------------------------------------
pub(crate) const HAGGLE_PER_LEVEL: f64 = 0.1;
pub(crate) const COMBO_STEP: f64 = 0.1;
pub(crate) const GOLD_RUSH_MULTIPLIER: f64 = 2.0;
pub(crate) const TREND_MULTIPLIER: f64 = 1.5;
pub(crate) const ECOLOGY_SCORE_CAP: u32 = 100;
pub(crate) const ECOLOGY_PER_POINT: f64 = 0.002;
pub(crate) const BULK_JUNK_VALUE: u64 = 1;
pub(crate) const CATCH_WEIGHT_MIN: f64 = 1.0;
pub(crate) const CATCH_WEIGHT_MAX: f64 = 6.0;
pub(crate) const BIOLOGY_PER_LEVEL: f64 = 0.2;
pub(crate) const WEIGHT_PER_LOCATION: f64 = 0.2;
pub(crate) const GIANT_FISH_MULTIPLIER: f64 = 1.5;
pub(crate) const GOLDEN_CHANCE: f64 = 0.01;
pub(crate) const SHINY_CHANCE: f64 = 0.005;
pub(crate) const GOLDEN_VALUE_MULTIPLIER: f64 = 10.0;
pub(crate) const SHINY_VALUE_MULTIPLIER: f64 = 5.0;
pub(crate) const PERFECT_VALUE_MULTIPLIER: f64 = 1.2;
pub(crate) const PEDIA_TIER_THRESHOLDS: [u32; 3] = [10, 50, 100];
pub(crate) const PEDIA_TIER_BONUS: f64 = 0.1;
pub(crate) const XP_PER_RARITY: f64 = 12.0;
pub(crate) const XP_PER_LOCATION: f64 = 0.1;
pub(crate) const XP_PERFECT_MULTIPLIER: f64 = 1.2;
pub(crate) const XP_CHARM_MULTIPLIER: f64 = 1.1;
pub(crate) const XP_BOOST_MULTIPLIER: f64 = 2.0;
pub(crate) const XP_PER_LEVEL: u64 = 300;
pub(crate) const LEVEL_CASH_REWARD: u64 = 100;
pub(crate) const AQUARIUM_BASE_CAPACITY: u32 = 10;
pub(crate) const AQUARIUM_PER_LEVEL: u32 = 2;
pub(crate) const BANK_INTEREST_PER_MINUTE: f64 = 0.001;
pub(crate) const AQUARIUM_INCOME_RATE: f64 = 0.01;
pub(crate) const FILTER_BOOST_MULTIPLIER: f64 = 2.0;

// Session timing ----------------------------------------------------------------
pub(crate) const CAST_SECS: f64 = 1.0;
pub(crate) const WAIT_BASE_SECS: f64 = 2.0;
pub(crate) const WAIT_JITTER_SECS: f64 = 3.0;
pub(crate) const WAIT_RAIN_FACTOR: f64 = 0.8;
pub(crate) const WAIT_FRENZY_FACTOR: f64 = 0.5;
pub(crate) const WAIT_PATIENCE_PER_LEVEL: f64 = 0.05;
pub(crate) const WAIT_FLOOR_SECS: f64 = 0.3;
pub(crate) const BITE_WINDOW_SECS: f64 = 1.5;
pub(crate) const RESULT_DISPLAY_SECS: f64 = 1.0;
pub(crate) const DAY_CYCLE_SECS: f64 = 1_200.0;
pub(crate) const BREAK_DURABILITY_COST: f64 = 10.0;
pub(crate) const ESCAPE_DURABILITY_COST: f64 = 2.0;
pub(crate) const DOUBLE_HOOK_PER_LEVEL: f64 = 0.05;
pub(crate) const RELEASE_ECOLOGY: u32 = 1;
pub(crate) const DONATE_ECOLOGY: u32 = 5;

// Scheduler intervals (seconds) -------------------------------------------------
pub(crate) const INTEREST_INTERVAL_SECS: f64 = 60.0;
pub(crate) const AQUARIUM_INTERVAL_SECS: f64 = 60.0;
pub(crate) const MARKET_INTERVAL_SECS: f64 = 300.0;
pub(crate) const WEATHER_INTERVAL_SECS: f64 = 180.0;
pub(crate) const EVENT_INTERVAL_SECS: f64 = 120.0;
pub(crate) const CRATE_INTERVAL_SECS: f64 = 90.0;
pub(crate) const TIP_INTERVAL_SECS: f64 = 45.0;
pub(crate) const BOUNTY_INTERVAL_SECS: f64 = 600.0;
pub(crate) const EVENT_CHANCE: f64 = 0.35;
pub(crate) const EVENT_DURATION_SECS: f64 = 90.0;
pub(crate) const CRATE_CHANCE: f64 = 0.25;
pub(crate) const TIP_CHANCE: f64 = 0.2;
pub(crate) const MARKET_MIN: f64 = 0.8;
pub(crate) const MARKET_MAX: f64 = 1.5;
pub(crate) const TOURNAMENT_DURATION_SECS: f64 = 300.0;
pub(crate) const TOURNAMENT_TARGET_PER_LEVEL: u64 = 250;
pub(crate) const TOURNAMENT_REWARD_PER_LEVEL: u64 = 150;
pub(crate) const BOUNTY_MIN_WEIGHT_LOW: f64 = 2.0;
pub(crate) const BOUNTY_MIN_WEIGHT_HIGH: f64 = 5.0;
pub(crate) const BOUNTY_REWARD_MULTIPLIER: u64 = 20;
pub(crate) const CRATE_MONEY_PER_LEVEL: u64 = 25;
pub(crate) const CRATE_BAIT_USES: u32 = 5;
pub(crate) const TIP_MONEY_PER_LEVEL: u64 = 10;
pub(crate) const DAILY_SPIN_PRIZES: [u64; 6] = [100, 250, 500, 750, 1_000, 2_500];

// Shop --------------------------------------------------------------------------
pub(crate) const BAG_BASE_CAPACITY: u32 = 20;
pub(crate) const BAG_UPGRADE_STEP: u32 = 5;
pub(crate) const BAG_UPGRADE_BASE_COST: u64 = 500;
pub(crate) const AUTONET_BASE_COST: u64 = 1_000;
pub(crate) const AUTONET_MAX_LEVEL: u32 = 10;
pub(crate) const REPAIR_COST_PER_POINT: f64 = 2.0;
pub(crate) const BAIT_PACK_SIZE: u32 = 10;
pub(crate) const GOLDEN_HOOK_PRICE: u64 = 2_500;
pub(crate) const XP_BOOST_PRICE: u64 = 1_500;
pub(crate) const XP_BOOST_MINUTES: i64 = 15;
pub(crate) const FILTER_BOOST_PRICE: u64 = 1_000;
pub(crate) const FILTER_BOOST_MINUTES: i64 = 30;
pub(crate) const PET_FEED_PRICE: u64 = 50;
pub(crate) const PET_FEED_AMOUNT: f64 = 40.0;
pub(crate) const PET_XP_PER_FEED: u32 = 10;
pub(crate) const PET_XP_PER_LEVEL: u32 = 100;
pub(crate) const DAILY_SPIN_COOLDOWN_MS: i64 = 24 * 60 * MS_PER_MINUTE;
pub(crate) const TREASURE_MAP_PARTS: u32 = 4;
pub(crate) const TREASURE_MAP_REWARD: u64 = 5_000;
pub(crate) const PRESTIGE_MIN_LEVEL: u32 = 20;
pub(crate) const PRESTIGE_MONEY_DIVISOR: u64 = 10_000;
pub(crate) const PRESTIGE_UPGRADE_MAX: u32 = 10;
pub(crate) const STARTING_MONEY: u64 = 50;

// Quests ------------------------------------------------------------------------
pub(crate) const QUEST_SLOTS: usize = 3;
pub(crate) const QUEST_COOLDOWN_CATCHES: u32 = 5;
