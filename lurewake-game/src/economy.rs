//! Economy calculator: pure payout, weight, value and experience formulas.
use rand::Rng;

use crate::constants::{
    AQUARIUM_INCOME_RATE, BANK_INTEREST_PER_MINUTE, BIOLOGY_PER_LEVEL, BULK_JUNK_VALUE,
    CATCH_WEIGHT_MAX, CATCH_WEIGHT_MIN, COMBO_STEP, FILTER_BOOST_MULTIPLIER,
    GIANT_FISH_MULTIPLIER, GOLDEN_CHANCE, GOLDEN_VALUE_MULTIPLIER, HAGGLE_PER_LEVEL,
    LEVEL_CASH_REWARD, OFFLINE_INCOME_PER_LEVEL_MINUTE, OFFLINE_MAX_MINUTES, OFFLINE_MIN_MINUTES,
    PEDIA_TIER_BONUS, PEDIA_TIER_THRESHOLDS, PERFECT_VALUE_MULTIPLIER, PRESTIGE_AUTO_PER_LEVEL,
    PRESTIGE_MONEY_PER_LEVEL, SHINY_CHANCE, SHINY_VALUE_MULTIPLIER, WEIGHT_PER_LOCATION,
    XP_BOOST_MULTIPLIER, XP_CHARM_MULTIPLIER, XP_PER_LEVEL, XP_PER_LOCATION, XP_PER_RARITY,
    XP_PERFECT_MULTIPLIER,
};
use crate::data::ItemCategory;
use crate::modifiers::ModifierContext;
use crate::numbers::{floor_f64_to_u64, round_2dp, u64_to_f64, usize_to_f64};
use crate::state::{CaughtItem, Stats, aquarium_capacity_for};
use crate::world::RandomEvent;

/// Sale price of a single item with every active multiplier applied.
#[must_use]
pub fn sale_price(name: &str, base_value: u64, ctx: &ModifierContext) -> u64 {
    let price = u64_to_f64(base_value)
        * (1.0 + HAGGLE_PER_LEVEL * f64::from(ctx.skills.haggle))
        * (1.0 + ctx.pet_money_bonus)
        * (1.0 + PRESTIGE_MONEY_PER_LEVEL * f64::from(ctx.prestige.money))
        * ctx.market_multiplier(name)
        * ctx.gold_rush_multiplier()
        * (1.0 + COMBO_STEP * f64::from(ctx.combo))
        * ctx.trend_multiplier(name)
        * ctx.ecology_multiplier();
    floor_f64_to_u64(price)
}

/// Whether safe-sell mode keeps an item out of bulk sales.
#[must_use]
pub fn is_protected(item: &CaughtItem) -> bool {
    item.rarity >= 3 || item.category == ItemCategory::Treasure
}

/// Result of a bulk sale quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSale {
    pub total: u64,
    pub sold_ids: Vec<u64>,
}

/// Quote a sell-all over the given items. Junk contributes a flat amount.
#[must_use]
pub fn bulk_sale(items: &[CaughtItem], ctx: &ModifierContext, safe_mode: bool) -> BulkSale {
    items
        .iter()
        .filter(|item| !(safe_mode && is_protected(item)))
        .fold(BulkSale::default(), |mut sale, item| {
            let price = if item.is_junk() {
                BULK_JUNK_VALUE
            } else {
                sale_price(&item.name, item.value, ctx)
            };
            sale.total = sale.total.saturating_add(price);
            sale.sold_ids.push(item.id);
            sale
        })
}

/// Catch outcomes that move the combo counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEvent {
    Landed,
    Junk,
    Broken,
    Escaped,
}

#[must_use]
pub const fn next_combo(combo: u32, event: ComboEvent) -> u32 {
    match event {
        ComboEvent::Landed => combo.saturating_add(1),
        ComboEvent::Junk | ComboEvent::Broken | ComboEvent::Escaped => 0,
    }
}

/// Generated weight of a landed catch, two decimals.
pub fn catch_weight<R: Rng + ?Sized>(ctx: &ModifierContext, rng: &mut R) -> f64 {
    let mut weight = rng.gen_range(CATCH_WEIGHT_MIN..CATCH_WEIGHT_MAX)
        * (1.0 + BIOLOGY_PER_LEVEL * f64::from(ctx.skills.biology))
        * (1.0 + WEIGHT_PER_LOCATION * usize_to_f64(ctx.location_index));
    if ctx.event_is(RandomEvent::GiantFish) {
        weight *= GIANT_FISH_MULTIPLIER;
    }
    round_2dp(weight)
}

/// Golden (1%) takes precedence over shiny (0.5%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Variant {
    pub golden: bool,
    pub shiny: bool,
}

pub fn roll_variant<R: Rng + ?Sized>(rng: &mut R) -> Variant {
    if rng.r#gen::<f64>() < GOLDEN_CHANCE {
        return Variant {
            golden: true,
            shiny: false,
        };
    }
    Variant {
        golden: false,
        shiny: rng.r#gen::<f64>() < SHINY_CHANCE,
    }
}

/// Collection tier reached after `count` catches of a species.
#[must_use]
pub fn pedia_tier(count: u32) -> u32 {
    let reached = PEDIA_TIER_THRESHOLDS
        .iter()
        .filter(|threshold| count >= **threshold)
        .count();
    u32::try_from(reached).unwrap_or(0)
}

/// Computed value of a new catch instance.
#[must_use]
pub fn catch_value(base: u64, variant: Variant, perfect: bool, pedia_count: u32) -> u64 {
    let mut value = u64_to_f64(base);
    if variant.golden {
        value *= GOLDEN_VALUE_MULTIPLIER;
    } else if variant.shiny {
        value *= SHINY_VALUE_MULTIPLIER;
    }
    if perfect {
        value *= PERFECT_VALUE_MULTIPLIER;
    }
    value *= 1.0 + PEDIA_TIER_BONUS * f64::from(pedia_tier(pedia_count));
    floor_f64_to_u64(value)
}

/// Experience granted for landing an item.
#[must_use]
pub fn experience(rarity: u8, perfect: bool, ctx: &ModifierContext) -> u64 {
    let mut xp = (f64::from(rarity)
        * XP_PER_RARITY
        * (1.0 + XP_PER_LOCATION * usize_to_f64(ctx.location_index)))
    .floor();
    if perfect {
        xp *= XP_PERFECT_MULTIPLIER;
    }
    if ctx.xp_charm {
        xp *= XP_CHARM_MULTIPLIER;
    }
    if ctx.xp_boost {
        xp *= XP_BOOST_MULTIPLIER;
    }
    floor_f64_to_u64(xp)
}

/// Levels reached by a single experience grant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelUps {
    pub levels: Vec<u32>,
    pub cash: u64,
}

/// Add experience, levelling up while the threshold is met; overflow carries.
pub fn grant_experience(stats: &mut Stats, xp: u64) -> LevelUps {
    let mut ups = LevelUps::default();
    stats.xp = stats.xp.saturating_add(xp);
    loop {
        let needed = u64::from(stats.level).saturating_mul(XP_PER_LEVEL);
        if stats.xp < needed {
            break;
        }
        stats.xp -= needed;
        stats.level = stats.level.saturating_add(1);
        let cash = u64::from(stats.level).saturating_mul(LEVEL_CASH_REWARD);
        stats.money = stats.money.saturating_add(cash);
        stats.aquarium_capacity = stats
            .aquarium_capacity
            .max(aquarium_capacity_for(stats.level));
        ups.cash = ups.cash.saturating_add(cash);
        ups.levels.push(stats.level);
    }
    ups
}

/// Idle income accrued while away. Zero below the minimum absence.
#[must_use]
pub fn offline_income(minutes: u64, autonet_level: u32, prestige_auto: u32) -> u64 {
    if minutes < OFFLINE_MIN_MINUTES {
        return 0;
    }
    let minutes = minutes.min(OFFLINE_MAX_MINUTES);
    let bonus = 1.0 + PRESTIGE_AUTO_PER_LEVEL * f64::from(prestige_auto);
    floor_f64_to_u64(
        u64_to_f64(minutes)
            * f64::from(autonet_level)
            * OFFLINE_INCOME_PER_LEVEL_MINUTE
            * bonus,
    )
}

/// Interest on banked money for the given minutes.
#[must_use]
pub fn bank_interest(banked: u64, minutes: f64) -> u64 {
    floor_f64_to_u64(u64_to_f64(banked) * BANK_INTEREST_PER_MINUTE * minutes)
}

/// Passive income from displayed aquarium fish.
#[must_use]
pub fn aquarium_income(fish: &[CaughtItem], minutes: f64, filter_boost: bool) -> u64 {
    let total = fish
        .iter()
        .fold(0_u64, |acc, item| acc.saturating_add(item.value));
    let boost = if filter_boost {
        FILTER_BOOST_MULTIPLIER
    } else {
        1.0
    };
    floor_f64_to_u64(u64_to_f64(total) * AQUARIUM_INCOME_RATE * minutes * boost)
}
