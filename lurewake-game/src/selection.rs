//! Catch selector: weighted pick of an item from a location pool.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    GOLDEN_HOOK_MIN_RARITY, GOLDEN_HOOK_MULTIPLIER, JUNK_ROD_DIVISOR, NIGHT_MIN_RARITY,
    NIGHT_MULTIPLIER, PET_BONUS_MIN_RARITY, PRESTIGE_LUCK_PER_LEVEL, PRESTIGE_POWER_PER_LEVEL,
    RAIN_MULTIPLIER, RARITY_BASE_WEIGHT, SKILL_LUCK_PER_LEVEL, STORM_MIN_RARITY,
    STORM_RARE_MULTIPLIER,
};
use crate::data::ItemDef;
use crate::modifiers::ModifierContext;
use crate::state::Buffs;
use crate::weather::{TimeOfDay, Weather};

/// Single multiplicative weight factor recorded for a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightFactor {
    pub label: String,
    pub value: f64,
}

/// Candidate weight telemetry captured during selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub base_weight: f64,
    /// Multipliers applied in order.
    pub multipliers: Vec<WeightFactor>,
    pub final_weight: f64,
}

/// Weights of a pool in pool order plus the draw total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolWeights {
    pub candidates: Vec<WeightedCandidate>,
    /// Sum of final weights, forced to 1 when every weight is zero.
    pub total: f64,
}

impl PoolWeights {
    /// Sum of the raw candidate weights, without the degenerate-pool override.
    #[must_use]
    pub fn raw_total(&self) -> f64 {
        self.candidates.iter().map(|c| c.final_weight).sum()
    }
}

/// `100 / 2^rarity`.
#[must_use]
pub fn base_weight(rarity: u8) -> f64 {
    RARITY_BASE_WEIGHT / 2_f64.powi(i32::from(rarity))
}

fn candidate_weight(item: &ItemDef, ctx: &ModifierContext) -> WeightedCandidate {
    let base = base_weight(item.rarity);
    let mut multipliers = Vec::new();
    let mut push = |label: &str, value: f64| {
        multipliers.push(WeightFactor {
            label: label.to_string(),
            value: value.max(0.0),
        });
    };

    if item.is_junk() {
        push("rod_power_junk", 1.0 / (ctx.rod_power * JUNK_ROD_DIVISOR));
    } else {
        push("rod_power", ctx.rod_power);
        push("mastery", ctx.mastery_bonus());
        push("bait", ctx.bait_bonus);
        push(
            "prestige_power",
            1.0 + PRESTIGE_POWER_PER_LEVEL * f64::from(ctx.prestige.power),
        );
        push(
            "prestige_luck",
            1.0 + PRESTIGE_LUCK_PER_LEVEL * f64::from(ctx.prestige.luck),
        );
        push(
            "skill_luck",
            1.0 + SKILL_LUCK_PER_LEVEL * f64::from(ctx.skills.luck),
        );
        push("charms", 1.0 + ctx.charm_catch_bonus);
        if item.rarity >= PET_BONUS_MIN_RARITY {
            push("pets", 1.0 + ctx.pet_catch_bonus);
        }
        match ctx.weather {
            Weather::Storm if item.rarity >= STORM_MIN_RARITY => {
                push("storm", STORM_RARE_MULTIPLIER);
            }
            Weather::Rain => push("rain", RAIN_MULTIPLIER),
            Weather::Sunny | Weather::Storm => {}
        }
        if ctx.time_of_day == TimeOfDay::Night && item.rarity >= NIGHT_MIN_RARITY {
            push("night", NIGHT_MULTIPLIER);
        }
    }

    if ctx.golden_hook {
        if item.rarity < GOLDEN_HOOK_MIN_RARITY {
            push("golden_hook", 0.0);
        } else {
            push("golden_hook", GOLDEN_HOOK_MULTIPLIER);
        }
    }

    let final_weight = multipliers.iter().fold(base, |acc, f| acc * f.value);
    WeightedCandidate {
        id: item.name.clone(),
        base_weight: base,
        multipliers,
        final_weight: if final_weight.is_finite() {
            final_weight.max(0.0)
        } else {
            0.0
        },
    }
}

/// Compute every candidate weight for a pool without drawing.
#[must_use]
pub fn weigh_pool(pool: &[ItemDef], ctx: &ModifierContext) -> PoolWeights {
    let candidates: Vec<WeightedCandidate> =
        pool.iter().map(|item| candidate_weight(item, ctx)).collect();
    let total: f64 = candidates.iter().map(|c| c.final_weight).sum();
    PoolWeights {
        candidates,
        total: if total > 0.0 { total } else { 1.0 },
    }
}

/// Deterministic pick for a draw in `[0, total)`; `None` means nothing caught.
#[must_use]
pub fn pick_with_draw(weights: &PoolWeights, draw: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (index, candidate) in weights.candidates.iter().enumerate() {
        if candidate.final_weight <= 0.0 {
            continue;
        }
        cumulative += candidate.final_weight;
        if cumulative > draw {
            return Some(index);
        }
    }
    None
}

/// Select an item from the pool.
///
/// An active golden hook is consumed by the call, whatever the outcome.
pub fn select_item<'a, R: Rng + ?Sized>(
    pool: &'a [ItemDef],
    ctx: &ModifierContext,
    buffs: &mut Buffs,
    rng: &mut R,
) -> Option<&'a ItemDef> {
    let weights = weigh_pool(pool, ctx);
    if ctx.golden_hook || buffs.golden_hook {
        buffs.golden_hook = false;
    }
    let draw = rng.r#gen::<f64>() * weights.total;
    let picked = pick_with_draw(&weights, draw).and_then(|index| pool.get(index));
    log::debug!(
        "catch selection: draw={draw:.4} total={:.4} picked={}",
        weights.total,
        picked.map_or("nothing", |item| item.name.as_str())
    );
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemCategory;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn item(name: &str, category: ItemCategory, rarity: u8) -> ItemDef {
        ItemDef {
            name: name.to_string(),
            category,
            value: 10,
            rarity,
            payload: String::new(),
            boss: false,
            instant: false,
            grant: None,
        }
    }

    #[test]
    fn junk_and_fish_weights_match_formula() {
        let pool = vec![
            item("Boot", ItemCategory::Junk, 1),
            item("Bass", ItemCategory::Fish, 4),
        ];
        let ctx = ModifierContext {
            rod_power: 1.0,
            bait_bonus: 1.0,
            ..ModifierContext::default()
        };
        let weights = weigh_pool(&pool, &ctx);
        assert!((weights.candidates[0].final_weight - 50.0 / 1.5).abs() < 1e-9);
        assert!((weights.candidates[1].final_weight - 6.25).abs() < 1e-9);
        assert!((weights.total - weights.raw_total()).abs() < 1e-9);
        assert_eq!(pick_with_draw(&weights, 0.0), Some(0));
        assert_eq!(pick_with_draw(&weights, 34.0), Some(1));
    }

    #[test]
    fn weather_and_night_apply_by_rarity() {
        let pool = vec![
            item("Perch", ItemCategory::Fish, 2),
            item("Pike", ItemCategory::Fish, 4),
        ];
        let storm_night = ModifierContext {
            weather: Weather::Storm,
            time_of_day: TimeOfDay::Night,
            ..ModifierContext::default()
        };
        let weights = weigh_pool(&pool, &storm_night);
        assert!((weights.candidates[0].final_weight - 25.0).abs() < 1e-9);
        assert!((weights.candidates[1].final_weight - 6.25 * 1.5 * 1.25).abs() < 1e-9);

        let rain = ModifierContext {
            weather: Weather::Rain,
            ..ModifierContext::default()
        };
        let weights = weigh_pool(&pool, &rain);
        assert!((weights.candidates[0].final_weight - 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_pool_catches_nothing() {
        let pool = vec![item("Boot", ItemCategory::Junk, 1)];
        let ctx = ModifierContext {
            golden_hook: true,
            ..ModifierContext::default()
        };
        let weights = weigh_pool(&pool, &ctx);
        assert!((weights.total - 1.0).abs() < f64::EPSILON);
        assert_eq!(pick_with_draw(&weights, 0.5), None);

        let mut buffs = Buffs {
            golden_hook: true,
            ..Buffs::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(select_item(&pool, &ctx, &mut buffs, &mut rng).is_none());
        assert!(!buffs.golden_hook);
    }

    #[test]
    fn zero_weight_items_are_skipped() {
        let pool = vec![
            item("Boot", ItemCategory::Junk, 1),
            item("Carp", ItemCategory::Fish, 3),
        ];
        let ctx = ModifierContext {
            golden_hook: true,
            ..ModifierContext::default()
        };
        let weights = weigh_pool(&pool, &ctx);
        assert_eq!(pick_with_draw(&weights, 0.0), Some(1));
    }
}
