//! Persisted player state: the single owned aggregate behind every economy action.
//!
//! `GameState` is also the save record. Every field carries a serde default so
//! partially-absent saves load with initial values.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{
    AQUARIUM_BASE_CAPACITY, AQUARIUM_PER_LEVEL, BAG_BASE_CAPACITY, PET_HUNGER_MAX, STARTING_MONEY,
};
use crate::data::{ContentTables, ItemCategory, PrestigeUpgrade, RodDef, SkillId};
use crate::quests::{Quest, default_quests};

/// Core currency/progress counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub money: u64,
    pub banked: u64,
    pub xp: u64,
    pub level: u32,
    pub rod_id: String,
    pub bait_id: String,
    pub bobber_id: String,
    pub rod_durability: f64,
    pub location_id: String,
    pub bag_capacity: u32,
    pub bag_upgrades: u32,
    pub aquarium_capacity: u32,
    pub prestige_points: u64,
    pub prestige_level: u32,
    pub autonet_level: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            banked: 0,
            xp: 0,
            level: 1,
            rod_id: String::from("bamboo"),
            bait_id: String::from("none"),
            bobber_id: String::from("classic"),
            rod_durability: 50.0,
            location_id: String::from("pond"),
            bag_capacity: BAG_BASE_CAPACITY,
            bag_upgrades: 0,
            aquarium_capacity: aquarium_capacity_for(1),
            prestige_points: 0,
            prestige_level: 0,
            autonet_level: 0,
        }
    }
}

/// Aquarium capacity grows linearly with level.
#[must_use]
pub const fn aquarium_capacity_for(level: u32) -> u32 {
    AQUARIUM_BASE_CAPACITY.saturating_add(AQUARIUM_PER_LEVEL.saturating_mul(level))
}

/// A landed item owned by the bag or the aquarium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaughtItem {
    pub id: u64,
    pub name: String,
    pub category: ItemCategory,
    pub rarity: u8,
    #[serde(default)]
    pub boss: bool,
    pub weight: f64,
    pub value: u64,
    #[serde(default)]
    pub shiny: bool,
    #[serde(default)]
    pub golden: bool,
    #[serde(default)]
    pub perfect: bool,
    #[serde(default)]
    pub location_index: usize,
    #[serde(default)]
    pub caught_at_ms: i64,
}

impl CaughtItem {
    #[must_use]
    pub fn is_junk(&self) -> bool {
        self.category == ItemCategory::Junk
    }
}

/// Per-species collection log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PediaEntry {
    pub count: u32,
    pub max_weight: f64,
    pub shiny_seen: bool,
    pub golden_seen: bool,
    pub donated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    pub id: String,
    #[serde(default = "full_hunger")]
    pub hunger: f64,
    #[serde(default = "one")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
}

impl PetState {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            hunger: PET_HUNGER_MAX,
            level: 1,
            xp: 0,
        }
    }

    /// Hungry pets stop contributing bonuses.
    #[must_use]
    pub fn is_fed(&self) -> bool {
        self.hunger > 0.0
    }
}

const fn full_hunger() -> f64 {
    PET_HUNGER_MAX
}

const fn one() -> u32 {
    1
}

/// Timed and one-shot buffs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buffs {
    pub golden_hook: bool,
    pub xp_boost_until_ms: Option<i64>,
}

impl Buffs {
    #[must_use]
    pub fn xp_boost_active(&self, now_ms: i64) -> bool {
        self.xp_boost_until_ms.is_some_and(|until| until > now_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Newest,
    Value,
    Rarity,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmbientMode {
    #[default]
    Waves,
    Rain,
    Forest,
    Off,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sort_mode: SortMode,
    pub safe_sell: bool,
    pub ambient: AmbientMode,
}

/// Lifetime counters surfaced by statistics screens and achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifetime {
    pub casts: u64,
    pub catches: u64,
    pub junk: u64,
    pub broken_lines: u64,
    pub escapes: u64,
    pub perfect: u64,
    pub golden: u64,
    pub shiny: u64,
    pub bosses: u64,
    pub money_earned: u64,
    pub best_combo: u32,
}

/// Complete persisted player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub stats: Stats,
    pub bag: Vec<CaughtItem>,
    pub aquarium: Vec<CaughtItem>,
    pub unlocked_locations: BTreeSet<String>,
    pub owned_rods: BTreeSet<String>,
    pub owned_bobbers: BTreeSet<String>,
    pub decorations: BTreeSet<String>,
    pub achievements: BTreeSet<String>,
    pub skills: BTreeMap<SkillId, u32>,
    pub pedia: BTreeMap<String, PediaEntry>,
    pub quests: Vec<Quest>,
    pub quest_cooldown: u32,
    pub last_login_ms: i64,
    pub filter_boost_until_ms: Option<i64>,
    pub rod_mastery: BTreeMap<String, u32>,
    pub ecology: u32,
    pub buffs: Buffs,
    pub charms: BTreeSet<String>,
    pub bait_inventory: BTreeMap<String, u32>,
    pub treasure_map_parts: u32,
    pub daily_spin_at_ms: Option<i64>,
    pub settings: Settings,
    pub pets: Vec<PetState>,
    pub prestige_upgrades: BTreeMap<PrestigeUpgrade, u32>,
    pub combo: u32,
    pub lifetime: Lifetime,
    pub money_since_prestige: u64,
    pub next_item_id: u64,
    pub next_quest_id: u64,
    /// Restaurant side-feature state, owned by an external collaborator.
    pub restaurant: serde_json::Value,
}

impl Default for GameState {
    fn default() -> Self {
        let mut next_quest_id = 1;
        let quests = default_quests(&mut next_quest_id);
        Self {
            stats: Stats::default(),
            bag: Vec::new(),
            aquarium: Vec::new(),
            unlocked_locations: BTreeSet::from([String::from("pond")]),
            owned_rods: BTreeSet::from([String::from("bamboo")]),
            owned_bobbers: BTreeSet::from([String::from("classic")]),
            decorations: BTreeSet::new(),
            achievements: BTreeSet::new(),
            skills: BTreeMap::new(),
            pedia: BTreeMap::new(),
            quests,
            quest_cooldown: 0,
            last_login_ms: 0,
            filter_boost_until_ms: None,
            rod_mastery: BTreeMap::new(),
            ecology: 0,
            buffs: Buffs::default(),
            charms: BTreeSet::new(),
            bait_inventory: BTreeMap::new(),
            treasure_map_parts: 0,
            daily_spin_at_ms: None,
            settings: Settings::default(),
            pets: Vec::new(),
            prestige_upgrades: BTreeMap::new(),
            combo: 0,
            lifetime: Lifetime::default(),
            money_since_prestige: 0,
            next_item_id: 1,
            next_quest_id,
            restaurant: serde_json::Value::Null,
        }
    }
}

impl GameState {
    /// Fresh state equipped with the content's starter gear.
    #[must_use]
    pub fn new(content: &ContentTables, now_ms: i64) -> Self {
        let mut state = Self::default();
        let rod = content.starter_rod();
        state.stats.rod_id = rod.id.clone();
        state.stats.rod_durability = rod.max_durability;
        state.stats.bait_id = content.starter_bait().id.clone();
        if let Some(bobber) = content.bobbers.first() {
            state.stats.bobber_id = bobber.id.clone();
        }
        state.stats.location_id = content.starter_location().id.clone();
        state.unlocked_locations = BTreeSet::from([state.stats.location_id.clone()]);
        state.owned_rods = BTreeSet::from([rod.id.clone()]);
        state.owned_bobbers = content.bobbers.first().map(|b| b.id.clone()).into_iter().collect();
        state.last_login_ms = now_ms;
        state
    }

    /// Repair references that no longer resolve against the content tables.
    pub fn sanitize(&mut self, content: &ContentTables) {
        if content.rod(&self.stats.rod_id).is_none() {
            self.stats.rod_id = content.starter_rod().id.clone();
        }
        self.owned_rods.insert(self.stats.rod_id.clone());
        if content.bait(&self.stats.bait_id).is_none() {
            self.stats.bait_id = content.starter_bait().id.clone();
        }
        if !self.stats.bobber_id.is_empty() && content.bobber(&self.stats.bobber_id).is_none() {
            self.stats.bobber_id = content
                .bobbers
                .first()
                .map(|b| b.id.clone())
                .unwrap_or_default();
        }
        if content.location(&self.stats.location_id).is_none() {
            self.stats.location_id = content.starter_location().id.clone();
        }
        self.unlocked_locations.insert(self.stats.location_id.clone());
        let max = self.rod_def(content).max_durability;
        self.stats.rod_durability = self.stats.rod_durability.clamp(0.0, max);
        self.stats.level = self.stats.level.max(1);
        self.stats.bag_capacity = self.stats.bag_capacity.max(BAG_BASE_CAPACITY);
        self.stats.aquarium_capacity = self
            .stats
            .aquarium_capacity
            .max(aquarium_capacity_for(self.stats.level));
        self.pets.retain(|pet| content.pet(&pet.id).is_some());
        for pet in &mut self.pets {
            pet.hunger = pet.hunger.clamp(0.0, PET_HUNGER_MAX);
        }
        self.charms.retain(|id| content.charm(id).is_some());
        let max_id = self
            .bag
            .iter()
            .chain(self.aquarium.iter())
            .map(|item| item.id)
            .max()
            .unwrap_or(0);
        self.next_item_id = self.next_item_id.max(max_id.saturating_add(1));
        if self.quests.is_empty() && self.quest_cooldown == 0 {
            self.quests = default_quests(&mut self.next_quest_id);
        }
    }

    /// Equipped rod definition, falling back to the starter rod.
    #[must_use]
    pub fn rod_def<'a>(&self, content: &'a ContentTables) -> &'a RodDef {
        content
            .rod(&self.stats.rod_id)
            .unwrap_or_else(|| content.starter_rod())
    }

    #[must_use]
    pub fn skill(&self, id: SkillId) -> u32 {
        self.skills.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn prestige(&self, upgrade: PrestigeUpgrade) -> u32 {
        self.prestige_upgrades.get(&upgrade).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn mastery(&self, rod_id: &str) -> u32 {
        self.rod_mastery.get(rod_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn bag_full(&self) -> bool {
        self.bag.len() >= self.stats.bag_capacity as usize
    }

    #[must_use]
    pub fn aquarium_full(&self) -> bool {
        self.aquarium.len() >= self.stats.aquarium_capacity as usize
    }

    #[must_use]
    pub fn bag_free_slots(&self) -> usize {
        (self.stats.bag_capacity as usize).saturating_sub(self.bag.len())
    }

    /// Allocate the next unique item id.
    pub fn allocate_item_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id = self.next_item_id.saturating_add(1);
        id
    }

    #[must_use]
    pub fn bag_item(&self, id: u64) -> Option<&CaughtItem> {
        self.bag.iter().find(|item| item.id == id)
    }

    /// Remove an item from the bag by id, if still present.
    pub fn take_from_bag(&mut self, id: u64) -> Option<CaughtItem> {
        let pos = self.bag.iter().position(|item| item.id == id)?;
        Some(self.bag.remove(pos))
    }

    /// Remove an item from the aquarium by id, if still present.
    pub fn take_from_aquarium(&mut self, id: u64) -> Option<CaughtItem> {
        let pos = self.aquarium.iter().position(|item| item.id == id)?;
        Some(self.aquarium.remove(pos))
    }

    /// Credit money earned from play (sales, rewards, income).
    pub fn earn(&mut self, amount: u64) {
        self.stats.money = self.stats.money.saturating_add(amount);
        self.lifetime.money_earned = self.lifetime.money_earned.saturating_add(amount);
        self.money_since_prestige = self.money_since_prestige.saturating_add(amount);
    }

    /// Update the collection log for a landed item.
    pub fn record_pedia(&mut self, item: &CaughtItem) {
        let entry = self.pedia.entry(item.name.clone()).or_default();
        entry.count = entry.count.saturating_add(1);
        if item.weight > entry.max_weight {
            entry.max_weight = item.weight;
        }
        entry.shiny_seen |= item.shiny;
        entry.golden_seen |= item.golden;
    }

    #[must_use]
    pub fn pedia_count(&self, name: &str) -> u32 {
        self.pedia.get(name).map_or(0, |entry| entry.count)
    }

    /// Items in the bag ordered by the player's sort preference.
    #[must_use]
    pub fn sorted_bag(&self) -> Vec<&CaughtItem> {
        let mut items: Vec<&CaughtItem> = self.bag.iter().collect();
        match self.settings.sort_mode {
            SortMode::Newest => items.sort_by(|a, b| b.id.cmp(&a.id)),
            SortMode::Value => items.sort_by(|a, b| b.value.cmp(&a.value)),
            SortMode::Rarity => items.sort_by(|a, b| b.rarity.cmp(&a.rarity)),
            SortMode::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        items
    }
}
