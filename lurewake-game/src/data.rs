//! Static content tables: locations and their item pools, rods, baits, bobbers,
//! charms, pets, decorations and skill definitions.
//!
//! Content is read-only at runtime. The engine ships an embedded default table
//! (`assets/content.json`); hosts may supply their own through
//! [`crate::ContentLoader`].
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

const DEFAULT_CONTENT_DATA: &str = include_str!("../assets/content.json");

/// Broad class of a catchable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Junk,
    #[default]
    Fish,
    Treasure,
    Bait,
    Buff,
    Charm,
}

impl ItemCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junk => "junk",
            Self::Fish => "fish",
            Self::Treasure => "treasure",
            Self::Bait => "bait",
            Self::Buff => "buff",
            Self::Charm => "charm",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect applied instead of bagging when a granting item is landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Grant {
    GoldenHook,
    XpBoost { minutes: i64 },
    Charm { id: String },
    Bait { id: String, uses: u32 },
    MapPart,
}

/// Item definition as authored in the content tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub value: u64,
    #[serde(default = "default_rarity")]
    pub rarity: u8,
    /// Opaque display payload (emoji or sprite key) passed through to presentation.
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub boss: bool,
    /// Resolves on hook without the reeling minigame.
    #[serde(default)]
    pub instant: bool,
    #[serde(default)]
    pub grant: Option<Grant>,
}

const fn default_rarity() -> u8 {
    1
}

impl ItemDef {
    #[must_use]
    pub fn is_junk(&self) -> bool {
        self.category == ItemCategory::Junk
    }

    /// Whether landing this item requires the reeling minigame.
    #[must_use]
    pub fn needs_reel(&self) -> bool {
        !(self.is_junk() || self.instant)
    }
}

/// A fishing location and its item pool, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unlock_cost: u64,
    #[serde(default = "default_min_level")]
    pub min_level: u32,
    pub items: Vec<ItemDef>,
}

const fn default_min_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodDef {
    pub id: String,
    pub name: String,
    pub power: f64,
    pub max_durability: f64,
    #[serde(default)]
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaitDef {
    pub id: String,
    pub name: String,
    pub bonus: f64,
    /// Price of one pack.
    #[serde(default)]
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BobberDef {
    pub id: String,
    pub name: String,
    /// Scales the waiting time before a bite.
    #[serde(default = "default_one")]
    pub bite_multiplier: f64,
    #[serde(default)]
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharmDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub catch_bonus: f64,
    #[serde(default)]
    pub xp_boost: bool,
    #[serde(default)]
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub money_bonus: f64,
    #[serde(default)]
    pub catch_bonus: f64,
    #[serde(default)]
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: u64,
}

/// Purchasable player skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    Haggle,
    Biology,
    Luck,
    DoubleHook,
    Patience,
}

impl SkillId {
    pub const ALL: [Self; 5] = [
        Self::Haggle,
        Self::Biology,
        Self::Luck,
        Self::DoubleHook,
        Self::Patience,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: SkillId,
    pub max_level: u32,
    pub base_cost: u64,
}

impl SkillDef {
    /// Cost of buying the level after `current`.
    #[must_use]
    pub const fn cost_for_next(&self, current: u32) -> u64 {
        self.base_cost.saturating_mul(current as u64 + 1)
    }
}

/// Permanent upgrades bought with prestige currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrestigeUpgrade {
    Power,
    Luck,
    Money,
    Auto,
}

const fn default_one() -> f64 {
    1.0
}

#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("content JSON parse error: {0}")]
    Parse(String),
    #[error("duplicate {table} id `{id}`")]
    DuplicateId { table: &'static str, id: String },
    #[error("rod `{id}` must have positive power and durability")]
    InvalidRod { id: String },
    #[error("bait `{id}` bonus must be non-negative")]
    InvalidBait { id: String },
    #[error("location `{id}` has an empty item pool")]
    EmptyPool { id: String },
    #[error("content must define at least one {0}")]
    Missing(&'static str),
}

/// Complete read-only content catalog consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTables {
    pub locations: Vec<Location>,
    pub rods: Vec<RodDef>,
    pub baits: Vec<BaitDef>,
    #[serde(default)]
    pub bobbers: Vec<BobberDef>,
    #[serde(default)]
    pub charms: Vec<CharmDef>,
    #[serde(default)]
    pub pets: Vec<PetDef>,
    #[serde(default)]
    pub decorations: Vec<DecorationDef>,
    #[serde(default)]
    pub skills: Vec<SkillDef>,
}

impl ContentTables {
    /// Parse and validate content from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let tables: Self =
            serde_json::from_str(json).map_err(|e| ContentError::Parse(e.to_string()))?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load the embedded default content, falling back to a minimal pond if the
    /// bundled asset is unusable.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CONTENT_DATA).unwrap_or_else(|err| {
            log::error!("embedded content rejected: {err}");
            Self::minimal()
        })
    }

    fn minimal() -> Self {
        let item = |name: &str, category, value, rarity| ItemDef {
            name: name.to_string(),
            category,
            value,
            rarity,
            payload: String::new(),
            boss: false,
            instant: false,
            grant: None,
        };
        Self {
            locations: vec![Location {
                id: String::from("pond"),
                name: String::from("Pond"),
                unlock_cost: 0,
                min_level: 1,
                items: vec![
                    item("Old Boot", ItemCategory::Junk, 1, 1),
                    item("Bluegill", ItemCategory::Fish, 8, 1),
                    item("Carp", ItemCategory::Fish, 30, 3),
                ],
            }],
            rods: vec![RodDef {
                id: String::from("bamboo"),
                name: String::from("Bamboo Rod"),
                power: 1.0,
                max_durability: 50.0,
                price: 0,
            }],
            baits: vec![BaitDef {
                id: String::from("none"),
                name: String::from("No Bait"),
                bonus: 1.0,
                price: 0,
            }],
            bobbers: Vec::new(),
            charms: Vec::new(),
            pets: Vec::new(),
            decorations: Vec::new(),
            skills: Vec::new(),
        }
    }

    /// Validate ids and numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.locations.is_empty() {
            return Err(ContentError::Missing("location"));
        }
        if self.rods.is_empty() {
            return Err(ContentError::Missing("rod"));
        }
        if self.baits.is_empty() {
            return Err(ContentError::Missing("bait"));
        }
        ensure_unique("location", self.locations.iter().map(|l| l.id.as_str()))?;
        ensure_unique("rod", self.rods.iter().map(|r| r.id.as_str()))?;
        ensure_unique("bait", self.baits.iter().map(|b| b.id.as_str()))?;
        ensure_unique("bobber", self.bobbers.iter().map(|b| b.id.as_str()))?;
        ensure_unique("charm", self.charms.iter().map(|c| c.id.as_str()))?;
        ensure_unique("pet", self.pets.iter().map(|p| p.id.as_str()))?;
        ensure_unique("decoration", self.decorations.iter().map(|d| d.id.as_str()))?;
        for location in &self.locations {
            if location.items.is_empty() {
                return Err(ContentError::EmptyPool {
                    id: location.id.clone(),
                });
            }
        }
        for rod in &self.rods {
            if rod.power <= 0.0 || rod.max_durability <= 0.0 {
                return Err(ContentError::InvalidRod { id: rod.id.clone() });
            }
        }
        if let Some(bait) = self.baits.iter().find(|b| b.bonus < 0.0) {
            return Err(ContentError::InvalidBait {
                id: bait.id.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Zero-based position of a location; drives weight and XP scaling.
    #[must_use]
    pub fn location_index(&self, id: &str) -> Option<usize> {
        self.locations.iter().position(|l| l.id == id)
    }

    #[must_use]
    pub fn rod(&self, id: &str) -> Option<&RodDef> {
        self.rods.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn bait(&self, id: &str) -> Option<&BaitDef> {
        self.baits.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn bobber(&self, id: &str) -> Option<&BobberDef> {
        self.bobbers.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn charm(&self, id: &str) -> Option<&CharmDef> {
        self.charms.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn pet(&self, id: &str) -> Option<&PetDef> {
        self.pets.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn decoration(&self, id: &str) -> Option<&DecorationDef> {
        self.decorations.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Find an item definition by name across every location.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemDef> {
        self.locations
            .iter()
            .flat_map(|l| l.items.iter())
            .find(|item| item.name == name)
    }

    /// Every distinct non-junk species name, in content order.
    #[must_use]
    pub fn species_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.locations
            .iter()
            .flat_map(|l| l.items.iter())
            .filter(|item| item.category == ItemCategory::Fish)
            .map(|item| item.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Default rod: the first in the table.
    #[must_use]
    pub fn starter_rod(&self) -> &RodDef {
        &self.rods[0]
    }

    /// Default bait: the first in the table.
    #[must_use]
    pub fn starter_bait(&self) -> &BaitDef {
        &self.baits[0]
    }

    /// Default location: the first in the table.
    #[must_use]
    pub fn starter_location(&self) -> &Location {
        &self.locations[0]
    }
}

impl Default for ContentTables {
    fn default() -> Self {
        Self::load_from_static()
    }
}

fn ensure_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
