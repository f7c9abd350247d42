//! Save/load gateway.
//!
//! The whole [`GameState`] is serialized as one JSON record under
//! [`SAVE_KEY`]. Loading applies the offline effects of the time away before
//! handing the state back to the session.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::constants::{
    MS_PER_MINUTE, OFFLINE_MAX_MINUTES, PET_HUNGER_DECAY_PER_MINUTE, SAVE_KEY,
};
use crate::data::{ContentTables, PrestigeUpgrade};
use crate::economy::offline_income;
use crate::numbers::{i64_to_u64, u64_to_f64};
use crate::state::GameState;

/// Key/value store for serialized saves.
/// Platform-specific implementations should provide this
pub trait SaveStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write a payload under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn save(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Read the payload under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Remove the payload under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be removed.
    fn delete(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-process storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw payload under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }
}

impl SaveStorage for MemoryStorage {
    type Error = Infallible;

    fn save(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}

/// How a restore resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No save existed.
    Fresh,
    /// A save existed but could not be read; a fresh state replaced it.
    Corrupt,
    Restored { offline_minutes: u64, income: u64 },
}

/// Stamp the login time and write the state. Failures are logged, not returned.
pub fn persist<S: SaveStorage>(storage: &S, state: &mut GameState, now_ms: i64) -> bool {
    state.last_login_ms = now_ms;
    let payload = match serde_json::to_string(state) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("failed to serialize save: {err}");
            return false;
        }
    };
    match storage.save(SAVE_KEY, &payload) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("failed to write save: {err}");
            false
        }
    }
}

/// Load the save, falling back to a fresh state when absent or unreadable.
pub fn restore<S: SaveStorage>(
    storage: &S,
    content: &ContentTables,
    now_ms: i64,
) -> (GameState, LoadOutcome) {
    let payload = match storage.load(SAVE_KEY) {
        Ok(Some(payload)) => payload,
        Ok(None) => return (GameState::new(content, now_ms), LoadOutcome::Fresh),
        Err(err) => {
            log::warn!("failed to read save, starting fresh: {err}");
            return (GameState::new(content, now_ms), LoadOutcome::Corrupt);
        }
    };
    let mut state = match serde_json::from_str::<GameState>(&payload) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("corrupt save, starting fresh: {err}");
            return (GameState::new(content, now_ms), LoadOutcome::Corrupt);
        }
    };
    let (offline_minutes, income) = apply_offline(&mut state, now_ms);
    state.sanitize(content);
    log::info!(
        "save restored: level {}, {offline_minutes} min offline, +{income} idle income",
        state.stats.level
    );
    (
        state,
        LoadOutcome::Restored {
            offline_minutes,
            income,
        },
    )
}

/// Whole minutes elapsed since the last login, capped.
#[must_use]
pub fn offline_minutes(last_login_ms: i64, now_ms: i64) -> u64 {
    let elapsed = i64_to_u64(now_ms.saturating_sub(last_login_ms));
    (elapsed / i64_to_u64(MS_PER_MINUTE)).min(OFFLINE_MAX_MINUTES)
}

/// Idle income and pet hunger for the time away. Returns `(minutes, income)`.
pub fn apply_offline(state: &mut GameState, now_ms: i64) -> (u64, u64) {
    let minutes = offline_minutes(state.last_login_ms, now_ms);
    let income = offline_income(
        minutes,
        state.stats.autonet_level,
        state.prestige(PrestigeUpgrade::Auto),
    );
    state.earn(income);
    let decay = u64_to_f64(minutes) * PET_HUNGER_DECAY_PER_MINUTE;
    for pet in &mut state.pets {
        pet.hunger = (pet.hunger - decay).max(0.0);
    }
    state.last_login_ms = now_ms;
    (minutes, income)
}
