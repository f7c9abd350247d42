//! Lurewake Game Engine
//!
//! Platform-agnostic catch-resolution and session-economy engine for the
//! Lurewake fishing game. This crate provides all game mechanics without UI or
//! platform-specific dependencies; hosts render the [`Notice`] values it emits.

pub mod achievements;
pub mod constants;
pub mod data;
pub mod economy;
pub mod minigame;
pub mod modifiers;
pub mod notice;
pub mod numbers;
pub mod persistence;
pub mod quests;
pub mod rng;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod shop;
pub mod state;
pub mod weather;
pub mod world;

// Re-export commonly used types
pub use constants::{SAVE_KEY, TICK_SECS};
pub use data::{
    ContentError, ContentTables, Grant, ItemCategory, ItemDef, Location, PrestigeUpgrade, SkillId,
};
pub use economy::{
    BulkSale, ComboEvent, LevelUps, Variant, aquarium_income, bank_interest, bulk_sale,
    catch_value, catch_weight, experience, grant_experience, next_combo, offline_income,
    sale_price,
};
pub use minigame::{Mood, ReelOutcome, ReelingMinigame, TargetPrompt, TickReport};
pub use modifiers::ModifierContext;
pub use notice::{Notice, Notices, SoundCue, Tone, has_toast};
pub use persistence::{LoadOutcome, MemoryStorage, SaveStorage, persist, restore};
pub use quests::{Quest, QuestEvent, QuestGoal};
pub use rng::{CountingRng, RngBundle};
pub use scheduler::{Scheduler, WorldTask};
pub use selection::{PoolWeights, WeightFactor, WeightedCandidate, select_item, weigh_pool};
pub use session::{FishingSession, Phase};
pub use shop::{ActionError, PlayerAction};
pub use state::{CaughtItem, GameState, Lifetime, Stats};
pub use weather::{TimeOfDay, Weather};
pub use world::{Bounty, Market, RandomEvent, Tournament, World};

/// Trait for abstracting content loading operations
/// Platform-specific implementations should provide this
pub trait ContentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the content catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded or fails validation.
    fn load_content(&self) -> Result<ContentTables, Self::Error>;
}

/// Loads the catalog embedded in the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContent;

impl ContentLoader for StaticContent {
    type Error = ContentError;

    fn load_content(&self) -> Result<ContentTables, Self::Error> {
        let content = ContentTables::load_from_static();
        content.validate()?;
        Ok(content)
    }
}

/// Main game engine wiring content and storage into sessions
pub struct GameEngine<L, S>
where
    L: ContentLoader,
    S: SaveStorage,
{
    content_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: ContentLoader,
    S: SaveStorage,
{
    /// Create a new game engine with the provided content loader and storage
    pub const fn new(content_loader: L, storage: S) -> Self {
        Self {
            content_loader,
            storage,
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Start a brand-new session, ignoring any existing save.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded.
    pub fn new_session(&self, seed: u64, now_ms: i64) -> Result<FishingSession, L::Error> {
        let content = self.content_loader.load_content()?;
        let state = GameState::new(&content, now_ms);
        Ok(FishingSession::new(content, state, seed, now_ms))
    }

    /// Restore the saved session, applying offline effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded. Missing or corrupt
    /// saves fall back to a fresh state instead of failing.
    pub fn resume_session(
        &self,
        seed: u64,
        now_ms: i64,
    ) -> Result<(FishingSession, LoadOutcome), anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let content = self.content_loader.load_content().map_err(Into::into)?;
        let (state, outcome) = restore(&self.storage, &content, now_ms);
        Ok((FishingSession::new(content, state, seed, now_ms), outcome))
    }

    /// Persist the session state. Write failures are logged and reported as `false`.
    pub fn save_session(&self, session: &mut FishingSession) -> bool {
        let now_ms = session.now_ms();
        session.with_state_mut(|state| persist(&self.storage, state, now_ms))
    }

    /// Delete the save record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects the delete.
    pub fn delete_save(&self) -> Result<(), S::Error> {
        self.storage.delete(SAVE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl ContentLoader for FixtureLoader {
        type Error = Infallible;

        fn load_content(&self) -> Result<ContentTables, Self::Error> {
            Ok(ContentTables::load_from_static())
        }
    }

    #[test]
    fn engine_saves_and_resumes_state() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let mut session = engine.new_session(0xF15E, 0).unwrap();
        session.with_state_mut(|state| {
            state.stats.money = 4_321;
            state.stats.level = 7;
        });
        assert!(engine.save_session(&mut session));

        let (resumed, outcome) = engine.resume_session(1, 60_000).unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Restored {
                offline_minutes: 1,
                income: 0
            }
        );
        assert_eq!(resumed.state().stats.money, 4_321);
        assert_eq!(resumed.state().stats.level, 7);

        engine.delete_save().unwrap();
        let (_, outcome) = engine.resume_session(1, 60_000).unwrap();
        assert_eq!(outcome, LoadOutcome::Fresh);
    }

    #[test]
    fn static_content_validates() {
        assert!(StaticContent.load_content().is_ok());
    }
}
