//! Fishing session orchestrator.
//!
//! Owns the state aggregate, the world and the RNG streams, and drives the
//! cast loop: `Idle → Casting → Waiting → Bite → Minigame → {Caught | Broken |
//! Escaped} → Idle`. Each phase carries a single time-remaining value advanced
//! by [`FishingSession::advance`], which also drives the world scheduler.
use rand::Rng;

use crate::achievements;
use crate::constants::{
    BITE_WINDOW_SECS, BREAK_DURABILITY_COST, CAST_SECS, CRATE_BAIT_USES, CRATE_CHANCE,
    CRATE_MONEY_PER_LEVEL, DOUBLE_HOOK_PER_LEVEL, ESCAPE_DURABILITY_COST, EVENT_CHANCE,
    MS_PER_MINUTE, NOTICE_ACHIEVEMENT, NOTICE_BAIT_EMPTY, NOTICE_BITE, NOTICE_BITE_MISSED,
    NOTICE_BOUNTY_PAID, NOTICE_BUFF_EXPIRED, NOTICE_CAST, NOTICE_CAUGHT, NOTICE_CAUGHT_GOLDEN,
    NOTICE_CAUGHT_PERFECT, NOTICE_CAUGHT_SHINY, NOTICE_DOUBLE_HOOK, NOTICE_DOUBLE_HOOK_LOST,
    NOTICE_ESCAPED, NOTICE_EVENT_END, NOTICE_EVENT_START, NOTICE_FISH_ANGRY, NOTICE_GRANT,
    NOTICE_JUNK, NOTICE_LINE_BROKE, NOTICE_MARKET, NOTICE_NOTHING_CAUGHT, NOTICE_QUEST_DONE,
    NOTICE_REJECTED, NOTICE_SUPPLY_CRATE, NOTICE_TARGET_HIT, NOTICE_TARGET_SPAWN,
    NOTICE_TOURNAMENT_LOST, NOTICE_TOURNAMENT_WON, NOTICE_TREASURE_MAP, NOTICE_VISITOR_TIP,
    NOTICE_WEATHER, RESULT_DISPLAY_SECS, TICK_SECS, TIP_CHANCE, TIP_MONEY_PER_LEVEL,
    TREASURE_MAP_PARTS, TREASURE_MAP_REWARD, WAIT_BASE_SECS, WAIT_FLOOR_SECS, WAIT_FRENZY_FACTOR,
    WAIT_JITTER_SECS, WAIT_PATIENCE_PER_LEVEL, WAIT_RAIN_FACTOR,
};
use crate::data::{ContentTables, Grant, ItemDef};
use crate::economy::{
    ComboEvent, Variant, aquarium_income, bank_interest, catch_value, catch_weight, experience,
    grant_experience, next_combo, roll_variant,
};
use crate::minigame::{Mood, ReelOutcome, ReelingMinigame, TickReport};
use crate::modifiers::ModifierContext;
use crate::notice::{Notice, Notices, SoundCue, Tone};
use crate::numbers::secs_to_ms;
use crate::quests::{QuestEvent, generate_quests, record_progress};
use crate::rng::RngBundle;
use crate::scheduler::{Scheduler, WorldTask};
use crate::selection::select_item;
use crate::shop::{self, ActionEnv, ActionError, PlayerAction, credit, level_up_notices};
use crate::state::{CaughtItem, GameState};
use crate::weather::Weather;
use crate::world::{Bounty, RandomEvent, World, WorldExpiry};

/// Cast-loop phase. Bite and minigame phases carry the hooked item.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Casting,
    Waiting,
    Bite { item: ItemDef },
    Minigame { item: ItemDef, game: ReelingMinigame },
    Caught,
    Broken,
    Escaped,
}

impl Phase {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Casting => "casting",
            Self::Waiting => "waiting",
            Self::Bite { .. } => "bite",
            Self::Minigame { .. } => "minigame",
            Self::Caught => "caught",
            Self::Broken => "broken",
            Self::Escaped => "escaped",
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Single-player fishing session.
#[derive(Debug, Clone)]
pub struct FishingSession {
    content: ContentTables,
    state: GameState,
    world: World,
    scheduler: Scheduler<WorldTask>,
    rng: RngBundle,
    phase: Phase,
    remaining: f64,
    tick_accumulator: f64,
    next_attempt_id: u64,
    now_ms: i64,
}

impl FishingSession {
    /// Start a session over restored state. `now_ms` is the wall clock at start.
    #[must_use]
    pub fn new(content: ContentTables, mut state: GameState, seed: u64, now_ms: i64) -> Self {
        state.sanitize(&content);
        let mut rng = RngBundle::from_user_seed(seed);
        let mut world = World {
            weather: Weather::roll(rng.world()),
            ..World::default()
        };
        world.market.rotate(&content, rng.world());
        world.bounty = Bounty::roll(
            &content,
            |id| state.unlocked_locations.contains(id),
            rng.world(),
        );
        Self {
            content,
            state,
            world,
            scheduler: WorldTask::default_schedule(),
            rng,
            phase: Phase::Idle,
            remaining: 0.0,
            tick_accumulator: 0.0,
            next_attempt_id: 1,
            now_ms,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutate the state directly, bypassing action validation.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn content(&self) -> &ContentTables {
        &self.content
    }

    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Seconds left in the current timed phase.
    #[must_use]
    pub const fn remaining(&self) -> f64 {
        self.remaining
    }

    #[must_use]
    pub const fn now_ms(&self) -> i64 {
        self.now_ms
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    /// The running minigame, if any.
    #[must_use]
    pub const fn minigame(&self) -> Option<&ReelingMinigame> {
        match &self.phase {
            Phase::Minigame { game, .. } => Some(game),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_attempt_id(&self) -> Option<u64> {
        self.minigame().map(ReelingMinigame::attempt_id)
    }

    /// Modifier snapshot for the current state and world.
    #[must_use]
    pub fn context(&self) -> ModifierContext {
        ModifierContext::build(&self.state, &self.content, &self.world, self.now_ms)
    }

    /// Throw the line.
    pub fn cast(&mut self) -> Notices {
        if !self.phase.is_idle() {
            return rejection(&ActionError::WrongPhase);
        }
        if self.state.stats.rod_durability <= 0.0 {
            return rejection(&ActionError::RodBroken);
        }
        if self.state.bag_full() {
            return rejection(&ActionError::CapacityExceeded("bag"));
        }
        self.state.lifetime.casts += 1;
        self.enter(Phase::Casting, CAST_SECS);
        let mut notices = Notices::new();
        notices.push(Notice::toast(NOTICE_CAST, Tone::Info));
        notices.push(Notice::Sound(SoundCue::Cast));
        notices
    }

    /// Set the hook during the bite window.
    pub fn hook(&mut self) -> Notices {
        let mut notices = Notices::new();
        let item = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Bite { item } => item,
            other => {
                self.phase = other;
                return rejection(&ActionError::WrongPhase);
            }
        };
        if item.needs_reel() {
            let attempt_id = self.next_attempt_id;
            self.next_attempt_id += 1;
            let power = self.state.rod_def(&self.content).power;
            let game = ReelingMinigame::new(attempt_id, item.rarity, item.boss, power);
            self.tick_accumulator = 0.0;
            self.enter(Phase::Minigame { item, game }, 0.0);
            notices.push(Notice::Sound(SoundCue::Reel));
        } else {
            self.land(&item, false, &mut notices);
            self.enter(Phase::Caught, RESULT_DISPLAY_SECS);
        }
        self.check_achievements(&mut notices);
        notices
    }

    /// Hold or release the reel.
    pub fn set_reeling(&mut self, reeling: bool) {
        if let Phase::Minigame { game, .. } = &mut self.phase {
            game.set_reeling(reeling);
        }
    }

    /// Tap the active target prompt.
    pub fn tap_target(&mut self) -> Notices {
        let mut notices = Notices::new();
        let Phase::Minigame { game, .. } = &mut self.phase else {
            return notices;
        };
        if !game.tap_target() {
            return notices;
        }
        notices.push(Notice::toast(NOTICE_TARGET_HIT, Tone::Success));
        if let Some(outcome) = game.outcome() {
            self.finish_minigame(outcome, &mut notices);
        }
        notices
    }

    /// Deliver one externally-timed physics tick. Stale attempt ids are ignored.
    pub fn physics_tick(&mut self, attempt_id: u64) -> Notices {
        let mut notices = Notices::new();
        if self.current_attempt_id() == Some(attempt_id) {
            self.step_minigame(&mut notices);
        }
        notices
    }

    /// Abandon the current cast and return to idle.
    pub fn cancel(&mut self) -> Notices {
        if !self.phase.is_idle() {
            log::debug!("cast cancelled during {}", self.phase.label());
        }
        self.enter(Phase::Idle, 0.0);
        self.tick_accumulator = 0.0;
        Notices::new()
    }

    /// Apply a shop/inventory action; rejections become notices.
    pub fn act(&mut self, action: &PlayerAction) -> Notices {
        if action.requires_idle() && !self.phase.is_idle() {
            return rejection(&ActionError::WrongPhase);
        }
        let mut env = ActionEnv {
            content: &self.content,
            world: &mut self.world,
            now_ms: self.now_ms,
            rng: self.rng.economy(),
        };
        match shop::apply(&mut self.state, &mut env, action) {
            Ok(mut notices) => {
                self.check_achievements(&mut notices);
                notices
            }
            Err(err) => rejection(&err),
        }
    }

    /// Advance session time by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> Notices {
        let mut notices = Notices::new();
        if !dt.is_finite() || dt <= 0.0 {
            return notices;
        }
        self.now_ms += secs_to_ms(dt);
        self.advance_world(dt, &mut notices);
        self.advance_phase(dt, &mut notices);
        notices
    }

    fn enter(&mut self, phase: Phase, remaining: f64) {
        self.phase = phase;
        self.remaining = remaining;
    }

    fn advance_phase(&mut self, dt: f64, notices: &mut Notices) {
        let mut left = dt;
        while left > 0.0 {
            match self.phase {
                Phase::Idle => break,
                Phase::Minigame { .. } => {
                    self.run_minigame(left, notices);
                    break;
                }
                _ => {
                    if self.remaining > left {
                        self.remaining -= left;
                        break;
                    }
                    left -= self.remaining;
                    self.remaining = 0.0;
                    self.expire_phase(notices);
                }
            }
        }
    }

    fn expire_phase(&mut self, notices: &mut Notices) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Casting => {
                let wait = self.bite_delay();
                self.enter(Phase::Waiting, wait);
            }
            Phase::Waiting => self.enter_bite(notices),
            Phase::Bite { item } => {
                log::debug!("bite missed: {}", item.name);
                notices.push(Notice::toast_with(
                    NOTICE_BITE_MISSED,
                    Tone::Warning,
                    item.name,
                ));
            }
            Phase::Idle
            | Phase::Minigame { .. }
            | Phase::Caught
            | Phase::Broken
            | Phase::Escaped => {}
        }
    }

    /// Wait before a bite, in seconds.
    fn bite_delay(&mut self) -> f64 {
        let ctx = self.context();
        let mut wait = WAIT_BASE_SECS + self.rng.economy().gen_range(0.0..WAIT_JITTER_SECS);
        if ctx.weather == Weather::Rain {
            wait *= WAIT_RAIN_FACTOR;
        }
        if ctx.event_is(RandomEvent::FishFrenzy) {
            wait *= WAIT_FRENZY_FACTOR;
        }
        wait *= ctx.bobber_multiplier;
        wait *= (1.0 - WAIT_PATIENCE_PER_LEVEL * f64::from(ctx.skills.patience)).max(0.0);
        wait.max(WAIT_FLOOR_SECS)
    }

    fn enter_bite(&mut self, notices: &mut Notices) {
        let ctx = self.context();
        let pool = match self.content.location(&self.state.stats.location_id) {
            Some(location) => &location.items,
            None => &self.content.starter_location().items,
        };
        let picked = select_item(pool, &ctx, &mut self.state.buffs, self.rng.selection()).cloned();
        self.consume_bait(notices);
        match picked {
            Some(item) => {
                notices.push(Notice::toast(NOTICE_BITE, Tone::Info));
                notices.push(Notice::Sound(SoundCue::Bite));
                self.enter(Phase::Bite { item }, BITE_WINDOW_SECS);
            }
            None => {
                notices.push(Notice::toast(NOTICE_NOTHING_CAUGHT, Tone::Info));
                self.enter(Phase::Idle, 0.0);
            }
        }
    }

    fn consume_bait(&mut self, notices: &mut Notices) {
        let starter = self.content.starter_bait().id.clone();
        if self.state.stats.bait_id == starter {
            return;
        }
        let uses = self
            .state
            .bait_inventory
            .entry(self.state.stats.bait_id.clone())
            .or_insert(0);
        *uses = uses.saturating_sub(1);
        if *uses == 0 {
            self.state.stats.bait_id = starter;
            notices.push(Notice::toast(NOTICE_BAIT_EMPTY, Tone::Warning));
        }
    }

    fn run_minigame(&mut self, dt: f64, notices: &mut Notices) {
        self.tick_accumulator += dt;
        while self.tick_accumulator >= TICK_SECS {
            self.tick_accumulator -= TICK_SECS;
            if self.step_minigame(notices) {
                break;
            }
        }
    }

    /// One physics step; returns whether the fight ended.
    fn step_minigame(&mut self, notices: &mut Notices) -> bool {
        let report = match &mut self.phase {
            Phase::Minigame { game, .. } => game.tick(self.rng.minigame()),
            _ => return true,
        };
        self.report_tick(report, notices)
    }

    fn report_tick(&mut self, report: TickReport, notices: &mut Notices) -> bool {
        if report.target_spawned {
            notices.push(Notice::toast(NOTICE_TARGET_SPAWN, Tone::Info));
        }
        if report.mood_changed == Some(Mood::Angry) {
            notices.push(Notice::toast(NOTICE_FISH_ANGRY, Tone::Warning));
        }
        match report.outcome {
            Some(outcome) => {
                self.finish_minigame(outcome, notices);
                true
            }
            None => false,
        }
    }

    fn finish_minigame(&mut self, outcome: ReelOutcome, notices: &mut Notices) {
        let Phase::Minigame { item, game } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };
        self.tick_accumulator = 0.0;
        log::debug!(
            "reel finished: {} {outcome:?} after {} ticks (max tension {:.1})",
            item.name,
            game.ticks(),
            game.max_tension()
        );
        match outcome {
            ReelOutcome::Caught => {
                self.land(&item, game.is_perfect(), notices);
                self.enter(Phase::Caught, RESULT_DISPLAY_SECS);
            }
            ReelOutcome::Broken => {
                self.lose(BREAK_DURABILITY_COST, ComboEvent::Broken);
                self.state.lifetime.broken_lines += 1;
                notices.push(Notice::toast_with(NOTICE_LINE_BROKE, Tone::Negative, item.name));
                notices.push(Notice::Sound(SoundCue::Snap));
                self.enter(Phase::Broken, RESULT_DISPLAY_SECS);
            }
            ReelOutcome::Escaped => {
                self.lose(ESCAPE_DURABILITY_COST, ComboEvent::Escaped);
                self.state.lifetime.escapes += 1;
                notices.push(Notice::toast_with(NOTICE_ESCAPED, Tone::Negative, item.name));
                notices.push(Notice::Sound(SoundCue::Splash));
                self.enter(Phase::Escaped, RESULT_DISPLAY_SECS);
            }
        }
        self.check_achievements(notices);
    }

    fn lose(&mut self, durability_cost: f64, event: ComboEvent) {
        self.state.stats.rod_durability =
            (self.state.stats.rod_durability - durability_cost).max(0.0);
        self.state.combo = next_combo(self.state.combo, event);
    }

    /// Outcome dispatch for a landed item.
    fn land(&mut self, item: &ItemDef, perfect: bool, notices: &mut Notices) {
        let ctx = self.context();
        if let Some(grant) = &item.grant {
            self.apply_grant(item, grant, &ctx, notices);
            return;
        }
        // The bag can fill while a cast is in flight.
        if self.state.bag_full() {
            log::warn!("bag full, dropping {}", item.name);
            notices.extend(rejection(&ActionError::CapacityExceeded("bag")));
            return;
        }
        if item.is_junk() {
            self.state.combo = next_combo(self.state.combo, ComboEvent::Junk);
            self.state.lifetime.junk += 1;
            let instance = self.new_instance(item, Variant::default(), false, &ctx);
            self.state.bag.push(instance);
            notices.push(Notice::toast_with(NOTICE_JUNK, Tone::Warning, item.name.clone()));
            notices.push(Notice::Sound(SoundCue::Splash));
            return;
        }

        let variant = roll_variant(self.rng.economy());
        let instance = self.new_instance(item, variant, perfect, &ctx);
        let value = instance.value;
        let weight = instance.weight;
        self.state.record_pedia(&instance);
        self.state.bag.push(instance);
        self.record_landing(item, perfect, variant);

        let toast_key = if variant.golden {
            NOTICE_CAUGHT_GOLDEN
        } else if variant.shiny {
            NOTICE_CAUGHT_SHINY
        } else {
            NOTICE_CAUGHT
        };
        notices.push(Notice::toast_with(toast_key, Tone::Success, item.name.clone()));
        if perfect {
            notices.push(Notice::toast(NOTICE_CAUGHT_PERFECT, Tone::Success));
            notices.push(Notice::floating("PERFECT!"));
        }
        notices.push(Notice::floating(format!("{weight:.2} kg")));
        notices.push(Notice::Sound(if item.boss {
            SoundCue::Fanfare
        } else {
            SoundCue::Catch
        }));

        let xp = experience(item.rarity, perfect, &ctx);
        self.award_experience(xp, notices);
        self.progress_quests(item, notices);
        self.pay_bounty(&item.name, weight, notices);
        if let Some(tournament) = self.world.tournament.as_mut() {
            tournament.score = tournament.score.saturating_add(value);
        }
        self.try_double_hook(item, &ctx, notices);
    }

    fn record_landing(&mut self, item: &ItemDef, perfect: bool, variant: Variant) {
        let lifetime = &mut self.state.lifetime;
        lifetime.catches += 1;
        lifetime.perfect += u64::from(perfect);
        lifetime.golden += u64::from(variant.golden);
        lifetime.shiny += u64::from(variant.shiny);
        lifetime.bosses += u64::from(item.boss);
        let rod_id = self.state.stats.rod_id.clone();
        *self.state.rod_mastery.entry(rod_id).or_insert(0) += 1;
        self.state.combo = next_combo(self.state.combo, ComboEvent::Landed);
        self.state.lifetime.best_combo = self.state.lifetime.best_combo.max(self.state.combo);
    }

    fn new_instance(
        &mut self,
        item: &ItemDef,
        variant: Variant,
        perfect: bool,
        ctx: &ModifierContext,
    ) -> CaughtItem {
        let weight = catch_weight(ctx, self.rng.economy());
        let value = if item.is_junk() {
            item.value
        } else {
            catch_value(item.value, variant, perfect, self.state.pedia_count(&item.name))
        };
        CaughtItem {
            id: self.state.allocate_item_id(),
            name: item.name.clone(),
            category: item.category,
            rarity: item.rarity,
            boss: item.boss,
            weight,
            value,
            shiny: variant.shiny,
            golden: variant.golden,
            perfect,
            location_index: ctx.location_index,
            caught_at_ms: self.now_ms,
        }
    }

    fn try_double_hook(&mut self, item: &ItemDef, ctx: &ModifierContext, notices: &mut Notices) {
        let level = ctx.skills.double_hook;
        if level == 0 {
            return;
        }
        let chance = DOUBLE_HOOK_PER_LEVEL * f64::from(level);
        if self.rng.economy().r#gen::<f64>() >= chance {
            return;
        }
        if self.state.bag_full() {
            notices.push(Notice::toast_with(
                NOTICE_DOUBLE_HOOK_LOST,
                Tone::Warning,
                item.name.clone(),
            ));
            return;
        }
        let variant = roll_variant(self.rng.economy());
        let instance = self.new_instance(item, variant, false, ctx);
        self.state.record_pedia(&instance);
        self.state.bag.push(instance);
        self.state.lifetime.catches += 1;
        notices.push(Notice::toast_with(
            NOTICE_DOUBLE_HOOK,
            Tone::Success,
            item.name.clone(),
        ));
    }

    fn apply_grant(
        &mut self,
        item: &ItemDef,
        grant: &Grant,
        ctx: &ModifierContext,
        notices: &mut Notices,
    ) {
        match grant {
            Grant::GoldenHook => self.state.buffs.golden_hook = true,
            Grant::XpBoost { minutes } => {
                let base = self
                    .state
                    .buffs
                    .xp_boost_until_ms
                    .unwrap_or(self.now_ms)
                    .max(self.now_ms);
                self.state.buffs.xp_boost_until_ms = Some(base + minutes * MS_PER_MINUTE);
            }
            Grant::Charm { id } => {
                self.state.charms.insert(id.clone());
            }
            Grant::Bait { id, uses } => {
                *self.state.bait_inventory.entry(id.clone()).or_insert(0) += uses;
            }
            Grant::MapPart => {
                self.state.treasure_map_parts += 1;
                if self.state.treasure_map_parts >= TREASURE_MAP_PARTS {
                    self.state.treasure_map_parts = 0;
                    credit(&mut self.state, TREASURE_MAP_REWARD, notices);
                    notices.push(Notice::toast_with(
                        NOTICE_TREASURE_MAP,
                        Tone::Success,
                        TREASURE_MAP_REWARD.to_string(),
                    ));
                }
            }
        }
        self.state.lifetime.catches += 1;
        self.state.combo = next_combo(self.state.combo, ComboEvent::Landed);
        self.state.lifetime.best_combo = self.state.lifetime.best_combo.max(self.state.combo);
        notices.push(Notice::toast_with(NOTICE_GRANT, Tone::Success, item.name.clone()));
        notices.push(Notice::Sound(SoundCue::Fanfare));
        let xp = experience(item.rarity, false, ctx);
        self.award_experience(xp, notices);
        self.progress_quests(item, notices);
    }

    fn award_experience(&mut self, xp: u64, notices: &mut Notices) {
        notices.push(Notice::floating(format!("+{xp} XP")));
        let ups = grant_experience(&mut self.state.stats, xp);
        level_up_notices(&ups.levels, notices);
    }

    fn progress_quests(&mut self, item: &ItemDef, notices: &mut Notices) {
        let location_id = self.state.stats.location_id.clone();
        let event = QuestEvent::Catch {
            rarity: item.rarity,
            junk: item.is_junk(),
            location_id: &location_id,
        };
        for quest_id in record_progress(&mut self.state.quests, event) {
            notices.push(Notice::toast_with(
                NOTICE_QUEST_DONE,
                Tone::Success,
                quest_id.to_string(),
            ));
        }
        if self.state.quests.is_empty() && self.state.quest_cooldown > 0 {
            self.state.quest_cooldown -= 1;
            if self.state.quest_cooldown == 0 {
                let unlocked: Vec<String> = self.state.unlocked_locations.iter().cloned().collect();
                self.state.quests = generate_quests(
                    self.state.stats.level,
                    &unlocked,
                    &mut self.state.next_quest_id,
                    self.rng.economy(),
                );
            }
        }
    }

    fn pay_bounty(&mut self, name: &str, weight: f64, notices: &mut Notices) {
        let Some(bounty) = self.world.bounty.as_mut() else {
            return;
        };
        if !bounty.qualifies(name, weight) {
            return;
        }
        bounty.paid = true;
        let reward = bounty.reward;
        credit(&mut self.state, reward, notices);
        notices.push(Notice::toast_with(
            NOTICE_BOUNTY_PAID,
            Tone::Success,
            reward.to_string(),
        ));
        notices.push(Notice::Sound(SoundCue::Coins));
    }

    fn check_achievements(&mut self, notices: &mut Notices) {
        for id in achievements::evaluate(&mut self.state) {
            log::info!("achievement unlocked: {id}");
            notices.push(Notice::toast_with(NOTICE_ACHIEVEMENT, Tone::Success, id));
        }
    }

    fn advance_world(&mut self, dt: f64, notices: &mut Notices) {
        for expiry in self.world.tick(dt) {
            match expiry {
                WorldExpiry::EventEnded(kind) => notices.push(Notice::toast_with(
                    NOTICE_EVENT_END,
                    Tone::Info,
                    kind.as_str(),
                )),
                WorldExpiry::TournamentEnded(tournament) => {
                    if tournament.won() {
                        credit(&mut self.state, tournament.reward, notices);
                        notices.push(Notice::toast_with(
                            NOTICE_TOURNAMENT_WON,
                            Tone::Success,
                            tournament.reward.to_string(),
                        ));
                    } else {
                        notices.push(Notice::toast(NOTICE_TOURNAMENT_LOST, Tone::Negative));
                    }
                }
            }
        }
        self.expire_buffs(notices);
        for task in self.scheduler.advance(dt) {
            self.run_task(task, notices);
        }
    }

    fn expire_buffs(&mut self, notices: &mut Notices) {
        let now = self.now_ms;
        if self
            .state
            .buffs
            .xp_boost_until_ms
            .is_some_and(|until| until <= now)
        {
            self.state.buffs.xp_boost_until_ms = None;
            notices.push(Notice::toast_with(NOTICE_BUFF_EXPIRED, Tone::Info, "xp_boost"));
        }
        if self.state.filter_boost_until_ms.is_some_and(|until| until <= now) {
            self.state.filter_boost_until_ms = None;
            notices.push(Notice::toast_with(
                NOTICE_BUFF_EXPIRED,
                Tone::Info,
                "filter_boost",
            ));
        }
    }

    fn run_task(&mut self, task: WorldTask, notices: &mut Notices) {
        match task {
            WorldTask::BankInterest => {
                let interest = bank_interest(self.state.stats.banked, 1.0);
                self.state.stats.banked = self.state.stats.banked.saturating_add(interest);
            }
            WorldTask::AquariumIncome => {
                let filter = self
                    .state
                    .filter_boost_until_ms
                    .is_some_and(|until| until > self.now_ms);
                let income = aquarium_income(&self.state.aquarium, 1.0, filter);
                credit(&mut self.state, income, notices);
            }
            WorldTask::MarketRotation => {
                self.world.market.rotate(&self.content, self.rng.world());
                let trending = self.world.market.trending.clone().unwrap_or_default();
                notices.push(Notice::toast_with(NOTICE_MARKET, Tone::Info, trending));
            }
            WorldTask::WeatherRotation => {
                let next = Weather::roll(self.rng.world());
                if next != self.world.weather {
                    self.world.weather = next;
                    notices.push(Notice::toast_with(
                        NOTICE_WEATHER,
                        Tone::Info,
                        next.i18n_key(),
                    ));
                }
            }
            WorldTask::RandomEvent => {
                if self.rng.world().r#gen::<f64>() < EVENT_CHANCE {
                    if let Some(kind) = self.world.roll_event(self.rng.world()) {
                        log::info!("random event started: {}", kind.as_str());
                        notices.push(Notice::toast_with(
                            NOTICE_EVENT_START,
                            Tone::Info,
                            kind.as_str(),
                        ));
                    }
                }
            }
            WorldTask::SupplyCrate => {
                if self.rng.world().r#gen::<f64>() < CRATE_CHANCE {
                    self.open_supply_crate(notices);
                }
            }
            WorldTask::VisitorTip => {
                if self.rng.world().r#gen::<f64>() < TIP_CHANCE {
                    let tip = TIP_MONEY_PER_LEVEL * u64::from(self.state.stats.level);
                    credit(&mut self.state, tip, notices);
                    notices.push(Notice::toast_with(
                        NOTICE_VISITOR_TIP,
                        Tone::Success,
                        tip.to_string(),
                    ));
                }
            }
            WorldTask::BountyReroll => {
                let unlocked = &self.state.unlocked_locations;
                self.world.bounty = Bounty::roll(
                    &self.content,
                    |id| unlocked.contains(id),
                    self.rng.world(),
                );
            }
        }
    }

    fn open_supply_crate(&mut self, notices: &mut Notices) {
        let baits: Vec<&str> = self
            .content
            .baits
            .iter()
            .filter(|bait| bait.price > 0)
            .map(|bait| bait.id.as_str())
            .collect();
        let rng = self.rng.world();
        if !baits.is_empty() && rng.gen_bool(0.5) {
            let id = baits[rng.gen_range(0..baits.len())].to_string();
            *self.state.bait_inventory.entry(id.clone()).or_insert(0) += CRATE_BAIT_USES;
            notices.push(Notice::toast_with(NOTICE_SUPPLY_CRATE, Tone::Success, id));
        } else {
            let money = CRATE_MONEY_PER_LEVEL * u64::from(self.state.stats.level);
            credit(&mut self.state, money, notices);
            notices.push(Notice::toast_with(
                NOTICE_SUPPLY_CRATE,
                Tone::Success,
                money.to_string(),
            ));
        }
    }
}

fn rejection(err: &ActionError) -> Notices {
    log::debug!("action rejected: {err}");
    let mut notices = Notices::new();
    notices.push(Notice::toast_with(NOTICE_REJECTED, Tone::Negative, err.to_string()));
    notices.push(Notice::Sound(SoundCue::Error));
    notices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ItemCategory, Location, SkillId};
    use crate::notice::has_toast;
    use crate::world::ActiveEvent;

    fn single_item_content(item: ItemDef) -> ContentTables {
        let mut content = ContentTables::load_from_static();
        content.locations = vec![Location {
            id: String::from("pond"),
            name: String::from("Test Pond"),
            unlock_cost: 0,
            min_level: 1,
            items: vec![item],
        }];
        content
    }

    fn fish(name: &str, rarity: u8) -> ItemDef {
        ItemDef {
            name: name.to_string(),
            category: ItemCategory::Fish,
            value: 20,
            rarity,
            payload: String::new(),
            boss: false,
            instant: false,
            grant: None,
        }
    }

    fn session_with(item: ItemDef) -> FishingSession {
        let content = single_item_content(item);
        let state = GameState::new(&content, 0);
        FishingSession::new(content, state, 11, 0)
    }

    /// Advance in small steps until the phase label matches.
    fn run_until(session: &mut FishingSession, label: &str) -> Notices {
        let mut all = Notices::new();
        for _ in 0..2_000 {
            if session.phase().label() == label {
                return all;
            }
            all.extend(session.advance(0.05));
        }
        panic!("never reached {label}, stuck in {}", session.phase().label());
    }

    /// Reel in bursts, releasing whenever tension climbs.
    fn pulse_reel(session: &mut FishingSession) -> Notices {
        let mut all = Notices::new();
        while let Some(game) = session.minigame() {
            let reel = game.tension() < 40.0;
            session.set_reeling(reel);
            all.extend(session.advance(TICK_SECS));
        }
        all
    }

    #[test]
    fn cast_is_rejected_with_broken_rod() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| s.stats.rod_durability = 0.0);
        let notices = session.cast();
        assert!(has_toast(&notices, NOTICE_REJECTED));
        assert!(session.phase().is_idle());
    }

    #[test]
    fn cast_is_rejected_with_full_bag() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| s.stats.bag_capacity = 0);
        assert!(has_toast(&session.cast(), NOTICE_REJECTED));
        assert!(session.phase().is_idle());
    }

    #[test]
    fn missed_bite_returns_to_idle_without_combo_reset() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| s.combo = 3);
        session.cast();
        run_until(&mut session, "bite");
        let notices = session.advance(BITE_WINDOW_SECS + 0.1);
        assert!(has_toast(&notices, NOTICE_BITE_MISSED));
        assert!(session.phase().is_idle());
        assert_eq!(session.state().combo, 3);
    }

    #[test]
    fn junk_resolves_on_hook_and_resets_combo() {
        let mut junk = fish("Old Boot", 1);
        junk.category = ItemCategory::Junk;
        let mut session = session_with(junk);
        session.with_state_mut(|s| s.combo = 4);
        session.cast();
        run_until(&mut session, "bite");
        let notices = session.hook();
        assert!(has_toast(&notices, NOTICE_JUNK));
        assert_eq!(session.phase().label(), "caught");
        assert_eq!(session.state().combo, 0);
        assert_eq!(session.state().bag.len(), 1);
        run_until(&mut session, "idle");
    }

    #[test]
    fn reeling_lands_fish_and_updates_progress() {
        let mut session = session_with(fish("Bluegill", 1));
        session.cast();
        run_until(&mut session, "bite");
        session.hook();
        assert_eq!(session.phase().label(), "minigame");
        let notices = pulse_reel(&mut session);
        assert_eq!(session.phase().label(), "caught");
        assert!(
            has_toast(&notices, NOTICE_CAUGHT)
                || has_toast(&notices, NOTICE_CAUGHT_GOLDEN)
                || has_toast(&notices, NOTICE_CAUGHT_SHINY)
        );
        let state = session.state();
        assert_eq!(state.bag.len(), 1);
        assert_eq!(state.combo, 1);
        assert_eq!(state.lifetime.catches, 1);
        assert_eq!(state.pedia_count("Bluegill"), 1);
        assert_eq!(state.mastery("bamboo"), 1);
        assert!(state.achievements.contains("first_catch"));
        assert_eq!(state.quests[0].progress, 1);
    }

    #[test]
    fn escape_costs_durability_and_resets_combo() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| s.combo = 2);
        session.cast();
        run_until(&mut session, "bite");
        session.hook();
        session.set_reeling(false);
        let notices = run_until(&mut session, "escaped");
        assert!(has_toast(&notices, NOTICE_ESCAPED));
        assert_eq!(session.state().combo, 0);
        assert!((session.state().stats.rod_durability - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stale_physics_ticks_are_ignored() {
        let mut session = session_with(fish("Bluegill", 1));
        session.cast();
        run_until(&mut session, "bite");
        session.hook();
        let attempt = session.current_attempt_id().unwrap();
        session.physics_tick(attempt);
        assert_eq!(session.minigame().unwrap().ticks(), 1);
        session.physics_tick(attempt + 1);
        assert_eq!(session.minigame().unwrap().ticks(), 1);
        session.cancel();
        assert!(session.phase().is_idle());
        assert!(session.physics_tick(attempt).is_empty());
    }

    #[test]
    fn requires_idle_actions_are_rejected_mid_cast() {
        let mut session = session_with(fish("Bluegill", 1));
        session.cast();
        let notices = session.act(&PlayerAction::RepairRod);
        assert!(has_toast(&notices, NOTICE_REJECTED));
        assert_eq!(session.phase().label(), "casting");
    }

    #[test]
    fn bag_filled_mid_cast_drops_the_catch_untouched() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| {
            s.stats.bag_capacity = 1;
            s.combo = 2;
            let id = s.allocate_item_id();
            s.aquarium.push(CaughtItem {
                id,
                name: String::from("Koi"),
                category: ItemCategory::Fish,
                rarity: 2,
                boss: false,
                weight: 3.0,
                value: 40,
                shiny: false,
                golden: false,
                perfect: false,
                location_index: 0,
                caught_at_ms: 0,
            });
        });
        session.cast();
        let item_id = session.state().aquarium[0].id;
        let moved = session.act(&PlayerAction::MoveToBag { item_id });
        assert!(!has_toast(&moved, NOTICE_REJECTED));
        assert!(session.state().bag_full());
        run_until(&mut session, "bite");
        session.hook();
        let notices = pulse_reel(&mut session);

        assert_eq!(session.phase().label(), "caught");
        assert!(has_toast(&notices, NOTICE_REJECTED));
        let state = session.state();
        assert_eq!(state.bag.len(), 1);
        assert_eq!(state.bag[0].name, "Koi");
        assert_eq!(state.lifetime.catches, 0);
        assert_eq!(state.pedia_count("Bluegill"), 0);
        assert_eq!(state.mastery("bamboo"), 0);
        assert_eq!(state.combo, 2);
        assert_eq!(state.stats.xp, 0);
    }

    #[test]
    fn double_hook_adds_a_second_catch_when_room_remains() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| {
            s.skills.insert(SkillId::DoubleHook, 20);
        });
        session.cast();
        run_until(&mut session, "bite");
        session.hook();
        let notices = pulse_reel(&mut session);
        assert!(has_toast(&notices, NOTICE_DOUBLE_HOOK));
        let state = session.state();
        assert_eq!(state.bag.len(), 2);
        assert_ne!(state.bag[0].id, state.bag[1].id);
        assert_eq!(state.lifetime.catches, 2);
        assert_eq!(state.pedia_count("Bluegill"), 2);
    }

    #[test]
    fn double_hook_into_last_slot_is_announced_and_dropped() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| {
            s.skills.insert(SkillId::DoubleHook, 20);
            s.stats.bag_capacity = 1;
        });
        session.cast();
        run_until(&mut session, "bite");
        session.hook();
        let notices = pulse_reel(&mut session);
        assert!(has_toast(&notices, NOTICE_DOUBLE_HOOK_LOST));
        assert!(!has_toast(&notices, NOTICE_DOUBLE_HOOK));
        let state = session.state();
        assert_eq!(state.bag.len(), 1);
        assert_eq!(state.lifetime.catches, 1);
    }

    #[test]
    fn fish_frenzy_halves_the_bite_delay() {
        let mut calm = session_with(fish("Bluegill", 1));
        let mut frenzy = session_with(fish("Bluegill", 1));
        frenzy.world_mut().event = Some(ActiveEvent {
            kind: RandomEvent::FishFrenzy,
            remaining_secs: 60.0,
        });
        let base = calm.bite_delay();
        let fast = frenzy.bite_delay();
        assert!(base >= WAIT_BASE_SECS * WAIT_RAIN_FACTOR);
        assert!((fast - base * WAIT_FRENZY_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn golden_hook_grant_sets_buff() {
        let mut hook = fish("Golden Hook", 3);
        hook.category = ItemCategory::Buff;
        hook.instant = true;
        hook.grant = Some(Grant::GoldenHook);
        let mut session = session_with(hook);
        session.cast();
        run_until(&mut session, "bite");
        let notices = session.hook();
        assert!(has_toast(&notices, NOTICE_GRANT));
        assert!(session.state().buffs.golden_hook);
        assert!(session.state().bag.is_empty());
    }

    #[test]
    fn scheduler_pays_interest_each_minute() {
        let mut session = session_with(fish("Bluegill", 1));
        session.with_state_mut(|s| s.stats.banked = 100_000);
        session.advance(60.0);
        assert_eq!(session.state().stats.banked, 100_100);
    }

    #[test]
    fn tournament_pays_when_target_reached() {
        let mut session = session_with(fish("Bluegill", 1));
        session.act(&PlayerAction::EnterTournament);
        let reward = {
            let tournament = session.world_mut().tournament.as_mut().unwrap();
            tournament.score = tournament.target;
            tournament.reward
        };
        let money = session.state().stats.money;
        let notices = session.advance(crate::constants::TOURNAMENT_DURATION_SECS + 1.0);
        assert!(has_toast(&notices, NOTICE_TOURNAMENT_WON));
        assert!(session.state().stats.money >= money + reward);
    }
}
