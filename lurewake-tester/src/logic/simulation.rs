use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use lurewake_game::{
    FishingSession, GameEngine, GameState, LoadOutcome, MemoryStorage, Notice, Phase,
    SaveStorage, StaticContent, TICK_SECS,
};
use serde::Serialize;

use super::policy::{AnglerPolicy, AnglerStrategy};
use crate::storage::FileStorage;

/// Physics and timer steps allowed for one cast before it counts as stuck.
const MAX_STEPS_PER_CAST: usize = 50_000;
/// Step used while waiting on casting and bite timers.
const IDLE_STEP_SECS: f64 = 0.1;

const TOAST_BITE_MISSED: &str = "toast.bite.missed";
const TOAST_REJECTED: &str = "toast.rejected";
const TOAST_TARGET_HIT: &str = "toast.target.hit";
const TOAST_DOUBLE_HOOK: &str = "toast.double-hook";

/// What to run and how to judge it.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: AnglerStrategy,
    pub casts: usize,
    pub setup: Option<fn(&mut GameState)>,
    /// Save, resume and compare every N casts.
    pub save_every: Option<usize>,
    /// Run the seed a second time and require an identical outcome.
    pub verify_replay: bool,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: AnglerStrategy) -> Self {
        Self {
            strategy,
            casts: 100,
            setup: None,
            save_every: None,
            verify_replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_casts(mut self, casts: usize) -> Self {
        self.casts = casts;
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut GameState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_save_every(mut self, casts: usize) -> Self {
        self.save_every = Some(casts.max(1));
        self
    }

    #[must_use]
    pub const fn with_replay_check(mut self) -> Self {
        self.verify_replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Counters gathered while driving a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub casts_attempted: usize,
    pub casts_blocked: usize,
    pub bites_missed: usize,
    pub targets_hit: usize,
    pub double_hooks: usize,
    pub rejected_actions: usize,
    pub saves: usize,
    pub resumes: usize,
    pub steps: u64,
    pub sim_seconds: f64,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: AnglerStrategy,
    pub metrics: SessionMetrics,
    pub violations: Vec<String>,
    pub final_state: GameState,
    pub rng_draws: [u64; 4],
}

impl SimulationSummary {
    /// Share of attempted casts that landed something other than junk.
    #[must_use]
    pub fn catch_rate(&self) -> f64 {
        if self.metrics.casts_attempted == 0 {
            return 0.0;
        }
        let fish = self
            .final_state
            .lifetime
            .catches
            .saturating_sub(self.final_state.lifetime.junk);
        #[allow(clippy::cast_precision_loss)]
        let rate = fish as f64 / self.metrics.casts_attempted as f64;
        rate
    }
}

/// Drives fishing sessions with automated anglers.
#[derive(Debug, Clone, Default)]
pub struct AnglerSimulator {
    verbose: bool,
    save_dir: Option<PathBuf>,
}

impl AnglerSimulator {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            save_dir: None,
        }
    }

    /// Persist save round trips to `dir` instead of memory.
    #[must_use]
    pub fn with_save_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.save_dir = dir;
        self
    }

    /// Run `plan` once with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content fails to load or the save directory
    /// cannot be prepared.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut summary = self.run_once(plan, seed)?;
        if plan.verify_replay {
            let replay = self.run_once(plan, seed)?;
            if replay.final_state != summary.final_state {
                summary
                    .violations
                    .push(String::from("replay produced a different final state"));
            }
            if replay.metrics != summary.metrics {
                summary
                    .violations
                    .push(String::from("replay produced different metrics"));
            }
            if replay.rng_draws != summary.rng_draws {
                summary.violations.push(format!(
                    "replay consumed {:?} draws, first run {:?}",
                    replay.rng_draws, summary.rng_draws
                ));
            }
        }
        Ok(summary)
    }

    fn run_once(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        if let Some(dir) = &self.save_dir {
            let storage = FileStorage::new(dir.join(format!("seed-{seed}")))
                .with_context(|| format!("failed to prepare save dir {}", dir.display()))?;
            log::debug!("seed {seed} saves under {}", storage.dir().display());
            self.run_with(&GameEngine::new(StaticContent, storage), plan, seed)
        } else {
            self.run_with(
                &GameEngine::new(StaticContent, MemoryStorage::new()),
                plan,
                seed,
            )
        }
    }

    fn run_with<S: SaveStorage>(
        &self,
        engine: &GameEngine<StaticContent, S>,
        plan: &SimulationPlan,
        seed: u64,
    ) -> Result<SimulationSummary> {
        let mut session = engine.new_session(seed, 0)?;
        if let Some(setup) = plan.setup {
            session.with_state_mut(setup);
        }
        let mut policy = plan.strategy.create_policy(seed);
        let mut metrics = SessionMetrics::default();
        let mut violations = Vec::new();

        if self.verbose {
            println!(
                "🎣 Starting simulation | seed:{seed} policy:{} casts:{}",
                policy.name(),
                plan.casts
            );
        }

        for cast in 1..=plan.casts {
            run_errands(&mut session, policy.as_mut(), &mut metrics);

            tally(&session.cast(), &mut metrics);
            metrics.casts_attempted += 1;
            if session.phase().is_idle() {
                metrics.casts_blocked += 1;
            } else if let Err(err) = drive_cast(&mut session, policy.as_mut(), &mut metrics) {
                violations.push(format!("cast {cast}: {err}"));
                break;
            } else {
                violations.extend(
                    check_invariants(&session)
                        .into_iter()
                        .map(|v| format!("cast {cast}: {v}")),
                );
            }

            if plan.save_every.is_some_and(|every| cast % every == 0) {
                if let Err(err) = save_round_trip(engine, &mut session, seed, &mut metrics) {
                    violations.push(format!("cast {cast}: {err}"));
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let elapsed = session.now_ms() as f64 / 1_000.0;
        metrics.sim_seconds = elapsed;
        let rng_draws = session.rng().draws();
        let final_state = session.into_state();

        if self.verbose {
            println!(
                "📊 Final | level:{} money:{} catches:{} broken:{} escapes:{}",
                final_state.stats.level,
                final_state.stats.money,
                final_state.lifetime.catches,
                final_state.lifetime.broken_lines,
                final_state.lifetime.escapes
            );
        }

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            metrics,
            violations,
            final_state,
            rng_draws,
        })
    }
}

fn tally(notices: &[Notice], metrics: &mut SessionMetrics) {
    for key in notices.iter().filter_map(Notice::key) {
        match key {
            TOAST_BITE_MISSED => metrics.bites_missed += 1,
            TOAST_REJECTED => metrics.rejected_actions += 1,
            TOAST_TARGET_HIT => metrics.targets_hit += 1,
            TOAST_DOUBLE_HOOK => metrics.double_hooks += 1,
            _ => {}
        }
    }
}

fn run_errands(
    session: &mut FishingSession,
    policy: &mut (dyn AnglerPolicy + Send),
    metrics: &mut SessionMetrics,
) {
    let actions = policy.errands(session.state(), session.content());
    for action in &actions {
        let notices = session.act(action);
        tally(&notices, metrics);
        log::trace!("{} ran {action:?}", policy.name());
    }
}

/// Play one cast back to idle.
fn drive_cast(
    session: &mut FishingSession,
    policy: &mut (dyn AnglerPolicy + Send),
    metrics: &mut SessionMetrics,
) -> Result<(), String> {
    for _ in 0..MAX_STEPS_PER_CAST {
        metrics.steps += 1;
        if let Some(game) = session.minigame() {
            let reel = policy.reel(game);
            let tap = game.target().is_some() && policy.tap_target(game);
            session.set_reeling(reel);
            if tap {
                tally(&session.tap_target(), metrics);
            }
            tally(&session.advance(TICK_SECS), metrics);
            continue;
        }
        match session.phase() {
            Phase::Idle => return Ok(()),
            Phase::Bite { .. } if policy.hook_bite() => tally(&session.hook(), metrics),
            _ => tally(&session.advance(IDLE_STEP_SECS), metrics),
        }
    }
    Err(format!("cast never settled, stuck in {}", session.phase().label()))
}

fn save_round_trip<S: SaveStorage>(
    engine: &GameEngine<StaticContent, S>,
    session: &mut FishingSession,
    seed: u64,
    metrics: &mut SessionMetrics,
) -> Result<()> {
    if !engine.save_session(session) {
        return Err(anyhow!("save was not written"));
    }
    metrics.saves += 1;
    let (resumed, outcome) = engine.resume_session(seed, session.now_ms())?;
    metrics.resumes += 1;
    if !matches!(outcome, LoadOutcome::Restored { income: 0, .. }) {
        return Err(anyhow!("unexpected load outcome {outcome:?}"));
    }
    if resumed.state() != session.state() {
        return Err(anyhow!("resumed state differs from the saved session"));
    }
    Ok(())
}

/// Structural invariants that must hold whenever the session is idle.
fn check_invariants(session: &FishingSession) -> Vec<String> {
    let state = session.state();
    let mut violations = Vec::new();
    if state.bag.len() > state.stats.bag_capacity as usize {
        violations.push(format!(
            "bag holds {} of {}",
            state.bag.len(),
            state.stats.bag_capacity
        ));
    }
    if state.aquarium.len() > state.stats.aquarium_capacity as usize {
        violations.push(format!(
            "aquarium holds {} of {}",
            state.aquarium.len(),
            state.stats.aquarium_capacity
        ));
    }
    let max = state.rod_def(session.content()).max_durability;
    if !(0.0..=max).contains(&state.stats.rod_durability) {
        violations.push(format!(
            "durability {} outside 0..={max}",
            state.stats.rod_durability
        ));
    }
    let mut ids = HashSet::new();
    for item in state.bag.iter().chain(&state.aquarium) {
        if !ids.insert(item.id) {
            violations.push(format!("duplicate item id {}", item.id));
        }
        if item.id >= state.next_item_id {
            violations.push(format!("item id {} not yet allocated", item.id));
        }
        if item.weight < 1.0 {
            violations.push(format!("{} weighs {}", item.name, item.weight));
        }
    }
    if state.combo > state.lifetime.best_combo {
        violations.push(format!(
            "combo {} above best {}",
            state.combo, state.lifetime.best_combo
        ));
    }
    if !session.phase().is_idle() {
        violations.push(format!("phase {} after settle", session.phase().label()));
    }
    violations
}
