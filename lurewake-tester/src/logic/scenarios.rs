use anyhow::{Result, ensure};

use super::policy::AnglerStrategy;
use super::simulation::{SimulationPlan, SimulationSummary};

/// Named simulation run selectable from the command line.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(
        name: impl Into<String>,
        description: &'static str,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            plan,
        }
    }
}

fn no_violations(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "{} invariant violations, first: {}",
        summary.violations.len(),
        summary.violations[0]
    );
    Ok(())
}

fn lands_fish(summary: &SimulationSummary) -> Result<()> {
    let lifetime = &summary.final_state.lifetime;
    ensure!(
        lifetime.catches > lifetime.junk,
        "only junk landed ({} catches, {} junk)",
        lifetime.catches,
        lifetime.junk
    );
    Ok(())
}

fn earns_money(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state.lifetime.money_earned > 0,
        "no money earned"
    );
    Ok(())
}

fn never_blocked(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.metrics.casts_blocked == 0,
        "{} casts were blocked",
        summary.metrics.casts_blocked
    );
    Ok(())
}

/// Every scenario the tester knows, in listing order.
#[must_use]
pub fn catalog() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "smoke",
            "Short careful session, lands fish without invariant breaks",
            SimulationPlan::new(AnglerStrategy::Careful)
                .with_casts(50)
                .with_expectation(no_violations)
                .with_expectation(lands_fish),
        ),
        TestScenario::simulation(
            "casual-soak",
            "Long session of hold-and-release reeling",
            SimulationPlan::new(AnglerStrategy::Casual)
                .with_casts(400)
                .with_expectation(no_violations)
                .with_expectation(earns_money)
                .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                    ensure!(
                        summary.final_state.stats.level >= 3,
                        "stuck at level {}",
                        summary.final_state.stats.level
                    );
                    Ok(())
                }),
        ),
        TestScenario::simulation(
            "reckless-soak",
            "Random inputs: missed bites, snapped lines, stray taps",
            SimulationPlan::new(AnglerStrategy::Reckless)
                .with_casts(300)
                .with_expectation(no_violations),
        ),
        TestScenario::simulation(
            "economy",
            "Collector reinvests earnings into rods, waters and skills",
            SimulationPlan::new(AnglerStrategy::Collector)
                .with_casts(600)
                .with_expectation(no_violations)
                .with_expectation(earns_money)
                .with_expectation(lands_fish),
        ),
        TestScenario::simulation(
            "save-roundtrip",
            "Save and resume every 20 casts; resumed state must match",
            SimulationPlan::new(AnglerStrategy::Careful)
                .with_casts(120)
                .with_save_every(20)
                .with_expectation(no_violations)
                .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                    ensure!(
                        summary.metrics.resumes == 6,
                        "expected 6 resumes, saw {}",
                        summary.metrics.resumes
                    );
                    Ok(())
                }),
        ),
        TestScenario::simulation(
            "determinism",
            "Same seed twice yields identical state and random draws",
            SimulationPlan::new(AnglerStrategy::Reckless)
                .with_casts(150)
                .with_replay_check()
                .with_expectation(no_violations),
        ),
        TestScenario::simulation(
            "broken-rod",
            "Session starts with a snapped rod and cash for repairs",
            SimulationPlan::new(AnglerStrategy::Casual)
                .with_casts(30)
                .with_setup(|state| {
                    state.stats.rod_durability = 0.0;
                    state.stats.money = 1_000;
                })
                .with_expectation(no_violations)
                .with_expectation(never_blocked),
        ),
    ]
}

/// Look up a scenario by name.
#[must_use]
pub fn find_scenario(name: &str) -> Option<TestScenario> {
    catalog().into_iter().find(|scenario| scenario.name == name)
}

#[must_use]
pub fn list_scenarios() -> Vec<(String, &'static str)> {
    catalog()
        .into_iter()
        .map(|scenario| (scenario.name, scenario.description))
        .collect()
}

/// Expand `all` into every catalog entry, keeping other names in order.
#[must_use]
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = names.iter().filter(|n| *n != "all").cloned().collect();
    if names.iter().any(|n| n == "all") {
        for (name, _) in list_scenarios() {
            if !expanded.contains(&name) {
                expanded.push(name);
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let names: Vec<_> = list_scenarios().into_iter().map(|(name, _)| name).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert!(find_scenario("smoke").is_some());
        assert!(find_scenario("nope").is_none());
    }

    #[test]
    fn all_expands_to_catalog() {
        let expanded = expand_scenarios(&[String::from("economy"), String::from("all")]);
        assert_eq!(expanded[0], "economy");
        assert_eq!(expanded.len(), catalog().len());
    }
}
