use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = (passed as f64 / results.len() as f64) * 100.0;
    rate
}

pub fn generate_console_report<W: Write + ?Sized>(
    w: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(w, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(w, "Total scenarios: {total_tests}")?;
    writeln!(w, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(w, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(w, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(w, "Total time: {total_duration:?}")?;
    writeln!(w)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            w,
            "{} {} [{} seed {}]",
            status,
            result.scenario_name.bold(),
            result.strategy,
            result.seed
        )?;
        writeln!(
            w,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(w, "   Catch rate: {:.2} per cast", result.catch_rate())?;
        writeln!(w, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(w, "   Failures:")?;
            for failure in &result.failures {
                writeln!(w, "     • {}", failure.red())?;
            }
        }
        writeln!(w)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(w, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(w, "{}", "=====================".yellow())?;
        writeln!(
            w,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            w,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    w: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, results)?;
    writeln!(w)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    w: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(w, "# Lurewake Logic Test Results\n")?;
    writeln!(
        w,
        "_Generated {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();

    writeln!(w, "## Summary\n")?;
    writeln!(w, "- **Total scenarios**: {total_tests}")?;
    writeln!(w, "- **Passed**: {passed_tests}")?;
    writeln!(w, "- **Failed**: {}", total_tests - passed_tests)?;
    writeln!(w, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(w, "## Detailed Results\n")?;
    writeln!(w, "| Scenario | Strategy | Seed | Iterations | Catch rate | Avg time |")?;
    writeln!(w, "|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            w,
            "| {status} {} | {} | {} | {}/{} | {:.2} | {:?} |",
            result.scenario_name,
            result.strategy,
            result.seed,
            result.successful_iterations,
            result.iterations_run,
            result.catch_rate(),
            result.average_duration
        )?;
    }

    let failing: Vec<_> = results.iter().filter(|r| !r.failures.is_empty()).collect();
    if !failing.is_empty() {
        writeln!(w, "\n## Failures\n")?;
        for result in failing {
            writeln!(w, "### {} (seed {})\n", result.scenario_name, result.seed)?;
            for failure in &result.failures {
                writeln!(w, "- {failure}")?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}
