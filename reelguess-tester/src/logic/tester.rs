use colored::Colorize;
use reelguess_game::DateKey;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub date: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub wins: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: GameTester,
}

impl LogicTester {
    pub const fn new(tester: GameTester) -> Self {
        Self { tester }
    }

    /// Run `scenario` once per date and seed, `iterations` times each.
    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        dates: &[DateKey],
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &date in dates {
            for &seed in seeds {
                if self.tester.verbose() {
                    println!(
                        "🧪 Testing scenario: {} (mode: {} policy: {} date: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.mode,
                        scenario.plan.policy,
                        date,
                        seed
                    );
                }
                results.push(self.run_single_scenario(scenario, date, seed, iterations));
            }
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        date: DateKey,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let tally = self.run_simulation_iterations(&scenario.plan, date, seed, iterations);

        let avg_duration = if tally.performance_data.is_empty() {
            Duration::ZERO
        } else {
            tally.performance_data.iter().sum::<Duration>()
                / u32::try_from(tally.performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            date: date.to_string(),
            seed,
            passed: tally.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: tally.successes,
            wins: tally.wins,
            failures: tally.failures,
            average_duration: avg_duration,
            performance_data: tally.performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        date: DateKey,
        seed: u64,
        iterations: usize,
    ) -> IterationTally {
        let mut tally = IterationTally::default();
        let verbose = self.tester.verbose();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = match self.tester.run_plan(plan, date, iteration_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    tally.failures.push(format!(
                        "Iteration {} (date {date}, seed {iteration_seed}): {err:#}",
                        i + 1
                    ));
                    continue;
                }
            };

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let context = summarize_guess_path(&summary);
                tally.failures.push(format!(
                    "Iteration {} (mode {}, policy {}, date {}, seed {}, mystery '{}', {}): {} | {}",
                    i + 1,
                    summary.mode,
                    summary.policy,
                    summary.date,
                    summary.seed,
                    summary.mystery.title,
                    summary.ending_label(),
                    err,
                    context
                ));

                if verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                    println!("     ↳ Guesses: {context}");
                }
            } else {
                tally.successes += 1;
                if summary.status == reelguess_game::GameStatus::Won {
                    tally.wins += 1;
                }
                let duration = start_time.elapsed();
                tally.performance_data.push(duration);

                if verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                        i + 1,
                        iterations,
                        summary.ending_label()
                    );
                }
            }
        }

        tally
    }
}

#[derive(Default)]
struct IterationTally {
    successes: usize,
    wins: usize,
    failures: Vec<String>,
    performance_data: Vec<Duration>,
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn summarize_guess_path(summary: &SimulationSummary) -> String {
    if summary.turns.is_empty() {
        return "no guesses recorded".to_string();
    }

    summary
        .turns
        .iter()
        .rev()
        .take(3)
        .map(|turn| {
            format!(
                "{} ({}){}",
                turn.title,
                turn.guess,
                if turn.admitted { "" } else { " [excluded]" }
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
