use anyhow::{Result, ensure};
use reelguess_game::{
    DailySelector, GameMode, GameStatus, GuessOutcome, MAX_ATTEMPTS, RandomSelector, Range,
};

use crate::common::scenario::TestScenario;
use crate::logic::{GuessPolicy, SimulationPlan, SimulationSummary};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Smoke Test",
            SimulationPlan::new(GameMode::Daily, GuessPolicy::Random)
                .with_expectation(finished_expectation),
        )
        .with_key("smoke"),
        TestScenario::simulation(
            "Daily Selection Determinism",
            SimulationPlan::new(GameMode::Daily, GuessPolicy::BankOrder)
                .with_expectation(daily_selection_expectation),
        )
        .with_key("daily-determinism"),
        TestScenario::simulation(
            "Attempt Cap",
            SimulationPlan::new(GameMode::Daily, GuessPolicy::Decoy)
                .with_extra_guesses(2)
                .with_expectation(attempt_cap_expectation),
        )
        .with_key("attempt-cap"),
        TestScenario::simulation(
            "Clue Monotonicity",
            SimulationPlan::new(GameMode::Random, GuessPolicy::Random)
                .with_expectation(clue_monotonicity_expectation),
        )
        .with_key("clue-monotonicity"),
        TestScenario::simulation(
            "Session Rehydration",
            SimulationPlan::new(GameMode::Daily, GuessPolicy::Random)
                .with_reload_every(1)
                .with_expectation(rehydration_expectation),
        )
        .with_key("rehydration"),
        TestScenario::simulation(
            "Random Session Replay",
            SimulationPlan::new(GameMode::Random, GuessPolicy::Random)
                .with_reload_every(2)
                .with_expectation(random_replay_expectation),
        )
        .with_key("random-replay"),
        TestScenario::simulation(
            "Clue-Consistent Solver",
            SimulationPlan::new(GameMode::Random, GuessPolicy::Solver)
                .with_expectation(finished_expectation)
                .with_expectation(solver_expectation),
        )
        .with_key("solver"),
    ]
}

fn finished_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        (1..=MAX_ATTEMPTS).contains(&summary.attempts),
        "Session used {} attempts",
        summary.attempts
    );
    ensure!(
        summary.status.is_terminal(),
        "Session should end, still {}",
        summary.status
    );
    let won = summary.turns.last().map(|turn| turn.guess) == Some(summary.mystery.id);
    ensure!(
        won == (summary.status == GameStatus::Won),
        "Status {} does not match the final guess",
        summary.status
    );
    Ok(())
}

fn daily_selection_expectation(summary: &SimulationSummary) -> Result<()> {
    let picks = (0..3)
        .map(|_| DailySelector::select(summary.date, &summary.candidates))
        .collect::<Result<Vec<_>, _>>()?;
    ensure!(
        picks.iter().all(|id| *id == summary.mystery.id),
        "Daily pick for {} drifted: {:?} vs mystery {}",
        summary.date,
        picks,
        summary.mystery.id
    );
    ensure!(
        summary.reopened_mystery == summary.mystery.id,
        "Reopened daily session has a different mystery"
    );
    Ok(())
}

fn attempt_cap_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.status == GameStatus::Lost,
        "Decoy run should lose, got {}",
        summary.status
    );
    ensure!(
        summary.attempts == MAX_ATTEMPTS,
        "Lost after {} attempts instead of {MAX_ATTEMPTS}",
        summary.attempts
    );
    ensure!(
        summary
            .extra_outcomes
            .iter()
            .all(|outcome| *outcome == GuessOutcome::Ignored(GameStatus::Lost)),
        "Guesses after losing were not ignored: {:?}",
        summary.extra_outcomes
    );
    ensure!(
        summary.snapshot.guesses.len() == MAX_ATTEMPTS,
        "Late guesses leaked into the stored history"
    );
    Ok(())
}

fn within(inner: Range, outer: Range) -> bool {
    let min_ok = outer
        .min
        .is_none_or(|outer| inner.min.is_some_and(|inner| inner >= outer));
    let max_ok = outer
        .max
        .is_none_or(|outer| inner.max.is_some_and(|inner| inner <= outer));
    min_ok && max_ok
}

fn clue_monotonicity_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut previous = reelguess_game::GlobalClues::default();
    for (idx, turn) in summary.turns.iter().enumerate() {
        let clues = &turn.clues;
        ensure!(
            within(clues.year_range, previous.year_range),
            "Year range widened on guess {}: {:?} -> {:?}",
            idx + 1,
            previous.year_range,
            clues.year_range
        );
        ensure!(
            within(clues.duration_range, previous.duration_range),
            "Duration range widened on guess {}",
            idx + 1
        );
        ensure!(
            previous
                .found_genres
                .iter()
                .all(|genre| clues.found_genres.contains(genre))
                && previous
                    .found_cast
                    .iter()
                    .all(|id| clues.found_cast.contains(id)),
            "Found clues shrank on guess {}",
            idx + 1
        );
        ensure!(
            previous.found_language.is_none() || previous.found_language == clues.found_language,
            "Found language changed on guess {}",
            idx + 1
        );
        ensure!(
            clues.admits(&summary.mystery),
            "Clues after guess {} exclude the mystery '{}'",
            idx + 1,
            summary.mystery.title
        );
        previous = clues.clone();
    }
    Ok(())
}

fn rehydration_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.reloads == summary.attempts,
        "Expected a reload per guess, saw {} for {} guesses",
        summary.reloads,
        summary.attempts
    );
    ensure!(
        summary.reload_mismatches == 0,
        "{} reloads restored a different state",
        summary.reload_mismatches
    );
    ensure!(
        summary.reopened_snapshot == summary.snapshot,
        "Reopened session does not match the final state"
    );
    Ok(())
}

fn random_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    rehydration_expectation_relaxed(summary)?;
    let expected = RandomSelector::new(summary.seed).select(&summary.candidates)?;
    ensure!(
        expected == summary.mystery.id,
        "Seed {} should pick movie {expected}, session played {}",
        summary.seed,
        summary.mystery.id
    );
    ensure!(
        summary.reopened_mystery == summary.mystery.id,
        "Replaying seed {} chose a different mystery",
        summary.seed
    );
    Ok(())
}

fn rehydration_expectation_relaxed(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.reload_mismatches == 0,
        "{} reloads restored a different state",
        summary.reload_mismatches
    );
    ensure!(
        summary.reopened_snapshot == summary.snapshot,
        "Reopened session does not match the final state"
    );
    Ok(())
}

fn solver_expectation(summary: &SimulationSummary) -> Result<()> {
    for (idx, turn) in summary.turns.iter().enumerate() {
        ensure!(
            turn.admitted || !turn.had_admissible,
            "Solver guessed excluded movie '{}' on guess {}",
            turn.title,
            idx + 1
        );
    }
    clue_monotonicity_expectation(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{GameTester, TesterAssets};
    use reelguess_game::DateKey;
    use std::sync::Arc;

    fn run(key: &str, date: &str, seed: u64) -> Result<()> {
        let scenario = crate::common::scenario::get_scenario(key).unwrap();
        let tester = GameTester::new(Arc::new(TesterAssets::load_default().unwrap()), false);
        let date: DateKey = date.parse().unwrap();
        let summary = tester.run_plan(&scenario.plan, date, seed)?;
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn all_scenarios_pass_on_bundled_bank() {
        for (key, _) in crate::common::scenario::list_scenarios() {
            for (date, seed) in [("2026-10-16", 1337), ("2027-01-01", 42), ("2024-02-29", 7)] {
                run(key, date, seed).unwrap_or_else(|err| panic!("{key} {date} {seed}: {err:#}"));
            }
        }
    }

    #[test]
    fn range_containment() {
        let open = Range::open();
        let bounded = Range {
            min: Some(1990),
            max: Some(2000),
        };
        assert!(within(bounded, open));
        assert!(!within(open, bounded));
        assert!(within(bounded, bounded));
    }
}
