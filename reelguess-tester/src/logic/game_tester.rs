use anyhow::{Context, Result};
use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use reelguess_game::{
    DateKey, FixtureCatalog, GameMode, GameSession, GameStatus, GlobalClues, GuessOutcome,
    MemoryStorage, MovieCatalog, MovieId, MovieRecord, SessionSnapshot,
};
use std::path::Path;
use std::sync::Arc;

use super::policy::{GuessPolicy, choose_guess};

/// Shared data every simulation plays against.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub catalog: FixtureCatalog,
}

impl TesterAssets {
    /// The movie bank bundled with the engine.
    pub fn load_default() -> Result<Self> {
        let catalog = FixtureCatalog::bundled().context("bundled movie bank is invalid")?;
        Ok(Self { catalog })
    }

    /// A movie bank fixture file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = FixtureCatalog::from_json(&raw)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        Ok(Self { catalog })
    }
}

/// Declarative plan for running one simulated session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub mode: GameMode,
    pub policy: GuessPolicy,
    /// Reopen the session from storage after every `n` guesses.
    pub reload_every: Option<usize>,
    /// Guesses to attempt after the session has ended.
    pub extra_guesses: usize,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(mode: GameMode, policy: GuessPolicy) -> Self {
        Self {
            mode,
            policy,
            reload_every: None,
            extra_guesses: 0,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_reload_every(mut self, guesses: usize) -> Self {
        self.reload_every = Some(guesses);
        self
    }

    #[must_use]
    pub const fn with_extra_guesses(mut self, guesses: usize) -> Self {
        self.extra_guesses = guesses;
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

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
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

/// One submitted guess.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub guess: MovieId,
    pub title: String,
    pub outcome: GuessOutcome,
    /// Whether the clues before this guess admitted it.
    pub admitted: bool,
    /// Whether any untried movie was admissible before this guess.
    pub had_admissible: bool,
    /// Clues after this guess.
    pub clues: GlobalClues,
}

/// Complete record of a simulated session.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub date: DateKey,
    pub seed: u64,
    pub mode: GameMode,
    pub policy: GuessPolicy,
    pub candidates: Vec<MovieId>,
    pub mystery: MovieRecord,
    pub turns: Vec<TurnOutcome>,
    pub extra_outcomes: Vec<GuessOutcome>,
    pub status: GameStatus,
    pub attempts: usize,
    pub snapshot: SessionSnapshot,
    /// Reloads whose restored snapshot differed from the one saved.
    pub reload_mismatches: usize,
    pub reloads: usize,
    /// Mystery and snapshot seen when reopening the finished session.
    pub reopened_mystery: MovieId,
    pub reopened_snapshot: SessionSnapshot,
}

impl SimulationSummary {
    #[must_use]
    pub fn ending_label(&self) -> String {
        format!("{} after {} guesses", self.status, self.attempts)
    }
}

type Session = GameSession<FixtureCatalog, MemoryStorage>;

/// Headless deterministic runner for the core game logic.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn catalog(&self) -> &FixtureCatalog {
        &self.assets.catalog
    }

    fn open(
        &self,
        plan: &SimulationPlan,
        storage: &MemoryStorage,
        date: DateKey,
        seed: u64,
    ) -> Result<Session> {
        let catalog = self.assets.catalog.clone();
        let session = match plan.mode {
            GameMode::Daily => GameSession::open_daily(catalog, storage.clone(), date),
            GameMode::Random => GameSession::open_random(catalog, storage.clone(), date, seed),
        };
        session.with_context(|| format!("could not open {} session", plan.mode))
    }

    /// Play one session to completion under `plan`.
    pub fn run_plan(
        &self,
        plan: &SimulationPlan,
        date: DateKey,
        seed: u64,
    ) -> Result<SimulationSummary> {
        let storage = MemoryStorage::new();
        let mut session = self.open(plan, &storage, date, seed)?;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mystery = session.mystery().clone();

        if self.verbose {
            println!(
                "🎬 {} session {} ({})",
                plan.mode,
                session.key().to_string().bright_white(),
                plan.policy
            );
        }

        let mut turns = Vec::new();
        let mut tried = Vec::new();
        let mut reloads = 0;
        let mut reload_mismatches = 0;

        while !session.status().is_terminal() {
            let Some(choice) = choose_guess(
                plan.policy,
                session.catalog(),
                session.clues(),
                &tried,
                mystery.id,
                &mut rng,
            ) else {
                break;
            };
            tried.push(choice.movie.id);
            let title = choice.movie.title.clone();
            let guess = choice.movie.id;
            let outcome = session.submit_guess(choice.movie);

            if self.verbose {
                println!("   {} {title} → {:?}", "•".cyan(), outcome);
            }

            turns.push(TurnOutcome {
                guess,
                title,
                outcome,
                admitted: choice.admitted,
                had_admissible: choice.had_admissible,
                clues: session.clues().clone(),
            });

            if let Some(every) = plan.reload_every
                && every > 0
                && session.attempts() % every == 0
            {
                let saved = session.snapshot();
                drop(session);
                session = self.open(plan, &storage, date, seed)?;
                reloads += 1;
                if session.snapshot() != saved {
                    reload_mismatches += 1;
                }
            }
        }

        let mut extra_outcomes = Vec::new();
        for _ in 0..plan.extra_guesses {
            extra_outcomes.push(session.submit_guess(mystery.clone()));
        }

        let status = session.status();
        let attempts = session.attempts();
        let snapshot = session.snapshot();
        let candidates = session.catalog().candidate_ids().to_vec();
        drop(session);

        let reopened = self.open(plan, &storage, date, seed)?;

        Ok(SimulationSummary {
            date,
            seed,
            mode: plan.mode,
            policy: plan.policy,
            candidates,
            mystery,
            turns,
            extra_outcomes,
            status,
            attempts,
            snapshot,
            reload_mismatches,
            reloads,
            reopened_mystery: reopened.mystery().id,
            reopened_snapshot: reopened.snapshot(),
        })
    }
}
