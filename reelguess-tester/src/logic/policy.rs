use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use reelguess_game::{FixtureCatalog, GlobalClues, MovieId, MovieRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the simulated player picks its next guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuessPolicy {
    /// Walk the bank in order.
    BankOrder,
    /// Uniform pick among untried movies.
    Random,
    /// Uniform pick among untried movies every clue still admits.
    Solver,
    /// Never guesses the mystery; always runs out of attempts.
    Decoy,
}

impl GuessPolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankOrder => "bank-order",
            Self::Random => "random",
            Self::Solver => "solver",
            Self::Decoy => "decoy",
        }
    }
}

impl fmt::Display for GuessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A chosen guess and whether the clues admitted it.
#[derive(Debug, Clone)]
pub struct GuessChoice {
    pub movie: MovieRecord,
    pub admitted: bool,
    pub had_admissible: bool,
}

/// Pick the next guess, or `None` once every movie has been tried.
pub fn choose_guess(
    policy: GuessPolicy,
    catalog: &FixtureCatalog,
    clues: &GlobalClues,
    tried: &[MovieId],
    mystery: MovieId,
    rng: &mut ChaCha20Rng,
) -> Option<GuessChoice> {
    let untried: Vec<&MovieRecord> = catalog
        .records()
        .filter(|record| !tried.contains(&record.id))
        .collect();
    let admissible: Vec<&MovieRecord> = untried
        .iter()
        .copied()
        .filter(|record| clues.admits(record))
        .collect();

    let pick = match policy {
        GuessPolicy::BankOrder => untried.first().copied(),
        GuessPolicy::Random => untried.choose(rng).copied(),
        GuessPolicy::Solver => admissible
            .choose(rng)
            .or_else(|| untried.choose(rng))
            .copied(),
        GuessPolicy::Decoy => untried.iter().copied().find(|record| record.id != mystery),
    }?;

    Some(GuessChoice {
        admitted: clues.admits(pick),
        had_admissible: !admissible.is_empty(),
        movie: pick.clone(),
    })
}
