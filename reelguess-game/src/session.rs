//! Session orchestration: mystery selection, guess history, clue tracking and
//! the playing → won/lost state machine.
use crate::calendar::DateKey;
use crate::catalog::{MovieCatalog, fetch_or_degraded};
use crate::clues::{GlobalClues, merge};
use crate::constants::MAX_ATTEMPTS;
use crate::feedback::GuessHistoryEntry;
use crate::movie::MovieRecord;
use crate::seed::{DailySelector, RandomSelector, SelectError};
use crate::state::{GameMode, GameStatus, SessionKey};
use crate::storage::{SessionSnapshot, SessionStorage, SnapshotError};

/// Result of [`GameSession::submit_guess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess was evaluated and appended to the history.
    Recorded { status: GameStatus, attempts: usize },
    /// The session no longer accepts guesses.
    Ignored(GameStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Daily(DateKey),
    Random(RandomSelector),
}

impl Selection {
    fn key(self) -> SessionKey {
        match self {
            Self::Daily(date) => SessionKey::daily(date),
            Self::Random(selector) => SessionKey::random(selector.seed()),
        }
    }

    const fn mode(self) -> GameMode {
        match self {
            Self::Daily(_) => GameMode::Daily,
            Self::Random(_) => GameMode::Random,
        }
    }

    fn pick<C: MovieCatalog>(self, catalog: &C) -> Result<MovieRecord, SelectError> {
        let ids = catalog.candidate_ids();
        let id = match self {
            Self::Daily(date) => DailySelector::select(date, ids)?,
            Self::Random(selector) => selector.select(ids)?,
        };
        Ok(fetch_or_degraded(catalog, id))
    }
}

/// What rehydration found under the session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restore {
    Applied,
    Fresh,
    Unreadable,
}

/// A single player's game against one mystery movie.
///
/// Mutations are persisted through the injected storage after every change.
/// Callers must serialize calls; the session is not meant for concurrent use.
#[derive(Debug)]
pub struct GameSession<C, S>
where
    C: MovieCatalog,
    S: SessionStorage,
{
    catalog: C,
    storage: S,
    today: DateKey,
    selection: Selection,
    key: SessionKey,
    mystery: MovieRecord,
    guesses: Vec<GuessHistoryEntry>,
    status: GameStatus,
    clues: GlobalClues,
}

impl<C, S> GameSession<C, S>
where
    C: MovieCatalog,
    S: SessionStorage,
{
    /// Open today's daily session, resuming stored progress when it belongs
    /// to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCatalog`] if the catalog has no candidates.
    pub fn open_daily(catalog: C, storage: S, today: DateKey) -> Result<Self, SelectError> {
        Self::open(catalog, storage, today, Selection::Daily(today))
    }

    /// Open (or resume) the random session identified by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCatalog`] if the catalog has no candidates.
    pub fn open_random(
        catalog: C,
        storage: S,
        today: DateKey,
        seed: u64,
    ) -> Result<Self, SelectError> {
        Self::open(
            catalog,
            storage,
            today,
            Selection::Random(RandomSelector::new(seed)),
        )
    }

    fn open(
        catalog: C,
        storage: S,
        today: DateKey,
        selection: Selection,
    ) -> Result<Self, SelectError> {
        let mystery = selection.pick(&catalog)?;
        let mut session = Self {
            catalog,
            storage,
            today,
            selection,
            key: selection.key(),
            mystery,
            guesses: Vec::new(),
            status: GameStatus::Playing,
            clues: GlobalClues::default(),
        };
        match session.rehydrate() {
            Restore::Applied => log::info!(
                "resumed session {} at {} guesses ({})",
                session.key,
                session.guesses.len(),
                session.status
            ),
            Restore::Fresh => {
                log::info!("started session {}", session.key);
                session.persist();
            }
            // Stored progress may still be intact; the first guess writes.
            Restore::Unreadable => log::info!("started session {} in memory", session.key),
        }
        Ok(session)
    }

    /// Replace the current session with a fresh one. Daily sessions restart
    /// today's puzzle; random sessions draw a new seed.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCatalog`] if the catalog has no candidates.
    /// The current session is left untouched in that case.
    pub fn start_new_session(&mut self, mode: GameMode) -> Result<(), SelectError> {
        let selection = match mode {
            GameMode::Daily => Selection::Daily(self.today),
            GameMode::Random => Selection::Random(RandomSelector::from_entropy()),
        };
        let mystery = selection.pick(&self.catalog)?;
        self.selection = selection;
        self.key = selection.key();
        self.mystery = mystery;
        self.guesses.clear();
        self.status = GameStatus::Playing;
        self.clues = GlobalClues::default();
        log::info!("started session {}", self.key);
        self.persist();
        Ok(())
    }

    /// Evaluate `guess` against the mystery movie and record it.
    ///
    /// Guesses after the session has ended are ignored. Duplicate or
    /// otherwise odd guesses are evaluated like any other.
    pub fn submit_guess(&mut self, guess: MovieRecord) -> GuessOutcome {
        if self.status.is_terminal() || self.guesses.len() >= MAX_ATTEMPTS {
            log::debug!("ignoring guess {} on finished session {}", guess.id, self.key);
            return GuessOutcome::Ignored(self.status);
        }

        let won = guess.id == self.mystery.id;
        let entry = GuessHistoryEntry::new(&self.mystery, guess);
        self.clues = merge(&self.clues, &entry.feedback);
        log::debug!(
            "session {} guess {}: {} ({})",
            self.key,
            self.guesses.len() + 1,
            entry.movie.title,
            entry.movie.id
        );
        self.guesses.push(entry);

        if won {
            self.status = GameStatus::Won;
        } else if self.guesses.len() >= MAX_ATTEMPTS {
            self.status = GameStatus::Lost;
        }
        if self.status.is_terminal() {
            log::info!(
                "session {} {} after {} guesses",
                self.key,
                self.status,
                self.guesses.len()
            );
        }

        self.persist();
        GuessOutcome::Recorded {
            status: self.status,
            attempts: self.guesses.len(),
        }
    }

    /// Current state as a storable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            date: self.today,
            guesses: self.guesses.clone(),
            state: self.status,
            global_clues: self.clues.clone(),
        }
    }

    fn persist(&self) {
        let key = self.key.to_string();
        let json = match self.snapshot().to_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize session {key}: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(&key, &json) {
            log::warn!("could not persist session {key}: {err}");
        }
    }

    fn discard_stored(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            log::warn!("could not remove stored session {key}: {err}");
        }
    }

    /// Restore stored progress for the current key.
    fn rehydrate(&mut self) -> Restore {
        let key = self.key.to_string();
        let stored = match self.storage.get(&key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Restore::Fresh,
            Err(err) => {
                log::warn!("could not read stored session {key}: {err}");
                return Restore::Unreadable;
            }
        };

        let snapshot = match SessionSnapshot::from_json(&stored)
            .and_then(|snapshot| self.check_history(snapshot))
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("discarding corrupt session {key}: {err}");
                self.discard_stored(&key);
                return Restore::Fresh;
            }
        };

        if self.selection.mode() == GameMode::Daily && snapshot.date != self.today {
            log::debug!(
                "stored session {key} is from {}, starting fresh for {}",
                snapshot.date,
                self.today
            );
            self.discard_stored(&key);
            return Restore::Fresh;
        }

        self.guesses = snapshot.guesses;
        self.status = snapshot.state;
        self.clues = snapshot.global_clues;
        Restore::Applied
    }

    fn check_history(&self, snapshot: SessionSnapshot) -> Result<SessionSnapshot, SnapshotError> {
        let hits: Vec<usize> = snapshot
            .guesses
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.movie.id == self.mystery.id)
            .map(|(idx, _)| idx)
            .collect();
        let valid = match snapshot.state {
            GameStatus::Won => hits == [snapshot.guesses.len().saturating_sub(1)],
            GameStatus::Playing | GameStatus::Lost => hits.is_empty(),
        };
        if valid {
            Ok(snapshot)
        } else {
            Err(SnapshotError::WrongMystery)
        }
    }

    #[must_use]
    pub const fn mystery(&self) -> &MovieRecord {
        &self.mystery
    }

    /// Submitted guesses, oldest first.
    #[must_use]
    pub fn guesses(&self) -> &[GuessHistoryEntry] {
        &self.guesses
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn clues(&self) -> &GlobalClues {
        &self.clues
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.selection.mode()
    }

    #[must_use]
    pub const fn key(&self) -> &SessionKey {
        &self.key
    }

    #[must_use]
    pub const fn date(&self) -> DateKey {
        self.today
    }

    /// Seed of a random session.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        match self.selection {
            Selection::Random(selector) => Some(selector.seed()),
            Selection::Daily(_) => None,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> usize {
        MAX_ATTEMPTS.saturating_sub(self.guesses.len())
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
