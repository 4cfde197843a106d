//! Reelguess Game Engine
//!
//! Platform-agnostic core of the daily movie-guessing game: mystery selection,
//! guess evaluation, clue aggregation and the session state machine. Movie
//! data and persistence are supplied by the host through [`MovieCatalog`] and
//! [`SessionStorage`].

pub mod calendar;
pub mod catalog;
pub mod clues;
pub mod constants;
pub mod feedback;
pub mod movie;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;
pub mod summary;

// Re-export commonly used types
pub use calendar::DateKey;
pub use catalog::{FixtureCatalog, LookupError, MovieCatalog, fetch_or_degraded};
pub use clues::{GlobalClues, Range, merge};
pub use constants::MAX_ATTEMPTS;
pub use feedback::{
    CastFeedback, CastRole, Comparison, GuessFeedback, GuessHistoryEntry, NamedFeedback,
    RuntimeDiff, YearDiff, evaluate,
};
pub use movie::{CastMember, Director, MovieId, MovieRecord, PersonId, TmdbMovie};
pub use seed::{DailySelector, RandomSelector, SelectError, generate_session_seed};
pub use session::{GameSession, GuessOutcome};
pub use state::{GameMode, GameStatus, SessionKey};
pub use storage::{MemoryStorage, SessionSnapshot, SessionStorage, SnapshotError};
pub use summary::{
    ClueBoard, ClueLabel, ClueUnit, FoundPeople, FoundPerson, RangeClue, ResultSummary,
};
