//! Centralized tuning constants for Reelguess game logic.
//!
//! Keeping these together means a rule change (attempt budget, how much of a
//! cast list is compared) only happens through a reviewed code change rather
//! than through external data files.

// Session rules ------------------------------------------------------------
/// Guesses allowed per session before it is lost.
pub const MAX_ATTEMPTS: usize = 6;

// Evaluation ---------------------------------------------------------------
/// Billed cast members of a guess that are compared against the target.
pub const CAST_COMPARE_LIMIT: usize = 10;

// Summaries ----------------------------------------------------------------
/// Matched actors surfaced on the clue board.
pub const FOUND_CAST_DISPLAY_LIMIT: usize = 10;

// Daily selection ----------------------------------------------------------
pub(crate) const DAILY_HASH_SEED: u64 = 0;
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

// Image hosting ------------------------------------------------------------
/// Prefix for TMDB poster and profile paths.
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w185";
