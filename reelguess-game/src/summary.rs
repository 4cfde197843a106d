//! Player-facing summaries derived from session state: clue labels, the
//! people found so far and the end-of-game result.
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::catalog::MovieCatalog;
use crate::clues::{GlobalClues, Range};
use crate::constants::FOUND_CAST_DISPLAY_LIMIT;
use crate::feedback::{CastFeedback, GuessHistoryEntry};
use crate::movie::{MovieId, PersonId};
use crate::session::GameSession;
use crate::state::GameStatus;
use crate::storage::SessionStorage;

/// Shape of a narrowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RangeClue {
    #[default]
    Unknown,
    Exact { value: u32 },
    Between { min: u32, max: u32 },
    AtLeast { min: u32 },
    AtMost { max: u32 },
}

impl RangeClue {
    #[must_use]
    pub fn from_range(range: Range) -> Self {
        match (range.min, range.max) {
            (None, None) => Self::Unknown,
            (Some(min), Some(max)) if min == max => Self::Exact { value: min },
            (Some(min), Some(max)) => Self::Between { min, max },
            (Some(min), None) => Self::AtLeast { min },
            (None, Some(max)) => Self::AtMost { max },
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact { .. })
    }

    /// Attach a unit for display.
    #[must_use]
    pub const fn label(self, unit: ClueUnit) -> ClueLabel {
        ClueLabel { clue: self, unit }
    }
}

/// How range values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClueUnit {
    /// Release year.
    Year,
    /// Runtime in minutes.
    Duration,
}

/// Displayable range clue, e.g. "between 1990 and 2001" or
/// "more than 1 hour 30 minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClueLabel {
    pub clue: RangeClue,
    pub unit: ClueUnit,
}

struct Minutes(u32);

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        let plural = |n: u32| if n == 1 { "" } else { "s" };
        match (hours, minutes) {
            (0, m) => write!(f, "{m} minute{}", plural(m)),
            (h, 0) => write!(f, "{h} hour{}", plural(h)),
            (h, m) => write!(f, "{h} hour{} {m} minute{}", plural(h), plural(m)),
        }
    }
}

impl fmt::Display for ClueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.clue, self.unit) {
            (RangeClue::Unknown, _) => f.write_str("unknown"),
            (RangeClue::Exact { value }, ClueUnit::Year) => write!(f, "{value}"),
            (RangeClue::Exact { value }, ClueUnit::Duration) => write!(f, "{}", Minutes(value)),
            (RangeClue::Between { min, max }, ClueUnit::Year) => {
                write!(f, "between {min} and {max}")
            }
            (RangeClue::Between { min, max }, ClueUnit::Duration) => {
                write!(f, "between {} and {}", Minutes(min), Minutes(max))
            }
            (RangeClue::AtLeast { min }, ClueUnit::Year) => write!(f, "after {min}"),
            (RangeClue::AtLeast { min }, ClueUnit::Duration) => {
                write!(f, "more than {}", Minutes(min))
            }
            (RangeClue::AtMost { max }, ClueUnit::Year) => write!(f, "before {max}"),
            (RangeClue::AtMost { max }, ClueUnit::Duration) => {
                write!(f, "less than {}", Minutes(max))
            }
        }
    }
}

/// A matched person from the guess history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundPerson {
    pub id: Option<PersonId>,
    pub name: String,
    pub photo: Option<String>,
}

impl From<&CastFeedback> for FoundPerson {
    fn from(member: &CastFeedback) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            photo: member.photo.clone(),
        }
    }
}

/// Matched actors and director across every guess, first sighting wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoundPeople {
    pub actors: Vec<FoundPerson>,
    pub director: Option<FoundPerson>,
}

#[derive(PartialEq, Eq, Hash)]
enum PersonKey {
    Id(PersonId),
    Name(String),
}

impl FoundPeople {
    #[must_use]
    pub fn collect(guesses: &[GuessHistoryEntry]) -> Self {
        let mut seen = HashSet::new();
        let mut people = Self::default();
        let matched = guesses
            .iter()
            .flat_map(|entry| entry.feedback.cast.iter())
            .filter(|member| member.matched);
        for member in matched {
            let key = member
                .id
                .map_or_else(|| PersonKey::Name(member.name.clone()), PersonKey::Id);
            if !seen.insert(key) {
                continue;
            }
            if member.is_director() {
                if people.director.is_none() {
                    people.director = Some(member.into());
                }
            } else if people.actors.len() < FOUND_CAST_DISPLAY_LIMIT {
                people.actors.push(member.into());
            }
        }
        people
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.director.is_none()
    }
}

/// Everything the clue panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueBoard {
    pub year: RangeClue,
    pub duration: RangeClue,
    pub language: Option<String>,
    pub genres: Vec<String>,
    pub companies: Vec<String>,
    pub countries: Vec<String>,
    pub people: FoundPeople,
}

impl ClueBoard {
    #[must_use]
    pub fn from_parts(clues: &GlobalClues, guesses: &[GuessHistoryEntry]) -> Self {
        Self {
            year: RangeClue::from_range(clues.year_range),
            duration: RangeClue::from_range(clues.duration_range),
            language: clues.found_language.clone(),
            genres: clues.found_genres.clone(),
            companies: clues.found_companies.clone(),
            countries: clues.found_countries.clone(),
            people: FoundPeople::collect(guesses),
        }
    }

    #[must_use]
    pub fn from_session<C: MovieCatalog, S: SessionStorage>(session: &GameSession<C, S>) -> Self {
        Self::from_parts(session.clues(), session.guesses())
    }

    /// No clue revealed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.year.is_known()
            && !self.duration.is_known()
            && self.language.is_none()
            && self.genres.is_empty()
            && self.companies.is_empty()
            && self.countries.is_empty()
            && self.people.is_empty()
    }

    #[must_use]
    pub const fn year_label(&self) -> ClueLabel {
        self.year.label(ClueUnit::Year)
    }

    #[must_use]
    pub const fn duration_label(&self) -> ClueLabel {
        self.duration.label(ClueUnit::Duration)
    }
}

/// End-of-game card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub movie_id: MovieId,
    pub title: String,
    pub attempts: usize,
    pub status: GameStatus,
    pub poster_url: Option<String>,
    pub next_puzzle_in: Duration,
}

impl ResultSummary {
    /// Summarize `session` as seen at local time `now`.
    #[must_use]
    pub fn from_session<C: MovieCatalog, S: SessionStorage>(
        session: &GameSession<C, S>,
        now: NaiveDateTime,
    ) -> Self {
        let mystery = session.mystery();
        Self {
            movie_id: mystery.id,
            title: mystery.title.clone(),
            attempts: session.attempts(),
            status: session.status(),
            poster_url: mystery.poster_url(),
            next_puzzle_in: session.date().time_until_next(now),
        }
    }

    /// `HH:MM:SS` until the next daily puzzle.
    #[must_use]
    pub fn countdown(&self) -> String {
        let total = self.next_puzzle_in.num_seconds().max(0);
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            GameStatus::Won => write!(
                f,
                "Found \"{}\" in {} attempt{}",
                self.title,
                self.attempts,
                if self.attempts == 1 { "" } else { "s" }
            ),
            GameStatus::Lost => write!(f, "Out of attempts, it was \"{}\"", self.title),
            GameStatus::Playing => write!(f, "{} attempts so far", self.attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::CastRole;

    fn range(min: Option<u32>, max: Option<u32>) -> Range {
        Range { min, max }
    }

    #[test]
    fn year_labels() {
        let label = |min, max| {
            RangeClue::from_range(range(min, max))
                .label(ClueUnit::Year)
                .to_string()
        };
        assert_eq!(label(None, None), "unknown");
        assert_eq!(label(Some(1994), Some(1994)), "1994");
        assert_eq!(label(Some(1990), Some(2001)), "between 1990 and 2001");
        assert_eq!(label(Some(1990), None), "after 1990");
        assert_eq!(label(None, Some(2001)), "before 2001");
    }

    #[test]
    fn duration_labels() {
        let label = |min, max| {
            RangeClue::from_range(range(min, max))
                .label(ClueUnit::Duration)
                .to_string()
        };
        assert_eq!(label(Some(45), Some(45)), "45 minutes");
        assert_eq!(label(Some(120), Some(120)), "2 hours");
        assert_eq!(label(Some(61), Some(61)), "1 hour 1 minute");
        assert_eq!(label(Some(90), None), "more than 1 hour 30 minutes");
        assert_eq!(
            label(Some(90), Some(125)),
            "between 1 hour 30 minutes and 2 hours 5 minutes"
        );
        assert_eq!(label(None, Some(100)), "less than 1 hour 40 minutes");
    }

    fn person(id: Option<u64>, name: &str, matched: bool, director: bool) -> CastFeedback {
        CastFeedback {
            id: id.map(PersonId),
            name: name.to_string(),
            photo: None,
            role: director.then_some(CastRole::Director),
            matched,
        }
    }

    fn entry_with(cast: Vec<CastFeedback>) -> GuessHistoryEntry {
        use crate::movie::MovieRecord;
        let target = MovieRecord::new(MovieId(1), "Target");
        let mut entry = GuessHistoryEntry::new(&target, MovieRecord::new(MovieId(2), "Guess"));
        entry.feedback.cast = cast;
        entry
    }

    #[test]
    fn found_people_dedupes_by_id_then_name() {
        let guesses = vec![
            entry_with(vec![
                person(Some(1), "Keanu Reeves", true, false),
                person(None, "Uncredited Extra", true, false),
                person(Some(2), "Someone Else", false, false),
                person(Some(9), "Lana Wachowski", true, true),
            ]),
            entry_with(vec![
                person(Some(1), "Keanu Reeves", true, false),
                person(None, "Uncredited Extra", true, false),
                person(Some(3), "Carrie-Anne Moss", true, false),
            ]),
        ];
        let people = FoundPeople::collect(&guesses);
        let names: Vec<&str> = people.actors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Keanu Reeves", "Uncredited Extra", "Carrie-Anne Moss"]);
        assert_eq!(
            people.director.as_ref().map(|d| d.name.as_str()),
            Some("Lana Wachowski")
        );
    }

    #[test]
    fn found_actors_are_capped() {
        let cast = (0..15)
            .map(|n| person(Some(n), &format!("Actor {n}"), true, false))
            .collect();
        let people = FoundPeople::collect(&[entry_with(cast)]);
        assert_eq!(people.actors.len(), FOUND_CAST_DISPLAY_LIMIT);
        assert!(people.director.is_none());
    }

    #[test]
    fn fresh_board_is_empty() {
        let board = ClueBoard::from_parts(&GlobalClues::default(), &[]);
        assert!(board.is_empty());
        assert_eq!(board.year_label().to_string(), "unknown");
    }

    #[test]
    fn countdown_is_zero_padded() {
        let summary = ResultSummary {
            movie_id: MovieId(1),
            title: "Heat".to_string(),
            attempts: 1,
            status: GameStatus::Won,
            poster_url: None,
            next_puzzle_in: Duration::seconds(3_725),
        };
        assert_eq!(summary.countdown(), "01:02:05");
        assert_eq!(summary.to_string(), "Found \"Heat\" in 1 attempt");
    }
}
