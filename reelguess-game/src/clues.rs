//! Running summary of everything learned about the mystery movie.
use serde::{Deserialize, Serialize};

use crate::feedback::{Comparison, GuessFeedback, NamedFeedback, RangeBound, RangeDiff};
use crate::movie::{MovieRecord, PersonId};

/// Inclusive numeric bounds; `None` means open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Range {
    #[must_use]
    pub const fn open() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// The single value both bounds agree on, if collapsed.
    #[must_use]
    pub fn exact(&self) -> Option<u32> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => Some(min),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Fold one comparison into the bounds. Zero values carry no information.
    #[must_use]
    pub fn narrow<D: RangeDiff>(self, comparison: Comparison<D>) -> Self {
        let value = comparison.value;
        if value == 0 {
            return self;
        }
        match comparison.diff.bound() {
            RangeBound::Exact => Self {
                min: Some(value),
                max: Some(value),
            },
            RangeBound::AtLeast => Self {
                min: Some(self.min.map_or(value, |min| min.max(value))),
                max: self.max,
            },
            RangeBound::AtMost => Self {
                min: self.min,
                max: Some(self.max.map_or(value, |max| max.min(value))),
            },
        }
    }
}

/// Clues accumulated across a session. Ranges only shrink and sets only grow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalClues {
    pub year_range: Range,
    pub duration_range: Range,
    pub found_genres: Vec<String>,
    pub found_cast: Vec<PersonId>,
    pub found_language: Option<String>,
    pub found_companies: Vec<String>,
    pub found_countries: Vec<String>,
}

fn contains_name(names: &[String], name: &str) -> bool {
    let needle = name.to_lowercase();
    names.iter().any(|known| known.to_lowercase() == needle)
}

fn absorb_names(known: &mut Vec<String>, entries: &[NamedFeedback]) {
    for entry in entries {
        if entry.matched && !entry.name.is_empty() && !contains_name(known, &entry.name) {
            known.push(entry.name.clone());
        }
    }
}

impl GlobalClues {
    /// Nothing revealed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year_range.is_open()
            && self.duration_range.is_open()
            && self.found_genres.is_empty()
            && self.found_cast.is_empty()
            && self.found_language.is_none()
            && self.found_companies.is_empty()
            && self.found_countries.is_empty()
    }

    /// Whether `movie` is still compatible with every clue.
    #[must_use]
    pub fn admits(&self, movie: &MovieRecord) -> bool {
        if !self.year_range.contains(movie.year_value())
            || !self.duration_range.contains(movie.runtime_value())
        {
            return false;
        }

        if let Some(language) = &self.found_language {
            let matches = movie
                .original_language
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(language));
            if !matches {
                return false;
            }
        }

        // Directors match by name, so a director without an id cannot rule
        // out any found person.
        let cast_ok = self.found_cast.iter().all(|id| {
            movie.has_cast_member(*id)
                || movie
                    .director
                    .as_ref()
                    .is_some_and(|director| director.id.is_none_or(|known| known == *id))
        });

        cast_ok
            && self
                .found_genres
                .iter()
                .all(|genre| contains_name(&movie.genres, genre))
            && self
                .found_companies
                .iter()
                .all(|company| contains_name(&movie.production_companies, company))
            && self
                .found_countries
                .iter()
                .all(|country| contains_name(&movie.production_countries, country))
    }
}

/// Fold one feedback result into the clue set, leaving the input untouched.
#[must_use]
pub fn merge(clues: &GlobalClues, feedback: &GuessFeedback) -> GlobalClues {
    let mut next = clues.clone();
    next.year_range = clues.year_range.narrow(feedback.year);
    next.duration_range = clues.duration_range.narrow(feedback.runtime);

    if next.found_language.is_none() && feedback.language.matched {
        next.found_language = feedback
            .language
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase);
    }

    absorb_names(&mut next.found_genres, &feedback.genres);
    absorb_names(&mut next.found_companies, &feedback.production_companies);
    absorb_names(&mut next.found_countries, &feedback.production_countries);

    for member in &feedback.cast {
        if let (true, Some(id)) = (member.matched, member.id)
            && !next.found_cast.contains(&id)
        {
            next.found_cast.push(id);
        }
    }

    next
}
