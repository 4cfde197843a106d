//! Structured feedback comparing a guessed movie with the mystery movie.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::movie::{MovieRecord, PersonId, profile_url};

/// What a directional diff says about where the target lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// The target equals the guessed value.
    Exact,
    /// The target is at least the guessed value.
    AtLeast,
    /// The target is at most the guessed value.
    AtMost,
}

/// Diff kinds that can narrow a numeric range.
pub trait RangeDiff: Copy {
    fn bound(self) -> RangeBound;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearDiff {
    Exact,
    /// The guess was released before the target.
    Older,
    /// The guess was released after the target.
    Newer,
}

impl RangeDiff for YearDiff {
    fn bound(self) -> RangeBound {
        match self {
            Self::Exact => RangeBound::Exact,
            Self::Older => RangeBound::AtLeast,
            Self::Newer => RangeBound::AtMost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeDiff {
    Exact,
    /// The guess runs shorter than the target.
    Shorter,
    /// The guess runs longer than the target.
    Longer,
}

impl RangeDiff for RuntimeDiff {
    fn bound(self) -> RangeBound {
        match self {
            Self::Exact => RangeBound::Exact,
            Self::Shorter => RangeBound::AtLeast,
            Self::Longer => RangeBound::AtMost,
        }
    }
}

/// A guessed numeric value and how it compares with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison<D> {
    pub value: u32,
    pub diff: D,
}

impl<D: RangeDiff> Comparison<D> {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.diff.bound() == RangeBound::Exact
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorFeedback {
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFeedback {
    /// The guess's own original-language code.
    pub code: Option<String>,
    #[serde(rename = "match")]
    pub matched: bool,
}

/// A named attribute (genre, company, country) of the guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFeedback {
    pub name: String,
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastRole {
    Director,
}

/// A person from the guess's credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastFeedback {
    pub id: Option<PersonId>,
    pub name: String,
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<CastRole>,
    #[serde(rename = "match")]
    pub matched: bool,
}

impl CastFeedback {
    #[must_use]
    pub fn is_director(&self) -> bool {
        self.role == Some(CastRole::Director)
    }
}

/// Every comparison produced for a single guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessFeedback {
    pub year: Comparison<YearDiff>,
    pub runtime: Comparison<RuntimeDiff>,
    pub director: DirectorFeedback,
    pub language: LanguageFeedback,
    pub genres: Vec<NamedFeedback>,
    pub cast: Vec<CastFeedback>,
    pub production_companies: Vec<NamedFeedback>,
    pub production_countries: Vec<NamedFeedback>,
}

/// One submitted guess together with its feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessHistoryEntry {
    pub movie: MovieRecord,
    pub feedback: GuessFeedback,
}

impl GuessHistoryEntry {
    #[must_use]
    pub fn new(target: &MovieRecord, guess: MovieRecord) -> Self {
        let feedback = evaluate(target, &guess);
        Self {
            movie: guess,
            feedback,
        }
    }
}

fn compare<D>(guess: u32, target: u32, below: D, exact: D, above: D) -> Comparison<D> {
    let diff = match guess.cmp(&target) {
        Ordering::Less => below,
        Ordering::Equal => exact,
        Ordering::Greater => above,
    };
    Comparison { value: guess, diff }
}

fn named_feedback(guessed: &[String], target: &[String]) -> Vec<NamedFeedback> {
    guessed
        .iter()
        .map(|name| NamedFeedback {
            name: name.clone(),
            matched: target.iter().any(|candidate| candidate == name),
        })
        .collect()
}

fn cast_feedback(target: &MovieRecord, guess: &MovieRecord) -> Vec<CastFeedback> {
    let mut entries: Vec<CastFeedback> = guess
        .billed_cast()
        .into_iter()
        .map(|member| CastFeedback {
            id: Some(member.id),
            name: member.name.clone(),
            photo: profile_url(member.profile_path.as_deref()),
            role: None,
            matched: target.has_cast_member(member.id),
        })
        .collect();

    if let Some(director) = &guess.director {
        entries.push(CastFeedback {
            id: director.id,
            name: director.name.clone(),
            photo: profile_url(director.profile_path.as_deref()),
            role: Some(CastRole::Director),
            matched: directors_match(target, guess),
        });
    }

    entries
}

fn directors_match(target: &MovieRecord, guess: &MovieRecord) -> bool {
    match (target.director_name(), guess.director_name()) {
        (Some(expected), Some(guessed)) => expected == guessed,
        _ => false,
    }
}

/// Compare `guess` against `target`.
///
/// Pure: the result depends only on the two records.
#[must_use]
pub fn evaluate(target: &MovieRecord, guess: &MovieRecord) -> GuessFeedback {
    let year = compare(
        guess.year_value(),
        target.year_value(),
        YearDiff::Older,
        YearDiff::Exact,
        YearDiff::Newer,
    );
    let runtime = compare(
        guess.runtime_value(),
        target.runtime_value(),
        RuntimeDiff::Shorter,
        RuntimeDiff::Exact,
        RuntimeDiff::Longer,
    );

    let language = LanguageFeedback {
        code: guess.original_language.clone(),
        matched: guess.original_language.is_some()
            && guess.original_language == target.original_language,
    };

    GuessFeedback {
        year,
        runtime,
        director: DirectorFeedback {
            matched: directors_match(target, guess),
        },
        language,
        genres: named_feedback(&guess.genres, &target.genres),
        cast: cast_feedback(target, guess),
        production_companies: named_feedback(
            &guess.production_companies,
            &target.production_companies,
        ),
        production_countries: named_feedback(
            &guess.production_countries,
            &target.production_countries,
        ),
    }
}
