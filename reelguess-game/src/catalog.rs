//! Movie catalog contract and the in-memory fixture catalog.
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::movie::{MovieId, MovieRecord, TmdbMovie};

/// Failure to resolve a movie's details.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("movie {0} is not known to the catalog")]
    NotFound(MovieId),
    /// Transport or decoding failure in a host catalog (e.g. an HTTP client).
    #[error("lookup for movie {id} failed: {reason}")]
    LookupFailed { id: MovieId, reason: String },
}

/// Source of candidate movies and their details.
///
/// Platform-specific implementations (HTTP clients, bundled data) provide this.
pub trait MovieCatalog {
    /// Ordered bank of candidate ids. The ordering must be stable for the
    /// lifetime of a session so daily selection stays consistent.
    fn candidate_ids(&self) -> &[MovieId];

    /// Resolve the full record of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be fetched or parsed.
    fn fetch_details(&self, id: MovieId) -> Result<MovieRecord, LookupError>;
}

/// Fetch details, substituting [`MovieRecord::degraded`] when the lookup fails.
pub fn fetch_or_degraded<C: MovieCatalog + ?Sized>(catalog: &C, id: MovieId) -> MovieRecord {
    match catalog.fetch_details(id) {
        Ok(record) => record,
        Err(err) => {
            log::warn!("{err}; continuing with a degraded record");
            MovieRecord::degraded(id)
        }
    }
}

const BUNDLED_MOVIES: &str = include_str!("../assets/data/movies.json");

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    bank: Option<Vec<MovieId>>,
    movies: Vec<TmdbMovie>,
}

/// Catalog backed by records held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureCatalog {
    bank: Vec<MovieId>,
    records: HashMap<MovieId, MovieRecord>,
}

impl FixtureCatalog {
    /// Build a catalog whose bank is the records in the given order.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = MovieRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Load a fixture file: `{ "bank": [ids...]?, "movies": [TMDB details...] }`.
    ///
    /// When `bank` is omitted the movies' order defines it. Bank ids without a
    /// matching movie stay in the bank and fail lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a fixture file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: FixtureFile = serde_json::from_str(json)?;
        let records: Vec<MovieRecord> = file.movies.into_iter().map(MovieRecord::from).collect();
        let mut catalog = Self::from_records(records);
        if let Some(bank) = file.bank {
            catalog.bank = bank;
        }
        Ok(catalog)
    }

    /// The movie bank shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails to parse.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_MOVIES)
    }

    /// Add a record, appending its id to the bank if it is new.
    pub fn insert(&mut self, record: MovieRecord) {
        if !self.records.contains_key(&record.id) && !self.bank.contains(&record.id) {
            self.bank.push(record.id);
        }
        self.records.insert(record.id, record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    /// Records in bank order, skipping ids without details.
    pub fn records(&self) -> impl Iterator<Item = &MovieRecord> {
        self.bank.iter().filter_map(|id| self.records.get(id))
    }

    /// Case-insensitive title lookup.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&MovieRecord> {
        let needle = title.trim().to_lowercase();
        self.records()
            .find(|record| record.title.to_lowercase() == needle)
    }
}

impl MovieCatalog for FixtureCatalog {
    fn candidate_ids(&self) -> &[MovieId] {
        &self.bank
    }

    fn fetch_details(&self, id: MovieId) -> Result<MovieRecord, LookupError> {
        self.records
            .get(&id)
            .cloned()
            .ok_or(LookupError::NotFound(id))
    }
}
