//! Persistence contract and the serialized session snapshot.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::calendar::DateKey;
use crate::clues::GlobalClues;
use crate::constants::MAX_ATTEMPTS;
use crate::feedback::GuessHistoryEntry;
use crate::state::GameStatus;

/// Key/value store holding serialized session snapshots.
///
/// Platform-specific implementations (browser storage, files) provide this.
pub trait SessionStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `snapshot` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, snapshot: &str) -> Result<(), Self::Error>;

    /// Delete whatever is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, snapshot: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reasons a stored snapshot is rejected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot holds {count} guesses, more than the {max} allowed")]
    TooManyGuesses { count: usize, max: usize },
    #[error("snapshot state {state} does not fit its {count} guesses")]
    Inconsistent { state: GameStatus, count: usize },
    #[error("snapshot history does not belong to this mystery movie")]
    WrongMystery,
}

/// Everything needed to restore a session, minus the mystery movie itself,
/// which is re-selected from the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub date: DateKey,
    #[serde(default)]
    pub guesses: Vec<GuessHistoryEntry>,
    #[serde(default)]
    pub state: GameStatus,
    #[serde(default)]
    pub global_clues: GlobalClues,
}

impl SessionSnapshot {
    /// Serialize to the stored JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and sanity-check stored JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or the history breaks the
    /// attempt or state rules.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let count = self.guesses.len();
        if count > MAX_ATTEMPTS {
            return Err(SnapshotError::TooManyGuesses {
                count,
                max: MAX_ATTEMPTS,
            });
        }
        let consistent = match self.state {
            GameStatus::Playing => count < MAX_ATTEMPTS,
            GameStatus::Won => count > 0,
            GameStatus::Lost => count == MAX_ATTEMPTS,
        };
        if consistent {
            Ok(())
        } else {
            Err(SnapshotError::Inconsistent {
                state: self.state,
                count,
            })
        }
    }
}
