use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::DateKey;

/// Which kind of mystery a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Shared puzzle of the day.
    #[default]
    Daily,
    /// Replay session with a seeded random mystery.
    Random,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "random" => Ok(Self::Random),
            _ => Err(()),
        }
    }
}

/// Where a session stands. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "playing"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Storage key of a session: `<mode>-<date or seed>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    mode: GameMode,
    token: String,
}

impl SessionKey {
    #[must_use]
    pub fn daily(date: DateKey) -> Self {
        Self {
            mode: GameMode::Daily,
            token: date.to_string(),
        }
    }

    #[must_use]
    pub fn random(seed: u64) -> Self {
        Self {
            mode: GameMode::Random,
            token: seed.to_string(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// The date (daily) or seed (random) part of the key.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.mode, self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_mode_and_token() {
        let date: DateKey = "2026-10-16".parse().unwrap();
        assert_eq!(SessionKey::daily(date).to_string(), "daily-2026-10-16");
        assert_eq!(SessionKey::random(1337).to_string(), "random-1337");
        assert_eq!(SessionKey::random(1337).mode(), GameMode::Random);
    }

    #[test]
    fn mode_parses_its_own_labels() {
        for mode in [GameMode::Daily, GameMode::Random] {
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
        }
        assert!("weekly".parse::<GameMode>().is_err());
    }

    #[test]
    fn only_playing_is_open() {
        assert!(!GameStatus::Playing.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
        assert_eq!(serde_json::to_string(&GameStatus::Won).unwrap(), "\"won\"");
    }
}
