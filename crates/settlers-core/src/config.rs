//! Game configuration.

use crate::bank::STANDARD_SUPPLY;
use crate::errors::ErrorKind;
use crate::turn_order::RollOffPolicy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PLAYERS: u8 = 3;
pub const MAX_PLAYERS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Player count must be 3 or 4, got {0}")]
    InvalidPlayerCount(u8),

    #[error("Expected {expected} player names, got {got}")]
    NameCountMismatch { expected: usize, got: usize },

    #[error("Malformed config: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

/// Everything needed to set up a game.
///
/// Missing JSON fields fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_count: u8,
    /// Seat names; empty means "Player 1", "Player 2", ...
    pub player_names: Vec<String>,
    /// Seed for board layout and deck order. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Starting bank supply of each resource
    pub bank_supply: u32,
    pub roll_off: RollOffPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: MAX_PLAYERS,
            player_names: Vec::new(),
            seed: None,
            bank_supply: STANDARD_SUPPLY,
            roll_off: RollOffPolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn with_players(player_count: u8) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::InvalidPlayerCount(self.player_count));
        }
        if !self.player_names.is_empty() && self.player_names.len() != self.player_count as usize
        {
            return Err(ConfigError::NameCountMismatch {
                expected: self.player_count as usize,
                got: self.player_names.len(),
            });
        }
        Ok(())
    }

    /// Seat names, filling in defaults when none were given
    pub fn names(&self) -> Vec<String> {
        if self.player_names.is_empty() {
            (1..=self.player_count)
                .map(|n| format!("Player {}", n))
                .collect()
        } else {
            self.player_names.clone()
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
