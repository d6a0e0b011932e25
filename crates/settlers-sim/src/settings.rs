//! Environment-driven configuration.
//!
//! `SETTLERS_CONFIG` names a JSON file with a full `GameConfig`;
//! `SETTLERS_PLAYERS` and `SETTLERS_SEED` override single fields on top.

use settlers_core::{ConfigError, GameConfig};
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_VAR: &str = "SETTLERS_CONFIG";
pub const PLAYERS_VAR: &str = "SETTLERS_PLAYERS";
pub const SEED_VAR: &str = "SETTLERS_SEED";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{var} must be a number, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Load the config from the process environment
pub fn from_env() -> Result<GameConfig, SettingsError> {
    load(|var| std::env::var(var).ok())
}

/// Load the config through `lookup`, which maps a variable name to its value
pub fn load<F>(lookup: F) -> Result<GameConfig, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            let json = std::fs::read_to_string(&path)
                .map_err(|source| SettingsError::Read { path, source })?;
            GameConfig::from_json(&json)?
        }
        None => GameConfig::default(),
    };

    if let Some(value) = lookup(PLAYERS_VAR) {
        config.player_count = parse(PLAYERS_VAR, value)?;
    }
    if let Some(value) = lookup(SEED_VAR) {
        config.seed = Some(parse(SEED_VAR, value)?);
    }

    config.validate()?;
    Ok(config)
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::NotANumber { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = load(env(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(env(&[(PLAYERS_VAR, "3"), (SEED_VAR, " 42 ")])).unwrap();
        assert_eq!(config.player_count, 3);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_values() {
        let err = load(env(&[(SEED_VAR, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::NotANumber { var: SEED_VAR, .. }
        ));

        let err = load(env(&[(PLAYERS_VAR, "6")])).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::InvalidPlayerCount(6))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load(env(&[(CONFIG_VAR, "/nonexistent/settlers.json")])).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
