//! Session configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::core::{GameConfig, TerminalCheck};
use crate::types::{MAX_GRID_SIZE, MIN_GRID_SIZE};

pub const ENV_GRID_SIZE: &str = "TUI2048_GRID_SIZE";
pub const ENV_SEED: &str = "TUI2048_SEED";
pub const ENV_WIN_VALUE: &str = "TUI2048_WIN_VALUE";
pub const ENV_MAX_PENDING: &str = "TUI2048_MAX_PENDING";
pub const ENV_JOURNAL_PATH: &str = "TUI2048_JOURNAL_PATH";
pub const ENV_CHECK_EVERY_TURN: &str = "TUI2048_CHECK_EVERY_TURN";

pub const DEFAULT_SEED: u32 = 1;
pub const DEFAULT_MAX_PENDING: usize = 16;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub seed: u32,
    /// Capacity of the command queue into the turn driver
    pub max_pending: usize,
    /// Append a JSON line per turn here when set
    pub journal_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: DEFAULT_SEED,
            max_pending: DEFAULT_MAX_PENDING,
            journal_path: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create from any key lookup; unset keys keep their defaults and
    /// unparsable ones are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let grid_size = parse_or(&lookup, ENV_GRID_SIZE, defaults.game.grid_size);
        let grid_size = if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
            grid_size
        } else {
            log::warn!(
                "{ENV_GRID_SIZE}={grid_size} outside {MIN_GRID_SIZE}..={MAX_GRID_SIZE}, using {}",
                defaults.game.grid_size
            );
            defaults.game.grid_size
        };

        let win_value = parse_or(&lookup, ENV_WIN_VALUE, defaults.game.win_value);
        let win_value = if win_value >= 4 && win_value.is_power_of_two() {
            win_value
        } else {
            log::warn!(
                "{ENV_WIN_VALUE}={win_value} is not a tile value of at least 4, using {}",
                defaults.game.win_value
            );
            defaults.game.win_value
        };

        let terminal_check = match lookup(ENV_CHECK_EVERY_TURN).as_deref().map(str::trim) {
            None | Some("") => defaults.game.terminal_check,
            Some(v) if is_truthy(v) => TerminalCheck::EveryTurn,
            Some(v) if is_falsy(v) => TerminalCheck::WhenFull,
            Some(v) => {
                log::warn!("{ENV_CHECK_EVERY_TURN}={v:?} is not a boolean, ignoring");
                defaults.game.terminal_check
            }
        };

        let game = GameConfig {
            grid_size,
            win_value,
            terminal_check,
            ..defaults.game
        };
        let game = match game.validate() {
            Ok(_) => game,
            Err(e) => {
                log::warn!("invalid game config ({e}), using defaults");
                defaults.game
            }
        };

        let journal_path = lookup(ENV_JOURNAL_PATH)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            game,
            seed: parse_or(&lookup, ENV_SEED, defaults.seed),
            max_pending: parse_or(&lookup, ENV_MAX_PENDING, defaults.max_pending).max(1),
            journal_path,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("{key}={raw:?} is not a valid value, ignoring");
            default
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn is_falsy(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}
