//! Chart randomizer core: option state, query compilation and draw history.
//!
//! Everything here is pure over two injected seams, a [`storage::KeyValueStore`]
//! and a [`database::ChartDatabase`], so it runs the same in the browser and
//! under `cargo test`.

use std::fmt;

pub mod config;
pub mod database;
pub mod debounce;
pub mod history;
pub mod levels;
pub mod logging;
pub mod migration;
pub mod options;
pub mod query;
pub mod range;
pub mod storage;
pub mod store;
pub mod utils;

pub use database::{Chart, ChartDatabase};
pub use history::DrawnChartSet;
pub use options::DrawConfiguration;
pub use store::{EditAction, OptionsStore};

/// A persisted or submitted option value that does not name a known member of its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionParseError {
    Count(String),
    Level(String),
    SranLevel(String),
    Difficulty(char),
    Folder(String),
    GameVersion(String),
}

impl fmt::Display for OptionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionParseError::Count(value) => write!(
                f,
                "Invalid count '{}' (must be {}-{})",
                value,
                config::DRAW_COUNT_MIN,
                config::DRAW_COUNT_MAX
            ),
            OptionParseError::Level(value) => write!(
                f,
                "Invalid level '{}' (must be {}-{})",
                value,
                config::LEVEL_MIN,
                config::LEVEL_MAX
            ),
            OptionParseError::SranLevel(value) => write!(f, "Unknown sran level '{}'", value),
            OptionParseError::Difficulty(letter) => {
                write!(f, "Unknown difficulty letter '{}' (use e, n, h, x)", letter)
            }
            OptionParseError::Folder(value) => write!(f, "Unknown folder '{}'", value),
            OptionParseError::GameVersion(value) => write!(f, "Unknown game version '{}'", value),
        }
    }
}

impl std::error::Error for OptionParseError {}
