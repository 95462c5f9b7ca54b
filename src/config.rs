//! Application-level configuration constants.

use crate::options::GameVersion;

// UI Behavior
pub const DEBOUNCE_MS: u32 = 300;

// Draw count limits
pub const DRAW_COUNT_MIN: u8 = 1;
pub const DRAW_COUNT_MAX: u8 = 10;

// Level domain
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 50;

/// Upper bound on the total number of charts kept in persisted history.
pub const MAX_DRAWN_CHARTS: usize = 1000;

/// Current shape of the persisted option keys. Bumped whenever a migration is added.
pub const OPTIONS_SCHEMA_VERSION: u32 = 2;

// Default values for draw options
pub const DEFAULT_COUNT: u8 = 4;
pub const DEFAULT_LEVEL_MIN: u8 = 30;
pub const DEFAULT_LEVEL_MAX: u8 = 40;
pub const DEFAULT_SRAN_LEVEL_MIN: &str = "01a";
pub const DEFAULT_SRAN_LEVEL_MAX: &str = "05";
pub const DEFAULT_GAME_VERSION: GameVersion = GameVersion::Unilab0731;

/// Game version used to resolve history entries written before versions were recorded.
pub const LEGACY_HISTORY_GAME_VERSION: GameVersion = GameVersion::Unilab0731;
