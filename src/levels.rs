//! Ordered level domains shared by the range editor and the query compiler.
//!
//! Two domains exist: plain numeric levels (`1..=50`) and the categorical
//! sran scale. Sran labels are ordered by their position in [`SRAN_LEVELS`],
//! never by string comparison.

use crate::config::{LEVEL_MAX, LEVEL_MIN};
use crate::OptionParseError;
use std::fmt;
use std::str::FromStr;

/// Every sran level label in ascending order.
pub const SRAN_LEVELS: [&str; 23] = [
    "01a", "01b", "02a", "02b", "03a", "03b", "04a", "04b", "05", "06", "07", "08", "09", "10",
    "11", "12", "13", "14", "15", "16", "17", "18", "19",
];

/// A totally ordered, bounded domain that level bounds can range over.
pub trait RangeDomain: Copy + Ord + fmt::Display + fmt::Debug {
    /// Smallest value of the domain.
    const FIRST: Self;
    /// Largest value of the domain.
    const LAST: Self;
    /// Field name used in compiled query segments (`lv`, `srlv`).
    const QUERY_KEY: &'static str;

    /// Next value, saturating at [`RangeDomain::LAST`].
    fn step_up(self) -> Self;
    /// Previous value, saturating at [`RangeDomain::FIRST`].
    fn step_down(self) -> Self;
    /// Parse a single token of a free-text range expression.
    fn parse_token(token: &str) -> Option<Self>;
}

/// Numeric chart level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub fn new(value: u8) -> Option<Self> {
        (LEVEL_MIN..=LEVEL_MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All levels in ascending order, for select controls.
    pub fn all() -> impl Iterator<Item = Level> {
        (LEVEL_MIN..=LEVEL_MAX).map(Level)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Level {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s).ok_or_else(|| OptionParseError::Level(s.to_string()))
    }
}

impl RangeDomain for Level {
    const FIRST: Self = Level(LEVEL_MIN);
    const LAST: Self = Level(LEVEL_MAX);
    const QUERY_KEY: &'static str = "lv";

    fn step_up(self) -> Self {
        Level(self.0.saturating_add(1).min(LEVEL_MAX))
    }

    fn step_down(self) -> Self {
        Level(self.0.saturating_sub(1).max(LEVEL_MIN))
    }

    fn parse_token(token: &str) -> Option<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u8>().ok().and_then(Level::new)
    }
}

/// Sran level, stored as its rank in [`SRAN_LEVELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SranLevel(u8);

impl SranLevel {
    pub fn from_rank(rank: usize) -> Option<Self> {
        (rank < SRAN_LEVELS.len()).then(|| Self(rank as u8))
    }

    pub fn rank(self) -> usize {
        self.0 as usize
    }

    /// Canonical label, e.g. `"01a"` or `"05"`.
    pub fn label(self) -> &'static str {
        SRAN_LEVELS[self.rank()]
    }

    /// Human-facing label: `"01a"` reads `"1-"`, `"01b"` reads `"1+"`, `"05"` reads `"5"`.
    pub fn display_name(self) -> String {
        self.label()
            .replace('a', "-")
            .replace('b', "+")
            .trim_start_matches('0')
            .to_string()
    }

    pub fn all() -> impl Iterator<Item = SranLevel> {
        (0..SRAN_LEVELS.len()).map(|rank| SranLevel(rank as u8))
    }
}

impl fmt::Display for SranLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SranLevel {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s).ok_or_else(|| OptionParseError::SranLevel(s.to_string()))
    }
}

impl RangeDomain for SranLevel {
    const FIRST: Self = SranLevel(0);
    const LAST: Self = SranLevel(SRAN_LEVELS.len() as u8 - 1);
    const QUERY_KEY: &'static str = "srlv";

    fn step_up(self) -> Self {
        SranLevel((self.0 + 1).min(Self::LAST.0))
    }

    fn step_down(self) -> Self {
        SranLevel(self.0.saturating_sub(1))
    }

    /// Accepts `"01a"`, `"1a"`, `"05"` and `"5"` (case-insensitive tier letter).
    fn parse_token(token: &str) -> Option<Self> {
        let lowered = token.trim().to_ascii_lowercase();
        let digits_end = lowered
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(lowered.len());
        let (digits, tier) = lowered.split_at(digits_end);
        if digits.is_empty() || !matches!(tier, "" | "a" | "b") {
            return None;
        }
        let number: u8 = digits.parse().ok()?;
        let label = format!("{:02}{}", number, tier);
        SRAN_LEVELS
            .iter()
            .position(|&l| l == label)
            .and_then(SranLevel::from_rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_domain_is_bounded() {
        assert!(Level::new(0).is_none());
        assert!(Level::new(51).is_none());
        assert_eq!(Level::new(50), Some(Level::LAST));
        assert_eq!(Level::LAST.step_up(), Level::LAST);
        assert_eq!(Level::FIRST.step_down(), Level::FIRST);
        assert_eq!(Level::all().count(), 50);
    }

    #[test]
    fn level_tokens_reject_signs_and_garbage() {
        assert_eq!(Level::parse_token(" 12 "), Level::new(12));
        assert!(Level::parse_token("+12").is_none());
        assert!(Level::parse_token("12a").is_none());
        assert!(Level::parse_token("").is_none());
    }

    #[test]
    fn sran_levels_order_by_rank() {
        let a: SranLevel = "01a".parse().unwrap();
        let b: SranLevel = "01b".parse().unwrap();
        let five: SranLevel = "05".parse().unwrap();
        let nineteen: SranLevel = "19".parse().unwrap();
        assert!(a < b && b < five && five < nineteen);
        assert_eq!(nineteen, SranLevel::LAST);
    }

    #[test]
    fn sran_tokens_accept_short_forms() {
        assert_eq!(SranLevel::parse_token("1a").map(SranLevel::label), Some("01a"));
        assert_eq!(SranLevel::parse_token("3B").map(SranLevel::label), Some("03b"));
        assert_eq!(SranLevel::parse_token("5").map(SranLevel::label), Some("05"));
        assert!(SranLevel::parse_token("05a").is_none());
        assert!(SranLevel::parse_token("20").is_none());
        assert!(SranLevel::parse_token("a").is_none());
    }

    #[test]
    fn sran_display_names() {
        assert_eq!(SranLevel::FIRST.display_name(), "1-");
        assert_eq!("04b".parse::<SranLevel>().unwrap().display_name(), "4+");
        assert_eq!("12".parse::<SranLevel>().unwrap().display_name(), "12");
    }

    #[test]
    fn sran_stepping_saturates() {
        assert_eq!(SranLevel::FIRST.step_down(), SranLevel::FIRST);
        assert_eq!(SranLevel::LAST.step_up(), SranLevel::LAST);
        assert_eq!(SranLevel::FIRST.step_up().label(), "01b");
    }
}
