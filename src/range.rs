//! Paired level bounds and the free-text range grammar.
//!
//! Every edit to one end of a pair goes through [`Bounds::with_min`] or
//! [`Bounds::with_max`], which drag the other end along so that
//! `min <= max` holds after every transition.

use crate::levels::RangeDomain;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// `N`, `N-`, `-N`, `N-M` with arbitrary whitespace around the tokens.
static RANGE_EXPR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\w*)\s*(-?)\s*(\w*)\s*$").unwrap());

/// Which end of a pair an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Direction of a stepper button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// A `(min, max)` pair with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    min: T,
    max: T,
}

impl<T: RangeDomain> Bounds<T> {
    pub fn new(min: T, max: T) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// The whole domain.
    pub fn full() -> Self {
        Self {
            min: T::FIRST,
            max: T::LAST,
        }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    /// Set the lower end, raising the upper end if it would fall below.
    pub fn with_min(self, new_min: T) -> Self {
        Self {
            min: new_min,
            max: self.max.max(new_min),
        }
    }

    /// Set the upper end, lowering the lower end if it would rise above.
    pub fn with_max(self, new_max: T) -> Self {
        Self {
            min: self.min.min(new_max),
            max: new_max,
        }
    }

    pub fn with(self, bound: Bound, value: T) -> Self {
        match bound {
            Bound::Min => self.with_min(value),
            Bound::Max => self.with_max(value),
        }
    }

    /// Step one end by one domain unit, clamped to the domain.
    pub fn step(self, bound: Bound, step: Step) -> Self {
        let current = match bound {
            Bound::Min => self.min,
            Bound::Max => self.max,
        };
        let next = match step {
            Step::Up => current.step_up(),
            Step::Down => current.step_down(),
        };
        self.with(bound, next)
    }
}

/// Committed level selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSpec<T> {
    Any,
    Exact(T),
    Range(Bounds<T>),
}

impl<T: RangeDomain> LevelSpec<T> {
    /// Collapses a degenerate pair into [`LevelSpec::Exact`].
    pub fn from_bounds(bounds: Bounds<T>) -> Self {
        if bounds.min == bounds.max {
            LevelSpec::Exact(bounds.min)
        } else {
            LevelSpec::Range(bounds)
        }
    }

    /// Bounds a stepper or select starts from.
    pub fn bounds(&self) -> Bounds<T> {
        match *self {
            LevelSpec::Any => Bounds::full(),
            LevelSpec::Exact(value) => Bounds {
                min: value,
                max: value,
            },
            LevelSpec::Range(bounds) => bounds,
        }
    }

    pub fn with(self, bound: Bound, value: T) -> Self {
        Self::from_bounds(self.bounds().with(bound, value))
    }

    pub fn step(self, bound: Bound, step: Step) -> Self {
        Self::from_bounds(self.bounds().step(bound, step))
    }

    /// Text a free-text input shows for this spec: `""`, `"12"` or `"12-34"`.
    pub fn canonical_text(&self) -> String {
        match self {
            LevelSpec::Any => String::new(),
            LevelSpec::Exact(value) => value.to_string(),
            LevelSpec::Range(bounds) => format!("{}-{}", bounds.min, bounds.max),
        }
    }

    /// Parse a free-text range expression.
    ///
    /// Valid forms are `N`, `N-`, `-N` and `N-M`; open ends default to the
    /// domain's first/last value. `N-M` with `N > M` is rejected.
    pub fn parse(text: &str) -> Result<Self, RangeParseError> {
        if text.trim().is_empty() {
            return Err(RangeParseError::Empty);
        }
        let captures = RANGE_EXPR_REGEX
            .captures(text)
            .ok_or_else(|| RangeParseError::Malformed(text.to_string()))?;
        let lower = &captures[1];
        let has_dash = !captures[2].is_empty();
        let upper = &captures[3];

        let parse = |token: &str| {
            T::parse_token(token).ok_or_else(|| RangeParseError::InvalidToken(token.to_string()))
        };

        match (lower.is_empty(), has_dash, upper.is_empty()) {
            (false, false, true) => Ok(LevelSpec::Exact(parse(lower)?)),
            (false, true, true) => Ok(Self::from_bounds(Bounds {
                min: parse(lower)?,
                max: T::LAST,
            })),
            (true, true, false) => Ok(Self::from_bounds(Bounds {
                min: T::FIRST,
                max: parse(upper)?,
            })),
            (false, true, false) => {
                let min = parse(lower)?;
                let max = parse(upper)?;
                Bounds::new(min, max)
                    .map(Self::from_bounds)
                    .ok_or_else(|| RangeParseError::Inverted {
                        min: min.to_string(),
                        max: max.to_string(),
                    })
            }
            _ => Err(RangeParseError::Malformed(text.to_string())),
        }
    }
}

/// Why a free-text range expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    Empty,
    Malformed(String),
    InvalidToken(String),
    Inverted { min: String, max: String },
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeParseError::Empty => write!(f, "Range cannot be empty"),
            RangeParseError::Malformed(text) => {
                write!(f, "Invalid range '{}'. Use: 12, 12-, -34, or 12-34", text)
            }
            RangeParseError::InvalidToken(token) => write!(f, "'{}' is not a valid level", token),
            RangeParseError::Inverted { min, max } => {
                write!(f, "Lower level {} is above upper level {}", min, max)
            }
        }
    }
}

impl std::error::Error for RangeParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{Level, SranLevel};
    use proptest::prelude::*;

    fn lv(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    fn range(min: u8, max: u8) -> LevelSpec<Level> {
        LevelSpec::Range(Bounds::new(lv(min), lv(max)).unwrap())
    }

    proptest! {
        #[test]
        fn set_min_raises_max_only_when_needed(min in 1u8..=50, max in 1u8..=50, new_min in 1u8..=50) {
            prop_assume!(min <= max);
            let bounds = Bounds::new(lv(min), lv(max)).unwrap().with_min(lv(new_min));
            prop_assert_eq!(bounds.min(), lv(new_min));
            prop_assert_eq!(bounds.max(), lv(max.max(new_min)));
        }

        #[test]
        fn set_max_lowers_min_only_when_needed(min in 1u8..=50, max in 1u8..=50, new_max in 1u8..=50) {
            prop_assume!(min <= max);
            let bounds = Bounds::new(lv(min), lv(max)).unwrap().with_max(lv(new_max));
            prop_assert_eq!(bounds.max(), lv(new_max));
            prop_assert_eq!(bounds.min(), lv(min.min(new_max)));
        }
    }

    #[test]
    fn stepping_clamps_and_cross_adjusts() {
        let bounds = Bounds::new(lv(40), lv(40)).unwrap();
        let raised = bounds.step(Bound::Min, Step::Up);
        assert_eq!((raised.min(), raised.max()), (lv(41), lv(41)));

        let lowered = Bounds::new(lv(1), lv(3)).unwrap().step(Bound::Max, Step::Down);
        assert_eq!((lowered.min(), lowered.max()), (lv(1), lv(2)));

        let floor = Bounds::new(lv(1), lv(1)).unwrap().step(Bound::Max, Step::Down);
        assert_eq!((floor.min(), floor.max()), (lv(1), lv(1)));

        let ceiling = Bounds::<Level>::full().step(Bound::Max, Step::Up);
        assert_eq!(ceiling.max(), lv(50));
    }

    #[test]
    fn sran_bounds_use_rank_order() {
        let min: SranLevel = "04b".parse().unwrap();
        let max: SranLevel = "05".parse().unwrap();
        let bounds = Bounds::new(min, max).unwrap().with_min("06".parse().unwrap());
        assert_eq!(bounds.max().label(), "06");
        let bounds = bounds.with_max("01b".parse().unwrap());
        assert_eq!(bounds.min().label(), "01b");
    }

    #[test]
    fn parses_all_expression_forms() {
        assert_eq!(LevelSpec::parse("12"), Ok(LevelSpec::Exact(lv(12))));
        assert_eq!(LevelSpec::parse("12-34"), Ok(range(12, 34)));
        assert_eq!(LevelSpec::parse(" 12 - 34 "), Ok(range(12, 34)));
        assert_eq!(LevelSpec::parse("12-"), Ok(range(12, 50)));
        assert_eq!(LevelSpec::parse("-34"), Ok(range(1, 34)));
        assert_eq!(LevelSpec::parse("20-20"), Ok(LevelSpec::Exact(lv(20))));
    }

    #[test]
    fn rejects_invalid_expressions() {
        assert_eq!(LevelSpec::<Level>::parse(""), Err(RangeParseError::Empty));
        assert!(matches!(
            LevelSpec::<Level>::parse("34-12"),
            Err(RangeParseError::Inverted { .. })
        ));
        assert!(matches!(
            LevelSpec::<Level>::parse("0-12"),
            Err(RangeParseError::InvalidToken(_))
        ));
        assert!(matches!(
            LevelSpec::<Level>::parse("12-51"),
            Err(RangeParseError::InvalidToken(_))
        ));
        assert!(LevelSpec::<Level>::parse("-").is_err());
        assert!(LevelSpec::<Level>::parse("12 34").is_err());
        assert!(LevelSpec::<Level>::parse("1-2-3").is_err());
        assert!(LevelSpec::<Level>::parse("abc").is_err());
    }

    #[test]
    fn sran_expressions_use_labels() {
        let parsed = LevelSpec::<SranLevel>::parse("1a-05").unwrap();
        assert_eq!(parsed.canonical_text(), "01a-05");
        let open = LevelSpec::<SranLevel>::parse("18-").unwrap();
        assert_eq!(open.canonical_text(), "18-19");
        assert!(LevelSpec::<SranLevel>::parse("05-01a").is_err());
    }

    #[test]
    fn edits_on_any_start_from_full_domain() {
        let spec = LevelSpec::<Level>::Any.with(Bound::Min, lv(12));
        assert_eq!(spec, range(12, 50));
        let spec = LevelSpec::Exact(lv(20)).with(Bound::Max, lv(25));
        assert_eq!(spec, range(20, 25));
        let spec = range(20, 25).with(Bound::Max, lv(10));
        assert_eq!(spec, LevelSpec::Exact(lv(10)));
    }

    #[test]
    fn canonical_text_round_trips() {
        for spec in [LevelSpec::Exact(lv(7)), range(3, 9)] {
            assert_eq!(LevelSpec::parse(&spec.canonical_text()), Ok(spec));
        }
        assert_eq!(LevelSpec::<Level>::Any.canonical_text(), "");
    }
}
