//! Grid cell identity.
//!
//! # Responsibility
//! - Define the composite `(year, week)` key that addresses one grid cell.
//! - Own the `"<year>-<week>"` text form used as the persisted mapping key.
//!
//! # Invariants
//! - `year < MAX_YEARS` and `week < WEEKS_PER_YEAR` for every constructed id.
//! - Ordering is numeric: by year, then week. The text form is never used as
//!   a sort key.

use super::time::{MAX_YEARS, WEEKS_PER_YEAR};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static CELL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})-(\d{1,2})$").expect("valid cell id regex"));

/// Validation error for cell identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellIdError {
    /// Text is not `<int>-<int>`.
    Malformed(String),
    YearOutOfRange(u16),
    WeekOutOfRange(u16),
}

impl Display for CellIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed cell id `{value}`"),
            Self::YearOutOfRange(year) => {
                write!(f, "year index {year} is outside [0, {MAX_YEARS})")
            }
            Self::WeekOutOfRange(week) => {
                write!(f, "week index {week} is outside [0, {WEEKS_PER_YEAR})")
            }
        }
    }
}

impl Error for CellIdError {}

/// Composite key of one grid cell.
///
/// Serialized as `"<year>-<week>"` (unpadded) to stay compatible with
/// previously stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    year: u16,
    week: u16,
}

impl CellId {
    /// Creates a cell id, rejecting coordinates outside the grid.
    pub fn new(year: u16, week: u16) -> Result<Self, CellIdError> {
        if year >= MAX_YEARS {
            return Err(CellIdError::YearOutOfRange(year));
        }
        if week >= WEEKS_PER_YEAR {
            return Err(CellIdError::WeekOutOfRange(week));
        }
        Ok(Self { year, week })
    }

    pub fn year(self) -> u16 {
        self.year
    }

    pub fn week(self) -> u16 {
        self.week
    }

    /// Zero-based index of this cell counted in weeks since birth.
    pub fn week_count(self) -> u32 {
        u32::from(self.year) * u32::from(WEEKS_PER_YEAR) + u32::from(self.week)
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.week)
    }
}

impl FromStr for CellId {
    type Err = CellIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = CELL_ID_RE
            .captures(value)
            .ok_or_else(|| CellIdError::Malformed(value.to_string()))?;
        let parse = |index: usize| -> Result<u16, CellIdError> {
            caps[index]
                .parse::<u16>()
                .map_err(|_| CellIdError::Malformed(value.to_string()))
        };
        Self::new(parse(1)?, parse(2)?)
    }
}

impl TryFrom<String> for CellId {
    type Error = CellIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(value: CellId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CellId, CellIdError};

    #[test]
    fn parses_unpadded_text() {
        let cell: CellId = "9-5".parse().unwrap();
        assert_eq!((cell.year(), cell.week()), (9, 5));
        assert_eq!(cell.to_string(), "9-5");
    }

    #[test]
    fn rejects_out_of_range_and_malformed_text() {
        assert_eq!(
            "100-0".parse::<CellId>(),
            Err(CellIdError::YearOutOfRange(100))
        );
        assert_eq!("3-52".parse::<CellId>(), Err(CellIdError::WeekOutOfRange(52)));
        assert!(matches!(
            "3_5".parse::<CellId>(),
            Err(CellIdError::Malformed(_))
        ));
        assert!(matches!(
            "-1-5".parse::<CellId>(),
            Err(CellIdError::Malformed(_))
        ));
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let earlier: CellId = "9-5".parse().unwrap();
        let later: CellId = "10-2".parse().unwrap();
        assert!(earlier < later);
        assert!("9-5" > "10-2");
    }
}
