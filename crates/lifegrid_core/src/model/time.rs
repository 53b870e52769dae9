//! Date arithmetic behind the life grid.
//!
//! # Responsibility
//! - Convert a birth date and "now" into lived days/weeks and fractional age.
//! - Map calendar dates onto `(year, week)` grid coordinates and back.
//!
//! # Invariants
//! - A grid year is exactly `WEEKS_PER_YEAR` weeks; it does not track the
//!   calendar year (a true year is ~52.18 weeks).
//! - `grid_coordinate` never returns a coordinate outside the grid.
//! - `lived_stats` never fails, even when `dob` is after `now`.

use super::cell::CellId;
use chrono::{Duration, NaiveDate};

/// Number of year rows on the grid.
pub const MAX_YEARS: u16 = 100;
/// Number of week columns per grid year.
pub const WEEKS_PER_YEAR: u16 = 52;
/// Total cells on the grid.
pub const TOTAL_WEEKS: u32 = MAX_YEARS as u32 * WEEKS_PER_YEAR as u32;

const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_YEAR: f64 = 365.25;

/// Lived-time summary for one birth date at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivedStats {
    pub lived_days: i64,
    pub lived_weeks: i64,
    pub age_years: f64,
}

/// Computes lived days, lived weeks and fractional age.
///
/// Uses the absolute day difference, so a `dob` after `now` yields a
/// non-negative (if odd) result instead of an error.
pub fn lived_stats(dob: NaiveDate, now: NaiveDate) -> LivedStats {
    let lived_days = (now - dob).num_days().abs();
    LivedStats {
        lived_days,
        lived_weeks: lived_days / DAYS_PER_WEEK,
        age_years: lived_days as f64 / DAYS_PER_YEAR,
    }
}

/// Maps `event_date` to the grid cell it falls in, relative to `dob`.
///
/// Returns `None` when the date predates birth or lies at/after the
/// `MAX_YEARS` horizon.
pub fn grid_coordinate(dob: NaiveDate, event_date: NaiveDate) -> Option<CellId> {
    let diff_days = (event_date - dob).num_days();
    let diff_weeks = diff_days.div_euclid(DAYS_PER_WEEK);
    if diff_weeks < 0 {
        return None;
    }

    let weeks_per_year = i64::from(WEEKS_PER_YEAR);
    let year = diff_weeks / weeks_per_year;
    if year >= i64::from(MAX_YEARS) {
        return None;
    }

    let week = diff_weeks % weeks_per_year;
    // Both bounds were checked above, so the conversion is lossless.
    CellId::new(year as u16, week as u16).ok()
}

/// Returns the first day of a grid cell: `dob + (year*52 + week) * 7` days.
///
/// Left inverse of [`grid_coordinate`] for every cell on the grid.
pub fn cell_start_date(dob: NaiveDate, cell: CellId) -> Option<NaiveDate> {
    let offset_days = i64::from(cell.week_count()) * DAYS_PER_WEEK;
    dob.checked_add_signed(Duration::days(offset_days))
}

/// Whole days elapsed from `start` to `now`; negative for a future start.
pub fn elapsed_days(start: NaiveDate, now: NaiveDate) -> i64 {
    (now - start).num_days()
}

#[cfg(test)]
mod tests {
    use super::{cell_start_date, grid_coordinate, lived_stats, MAX_YEARS, WEEKS_PER_YEAR};
    use crate::model::cell::CellId;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn two_weeks_after_birth() {
        let stats = lived_stats(date(2000, 1, 1), date(2000, 1, 15));
        assert_eq!(stats.lived_days, 14);
        assert_eq!(stats.lived_weeks, 2);
    }

    #[test]
    fn dob_after_now_is_tolerated() {
        let stats = lived_stats(date(2000, 1, 15), date(2000, 1, 1));
        assert_eq!(stats.lived_days, 14);
        assert_eq!(stats.lived_weeks, 2);
        assert!(stats.age_years > 0.0);
    }

    #[test]
    fn birth_day_maps_to_origin() {
        let dob = date(2000, 1, 1);
        assert_eq!(grid_coordinate(dob, dob), Some(CellId::new(0, 0).unwrap()));
    }

    #[test]
    fn day_before_birth_is_off_grid() {
        let dob = date(2000, 1, 1);
        assert_eq!(grid_coordinate(dob, date(1999, 12, 31)), None);
    }

    #[test]
    fn horizon_is_exclusive() {
        let dob = date(2000, 1, 1);
        let total_days = i64::from(MAX_YEARS) * i64::from(WEEKS_PER_YEAR) * 7;
        let horizon = dob + Duration::days(total_days);
        assert_eq!(grid_coordinate(dob, horizon), None);
        assert_eq!(
            grid_coordinate(dob, horizon - Duration::days(1)),
            Some(CellId::new(MAX_YEARS - 1, WEEKS_PER_YEAR - 1).unwrap())
        );
    }

    #[test]
    fn cell_start_date_roundtrips_for_sampled_cells() {
        let dob = date(1987, 6, 30);
        for year in [0, 1, 17, 50, 99] {
            for week in [0, 1, 26, 51] {
                let cell = CellId::new(year, week).unwrap();
                let start = cell_start_date(dob, cell).expect("in range");
                assert_eq!(grid_coordinate(dob, start), Some(cell));
                assert_eq!(grid_coordinate(dob, start + Duration::days(6)), Some(cell));
            }
        }
    }
}
