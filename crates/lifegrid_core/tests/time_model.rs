use chrono::{Duration, NaiveDate};
use lifegrid_core::{
    cell_start_date, grid_coordinate, lived_stats, CellId, MAX_YEARS, WEEKS_PER_YEAR,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn lived_weeks_is_floor_of_lived_days() {
    let dob = date(1975, 2, 28);
    for offset in [0_i64, 1, 6, 7, 8, 13, 14, 365, 366, 10_000, 36_524] {
        let now = dob + Duration::days(offset);
        let stats = lived_stats(dob, now);
        assert_eq!(stats.lived_days, offset);
        assert_eq!(stats.lived_weeks, offset / 7);
        assert!(stats.lived_weeks >= 0);
        assert!((stats.age_years - offset as f64 / 365.25).abs() < 1e-12);
    }
}

#[test]
fn fifteenth_of_january_is_two_weeks_in() {
    let stats = lived_stats(date(2000, 1, 1), date(2000, 1, 15));
    assert_eq!(stats.lived_days, 14);
    assert_eq!(stats.lived_weeks, 2);
}

#[test]
fn every_cell_start_projects_back_to_itself() {
    let dob = date(1992, 2, 29);
    for year in 0..MAX_YEARS {
        for week in 0..WEEKS_PER_YEAR {
            let cell = CellId::new(year, week).unwrap();
            let start = cell_start_date(dob, cell).unwrap();
            assert_eq!(grid_coordinate(dob, start), Some(cell), "cell {cell}");
        }
    }
}

#[test]
fn dates_outside_the_grid_have_no_coordinate() {
    let dob = date(2000, 1, 1);
    let horizon_days = i64::from(MAX_YEARS) * i64::from(WEEKS_PER_YEAR) * 7;

    for before in [1_i64, 6, 7, 400] {
        assert_eq!(grid_coordinate(dob, dob - Duration::days(before)), None);
    }
    for after in [0_i64, 1, 7, 1_000] {
        assert_eq!(
            grid_coordinate(dob, dob + Duration::days(horizon_days + after)),
            None
        );
    }
}

#[test]
fn milestone_on_birthday_is_origin_cell() {
    let dob = date(2000, 1, 1);
    assert_eq!(grid_coordinate(dob, dob).map(|cell| cell.to_string()), Some("0-0".to_string()));
}

#[test]
fn grid_year_drifts_from_calendar_year() {
    // 52 weeks is 364 days, so a first birthday lands in grid year 1 week 0
    // or later, never in year 0.
    let dob = date(2000, 1, 1);
    let first_birthday = grid_coordinate(dob, date(2001, 1, 1)).unwrap();
    assert_eq!((first_birthday.year(), first_birthday.week()), (1, 0));
    let tenth_birthday = grid_coordinate(dob, date(2010, 1, 1)).unwrap();
    assert_eq!((tenth_birthday.year(), tenth_birthday.week()), (10, 1));
}
