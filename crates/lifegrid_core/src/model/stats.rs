//! Summary figures shown above the grid.

use super::snapshot::{Milestone, UserProfile};
use super::time::{elapsed_days, lived_stats, LivedStats, MAX_YEARS, TOTAL_WEEKS};
use chrono::NaiveDate;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const SLEEP_HOURS_PER_DAY: f64 = 8.0;

/// Age mapped onto one day: 100 years == 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeClock {
    pub hours: u32,
    pub minutes: u32,
}

impl LifeClock {
    pub fn from_age(age_years: f64) -> Self {
        let total_minutes = (age_years / f64::from(MAX_YEARS) * MINUTES_PER_DAY).max(0.0);
        Self {
            hours: (total_minutes / 60.0).floor() as u32,
            minutes: (total_minutes % 60.0).floor() as u32,
        }
    }

    /// `HH:MM`, zero padded.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Statistics header for one profile at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeStats {
    pub lived: LivedStats,
    pub clock: LifeClock,
    /// Share of the full grid already lived, in percent.
    pub lived_share_percent: f64,
    /// Estimated years spent asleep at eight hours a day.
    pub sleep_years: f64,
}

impl LifeStats {
    pub fn compute(profile: &UserProfile, now: NaiveDate) -> Self {
        let lived = lived_stats(profile.date_of_birth, now);
        Self {
            lived,
            clock: LifeClock::from_age(lived.age_years),
            lived_share_percent: lived.lived_weeks as f64 / f64::from(TOTAL_WEEKS) * 100.0,
            sleep_years: lived.lived_days as f64 * SLEEP_HOURS_PER_DAY / (24.0 * 365.0),
        }
    }

    /// Row of the grid the profile currently lives in.
    pub fn current_year(&self) -> u16 {
        self.lived.age_years.floor().clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

/// Milestone together with its elapsed-day counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneProgress<'a> {
    pub milestone: &'a Milestone,
    /// Negative when the start date lies in the future.
    pub elapsed_days: i64,
}

/// Pairs every milestone with its elapsed days, preserving display order.
pub fn milestone_progress(milestones: &[Milestone], now: NaiveDate) -> Vec<MilestoneProgress<'_>> {
    milestones
        .iter()
        .map(|milestone| MilestoneProgress {
            milestone,
            elapsed_days: elapsed_days(milestone.start_date, now),
        })
        .collect()
}
