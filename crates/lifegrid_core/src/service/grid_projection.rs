//! Grid projection: the render model of the 100x52 life grid.
//!
//! # Responsibility
//! - Derive every cell's lived status, color category and flags from one
//!   snapshot at one point in time.
//!
//! # Invariants
//! - Pure function of `(snapshot, now)`; safe to recompute on every render.
//! - A cell is never both past and current.
//! - An explicit mood always wins over the lived/unlived base category.
//! - Current-week and milestone emphasis never change the base category.

use crate::model::cell::CellId;
use crate::model::snapshot::{Mood, Snapshot};
use crate::model::time::{grid_coordinate, lived_stats, MAX_YEARS, WEEKS_PER_YEAR};
use chrono::NaiveDate;
use std::collections::BTreeSet;

const YEAR_LABEL_INTERVAL: u16 = 5;

/// Base color category of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCategory {
    Future,
    Past,
    Happy,
    Tough,
    Neutral,
}

impl CellCategory {
    fn from_mood(mood: Mood) -> Option<Self> {
        match mood {
            Mood::Happy => Some(Self::Happy),
            Mood::Tough => Some(Self::Tough),
            Mood::Neutral => Some(Self::Neutral),
            Mood::None => None,
        }
    }
}

/// Render model of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub cell_id: CellId,
    pub category: CellCategory,
    pub is_past: bool,
    /// Emphasis modifier for the week containing "now".
    pub is_current: bool,
    /// Emphasis modifier; one or more milestones start in this week.
    pub has_milestone: bool,
    pub has_note: bool,
    /// Hover text: "Age <year>, week <1-based week>[: <note>]".
    pub tooltip: String,
}

/// One year row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub year: u16,
    pub is_current_year: bool,
    /// Rows show their label every five years and on the current year.
    pub show_label: bool,
    pub cells: Vec<GridCell>,
}

/// Full projected grid, `MAX_YEARS` rows of `WEEKS_PER_YEAR` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeGrid {
    pub rows: Vec<GridRow>,
}

impl LifeGrid {
    pub fn cell(&self, cell_id: CellId) -> Option<&GridCell> {
        self.rows
            .get(usize::from(cell_id.year()))
            .and_then(|row| row.cells.get(usize::from(cell_id.week())))
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }
}

/// Projects the snapshot onto the grid as of `now`.
///
/// Returns `None` before onboarding, since the grid is anchored on the
/// date of birth.
pub fn project(snapshot: &Snapshot, now: NaiveDate) -> Option<LifeGrid> {
    let profile = snapshot.profile.as_ref()?;
    let dob = profile.date_of_birth;
    let lived = lived_stats(dob, now);
    let current_year = lived.age_years.floor() as i64;
    let milestone_cells: BTreeSet<CellId> = snapshot
        .milestones
        .iter()
        .filter_map(|milestone| grid_coordinate(dob, milestone.start_date))
        .collect();

    let mut rows = Vec::with_capacity(usize::from(MAX_YEARS));
    for year in 0..MAX_YEARS {
        let mut cells = Vec::with_capacity(usize::from(WEEKS_PER_YEAR));
        for week in 0..WEEKS_PER_YEAR {
            let Ok(cell_id) = CellId::new(year, week) else {
                continue;
            };
            let week_count = i64::from(cell_id.week_count());
            let is_past = week_count < lived.lived_weeks;
            let is_current = week_count == lived.lived_weeks;
            let annotation = snapshot.annotation(cell_id);

            let mut category = if is_past {
                CellCategory::Past
            } else {
                CellCategory::Future
            };
            if let Some(mood_category) =
                annotation.and_then(|annotation| CellCategory::from_mood(annotation.mood))
            {
                category = mood_category;
            }

            let note = annotation.and_then(|annotation| annotation.trimmed_note());
            let tooltip = match note {
                Some(note) => format!("Age {year}, week {}: {note}", week + 1),
                None => format!("Age {year}, week {}", week + 1),
            };

            cells.push(GridCell {
                cell_id,
                category,
                is_past,
                is_current,
                has_milestone: milestone_cells.contains(&cell_id),
                has_note: note.is_some(),
                tooltip,
            });
        }

        let is_current_year = i64::from(year) == current_year;
        rows.push(GridRow {
            year,
            is_current_year,
            show_label: year % YEAR_LABEL_INTERVAL == 0 || is_current_year,
            cells,
        });
    }

    Some(LifeGrid { rows })
}
