//! Plain-text rendering of projected grids and stats.

use lifegrid_core::{CellCategory, GridCell, LifeGrid, LifeStats, MilestoneProgress};
use std::fmt::Write as _;

pub(crate) const LEGEND: &str =
    "legend: # lived  . ahead  H/T/N happy/tough/neutral (lowercase: no note)  @ this week  * milestone";

fn cell_symbol(cell: &GridCell) -> char {
    if cell.is_current {
        return '@';
    }
    if cell.has_milestone {
        return '*';
    }
    let symbol = match cell.category {
        CellCategory::Future => '.',
        CellCategory::Past => '#',
        CellCategory::Happy => 'H',
        CellCategory::Tough => 'T',
        CellCategory::Neutral => 'N',
    };
    // Lowercase marks a mood week without a note.
    if cell.has_note || !symbol.is_ascii_uppercase() {
        symbol
    } else {
        symbol.to_ascii_lowercase()
    }
}

pub(crate) fn grid(grid: &LifeGrid, years: u16) -> String {
    let mut out = String::new();
    for row in grid.rows.iter().take(usize::from(years)) {
        let label = if row.show_label {
            format!("{:>3}", row.year)
        } else {
            "   ".to_string()
        };
        let marker = if row.is_current_year { '>' } else { ' ' };
        let cells: String = row.cells.iter().map(cell_symbol).collect();
        let _ = writeln!(out, "{label}{marker}{cells}");
    }
    out.push_str(LEGEND);
    out
}

pub(crate) fn stats(name: &str, stats: &LifeStats, milestones: &[MilestoneProgress<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hello, {name}");
    let _ = writeln!(out, "life clock     {}", stats.clock.display());
    let _ = writeln!(
        out,
        "weeks lived    {} ({:.1}% of 5200)",
        stats.lived.lived_weeks, stats.lived_share_percent
    );
    let _ = writeln!(out, "days lived     {}", stats.lived.lived_days);
    let _ = writeln!(out, "age            {:.2}", stats.lived.age_years);
    let _ = writeln!(out, "years asleep   {:.1}", stats.sleep_years);
    if milestones.is_empty() {
        out.push_str("no milestones yet\n");
    }
    for progress in milestones {
        let _ = writeln!(
            out,
            "{:>6} days  {}  (since {}, id {})",
            progress.elapsed_days,
            progress.milestone.label,
            progress.milestone.start_date,
            progress.milestone.id
        );
    }
    out
}
