//! Command-line surface: global options and one subcommand per user action.
//!
//! Options fall back to `LIFEGRID_*` environment variables.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lifegrid_core::Mood;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lifegrid")]
#[command(
    about = "Your life as 5200 weeks: annotate weeks, track milestones, reflect",
    long_about = None
)]
#[command(version)]
pub(crate) struct Cli {
    /// Directory holding the local database.
    #[arg(long, global = true, env = "LIFEGRID_DATA_DIR")]
    pub(crate) data_dir: Option<PathBuf>,
    /// Directory for rolling log files. Defaults to <data-dir>/logs.
    #[arg(long, global = true, env = "LIFEGRID_LOG_DIR")]
    pub(crate) log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "LIFEGRID_LOG_LEVEL")]
    pub(crate) log_level: Option<String>,
    /// Evaluate as of this date (YYYY-MM-DD) instead of today.
    #[arg(long, global = true)]
    pub(crate) today: Option<NaiveDate>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Record date of birth and an optional name.
    Onboard {
        /// Date of birth, YYYY-MM-DD.
        #[arg(long)]
        dob: String,
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Inspect or annotate one week.
    #[command(subcommand)]
    Week(WeekCommand),

    /// Manage ongoing milestones.
    #[command(subcommand)]
    Milestone(MilestoneCommand),

    /// Print the life grid.
    Grid {
        /// Only print the first N years.
        #[arg(long, default_value_t = lifegrid_core::MAX_YEARS)]
        years: u16,
    },

    /// Print lived time, life clock and milestone counters.
    Stats,

    /// Ask for a short generated reflection on recent notes.
    Insight,

    /// Erase every record. Irreversible.
    Reset {
        /// Confirm that all records should be erased.
        #[arg(long)]
        yes: bool,
    },

    /// Print the core library version.
    Version,
}

#[derive(Args)]
pub(crate) struct CellArgs {
    /// Zero-based year row (age).
    pub(crate) year: u16,
    /// Zero-based week column.
    pub(crate) week: u16,
}

#[derive(Subcommand)]
pub(crate) enum WeekCommand {
    /// Show the annotation of a week.
    Show(CellArgs),
    /// Save mood and note for a week, replacing any previous entry.
    Save {
        #[command(flatten)]
        cell: CellArgs,
        /// happy|tough|neutral|none
        #[arg(long, default_value = "neutral")]
        mood: Mood,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum MilestoneCommand {
    /// List milestones with elapsed days.
    List,
    /// Add a milestone.
    Add {
        #[arg(long)]
        label: String,
        /// Start date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
    },
    /// Delete a milestone by id.
    Delete { id: String },
}
