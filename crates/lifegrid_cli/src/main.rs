//! LifeGrid command-line front-end.
//!
//! # Responsibility
//! - Map each user command onto exactly one core operation.
//! - Own process setup: data directory, logging, configuration.

mod cli;
mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Command, MilestoneCommand, WeekCommand};
use lifegrid_core::db::open_db;
use lifegrid_core::{
    cell_start_date, milestone_progress, project, BlobRepository, CellId, GeminiConfig,
    GeminiGenerator, InsightOutcome, InsightService, LifeStats, Mutation, Snapshot,
    SnapshotStore, SqliteBlobRepository, WeekAnnotation,
};
use log::info;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "lifegrid.sqlite3";
const DEFAULT_GREETING_NAME: &str = "Traveler";
const NOT_ONBOARDED: &str = "not onboarded yet; run `onboard`";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = absolute(resolve_data_dir(cli.data_dir.as_deref())?)?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

    let log_dir = match cli.log_dir.as_deref() {
        Some(dir) => absolute(dir.to_path_buf())?,
        None => data_dir.join("logs"),
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| lifegrid_core::default_log_level().to_string());
    if let Err(err) = lifegrid_core::init_logging(&level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let conn = open_db(data_dir.join(DB_FILE_NAME)).context("cannot open local database")?;
    let repo = SqliteBlobRepository::try_new(&conn)?;
    let mut store = SnapshotStore::open(repo);

    info!("event=cli_command module=cli status=start");
    run(cli.command, &mut store, today)
}

fn run<R: BlobRepository>(
    command: Command,
    store: &mut SnapshotStore<R>,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::Onboard { dob, name } => {
            if store.snapshot().profile.is_some() {
                bail!("already onboarded; use `reset --yes` to start over");
            }
            report(store.set_profile(&dob, &name)?, "profile saved")?;
            println!("Your 5200 weeks begin now.");
        }
        Command::Week(WeekCommand::Show(args)) => {
            let cell = CellId::new(args.year, args.week)?;
            print_week(store.snapshot(), cell);
        }
        Command::Week(WeekCommand::Save { cell, mood, note }) => {
            let cell = CellId::new(cell.year, cell.week)?;
            let annotation = WeekAnnotation::new(cell, note, mood);
            report(store.upsert_week(annotation)?, "week saved")?;
        }
        Command::Milestone(MilestoneCommand::List) => {
            let progress = milestone_progress(&store.snapshot().milestones, today);
            if progress.is_empty() {
                println!("no milestones yet");
            }
            for item in progress {
                let milestone = item.milestone;
                println!(
                    "{}  {}  {} days (since {})",
                    milestone.id, milestone.label, item.elapsed_days, milestone.start_date
                );
            }
        }
        Command::Milestone(MilestoneCommand::Add { label, date }) => {
            let outcome = report(store.add_milestone(&label, &date)?, "milestone added")?;
            if let Mutation::Applied(id) = outcome {
                println!("id {id}");
            }
        }
        Command::Milestone(MilestoneCommand::Delete { id }) => {
            report(store.remove_milestone(&id)?, "milestone deleted")?;
        }
        Command::Grid { years } => {
            let grid = project(store.snapshot(), today).context(NOT_ONBOARDED)?;
            println!("{}", render::grid(&grid, years));
        }
        Command::Stats => {
            let snapshot = store.snapshot();
            let profile = snapshot.profile.as_ref().context(NOT_ONBOARDED)?;
            let stats = LifeStats::compute(profile, today);
            let milestones = milestone_progress(&snapshot.milestones, today);
            print!(
                "{}",
                render::stats(profile.greeting_name(DEFAULT_GREETING_NAME), &stats, &milestones)
            );
        }
        Command::Insight => {
            let snapshot = store.snapshot();
            let profile = snapshot.profile.as_ref().context(NOT_ONBOARDED)?;
            let stats = LifeStats::compute(profile, today);
            let service = InsightService::new(GeminiGenerator::new(GeminiConfig::from_env()?));
            match service.request_insight(&snapshot.week_annotations, stats.lived.age_years) {
                InsightOutcome::Generated(text) | InsightOutcome::Fallback(text) => {
                    println!("{text}")
                }
                InsightOutcome::Busy => println!("a reflection is already being written"),
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!(
                    "reset erases every record and cannot be undone; re-run with --yes to confirm"
                );
            }
            store.reset()?;
            println!("all records erased");
        }
        Command::Version => println!("lifegrid {}", lifegrid_core::core_version()),
    }
    Ok(())
}

fn report<T>(outcome: Mutation<T>, applied_message: &str) -> Result<Mutation<T>> {
    match &outcome {
        Mutation::Applied(_) => println!("{applied_message}"),
        Mutation::Rejected(reason) => bail!("nothing changed: {reason}"),
    }
    Ok(outcome)
}

fn print_week(snapshot: &Snapshot, cell: CellId) {
    let starts = snapshot
        .profile
        .as_ref()
        .and_then(|profile| cell_start_date(profile.date_of_birth, cell));
    match starts {
        Some(date) => println!("age {}, week {} (starts {date})", cell.year(), cell.week() + 1),
        None => println!("age {}, week {}", cell.year(), cell.week() + 1),
    }
    match snapshot.annotation(cell) {
        Some(annotation) => {
            println!("mood  {}", annotation.mood);
            println!("note  {}", annotation.trimmed_note().unwrap_or("-"));
            println!("saved {}", annotation.recorded_at.to_rfc3339());
        }
        // The week form opens on Neutral for an empty week.
        None => println!("no entry yet (default mood NEUTRAL)"),
    }
}

fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".lifegrid")),
        _ => Ok(std::env::current_dir()?.join(".lifegrid")),
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::{Cli, Command, MilestoneCommand};
    use chrono::NaiveDate;
    use clap::Parser;
    use lifegrid_core::db::open_db_in_memory;
    use lifegrid_core::{SnapshotStore, SqliteBlobRepository};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn onboard(dob: &str) -> Command {
        Command::Onboard {
            dob: dob.to_string(),
            name: "Lin".to_string(),
        }
    }

    #[test]
    fn onboarding_twice_is_refused() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SnapshotStore::open(SqliteBlobRepository::try_new(&conn).unwrap());

        run(onboard("1990-05-17"), &mut store, today()).unwrap();
        let err = run(onboard("1991-01-01"), &mut store, today()).unwrap_err();

        assert!(err.to_string().contains("already onboarded"));
        let profile = store.snapshot().profile.as_ref().unwrap();
        assert_eq!(
            profile.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
    }

    #[test]
    fn reset_without_confirmation_keeps_everything() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SnapshotStore::open(SqliteBlobRepository::try_new(&conn).unwrap());
        run(onboard("1990-05-17"), &mut store, today()).unwrap();

        assert!(run(Command::Reset { yes: false }, &mut store, today()).is_err());
        assert!(store.snapshot().profile.is_some());
        assert!(store.load().profile.is_some());

        run(Command::Reset { yes: true }, &mut store, today()).unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn rejected_mutation_reports_nothing_changed() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SnapshotStore::open(SqliteBlobRepository::try_new(&conn).unwrap());

        let add = Command::Milestone(MilestoneCommand::Add {
            label: "  ".to_string(),
            date: "2020-01-01".to_string(),
        });
        let err = run(add, &mut store, today()).unwrap_err();

        assert!(err.to_string().starts_with("nothing changed:"));
        assert!(store.snapshot().milestones.is_empty());
    }

    #[test]
    fn views_need_a_profile() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SnapshotStore::open(SqliteBlobRepository::try_new(&conn).unwrap());

        assert!(run(Command::Stats, &mut store, today()).is_err());
        assert!(run(Command::Grid { years: 5 }, &mut store, today()).is_err());
    }

    #[test]
    fn version_is_a_subcommand() {
        let cli = Cli::try_parse_from(["lifegrid", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }
}
