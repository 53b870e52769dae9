//! Snapshot store: the only write surface for application state.
//!
//! # Responsibility
//! - Own the in-memory `Snapshot` and every mutation applied to it.
//! - Persist the whole snapshot after each applied mutation.
//! - Degrade unreadable persisted state to the empty snapshot.
//!
//! # Invariants
//! - Validation failures are reported as `Mutation::Rejected`, never as
//!   errors, and leave both memory and storage untouched.
//! - Every `Mutation::Applied` result has already been written to storage.
//! - Week annotations are replaced wholesale, never field-merged.

use crate::model::snapshot::{Milestone, MilestoneId, Snapshot, UserProfile, WeekAnnotation};
use crate::repo::blob_repo::{BlobRepository, RepoError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key of the persisted snapshot blob.
pub const STORAGE_KEY: &str = "life_narrative_v1";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist the snapshot.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "snapshot write failed: {err}"),
            Self::Encode(err) => write!(f, "snapshot encoding failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Why a mutation was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    EmptyDateOfBirth,
    EmptyLabel,
    EmptyStartDate,
    /// Non-empty text that is not a `YYYY-MM-DD` date.
    InvalidDate(String),
    UnknownMilestone(MilestoneId),
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDateOfBirth => f.write_str("date of birth is required"),
            Self::EmptyLabel => f.write_str("milestone label is required"),
            Self::EmptyStartDate => f.write_str("milestone start date is required"),
            Self::InvalidDate(value) => write!(f, "`{value}` is not a YYYY-MM-DD date"),
            Self::UnknownMilestone(id) => write!(f, "no milestone with id `{id}`"),
        }
    }
}

/// Outcome of one store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T = ()> {
    Applied(T),
    Rejected(RejectReason),
}

impl<T> Mutation<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }
}

/// Store owning the current snapshot and its persistence hook.
pub struct SnapshotStore<R: BlobRepository> {
    repo: R,
    snapshot: Snapshot,
}

impl<R: BlobRepository> SnapshotStore<R> {
    /// Creates a store and loads the persisted snapshot.
    pub fn open(repo: R) -> Self {
        let mut store = Self {
            repo,
            snapshot: Snapshot::empty(),
        };
        store.load();
        store
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Reloads the snapshot from storage.
    ///
    /// Missing, unreadable or invalid data yields the empty snapshot.
    pub fn load(&mut self) -> &Snapshot {
        self.snapshot = match self.repo.read_blob(STORAGE_KEY) {
            Ok(Some(payload)) => match Snapshot::from_json(&payload) {
                Ok(snapshot) => {
                    info!(
                        "event=snapshot_load module=store status=ok annotations={} milestones={}",
                        snapshot.week_annotations.len(),
                        snapshot.milestones.len()
                    );
                    snapshot
                }
                Err(err) => {
                    warn!(
                        "event=snapshot_load module=store status=fallback reason=invalid_payload error={err}"
                    );
                    Snapshot::empty()
                }
            },
            Ok(None) => {
                info!("event=snapshot_load module=store status=fallback reason=absent");
                Snapshot::empty()
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=fallback reason=read_failed error={err}"
                );
                Snapshot::empty()
            }
        };
        &self.snapshot
    }

    /// Writes the full current snapshot, overwriting the stored value.
    pub fn save(&self) -> StoreResult<()> {
        let payload = self.snapshot.to_json()?;
        self.repo.write_blob(STORAGE_KEY, &payload).map_err(|err| {
            warn!("event=snapshot_save module=store status=error error={err}");
            StoreError::from(err)
        })
    }

    /// Sets the profile from onboarding form input.
    ///
    /// Rejected when `dob` is empty or not a date. Annotations and milestones
    /// are left untouched.
    pub fn set_profile(&mut self, dob: &str, name: &str) -> StoreResult<Mutation> {
        let date_of_birth = match parse_required_date(dob, RejectReason::EmptyDateOfBirth) {
            Ok(date) => date,
            Err(reason) => return Ok(self.reject("set_profile", reason)),
        };

        self.snapshot.profile = Some(UserProfile::new(date_of_birth, Some(name)));
        self.commit("set_profile")?;
        Ok(Mutation::Applied(()))
    }

    /// Inserts or wholesale replaces the annotation at its cell.
    pub fn upsert_week(&mut self, annotation: WeekAnnotation) -> StoreResult<Mutation> {
        let cell_id = annotation.cell_id;
        self.snapshot.week_annotations.insert(cell_id, annotation);
        info!("event=week_upsert module=store status=applied cell={cell_id}");
        self.commit("upsert_week")?;
        Ok(Mutation::Applied(()))
    }

    /// Appends a milestone and returns its generated id.
    pub fn add_milestone(
        &mut self,
        label: &str,
        start_date: &str,
    ) -> StoreResult<Mutation<MilestoneId>> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(self.reject("add_milestone", RejectReason::EmptyLabel));
        }
        let start_date = match parse_required_date(start_date, RejectReason::EmptyStartDate) {
            Ok(date) => date,
            Err(reason) => return Ok(self.reject("add_milestone", reason)),
        };

        let milestone = Milestone::new(label, start_date);
        let id = milestone.id.clone();
        self.snapshot.milestones.push(milestone);
        self.commit("add_milestone")?;
        Ok(Mutation::Applied(id))
    }

    /// Removes the first milestone whose id matches.
    pub fn remove_milestone(&mut self, id: &str) -> StoreResult<Mutation> {
        let Some(index) = self
            .snapshot
            .milestones
            .iter()
            .position(|milestone| milestone.id == id)
        else {
            return Ok(self.reject(
                "remove_milestone",
                RejectReason::UnknownMilestone(id.to_string()),
            ));
        };

        self.snapshot.milestones.remove(index);
        self.commit("remove_milestone")?;
        Ok(Mutation::Applied(()))
    }

    /// Discards all state and clears storage.
    ///
    /// When the delete fails the in-memory snapshot is kept, matching what a
    /// later `load` would return. Irreversible. Callers must have obtained explicit user confirmation.
    pub fn reset(&mut self) -> StoreResult<&Snapshot> {
        let existed = self.repo.delete_blob(STORAGE_KEY)?;
        self.snapshot = Snapshot::empty();
        info!("event=snapshot_reset module=store status=ok had_data={existed}");
        Ok(&self.snapshot)
    }

    fn commit(&self, operation: &'static str) -> StoreResult<()> {
        self.save()?;
        info!("event=snapshot_save module=store status=ok op={operation}");
        Ok(())
    }

    fn reject<T>(&self, operation: &'static str, reason: RejectReason) -> Mutation<T> {
        info!(
            "event=mutation_rejected module=store status=rejected op={operation} reason={reason}"
        );
        Mutation::Rejected(reason)
    }
}

fn parse_required_date(
    value: &str,
    when_empty: RejectReason,
) -> Result<NaiveDate, RejectReason> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(when_empty);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| RejectReason::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_required_date;
    use super::RejectReason;

    #[test]
    fn date_parsing_distinguishes_empty_and_invalid() {
        assert_eq!(
            parse_required_date("  ", RejectReason::EmptyStartDate),
            Err(RejectReason::EmptyStartDate)
        );
        assert_eq!(
            parse_required_date("2024-13-01", RejectReason::EmptyStartDate),
            Err(RejectReason::InvalidDate("2024-13-01".to_string()))
        );
        assert!(parse_required_date(" 2024-02-29 ", RejectReason::EmptyStartDate).is_ok());
    }
}
