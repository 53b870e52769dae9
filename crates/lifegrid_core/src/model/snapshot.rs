//! Persisted application state.
//!
//! # Responsibility
//! - Define the profile, week annotation, milestone and snapshot records.
//! - Own the versioned JSON document format of the persisted snapshot.
//!
//! # Invariants
//! - Every annotation is stored under its own `cell_id`.
//! - `profile` is either absent or complete; there is no partial profile.
//! - Decoding validates structure and rejects anything it cannot trust.
//!
//! # See also
//! - `service::snapshot_store` for the mutation surface.

use super::cell::CellId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Current persisted document version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Stable identifier of a milestone.
///
/// Kept as text because ids written by older front-ends are not UUIDs.
pub type MilestoneId = String;

/// Qualitative tag for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Happy,
    Tough,
    Neutral,
    /// Unset. Distinct from an explicitly chosen `Neutral`.
    #[default]
    None,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "HAPPY",
            Self::Tough => "TOUGH",
            Self::Neutral => "NEUTRAL",
            Self::None => "NONE",
        }
    }

    /// Whether this mood overrides the lived/unlived color of a cell.
    pub fn is_explicit(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "tough" => Ok(Self::Tough),
            "neutral" => Ok(Self::Neutral),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unsupported mood `{other}`; expected happy|tough|neutral|none"
            )),
        }
    }
}

/// Onboarding data. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Creates a profile; a blank display name is stored as absent.
    pub fn new(date_of_birth: NaiveDate, display_name: Option<&str>) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Self {
            date_of_birth,
            display_name,
        }
    }

    /// Returns the display name, or `fallback` when none was given.
    pub fn greeting_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }
}

/// Mood and note recorded for one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAnnotation {
    #[serde(rename = "id")]
    pub cell_id: CellId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub mood: Mood,
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
}

impl WeekAnnotation {
    /// Creates an annotation stamped with the current time.
    pub fn new(cell_id: CellId, note: Option<String>, mood: Mood) -> Self {
        Self {
            cell_id,
            note,
            mood,
            recorded_at: Utc::now(),
        }
    }

    /// Note text with surrounding whitespace removed, if any remains.
    pub fn trimmed_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    pub fn has_note(&self) -> bool {
        self.trimmed_note().is_some()
    }
}

/// Ongoing counter since a start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub label: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
}

impl Milestone {
    /// Creates a milestone with a freshly generated id.
    pub fn new(label: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            start_date,
        }
    }
}

/// The complete persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    /// Annotations keyed by cell, iterated in chronological order.
    #[serde(rename = "weeks", default)]
    pub week_annotations: BTreeMap<CellId, WeekAnnotation>,
    /// Display order is insertion order.
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// Decode failure for a persisted snapshot document.
#[derive(Debug)]
pub enum SnapshotDecodeError {
    Json(serde_json::Error),
    UnsupportedVersion { found: u32, latest_supported: u32 },
    Invalid(String),
}

impl Display for SnapshotDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "snapshot is not valid JSON: {err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "snapshot version {found} is newer than supported {latest_supported}"
            ),
            Self::Invalid(message) => write!(f, "invalid snapshot: {message}"),
        }
    }
}

impl Error for SnapshotDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct SnapshotDocumentRef<'a> {
    version: u32,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

#[derive(Deserialize)]
struct SnapshotDocument {
    // Documents written before versioning carry no field.
    #[serde(default = "legacy_version")]
    version: u32,
    #[serde(flatten)]
    snapshot: Snapshot,
}

fn legacy_version() -> u32 {
    1
}

impl Snapshot {
    /// Returns the pre-onboarding state.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.week_annotations.is_empty() && self.milestones.is_empty()
    }

    pub fn annotation(&self, cell: CellId) -> Option<&WeekAnnotation> {
        self.week_annotations.get(&cell)
    }

    /// Checks cross-field invariants that typed decoding cannot express.
    pub fn validate(&self) -> Result<(), SnapshotDecodeError> {
        for (key, annotation) in &self.week_annotations {
            if *key != annotation.cell_id {
                return Err(SnapshotDecodeError::Invalid(format!(
                    "annotation stored under `{key}` carries id `{}`",
                    annotation.cell_id
                )));
            }
        }
        for milestone in &self.milestones {
            if milestone.id.trim().is_empty() {
                return Err(SnapshotDecodeError::Invalid(
                    "milestone with empty id".to_string(),
                ));
            }
            if milestone.label.trim().is_empty() {
                return Err(SnapshotDecodeError::Invalid(format!(
                    "milestone `{}` has an empty label",
                    milestone.id
                )));
            }
        }
        Ok(())
    }

    /// Serializes this snapshot as a versioned JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SnapshotDocumentRef {
            version: SNAPSHOT_SCHEMA_VERSION,
            snapshot: self,
        })
    }

    /// Parses and validates a persisted JSON document.
    pub fn from_json(payload: &str) -> Result<Self, SnapshotDecodeError> {
        let document: SnapshotDocument = serde_json::from_str(payload)?;
        if document.version > SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotDecodeError::UnsupportedVersion {
                found: document.version,
                latest_supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        document.snapshot.validate()?;
        Ok(document.snapshot)
    }
}
