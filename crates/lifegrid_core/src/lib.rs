//! Core domain logic for LifeGrid.
//! This crate is the single source of truth for grid geometry, persisted
//! state and the reflection boundary.

pub mod config;
pub mod db;
pub mod insight;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, GeminiConfig};
pub use insight::{GeminiGenerator, GenerationError, NarrativeGenerator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cell::{CellId, CellIdError};
pub use model::snapshot::{
    Milestone, MilestoneId, Mood, Snapshot, SnapshotDecodeError, UserProfile, WeekAnnotation,
};
pub use model::stats::{milestone_progress, LifeClock, LifeStats, MilestoneProgress};
pub use model::time::{
    cell_start_date, grid_coordinate, lived_stats, LivedStats, MAX_YEARS, TOTAL_WEEKS,
    WEEKS_PER_YEAR,
};
pub use repo::blob_repo::{BlobRepository, RepoError, RepoResult, SqliteBlobRepository};
pub use service::grid_projection::{project, CellCategory, GridCell, GridRow, LifeGrid};
pub use service::insight_service::{InsightOutcome, InsightService, FALLBACK_INSIGHT};
pub use service::snapshot_store::{
    Mutation, RejectReason, SnapshotStore, StoreError, StoreResult, STORAGE_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
