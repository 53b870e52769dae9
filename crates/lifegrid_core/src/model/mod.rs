//! Domain model for the life grid.
//!
//! # Responsibility
//! - Define the grid geometry and the date arithmetic that maps onto it.
//! - Define the records that make up one persisted snapshot.
//!
//! # Invariants
//! - Grid coordinates are always inside `MAX_YEARS x WEEKS_PER_YEAR`.
//! - Model types are plain values; persistence lives in `repo`.

pub mod cell;
pub mod snapshot;
pub mod stats;
pub mod time;
