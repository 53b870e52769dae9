//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value blob contract the snapshot store persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories store payloads opaquely; decoding and validation belong
//!   to the model layer.

pub mod blob_repo;
