//! Core use-case services.
//!
//! # Responsibility
//! - Own application state mutations and their persistence.
//! - Derive render models and reflections from the current snapshot.
//! - Keep front-ends decoupled from storage and HTTP details.

pub mod grid_projection;
pub mod insight_service;
pub mod snapshot_store;
