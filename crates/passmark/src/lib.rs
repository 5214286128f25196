//! Weighted grade tracking and approval projection for course subjects.
//!
//! The core of the crate is a pair of small, pure components: a validated
//! per-subject grade ledger and a calculator that projects the grade still
//! needed on the open percentage against a configurable passing mark. A
//! repository-backed service, an axum router, and a CSV grade-sheet
//! importer sit on top so the same rules serve HTTP clients and bulk
//! sheets alike.

pub mod config;
pub mod error;
pub mod grading;
pub mod telemetry;
