//! Storage abstractions for service layer
//!
//! File-backed JSON documents written as whole snapshots.

pub mod json_snapshot;
