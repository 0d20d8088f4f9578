//! Shared building blocks for the waitlist workspace: response types,
//! logging setup and startup environment checks.

pub mod types;
pub mod utils;
pub mod env;
