//! Service layer for the waitlist: the signup store, its snapshot
//! persistence and the validation applied before anything reaches the store.
//! - `storage` knows how to write a JSON document atomically and nothing else.
//! - `waitlist` owns identity, uniqueness and ordering of entries.

pub mod errors;
pub mod metrics;
pub mod storage;
pub mod waitlist;
