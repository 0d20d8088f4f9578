pub mod email;
pub mod entry;
pub mod snapshot;
pub mod store;

pub use email::{validate_email, EmailError};
pub use entry::{AddOutcome, WaitlistEntry};
pub use snapshot::EntrySnapshot;
pub use store::WaitlistStore;
