use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted signup. Created once by the store and never changed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub id: u64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Result of offering an email to the store. A duplicate is an ordinary
/// outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Accepted(WaitlistEntry),
    Duplicate,
    /// Every id below `u64::MAX` has been handed out; nothing was stored.
    IdsExhausted,
}

impl AddOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AddOutcome::Accepted(_))
    }

    pub fn entry(&self) -> Option<&WaitlistEntry> {
        match self {
            AddOutcome::Accepted(entry) => Some(entry),
            AddOutcome::Duplicate | AddOutcome::IdsExhausted => None,
        }
    }
}
