use async_trait::async_trait;

use crate::errors::SnapshotError;
use crate::storage::json_snapshot::JsonSnapshotFile;
use crate::waitlist::entry::WaitlistEntry;

/// Durable home of the full entry collection.
/// Implementations only move whole collections; identity and ordering stay
/// with the store.
#[async_trait]
pub trait EntrySnapshot: Send + Sync {
    /// `SnapshotError::NotFound` means "nothing persisted yet"; any other error
    /// means the stored state cannot be trusted.
    async fn load(&self) -> Result<Vec<WaitlistEntry>, SnapshotError>;
    async fn save(&self, entries: &[WaitlistEntry]) -> Result<(), SnapshotError>;
    /// Human-readable location for logs.
    fn location(&self) -> String;
}

#[async_trait]
impl EntrySnapshot for JsonSnapshotFile {
    async fn load(&self) -> Result<Vec<WaitlistEntry>, SnapshotError> { JsonSnapshotFile::load(self).await }
    async fn save(&self, entries: &[WaitlistEntry]) -> Result<(), SnapshotError> { JsonSnapshotFile::save(self, entries).await }
    fn location(&self) -> String { self.path().display().to_string() }
}
