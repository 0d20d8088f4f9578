use std::{collections::HashSet, path::PathBuf, sync::Arc};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::errors::{SnapshotError, StoreError};
use crate::metrics;
use crate::storage::json_snapshot::JsonSnapshotFile;
use crate::waitlist::entry::{AddOutcome, WaitlistEntry};
use crate::waitlist::snapshot::EntrySnapshot;

/// Entries in insertion order plus everything needed to keep them unique.
/// Guarded as one unit so the duplicate check, the append and the counter
/// bump can never be observed apart.
struct Table {
    entries: Vec<WaitlistEntry>,
    emails: HashSet<String>,
    next_id: u64,
}

impl Table {
    fn from_entries(entries: Vec<WaitlistEntry>) -> Result<Self, StoreError> {
        let mut emails = HashSet::with_capacity(entries.len());
        let mut ids = HashSet::with_capacity(entries.len());
        let mut max_id = 0u64;
        for e in &entries {
            if !ids.insert(e.id) {
                return Err(StoreError::Corrupt(format!("duplicate id {}", e.id)));
            }
            if !emails.insert(e.email.clone()) {
                return Err(StoreError::Corrupt(format!("duplicate email {:?}", e.email)));
            }
            max_id = max_id.max(e.id);
        }
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt("id space exhausted".into()))?;
        Ok(Self { entries, emails, next_id })
    }
}

struct Inner {
    table: RwLock<Table>,
    backend: Arc<dyn EntrySnapshot>,
    // Number of entries in the last snapshot written; also serializes writers.
    persisted: Mutex<usize>,
}

impl Inner {
    /// Write the current collection if it grew since the last write.
    /// Holding `persisted` across the read and the save means a later write
    /// always covers everything an earlier one did.
    async fn persist(&self) -> Result<Option<usize>, SnapshotError> {
        let mut persisted = self.persisted.lock().await;
        let entries = self.table.read().await.entries.clone();
        if entries.len() == *persisted {
            return Ok(None);
        }
        self.backend.save(&entries).await?;
        *persisted = entries.len();
        Ok(Some(entries.len()))
    }
}

/// Concurrency-safe waitlist: dedups by exact email, hands out increasing
/// ids, and rewrites the full snapshot in the background after each signup.
#[derive(Clone)]
pub struct WaitlistStore {
    inner: Arc<Inner>,
}

impl WaitlistStore {
    /// Open the store backed by a JSON file at `path`. A missing file starts an
    /// empty waitlist; an unreadable or malformed one is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        Self::with_snapshot(Arc::new(JsonSnapshotFile::new(path))).await
    }

    pub async fn with_snapshot(backend: Arc<dyn EntrySnapshot>) -> Result<Arc<Self>, StoreError> {
        let entries = match backend.load().await {
            Ok(entries) => entries,
            Err(SnapshotError::NotFound(_)) => {
                info!(location = %backend.location(), "no waitlist snapshot yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        let table = Table::from_entries(entries)?;
        info!(
            location = %backend.location(),
            entries = table.entries.len(),
            next_id = table.next_id,
            "waitlist store opened"
        );

        let persisted = table.entries.len();
        Ok(Arc::new(Self {
            inner: Arc::new(Inner {
                table: RwLock::new(table),
                backend,
                persisted: Mutex::new(persisted),
            }),
        }))
    }

    /// Offer an email. Exact (case-sensitive) duplicates are rejected without
    /// consuming an id. Ids stop at `u64::MAX - 1`; past that every offer is
    /// refused with `IdsExhausted`. On acceptance a snapshot write is
    /// dispatched in the background; the entry is live in memory before it is
    /// durable.
    pub async fn add(&self, email: &str) -> AddOutcome {
        let entry = {
            let mut table = self.inner.table.write().await;
            if table.emails.contains(email) {
                debug!(%email, "duplicate waitlist signup");
                return AddOutcome::Duplicate;
            }
            if table.next_id == u64::MAX {
                error!(%email, "waitlist id space exhausted");
                return AddOutcome::IdsExhausted;
            }
            let entry = WaitlistEntry {
                id: table.next_id,
                email: email.to_owned(),
                created_at: Utc::now(),
            };
            // u64::MAX is reserved, so this never overflows.
            table.next_id += 1;
            table.emails.insert(entry.email.clone());
            table.entries.push(entry.clone());
            entry
        };

        self.spawn_persist();
        AddOutcome::Accepted(entry)
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Vec<WaitlistEntry> {
        let table = self.inner.table.read().await;
        table.entries.iter().rev().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.table.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Id the next accepted signup will get.
    pub async fn next_id(&self) -> u64 {
        self.inner.table.read().await.next_id
    }

    /// Persist now and report the outcome. Used at shutdown.
    pub async fn flush(&self) -> Result<(), SnapshotError> {
        if let Some(count) = self.inner.persist().await? {
            info!(location = %self.inner.backend.location(), entries = count, "waitlist snapshot flushed");
        }
        Ok(())
    }

    fn spawn_persist(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.persist().await {
                Ok(Some(count)) => {
                    debug!(location = %inner.backend.location(), entries = count, "waitlist snapshot written")
                }
                Ok(None) => {}
                Err(e) => {
                    metrics::SNAPSHOT_FAILURES_TOTAL.inc();
                    error!(error = %e, "waitlist snapshot write failed; will retry on next signup");
                }
            }
        });
    }
}
