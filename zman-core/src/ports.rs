use async_trait::async_trait;
use time::OffsetDateTime;

use crate::entry::{EntryPatch, NewTimeEntry, TimeEntry};
use crate::error::StoreError;
use crate::ids::{EntryId, OwnerId};

/// Outbound port for the durable time-entry store.
///
/// The store is the source of truth for elapsed time and history; the
/// engine re-derives everything else from it on load.
#[async_trait]
pub trait TimeEntryStore: Send + Sync + 'static {
    /// Fetch the single running entry for an owner, if any.
    async fn running_entry(&self, owner: OwnerId) -> Result<Option<TimeEntry>, StoreError>;

    /// Fetch entries with `start_time >= since`, newest first.
    async fn entries_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, StoreError>;

    /// Sum of `duration_minutes` over completed entries with
    /// `start_time >= since`.
    async fn completed_minutes_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<i64, StoreError>;

    /// Insert a new running entry and return it with its assigned id.
    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, StoreError>;

    /// Apply a partial update to an entry and return the updated row.
    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<TimeEntry, StoreError>;

    /// Delete an entry.
    async fn delete(&self, id: EntryId) -> Result<(), StoreError>;
}

/// Outbound port for the owner's profile record.
#[async_trait]
pub trait ProfileReader: Send + Sync + 'static {
    /// Hourly rate snapshot for an owner; read once when a timer starts
    /// and never re-read mid-entry.
    async fn hourly_rate(&self, owner: OwnerId) -> Result<Option<f64>, StoreError>;
}
