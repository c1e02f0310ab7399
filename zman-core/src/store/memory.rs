//! In-memory implementation of the store ports, backed by a HashMap.
//! Used by tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::entry::{EntryPatch, NewTimeEntry, TimeEntry};
use crate::error::StoreError;
use crate::ids::{EntryId, OwnerId};
use crate::ports::{ProfileReader, TimeEntryStore};

/// Mirrors the backing table's behavior: `duration_minutes` is derived
/// from start/end when an entry is closed, and at most one running entry
/// may exist per owner.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<i32, TimeEntry>>>,
    next_id: Arc<AtomicI32>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries, keeping their ids.
    pub fn with_entries(self, seeded: Vec<TimeEntry>) -> Self {
        {
            let mut entries = self.entries.write().unwrap();
            for entry in seeded {
                self.next_id.fetch_max(entry.id.as_i32(), Ordering::SeqCst);
                entries.insert(entry.id.as_i32(), entry);
            }
        }
        self
    }

    /// Make every delete fail, for exercising failure paths.
    pub fn with_failing_deletes(self) -> Self {
        self.fail_deletes.store(true, Ordering::SeqCst);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<TimeEntry> {
        self.entries.read().unwrap().get(&id.as_i32()).cloned()
    }
}

#[async_trait]
impl TimeEntryStore for MemoryStore {
    async fn running_entry(&self, owner: OwnerId) -> Result<Option<TimeEntry>, StoreError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .values()
            .find(|entry| entry.owner_id == owner && entry.is_running)
            .cloned())
    }

    async fn entries_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, StoreError> {
        let entries = self.entries.read().unwrap();
        let mut matching: Vec<TimeEntry> = entries
            .values()
            .filter(|entry| entry.owner_id == owner && entry.start_time >= since)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(matching)
    }

    async fn completed_minutes_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<i64, StoreError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .values()
            .filter(|entry| entry.owner_id == owner && entry.start_time >= since)
            .filter_map(|entry| entry.duration_minutes)
            .sum())
    }

    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, StoreError> {
        let mut entries = self.entries.write().unwrap();
        if entries
            .values()
            .any(|existing| existing.owner_id == entry.owner_id && existing.is_running)
        {
            return Err(StoreError::DuplicateRunning(entry.owner_id.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = TimeEntry {
            id: EntryId::new(id),
            owner_id: entry.owner_id,
            project_id: entry.project_id.clone(),
            client_id: entry.client_id.clone(),
            description: entry.description.clone(),
            start_time: entry.start_time,
            end_time: None,
            duration_minutes: None,
            is_billable: entry.is_billable,
            hourly_rate: entry.hourly_rate,
            is_running: true,
            tags: entry.tags.clone(),
        };
        entries.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<TimeEntry, StoreError> {
        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .get_mut(&id.as_i32())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(description) = &patch.description {
            entry.description = Some(description.clone());
        }
        if let Some(tags) = &patch.tags {
            entry.tags = tags.clone();
        }
        if let Some(is_running) = patch.is_running {
            entry.is_running = is_running;
        }
        if let Some(end_time) = patch.end_time {
            *entry = entry.clone().closed(end_time);
        }

        Ok(entry.clone())
    }

    async fn delete(&self, id: EntryId) -> Result<(), StoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::backend("delete rejected"));
        }

        let mut entries = self.entries.write().unwrap();
        entries
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Profile source returning a fixed hourly rate per owner.
#[derive(Clone, Default)]
pub struct MemoryProfiles {
    rates: Arc<RwLock<HashMap<i32, f64>>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(self, owner: OwnerId, rate: f64) -> Self {
        self.rates.write().unwrap().insert(owner.as_i32(), rate);
        self
    }
}

#[async_trait]
impl ProfileReader for MemoryProfiles {
    async fn hourly_rate(&self, owner: OwnerId) -> Result<Option<f64>, StoreError> {
        Ok(self.rates.read().unwrap().get(&owner.as_i32()).copied())
    }
}
