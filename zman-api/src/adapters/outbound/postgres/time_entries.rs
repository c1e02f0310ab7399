//! PostgreSQL implementation of the TimeEntryStore port.

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use zman_core::{
    ClientId, EntryId, EntryPatch, NewTimeEntry, OwnerId, ProjectId, StoreError, TimeEntry,
    TimeEntryStore,
};

use super::into_store_error;

pub struct PgTimeEntryStore {
    pool: PgPool,
}

impl PgTimeEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i32,
    owner_id: i32,
    project_id: Option<String>,
    client_id: Option<String>,
    description: Option<String>,
    start_time: OffsetDateTime,
    end_time: Option<OffsetDateTime>,
    duration_minutes: Option<i64>,
    is_billable: bool,
    hourly_rate: Option<f64>,
    is_running: bool,
    tags: Option<Vec<String>>,
}

impl From<EntryRow> for TimeEntry {
    fn from(row: EntryRow) -> Self {
        TimeEntry {
            id: EntryId::new(row.id),
            owner_id: OwnerId::new(row.owner_id),
            project_id: row.project_id.map(ProjectId::new),
            client_id: row.client_id.map(ClientId::new),
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            is_billable: row.is_billable,
            hourly_rate: row.hourly_rate,
            is_running: row.is_running,
            tags: row.tags.unwrap_or_default(),
        }
    }
}

const ENTRY_COLUMNS: &str = "id, owner_id, project_id, client_id, description, start_time, \
     end_time, duration_minutes, is_billable, hourly_rate, is_running, tags";

#[async_trait]
impl TimeEntryStore for PgTimeEntryStore {
    async fn running_entry(&self, owner: OwnerId) -> Result<Option<TimeEntry>, StoreError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM time_entries WHERE owner_id = $1 AND is_running",
            ENTRY_COLUMNS
        ))
        .bind(owner.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(row.map(TimeEntry::from))
    }

    async fn entries_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, StoreError> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM time_entries \
             WHERE owner_id = $1 AND start_time >= $2 \
             ORDER BY start_time DESC",
            ENTRY_COLUMNS
        ))
        .bind(owner.as_i32())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(rows.into_iter().map(TimeEntry::from).collect())
    }

    async fn completed_minutes_since(
        &self,
        owner: OwnerId,
        since: OffsetDateTime,
    ) -> Result<i64, StoreError> {
        let minutes = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(duration_minutes), 0)::BIGINT FROM time_entries \
             WHERE owner_id = $1 AND start_time >= $2 AND duration_minutes IS NOT NULL",
        )
        .bind(owner.as_i32())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(minutes)
    }

    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, StoreError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "INSERT INTO time_entries \
             (owner_id, project_id, client_id, description, start_time, is_billable, \
              hourly_rate, is_running, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8) \
             RETURNING {}",
            ENTRY_COLUMNS
        ))
        .bind(entry.owner_id.as_i32())
        .bind(entry.project_id.as_ref().map(|p| p.as_str().to_string()))
        .bind(entry.client_id.as_ref().map(|c| c.as_str().to_string()))
        .bind(entry.description.clone())
        .bind(entry.start_time)
        .bind(entry.is_billable)
        .bind(entry.hourly_rate)
        .bind(if entry.tags.is_empty() {
            None
        } else {
            Some(entry.tags.clone())
        })
        .fetch_one(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<TimeEntry, StoreError> {
        // duration_minutes is a generated column: it follows end_time on its
        // own and is never part of the update set.
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "UPDATE time_entries \
             SET end_time = COALESCE($2, end_time), \
                 is_running = COALESCE($3, is_running), \
                 description = COALESCE($4, description), \
                 tags = COALESCE($5, tags) \
             WHERE id = $1 \
             RETURNING {}",
            ENTRY_COLUMNS
        ))
        .bind(id.as_i32())
        .bind(patch.end_time)
        .bind(patch.is_running)
        .bind(patch.description.clone())
        .bind(patch.tags.clone())
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        row.map(TimeEntry::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: EntryId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(into_store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
