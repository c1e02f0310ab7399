use serde::Serialize;
use time::OffsetDateTime;

use crate::ids::{ClientId, EntryId, OwnerId, ProjectId};

/// One persisted unit of tracked time, bounded by a start and (once
/// closed) an end timestamp.
///
/// `duration_minutes` is derived by the store from `start_time` and
/// `end_time` when the entry is closed; it is never written from here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: EntryId,
    pub owner_id: OwnerId,
    pub project_id: Option<ProjectId>,
    pub client_id: Option<ClientId>,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub duration_minutes: Option<i64>,
    pub is_billable: bool,
    pub hourly_rate: Option<f64>,
    pub is_running: bool,
    pub tags: Vec<String>,
}

impl TimeEntry {
    pub fn new(id: impl Into<EntryId>, owner_id: impl Into<OwnerId>, start_time: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            project_id: None,
            client_id: None,
            description: None,
            start_time,
            end_time: None,
            duration_minutes: None,
            is_billable: true,
            hourly_rate: None,
            is_running: false,
            tags: Vec::new(),
        }
    }

    pub fn with_project(mut self, id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    pub fn with_client(mut self, id: impl Into<ClientId>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    pub fn running(mut self) -> Self {
        self.is_running = true;
        self
    }

    /// Close the entry, deriving the stored duration from start/end the
    /// same way the backing table does.
    pub fn closed(mut self, end_time: OffsetDateTime) -> Self {
        self.duration_minutes = Some((end_time - self.start_time).whole_seconds().max(0) / 60);
        self.end_time = Some(end_time);
        self.is_running = false;
        self
    }
}

/// Fields of a new running entry, as sent to the store on `start`.
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub owner_id: OwnerId,
    pub project_id: Option<ProjectId>,
    pub client_id: Option<ClientId>,
    pub description: Option<String>,
    pub start_time: OffsetDateTime,
    pub is_billable: bool,
    pub hourly_rate: Option<f64>,
    pub tags: Vec<String>,
}

/// Request to start a new timer.
#[derive(Debug, Clone, Default)]
pub struct StartTimer {
    pub project_id: Option<ProjectId>,
    pub client_id: Option<ClientId>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub billable: Option<bool>,
}

impl StartTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    pub fn with_client(mut self, id: impl Into<ClientId>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_billable(mut self, billable: bool) -> Self {
        self.billable = Some(billable);
        self
    }
}

/// The restricted set of fields an existing entry may be updated with.
///
/// `duration_minutes` is intentionally not representable here.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub end_time: Option<OffsetDateTime>,
    pub is_running: Option<bool>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}
