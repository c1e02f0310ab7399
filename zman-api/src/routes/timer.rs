use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zman_core::{
    OwnerId, StartTimer, TimeEntry, TimerSession, TracingNotifier, TrackingSummary,
};

use crate::{
    adapters::outbound::postgres::{PgProfileReader, PgTimeEntryStore},
    app_state::AppState,
};

use super::{ApiError, CurrentOwner};

type OwnerSession = TimerSession<PgTimeEntryStore, PgProfileReader, TracingNotifier>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_timer))
        .route("/start", post(start_timer))
        .route("/stop", post(stop_timer))
        .route("/save", post(save_timer))
        .route("/reset", post(reset_timer))
        .route("/description", put(update_description))
        .route("/tags", put(update_tags))
        .route("/summary", get(get_summary))
}

/// Reconcile a per-request session against the store.
async fn load_session(app_state: &AppState, owner: OwnerId) -> Result<OwnerSession, ApiError> {
    TimerSession::load(
        owner,
        app_state.session_config,
        app_state.store.clone(),
        app_state.profiles.clone(),
        app_state.notifier.clone(),
    )
    .await
    .map_err(ApiError::from)
}

// ============================================================================
// Get Timer
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTimerResponse {
    timer: Option<RunningTimer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTimer {
    entry: TimeEntry,
    elapsed_seconds: i64,
}

#[instrument(name = "get_timer", skip(app_state))]
pub async fn get_timer(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
) -> Result<Json<GetTimerResponse>, ApiError> {
    let session = load_session(&app_state, owner).await?;

    let timer = session.current_entry().cloned().map(|entry| RunningTimer {
        elapsed_seconds: session.elapsed_seconds(),
        entry,
    });

    Ok(Json(GetTimerResponse { timer }))
}

// ============================================================================
// Start Timer
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerPayload {
    project_id: Option<String>,
    client_id: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    billable: Option<bool>,
}

#[instrument(name = "start_timer", skip(app_state))]
pub async fn start_timer(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
    Json(body): Json<StartTimerPayload>,
) -> Result<StatusCode, ApiError> {
    let mut request = StartTimer::new();
    if let Some(project_id) = body.project_id {
        request = request.with_project(project_id);
    }
    if let Some(client_id) = body.client_id {
        request = request.with_client(client_id);
    }
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(tags) = body.tags {
        request = request.with_tags(tags);
    }
    if let Some(billable) = body.billable {
        request = request.with_billable(billable);
    }

    let mut session = load_session(&app_state, owner).await?;
    session.start(request).await?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Stop / Save / Reset
// ============================================================================

#[instrument(name = "stop_timer", skip(app_state))]
pub async fn stop_timer(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut session = load_session(&app_state, owner).await?;
    session.stop().await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimerPayload {
    notes: Option<String>,
}

#[instrument(name = "save_timer", skip(app_state))]
pub async fn save_timer(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
    Json(body): Json<SaveTimerPayload>,
) -> Result<StatusCode, ApiError> {
    let mut session = load_session(&app_state, owner).await?;
    session.save(body.notes.as_deref()).await?;

    Ok(StatusCode::OK)
}

#[instrument(name = "reset_timer", skip(app_state))]
pub async fn reset_timer(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut session = load_session(&app_state, owner).await?;
    session.reset().await?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Update Description / Tags
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptionPayload {
    description: String,
}

#[instrument(name = "update_description", skip(app_state, body))]
pub async fn update_description(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
    Json(body): Json<UpdateDescriptionPayload>,
) -> Result<StatusCode, ApiError> {
    let mut session = load_session(&app_state, owner).await?;
    session.update_description(&body.description).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagsPayload {
    tags: Vec<String>,
}

#[instrument(name = "update_tags", skip(app_state, body))]
pub async fn update_tags(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
    Json(body): Json<UpdateTagsPayload>,
) -> Result<StatusCode, ApiError> {
    let mut session = load_session(&app_state, owner).await?;
    session.update_tags(body.tags).await?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Summary
// ============================================================================

#[instrument(name = "get_summary", skip(app_state))]
pub async fn get_summary(
    CurrentOwner(owner): CurrentOwner,
    State(app_state): State<AppState>,
) -> Result<Json<TrackingSummary>, ApiError> {
    let session = load_session(&app_state, owner).await?;

    Ok(Json(session.summary()))
}
