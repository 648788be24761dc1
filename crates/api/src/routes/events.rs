//! Event routes: public listings and manager CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::event::{
    CreateEventRequest, CreateOccurrenceRequest, EventWithOccurrences, OccurrenceSummary,
    UpdateEventRequest,
};
use domain::models::{Event, EventOccurrence};
use persistence::repositories::event::OccurrenceInput;
use persistence::repositories::EventRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ManagerAuth;

/// Response for the upcoming events listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListUpcomingResponse {
    pub data: Vec<OccurrenceSummary>,
}

/// Upcoming occurrences with seat availability.
///
/// GET /api/v1/events
pub async fn list_upcoming(
    State(state): State<AppState>,
) -> Result<Json<ListUpcomingResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let occurrences = repo.list_upcoming(Utc::now()).await?;

    Ok(Json(ListUpcomingResponse {
        data: occurrences.into_iter().map(Into::into).collect(),
    }))
}

/// An event definition with all of its occurrences.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventWithOccurrences>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event: Event = repo
        .find_event(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?
        .into();

    let occurrences: Vec<EventOccurrence> = repo
        .list_occurrences_for_event(event_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(EventWithOccurrences { event, occurrences }))
}

/// Create an event definition.
///
/// POST /api/v1/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .create_event(&request.name, &request.event_type, request.description.as_deref())
        .await?;

    info!(event_id = event.id, name = %event.name, created_by = %auth.0.email, "Event created");

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Update an event definition.
///
/// PATCH /api/v1/admin/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .update_event(
            event_id,
            request.name.as_deref(),
            request.event_type.as_deref(),
            request.description.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(event.into()))
}

/// Delete an event definition and everything scheduled under it.
///
/// DELETE /api/v1/admin/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete_event(event_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = event_id, deleted_by = %auth.0.email, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Schedule an occurrence of an event.
///
/// POST /api/v1/admin/events/:event_id/occurrences
pub async fn create_occurrence(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Path(event_id): Path<i64>,
    Json(request): Json<CreateOccurrenceRequest>,
) -> Result<(StatusCode, Json<EventOccurrence>), ApiError> {
    request.validate()?;
    request.check_window().map_err(ApiError::Validation)?;

    let repo = EventRepository::new(state.pool.clone());
    repo.find_event(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let occurrence = repo
        .create_occurrence(&OccurrenceInput {
            event_id,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            location: request.location,
            capacity: request.capacity,
            registration_deadline: request.registration_deadline,
        })
        .await?;

    info!(
        event_id = event_id,
        occurrence_id = occurrence.id,
        created_by = %auth.0.email,
        "Occurrence scheduled"
    );

    Ok((StatusCode::CREATED, Json(occurrence.into())))
}

/// Delete an occurrence; registrations and carpool rows cascade.
///
/// DELETE /api/v1/admin/occurrences/:occurrence_id
pub async fn delete_occurrence(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Path(occurrence_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete_occurrence(occurrence_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Event occurrence not found".to_string()));
    }

    info!(occurrence_id = occurrence_id, deleted_by = %auth.0.email, "Occurrence deleted");

    Ok(StatusCode::NO_CONTENT)
}
