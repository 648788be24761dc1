//! RSVP routes: registration creation, cancellation, and listings.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::registration::{RegistrationSummary, RsvpRequest, RsvpResponse};
use domain::models::Person;
use persistence::repositories::{PersonRepository, RegistrationRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ManagerAuth, UserAuth};
use crate::services::RegistrationService;

async fn require_person(state: &AppState, email: &str) -> Result<Person, ApiError> {
    let repo = PersonRepository::new(state.pool.clone());
    repo.find_by_email(email)
        .await?
        .map(Into::into)
        .ok_or_else(|| {
            ApiError::NotFound("Complete your profile before registering for events".to_string())
        })
}

/// RSVP to an event occurrence, optionally joining the carpool pool.
///
/// POST /api/v1/events/:occurrence_id/rsvp
pub async fn create_rsvp(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(occurrence_id): Path<i64>,
    Json(request): Json<RsvpRequest>,
) -> Result<Json<RsvpResponse>, ApiError> {
    request.validate()?;
    let choice = request.transport_choice().map_err(ApiError::Validation)?;

    let person = require_person(&state, &auth.email).await?;

    let service = RegistrationService::new(state.pool.clone());
    service.create_rsvp(&person, occurrence_id, &choice).await?;

    Ok(Json(RsvpResponse {
        success: true,
        message: choice.confirmation_message().to_string(),
    }))
}

/// Cancel an RSVP, withdrawing any carpool participation.
///
/// DELETE /api/v1/events/:occurrence_id/rsvp
pub async fn cancel_rsvp(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(occurrence_id): Path<i64>,
) -> Result<Json<RsvpResponse>, ApiError> {
    let person = require_person(&state, &auth.email).await?;

    let service = RegistrationService::new(state.pool.clone());
    service.cancel_rsvp(&person, occurrence_id).await?;

    Ok(Json(RsvpResponse {
        success: true,
        message: "Your RSVP has been cancelled.".to_string(),
    }))
}

/// Response for the authenticated participant's registrations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRegistrationsResponse {
    pub data: Vec<RegistrationSummary>,
}

/// The authenticated participant's registrations, newest first.
///
/// GET /api/v1/registrations/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListRegistrationsResponse>, ApiError> {
    let person = require_person(&state, &auth.email).await?;

    let repo = RegistrationRepository::new(state.pool.clone());
    let registrations = repo.list_for_person(person.id).await?;

    Ok(Json(ListRegistrationsResponse {
        data: registrations.into_iter().map(Into::into).collect(),
    }))
}

/// Request payload for attendance check-in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetAttendedRequest {
    pub attended: bool,
}

/// Mark whether a registrant attended.
///
/// POST /api/v1/admin/registrations/:registration_id/attended
pub async fn set_attended(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(registration_id): Path<i64>,
    Json(request): Json<SetAttendedRequest>,
) -> Result<Json<RsvpResponse>, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let updated = repo.set_attended(registration_id, request.attended).await?;

    if updated == 0 {
        return Err(ApiError::NotFound("Registration not found".to_string()));
    }

    Ok(Json(RsvpResponse {
        success: true,
        message: "Attendance updated.".to_string(),
    }))
}
