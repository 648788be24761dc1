//! Survey routes: participant feedback capture and manager review.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::survey::SubmitSurveyResponseRequest;
use domain::models::SurveyResponse;
use persistence::repositories::{EventRepository, PersonRepository, SurveyResponseRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ManagerAuth, OptionalUserAuth};

/// Response for survey response listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSurveyResponsesResponse {
    pub data: Vec<SurveyResponse>,
}

/// Submit feedback for an event occurrence.
///
/// POST /api/v1/surveys/:occurrence_id/responses
///
/// Authentication is optional; when a token is supplied the response is
/// linked to the participant's profile.
pub async fn submit_response(
    State(state): State<AppState>,
    auth: OptionalUserAuth,
    Path(occurrence_id): Path<i64>,
    Json(request): Json<SubmitSurveyResponseRequest>,
) -> Result<(StatusCode, Json<SurveyResponse>), ApiError> {
    request.validate()?;

    let event_repo = EventRepository::new(state.pool.clone());
    event_repo
        .find_occurrence(occurrence_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event occurrence not found".to_string()))?;

    let person_id = match auth.0 {
        Some(user) => {
            let person_repo = PersonRepository::new(state.pool.clone());
            person_repo
                .find_by_email(&user.email)
                .await?
                .map(|p| p.id)
        }
        None => None,
    };

    let repo = SurveyResponseRepository::new(state.pool.clone());
    let response = repo
        .create(
            occurrence_id,
            person_id,
            request.rating,
            request.feedback.as_deref(),
        )
        .await?;

    info!(
        occurrence_id = occurrence_id,
        rating = request.rating,
        identified = person_id.is_some(),
        "Survey response recorded"
    );

    Ok((StatusCode::CREATED, Json(response.into())))
}

/// Responses for one occurrence.
///
/// GET /api/v1/admin/surveys/:occurrence_id/responses
pub async fn list_responses(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(occurrence_id): Path<i64>,
) -> Result<Json<ListSurveyResponsesResponse>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());
    event_repo
        .find_occurrence(occurrence_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event occurrence not found".to_string()))?;

    let repo = SurveyResponseRepository::new(state.pool.clone());
    let responses = repo.list_for_occurrence(occurrence_id).await?;

    Ok(Json(ListSurveyResponsesResponse {
        data: responses.into_iter().map(Into::into).collect(),
    }))
}
