//! Milestone routes: achievements per participant.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::milestone::{CreateMilestoneRequest, UpdateMilestoneRequest};
use domain::models::Milestone;
use persistence::repositories::{MilestoneRepository, PersonRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ManagerAuth, UserAuth};

/// Response for milestone listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMilestonesResponse {
    pub data: Vec<Milestone>,
}

/// Milestones for one person.
///
/// GET /api/v1/admin/people/:person_id/milestones
pub async fn list_for_person(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(person_id): Path<i64>,
) -> Result<Json<ListMilestonesResponse>, ApiError> {
    let person_repo = PersonRepository::new(state.pool.clone());
    person_repo
        .find_by_id(person_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Person not found".to_string()))?;

    let repo = MilestoneRepository::new(state.pool.clone());
    let milestones = repo.list_for_person(person_id).await?;

    Ok(Json(ListMilestonesResponse {
        data: milestones.into_iter().map(Into::into).collect(),
    }))
}

/// The authenticated participant's own milestones.
///
/// GET /api/v1/profile/milestones
pub async fn list_mine(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListMilestonesResponse>, ApiError> {
    let person_repo = PersonRepository::new(state.pool.clone());
    let person = person_repo
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile found for this account".to_string()))?;

    let repo = MilestoneRepository::new(state.pool.clone());
    let milestones = repo.list_for_person(person.id).await?;

    Ok(Json(ListMilestonesResponse {
        data: milestones.into_iter().map(Into::into).collect(),
    }))
}

/// Record a milestone for a person.
///
/// POST /api/v1/admin/people/:person_id/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Path(person_id): Path<i64>,
    Json(request): Json<CreateMilestoneRequest>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    request.validate()?;

    let person_repo = PersonRepository::new(state.pool.clone());
    person_repo
        .find_by_id(person_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Person not found".to_string()))?;

    let repo = MilestoneRepository::new(state.pool.clone());
    let milestone = repo
        .create(
            person_id,
            &request.title,
            request.description.as_deref(),
            request.achieved_on,
        )
        .await?;

    info!(
        person_id = person_id,
        milestone_id = milestone.id,
        recorded_by = %auth.0.email,
        "Milestone recorded"
    );

    Ok((StatusCode::CREATED, Json(milestone.into())))
}

/// Edit a milestone.
///
/// PATCH /api/v1/admin/milestones/:milestone_id
pub async fn update_milestone(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(milestone_id): Path<i64>,
    Json(request): Json<UpdateMilestoneRequest>,
) -> Result<Json<Milestone>, ApiError> {
    request.validate()?;

    let repo = MilestoneRepository::new(state.pool.clone());
    let milestone = repo
        .update(
            milestone_id,
            request.title.as_deref(),
            request.description.as_deref(),
            request.achieved_on,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Milestone not found".to_string()))?;

    Ok(Json(milestone.into()))
}

/// Delete a milestone.
///
/// DELETE /api/v1/admin/milestones/:milestone_id
pub async fn delete_milestone(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(milestone_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = MilestoneRepository::new(state.pool.clone());
    let deleted = repo.delete(milestone_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Milestone not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
