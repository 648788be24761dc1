//! Person routes: admin directory management and self-service profile.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::person::{CreatePersonRequest, ListPeopleResponse, UpdatePersonRequest};
use domain::models::Person;
use persistence::repositories::person::{PersonInput, PersonUpdate};
use persistence::repositories::PersonRepository;
use shared::pagination::{PageInfo, PageParams};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ManagerAuth, UserAuth};

fn to_update(request: UpdatePersonRequest) -> PersonUpdate {
    PersonUpdate {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        city: request.city,
        state: request.state,
        birthdate: request.birthdate,
    }
}

/// List people in the directory.
///
/// GET /api/v1/admin/people
pub async fn list_people(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Query(params): Query<PageParams>,
) -> Result<Json<ListPeopleResponse>, ApiError> {
    let repo = PersonRepository::new(state.pool.clone());
    let people = repo.list(params.limit(), params.offset()).await?;
    let total = repo.count().await?;

    Ok(Json(ListPeopleResponse {
        data: people.into_iter().map(Into::into).collect(),
        page: PageInfo::new(params, total),
    }))
}

/// Add a person to the directory.
///
/// POST /api/v1/admin/people
pub async fn create_person(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Json(request): Json<CreatePersonRequest>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    request.validate()?;

    let repo = PersonRepository::new(state.pool.clone());
    let person = repo
        .create(&PersonInput {
            email: request.email.to_lowercase(),
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            city: request.city,
            state: request.state,
            birthdate: request.birthdate,
        })
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("A person with this email already exists".to_string())
            }
            _ => e.into(),
        })?;

    info!(person_id = person.id, created_by = %auth.0.email, "Person created");

    Ok((StatusCode::CREATED, Json(person.into())))
}

/// Fetch one person.
///
/// GET /api/v1/admin/people/:person_id
pub async fn get_person(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(person_id): Path<i64>,
) -> Result<Json<Person>, ApiError> {
    let repo = PersonRepository::new(state.pool.clone());
    let person = repo
        .find_by_id(person_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Person not found".to_string()))?;

    Ok(Json(person.into()))
}

/// Update a person's profile fields.
///
/// PATCH /api/v1/admin/people/:person_id
pub async fn update_person(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(person_id): Path<i64>,
    Json(request): Json<UpdatePersonRequest>,
) -> Result<Json<Person>, ApiError> {
    request.validate()?;

    let repo = PersonRepository::new(state.pool.clone());
    let person = repo
        .update(person_id, &to_update(request))
        .await?
        .ok_or_else(|| ApiError::NotFound("Person not found".to_string()))?;

    Ok(Json(person.into()))
}

/// Remove a person; registrations, milestones, and donations cascade.
///
/// DELETE /api/v1/admin/people/:person_id
pub async fn delete_person(
    State(state): State<AppState>,
    auth: ManagerAuth,
    Path(person_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PersonRepository::new(state.pool.clone());
    let deleted = repo.delete(person_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Person not found".to_string()));
    }

    info!(person_id = person_id, deleted_by = %auth.0.email, "Person deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated participant's own profile.
///
/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Person>, ApiError> {
    let repo = PersonRepository::new(state.pool.clone());
    let person = repo
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile found for this account".to_string()))?;

    Ok(Json(person.into()))
}

/// Update the authenticated participant's own profile.
///
/// PATCH /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UpdatePersonRequest>,
) -> Result<Json<Person>, ApiError> {
    request.validate()?;

    let repo = PersonRepository::new(state.pool.clone());
    let person = repo
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile found for this account".to_string()))?;

    let updated = repo
        .update(person.id, &to_update(request))
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile found for this account".to_string()))?;

    Ok(Json(updated.into()))
}
