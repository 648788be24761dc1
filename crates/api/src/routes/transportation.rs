//! Transportation routes: the coordinator's carpool board and matching.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use domain::models::carpool::{MatchRequest, TransportationBoard};
use domain::models::CarpoolMatch;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ManagerAuth;
use crate::services::CarpoolService;

/// The transportation board for an occurrence: unmatched riders, drivers
/// with remaining seats, and existing matches.
///
/// GET /api/v1/admin/events/:occurrence_id/transportation
pub async fn get_board(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(occurrence_id): Path<i64>,
) -> Result<Json<TransportationBoard>, ApiError> {
    let service = CarpoolService::new(state.pool.clone());
    let board = service.transportation_board(occurrence_id).await?;

    Ok(Json(board))
}

/// Pair a driver with a rider.
///
/// POST /api/v1/admin/events/:occurrence_id/match
pub async fn create_match(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Path(occurrence_id): Path<i64>,
    Json(request): Json<MatchRequest>,
) -> Result<(StatusCode, Json<CarpoolMatch>), ApiError> {
    request.validate()?;

    let service = CarpoolService::new(state.pool.clone());
    let created = service
        .create_match(occurrence_id, &request.driver_email, &request.rider_email)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
