//! Donation routes.
//!
//! Recording a donation upserts the donor's profile and inserts the
//! donation in one transaction, so a failed insert never leaves a dangling
//! profile change.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::donation::{DonationReceipt, DonationSummary, RecordDonationRequest};
use persistence::repositories::person::PersonInput;
use persistence::repositories::{DonationRepository, PersonRepository};
use shared::pagination::{PageInfo, PageParams};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ManagerAuth;

/// Response for the manager donation listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDonationsResponse {
    pub data: Vec<DonationSummary>,
    pub page: PageInfo,
}

/// Record a donation, creating or refreshing the donor's profile.
///
/// POST /api/v1/donations
pub async fn record_donation(
    State(state): State<AppState>,
    Json(request): Json<RecordDonationRequest>,
) -> Result<(StatusCode, Json<DonationReceipt>), ApiError> {
    request.validate()?;

    let mut tx = state.pool.begin().await?;

    let donor = PersonRepository::upsert_by_email_tx(
        &mut tx,
        &PersonInput {
            email: request.email.to_lowercase(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            phone: None,
            city: None,
            state: None,
            birthdate: None,
        },
    )
    .await?;

    let donation = DonationRepository::insert_tx(
        &mut tx,
        donor.id,
        request.amount_cents,
        request.note.as_deref(),
    )
    .await?;

    tx.commit().await?;

    info!(
        donation_id = donation.id,
        person_id = donor.id,
        amount_cents = request.amount_cents,
        "Donation recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DonationReceipt {
            donation: donation.into(),
            donor: donor.into(),
        }),
    ))
}

/// Donations with donor info, newest first.
///
/// GET /api/v1/admin/donations
pub async fn list_donations(
    State(state): State<AppState>,
    _auth: ManagerAuth,
    Query(params): Query<PageParams>,
) -> Result<Json<ListDonationsResponse>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    let donations = repo.list(params.limit(), params.offset()).await?;
    let total = repo.count().await?;

    Ok(Json(ListDonationsResponse {
        data: donations.into_iter().map(Into::into).collect(),
        page: PageInfo::new(params, total),
    }))
}
