//! Donation entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the donations table.
#[derive(Debug, Clone, FromRow)]
pub struct DonationEntity {
    pub id: i64,
    pub person_id: i64,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub donated_at: DateTime<Utc>,
}

impl From<DonationEntity> for domain::models::donation::Donation {
    fn from(entity: DonationEntity) -> Self {
        Self {
            id: entity.id,
            person_id: entity.person_id,
            amount_cents: entity.amount_cents,
            note: entity.note,
            donated_at: entity.donated_at,
        }
    }
}

/// Row mapping for the manager donation listing, joined with donor info.
#[derive(Debug, Clone, FromRow)]
pub struct DonationWithDonorEntity {
    pub id: i64,
    pub donor_email: String,
    pub first_name: String,
    pub last_name: String,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub donated_at: DateTime<Utc>,
}

impl From<DonationWithDonorEntity> for domain::models::donation::DonationSummary {
    fn from(entity: DonationWithDonorEntity) -> Self {
        let donor_name = format!("{} {}", entity.first_name, entity.last_name)
            .trim()
            .to_string();
        Self {
            id: entity.id,
            donor_email: entity.donor_email,
            donor_name,
            amount_cents: entity.amount_cents,
            note: entity.note,
            donated_at: entity.donated_at,
        }
    }
}
