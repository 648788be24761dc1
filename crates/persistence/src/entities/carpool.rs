//! Carpool entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the carpool_drivers table.
#[derive(Debug, Clone, FromRow)]
pub struct DriverOfferEntity {
    pub id: i64,
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub radius_miles: i32,
    pub seat_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DriverOfferEntity> for domain::models::DriverOffer {
    fn from(entity: DriverOfferEntity) -> Self {
        Self {
            id: entity.id,
            occurrence_id: entity.occurrence_id,
            email: entity.email,
            name: entity.name,
            phone: entity.phone,
            address: entity.address,
            radius_miles: entity.radius_miles,
            seat_count: entity.seat_count,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the carpool_riders table.
#[derive(Debug, Clone, FromRow)]
pub struct RiderRequestEntity {
    pub id: i64,
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<RiderRequestEntity> for domain::models::RiderRequest {
    fn from(entity: RiderRequestEntity) -> Self {
        Self {
            id: entity.id,
            occurrence_id: entity.occurrence_id,
            email: entity.email,
            name: entity.name,
            phone: entity.phone,
            address: entity.address,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the carpool_matches table.
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolMatchEntity {
    pub id: i64,
    pub occurrence_id: i64,
    pub driver_email: String,
    pub rider_email: String,
    pub matched_at: DateTime<Utc>,
}

impl From<CarpoolMatchEntity> for domain::models::CarpoolMatch {
    fn from(entity: CarpoolMatchEntity) -> Self {
        Self {
            id: entity.id,
            occurrence_id: entity.occurrence_id,
            driver_email: entity.driver_email,
            rider_email: entity.rider_email,
            matched_at: entity.matched_at,
        }
    }
}
