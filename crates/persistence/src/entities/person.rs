//! Person entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database row mapping for the people table.
#[derive(Debug, Clone, FromRow)]
pub struct PersonEntity {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PersonEntity> for domain::models::Person {
    fn from(entity: PersonEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            city: entity.city,
            state: entity.state,
            birthdate: entity.birthdate,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_entity_to_domain() {
        let entity = PersonEntity {
            id: 3,
            email: "amina@example.org".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Flores".to_string(),
            phone: None,
            city: Some("Provo".to_string()),
            state: Some("UT".to_string()),
            birthdate: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let person: domain::models::Person = entity.clone().into();
        assert_eq!(person.id, entity.id);
        assert_eq!(person.email, entity.email);
        assert_eq!(person.full_name(), "Amina Flores");
    }
}
