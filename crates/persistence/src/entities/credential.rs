//! Credential entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Role;
use sqlx::FromRow;

/// Database row mapping for the credentials table.
///
/// The role column is constrained to 'user', 'manager', or the legacy
/// 'admin'; `Role::from_str` normalizes the legacy value on load.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialEntity {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<CredentialEntity> for domain::models::Credential {
    fn from(entity: CredentialEntity) -> Self {
        let role = entity.role.parse::<Role>().unwrap_or(Role::User);
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            role,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(role: &str) -> CredentialEntity {
        CredentialEntity {
            id: 1,
            email: "staff@ellarises.org".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_conversion() {
        let credential: domain::models::Credential = entity("manager").into();
        assert_eq!(credential.role, Role::Manager);
    }

    #[test]
    fn test_legacy_admin_role_normalized() {
        let credential: domain::models::Credential = entity("admin").into();
        assert_eq!(credential.role, Role::Manager);
    }

    #[test]
    fn test_user_role() {
        let credential: domain::models::Credential = entity("user").into();
        assert_eq!(credential.role, Role::User);
    }
}
