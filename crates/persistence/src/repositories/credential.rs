//! Credential repository for database operations.

use sqlx::PgPool;

use crate::entities::CredentialEntity;
use crate::metrics::QueryTimer;

/// Repository for login credential operations.
#[derive(Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Creates a new CredentialRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a credential. Emails are stored lowercase.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<CredentialEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_credential");
        let result = sqlx::query_as::<_, CredentialEntity>(
            r#"
            INSERT INTO credentials (email, password_hash, role)
            VALUES (lower($1), $2, $3)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a credential by email (case-insensitive).
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_credential_by_email");
        let result = sqlx::query_as::<_, CredentialEntity>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM credentials
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether an account exists for the email.
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_credential_email_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM credentials WHERE lower(email) = lower($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // CredentialRepository queries require a database connection; role
    // normalization is covered in the entity conversion tests.
}
