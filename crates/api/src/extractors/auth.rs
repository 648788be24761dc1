//! JWT authentication extractors.
//!
//! `UserAuth` validates the Bearer token and exposes the account's email and
//! role; `ManagerAuth` additionally requires the manager role. Legacy
//! `admin` roles were normalized to manager when the token was issued.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use domain::models::Role;
use shared::jwt::JwtConfig;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Authenticated account information from a validated JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Credential email from the subject claim.
    pub email: String,
    /// Account role from the role claim.
    pub role: Role,
}

/// Builds a JwtConfig from app configuration.
pub fn build_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, ApiError> {
    JwtConfig::with_leeway(
        &config.private_key,
        &config.public_key,
        config.access_token_expiry_secs,
        config.refresh_token_expiry_secs,
        config.leeway_secs,
    )
    .map_err(|e| ApiError::Internal(format!("JWT configuration error: {}", e)))
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

fn validate(state: &AppState, token: &str) -> Result<UserAuth, ApiError> {
    let jwt_config = build_jwt_config(&state.config.jwt)?;
    let claims = jwt_config
        .validate_access_token(token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;

    Ok(UserAuth {
        email: claims.sub,
        role,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        validate(state, token)
    }
}

/// Manager-only authentication.
#[derive(Debug, Clone)]
pub struct ManagerAuth(pub UserAuth);

#[async_trait]
impl FromRequestParts<AppState> for ManagerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;
        if !auth.role.is_manager() {
            return Err(ApiError::Forbidden(
                "This action requires a manager account".to_string(),
            ));
        }
        Ok(ManagerAuth(auth))
    }
}

/// Optional authentication: `None` when no valid Bearer token is present.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Ok(token) => Ok(OptionalUserAuth(validate(state, token).ok())),
            Err(_) => Ok(OptionalUserAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_struct() {
        let auth = UserAuth {
            email: "staff@ellarises.org".to_string(),
            role: Role::Manager,
        };
        assert!(auth.role.is_manager());
    }

    #[test]
    fn test_optional_user_auth_none() {
        let auth = OptionalUserAuth(None);
        assert!(auth.0.is_none());
    }

    #[test]
    fn test_manager_auth_wraps_user_auth() {
        let auth = ManagerAuth(UserAuth {
            email: "staff@ellarises.org".to_string(),
            role: Role::Manager,
        });
        assert_eq!(auth.0.email, "staff@ellarises.org");
    }
}
