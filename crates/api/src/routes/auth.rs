//! Authentication routes: registration, login, and account info.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use validator::Validate;

use domain::models::credential::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
use domain::models::{Credential, Role};
use persistence::repositories::person::PersonInput;
use persistence::repositories::{CredentialRepository, PersonRepository};
use shared::password::{hash_password, verify_password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::auth::build_jwt_config;
use crate::extractors::UserAuth;

/// Create an account and its participant profile.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let credential_repo = CredentialRepository::new(state.pool.clone());
    let person_repo = PersonRepository::new(state.pool.clone());

    if credential_repo.email_exists(&request.email).await? {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let credential = credential_repo
        .create(&request.email, &password_hash, Role::User.as_str())
        .await?;

    // Accounts and profiles are linked by email only; create the profile
    // when the email has not been seen before (e.g. through a donation).
    if person_repo.find_by_email(&request.email).await?.is_none() {
        person_repo
            .create(&PersonInput {
                email: credential.email.clone(),
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: None,
                city: None,
                state: None,
                birthdate: None,
            })
            .await?;
    }

    let jwt = build_jwt_config(&state.config.jwt)?;
    let (access_token, _) = jwt.generate_access_token(&credential.email, Role::User.as_str())?;
    let (refresh_token, _) = jwt.generate_refresh_token(&credential.email, Role::User.as_str())?;

    info!(email = %credential.email, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            role: Role::User,
            email: credential.email,
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
///
/// Legacy `admin` roles are normalized to `manager` when the credential is
/// loaded, so issued tokens always carry the current role vocabulary.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let credential_repo = CredentialRepository::new(state.pool.clone());
    let credential: Credential = credential_repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?
        .into();

    let valid = verify_password(&request.password, &credential.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let jwt = build_jwt_config(&state.config.jwt)?;
    let role = credential.role;
    let (access_token, _) = jwt.generate_access_token(&credential.email, role.as_str())?;
    let (refresh_token, _) = jwt.generate_refresh_token(&credential.email, role.as_str())?;

    info!(email = %credential.email, role = %role, "Login succeeded");

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        role,
        email: credential.email,
    }))
}

/// Request payload for refreshing an access token.
#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "A refresh token is required"))]
    pub refresh_token: String,
}

/// Exchange a refresh token for a fresh token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let jwt = build_jwt_config(&state.config.jwt)?;
    let claims = jwt
        .validate_refresh_token(&request.refresh_token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let (access_token, _) = jwt.generate_access_token(&claims.sub, role.as_str())?;
    let (refresh_token, _) = jwt.generate_refresh_token(&claims.sub, role.as_str())?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        role,
        email: claims.sub,
    }))
}

/// The authenticated account with its profile, when one exists.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<MeResponse>, ApiError> {
    let person_repo = PersonRepository::new(state.pool.clone());
    let profile = person_repo
        .find_by_email(&auth.email)
        .await?
        .map(Into::into);

    Ok(Json(MeResponse {
        email: auth.email,
        role: auth.role,
        profile,
    }))
}
