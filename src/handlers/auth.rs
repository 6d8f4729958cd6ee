use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password_blocking, verify_password_blocking},
};
use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserSummary};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::{normalize_email, NewUser};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let body = RegisterRequest {
        name: body.name.trim().to_string(),
        email: normalize_email(&body.email),
        password: body.password,
    };
    body.validate()?;

    if state.store.find_user_by_email(&body.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password_blocking(body.password).await?;

    // The unique index still catches a concurrent registration of the same email.
    let user = state
        .store
        .create_user(NewUser {
            name: body.name,
            email: body.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    body.validate()?;

    let email = normalize_email(&body.email);
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password_blocking(body.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_access_token(user.id, &user.email, &state.config)?;
    let has_profile = state.store.profile_exists(user.id).await?;

    tracing::info!(user_id = %user.id, has_profile, "User logged in");

    Ok(Json(LoginResponse {
        token,
        has_profile,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserSummary>> {
    let user = state
        .store
        .find_user_by_id(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
