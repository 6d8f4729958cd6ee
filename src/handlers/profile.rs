use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{ProfileRequest, ProfileResponse};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .store
        .find_profile(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".into()))?;

    Ok(Json(profile.into()))
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<ProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    body.validate()?;

    // A token can outlive its user row; upserting would violate the foreign key.
    if state.store.find_user_by_id(auth_user.id).await?.is_none() {
        return Err(AppError::Unauthorized);
    }

    let profile = state.store.upsert_profile(auth_user.id, &body).await?;

    tracing::info!(
        user_id = %auth_user.id,
        profile_id = %profile.id,
        goals = profile.wellness_goals.len(),
        "Profile saved"
    );

    Ok(Json(profile.into()))
}
