//! # Wellspring: Request/Response DTOs
//!
//! All API contract types in one module. The server deserializes the
//! `*Request` types and serializes the `*Response` types; the client gateway
//! does the opposite with the very same structs, so the wire format has a
//! single definition.
//!
//! Conventions:
//! - Wire field names are camelCase
//! - All validation is expressed via `validator` derive macros
//! - Serde defaults are used for optional fields with known defaults

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::mood::MoodEntrySummary;
use crate::models::profile::{ExerciseFrequency, Gender, UserProfile};
use crate::models::user::User;

pub const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// Common
// ============================================================================

/// Standard success message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error envelope produced by `AppError`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "not_blank")]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Minimal user info returned in auth responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

/// Response for register. Registration never logs the user in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Response for login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    pub has_profile: bool,
    pub user: UserSummary,
}

// ============================================================================
// Profile
// ============================================================================

fn validate_goals(goals: &BTreeSet<String>) -> Result<(), ValidationError> {
    if goals.iter().any(|g| g.trim().is_empty()) {
        return Err(ValidationError::new("blank_goal"));
    }
    if goals.len() > 20 {
        return Err(ValidationError::new("too_many_goals"));
    }
    Ok(())
}

/// POST /api/profile: full profile, upserted by user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: i32,

    pub gender: Gender,

    #[validate(custom = "not_blank")]
    #[validate(length(max = 200, message = "Occupation must be at most 200 characters"))]
    pub occupation: String,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: f64,

    pub exercise_frequency: ExerciseFrequency,

    #[validate(range(min = 1, max = 10, message = "Stress level must be between 1 and 10"))]
    pub stress_level: i32,

    #[serde(default)]
    #[validate(custom = "validate_goals")]
    pub wellness_goals: BTreeSet<String>,

    #[validate(range(min = 1, max = 10, message = "Energy level must be between 1 and 10"))]
    pub energy_level: i32,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Additional info must be at most 2000 characters"))]
    pub additional_info: String,
}

/// GET/POST /api/profile response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub age: i32,
    pub gender: Gender,
    pub occupation: String,
    pub sleep_hours: f64,
    pub exercise_frequency: ExerciseFrequency,
    pub stress_level: i32,
    pub wellness_goals: BTreeSet<String>,
    pub energy_level: i32,
    pub additional_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            user: p.user_id,
            age: p.age,
            gender: p.gender,
            occupation: p.occupation,
            sleep_hours: p.sleep_hours,
            exercise_frequency: p.exercise_frequency,
            stress_level: p.stress_level,
            wellness_goals: p.wellness_goals.into_iter().collect(),
            energy_level: p.energy_level,
            additional_info: p.additional_info,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ============================================================================
// Mood
// ============================================================================

/// POST /api/mood response and GET /api/mood list item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntryResponse {
    pub id: Uuid,
    pub mood_text: String,
    pub has_audio: bool,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MoodEntrySummary> for MoodEntryResponse {
    fn from(m: MoodEntrySummary) -> Self {
        Self {
            id: m.id,
            mood_text: m.mood_text,
            has_audio: m.has_audio,
            has_image: m.has_image,
            created_at: m.created_at,
        }
    }
}

/// GET /api/mood?limit=
#[derive(Debug, Deserialize)]
pub struct MoodListQuery {
    pub limit: Option<i64>,
}
