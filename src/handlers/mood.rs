use axum::{
    extract::{multipart::Field, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{MoodEntryResponse, MoodListQuery};
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::models::mood::{
    Attachment, AttachmentKind, NewMoodEntry, MOOD_AUDIO_FIELD, MOOD_IMAGE_FIELD, MOOD_TEXT_FIELD,
};
use crate::AppState;

const MAX_MOOD_TEXT_CHARS: usize = 5000;
const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

async fn read_attachment(field: Field<'_>, default_name: &str) -> AppResult<Option<Attachment>> {
    let file_name = field
        .file_name()
        .filter(|n| !n.is_empty())
        .unwrap_or(default_name)
        .to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await?;

    // Browsers send an empty part for an unset file input.
    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(Attachment {
        file_name,
        content_type,
        data: data.to_vec(),
    }))
}

fn reject_duplicate<T>(slot: &Option<T>, name: &str) -> AppResult<()> {
    if slot.is_some() {
        return Err(AppError::Validation(format!("Duplicate field: {name}")));
    }
    Ok(())
}

pub async fn create_mood_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<MoodEntryResponse>)> {
    let mut mood_text: Option<String> = None;
    let mut audio: Option<Attachment> = None;
    let mut image: Option<Attachment> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            MOOD_TEXT_FIELD => {
                reject_duplicate(&mood_text, MOOD_TEXT_FIELD)?;
                mood_text = Some(field.text().await?);
            }
            MOOD_AUDIO_FIELD => {
                reject_duplicate(&audio, MOOD_AUDIO_FIELD)?;
                audio = read_attachment(field, "recording.wav").await?;
            }
            MOOD_IMAGE_FIELD => {
                reject_duplicate(&image, MOOD_IMAGE_FIELD)?;
                image = read_attachment(field, "mood-photo.jpg").await?;
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let mood_text = mood_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("mood_text is required".into()))?;
    if mood_text.chars().count() > MAX_MOOD_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "mood_text must be at most {MAX_MOOD_TEXT_CHARS} characters"
        )));
    }

    let audio_bytes = audio.as_ref().map_or(0, Attachment::len);
    let image_bytes = image.as_ref().map_or(0, Attachment::len);

    let entry = state
        .store
        .append_mood_entry(NewMoodEntry {
            user_id: auth_user.id,
            mood_text,
            audio,
            image,
        })
        .await?;

    tracing::info!(
        user_id = %auth_user.id,
        entry_id = %entry.id,
        audio_bytes,
        image_bytes,
        "Mood entry saved"
    );

    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn list_mood_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MoodListQuery>,
) -> AppResult<Json<Vec<MoodEntryResponse>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let entries = state
        .store
        .list_mood_entries(auth_user.id, limit)
        .await?
        .into_iter()
        .map(MoodEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn get_mood_attachment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath((entry_id, kind)): AppPath<(Uuid, String)>,
) -> AppResult<Response> {
    let kind: AttachmentKind = kind
        .parse()
        .map_err(|_| AppError::NotFound("Unknown attachment kind".into()))?;

    let attachment = state
        .store
        .find_mood_attachment(auth_user.id, entry_id, kind)
        .await?
        .ok_or(AppError::NotFound("Attachment not found".into()))?;

    let disposition = format!(
        "inline; filename=\"{}\"",
        attachment.file_name.replace(['"', '\\', '\r', '\n'], "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, attachment.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        attachment.data,
    )
        .into_response())
}
