use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::dto::ProfileRequest;
use crate::error::{AppError, AppResult};
use crate::models::mood::{Attachment, AttachmentKind, MoodEntrySummary, NewMoodEntry};
use crate::models::profile::UserProfile;
use crate::models::user::{NewUser, User};

/// In-process store for tests and `STORAGE=memory` runs. Data is lost on exit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, UserProfile>,
    moods: Vec<StoredMood>,
}

struct StoredMood {
    summary: MoodEntrySummary,
    audio: Option<Attachment>,
    image: Option<Attachment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let inner = self.inner.lock().await;
        Ok(inner.profiles.get(&user_id).cloned())
    }

    async fn profile_exists(&self, user_id: Uuid) -> AppResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.profiles.contains_key(&user_id))
    }

    async fn upsert_profile(&self, user_id: Uuid, p: &ProfileRequest) -> AppResult<UserProfile> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();
        let (id, created_at) = match inner.profiles.get(&user_id) {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::new_v4(), now),
        };

        let profile = UserProfile {
            id,
            user_id,
            age: p.age,
            gender: p.gender,
            occupation: p.occupation.trim().to_string(),
            sleep_hours: p.sleep_hours,
            exercise_frequency: p.exercise_frequency,
            stress_level: p.stress_level,
            wellness_goals: p.wellness_goals.iter().cloned().collect(),
            energy_level: p.energy_level,
            additional_info: p.additional_info.clone(),
            created_at,
            updated_at: now,
        };
        inner.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn append_mood_entry(&self, entry: NewMoodEntry) -> AppResult<MoodEntrySummary> {
        let mut inner = self.inner.lock().await;
        let summary = MoodEntrySummary {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            mood_text: entry.mood_text,
            has_audio: entry.audio.is_some(),
            has_image: entry.image.is_some(),
            created_at: Utc::now(),
        };
        inner.moods.push(StoredMood {
            summary: summary.clone(),
            audio: entry.audio,
            image: entry.image,
        });
        Ok(summary)
    }

    async fn list_mood_entries(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<MoodEntrySummary>> {
        let inner = self.inner.lock().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        // Appends are chronological, so reverse iteration is newest first.
        Ok(inner
            .moods
            .iter()
            .rev()
            .filter(|m| m.summary.user_id == user_id)
            .take(limit)
            .map(|m| m.summary.clone())
            .collect())
    }

    async fn find_mood_attachment(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        kind: AttachmentKind,
    ) -> AppResult<Option<Attachment>> {
        let inner = self.inner.lock().await;
        let Some(stored) = inner
            .moods
            .iter()
            .find(|m| m.summary.id == entry_id && m.summary.user_id == user_id)
        else {
            return Ok(None);
        };

        Ok(match kind {
            AttachmentKind::Audio => stored.audio.clone(),
            AttachmentKind::Image => stored.image.clone(),
        })
    }
}
