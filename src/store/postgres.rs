use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::dto::ProfileRequest;
use crate::error::{AppError, AppResult};
use crate::models::mood::{Attachment, AttachmentKind, MoodEntrySummary, NewMoodEntry};
use crate::models::profile::UserProfile;
use crate::models::user::{NewUser, User};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

fn split_attachment(a: Option<&Attachment>) -> (Option<&[u8]>, Option<&str>, Option<&str>) {
    match a {
        Some(a) => (
            Some(a.data.as_slice()),
            Some(a.content_type.as_str()),
            Some(a.file_name.as_str()),
        ),
        None => (None, None, None),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .is_ok()
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict("Email already registered".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(profile)
    }

    async fn profile_exists(&self, user_id: Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_profiles WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn upsert_profile(&self, user_id: Uuid, p: &ProfileRequest) -> AppResult<UserProfile> {
        let goals: Vec<String> = p.wellness_goals.iter().cloned().collect();

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (
                id, user_id, age, gender, occupation, sleep_hours, exercise_frequency,
                stress_level, wellness_goals, energy_level, additional_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                occupation = EXCLUDED.occupation,
                sleep_hours = EXCLUDED.sleep_hours,
                exercise_frequency = EXCLUDED.exercise_frequency,
                stress_level = EXCLUDED.stress_level,
                wellness_goals = EXCLUDED.wellness_goals,
                energy_level = EXCLUDED.energy_level,
                additional_info = EXCLUDED.additional_info,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(p.age)
        .bind(p.gender)
        .bind(p.occupation.trim())
        .bind(p.sleep_hours)
        .bind(p.exercise_frequency)
        .bind(p.stress_level)
        .bind(&goals)
        .bind(p.energy_level)
        .bind(&p.additional_info)
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }

    async fn append_mood_entry(&self, entry: NewMoodEntry) -> AppResult<MoodEntrySummary> {
        let (audio_data, audio_type, audio_name) = split_attachment(entry.audio.as_ref());
        let (image_data, image_type, image_name) = split_attachment(entry.image.as_ref());

        let summary = sqlx::query_as::<_, MoodEntrySummary>(
            r#"
            INSERT INTO mood_entries (
                id, user_id, mood_text,
                audio_data, audio_content_type, audio_file_name,
                image_data, image_content_type, image_file_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, mood_text,
                audio_data IS NOT NULL AS has_audio,
                image_data IS NOT NULL AS has_image,
                created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(&entry.mood_text)
        .bind(audio_data)
        .bind(audio_type)
        .bind(audio_name)
        .bind(image_data)
        .bind(image_type)
        .bind(image_name)
        .fetch_one(&self.db)
        .await?;

        Ok(summary)
    }

    async fn list_mood_entries(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<MoodEntrySummary>> {
        let entries = sqlx::query_as::<_, MoodEntrySummary>(
            r#"
            SELECT id, user_id, mood_text,
                audio_data IS NOT NULL AS has_audio,
                image_data IS NOT NULL AS has_image,
                created_at
            FROM mood_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn find_mood_attachment(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        kind: AttachmentKind,
    ) -> AppResult<Option<Attachment>> {
        let sql = match kind {
            AttachmentKind::Audio => {
                r#"
                SELECT audio_file_name, audio_content_type, audio_data
                FROM mood_entries
                WHERE id = $1 AND user_id = $2 AND audio_data IS NOT NULL
                "#
            }
            AttachmentKind::Image => {
                r#"
                SELECT image_file_name, image_content_type, image_data
                FROM mood_entries
                WHERE id = $1 AND user_id = $2 AND image_data IS NOT NULL
                "#
            }
        };

        let row = sqlx::query_as::<_, (String, String, Vec<u8>)>(sql)
            .bind(entry_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(|(file_name, content_type, data)| Attachment {
            file_name,
            content_type,
            data,
        }))
    }
}
