//! Persistence boundary for users, profiles and mood entries.
//!
//! Handlers only talk to `dyn Store`; `PgStore` backs production and
//! `MemoryStore` backs tests and local runs without a database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::ProfileRequest;
use crate::error::AppResult;
use crate::models::mood::{Attachment, AttachmentKind, MoodEntrySummary, NewMoodEntry};
use crate::models::profile::UserProfile;
use crate::models::user::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> bool;

    /// Fails with `AppError::Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>>;

    async fn profile_exists(&self, user_id: Uuid) -> AppResult<bool>;

    /// Create-or-update keyed by `user_id`.
    async fn upsert_profile(&self, user_id: Uuid, profile: &ProfileRequest) -> AppResult<UserProfile>;

    async fn append_mood_entry(&self, entry: NewMoodEntry) -> AppResult<MoodEntrySummary>;

    /// Newest first.
    async fn list_mood_entries(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<MoodEntrySummary>>;

    async fn find_mood_attachment(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        kind: AttachmentKind,
    ) -> AppResult<Option<Attachment>>;
}
