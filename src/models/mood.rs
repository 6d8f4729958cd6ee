use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Multipart field names of `POST /api/mood`.
pub const MOOD_TEXT_FIELD: &str = "mood_text";
pub const MOOD_AUDIO_FIELD: &str = "mood_audio";
pub const MOOD_IMAGE_FIELD: &str = "mood_image";

/// Opaque binary attachment; bytes are never inspected or transcoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Audio,
    Image,
}

impl FromStr for AttachmentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MoodCategory {
    Happy,
    Sad,
    Excited,
    Anxious,
    Calm,
    Angry,
    Grateful,
    Tired,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 8] = [
        MoodCategory::Happy,
        MoodCategory::Sad,
        MoodCategory::Excited,
        MoodCategory::Anxious,
        MoodCategory::Calm,
        MoodCategory::Angry,
        MoodCategory::Grateful,
        MoodCategory::Tired,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "Happy",
            MoodCategory::Sad => "Sad",
            MoodCategory::Excited => "Excited",
            MoodCategory::Anxious => "Anxious",
            MoodCategory::Calm => "Calm",
            MoodCategory::Angry => "Angry",
            MoodCategory::Grateful => "Grateful",
            MoodCategory::Tired => "Tired",
        }
    }

    /// Journal label stored with the entry: `"<mood>: <text>"`.
    pub fn label(&self, text: &str) -> String {
        format!("{}: {}", self.name(), text)
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub user_id: Uuid,
    pub mood_text: String,
    pub audio: Option<Attachment>,
    pub image: Option<Attachment>,
}

/// Entry metadata without attachment bytes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntrySummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_text: String,
    pub has_audio: bool,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
}
