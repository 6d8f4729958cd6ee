use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "gender", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "exercise_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    Never,
    Rarely,
    Occasionally,
    Regularly,
    Daily,
}

impl ExerciseFrequency {
    pub const ALL: [ExerciseFrequency; 5] = [
        ExerciseFrequency::Never,
        ExerciseFrequency::Rarely,
        ExerciseFrequency::Occasionally,
        ExerciseFrequency::Regularly,
        ExerciseFrequency::Daily,
    ];
}

/// Goals offered by the profile wizard. The server accepts any non-blank goal.
pub const SUGGESTED_WELLNESS_GOALS: [&str; 6] = [
    "Better Sleep",
    "Stress Management",
    "Physical Fitness",
    "Mental Health",
    "Work-Life Balance",
    "Healthy Eating",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub gender: Gender,
    pub occupation: String,
    pub sleep_hours: f64,
    pub exercise_frequency: ExerciseFrequency,
    pub stress_level: i32,
    pub wellness_goals: Vec<String>,
    pub energy_level: i32,
    pub additional_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
