//! Scripted `WellnessApi` for the flow controller tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use super::api::{MoodSubmission, WellnessApi};
use super::error::{ClientError, ClientResult};
use crate::dto::{
    LoginRequest, LoginResponse, MoodEntryResponse, ProfileRequest, ProfileResponse,
    RegisterRequest, RegisterResponse, UserSummary,
};

#[derive(Debug, Clone)]
pub(crate) enum Call {
    Register(RegisterRequest),
    Login(LoginRequest),
    GetProfile,
    SaveProfile(ProfileRequest),
    SaveMood(MoodSubmission),
}

pub(crate) struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub has_profile: bool,
    pub token: String,
    pub existing_profile: Option<ProfileResponse>,
    pub fail_with: Option<ClientError>,
    /// Every call stays pending forever once recorded.
    pub hang: bool,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            has_profile: false,
            token: Self::TOKEN.to_string(),
            existing_profile: None,
            fail_with: None,
            hang: false,
        }
    }
}

impl FakeApi {
    pub const TOKEN: &'static str = "test-token";

    pub fn failing(err: ClientError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn profile_response(req: &ProfileRequest) -> ProfileResponse {
        let now = Utc::now();
        ProfileResponse {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            age: req.age,
            gender: req.gender,
            occupation: req.occupation.clone(),
            sleep_hours: req.sleep_hours,
            exercise_frequency: req.exercise_frequency,
            stress_level: req.stress_level,
            wellness_goals: req.wellness_goals.clone(),
            energy_level: req.energy_level,
            additional_info: req.additional_info.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn user(name: &str, email: &str) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    async fn record(&self, call: Call) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.hang {
            std::future::pending::<()>().await;
        }
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WellnessApi for FakeApi {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.record(Call::Register(req.clone())).await?;
        Ok(RegisterResponse {
            message: "User registered successfully".into(),
            user: Self::user(&req.name, &req.email),
        })
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse> {
        self.record(Call::Login(req.clone())).await?;
        Ok(LoginResponse {
            token: self.token.clone(),
            has_profile: self.has_profile,
            user: Self::user("Ada", &req.email),
        })
    }

    async fn get_profile(&self) -> ClientResult<Option<ProfileResponse>> {
        self.record(Call::GetProfile).await?;
        Ok(self.existing_profile.clone())
    }

    async fn save_profile(&self, req: &ProfileRequest) -> ClientResult<ProfileResponse> {
        self.record(Call::SaveProfile(req.clone())).await?;
        Ok(Self::profile_response(req))
    }

    async fn save_mood(&self, submission: MoodSubmission) -> ClientResult<MoodEntryResponse> {
        let response = MoodEntryResponse {
            id: Uuid::new_v4(),
            mood_text: submission.mood_text.clone(),
            has_audio: submission.audio.is_some(),
            has_image: submission.image.is_some(),
            created_at: Utc::now(),
        };
        self.record(Call::SaveMood(submission)).await?;
        Ok(response)
    }
}
