use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use super::session::Session;
use crate::dto::{
    LoginRequest, LoginResponse, MoodEntryResponse, ProfileRequest, ProfileResponse,
    RegisterRequest, RegisterResponse,
};
use crate::models::mood::{Attachment, MOOD_AUDIO_FIELD, MOOD_IMAGE_FIELD, MOOD_TEXT_FIELD};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Everything a mood entry submission carries.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSubmission {
    pub mood_text: String,
    pub audio: Option<Attachment>,
    pub image: Option<Attachment>,
}

/// Request layer used by the flow controllers. One request per call, no
/// retries, errors handed back unchanged.
#[async_trait]
pub trait WellnessApi: Send + Sync {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<RegisterResponse>;

    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse>;

    /// `Ok(None)` when the user has no profile yet.
    async fn get_profile(&self) -> ClientResult<Option<ProfileResponse>>;

    async fn save_profile(&self, req: &ProfileRequest) -> ClientResult<ProfileResponse>;

    async fn save_mood(&self, submission: MoodSubmission) -> ClientResult<MoodEntryResponse>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL from `WELLSPRING_API_URL`, falling back to the local default.
    pub fn from_env(session: Session) -> ClientResult<Self> {
        let base_url =
            std::env::var("WELLSPRING_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url, session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ClientError::Unauthorized("Please log in to continue.".into()))?;
        Ok(builder.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "API request failed");
            Err(ClientError::from_response(status.as_u16(), &body))
        }
    }
}

fn attachment_part(attachment: Attachment) -> ClientResult<Part> {
    Part::bytes(attachment.data)
        .file_name(attachment.file_name)
        .mime_str(&attachment.content_type)
        .map_err(|e| ClientError::Request(e.to_string()))
}

#[async_trait]
impl WellnessApi for ApiClient {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.send(self.http.post(self.url("/auth/register")).json(req))
            .await
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse> {
        self.send(self.http.post(self.url("/auth/login")).json(req))
            .await
    }

    async fn get_profile(&self) -> ClientResult<Option<ProfileResponse>> {
        let request = self.authorized(self.http.get(self.url("/profile")))?;
        match self.send(request).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_profile(&self, req: &ProfileRequest) -> ClientResult<ProfileResponse> {
        let request = self.authorized(self.http.post(self.url("/profile")).json(req))?;
        self.send(request).await
    }

    async fn save_mood(&self, submission: MoodSubmission) -> ClientResult<MoodEntryResponse> {
        let mut form = Form::new().text(MOOD_TEXT_FIELD, submission.mood_text);
        if let Some(audio) = submission.audio {
            form = form.part(MOOD_AUDIO_FIELD, attachment_part(audio)?);
        }
        if let Some(image) = submission.image {
            form = form.part(MOOD_IMAGE_FIELD, attachment_part(image)?);
        }

        let request = self.authorized(self.http.post(self.url("/mood")).multipart(form))?;
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://example.test/api/", Session::in_memory()).unwrap();
        assert_eq!(client.url("/profile"), "http://example.test/api/profile");
    }

    #[tokio::test]
    async fn test_protected_calls_require_a_token() {
        let client = ApiClient::new("http://127.0.0.1:9/api", Session::in_memory()).unwrap();
        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}/api"), Session::in_memory()).unwrap();
        let err = client
            .login(&LoginRequest {
                email: "a@b.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_network(), "unexpected error: {err:?}");
    }
}
