use super::{FlowError, InFlight, Route};
use crate::client::api::WellnessApi;
use crate::client::session::Session;
use crate::dto::LoginRequest;

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Logs in, stores the token in `session`, and picks the next screen:
    /// the mood screen for users with a profile, the profile wizard otherwise.
    pub async fn submit(
        &mut self,
        api: &dyn WellnessApi,
        session: &Session,
    ) -> Result<Route, FlowError> {
        self.error = None;
        let result = self.try_submit(api, session).await;
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    async fn try_submit(
        &mut self,
        api: &dyn WellnessApi,
        session: &Session,
    ) -> Result<Route, FlowError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FlowError::Validation(
                "Please enter your email and password.".into(),
            ));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        };

        let response = {
            let _in_flight = InFlight::begin(&mut self.loading);
            api.login(&request).await?
        };

        if response.token.is_empty() {
            return Err(FlowError::MissingToken);
        }
        session.set_token(&response.token)?;

        let next = if response.has_profile {
            Route::Mood
        } else {
            Route::Profile
        };
        tracing::debug!(route = next.path(), "Login succeeded");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ClientError;
    use crate::client::testing::FakeApi;

    fn form() -> LoginForm {
        LoginForm {
            email: "ada@example.com".into(),
            password: "secret1".into(),
            ..LoginForm::default()
        }
    }

    #[tokio::test]
    async fn test_new_user_routes_to_profile() {
        let api = FakeApi::default();
        let session = Session::in_memory();

        let route = form().submit(&api, &session).await.unwrap();
        assert_eq!(route, Route::Profile);
        assert_eq!(session.token().as_deref(), Some(FakeApi::TOKEN));
    }

    #[tokio::test]
    async fn test_user_with_profile_routes_to_mood() {
        let api = FakeApi {
            has_profile: true,
            ..FakeApi::default()
        };
        let session = Session::in_memory();

        assert_eq!(form().submit(&api, &session).await.unwrap(), Route::Mood);
    }

    #[tokio::test]
    async fn test_bad_credentials_keep_user_on_login() {
        let api = FakeApi::failing(ClientError::Unauthorized("Invalid email or password".into()));
        let session = Session::in_memory();
        let mut form = form();

        let err = form.submit(&api, &session).await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ClientError::Unauthorized(_))));
        assert_eq!(form.error(), Some("Invalid email or password"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unreachable_server_has_distinct_message() {
        let api = FakeApi::failing(ClientError::Network("connection refused".into()));
        let session = Session::in_memory();
        let mut form = form();

        form.submit(&api, &session).await.unwrap_err();
        assert!(form.error().unwrap().starts_with("Cannot connect to server"));
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let api = FakeApi {
            token: String::new(),
            ..FakeApi::default()
        };
        let session = Session::in_memory();
        let mut form = form();

        let err = form.submit(&api, &session).await.unwrap_err();
        assert!(matches!(err, FlowError::MissingToken));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_empty_fields_send_nothing() {
        let api = FakeApi::default();
        let session = Session::in_memory();
        let mut form = LoginForm::new();

        assert!(matches!(
            form.submit(&api, &session).await,
            Err(FlowError::Validation(_))
        ));
        assert!(api.calls().is_empty());
    }
}
