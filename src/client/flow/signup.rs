use super::{FlowError, InFlight, Route};
use crate::client::api::WellnessApi;
use crate::dto::{RegisterRequest, MIN_PASSWORD_LEN};

#[derive(Debug, Default, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    loading: bool,
    error: Option<String>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Local checks, in the order the user sees them.
    pub fn validate(&self) -> Result<RegisterRequest, FlowError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() || email.is_empty() {
            return Err(FlowError::Validation(
                "Please fill in all required fields.".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FlowError::PasswordPolicy(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
        }
        if self.password != self.confirm_password {
            return Err(FlowError::PasswordPolicy("Passwords do not match.".into()));
        }

        Ok(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }

    /// Registers without logging in; success sends the user to the login screen.
    pub async fn submit(&mut self, api: &dyn WellnessApi) -> Result<Route, FlowError> {
        self.error = None;

        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        let result = {
            let _in_flight = InFlight::begin(&mut self.loading);
            api.register(&request).await
        };

        match result {
            Ok(_) => Ok(Route::Login),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ClientError;
    use crate::client::testing::{Call, FakeApi};

    fn filled() -> SignupForm {
        SignupForm {
            name: " Ada ".into(),
            email: "ada@example.com ".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            ..SignupForm::default()
        }
    }

    #[tokio::test]
    async fn test_mismatched_confirmation_sends_nothing() {
        let api = FakeApi::default();
        let mut form = SignupForm {
            confirm_password: "secret2".into(),
            ..filled()
        };

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, FlowError::PasswordPolicy(_)));
        assert_eq!(form.error(), Some("Passwords do not match."));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_password_sends_nothing() {
        let api = FakeApi::default();
        let mut form = SignupForm {
            password: "12345".into(),
            confirm_password: "12345".into(),
            ..filled()
        };

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, FlowError::PasswordPolicy(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_sends_nothing() {
        let api = FakeApi::default();
        let mut form = SignupForm {
            name: "   ".into(),
            ..filled()
        };

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_trims_and_routes_to_login() {
        let api = FakeApi::default();
        let mut form = filled();

        assert_eq!(form.submit(&api).await.unwrap(), Route::Login);
        match api.calls().as_slice() {
            [Call::Register(req)] => {
                assert_eq!(req.name, "Ada");
                assert_eq!(req.email, "ada@example.com");
            }
            other => panic!("unexpected calls: {other:?}"),
        }
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_server_message() {
        let api = FakeApi::failing(ClientError::Conflict("Email already registered".into()));
        let mut form = filled();

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ClientError::Conflict(_))));
        assert_eq!(form.error(), Some("Email already registered"));
        assert_eq!(form.email, "ada@example.com ");
    }
}
