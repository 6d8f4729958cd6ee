//! Screen controllers. Each one owns its form state, validates locally before
//! dispatching, issues at most one request per user action, and keeps its
//! state on failure so the user can retry.

pub mod login;
pub mod media;
pub mod mood;
pub mod route;
pub mod signup;
pub mod wizard;

pub use login::LoginForm;
pub use media::{
    MediaDevices, MediaError, MediaStream, Recording, RecordingInterrupted, StreamGuard,
};
pub use mood::MoodForm;
pub use route::Route;
pub use signup::SignupForm;
pub use wizard::{ProfileDraft, ProfileWizard, WizardStep};

use super::error::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Required input missing; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// Password too short or confirmation mismatch; nothing was sent.
    #[error("{0}")]
    PasswordPolicy(String),

    /// Microphone or camera could not be used.
    #[error("{0}")]
    Device(String),

    #[error("Login succeeded but no token returned.")]
    MissingToken,

    #[error("Could not store session: {0}")]
    Session(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Marks a request as in flight; the flag drops back to false however the
/// request ends, including when the future is cancelled.
pub(crate) struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    pub(crate) fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
