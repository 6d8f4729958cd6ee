//! Drives the client controllers against the real router on a loopback port.

mod common;

use std::net::SocketAddr;

use wellspring_api::build_router;
use wellspring_api::client::flow::media::{MediaDevices, MediaError, MediaStream};
use wellspring_api::client::flow::{
    FlowError, LoginForm, MoodForm, ProfileWizard, Route, SignupForm, WizardStep,
};
use wellspring_api::client::{ApiClient, ClientError, Session};
use wellspring_api::models::mood::MoodCategory;
use wellspring_api::models::profile::{ExerciseFrequency, Gender};

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(common::app_state());
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{addr}/api/"), Session::in_memory()).unwrap()
}

/// Microphone that always hears the same bytes, and a camera with one frame.
struct CannedDevices;

struct CannedStream(&'static [u8]);

impl MediaStream for CannedStream {
    fn read(&mut self) -> Result<Vec<u8>, MediaError> {
        Ok(self.0.to_vec())
    }

    fn stop_tracks(&mut self) {}
}

impl MediaDevices for CannedDevices {
    fn open_microphone(&self) -> Result<Box<dyn MediaStream>, MediaError> {
        Ok(Box::new(CannedStream(b"RIFF-audio")))
    }

    fn open_camera(&self) -> Result<Box<dyn MediaStream>, MediaError> {
        Ok(Box::new(CannedStream(&[0xFF, 0xD8, 0xFF, 0xD9])))
    }
}

fn signup_form(name: &str, email: &str, password: &str) -> SignupForm {
    let mut form = SignupForm::new();
    form.name = name.into();
    form.email = email.into();
    form.password = password.into();
    form.confirm_password = password.into();
    form
}

fn login_form(email: &str, password: &str) -> LoginForm {
    let mut form = LoginForm::new();
    form.email = email.into();
    form.password = password.into();
    form
}

async fn sign_up_and_log_in(api: &ApiClient, email: &str) -> Route {
    let mut signup = signup_form("Grace Hopper", email, "cobol59");
    assert_eq!(signup.submit(api).await.unwrap(), Route::Login);

    let mut login = login_form(email, "cobol59");
    login.submit(api, api.session()).await.unwrap()
}

#[tokio::test]
async fn test_new_user_journey() {
    let addr = spawn_server().await;
    let api = client(addr);

    let route = sign_up_and_log_in(&api, "grace@example.com").await;
    assert_eq!(route, Route::Profile);
    assert!(api.session().is_authenticated());

    let mut wizard = ProfileWizard::new();
    assert!(!wizard.load_existing(&api).await.unwrap());

    {
        let draft = wizard.draft_mut();
        draft.age = Some(41);
        draft.gender = Some(Gender::Female);
        draft.occupation = "Rear admiral".into();
    }
    assert_eq!(wizard.next().unwrap(), WizardStep::Lifestyle);
    {
        let draft = wizard.draft_mut();
        draft.sleep_hours = Some(6.0);
        draft.exercise_frequency = Some(ExerciseFrequency::Rarely);
        draft.stress_level = Some(8);
    }
    assert_eq!(wizard.next().unwrap(), WizardStep::Goals);
    wizard.draft_mut().set_goal("Work-Life Balance", true);

    assert_eq!(wizard.submit(&api).await.unwrap(), None);
    assert_eq!(wizard.complete(&api).await.unwrap(), Some(Route::Mood));

    let mut mood = MoodForm::new();
    mood.select_mood(MoodCategory::Excited);
    mood.set_text("compiler works");
    mood.start_recording(&CannedDevices).unwrap();
    mood.capture_photo(&CannedDevices).unwrap();

    let saved = mood.submit(&api).await.unwrap();
    assert_eq!(saved.mood_text, "Excited: compiler works");
    assert!(saved.has_audio);
    assert!(saved.has_image);
    assert_eq!(mood.notice(), Some("Mood entry saved successfully!"));

    // A returning user lands on the mood screen and sees the saved profile.
    let returning = client(addr);
    let mut login = login_form("grace@example.com", "cobol59");
    assert_eq!(
        login.submit(&returning, returning.session()).await.unwrap(),
        Route::Mood
    );

    let mut wizard = ProfileWizard::new();
    assert!(wizard.load_existing(&returning).await.unwrap());
    assert_eq!(wizard.draft().occupation, "Rear admiral");
    assert_eq!(wizard.draft().stress_level, Some(8));
    assert!(wizard.draft().wellness_goals.contains("Work-Life Balance"));
}

#[tokio::test]
async fn test_duplicate_signup_surfaces_server_message() {
    let addr = spawn_server().await;
    let api = client(addr);
    sign_up_and_log_in(&api, "dup@example.com").await;

    let mut again = signup_form("Someone", "dup@example.com", "secret1");
    let err = again.submit(&api).await.unwrap_err();
    assert!(matches!(err, FlowError::Api(ClientError::Conflict(_))));
    assert_eq!(again.error(), Some("Email already registered"));
}

#[tokio::test]
async fn test_wrong_password_stays_logged_out() {
    let addr = spawn_server().await;
    let api = client(addr);
    sign_up_and_log_in(&api, "ada@example.com").await;

    let fresh = client(addr);
    let mut login = login_form("ada@example.com", "wrong-password");
    assert!(login.submit(&fresh, fresh.session()).await.is_err());
    assert_eq!(login.error(), Some("Invalid email or password"));
    assert!(!fresh.session().is_authenticated());
}

#[tokio::test]
async fn test_logged_out_client_cannot_save_mood() {
    let addr = spawn_server().await;
    let api = client(addr);

    let mut mood = MoodForm::new();
    mood.select_mood(MoodCategory::Sad);
    let err = mood.submit(&api).await.unwrap_err();
    assert!(matches!(err, FlowError::Api(ClientError::Unauthorized(_))));
    assert_eq!(mood.mood(), Some(MoodCategory::Sad));
}
