//! Mood capture screen: one category, optional note, optional voice
//! recording and photo, submitted together as a single multipart request.

use super::media::{capture_still, MediaDevices, Recording};
use super::{FlowError, InFlight};
use crate::client::api::{MoodSubmission, WellnessApi};
use crate::dto::MoodEntryResponse;
use crate::models::mood::{Attachment, MoodCategory};

pub const SAVED_NOTICE: &str = "Mood entry saved successfully!";

const MOOD_REQUIRED: &str = "Please select a mood";
const MICROPHONE_ERROR: &str = "Could not access microphone. Please check permissions.";
const CAMERA_ERROR: &str = "Could not access camera. Please check permissions.";
const RECORDING_INTERRUPTED: &str =
    "Recording was interrupted. Any audio captured before that has been kept.";

#[derive(Default)]
pub struct MoodForm {
    mood: Option<MoodCategory>,
    text: String,
    recording: Option<Recording>,
    audio: Option<Attachment>,
    image: Option<Attachment>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl MoodForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_mood(&mut self, mood: MoodCategory) {
        self.mood = Some(mood);
        self.error = None;
    }

    pub fn mood(&self) -> Option<MoodCategory> {
        self.mood
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Opens the microphone. A second call while already recording is ignored.
    pub fn start_recording(&mut self, devices: &dyn MediaDevices) -> Result<(), FlowError> {
        if self.recording.is_some() {
            return Ok(());
        }

        match Recording::start(devices) {
            Ok(recording) => {
                self.recording = Some(recording);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Microphone unavailable");
                self.error = Some(MICROPHONE_ERROR.to_string());
                Err(FlowError::Device(MICROPHONE_ERROR.into()))
            }
        }
    }

    /// Finalizes the active recording into the audio attachment, replacing any
    /// earlier one. No-op when nothing is recording. If the microphone fails
    /// while finalizing, whatever was captured so far becomes the attachment.
    pub fn stop_recording(&mut self) -> Result<(), FlowError> {
        let Some(recording) = self.recording.take() else {
            return Ok(());
        };

        match recording.finish() {
            Ok(audio) => {
                self.audio = Some(audio);
                Ok(())
            }
            Err(interrupted) => {
                tracing::warn!(
                    error = %interrupted.error,
                    kept_bytes = interrupted.partial.as_ref().map_or(0, Attachment::len),
                    "Recording interrupted"
                );
                if let Some(partial) = interrupted.partial {
                    self.audio = Some(partial);
                }
                self.error = Some(RECORDING_INTERRUPTED.to_string());
                Err(FlowError::Device(RECORDING_INTERRUPTED.into()))
            }
        }
    }

    /// Drains what the microphone buffered since the last call. Called on the
    /// same tick that refreshes `recording_elapsed`. A device failure ends the
    /// recording the same way `stop_recording` does.
    pub fn poll_recording(&mut self) -> Result<(), FlowError> {
        let Some(recording) = self.recording.as_mut() else {
            return Ok(());
        };

        match recording.pull() {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(error = %e, "Microphone read failed");
                self.stop_recording()
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn recording_elapsed(&self) -> Option<u64> {
        self.recording.as_ref().map(Recording::elapsed_secs)
    }

    pub fn capture_photo(&mut self, devices: &dyn MediaDevices) -> Result<(), FlowError> {
        match capture_still(devices) {
            Ok(photo) => {
                self.image = Some(photo);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Camera unavailable");
                self.error = Some(CAMERA_ERROR.to_string());
                Err(FlowError::Device(CAMERA_ERROR.into()))
            }
        }
    }

    pub fn discard_photo(&mut self) {
        self.image = None;
    }

    /// Drops the finished recording, or abandons the one in progress.
    pub fn discard_audio(&mut self) {
        self.recording = None;
        self.audio = None;
    }

    pub fn audio(&self) -> Option<&Attachment> {
        self.audio.as_ref()
    }

    pub fn image(&self) -> Option<&Attachment> {
        self.image.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.mood.is_some() && !self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Saves the entry. A recording still running is finalized first so its
    /// audio goes out with this submission. On success the form is cleared
    /// for the next entry; on failure everything is kept for a retry.
    pub async fn submit(&mut self, api: &dyn WellnessApi) -> Result<MoodEntryResponse, FlowError> {
        self.notice = None;
        let Some(mood) = self.mood else {
            self.error = Some(MOOD_REQUIRED.to_string());
            return Err(FlowError::Validation(MOOD_REQUIRED.into()));
        };
        if self.loading {
            return Err(FlowError::Validation("A save is already in progress".into()));
        }

        self.stop_recording()?;
        self.error = None;

        let submission = MoodSubmission {
            mood_text: mood.label(&self.text),
            audio: self.audio.clone(),
            image: self.image.clone(),
        };

        let result = {
            let _in_flight = InFlight::begin(&mut self.loading);
            api.save_mood(submission).await
        };

        match result {
            Ok(saved) => {
                tracing::debug!(entry_id = %saved.id, "Mood entry saved");
                self.reset();
                self.notice = Some(SAVED_NOTICE.to_string());
                Ok(saved)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
