//! Microphone and camera access.
//!
//! A platform shell implements `MediaDevices`; controllers only ever hold a
//! device through `StreamGuard`, whose `Drop` stops the stream's tracks.
//! Stop, single-shot capture, read errors and dropping the owning form all
//! release the device the same way.

use tokio::time::Instant;

use crate::models::mood::Attachment;

pub const RECORDING_FILE_NAME: &str = "recording.wav";
pub const RECORDING_CONTENT_TYPE: &str = "audio/wav";
pub const PHOTO_FILE_NAME: &str = "mood-photo.jpg";
pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("capture failed: {0}")]
    Capture(String),
}

/// The device failed while a recording was being finalized. `partial` holds
/// the audio pulled before the failure, if any.
#[derive(Debug, thiserror::Error)]
#[error("recording interrupted: {error}")]
pub struct RecordingInterrupted {
    pub error: MediaError,
    pub partial: Option<Attachment>,
}

pub trait MediaStream: Send {
    /// Bytes captured since the previous read. For a camera, one frame.
    fn read(&mut self) -> Result<Vec<u8>, MediaError>;

    /// Releases the underlying device. Must tolerate repeated calls.
    fn stop_tracks(&mut self);
}

pub trait MediaDevices: Send + Sync {
    fn open_microphone(&self) -> Result<Box<dyn MediaStream>, MediaError>;

    fn open_camera(&self) -> Result<Box<dyn MediaStream>, MediaError>;
}

pub struct StreamGuard {
    stream: Box<dyn MediaStream>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self { stream }
    }

    pub fn read(&mut self) -> Result<Vec<u8>, MediaError> {
        self.stream.read()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.stream.stop_tracks();
    }
}

/// An active voice recording. Dropping it without `finish` discards the audio
/// and still releases the microphone.
pub struct Recording {
    guard: StreamGuard,
    buffer: Vec<u8>,
    started: Instant,
}

impl Recording {
    pub fn start(devices: &dyn MediaDevices) -> Result<Self, MediaError> {
        let stream = devices.open_microphone()?;
        tracing::debug!("Microphone acquired");
        Ok(Self {
            guard: StreamGuard::new(stream),
            buffer: Vec::new(),
            started: Instant::now(),
        })
    }

    /// Whole seconds since the recording started; ticks once per second.
    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Moves whatever the device buffered so far into the recording.
    pub fn pull(&mut self) -> Result<(), MediaError> {
        let chunk = self.guard.read()?;
        self.buffer.extend_from_slice(&chunk);
        Ok(())
    }

    /// Finalizes the audio into a single attachment and releases the microphone.
    pub fn finish(mut self) -> Result<Attachment, RecordingInterrupted> {
        if let Err(error) = self.pull() {
            let partial = (!self.buffer.is_empty()).then(|| self.take_attachment());
            return Err(RecordingInterrupted { error, partial });
        }

        let audio = self.take_attachment();
        tracing::debug!(bytes = audio.len(), secs = self.elapsed_secs(), "Recording finished");
        Ok(audio)
    }

    fn take_attachment(&mut self) -> Attachment {
        Attachment {
            file_name: RECORDING_FILE_NAME.into(),
            content_type: RECORDING_CONTENT_TYPE.into(),
            data: std::mem::take(&mut self.buffer),
        }
    }
}

/// Grabs one still frame and releases the camera before returning.
pub fn capture_still(devices: &dyn MediaDevices) -> Result<Attachment, MediaError> {
    let mut guard = StreamGuard::new(devices.open_camera()?);
    let frame = guard.read()?;
    if frame.is_empty() {
        return Err(MediaError::Capture("camera returned an empty frame".into()));
    }

    Ok(Attachment {
        file_name: PHOTO_FILE_NAME.into(),
        content_type: PHOTO_CONTENT_TYPE.into(),
        data: frame,
    })
}
