use thiserror::Error;

/// Capture failures surfaced to the UI before or during a recording session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no usable audio input device")]
    DeviceUnavailable,

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("failed to encode audio payload: {0}")]
    Encode(String),
}

/// Transcription failures. Never retried automatically; the user re-initiates.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcription service returned status {status}")]
    Failed { status: u16 },
}
