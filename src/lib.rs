pub mod capture;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod transcribe;

pub use capture::{
    encode_wav, ActiveCapture, AudioBuffer, AudioChunk, CaptureBackend, CaptureHandle,
    CaptureSpec, MicrophoneBackend,
};
pub use config::Config;
pub use controller::{
    ControllerState, DemoCycle, DemoPhase, DemoScheduler, RecordingController, SessionEvents,
    SessionTimer,
};
pub use dashboard::{group_events_by_day, CalendarClient, CalendarEvent, PreVisitReport, ReportClient};
pub use error::{CaptureError, TranscribeError};
pub use transcribe::{HttpTranscriptionClient, Transcript, TranscriptionClient};
