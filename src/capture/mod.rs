//! Audio capture service
//!
//! Acquires the microphone through the `CaptureBackend` capability, buffers
//! encoded chunks in arrival order, and finalizes them into a single WAV
//! payload when the session stops. The device is released on every exit
//! path.

mod backend;
mod buffer;
mod microphone;
mod session;

pub use backend::{AudioChunk, CaptureBackend, CaptureHandle, CaptureSpec};
pub use buffer::AudioBuffer;
pub use microphone::MicrophoneBackend;
pub use session::{encode_wav, ActiveCapture};
