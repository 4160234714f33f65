use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::CaptureError;

/// One opaque binary chunk emitted by a capture backend.
pub type AudioChunk = Vec<u8>;

/// Format of the PCM stream a capture handle emits (16-bit LE, interleaved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSpec {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

/// Microphone capability.
///
/// `acquire` requests exclusive access to the input device. A missing
/// capability is an explicit `DeviceUnavailable` error, never a crash.
/// Implementations:
/// - `MicrophoneBackend`: cpal default input device
/// - test backends emitting scripted chunk sequences
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Acquire the microphone.
    ///
    /// Returns a live handle plus the channel on which PCM chunks arrive,
    /// strictly in emission order.
    async fn acquire(
        &self,
    ) -> Result<(Box<dyn CaptureHandle>, mpsc::UnboundedReceiver<AudioChunk>), CaptureError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Exclusive hold on a live input stream.
#[async_trait]
pub trait CaptureHandle: Send {
    fn spec(&self) -> CaptureSpec;

    /// Stop the device stream and close the chunk channel.
    ///
    /// Must run on every exit path (stop, error, unmount) so the device is
    /// never left locked.
    async fn release(&mut self) -> Result<(), CaptureError>;
}
