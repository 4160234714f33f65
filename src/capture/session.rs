use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{CaptureBackend, CaptureHandle, CaptureSpec};
use super::buffer::AudioBuffer;
use crate::error::CaptureError;

/// Upper bound on waiting for the chunk pump after the device is released.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// One live capture session: the device handle, the buffer, and the pump
/// task appending arriving chunks in order.
pub struct ActiveCapture {
    handle: Box<dyn CaptureHandle>,
    buffer: Arc<Mutex<AudioBuffer>>,
    pump: JoinHandle<()>,
}

impl ActiveCapture {
    /// Acquire the microphone and start buffering its chunks.
    pub async fn begin(backend: &dyn CaptureBackend) -> Result<Self, CaptureError> {
        let (handle, mut chunk_rx) = backend.acquire().await?;

        info!(
            "capture started via {} ({} Hz, {} ch)",
            backend.name(),
            handle.spec().sample_rate,
            handle.spec().channels
        );

        let buffer = Arc::new(Mutex::new(AudioBuffer::new()));
        let pump_buffer = Arc::clone(&buffer);

        let pump = tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                pump_buffer.lock().await.push(chunk);
            }
        });

        Ok(Self {
            handle,
            buffer,
            pump,
        })
    }

    pub fn spec(&self) -> CaptureSpec {
        self.handle.spec()
    }

    /// Stop the session and produce the payload for transcription.
    ///
    /// The device is released first, even if the payload cannot be built
    /// afterwards. The pump is then joined so every chunk emitted before the
    /// stop lands in the buffer, and the concatenated PCM is wrapped in a
    /// WAV container.
    pub async fn finalize(mut self) -> Result<Vec<u8>, CaptureError> {
        let released = self.handle.release().await;

        // The backend drops its sender on release, which ends the pump.
        if tokio::time::timeout(DRAIN_TIMEOUT, &mut self.pump)
            .await
            .is_err()
        {
            warn!("chunk pump did not drain in time, aborting it");
            self.pump.abort();
        }

        released?;

        let buffer = {
            let mut guard = self.buffer.lock().await;
            std::mem::take(&mut *guard)
        };

        debug!(
            "finalizing capture: {} chunks, {} bytes",
            buffer.chunk_count(),
            buffer.total_bytes()
        );

        encode_wav(&buffer.finalize(), self.handle.spec())
    }

    /// Tear the session down without producing a payload.
    pub async fn abort(mut self) {
        if let Err(e) = self.handle.release().await {
            warn!("failed to release capture device on abort: {}", e);
        }
        self.pump.abort();
    }
}

/// Wrap raw 16-bit LE PCM in a WAV container for the transcription upload.
pub fn encode_wav(pcm: &[u8], spec: CaptureSpec) -> Result<Vec<u8>, CaptureError> {
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    if pcm.len() % 2 != 0 {
        warn!("capture payload has a trailing odd byte, dropping it");
    }

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;

        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
