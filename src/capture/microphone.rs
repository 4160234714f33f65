use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use super::backend::{AudioChunk, CaptureBackend, CaptureHandle, CaptureSpec};
use crate::error::CaptureError;

/// Default input device via cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated OS thread
/// that is told to stop through an atomic flag. Chunks are interleaved
/// 16-bit LE PCM in the device's native rate and channel layout.
pub struct MicrophoneBackend;

#[async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn acquire(
        &self,
    ) -> Result<(Box<dyn CaptureHandle>, mpsc::UnboundedReceiver<AudioChunk>), CaptureError> {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (init_tx, init_rx) = oneshot::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let join = thread::spawn(move || run_capture_thread(chunk_tx, init_tx, stop_flag));

        let spec = init_rx
            .await
            .map_err(|_| CaptureError::DeviceUnavailable)??;

        Ok((
            Box::new(MicrophoneHandle {
                spec,
                stop,
                join: Some(join),
            }),
            chunk_rx,
        ))
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

struct MicrophoneHandle {
    spec: CaptureSpec,
    stop: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

#[async_trait]
impl CaptureHandle for MicrophoneHandle {
    fn spec(&self) -> CaptureSpec {
        self.spec
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        self.stop.store(true, Ordering::SeqCst);

        if let Some(join) = self.join.take() {
            // The capture thread exits promptly once the flag is seen; join
            // off the async runtime so a slow device can't block it.
            let _ = tokio::task::spawn_blocking(move || join.join()).await;
        }

        Ok(())
    }
}

impl Drop for MicrophoneHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

fn run_capture_thread(
    chunk_tx: mpsc::UnboundedSender<AudioChunk>,
    init_tx: oneshot::Sender<Result<CaptureSpec, CaptureError>>,
    stop: Arc<AtomicBool>,
) {
    let host = cpal::default_host();

    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = init_tx.send(Err(CaptureError::DeviceUnavailable));
            return;
        }
    };

    let stream_config = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = init_tx.send(Err(classify_device_error(&e.to_string())));
            return;
        }
    };

    let spec = CaptureSpec {
        sample_rate: stream_config.sample_rate().0,
        channels: stream_config.channels(),
    };

    info!(
        "microphone: {} Hz, {} channels, device={}",
        spec.sample_rate,
        spec.channels,
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let stream = match stream_config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &stream_config.into(), chunk_tx)
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &stream_config.into(), chunk_tx)
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &stream_config.into(), chunk_tx)
        }
        _ => Err(cpal::BuildStreamError::DeviceNotAvailable),
    };

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = init_tx.send(Err(classify_device_error(&e.to_string())));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = init_tx.send(Err(CaptureError::Stream(e.to_string())));
        return;
    }

    let _ = init_tx.send(Ok(spec));

    while !stop.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(20));
    }

    // Dropping the stream stops the device; dropping the sender (moved into
    // the stream callback) closes the chunk channel.
    drop(stream);
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    chunk_tx: mpsc::UnboundedSender<AudioChunk>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: Sample + SizedSample + Send + 'static,
    i16: FromSample<T>,
{
    let err_fn = |err: cpal::StreamError| error!("audio stream error: {}", err);

    device.build_input_stream(
        config,
        move |data: &[T], _: &_| {
            let mut bytes = Vec::with_capacity(data.len() * 2);
            for &sample in data {
                bytes.extend_from_slice(&sample.to_sample::<i16>().to_le_bytes());
            }
            // The receiver side going away just means the session ended.
            let _ = chunk_tx.send(bytes);
        },
        err_fn,
        None,
    )
}

fn classify_device_error(message: &str) -> CaptureError {
    if message.to_ascii_lowercase().contains("permission") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::DeviceUnavailable
    }
}
