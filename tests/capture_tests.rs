// Capture service tests: chunk ordering, WAV payload encoding, and the
// device-release guarantee.

mod common;

use std::io::Cursor;

use anyhow::Result;
use clinivoice::{encode_wav, ActiveCapture, AudioBuffer, CaptureBackend, CaptureSpec};
use common::ScriptedBackend;

#[test]
fn buffer_preserves_chunk_order() {
    let mut buffer = AudioBuffer::new();
    buffer.push(vec![1, 2]);
    buffer.push(vec![3]);
    buffer.push(vec![4, 5, 6]);

    assert_eq!(buffer.chunk_count(), 3);
    assert_eq!(buffer.total_bytes(), 6);
    assert_eq!(buffer.finalize(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn empty_buffer_finalizes_to_empty_payload() {
    let buffer = AudioBuffer::new();
    assert!(buffer.is_empty());
    assert!(buffer.finalize().is_empty());
}

#[test]
fn encode_wav_round_trips_through_hound() -> Result<()> {
    let samples: [i16; 4] = [100, -200, 300, -400];
    let mut pcm = Vec::new();
    for s in samples {
        pcm.extend_from_slice(&s.to_le_bytes());
    }

    let payload = encode_wav(
        &pcm,
        CaptureSpec {
            sample_rate: 16_000,
            channels: 1,
        },
    )?;

    let mut reader = hound::WavReader::new(Cursor::new(payload))?;
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let decoded: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(decoded, samples);
    Ok(())
}

#[test]
fn encode_wav_accepts_empty_payload() -> Result<()> {
    let payload = encode_wav(
        &[],
        CaptureSpec {
            sample_rate: 16_000,
            channels: 1,
        },
    )?;

    let reader = hound::WavReader::new(Cursor::new(payload))?;
    assert_eq!(reader.len(), 0);
    Ok(())
}

#[tokio::test]
async fn finalize_produces_ordered_wav_and_releases_device() -> Result<()> {
    let samples: [i16; 3] = [1, -2, 3];
    let chunks: Vec<Vec<u8>> = samples.iter().map(|s| s.to_le_bytes().to_vec()).collect();
    let backend = ScriptedBackend::new(chunks);

    let capture = ActiveCapture::begin(backend.as_ref() as &dyn CaptureBackend).await?;
    assert_eq!(backend.acquire_count(), 1);

    let payload = capture.finalize().await?;
    assert_eq!(backend.release_count(), 1);

    let mut reader = hound::WavReader::new(Cursor::new(payload))?;
    let decoded: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(decoded, samples);
    Ok(())
}

#[tokio::test]
async fn abort_releases_device_without_payload() -> Result<()> {
    let backend = ScriptedBackend::new(vec![vec![0, 0]]);

    let capture = ActiveCapture::begin(backend.as_ref() as &dyn CaptureBackend).await?;
    capture.abort().await;

    assert_eq!(backend.acquire_count(), 1);
    assert_eq!(backend.release_count(), 1);
    Ok(())
}
