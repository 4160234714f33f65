use async_trait::async_trait;
use tracing::{debug, info};

use super::client::{Transcript, TranscriptionClient};
use crate::error::TranscribeError;

/// Remote transcription service client.
///
/// `POST {base}/transcribe/audio` with a multipart form carrying one binary
/// `audio` field; the service answers `{ "text": ... }` on success and a
/// non-2xx status on failure.
pub struct HttpTranscriptionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcript, TranscribeError> {
        let url = format!("{}/transcribe/audio", self.base_url);
        debug!("uploading {} bytes to {}", audio.len(), url);

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("recording.wav")
            .mime_str("audio/wav")?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self.http.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscribeError::Failed {
                status: status.as_u16(),
            });
        }

        let transcript: Transcript = response.json().await?;
        info!("transcription complete: {} chars", transcript.text.len());

        Ok(transcript)
    }
}
