use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranscribeError;

/// Result of transcribing one finalized audio payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// Speech-to-text capability.
///
/// Exactly one call per finalized payload; no automatic retries.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcript, TranscribeError>;
}
