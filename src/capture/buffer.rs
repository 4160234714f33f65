use super::backend::AudioChunk;

/// Ordered sequence of opaque chunks collected during one capture session.
///
/// Chunks are appended in arrival order and never dropped or reordered.
/// `finalize` consumes the buffer, so a session's audio can neither be
/// finalized twice nor read after it has been cleared.
#[derive(Debug, Default)]
pub struct AudioBuffer {
    chunks: Vec<AudioChunk>,
    total_bytes: usize,
}

impl AudioBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: AudioChunk) {
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenate all chunks into the single session payload.
    pub fn finalize(self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks {
            payload.extend_from_slice(&chunk);
        }
        payload
    }
}
