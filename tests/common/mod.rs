// Shared test doubles for the capture backend, the transcription client,
// and the host-page event callbacks.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clinivoice::error::{CaptureError, TranscribeError};
use clinivoice::{
    AudioChunk, CaptureBackend, CaptureHandle, CaptureSpec, SessionEvents, Transcript,
    TranscriptionClient,
};
use tokio::sync::mpsc;

/// Capture backend that emits a scripted chunk sequence and counts
/// acquire/release calls.
pub struct ScriptedBackend {
    chunks: Vec<AudioChunk>,
    acquires: AtomicUsize,
    releases: Arc<AtomicUsize>,
    fail_with: Mutex<Option<CaptureError>>,
}

impl ScriptedBackend {
    pub fn new(chunks: Vec<AudioChunk>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            acquires: AtomicUsize::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
            fail_with: Mutex::new(None),
        })
    }

    /// Backend whose next acquire fails with the given error.
    pub fn denying(err: CaptureError) -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            acquires: AtomicUsize::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
            fail_with: Mutex::new(Some(err)),
        })
    }

    pub fn acquire_count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn acquire(
        &self,
    ) -> Result<(Box<dyn CaptureHandle>, mpsc::UnboundedReceiver<AudioChunk>), CaptureError> {
        if let Some(err) = self.fail_with.lock().unwrap().take() {
            return Err(err);
        }

        self.acquires.fetch_add(1, Ordering::SeqCst);

        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in &self.chunks {
            let _ = tx.send(chunk.clone());
        }

        Ok((
            Box::new(ScriptedHandle {
                sender: Some(tx),
                releases: Arc::clone(&self.releases),
            }),
            rx,
        ))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct ScriptedHandle {
    sender: Option<mpsc::UnboundedSender<AudioChunk>>,
    releases: Arc<AtomicUsize>,
}

#[async_trait]
impl CaptureHandle for ScriptedHandle {
    fn spec(&self) -> CaptureSpec {
        CaptureSpec {
            sample_rate: 16_000,
            channels: 1,
        }
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        // Dropping the sender closes the chunk channel, like a real stream.
        if self.sender.take().is_some() {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

pub enum TranscriberMode {
    Text(String),
    Fail,
    Delayed(Duration, String),
}

pub struct MockTranscriber {
    mode: TranscriberMode,
    calls: AtomicUsize,
    payload_sizes: Mutex<Vec<usize>>,
}

impl MockTranscriber {
    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            mode: TranscriberMode::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            payload_sizes: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            mode: TranscriberMode::Fail,
            calls: AtomicUsize::new(0),
            payload_sizes: Mutex::new(Vec::new()),
        })
    }

    pub fn delayed(delay: Duration, text: &str) -> Arc<Self> {
        Arc::new(Self {
            mode: TranscriberMode::Delayed(delay, text.to_string()),
            calls: AtomicUsize::new(0),
            payload_sizes: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payload_sizes(&self) -> Vec<usize> {
        self.payload_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionClient for MockTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcript, TranscribeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload_sizes.lock().unwrap().push(audio.len());

        match &self.mode {
            TranscriberMode::Text(text) => Ok(Transcript { text: text.clone() }),
            TranscriberMode::Fail => Err(TranscribeError::Failed { status: 500 }),
            TranscriberMode::Delayed(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(Transcript { text: text.clone() })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    Stop(u64, Option<String>),
    Error(String),
}

/// Records the host-page callbacks in invocation order.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|e| matches!(e, Event::Stop(..)))
            .count()
    }
}

impl SessionEvents for EventLog {
    fn on_start(&self) {
        self.events.lock().unwrap().push(Event::Start);
    }

    fn on_stop(&self, duration_secs: u64, transcript: Option<String>) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Stop(duration_secs, transcript));
    }

    fn on_error(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Error(message.to_string()));
    }
}

/// Step paused time forward in one-second ticks, yielding between steps so
/// timer and scheduler tasks observe each tick.
pub async fn advance_secs(n: u64) {
    for _ in 0..n {
        tokio::time::advance(Duration::from_secs(1)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }
}

/// Step paused time forward by milliseconds, then let tasks settle.
pub async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

/// Let spawned tasks run without advancing the clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
