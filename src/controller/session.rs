use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::demo::{DemoCycle, DemoPhase, DemoScheduler};
use super::state::ControllerState;
use super::timer::SessionTimer;
use crate::capture::{ActiveCapture, CaptureBackend};
use crate::transcribe::TranscriptionClient;

/// Host-page callback contract.
pub trait SessionEvents: Send + Sync {
    /// Fired exactly once per recording session when real capture begins.
    fn on_start(&self);

    /// Fired exactly once per session at its end. `transcript` is `None` on
    /// transcription failure and on a demo/non-recording stop.
    fn on_stop(&self, duration_secs: u64, transcript: Option<String>);

    /// A user-visible capture or transcription problem.
    fn on_error(&self, _message: &str) {}
}

struct Inner {
    state: ControllerState,
    demo_enabled: bool,
    /// Bumped whenever the controller moves to a new session; completions
    /// carrying an older id are discarded, never applied.
    session_id: u64,
    timer: Option<SessionTimer>,
    demo: Option<DemoScheduler>,
    capture: Option<ActiveCapture>,
    last_error: Option<String>,
}

/// The recording state machine.
///
/// Orchestrates the timer, the demo scheduler, the capture service, and the
/// transcription client, and reports lifecycle events to the host page.
/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct RecordingController {
    inner: Arc<Mutex<Inner>>,
    elapsed: Arc<AtomicU64>,
    backend: Arc<dyn CaptureBackend>,
    transcriber: Arc<dyn TranscriptionClient>,
    events: Arc<dyn SessionEvents>,
    cycle: DemoCycle,
}

impl RecordingController {
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        transcriber: Arc<dyn TranscriptionClient>,
        events: Arc<dyn SessionEvents>,
        cycle: DemoCycle,
        demo_enabled: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ControllerState::Idle,
                demo_enabled,
                session_id: 0,
                timer: None,
                demo: None,
                capture: None,
                last_error: None,
            })),
            elapsed: Arc::new(AtomicU64::new(0)),
            backend,
            transcriber,
            events,
            cycle,
        }
    }

    /// Start the demo cycle if demo mode is enabled. Called when the host
    /// page mounts the widget; a no-op otherwise.
    pub async fn mount(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.demo_enabled || inner.demo.is_some() {
            return;
        }

        let session = inner.session_id;
        let controller = self.clone();
        let scheduler = DemoScheduler::spawn(self.cycle.clone(), move |phase| {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.apply_demo_phase(session, phase).await;
            });
        });

        inner.demo = Some(scheduler);
        info!("demo animation scheduled");
    }

    /// User toggle: start real capture, or stop it and transcribe.
    pub async fn toggle(&self) {
        // The lock is held across the acquire await so a second toggle
        // cannot race the transition into Recording.
        let mut inner = self.inner.lock().await;
        match inner.state {
            ControllerState::Idle
            | ControllerState::DemoActive
            | ControllerState::DemoResting => {
                self.start_recording(&mut inner).await;
            }
            ControllerState::Recording => {
                self.stop_recording(&mut inner);
            }
            ControllerState::Transcribing => {
                warn!("toggle ignored while transcription is in flight");
            }
        }
    }

    /// User turned the widget off without requesting real capture.
    pub async fn disable_demo(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.demo_enabled && inner.demo.is_none() {
            return;
        }

        inner.demo_enabled = false;
        inner.session_id += 1;
        if let Some(demo) = inner.demo.take() {
            demo.cancel();
        }
        // Reset duration to 0 before reporting the stop.
        if let Some(timer) = inner.timer.take() {
            timer.stop();
        }
        inner.state = ControllerState::Idle;
        info!("demo mode disabled");

        self.events.on_stop(0, None);
    }

    /// Unmount: cancel the timer and scheduler, release the microphone if
    /// held, and supersede any in-flight transcription so its result is
    /// discarded.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.session_id += 1;
        inner.demo_enabled = false;
        if let Some(demo) = inner.demo.take() {
            demo.cancel();
        }
        if let Some(timer) = inner.timer.take() {
            timer.stop();
        }
        if let Some(capture) = inner.capture.take() {
            capture.abort().await;
        }
        inner.state = ControllerState::Idle;
        info!("controller shut down");
    }

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state
    }

    pub async fn is_recording(&self) -> bool {
        self.inner.lock().await.state == ControllerState::Recording
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    async fn start_recording(&self, inner: &mut Inner) {
        // A real capture request permanently disables the demo animation.
        inner.demo_enabled = false;
        inner.session_id += 1;
        if let Some(demo) = inner.demo.take() {
            demo.cancel();
        }
        if let Some(timer) = inner.timer.take() {
            timer.stop();
        }
        inner.state = ControllerState::Idle;

        match ActiveCapture::begin(self.backend.as_ref()).await {
            Ok(capture) => {
                inner.capture = Some(capture);
                inner.timer = Some(SessionTimer::start(Arc::clone(&self.elapsed)));
                inner.state = ControllerState::Recording;
                inner.last_error = None;
                info!("recording started");
                self.events.on_start();
            }
            Err(err) => {
                warn!("capture could not start: {}", err);
                let message = err.to_string();
                inner.last_error = Some(message.clone());
                self.events.on_error(&message);
            }
        }
    }

    fn stop_recording(&self, inner: &mut Inner) {
        let Some(capture) = inner.capture.take() else {
            warn!("recording state without a capture session");
            inner.state = ControllerState::Idle;
            return;
        };

        let duration = inner.timer.take().map(SessionTimer::stop).unwrap_or(0);
        inner.state = ControllerState::Transcribing;
        let session = inner.session_id;
        info!("recording stopped after {}s, transcribing", duration);

        // Finalize and transcribe off the toggle path. The task runs to
        // completion even if the controller moves on, but its result is
        // then discarded by the session guard.
        let controller = self.clone();
        tokio::spawn(async move {
            let outcome = match capture.finalize().await {
                Ok(payload) => match controller.transcriber.transcribe(payload).await {
                    Ok(transcript) => Ok(transcript.text),
                    Err(err) => Err(err.to_string()),
                },
                Err(err) => Err(err.to_string()),
            };
            controller
                .complete_transcription(session, duration, outcome)
                .await;
        });
    }

    async fn complete_transcription(
        &self,
        session: u64,
        duration: u64,
        outcome: Result<String, String>,
    ) {
        let mut inner = self.inner.lock().await;
        if inner.session_id != session {
            debug!("discarding transcription result from superseded session");
            return;
        }

        inner.state = ControllerState::Idle;

        let transcript = match outcome {
            Ok(text) => Some(text),
            Err(message) => {
                warn!("transcription failed: {}", message);
                inner.last_error = Some(message.clone());
                self.events.on_error(&message);
                None
            }
        };

        self.events.on_stop(duration, transcript);
    }

    async fn apply_demo_phase(&self, session: u64, phase: DemoPhase) {
        let mut inner = self.inner.lock().await;
        if inner.session_id != session || inner.demo.is_none() {
            debug!("discarding demo phase from superseded session");
            return;
        }

        match phase {
            DemoPhase::Active => {
                if inner.timer.is_none() {
                    inner.timer = Some(SessionTimer::start(Arc::clone(&self.elapsed)));
                }
                inner.state = ControllerState::DemoActive;
            }
            DemoPhase::Resting => {
                inner.state = ControllerState::DemoResting;
            }
        }
    }
}
