//! Recording controller
//!
//! The state machine that orchestrates:
//! - the one-second session timer
//! - the cancellable demo animation scheduler
//! - microphone acquisition and chunk buffering
//! - the transcription call and its completion/supersession handling
//! - lifecycle callbacks to the host page

mod demo;
mod session;
mod state;
mod timer;

pub use demo::{DemoCycle, DemoPhase, DemoScheduler, DEMO_START_DELAY};
pub use session::{RecordingController, SessionEvents};
pub use state::ControllerState;
pub use timer::SessionTimer;
