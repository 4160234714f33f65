use serde::Serialize;

/// Recording controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// Not recording, no demo animation pending
    Idle,
    /// Scripted demo animation, "speaking" phase
    DemoActive,
    /// Scripted demo animation, rest phase
    DemoResting,
    /// Real microphone capture in progress
    Recording,
    /// Capture finalized, transcription call in flight
    Transcribing,
}

impl ControllerState {
    /// States driven by the demo scheduler rather than real capture.
    pub fn is_demo(self) -> bool {
        matches!(self, ControllerState::DemoActive | ControllerState::DemoResting)
    }

    pub fn label(self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::DemoActive => "demo_active",
            ControllerState::DemoResting => "demo_resting",
            ControllerState::Recording => "recording",
            ControllerState::Transcribing => "transcribing",
        }
    }
}
