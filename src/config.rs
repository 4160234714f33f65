use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcription: TranscriptionConfig,
    pub calendar: CalendarConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarConfig {
    pub base_url: String,
}

/// Scripted demo animation settings for the widget.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    pub enabled: bool,
    pub active_phase_ms: u64,
    pub rest_phase_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
