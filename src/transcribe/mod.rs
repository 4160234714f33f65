mod client;
mod http;

pub use client::{Transcript, TranscriptionClient};
pub use http::HttpTranscriptionClient;
