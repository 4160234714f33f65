use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Pre-visit report for one appointment, as returned by `GET /report/{id}`.
///
/// Every section is optional; the popup renders whatever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreVisitReport {
    #[serde(default)]
    pub primary_concern: Option<String>,
    #[serde(default)]
    pub current_medications: Option<Vec<String>>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub ai_insights: Option<String>,
    #[serde(default)]
    pub suggested_questions: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    report: PreVisitReport,
}

/// Read-only client for the report endpoint.
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReportClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn pre_visit_report(&self, event_id: &str) -> Result<PreVisitReport> {
        let url = format!("{}/report/{}", self.base_url, event_id);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("report request failed")?;

        anyhow::ensure!(
            response.status().is_success(),
            "report endpoint returned {}",
            response.status()
        );

        let body: ReportResponse = response
            .json()
            .await
            .context("malformed report response")?;

        Ok(body.report)
    }
}
