use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One appointment as returned by the calendar endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub patient_name: String,
    pub phone_number: String,
    pub doctor_name: String,
    /// RFC3339 start time
    pub start: String,
    /// RFC3339 end time
    pub end: String,
    pub timezone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MonthEventsResponse {
    events: Vec<CalendarEvent>,
}

/// Read-only client for `GET /calendar?month=YYYY-MM`.
pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch all appointments for a month ("YYYY-MM").
    pub async fn month_events(&self, month: &str) -> Result<Vec<CalendarEvent>> {
        let url = format!("{}/calendar", self.base_url);

        let response = self
            .http
            .get(url)
            .query(&[("month", month)])
            .send()
            .await
            .context("calendar request failed")?;

        anyhow::ensure!(
            response.status().is_success(),
            "calendar endpoint returned {}",
            response.status()
        );

        let body: MonthEventsResponse = response
            .json()
            .await
            .context("malformed calendar response")?;

        info!("fetched {} events for {}", body.events.len(), month);
        Ok(body.events)
    }
}

/// Group fetched events by the calendar day of their start time.
///
/// Days come out in ascending order; within a day, fetch order is preserved.
/// Events with an unparseable start time are skipped with a warning.
pub fn group_events_by_day(
    events: Vec<CalendarEvent>,
) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();

    for event in events {
        match DateTime::parse_from_rfc3339(&event.start) {
            Ok(start) => {
                days.entry(start.date_naive()).or_default().push(event);
            }
            Err(err) => {
                warn!(
                    "skipping event {} with unparseable start {:?}: {}",
                    event.id, event.start, err
                );
            }
        }
    }

    days
}
