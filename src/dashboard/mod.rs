//! Boundary clients for the dashboard's calendar and pre-visit-report
//! endpoints. Consumed by the admin views, never produced here.

mod calendar;
mod report;

pub use calendar::{group_events_by_day, CalendarClient, CalendarEvent};
pub use report::{PreVisitReport, ReportClient};
