//! Report model and rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{AnalyticsView, DashboardStats, FilterView};
use crate::backend::ProfileView;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Run metadata printed at the top of every report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub backend_url: String,
    pub duration_seconds: f64,
}

/// Analytics sections fed by their own satellite collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsSection {
    TechStack,
    RemotePolicy,
    Culture,
}

impl fmt::Display for AnalyticsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsSection::TechStack => write!(f, "Tech Stack Frequency"),
            AnalyticsSection::RemotePolicy => write!(f, "Remote Work Policy"),
            AnalyticsSection::Culture => write!(f, "Culture Indicators"),
        }
    }
}

/// A section whose collection could not be fetched.
#[derive(Debug, Clone, Serialize)]
pub struct SectionError {
    pub section: AnalyticsSection,
    pub message: String,
}

/// Analytics plus the sections that failed to load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsReport {
    pub analytics: AnalyticsView,
    pub errors: Vec<SectionError>,
}

impl AnalyticsReport {
    pub fn error_for(&self, section: AnalyticsSection) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.section == section)
            .map(|e| e.message.as_str())
    }
}

/// The rendered view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewReport {
    Dashboard(DashboardStats),
    Analytics(AnalyticsReport),
    Companies(FilterView),
    Company(ProfileView),
}

/// Complete report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub view: ViewReport,
}
