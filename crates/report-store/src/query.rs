//! Report selection: filter, sort, limit

use chrono::{DateTime, Utc};
use incident_types::{IncidentReport, ReportId, ReportStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter over stored reports; an empty query selects everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Inclusive lower bound on `createdAt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_to: Option<DateTime<Utc>>,
    /// Restrict to these ids (empty = any id)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<ReportId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub sort: SortOrder,
    /// Applied after sorting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ReportQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn created_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_to = Some(to);
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = ReportId>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Does a single report pass the filters?
    pub fn matches(&self, report: &IncidentReport) -> bool {
        if let Some(from) = self.created_from {
            if report.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if report.created_at > to {
                return false;
            }
        }
        if let Some(status) = self.status {
            if report.status != status {
                return false;
            }
        }
        if !self.ids.is_empty() {
            match &report.id {
                Some(id) if self.ids.contains(id) => {}
                _ => return false,
            }
        }
        true
    }

    /// Filter, sort and truncate a candidate set
    pub fn apply(&self, candidates: impl IntoIterator<Item = IncidentReport>) -> Vec<IncidentReport> {
        let mut selected: Vec<IncidentReport> =
            candidates.into_iter().filter(|r| self.matches(r)).collect();

        // Ties on createdAt fall back to id so results are stable across stores
        selected.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        if self.sort == SortOrder::NewestFirst {
            selected.reverse();
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Projection used by listing tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: Option<ReportId>,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
}

impl From<&IncidentReport> for ReportSummary {
    fn from(report: &IncidentReport) -> Self {
        Self {
            id: report.id.clone(),
            first_name: report.personal_info.first_name.clone(),
            last_name: report.personal_info.last_name.clone(),
            created_at: report.created_at,
            status: report.status,
        }
    }
}
