//! Storage collaborator for incident reports
//!
//! The normalizer only needs [`ReportStore::create`]; listing and batch
//! tooling use [`ReportStore::find`] and [`ReportStore::find_by_id`].
//! Every implementation assigns a fresh UUID v4 id and runs the aggregate's
//! document constraints before accepting a report.

pub mod error;
pub mod json_dir;
pub mod memory;
pub mod query;

pub use error::StoreError;
pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use query::{ReportQuery, ReportSummary, SortOrder};

use incident_types::{constraints, IncidentReport, ReportId};

pub trait ReportStore: Send + Sync {
    /// Persist a new report and return its assigned id
    fn create(&self, report: IncidentReport) -> Result<ReportId, StoreError>;

    fn find_by_id(&self, id: &ReportId) -> Result<Option<IncidentReport>, StoreError>;

    fn find(&self, query: &ReportQuery) -> Result<Vec<IncidentReport>, StoreError>;

    /// `find` projected down to the listing columns
    fn find_summaries(&self, query: &ReportQuery) -> Result<Vec<ReportSummary>, StoreError> {
        Ok(self.find(query)?.iter().map(ReportSummary::from).collect())
    }
}

/// Run document constraints, turning violations into a store rejection
pub(crate) fn enforce_constraints(report: &IncidentReport) -> Result<(), StoreError> {
    let violations = constraints::check(report);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(StoreError::ConstraintViolation(
            violations.iter().map(ToString::to_string).collect(),
        ))
    }
}
