use std::collections::HashMap;
use std::sync::RwLock;

use incident_types::{IncidentReport, ReportId};
use tracing::debug;

use crate::{enforce_constraints, ReportQuery, ReportStore, StoreError};

/// Process-local store, mostly for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: RwLock<HashMap<ReportId, IncidentReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let reports = self.reports.read().map_err(|_| StoreError::Poisoned)?;
        Ok(reports.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl ReportStore for MemoryStore {
    fn create(&self, mut report: IncidentReport) -> Result<ReportId, StoreError> {
        enforce_constraints(&report)?;

        let id = ReportId::new_v4();
        report.id = Some(id.clone());

        let mut reports = self.reports.write().map_err(|_| StoreError::Poisoned)?;
        reports.insert(id.clone(), report);
        debug!(report_id = %id, "Stored report in memory");
        Ok(id)
    }

    fn find_by_id(&self, id: &ReportId) -> Result<Option<IncidentReport>, StoreError> {
        let reports = self.reports.read().map_err(|_| StoreError::Poisoned)?;
        Ok(reports.get(id).cloned())
    }

    fn find(&self, query: &ReportQuery) -> Result<Vec<IncidentReport>, StoreError> {
        let reports = self.reports.read().map_err(|_| StoreError::Poisoned)?;
        Ok(query.apply(reports.values().cloned()))
    }
}
