//! One pretty-printed JSON document per report in a directory

use std::fs;
use std::path::{Path, PathBuf};

use incident_types::{IncidentReport, ReportId};
use tracing::{debug, warn};

use crate::{enforce_constraints, ReportQuery, ReportStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding a report, or `None` for ids that cannot be file names
    fn path_for(&self, id: &ReportId) -> Option<PathBuf> {
        let raw = id.as_str();
        let safe = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.root.join(format!("{raw}.json")))
    }

    fn read_report(path: &Path) -> Result<IncidentReport, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ReportStore for JsonDirStore {
    fn create(&self, mut report: IncidentReport) -> Result<ReportId, StoreError> {
        enforce_constraints(&report)?;

        let id = ReportId::new_v4();
        report.id = Some(id.clone());

        let path = self
            .path_for(&id)
            .ok_or_else(|| StoreError::Serialization(format!("unusable report id {id}")))?;
        let body = serde_json::to_vec_pretty(&report.to_document())?;

        let staging = path.with_extension("json.partial");
        fs::write(&staging, body).map_err(|e| StoreError::io(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| StoreError::io(&path, e))?;

        debug!(report_id = %id, path = %path.display(), "Stored report");
        Ok(id)
    }

    fn find_by_id(&self, id: &ReportId) -> Result<Option<IncidentReport>, StoreError> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::read_report(&path).map(Some)
    }

    fn find(&self, query: &ReportQuery) -> Result<Vec<IncidentReport>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_report(&path) {
                Ok(report) => candidates.push(report),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable report"),
            }
        }
        Ok(query.apply(candidates))
    }
}
