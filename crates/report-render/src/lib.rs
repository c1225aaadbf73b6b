//! Incident report renderers
//!
//! Two artifacts are produced from the same [`sections::ReportView`]:
//! - [`PaginatedRenderer`]: a PDF laid out on fixed pages, with a damage
//!   diagram page and "Page i of N" footers stamped after layout
//! - [`MarkupRenderer`]: a single HTML document with collapsible conditional
//!   sections and a percentage-positioned diagram overlay
//!
//! Both write through a sibling `.partial` file renamed into place, so a
//! failed render never leaves a complete-looking file at the destination.

pub mod canvas;
pub mod config;
pub mod diagram;
pub mod error;
pub mod footer;
pub mod geometry;
pub mod lookup;
pub mod markup;
pub mod metrics;
pub mod paginated;
pub mod palette;
pub mod pdf;
pub mod sections;

#[cfg(test)]
mod test_support;

use std::fs;
use std::path::{Path, PathBuf};

use incident_types::IncidentReport;
use tracing::{debug, info, instrument};

pub use canvas::{Canvas, Color, Command, Page, PagedDocument};
pub use config::{DiagramConfig, DocumentMetadata, FooterConfig, PageSize, RenderConfig};
pub use error::RenderError;
pub use geometry::{map_to_region, Region};
pub use lookup::{safe_get, text_or};
pub use sections::{ReportView, Section};

/// PDF renderer
#[derive(Debug, Clone, Default)]
pub struct PaginatedRenderer {
    config: RenderConfig,
}

impl PaginatedRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Lay out, number and encode the report
    pub fn render_bytes(&self, report: &IncidentReport) -> Result<Vec<u8>, RenderError> {
        self.encode(report).map(|(bytes, _)| bytes)
    }

    fn encode(&self, report: &IncidentReport) -> Result<(Vec<u8>, usize), RenderError> {
        let mut doc = paginated::layout(report, &self.config);
        footer::stamp_page_numbers(&mut doc, &self.config.footer, self.config.margin);
        debug!(pages = doc.page_count(), "Laid out report");
        let bytes = pdf::write_pdf(&doc, &self.config.metadata, report.created_at)?;
        Ok((bytes, doc.page_count()))
    }

    /// Render to `output_path`, creating parent directories as needed
    #[instrument(skip_all, fields(report_id = ?report.id))]
    pub fn render(
        &self,
        report: &IncidentReport,
        output_path: impl AsRef<Path>,
    ) -> Result<PathBuf, RenderError> {
        let (bytes, pages) = self.encode(report)?;
        let path = write_artifact(output_path.as_ref(), &bytes)?;
        info!(
            path = %path.display(),
            pages,
            bytes = bytes.len(),
            "Rendered PDF report"
        );
        Ok(path)
    }
}

/// HTML renderer
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer {
    config: RenderConfig,
}

impl MarkupRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render_string(&self, report: &IncidentReport) -> Result<String, RenderError> {
        markup::render_html(report, &self.config)
            .map_err(|e| RenderError::Layout(format!("HTML formatting failed: {e}")))
    }

    /// Render to `output_path`, creating parent directories as needed
    #[instrument(skip_all, fields(report_id = ?report.id))]
    pub fn render(
        &self,
        report: &IncidentReport,
        output_path: impl AsRef<Path>,
    ) -> Result<PathBuf, RenderError> {
        let html = self.render_string(report)?;
        let path = write_artifact(output_path.as_ref(), html.as_bytes())?;
        info!(path = %path.display(), bytes = html.len(), "Rendered HTML report");
        Ok(path)
    }
}

/// Write `bytes` to a `.partial` sibling, then rename onto `path`
fn write_artifact(path: &Path, bytes: &[u8]) -> Result<PathBuf, RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    let staging = PathBuf::from(staging);

    if let Err(e) = fs::write(&staging, bytes) {
        let _ = fs::remove_file(&staging);
        return Err(RenderError::io(&staging, e));
    }
    fs::rename(&staging, path).map_err(|e| RenderError::io(path, e))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifact_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/report.pdf");
        let written = write_artifact(&path, b"%PDF").unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read(&path).unwrap(), b"%PDF");
        assert!(!dir.path().join("nested/deeper/report.pdf.partial").exists());
    }

    #[test]
    fn test_write_artifact_existing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_artifact(&path, b"one").unwrap();
        write_artifact(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn test_write_artifact_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let err = write_artifact(&blocker.join("report.pdf"), b"%PDF").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
