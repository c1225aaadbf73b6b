//! Rendering a report and mailing it as a PDF attachment

use std::path::{Path, PathBuf};

use incident_types::IncidentReport;
use report_render::PaginatedRenderer;
use tracing::{debug, error, info, instrument, warn};

use crate::config::MailerConfig;
use crate::error::MailError;
use crate::transport::{MailTransport, MessageId};
use crate::types::{Attachment, OutgoingMail};

pub const BODY_TEXT: &str = "Please find the attached incident report.";

pub fn subject_for(report: &IncidentReport) -> String {
    format!(
        "New Incident Report - {} {}",
        report.personal_info.first_name, report.personal_info.last_name
    )
}

pub fn attachment_name(id: &str) -> String {
    format!("incident_report_{id}.pdf")
}

/// Rendered file that is removed when dropped
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary report"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove temporary report"),
        }
    }
}

/// Email collaborator: one rendered report per mail
pub struct ReportMailer<T> {
    config: MailerConfig,
    renderer: PaginatedRenderer,
    transport: T,
}

impl<T: MailTransport> ReportMailer<T> {
    pub fn new(config: MailerConfig, renderer: PaginatedRenderer, transport: T) -> Self {
        Self {
            config,
            renderer,
            transport,
        }
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Render, attach and send; the temporary PDF is removed whatever the outcome
    #[instrument(skip_all, fields(report_id = ?report.id))]
    pub async fn send(&self, report: &IncidentReport) -> Result<MessageId, MailError> {
        let id = report.id.as_ref().ok_or(MailError::MissingReportId)?;

        let content = self.renderer.render_bytes(report)?;

        tokio::fs::create_dir_all(&self.config.temp_dir)
            .await
            .map_err(|e| MailError::io(&self.config.temp_dir, e))?;
        let artifact = TempArtifact {
            path: self.config.temp_dir.join(format!("report_{id}.pdf")),
        };
        tokio::fs::write(artifact.path(), &content)
            .await
            .map_err(|e| MailError::io(artifact.path(), e))?;
        debug!(path = %artifact.path().display(), bytes = content.len(), "Wrote temporary report");

        let mail = OutgoingMail::new(
            &self.config.from,
            &self.config.to,
            &subject_for(report),
            BODY_TEXT,
        )
        .with_attachment(Attachment::pdf(attachment_name(id.as_str()), content));

        match self.transport.send(&mail).await {
            Ok(message_id) => {
                info!(%message_id, recipients = mail.to.len(), "Report mailed");
                Ok(message_id)
            }
            Err(e) => {
                error!(error = %e, "Failed to mail report");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_naming() {
        assert_eq!(attachment_name("abc"), "incident_report_abc.pdf");
    }

    #[test]
    fn test_temp_artifact_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report_x.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        drop(TempArtifact { path: path.clone() });
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_artifact_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        drop(TempArtifact {
            path: dir.path().join("never-written.pdf"),
        });
    }
}
