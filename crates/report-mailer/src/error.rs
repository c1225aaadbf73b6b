use std::path::PathBuf;

use report_render::RenderError;
use thiserror::Error;

use crate::types::MailValidationError;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail: {0}")]
    Validation(#[from] MailValidationError),

    #[error("Report has no id; only stored reports can be mailed")]
    MissingReportId,

    #[error("Rendering the report failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RESEND_API_KEY is not configured")]
    MissingApiKey,

    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Mail rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl MailError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MailError::Io {
            path: path.into(),
            source,
        }
    }
}
