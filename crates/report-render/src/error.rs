use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Layout failed: {0}")]
    Layout(String),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
