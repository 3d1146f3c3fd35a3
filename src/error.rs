use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PdfError {
    #[error("no source selected, load a file, url, html or view first")]
    InvalidSource,

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation did not complete within {0:?}")]
    NavigationTimeout(Duration),

    #[error("print result not available within {0:?}")]
    PrintTimeout(Duration),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("page error: {0}")]
    Page(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PdfError {
    fn from(err: serde_json::Error) -> Self {
        PdfError::Config(err.to_string())
    }
}

impl From<tera::Error> for PdfError {
    fn from(err: tera::Error) -> Self {
        PdfError::Template(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for PdfError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        PdfError::Page(err.to_string())
    }
}
