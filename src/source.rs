//! Document sources and locator normalization
//!
//! The builder holds exactly one [`Source`]. At render time every variant is
//! normalized to a [`Locator`], a browser-navigable URL plus an optional
//! temporary file guard. Raw markup is materialized to a temp file so the
//! file, html and view paths all converge on plain URL navigation.

use crate::error::{PdfError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// The origin of the document to render.
///
/// Selecting a new source on the builder fully replaces the previous one;
/// no validation happens until render time.
#[derive(Debug, Clone)]
pub enum Source {
    /// A local file, navigated to via a `file://` URL.
    File(PathBuf),
    /// A remote (or otherwise browser-resolvable) URL.
    Url(String),
    /// Raw markup, written to a temporary file before navigation.
    Html(String),
    /// A named template resolved with a data map, then treated as markup.
    View {
        template: String,
        data: serde_json::Value,
    },
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::File(_) => "file",
            Source::Url(_) => "url",
            Source::Html(_) => "html",
            Source::View { .. } => "view",
        }
    }
}

/// A browser-navigable target for one render cycle.
///
/// When the source was markup, the backing temp file is owned here and must
/// outlive navigation; dropping the locator deletes it.
#[derive(Debug)]
pub struct Locator {
    url: String,
    _temp: Option<NamedTempFile>,
}

impl Locator {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            _temp: None,
        }
    }

    /// Turns a local path into a `file://` locator.
    pub fn from_file(path: &Path) -> Result<Self> {
        let absolute = std::fs::canonicalize(path)?;
        let url = url::Url::from_file_path(&absolute)
            .map_err(|_| PdfError::Io(format!("not a navigable path: {}", absolute.display())))?;
        Ok(Self {
            url: url.into(),
            _temp: None,
        })
    }

    /// Writes markup to a fresh `.html` temp file and locates it.
    pub fn from_markup(markup: &str) -> Result<Self> {
        let mut temp = tempfile::Builder::new()
            .prefix("chrome-pdf-")
            .suffix(".html")
            .tempfile()?;
        temp.write_all(markup.as_bytes())?;
        temp.flush()?;

        let url = url::Url::from_file_path(temp.path())
            .map_err(|_| PdfError::Io("temp file path not navigable".to_string()))?;
        debug!(path = %temp.path().display(), bytes = markup.len(), "Markup materialized to temp file");

        Ok(Self {
            url: url.into(),
            _temp: Some(temp),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_locator_scheme_and_contents() {
        let locator = Locator::from_markup("<html><body>hello</body></html>").unwrap();
        assert!(locator.url().starts_with("file://"));
        assert!(locator.url().ends_with(".html"));

        let path = locator.url().trim_start_matches("file://");
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "<html><body>hello</body></html>");
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let locator = Locator::from_markup("<p>gone</p>").unwrap();
        let path = locator.url().trim_start_matches("file://").to_string();
        assert!(std::path::Path::new(&path).exists());
        drop(locator);
        assert!(!std::path::Path::new(&path).exists());
    }

    #[test]
    fn test_file_locator_missing_file_is_io_error() {
        let err = Locator::from_file(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn test_source_kind() {
        assert_eq!(Source::Url("https://example.com".into()).kind(), "url");
        assert_eq!(Source::Html("<p/>".into()).kind(), "html");
    }
}
