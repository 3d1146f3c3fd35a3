//! PDF renderer built around a fluent source/options builder
//!
//! [`Pdf`] records exactly one source plus its print options, then drives a
//! single headless Chrome session through navigate, wait and print-to-PDF.
//! Output methods trigger the render on demand and always close the session
//! once the bytes are extracted, so every output call after the first starts
//! a fresh cycle with a fresh browser process.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chrome_pdf::Pdf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = Pdf::from_url("https://example.com")
//!         .set_timeout(10)
//!         .output()
//!         .await?;
//!     println!("Rendered {} bytes", bytes.len());
//!     Ok(())
//! }
//! ```

use crate::config::{Config, PdfOptions, PdfOptionsUpdate};
use crate::error::{PdfError, Result};
use crate::response::PdfResponse;
use crate::session::BrowserSession;
use crate::source::{Locator, Source};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Bound on waiting for the print payload in `output`, `stream` and
/// `download`. `save` deliberately uses the configurable navigation timeout
/// instead.
const PRINT_RESULT_TIMEOUT: Duration = Duration::from_secs(5);

/// User-Agent advertised when PhantomJS emulation is enabled.
const PHANTOMJS_USER_AGENT: &str =
    "Mozilla/5.0 (Unknown; Linux x86_64) AppleWebKit/538.1 (KHTML, like Gecko) PhantomJS/2.1.1 Safari/538.1";

/// An in-flight render cycle: the owning browser session, the handle to the
/// eventual print bytes, and the locator guard keeping any temp file alive
/// until extraction.
#[derive(Debug)]
struct PendingPrint {
    session: BrowserSession,
    task: tokio::task::JoinHandle<chromiumoxide::error::Result<Vec<u8>>>,
    _locator: Locator,
}

/// Fluent builder converting one document source into a PDF via headless
/// Chrome.
#[derive(Debug)]
pub struct Pdf {
    source: Option<Source>,
    options: PdfOptions,
    timeout: Duration,
    security_token: Option<String>,
    request_headers: HashMap<String, String>,
    emulate_phantomjs: bool,
    chrome_binary: Option<String>,
    template_dir: Option<PathBuf>,
    config: Config,
    pending: Option<PendingPrint>,
}

impl Pdf {
    /// Creates an empty builder using the process-wide configuration from
    /// the environment.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        Self::with_config(config)
    }

    /// Creates an empty builder backed by an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            source: None,
            options: PdfOptions::default(),
            timeout: Duration::from_secs(config.timeout_secs),
            security_token: config.security_token.clone(),
            request_headers: HashMap::new(),
            emulate_phantomjs: false,
            chrome_binary: None,
            template_dir: None,
            config,
            pending: None,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new().load_file(path)
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new().load_url(url)
    }

    pub fn from_html(markup: impl Into<String>) -> Self {
        Self::new().load_html(markup)
    }

    pub fn from_view(template: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new().load_view(template, data)
    }

    /// Selects a local file source, replacing any prior selection.
    ///
    /// The path is not validated here; a missing file surfaces as an IO
    /// error at render time.
    pub fn load_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(Source::File(path.into()));
        self
    }

    /// Selects a URL source, replacing any prior selection.
    pub fn load_url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(Source::Url(url.into()));
        self
    }

    /// Selects a raw markup source, replacing any prior selection.
    pub fn load_html(mut self, markup: impl Into<String>) -> Self {
        self.source = Some(Source::Html(markup.into()));
        self
    }

    /// Selects a template source, replacing any prior selection. The
    /// template is resolved against the data map at render time.
    pub fn load_view(mut self, template: impl Into<String>, data: serde_json::Value) -> Self {
        self.source = Some(Source::View {
            template: template.into(),
            data,
        });
        self
    }

    /// Merges a partial option update into the current print options.
    /// Untouched fields keep their previous values.
    pub fn set_options(mut self, update: PdfOptionsUpdate) -> Self {
        debug!(?update, "Merging print options");
        self.options.apply(update);
        self
    }

    pub fn set_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    pub fn set_request_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.request_headers = headers;
        self
    }

    /// Enables PhantomJS compatibility: its historical User-Agent string on
    /// outgoing requests and CSS-driven page sizing for the print call.
    pub fn emulate_phantomjs(mut self) -> Self {
        self.emulate_phantomjs = true;
        self
    }

    pub fn set_chrome_binary(mut self, path: impl Into<String>) -> Self {
        self.chrome_binary = Some(path.into());
        self
    }

    /// Sets the navigation timeout in seconds (default: 30).
    pub fn set_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Overrides the directory Tera templates are loaded from for view
    /// sources.
    pub fn set_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source_kind(&self) -> Option<&'static str> {
        self.source.as_ref().map(Source::kind)
    }

    /// Whether a rendered document is pending extraction.
    pub fn is_rendered(&self) -> bool {
        self.pending.is_some()
    }

    /// Renders the selected source, leaving the print result pending until
    /// an output method extracts it.
    ///
    /// Idempotent within a cycle: a second call while a result is already
    /// pending does nothing. Fails with [`PdfError::InvalidSource`] when no
    /// source has been selected.
    pub async fn render(&mut self) -> Result<&mut Self> {
        if self.pending.is_some() {
            debug!("Render already pending, skipping");
            return Ok(self);
        }

        let locator = match &self.source {
            None => return Err(PdfError::InvalidSource),
            Some(Source::Url(url)) => Locator::from_url(url.clone()),
            Some(Source::File(path)) => Locator::from_file(path)?,
            Some(Source::Html(markup)) => Locator::from_markup(markup)?,
            Some(Source::View { template, data }) => {
                Locator::from_markup(&self.render_view(template, data)?)?
            }
        };

        self.render_at(locator).await?;
        Ok(self)
    }

    /// Resolves a template plus data map into markup.
    pub(crate) fn render_view(&self, template: &str, data: &serde_json::Value) -> Result<String> {
        let dir = self
            .template_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.template_dir));
        let tera = tera::Tera::new(&format!("{}/**/*", dir.display()))?;
        let context = tera::Context::from_serialize(data)?;
        debug!(template, dir = %dir.display(), "Resolving view template");
        Ok(tera.render(template, &context)?)
    }

    /// Launches a session and drives it to the locator. The session is
    /// closed here on any failure; on success ownership moves into the
    /// pending result, whose extraction closes it.
    async fn render_at(&mut self, locator: Locator) -> Result<()> {
        let binary = self
            .chrome_binary
            .clone()
            .unwrap_or_else(|| self.config.chrome_binary.clone());

        let session = BrowserSession::launch(&binary).await?;

        match self.navigate_and_print(&session, locator.url()).await {
            Ok(task) => {
                self.pending = Some(PendingPrint {
                    session,
                    task,
                    _locator: locator,
                });
                Ok(())
            }
            Err(e) => {
                session.close().await;
                Err(e)
            }
        }
    }

    async fn navigate_and_print(
        &self,
        session: &BrowserSession,
        url: &str,
    ) -> Result<tokio::task::JoinHandle<chromiumoxide::error::Result<Vec<u8>>>> {
        let headers = self.prepare_request_headers();
        let user_agent = self.emulate_phantomjs.then_some(PHANTOMJS_USER_AGENT);
        let page = session.new_page(&headers, user_agent).await?;

        info!(url, "Navigating");

        // One bound over the whole navigation phase: a host that stalls
        // during connect must surface as a navigation timeout too, not just
        // a page that never fires its load event.
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.timeout, navigation).await {
            Ok(result) => result?,
            Err(_) => return Err(PdfError::NavigationTimeout(self.timeout)),
        }

        let params = self.options.to_print_params(self.emulate_phantomjs);
        debug!(?params, "Requesting PDF print");

        let print_page = page.clone();
        Ok(tokio::spawn(async move { print_page.pdf(params).await }))
    }

    /// Assembles the outgoing request headers: caller headers, plus the
    /// PhantomJS User-Agent under emulation, plus the security token header
    /// when a non-empty token is configured.
    pub fn prepare_request_headers(&self) -> HashMap<String, String> {
        let mut headers = self.request_headers.clone();

        if self.emulate_phantomjs {
            headers.insert("User-Agent".to_string(), PHANTOMJS_USER_AGENT.to_string());
        }

        if let Some(token) = &self.security_token {
            if !token.is_empty() {
                headers.insert("X-Security-Token".to_string(), token.clone());
            }
        }

        headers
    }

    /// Waits up to `wait` for the pending print bytes, rendering first when
    /// nothing is pending, and always closes the session before returning.
    async fn extract(&mut self, wait: Duration) -> Result<Vec<u8>> {
        if self.pending.is_none() {
            self.render().await?;
        }

        // render() either set a pending result or returned an error above
        let PendingPrint {
            session,
            task,
            _locator,
        } = self.pending.take().ok_or(PdfError::InvalidSource)?;

        let abort = task.abort_handle();
        let result = match tokio::time::timeout(wait, task).await {
            Err(_) => {
                abort.abort();
                Err(PdfError::PrintTimeout(wait))
            }
            Ok(Err(join_err)) => Err(PdfError::Page(join_err.to_string())),
            Ok(Ok(print_result)) => print_result.map_err(PdfError::from),
        };

        session.close().await;
        result
    }

    /// Returns the rendered PDF bytes, then discards the cycle so a later
    /// output call renders afresh.
    pub async fn output(&mut self) -> Result<Vec<u8>> {
        self.extract(PRINT_RESULT_TIMEOUT).await
    }

    /// Writes the rendered PDF to `filename`.
    ///
    /// Unlike [`output`](Self::output), this waits the full configurable
    /// timeout for the print result rather than the fixed 5 second bound.
    pub async fn save(&mut self, filename: impl AsRef<Path>) -> Result<()> {
        let wait = self.timeout;
        let bytes = self.extract(wait).await?;
        tokio::fs::write(filename.as_ref(), &bytes).await?;
        info!(path = %filename.as_ref().display(), bytes = bytes.len(), "PDF saved");
        Ok(())
    }

    /// Returns the PDF as an inline HTTP-style response.
    pub async fn stream(&mut self) -> Result<PdfResponse> {
        Ok(PdfResponse::inline(self.output().await?))
    }

    /// Returns the PDF as a download response under the given filename
    /// (default `document.pdf`).
    pub async fn download(&mut self, filename: Option<&str>) -> Result<PdfResponse> {
        let bytes = self.output().await?;
        Ok(PdfResponse::attachment(
            bytes,
            filename.unwrap_or("document.pdf"),
        ))
    }
}

impl Default for Pdf {
    fn default() -> Self {
        Self::new()
    }
}
