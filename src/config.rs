//! Configuration management with serde serialization/deserialization
//!
//! This module provides the process-wide configuration plus the print option
//! set passed to Chrome's print-to-PDF call, including the additive merge
//! semantics used by the builder's `set_options`.

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use serde::{Deserialize, Serialize};

/// Fallback Chrome binary when neither the builder nor the environment
/// provides one.
pub const DEFAULT_CHROME_BINARY: &str = "/usr/bin/chromium";

/// Default navigation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process-wide configuration, loaded once at startup
///
/// Values can come from a JSON file, the environment (`CHROME_BINARY`,
/// `PDF_SECURITY_TOKEN`), or CLI flags. Builder-level overrides always win
/// over this configuration.
///
/// # Examples
///
/// ```rust
/// use chrome_pdf::Config;
///
/// let config = Config::default();
/// assert_eq!(config.chrome_binary, "/usr/bin/chromium");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Fully qualified path to the Chrome or Chromium binary used to render
    /// the PDF (default: `/usr/bin/chromium`).
    pub chrome_binary: String,

    /// Security token used for extremely lightweight authentication.
    ///
    /// If set, it is sent as an `X-Security-Token` header when rendering a
    /// PDF from a URL.
    pub security_token: Option<String>,

    /// Navigation timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Directory containing Tera templates for view sources
    /// (default: `templates`).
    pub template_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_binary: DEFAULT_CHROME_BINARY.to_string(),
            security_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            template_dir: "templates".to_string(),
        }
    }
}

impl Config {
    /// Overlays the configuration with environment variables where present.
    pub fn apply_env(&mut self) {
        if let Ok(binary) = std::env::var("CHROME_BINARY") {
            if !binary.is_empty() {
                self.chrome_binary = binary;
            }
        }
        if let Ok(token) = std::env::var("PDF_SECURITY_TOKEN") {
            if !token.is_empty() {
                self.security_token = Some(token);
            }
        }
    }
}

/// Print options handed to Chrome's print-to-PDF call
///
/// Defaults produce an A4 page with no margins and background graphics
/// enabled.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Top margin in inches (default: 0)
    pub margin_top: f64,

    /// Bottom margin in inches (default: 0)
    pub margin_bottom: f64,

    /// Left margin in inches (default: 0)
    pub margin_left: f64,

    /// Right margin in inches (default: 0)
    pub margin_right: f64,

    /// Paper width in inches (default: 8.3, A4)
    pub paper_width: f64,

    /// Paper height in inches (default: 11.7, A4)
    pub paper_height: f64,

    /// Whether to print background graphics (default: true)
    pub print_background: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
            paper_width: 8.3,
            paper_height: 11.7,
            print_background: true,
        }
    }
}

impl PdfOptions {
    /// Applies a partial update, leaving untouched fields at their current
    /// values. Repeated calls accumulate.
    pub fn apply(&mut self, update: PdfOptionsUpdate) {
        if let Some(v) = update.margin_top {
            self.margin_top = v;
        }
        if let Some(v) = update.margin_bottom {
            self.margin_bottom = v;
        }
        if let Some(v) = update.margin_left {
            self.margin_left = v;
        }
        if let Some(v) = update.margin_right {
            self.margin_right = v;
        }
        if let Some(v) = update.paper_width {
            self.paper_width = v;
        }
        if let Some(v) = update.paper_height {
            self.paper_height = v;
        }
        if let Some(v) = update.print_background {
            self.print_background = v;
        }
    }

    /// Builds the CDP print parameters.
    ///
    /// PhantomJS emulation only adds `preferCSSPageSize=true`; margins and
    /// paper size are never altered by it.
    pub fn to_print_params(&self, emulate_phantomjs: bool) -> PrintToPdfParams {
        PrintToPdfParams {
            margin_top: Some(self.margin_top),
            margin_bottom: Some(self.margin_bottom),
            margin_left: Some(self.margin_left),
            margin_right: Some(self.margin_right),
            paper_width: Some(self.paper_width),
            paper_height: Some(self.paper_height),
            print_background: Some(self.print_background),
            prefer_css_page_size: emulate_phantomjs.then_some(true),
            ..Default::default()
        }
    }
}

/// Partial update for [`PdfOptions`], merged additively by
/// [`PdfOptions::apply`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PdfOptionsUpdate {
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_right: Option<f64>,
    pub paper_width: Option<f64>,
    pub paper_height: Option<f64>,
    pub print_background: Option<bool>,
}

/// Generate Chrome command-line arguments for a single render cycle
///
/// Sandboxing is disabled and certificate errors are ignored so the renderer
/// works in containers and against internal hosts with self-signed
/// certificates. Each cycle gets a unique user data directory so repeated
/// launches never collide on Chrome's process singleton.
pub fn get_chrome_args() -> Vec<String> {
    let unique_id = format!("{}-{}", std::process::id(), uuid::Uuid::new_v4());

    vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--no-first-run".to_string(),
        "--ignore-certificate-errors".to_string(),
        "--ignore-ssl-errors".to_string(),
        "--allow-running-insecure-content".to_string(),
        "--allow-file-access-from-files".to_string(),
        format!("--user-data-dir=/tmp/chrome-pdf-{}", unique_id),
    ]
}

/// Builds the chromiumoxide launch configuration for the given binary.
pub fn create_browser_config(
    chrome_binary: &str,
) -> Result<chromiumoxide::browser::BrowserConfig, String> {
    chromiumoxide::browser::BrowserConfig::builder()
        .chrome_executable(chrome_binary)
        .args(get_chrome_args())
        .build()
}
