//! # chrome-pdf
//!
//! Renders local files, remote URLs, raw markup or Tera templates to PDF by
//! delegating to headless Chrome's native print-to-PDF over the Chrome
//! DevTools Protocol.
//!
//! The crate is a thin orchestration layer: a fluent [`Pdf`] builder records
//! one source and a set of print options, launches one browser process per
//! render cycle, navigates, waits for the page to load, requests the PDF and
//! hands back the bytes. The browser session is closed after every cycle,
//! success or failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrome_pdf::Pdf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Raw bytes from a URL
//!     let bytes = Pdf::from_url("https://example.com").output().await?;
//!     println!("Rendered {} bytes", bytes.len());
//!
//!     // Markup straight to disk
//!     Pdf::from_html("<h1>Invoice</h1>")
//!         .save("invoice.pdf")
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! chrome-pdf url https://example.com --output example.pdf
//! chrome-pdf file page.html --output page.pdf
//! echo '<h1>Hi</h1>' | chrome-pdf html --output hi.pdf
//! chrome-pdf view invoice.html --data invoice.json --output invoice.pdf
//! ```

/// Configuration and print option handling
pub mod config;

/// Error types
pub mod error;

/// Document sources and locator normalization
pub mod source;

/// Browser session lifecycle
pub mod session;

/// The fluent PDF renderer
pub mod renderer;

/// HTTP-style response wrapping
pub mod response;

/// Command-line interface implementation
pub mod cli;

#[cfg(test)]
mod tests;

pub use cli::*;
pub use config::*;
pub use error::*;
pub use renderer::*;
pub use response::*;
pub use session::*;
pub use source::*;
