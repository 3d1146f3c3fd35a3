//! Browser session lifecycle
//!
//! One [`BrowserSession`] owns exactly one headless Chrome process and its
//! CDP handler task for the duration of a single render cycle. Sessions are
//! never pooled or reused: the renderer launches one, drives one page, and
//! closes it on every exit path, success or failure.

use crate::config::create_browser_config;
use crate::error::{PdfError, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug)]
pub struct BrowserSession {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    /// Launches a headless Chrome process using the given binary.
    ///
    /// Launch failure is fatal; there is no retry.
    pub async fn launch(chrome_binary: &str) -> Result<Self> {
        let config = create_browser_config(chrome_binary).map_err(PdfError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PdfError::LaunchFailed(e.to_string()))?;

        // The handler implements Stream and must be polled for the browser
        // connection to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("CDP handler error: {}", e);
                    break;
                }
            }
            debug!("CDP handler stream ended");
        });

        info!(binary = chrome_binary, "Browser session launched");

        Ok(Self {
            browser,
            handler: handler_task,
        })
    }

    /// Opens a fresh page with the given request headers applied before any
    /// navigation takes place.
    ///
    /// Headers are installed through `Network.setExtraHTTPHeaders` so they
    /// ride along on every request the page issues, and the User-Agent
    /// override goes through the dedicated CDP call.
    pub async fn new_page(
        &self,
        headers: &HashMap<String, String>,
        user_agent: Option<&str>,
    ) -> Result<Page> {
        use chromiumoxide::cdp::browser_protocol::network::{
            EnableParams, Headers, SetExtraHttpHeadersParams,
        };

        let page = self.browser.new_page("about:blank").await?;

        if !headers.is_empty() {
            page.execute(EnableParams::default()).await?;

            let map: serde_json::Map<String, serde_json::Value> = headers
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            page.execute(SetExtraHttpHeadersParams::new(Headers::new(
                serde_json::Value::Object(map),
            )))
            .await?;
            debug!(count = headers.len(), "Request headers applied to page");
        }

        if let Some(ua) = user_agent {
            page.set_user_agent(ua).await?;
        }

        Ok(page)
    }

    /// Terminates the browser process and its handler task.
    ///
    /// Must be called exactly once per successful launch; the renderer calls
    /// it on every exit path of a render cycle.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Browser close failed: {}", e);
        }
        self.handler.abort();
        info!("Browser session closed");
    }
}
