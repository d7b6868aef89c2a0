use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

use crate::pipeline::identity::IdentityProfile;
use crate::pipeline::traits::{Fetch, FetchError, RawDocument};

/// How long to let client-side rendering settle before reading the DOM.
const RENDER_WAIT: Duration = Duration::from_secs(5);

/// Headless-browser fetcher for sources that render listings with
/// JavaScript. Same contract as [`crate::pipeline::HttpFetcher`]; the
/// identity's header set is not applied, Chrome presents its own.
pub struct BrowserFetcher {
    browser: Browser,
}

impl BrowserFetcher {
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;
        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }

    fn fetch_blocking(browser: &Browser, url: &str) -> Result<String, FetchError> {
        let tab = browser
            .new_tab()
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        tab.navigate_to(url)
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        thread::sleep(RENDER_WAIT);

        let result = tab
            .evaluate("document.documentElement.outerHTML", false)
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        let html = result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default();

        let _ = tab.close(true);
        Ok(html)
    }
}

#[async_trait]
impl Fetch for BrowserFetcher {
    async fn fetch(&self, url: &str, identity: &IdentityProfile) -> Result<RawDocument, FetchError> {
        debug!(identity = identity.name, %url, "rendering page in headless browser");

        let browser = self.browser.clone();
        let target = url.to_string();
        let body = tokio::task::spawn_blocking(move || Self::fetch_blocking(&browser, &target))
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))??;

        if body.is_empty() {
            return Err(FetchError::Browser("empty document".to_string()));
        }

        Ok(RawDocument {
            bytes: body.len(),
            status: 200,
            body,
        })
    }
}
