//! Headless Chrome session management over CDP.
//!
//! Every login attempt gets its own browser process so no cookie or cache
//! state leaks between accounts. The CDP event stream must be drained for
//! the protocol to make progress, so each session owns a spawned handler
//! task for its lifetime.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

/// An isolated Chrome process plus its event-handler task.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch an isolated Chrome.
    ///
    /// Headless unless `headful` is set; sandboxing is disabled because the
    /// tool runs inside containers that already are the sandbox.
    pub async fn launch(step_timeout: Duration, headful: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .request_timeout(step_timeout);
        if headful {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .context("failed to launch Chrome")?;

        let handler = tokio::spawn(async move {
            while events.next().await.is_some() {
                // drain CDP events; nothing to do with them here
            }
        });

        Ok(Self { browser, handler })
    }

    /// Open a new page, navigate it to `url`, and wait for the load.
    pub async fn open(&self, url: &str) -> Result<Page> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("failed to open {url}"))?;
        page.wait_for_navigation().await.ok();
        Ok(page)
    }

    /// Shut the browser down and stop the event task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!(error = %e, "browser did not close cleanly");
        }
        self.handler.abort();
    }
}

/// Click the first element matching the CSS `selector` (selector lists work).
pub async fn click(page: &Page, selector: &str) -> Result<()> {
    let element = page
        .find_element(selector)
        .await
        .with_context(|| format!("no element matches `{selector}`"))?;
    element
        .click()
        .await
        .with_context(|| format!("click on `{selector}` failed"))?;
    Ok(())
}

/// Click the first link, button, or submit input whose visible label
/// contains `label`.
///
/// Sites like netlib.re render their navigation as plain text links, so
/// this goes through the DOM rather than a selector.
pub async fn click_text(page: &Page, label: &str) -> Result<()> {
    let script = format!(
        r#"(() => {{
            const candidates = document.querySelectorAll('a, button, input[type="submit"]');
            for (const el of candidates) {{
                const text = (el.textContent || el.value || '').trim();
                if (text.includes({label:?})) {{ el.click(); return true; }}
            }}
            return false;
        }})()"#
    );

    let clicked: bool = page
        .evaluate(script)
        .await
        .with_context(|| format!("click script for `{label}` failed"))?
        .into_value()
        .context("click script returned no value")?;

    if !clicked {
        return Err(anyhow!("no clickable element labeled `{label}`"));
    }
    Ok(())
}

/// Focus the first input matching the CSS `selector` and type `text` into it.
pub async fn type_into(page: &Page, selector: &str, text: &str) -> Result<()> {
    let element = page
        .find_element(selector)
        .await
        .with_context(|| format!("no input matches `{selector}`"))?;
    element
        .click()
        .await
        .with_context(|| format!("focus on `{selector}` failed"))?;
    element
        .type_str(text)
        .await
        .with_context(|| format!("typing into `{selector}` failed"))?;
    Ok(())
}

/// Full HTML of the current document.
pub async fn content(page: &Page) -> Result<String> {
    page.content().await.context("failed to read page content")
}
