//! Headless-browser sessions scoped to a single fetch attempt.
//!
//! A [`BrowserSession`] is acquired per attempt and released on every exit
//! path. [`render_scoped`] is the normal entry point; if the caller's future
//! is dropped mid-render (a tier timeout), `Drop` still stops the protocol
//! handler, and a launched child process is killed along with the `Browser`.

pub mod chromium;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

/// How long to wait for a launched browser to exit after `close`.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Script that scrolls to the bottom so lazy loaders fire.
pub const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body ? document.body.scrollHeight : 0)";

/// Timing for one render.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub navigation_timeout: Duration,
    /// Fixed wait after navigation for asynchronous content to populate.
    pub settle: Duration,
    /// Optional script evaluated after navigation, before settling.
    pub script: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// We spawned the browser process and must shut it down.
    Launched,
    /// Attached to an existing browser over DevTools; only our page is ours.
    Connected,
}

/// A live browser plus the task pumping its DevTools connection.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    origin: Origin,
}

impl BrowserSession {
    /// Launch a headless Chromium from `executable`.
    pub async fn launch(executable: &Path) -> Result<Self> {
        let config = chromium::launch_config(executable)?;
        let (browser, handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;
        Ok(Self::from_parts(browser, handler, Origin::Launched))
    }

    /// Attach to an already-running headless browser at a DevTools endpoint.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let (browser, handler) = Browser::connect(endpoint)
            .await
            .with_context(|| format!("failed to connect to renderer at {endpoint}"))?;
        Ok(Self::from_parts(browser, handler, Origin::Connected))
    }

    fn from_parts(browser: Browser, mut handler: chromiumoxide::Handler, origin: Origin) -> Self {
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("browser handler event error: {e}");
                }
            }
        });
        Self {
            browser,
            handler,
            origin,
        }
    }

    /// Open a page, render `url`, and return the serialized DOM.
    /// The page is closed whether or not rendering succeeded.
    pub async fn capture(&self, url: &str, plan: &RenderPlan) -> Result<String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        let html = render_page(&page, url, plan).await;

        if let Err(e) = page.close().await {
            debug!("failed to close page: {e}");
        }
        html
    }

    /// Shut down what this session owns.
    pub async fn release(mut self) {
        if self.origin == Origin::Launched {
            if let Err(e) = self.browser.close().await {
                debug!("browser close failed, killing: {e}");
                let _ = self.browser.kill().await;
            }
            if tokio::time::timeout(EXIT_GRACE, self.browser.wait()).await.is_err() {
                debug!("browser did not exit within {}s", EXIT_GRACE.as_secs());
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Render `url` in `session`, then release the session on every path.
pub async fn render_scoped(session: BrowserSession, url: &str, plan: &RenderPlan) -> Result<String> {
    let result = session.capture(url, plan).await;
    session.release().await;
    result
}

async fn render_page(page: &Page, url: &str, plan: &RenderPlan) -> Result<String> {
    match tokio::time::timeout(plan.navigation_timeout, page.goto(url)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => bail!("navigation failed: {e}"),
        Err(_) => bail!(
            "navigation timed out after {}ms",
            plan.navigation_timeout.as_millis()
        ),
    }
    let _ = tokio::time::timeout(plan.navigation_timeout, page.wait_for_navigation()).await;

    if let Some(script) = plan.script {
        if let Err(e) = page.evaluate(script).await {
            debug!("post-navigation script failed: {e}");
        }
    }
    tokio::time::sleep(plan.settle).await;

    let html: String = page
        .evaluate("document.documentElement.outerHTML")
        .await
        .context("failed to get HTML")?
        .into_value()
        .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;
    Ok(html)
}
