//! The three standard fetch tiers.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::http_client::HttpClient;
use super::{Availability, FetchTier, TierKind};
use crate::error::FetchError;
use crate::renderer::{self, chromium, BrowserSession, RenderPlan};

/// Headroom on top of navigation + settle for session setup and teardown.
const SESSION_OVERHEAD: Duration = Duration::from_secs(10);

/// Tier 1: plain HTTP GET. Always available.
pub struct StaticTier {
    client: HttpClient,
    timeout: Duration,
}

impl StaticTier {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::new(timeout, user_agent)?,
            timeout,
        })
    }
}

#[async_trait]
impl FetchTier for StaticTier {
    fn kind(&self) -> TierKind {
        TierKind::Static
    }

    fn probe(&self) -> Availability {
        Availability::Ready
    }

    fn budget(&self) -> Duration {
        // Room for the HTTP/1.1 retry.
        self.timeout * 2
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).await?;
        if !resp.is_success() {
            return Err(FetchError::Status {
                url: resp.final_url,
                status: resp.status,
            });
        }
        Ok(resp.body)
    }
}

/// Tier 2: render on an already-running headless renderer reached over
/// DevTools, scrolling once so lazy-loaded content is fetched.
pub struct ScriptedRenderTier {
    endpoint: Option<String>,
    plan: RenderPlan,
}

impl ScriptedRenderTier {
    pub fn new(endpoint: Option<String>, navigation_timeout: Duration, settle: Duration) -> Self {
        Self {
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
            plan: RenderPlan {
                navigation_timeout,
                settle,
                script: Some(renderer::SCROLL_SCRIPT),
            },
        }
    }
}

#[async_trait]
impl FetchTier for ScriptedRenderTier {
    fn kind(&self) -> TierKind {
        TierKind::ScriptedRender
    }

    fn probe(&self) -> Availability {
        match self.endpoint {
            Some(_) => Availability::Ready,
            None => Availability::Unavailable("no render endpoint configured".into()),
        }
    }

    fn budget(&self) -> Duration {
        self.plan.navigation_timeout + self.plan.settle + SESSION_OVERHEAD
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| FetchError::Unavailable("no render endpoint configured".into()))?;
        let session = BrowserSession::connect(endpoint).await?;
        Ok(renderer::render_scoped(session, url, &self.plan).await?)
    }
}

/// Tier 3: launch a local headless Chromium for this one fetch.
pub struct BrowserTier {
    executable: Option<PathBuf>,
    plan: RenderPlan,
}

impl BrowserTier {
    /// Resolves the Chromium binary once, up front.
    pub fn new(explicit: Option<&Path>, navigation_timeout: Duration, settle: Duration) -> Self {
        Self {
            executable: chromium::find_chromium(explicit),
            plan: RenderPlan {
                navigation_timeout,
                settle,
                script: None,
            },
        }
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }
}

#[async_trait]
impl FetchTier for BrowserTier {
    fn kind(&self) -> TierKind {
        TierKind::FullBrowser
    }

    fn probe(&self) -> Availability {
        match self.executable {
            Some(_) => Availability::Ready,
            None => Availability::Unavailable("Chromium not found".into()),
        }
    }

    fn budget(&self) -> Duration {
        self.plan.navigation_timeout + self.plan.settle + SESSION_OVERHEAD
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let executable = self
            .executable
            .as_deref()
            .ok_or_else(|| FetchError::Unavailable("Chromium not found".into()))?;
        let session = BrowserSession::launch(executable).await?;
        Ok(renderer::render_scoped(session, url, &self.plan).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::http_client::DEFAULT_USER_AGENT;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn static_tier() -> StaticTier {
        StaticTier::new(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap()
    }

    #[tokio::test]
    async fn test_static_tier_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<dl><dt>a</dt></dl>"))
            .mount(&server)
            .await;

        let html = static_tier().fetch(&server.uri()).await.unwrap();
        assert_eq!(html, "<dl><dt>a</dt></dl>");
    }

    #[tokio::test]
    async fn test_static_tier_non_2xx_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let err = static_tier().fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_static_tier_connection_refused() {
        // Port 9 (discard) is closed on CI machines.
        let err = static_tier().fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_scripted_tier_requires_endpoint() {
        let tier = ScriptedRenderTier::new(None, Duration::from_secs(20), Duration::from_secs(2));
        assert!(matches!(tier.probe(), Availability::Unavailable(_)));

        let blank = ScriptedRenderTier::new(Some("  ".into()), Duration::from_secs(20), Duration::from_secs(2));
        assert!(matches!(blank.probe(), Availability::Unavailable(_)));

        let ready = ScriptedRenderTier::new(
            Some("ws://127.0.0.1:9222/devtools/browser/x".into()),
            Duration::from_secs(20),
            Duration::from_secs(2),
        );
        assert_eq!(ready.probe(), Availability::Ready);
        assert_eq!(ready.budget(), Duration::from_secs(32));
    }

    #[test]
    fn test_browser_tier_unavailable_without_binary() {
        let tier = BrowserTier::new(
            Some(Path::new("/definitely/not/chrome")),
            Duration::from_secs(30),
            Duration::from_secs(5),
        );
        assert!(tier.executable().is_none());
        assert!(matches!(tier.probe(), Availability::Unavailable(_)));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_browser_tier_renders_data_url() {
        let tier = BrowserTier::new(None, Duration::from_secs(30), Duration::from_millis(200));
        let html = tier
            .fetch("data:text/html,<dl><dt>One?</dt><dd>1</dd></dl>")
            .await
            .unwrap();
        assert!(html.contains("<dt>One?</dt>"));
    }
}
