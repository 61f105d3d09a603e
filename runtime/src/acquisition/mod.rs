//! Tiered page acquisition.
//!
//! Tiers run cheapest first: a static GET, a scripted render on an attached
//! headless renderer, then a locally launched browser. A tier is skipped when
//! its capability is missing, and a failure or a document the caller rejects
//! moves on to the next one. Nothing here is fatal: an exhausted cascade
//! returns no value, and every tier failure is kept as a warning.

pub mod http_client;
pub mod tiers;

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::HarvestConfig;
use crate::error::FetchError;

pub use tiers::{BrowserTier, ScriptedRenderTier, StaticTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierKind {
    Static,
    ScriptedRender,
    FullBrowser,
}

impl TierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::ScriptedRender => "scripted-render",
            Self::FullBrowser => "full-browser",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a tier can run in this environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Ready,
    Unavailable(String),
}

/// One way of turning a URL into HTML.
#[async_trait]
pub trait FetchTier: Send + Sync {
    fn kind(&self) -> TierKind;

    /// Cheap environment check; never touches the network.
    fn probe(&self) -> Availability;

    /// Upper bound on one `fetch` call, enforced by the cascade.
    fn budget(&self) -> Duration;

    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Skipped(String),
    Failed(FetchError),
    /// The tier returned a blank document.
    Empty,
    /// The tier returned content the acceptor had no use for.
    Rejected,
    Accepted,
}

#[derive(Debug)]
pub struct TierAttempt {
    pub tier: TierKind,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

/// Result of a cascade run plus the trail of tiers tried.
#[derive(Debug)]
pub struct CascadeOutcome<T> {
    pub value: Option<T>,
    /// Tier that produced `value`.
    pub tier: Option<TierKind>,
    pub attempts: Vec<TierAttempt>,
}

impl<T> CascadeOutcome<T> {
    /// Tier failures, in order. Skips and rejections are not warnings.
    pub fn warnings(&self) -> impl Iterator<Item = (TierKind, &FetchError)> {
        self.attempts.iter().filter_map(|a| match &a.outcome {
            AttemptOutcome::Failed(e) => Some((a.tier, e)),
            _ => None,
        })
    }
}

impl CascadeOutcome<String> {
    /// The fetched HTML, or empty when every tier came up short.
    pub fn html(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

pub struct FetchCascade {
    tiers: Vec<Box<dyn FetchTier>>,
}

impl FetchCascade {
    pub fn new(tiers: Vec<Box<dyn FetchTier>>) -> Self {
        Self { tiers }
    }

    /// The three standard tiers, configured from `config`.
    pub fn from_config(config: &HarvestConfig) -> Result<Self, FetchError> {
        Ok(Self::new(vec![
            Box::new(StaticTier::new(config.static_timeout, &config.user_agent)?),
            Box::new(ScriptedRenderTier::new(
                config.render_endpoint.clone(),
                config.render_timeout,
                config.render_settle,
            )),
            Box::new(BrowserTier::new(
                config.chromium_path.as_deref(),
                config.browser_timeout,
                config.browser_settle,
            )),
        ]))
    }

    pub fn tiers(&self) -> impl Iterator<Item = &dyn FetchTier> {
        self.tiers.iter().map(|t| t.as_ref())
    }

    /// First non-blank document any tier produces.
    pub async fn fetch(&self, url: &str) -> CascadeOutcome<String> {
        self.fetch_until(url, |html| Some(html.to_string())).await
    }

    /// Run tiers in order, handing each non-blank document to `accept`.
    /// The first `Some` stops the cascade.
    pub async fn fetch_until<T, F>(&self, url: &str, mut accept: F) -> CascadeOutcome<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let mut attempts = Vec::with_capacity(self.tiers.len());

        for tier in &self.tiers {
            let kind = tier.kind();
            if let Availability::Unavailable(reason) = tier.probe() {
                debug!("skipping {kind} tier: {reason}");
                attempts.push(TierAttempt {
                    tier: kind,
                    outcome: AttemptOutcome::Skipped(reason),
                    elapsed: Duration::ZERO,
                });
                continue;
            }

            debug!("trying {kind} tier for {url}");
            let started = Instant::now();
            let fetched = match tokio::time::timeout(tier.budget(), tier.fetch(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::TimedOut {
                    tier: kind,
                    after: tier.budget(),
                }),
            };
            let elapsed = started.elapsed();

            let outcome = match fetched {
                Err(e) => {
                    warn!("{kind} tier failed for {url}: {e}");
                    AttemptOutcome::Failed(e)
                }
                Ok(html) if html.trim().is_empty() => {
                    info!("{kind} tier returned an empty document for {url}");
                    AttemptOutcome::Empty
                }
                Ok(html) => match accept(&html) {
                    Some(value) => {
                        info!("{kind} tier succeeded for {url} in {}ms", elapsed.as_millis());
                        attempts.push(TierAttempt {
                            tier: kind,
                            outcome: AttemptOutcome::Accepted,
                            elapsed,
                        });
                        return CascadeOutcome {
                            value: Some(value),
                            tier: Some(kind),
                            attempts,
                        };
                    }
                    None => {
                        info!("{kind} tier content had nothing usable for {url}");
                        AttemptOutcome::Rejected
                    }
                },
            };
            attempts.push(TierAttempt {
                tier: kind,
                outcome,
                elapsed,
            });
        }

        CascadeOutcome {
            value: None,
            tier: None,
            attempts,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted tiers for cascade and pipeline tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    pub enum Script {
        Html(&'static str),
        Fail,
        Hang,
        Missing,
    }

    pub struct FakeTier {
        pub kind: TierKind,
        pub script: Script,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeTier {
        pub fn new(kind: TierKind, script: Script) -> Self {
            Self {
                kind,
                script,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl FetchTier for FakeTier {
        fn kind(&self) -> TierKind {
            self.kind
        }

        fn probe(&self) -> Availability {
            match self.script {
                Script::Missing => Availability::Unavailable("not installed".into()),
                _ => Availability::Ready,
            }
        }

        fn budget(&self) -> Duration {
            Duration::from_millis(50)
        }

        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Html(html) => Ok(html.to_string()),
                Script::Fail => Err(FetchError::Transport("connection refused".into())),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(String::new())
                }
                Script::Missing => Err(FetchError::Unavailable("not installed".into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::testing::{FakeTier, Script};
    use super::*;

    fn cascade(tiers: Vec<FakeTier>) -> FetchCascade {
        FetchCascade::new(
            tiers
                .into_iter()
                .map(|t| Box::new(t) as Box<dyn FetchTier>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_first_tier_wins() {
        let second = FakeTier::new(TierKind::FullBrowser, Script::Html("<p>late</p>"));
        let calls = second.calls.clone();
        let out = cascade(vec![
            FakeTier::new(TierKind::Static, Script::Html("<p>early</p>")),
            second,
        ])
        .fetch("https://example.com")
        .await;

        assert_eq!(out.html(), "<p>early</p>");
        assert_eq!(out.tier, Some(TierKind::Static));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_as_warning() {
        let out = cascade(vec![
            FakeTier::new(TierKind::Static, Script::Fail),
            FakeTier::new(TierKind::ScriptedRender, Script::Missing),
            FakeTier::new(TierKind::FullBrowser, Script::Html("<p>rendered</p>")),
        ])
        .fetch("https://example.com")
        .await;

        assert_eq!(out.html(), "<p>rendered</p>");
        assert_eq!(out.tier, Some(TierKind::FullBrowser));
        let warnings: Vec<_> = out.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, TierKind::Static);
        assert!(matches!(
            out.attempts[1].outcome,
            AttemptOutcome::Skipped(_)
        ));
    }

    #[tokio::test]
    async fn test_skipped_tier_is_never_called() {
        let missing = FakeTier::new(TierKind::ScriptedRender, Script::Missing);
        let calls = missing.calls.clone();
        let out = cascade(vec![missing]).fetch("https://example.com").await;
        assert!(out.value.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(out.warnings().count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let out = cascade(vec![
            FakeTier::new(TierKind::ScriptedRender, Script::Hang),
            FakeTier::new(TierKind::FullBrowser, Script::Html("<p>ok</p>")),
        ])
        .fetch("https://example.com")
        .await;

        assert_eq!(out.html(), "<p>ok</p>");
        assert!(matches!(
            out.attempts[0].outcome,
            AttemptOutcome::Failed(FetchError::TimedOut {
                tier: TierKind::ScriptedRender,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_exhausted_cascade_is_empty() {
        let out = cascade(vec![
            FakeTier::new(TierKind::Static, Script::Fail),
            FakeTier::new(TierKind::FullBrowser, Script::Html("   ")),
        ])
        .fetch("https://example.com")
        .await;

        assert!(out.value.is_none());
        assert_eq!(out.html(), "");
        assert!(matches!(out.attempts[1].outcome, AttemptOutcome::Empty));
    }

    #[tokio::test]
    async fn test_rejected_content_escalates() {
        let out = cascade(vec![
            FakeTier::new(TierKind::Static, Script::Html("<div id=app></div>")),
            FakeTier::new(TierKind::FullBrowser, Script::Html("<p>Q: a?</p>")),
        ])
        .fetch_until("https://example.com", |html| {
            html.contains("Q:").then(|| html.len())
        })
        .await;

        assert_eq!(out.tier, Some(TierKind::FullBrowser));
        assert!(matches!(out.attempts[0].outcome, AttemptOutcome::Rejected));
        assert_eq!(out.warnings().count(), 0);
    }

    #[test]
    fn test_tier_kind_display() {
        assert_eq!(TierKind::ScriptedRender.to_string(), "scripted-render");
        assert_eq!(
            serde_json::to_string(&TierKind::FullBrowser).unwrap(),
            "\"full-browser\""
        );
    }
}
