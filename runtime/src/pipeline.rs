//! The fetch-and-extract pipeline.
//!
//! Store lookup, then the fetch cascade with cleaning and extraction as the
//! acceptor, then persistence. One URL is handled start to finish before the
//! call returns.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::info;

use crate::acquisition::{AttemptOutcome, FetchCascade, TierAttempt, TierKind};
use crate::cleaning::{clean_html, NoiseProfile};
use crate::config::HarvestConfig;
use crate::error::{FetchError, HarvestError};
use crate::extraction::ExtractionCascade;
use crate::store::{self, FaqStore};
use crate::types::FaqResult;

/// Where a report's pairs came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HarvestSource {
    Cache,
    Fresh {
        tier: TierKind,
        strategy: &'static str,
    },
    /// Every tier was skipped, failed, or produced nothing extractable.
    NotFound,
}

/// One tier attempt, flattened for display.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub tier: TierKind,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl AttemptRecord {
    pub fn is_warning(&self) -> bool {
        self.outcome == "failed"
    }
}

impl From<&TierAttempt> for AttemptRecord {
    fn from(attempt: &TierAttempt) -> Self {
        let (outcome, detail) = match &attempt.outcome {
            AttemptOutcome::Skipped(reason) => ("skipped", Some(reason.clone())),
            AttemptOutcome::Failed(e) => ("failed", Some(e.to_string())),
            AttemptOutcome::Empty => ("empty", None),
            AttemptOutcome::Rejected => ("no_pairs", None),
            AttemptOutcome::Accepted => ("accepted", None),
        };
        Self {
            tier: attempt.tier,
            outcome,
            detail,
            elapsed: attempt.elapsed,
        }
    }
}

/// What a harvest returns to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub url: String,
    pub faqs: FaqResult,
    pub source: HarvestSource,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// Empty on a cache hit.
    pub attempts: Vec<AttemptRecord>,
}

impl HarvestReport {
    /// Tier failures, surfaced as non-fatal warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.attempts.iter().filter(|a| a.is_warning())
    }

    pub fn is_cache_hit(&self) -> bool {
        self.source == HarvestSource::Cache
    }
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

pub struct Harvester {
    store: FaqStore,
    fetcher: FetchCascade,
    extractor: ExtractionCascade,
    noise: NoiseProfile,
}

impl Harvester {
    pub fn new(
        store: FaqStore,
        fetcher: FetchCascade,
        extractor: ExtractionCascade,
        noise: NoiseProfile,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            noise,
        }
    }

    /// Standard tiers and strategies, with the file store at the configured
    /// cache path.
    pub fn from_config(config: &HarvestConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            FaqStore::open(store::backend_for(config)),
            FetchCascade::from_config(config)?,
            ExtractionCascade::standard(config.headings),
            config.noise,
        ))
    }

    pub fn store(&self) -> &FaqStore {
        &self.store
    }

    /// FAQs for `url`, from the cache or a fresh fetch.
    ///
    /// Fetch failures and empty pages are not errors; they produce a report
    /// with no pairs. The only error is failing to persist a fresh result.
    pub async fn harvest(&mut self, url: &str) -> Result<HarvestReport, HarvestError> {
        let started = Instant::now();

        if let Some(faqs) = self.store.get(url) {
            info!("cache hit for {url} ({} pairs)", faqs.len());
            return Ok(HarvestReport {
                url: url.to_string(),
                faqs: faqs.clone(),
                source: HarvestSource::Cache,
                elapsed: started.elapsed(),
                attempts: Vec::new(),
            });
        }
        info!("cache miss for {url}");

        let noise = self.noise;
        let extractor = &self.extractor;
        let outcome = self
            .fetcher
            .fetch_until(url, |html| {
                let extraction = extractor.extract(&clean_html(html, noise));
                (!extraction.is_empty()).then_some(extraction)
            })
            .await;

        let attempts = outcome.attempts.iter().map(AttemptRecord::from).collect();
        let (faqs, source) = match (outcome.value, outcome.tier) {
            (Some(extraction), Some(tier)) => {
                let source = HarvestSource::Fresh {
                    tier,
                    strategy: extraction.strategy.unwrap_or("unknown"),
                };
                (extraction.pairs, source)
            }
            _ => (FaqResult::new(), HarvestSource::NotFound),
        };

        if faqs.is_empty() {
            info!("no FAQs found for {url}");
        } else if self.store.put(url, faqs.clone()) {
            self.store.persist()?;
        }

        Ok(HarvestReport {
            url: url.to_string(),
            faqs,
            source,
            elapsed: started.elapsed(),
            attempts,
        })
    }
}
