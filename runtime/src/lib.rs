// Copyright 2026 FAQ Harvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! FAQ Harvest: pull question/answer pairs out of arbitrary web pages.
//!
//! A [`pipeline::Harvester`] checks the URL-keyed [`store::FaqStore`], and on
//! a miss runs the [`acquisition::FetchCascade`] (static GET, scripted
//! render, full browser) with noise stripping and the
//! [`extraction::ExtractionCascade`] deciding whether a tier's HTML is good
//! enough. Fresh results are persisted before the call returns.

pub mod acquisition;
pub mod cleaning;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod renderer;
pub mod store;
pub mod types;

pub use config::HarvestConfig;
pub use error::{FetchError, HarvestError, StoreError};
pub use pipeline::{HarvestReport, HarvestSource, Harvester};
pub use types::{FaqPair, FaqResult};
