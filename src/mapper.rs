// SPDX-License-Identifier: PMPL-1.0-or-later
//! Mapping facade: the single entry point of the engine.
//!
//! Either a complete, fully keyed [`ConformanceReport`] comes back, or one
//! [`MappingError`]. Shape problems inside individual records are absorbed
//! by normalization and never reach this layer; anything else, including a
//! panic inside a classifier or scoring policy, is caught here.

use crate::config::Config;
use crate::error::{ConfigError, MappingError};
use crate::facets::FacetContext;
use crate::records::{self, PageRecord, ViolationRecord};
use crate::report::{ConformanceReport, ReportSummary};
use crate::scoring::{self, penalty::DEFAULT_RULES, PenaltyPolicy, ScoringPolicy};
use crate::taxonomy;
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};

/// Maps crawl snapshots and scan findings onto the conformance taxonomy
pub struct Mapper {
    config: Config,
    policy: Box<dyn ScoringPolicy>,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Mapper {
    /// Mapper using the default weighted-penalty scoring policy. The
    /// configuration is validated first.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: Config) -> Self {
        let policy = PenaltyPolicy::new(config.scoring.clone());
        Self { config, policy: Box::new(policy) }
    }

    /// Replace the scoring policy
    pub fn with_policy(mut self, policy: impl ScoringPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Map raw JSON inputs: a crawl result and an accessibility scan result
    pub fn map(&self, crawl: &Value, scan: &Value) -> Result<ConformanceReport, MappingError> {
        contain(|| {
            let pages = records::normalize_crawl(crawl)?;
            let violations = records::normalize_scan(scan)?;
            self.build(&pages, &violations)
        })
    }

    /// Map records that were already normalized
    pub fn map_records(
        &self,
        pages: &[PageRecord],
        violations: &[ViolationRecord],
    ) -> Result<ConformanceReport, MappingError> {
        contain(|| self.build(pages, violations))
    }

    fn build(
        &self,
        pages: &[PageRecord],
        violations: &[ViolationRecord],
    ) -> Result<ConformanceReport, MappingError> {
        let ctx = FacetContext { pages, violations, config: &self.config };
        let taxonomy = taxonomy::assemble(&ctx);
        let scores = scoring::score(self.policy.as_ref(), &taxonomy)?;
        let summary = ReportSummary::build(
            &taxonomy,
            pages,
            violations,
            &scores,
            DEFAULT_RULES,
            self.policy.name(),
        );

        info!(
            pages = pages.len(),
            violations = violations.len(),
            overall = scores.overall,
            level = %summary.compliance_level,
            "mapping complete"
        );

        Ok(ConformanceReport { taxonomy, summary, scores })
    }
}

/// Run a mapping step, turning a panic into a mapping error
fn contain(
    step: impl FnOnce() -> Result<ConformanceReport, MappingError>,
) -> Result<ConformanceReport, MappingError> {
    let result = panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|payload| Err(MappingError::from_panic(payload)));

    if let Err(ref e) = result {
        error!(cause = %e.cause, "mapping failed");
    }
    result
}

/// Map with the default configuration
pub fn map(crawl: &Value, scan: &Value) -> Result<ConformanceReport, MappingError> {
    Mapper::default().map(crawl, scan)
}
