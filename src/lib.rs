// SPDX-License-Identifier: PMPL-1.0-or-later
//! Conformance Mapper - WCAG conformance mapping and scoring
//!
//! Takes a crawl snapshot of a site and the findings of an automated
//! accessibility scan, sorts the evidence into a fixed four-principle WCAG
//! taxonomy, and scores it. The output is a fully keyed report: every
//! principle, guideline, criterion and facet is present on every run, even
//! for an empty site.
//!
//! ## Pipeline
//!
//! - **Records**: validate raw crawl and scan JSON into typed views
//! - **Facets**: extract per-page evidence (images, links, forms, titles...)
//! - **Taxonomy**: run one classifier per success criterion
//! - **Scoring**: turn buckets into principle scores and a compliance band
//! - **Report**: text and JSON renderings
//!
//! ```no_run
//! use serde_json::json;
//!
//! let crawl = json!({"https://example.test/": {"title": "Home"}});
//! let report = conformance_mapper::map(&crawl, &json!([])).unwrap();
//! println!("{}", report.level());
//! ```

pub mod config;
pub mod error;
pub mod facets;
pub mod mapper;
pub mod records;
pub mod report;
pub mod scoring;
pub mod taxonomy;

pub use config::{Config, PatternConfig, RuleSets, ScoringConfig};
pub use error::{ConfigError, MappingError};
pub use mapper::{map, Mapper};
pub use report::{ConformanceReport, ReportSummary};
pub use scoring::{ComplianceLevel, ScoringPolicy, Scores};
pub use taxonomy::{Principle, Taxonomy};
