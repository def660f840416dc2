// SPDX-License-Identifier: PMPL-1.0-or-later
//! The conformance report and its renderings.
//!
//! Supports two output formats:
//! - Text: human-readable walk through the taxonomy with scores
//! - JSON: the report contract consumed by downstream tools

use crate::error::MappingError;
use crate::facets::violations::node_count;
use crate::records::{PageRecord, ViolationRecord};
use crate::scoring::{ComplianceLevel, PenaltyRule, Scores};
use crate::taxonomy::{Principle, Taxonomy, TAXONOMY};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output of one mapping invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConformanceReport {
    #[serde(flatten)]
    pub taxonomy: Taxonomy,
    pub summary: ReportSummary,
    pub scores: Scores,
}

impl ConformanceReport {
    pub fn level(&self) -> ComplianceLevel {
        self.summary.compliance_level
    }
}

/// Cross-cutting totals over the populated taxonomy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub pages_analyzed: usize,
    pub violations_analyzed: usize,
    pub violation_nodes: usize,
    pub images_total: usize,
    pub images_without_alt: usize,
    pub non_descriptive_links: usize,
    pub unlabeled_inputs: usize,
    pub pages_without_title: usize,
    pub duplicate_title_groups: usize,
    pub pages_without_lang: usize,
    /// Items across every issue facet the scoring policy looks at
    pub total_issues: usize,
    /// `principle.guideline.criterion.facet` paths with no extractor yet
    pub not_implemented: Vec<String>,
    pub compliance_level: ComplianceLevel,
    pub scoring_policy: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportSummary {
    pub fn build(
        taxonomy: &Taxonomy,
        pages: &[PageRecord],
        violations: &[ViolationRecord],
        scores: &Scores,
        rules: &[PenaltyRule],
        scoring_policy: &str,
    ) -> Self {
        let count = |p: Principle, g: &str, c: &str, f: &str| {
            taxonomy.criterion(p, g, c).map(|b| b.count(f)).unwrap_or(0)
        };
        let image_facets = ["with_alt", "without_alt", "empty_alt", "decorative"];

        let total_issues = rules
            .iter()
            .map(|rule| {
                rule.issues
                    .iter()
                    .map(|f| count(rule.principle, rule.guideline, rule.criterion, *f))
                    .sum::<usize>()
            })
            .sum();

        let not_implemented = taxonomy
            .buckets()
            .flat_map(|(p, g, c, bucket)| {
                bucket
                    .iter()
                    .filter(|(_, facet)| facet.is_pending())
                    .map(move |(f, _)| format!("{}.{}.{}.{}", p.key(), g, c, f))
            })
            .collect();

        Self {
            pages_analyzed: pages.len(),
            violations_analyzed: violations.len(),
            violation_nodes: node_count(violations),
            images_total: image_facets
                .iter()
                .map(|f| count(Principle::Perceivable, "text_alternatives", "non_text_content", *f))
                .sum(),
            images_without_alt: count(Principle::Perceivable, "text_alternatives", "non_text_content", "without_alt"),
            non_descriptive_links: count(Principle::Operable, "navigable", "link_purpose", "non_descriptive"),
            unlabeled_inputs: count(Principle::Understandable, "input_assistance", "labels_or_instructions", "unlabeled"),
            pages_without_title: count(Principle::Operable, "navigable", "page_titled", "without_title"),
            duplicate_title_groups: count(Principle::Operable, "navigable", "page_titled", "duplicates"),
            pages_without_lang: count(Principle::Understandable, "readable", "language_of_page", "without_lang"),
            total_issues,
            not_implemented,
            compliance_level: scores.level(),
            scoring_policy: scoring_policy.to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a finished report
pub fn generate_report(report: &ConformanceReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(report),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Render a mapping failure in the same format a report would use
pub fn generate_error_report(error: &MappingError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("=== Conformance Mapping Report ===\n\nERROR: {}\n", error.cause),
        OutputFormat::Json => serde_json::to_string_pretty(error).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize error: {}\"}}", e)
        }),
    }
}

fn generate_text_report(report: &ConformanceReport) -> String {
    let summary = &report.summary;
    let scores = &report.scores;
    let mut output = String::new();

    output.push_str("=== Conformance Mapping Report ===\n\n");
    output.push_str(&format!(
        "Analyzed {} page(s) and {} violation(s) ({} affected node(s))\n",
        summary.pages_analyzed, summary.violations_analyzed, summary.violation_nodes
    ));
    output.push_str(&format!(
        "Overall score: {:.1} (Level {})\n",
        scores.overall, summary.compliance_level
    ));

    for principle in Principle::ALL {
        output.push_str(&format!("  {}: {:.1}\n", principle, principle_score(scores, principle)));
    }
    output.push('\n');

    for spec in &TAXONOMY {
        output.push_str(&format!("--- {} ---\n", spec.principle));
        for guideline in spec.guidelines {
            output.push_str(&format!("{} {}\n", guideline.number, guideline.title));
            for criterion in guideline.criteria {
                output.push_str(&format!(
                    "  {} {} (Level {})\n",
                    criterion.number, criterion.title, criterion.level
                ));
                let bucket = match report.taxonomy.criterion(spec.principle, guideline.key, criterion.key) {
                    Some(b) => b,
                    None => continue,
                };
                for (name, facet) in bucket.iter() {
                    if facet.is_pending() {
                        output.push_str(&format!("    {}: not implemented\n", name));
                    } else {
                        output.push_str(&format!("    {}: {}\n", name, facet.len()));
                    }
                }
            }
        }
        output.push('\n');
    }

    if !summary.not_implemented.is_empty() {
        output.push_str(&format!(
            "Coverage gaps: {} facet(s) not implemented\n",
            summary.not_implemented.len()
        ));
    }
    output.push_str(&format!("RESULT: {} ({} issue(s))\n", summary.compliance_level, summary.total_issues));

    output
}

fn principle_score(scores: &Scores, principle: Principle) -> f64 {
    match principle {
        Principle::Perceivable => scores.perceivable,
        Principle::Operable => scores.operable,
        Principle::Understandable => scores.understandable,
        Principle::Robust => scores.robust,
    }
}

fn generate_json_report(report: &ConformanceReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
    })
}
