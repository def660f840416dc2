// SPDX-License-Identifier: PMPL-1.0-or-later
//! Default scoring policy: weighted failure rates per principle.
//!
//! Each penalty rule looks at one criterion bucket. Rules with pass facets
//! score a failure rate `issues / (issues + passes)`; rules that only see
//! issues (scan violations, page-level problems) use
//! `issues / (issues + saturation)`. Both rates only grow as issues are
//! added. A principle scores `100 * (1 - weighted mean failure)` over its
//! rules, and the overall score is the weighted mean of the principles.

use crate::config::ScoringConfig;
use crate::scoring::{PrincipleScores, ScoringPolicy};
use crate::taxonomy::{Principle, Taxonomy};
use serde::{Deserialize, Serialize};

/// How much a failing rule weighs in its principle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks conformance outright
    Error,
    /// Should be addressed
    Warning,
    /// Informational
    Info,
    /// Suggestion for improvement
    Suggestion,
}

impl Severity {
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Error => 3.0,
            Severity::Warning => 2.0,
            Severity::Info => 1.0,
            Severity::Suggestion => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PenaltyRule {
    pub principle: Principle,
    pub guideline: &'static str,
    pub criterion: &'static str,
    /// Facets whose items count against the criterion
    pub issues: &'static [&'static str],
    /// Facets whose items count as passing; empty for count-only rules
    pub passes: &'static [&'static str],
    pub severity: Severity,
}

macro_rules! rule {
    ($principle:ident, $guideline:literal, $criterion:literal, $severity:ident, issues: $issues:expr, passes: $passes:expr) => {
        PenaltyRule {
            principle: Principle::$principle,
            guideline: $guideline,
            criterion: $criterion,
            issues: $issues,
            passes: $passes,
            severity: Severity::$severity,
        }
    };
}

pub const DEFAULT_RULES: &[PenaltyRule] = &[
    rule!(Perceivable, "text_alternatives", "non_text_content", Error,
        issues: &["without_alt"], passes: &["with_alt", "empty_alt", "decorative"]),
    rule!(Perceivable, "distinguishable", "use_of_color", Warning,
        issues: &["color_violations"], passes: &[]),
    rule!(Perceivable, "distinguishable", "contrast_minimum", Error,
        issues: &["contrast_issues"], passes: &[]),
    rule!(Operable, "keyboard_accessible", "keyboard", Error,
        issues: &["keyboard_violations"], passes: &[]),
    rule!(Operable, "navigable", "bypass_blocks", Warning,
        issues: &["pages_without_main_landmark"], passes: &[]),
    rule!(Operable, "navigable", "page_titled", Error,
        issues: &["without_title"], passes: &["with_title"]),
    rule!(Operable, "navigable", "page_titled", Info,
        issues: &["duplicates"], passes: &[]),
    rule!(Operable, "navigable", "link_purpose", Warning,
        issues: &["non_descriptive"], passes: &["descriptive"]),
    rule!(Operable, "navigable", "headings_and_labels", Warning,
        issues: &["empty_headings", "skipped_heading_levels"], passes: &[]),
    rule!(Operable, "navigable", "focus_visible", Warning,
        issues: &["focus_issues"], passes: &[]),
    rule!(Understandable, "readable", "language_of_page", Error,
        issues: &["without_lang", "invalid_lang"], passes: &["with_lang"]),
    rule!(Understandable, "input_assistance", "labels_or_instructions", Error,
        issues: &["unlabeled"], passes: &["labeled"]),
    rule!(Robust, "compatible", "parsing", Warning,
        issues: &["validation_issues", "parsing_violations"], passes: &[]),
    rule!(Robust, "compatible", "name_role_value", Error,
        issues: &["aria_violations"], passes: &[]),
];

/// Weighted failure-rate policy
#[derive(Debug, Clone)]
pub struct PenaltyPolicy {
    config: ScoringConfig,
    rules: &'static [PenaltyRule],
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl PenaltyPolicy {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config, rules: DEFAULT_RULES }
    }

    pub fn with_rules(mut self, rules: &'static [PenaltyRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Failure rate of one rule, in [0, 1)
    pub fn failure(&self, rule: &PenaltyRule, taxonomy: &Taxonomy) -> f64 {
        let bucket = match taxonomy.criterion(rule.principle, rule.guideline, rule.criterion) {
            Some(bucket) => bucket,
            None => return 0.0,
        };

        let issues: usize = rule.issues.iter().map(|f| bucket.count(f)).sum();
        if issues == 0 {
            return 0.0;
        }
        let issues = issues as f64;

        if rule.passes.is_empty() {
            issues / (issues + self.config.saturation)
        } else {
            let passes: usize = rule.passes.iter().map(|f| bucket.count(f)).sum();
            issues / (issues + passes as f64)
        }
    }
}

impl ScoringPolicy for PenaltyPolicy {
    fn name(&self) -> &str {
        "weighted-penalty"
    }

    fn principle_scores(&self, taxonomy: &Taxonomy) -> PrincipleScores {
        let mut scores = PrincipleScores::default();

        for principle in Principle::ALL {
            let mut weighted = 0.0;
            let mut total_weight = 0.0;
            for rule in self.rules.iter().filter(|r| r.principle == principle) {
                let weight = rule.severity.weight();
                weighted += weight * self.failure(rule, taxonomy);
                total_weight += weight;
            }

            let score = if total_weight > 0.0 {
                100.0 * (1.0 - weighted / total_weight)
            } else {
                100.0
            };
            scores.set(principle, score);
        }

        scores
    }

    fn overall(&self, scores: &PrincipleScores) -> f64 {
        let w = &self.config.principle_weights;
        let pairs = [
            (w.perceivable, scores.perceivable),
            (w.operable, scores.operable),
            (w.understandable, scores.understandable),
            (w.robust, scores.robust),
        ];
        let total: f64 = pairs.iter().map(|(weight, _)| weight).sum();
        let weighted: f64 = pairs.iter().map(|(weight, score)| weight * score).sum();
        weighted / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PrincipleWeights};
    use crate::facets::FacetContext;
    use crate::records::normalize_page;
    use crate::taxonomy::assemble;
    use serde_json::json;

    fn taxonomy_for(pages: serde_json::Value) -> Taxonomy {
        let config = Config::default();
        let records: Vec<_> = pages
            .as_object()
            .unwrap()
            .iter()
            .map(|(url, page)| normalize_page(url, page))
            .collect();
        assemble(&FacetContext { pages: &records, violations: &[], config: &config })
    }

    #[test]
    fn test_clean_site_scores_full() {
        let taxonomy = taxonomy_for(json!({
            "https://a.test/": {
                "title": "Home",
                "html_attributes": {"lang": "en"},
                "images": [{"src": "a.png", "alt": "A lighthouse at dusk"}],
                "links": [{"href": "/about", "text": "About the company"}],
                "landmarks": ["main"],
                "doctype_present": true,
                "charset_declared": true
            }
        }));
        let policy = PenaltyPolicy::default();
        let scores = policy.principle_scores(&taxonomy);
        assert_eq!(scores.perceivable, 100.0);
        assert_eq!(scores.operable, 100.0);
        assert_eq!(scores.understandable, 100.0);
        assert_eq!(scores.robust, 100.0);
        assert_eq!(policy.overall(&scores), 100.0);
    }

    #[test]
    fn test_missing_alt_never_raises_score() {
        let policy = PenaltyPolicy::default();
        let mut images = vec![json!({"src": "a.png", "alt": "Harbour"})];
        let mut previous = f64::INFINITY;

        for _ in 0..5 {
            let taxonomy = taxonomy_for(json!({ "https://a.test/": { "images": images.clone() } }));
            let score = policy.principle_scores(&taxonomy).perceivable;
            assert!(score <= previous, "{} > {}", score, previous);
            previous = score;
            images.push(json!({"src": "b.png"}));
        }
        assert!(previous < 100.0);
    }

    #[test]
    fn test_overall_uses_weights() {
        let config = ScoringConfig {
            principle_weights: PrincipleWeights { perceivable: 3.0, operable: 1.0, understandable: 0.0, robust: 0.0 },
            ..ScoringConfig::default()
        };
        let policy = PenaltyPolicy::new(config);
        let scores = PrincipleScores { perceivable: 100.0, operable: 60.0, understandable: 0.0, robust: 0.0 };
        assert!((policy.overall(&scores) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_only_rule_saturates() {
        use crate::records::ViolationRecord;

        let policy = PenaltyPolicy::default();
        let rule = DEFAULT_RULES
            .iter()
            .find(|r| r.criterion == "contrast_minimum")
            .unwrap();
        assert_eq!(policy.failure(rule, &Taxonomy::default()), 0.0);

        let config = Config::default();
        let violations = vec![ViolationRecord::new(
            "https://a.test/",
            "color-contrast",
            (0..5).map(|i| json!({ "target": [format!("#n{}", i)] })).collect(),
        )];
        let taxonomy = assemble(&FacetContext { pages: &[], violations: &violations, config: &config });
        assert!((policy.failure(rule, &taxonomy) - 0.5).abs() < 1e-9);
    }

    fn site_missing_alt() -> Taxonomy {
        taxonomy_for(json!({
            "https://a.test/": {
                "title": "Home",
                "html_attributes": {"lang": "en"},
                "images": [{"src": "a.png"}, {"src": "b.png", "alt": "Harbour"}],
                "landmarks": ["main"],
                "doctype_present": true,
                "charset_declared": true
            }
        }))
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        const CONTRAST_ONLY: &[PenaltyRule] = &[rule!(Perceivable, "distinguishable", "contrast_minimum", Error,
            issues: &["contrast_issues"], passes: &[])];

        let taxonomy = site_missing_alt();
        let default_score = PenaltyPolicy::default().principle_scores(&taxonomy).perceivable;
        let custom = PenaltyPolicy::default().with_rules(CONTRAST_ONLY);

        assert!(default_score < 100.0);
        assert_eq!(custom.principle_scores(&taxonomy).perceivable, 100.0);
    }

    #[test]
    fn test_negative_weight_is_not_hidden() {
        let config = ScoringConfig {
            principle_weights: PrincipleWeights { perceivable: -1.0, operable: 1.0, understandable: 1.0, robust: 1.0 },
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());

        let policy = PenaltyPolicy::new(config);
        let taxonomy = site_missing_alt();
        let scores = policy.principle_scores(&taxonomy);
        assert!(scores.perceivable < 100.0);
        assert!(policy.overall(&scores) > 100.0);
        assert!(crate::scoring::score(&policy, &taxonomy).is_err());
    }
}
