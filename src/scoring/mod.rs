// SPDX-License-Identifier: PMPL-1.0-or-later
//! Score aggregation and compliance bands.
//!
//! How bucket contents turn into principle scores is a pluggable
//! [`ScoringPolicy`]. Whatever the policy, the aggregator guarantees that
//! all five scores are finite and within [0, 100] before a report is built,
//! and the compliance band is always derived from the overall score alone.

pub mod penalty;

pub use penalty::{PenaltyPolicy, PenaltyRule, Severity};

use crate::error::MappingError;
use crate::taxonomy::{Principle, Taxonomy};
use serde::{Deserialize, Serialize};

/// Lower bounds of each band, highest first
const BANDS: &[(f64, ComplianceLevel)] = &[
    (98.0, ComplianceLevel::AAA),
    (80.0, ComplianceLevel::AA),
    (65.0, ComplianceLevel::A),
    (40.0, ComplianceLevel::Partial),
    (20.0, ComplianceLevel::Poor),
];

/// Discrete compliance label for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplianceLevel {
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "POOR")]
    Poor,
    #[serde(rename = "PARTIAL")]
    Partial,
    A,
    AA,
    AAA,
}

impl ComplianceLevel {
    /// Classify a score. Anything not finite is CRITICAL.
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() {
            return ComplianceLevel::Critical;
        }
        BANDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, level)| *level)
            .unwrap_or(ComplianceLevel::Critical)
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceLevel::Critical => write!(f, "CRITICAL"),
            ComplianceLevel::Poor => write!(f, "POOR"),
            ComplianceLevel::Partial => write!(f, "PARTIAL"),
            ComplianceLevel::A => write!(f, "A"),
            ComplianceLevel::AA => write!(f, "AA"),
            ComplianceLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// Per-principle scores produced by a policy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrincipleScores {
    pub perceivable: f64,
    pub operable: f64,
    pub understandable: f64,
    pub robust: f64,
}

impl PrincipleScores {
    pub fn get(&self, principle: Principle) -> f64 {
        match principle {
            Principle::Perceivable => self.perceivable,
            Principle::Operable => self.operable,
            Principle::Understandable => self.understandable,
            Principle::Robust => self.robust,
        }
    }

    pub fn set(&mut self, principle: Principle, score: f64) {
        match principle {
            Principle::Perceivable => self.perceivable = score,
            Principle::Operable => self.operable = score,
            Principle::Understandable => self.understandable = score,
            Principle::Robust => self.robust = score,
        }
    }
}

/// The `scores` object of a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub perceivable: f64,
    pub operable: f64,
    pub understandable: f64,
    pub robust: f64,
    pub overall: f64,
}

impl Scores {
    pub fn level(&self) -> ComplianceLevel {
        ComplianceLevel::from_score(self.overall)
    }
}

/// Turns a populated taxonomy into scores
pub trait ScoringPolicy: Send + Sync {
    /// Name recorded in the report summary
    fn name(&self) -> &str;

    /// Score each principle from its buckets
    fn principle_scores(&self, taxonomy: &Taxonomy) -> PrincipleScores;

    /// Combine principle scores into the overall score
    fn overall(&self, scores: &PrincipleScores) -> f64;
}

/// Slack for floating-point rounding at the ends of the score range
const ROUNDING_SLACK: f64 = 1e-9;

fn check_range(label: &str, score: f64) -> Result<f64, MappingError> {
    if score.is_finite() && (-ROUNDING_SLACK..=100.0 + ROUNDING_SLACK).contains(&score) {
        Ok(score.clamp(0.0, 100.0))
    } else {
        Err(MappingError::new(format!(
            "scoring policy produced {} score {} outside [0, 100]",
            label, score
        )))
    }
}

/// Run a policy and validate everything it returns
pub fn score(policy: &dyn ScoringPolicy, taxonomy: &Taxonomy) -> Result<Scores, MappingError> {
    let principles = policy.principle_scores(taxonomy);
    for principle in Principle::ALL {
        check_range(principle.key(), principles.get(principle))?;
    }
    let overall = check_range("overall", policy.overall(&principles))?;

    Ok(Scores {
        perceivable: principles.perceivable,
        operable: principles.operable,
        understandable: principles.understandable,
        robust: principles.robust,
        overall,
    })
}
