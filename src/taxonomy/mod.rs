// SPDX-License-Identifier: PMPL-1.0-or-later
//! The conformance taxonomy: principles, guidelines and success criteria.
//!
//! The taxonomy is a static registry. Each guideline lists its criteria in a
//! fixed order, and each criterion names the classifier that fills its
//! bucket. Assembly walks the registry once; adding a criterion is a
//! registry edit.

pub mod classifiers;

use crate::facets::{CriterionBucket, FacetContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// WCAG conformance level of a success criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// The four top-level principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Principle {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

impl Principle {
    pub const ALL: [Principle; 4] = [
        Principle::Perceivable,
        Principle::Operable,
        Principle::Understandable,
        Principle::Robust,
    ];

    /// Key used in the report
    pub fn key(&self) -> &'static str {
        match self {
            Principle::Perceivable => "perceivable",
            Principle::Operable => "operable",
            Principle::Understandable => "understandable",
            Principle::Robust => "robust",
        }
    }
}

impl std::fmt::Display for Principle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principle::Perceivable => write!(f, "Perceivable"),
            Principle::Operable => write!(f, "Operable"),
            Principle::Understandable => write!(f, "Understandable"),
            Principle::Robust => write!(f, "Robust"),
        }
    }
}

pub type Classifier = fn(&FacetContext<'_>) -> CriterionBucket;

pub struct CriterionSpec {
    pub key: &'static str,
    pub number: &'static str,
    pub title: &'static str,
    pub level: WcagLevel,
    pub classify: Classifier,
}

pub struct GuidelineSpec {
    pub key: &'static str,
    pub number: &'static str,
    pub title: &'static str,
    pub criteria: &'static [CriterionSpec],
}

pub struct PrincipleSpec {
    pub principle: Principle,
    pub guidelines: &'static [GuidelineSpec],
}

macro_rules! criterion {
    ($key:literal, $number:literal, $title:literal, $level:ident, $classify:path) => {
        CriterionSpec {
            key: $key,
            number: $number,
            title: $title,
            level: WcagLevel::$level,
            classify: $classify,
        }
    };
}

use classifiers as c;

pub static TAXONOMY: [PrincipleSpec; 4] = [
    PrincipleSpec {
        principle: Principle::Perceivable,
        guidelines: &[
            GuidelineSpec {
                key: "text_alternatives",
                number: "1.1",
                title: "Text Alternatives",
                criteria: &[criterion!("non_text_content", "1.1.1", "Non-text Content", A, c::non_text_content)],
            },
            GuidelineSpec {
                key: "time_based_media",
                number: "1.2",
                title: "Time-based Media",
                criteria: &[
                    criterion!("audio_video_only", "1.2.1", "Audio-only and Video-only (Prerecorded)", A, c::audio_video_only),
                    criterion!("captions_prerecorded", "1.2.2", "Captions (Prerecorded)", A, c::captions_prerecorded),
                ],
            },
            GuidelineSpec {
                key: "adaptable",
                number: "1.3",
                title: "Adaptable",
                criteria: &[criterion!("info_and_relationships", "1.3.1", "Info and Relationships", A, c::info_and_relationships)],
            },
            GuidelineSpec {
                key: "distinguishable",
                number: "1.4",
                title: "Distinguishable",
                criteria: &[
                    criterion!("use_of_color", "1.4.1", "Use of Color", A, c::use_of_color),
                    criterion!("contrast_minimum", "1.4.3", "Contrast (Minimum)", AA, c::contrast_minimum),
                    criterion!("resize_text", "1.4.4", "Resize Text", AA, c::resize_text),
                ],
            },
        ],
    },
    PrincipleSpec {
        principle: Principle::Operable,
        guidelines: &[
            GuidelineSpec {
                key: "keyboard_accessible",
                number: "2.1",
                title: "Keyboard Accessible",
                criteria: &[criterion!("keyboard", "2.1.1", "Keyboard", A, c::keyboard)],
            },
            GuidelineSpec {
                key: "seizures",
                number: "2.3",
                title: "Seizures and Physical Reactions",
                criteria: &[criterion!("three_flashes", "2.3.1", "Three Flashes or Below Threshold", A, c::three_flashes)],
            },
            GuidelineSpec {
                key: "navigable",
                number: "2.4",
                title: "Navigable",
                criteria: &[
                    criterion!("bypass_blocks", "2.4.1", "Bypass Blocks", A, c::bypass_blocks),
                    criterion!("page_titled", "2.4.2", "Page Titled", A, c::page_titled),
                    criterion!("link_purpose", "2.4.4", "Link Purpose (In Context)", A, c::link_purpose),
                    criterion!("headings_and_labels", "2.4.6", "Headings and Labels", AA, c::headings_and_labels),
                    criterion!("focus_visible", "2.4.7", "Focus Visible", AA, c::focus_visible),
                ],
            },
        ],
    },
    PrincipleSpec {
        principle: Principle::Understandable,
        guidelines: &[
            GuidelineSpec {
                key: "readable",
                number: "3.1",
                title: "Readable",
                criteria: &[
                    criterion!("language_of_page", "3.1.1", "Language of Page", A, c::language_of_page),
                    criterion!("language_of_parts", "3.1.2", "Language of Parts", AA, c::language_of_parts),
                ],
            },
            GuidelineSpec {
                key: "predictable",
                number: "3.2",
                title: "Predictable",
                criteria: &[criterion!("consistent_navigation", "3.2.3", "Consistent Navigation", AA, c::consistent_navigation)],
            },
            GuidelineSpec {
                key: "input_assistance",
                number: "3.3",
                title: "Input Assistance",
                criteria: &[
                    criterion!("labels_or_instructions", "3.3.2", "Labels or Instructions", A, c::labels_or_instructions),
                    criterion!("error_suggestion", "3.3.3", "Error Suggestion", AA, c::error_suggestion),
                    criterion!("help", "3.3.5", "Help", AAA, c::help),
                ],
            },
        ],
    },
    PrincipleSpec {
        principle: Principle::Robust,
        guidelines: &[GuidelineSpec {
            key: "compatible",
            number: "4.1",
            title: "Compatible",
            criteria: &[
                criterion!("parsing", "4.1.1", "Parsing", A, c::parsing),
                criterion!("name_role_value", "4.1.2", "Name, Role, Value", A, c::name_role_value),
            ],
        }],
    },
];

/// Criterion key to bucket
pub type CriterionMap = BTreeMap<&'static str, CriterionBucket>;

/// Guideline key to criteria
pub type GuidelineMap = BTreeMap<&'static str, CriterionMap>;

/// The populated four-principle tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Taxonomy {
    pub perceivable: GuidelineMap,
    pub operable: GuidelineMap,
    pub understandable: GuidelineMap,
    pub robust: GuidelineMap,
}

impl Taxonomy {
    pub fn principle(&self, principle: Principle) -> &GuidelineMap {
        match principle {
            Principle::Perceivable => &self.perceivable,
            Principle::Operable => &self.operable,
            Principle::Understandable => &self.understandable,
            Principle::Robust => &self.robust,
        }
    }

    fn principle_mut(&mut self, principle: Principle) -> &mut GuidelineMap {
        match principle {
            Principle::Perceivable => &mut self.perceivable,
            Principle::Operable => &mut self.operable,
            Principle::Understandable => &mut self.understandable,
            Principle::Robust => &mut self.robust,
        }
    }

    pub fn criterion(&self, principle: Principle, guideline: &str, criterion: &str) -> Option<&CriterionBucket> {
        self.principle(principle).get(guideline)?.get(criterion)
    }

    /// Every bucket with its principle, guideline and criterion key
    pub fn buckets(&self) -> impl Iterator<Item = (Principle, &'static str, &'static str, &CriterionBucket)> {
        Principle::ALL.into_iter().flat_map(move |p| {
            self.principle(p).iter().flat_map(move |(g, criteria)| {
                criteria.iter().map(move |(c, bucket)| (p, *g, *c, bucket))
            })
        })
    }
}

/// Run every classifier in registry order and place its bucket
pub fn assemble(ctx: &FacetContext<'_>) -> Taxonomy {
    let mut taxonomy = Taxonomy::default();

    for spec in &TAXONOMY {
        let tree = taxonomy.principle_mut(spec.principle);
        for guideline in spec.guidelines {
            let criteria = tree.entry(guideline.key).or_default();
            for criterion in guideline.criteria {
                debug!(criterion = criterion.number, key = criterion.key, "classifying");
                criteria.insert(criterion.key, (criterion.classify)(ctx));
            }
        }
    }

    taxonomy
}
