// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document structure facets
//!
//! - Headings (1.3.1, 2.4.6): inventory, empty headings, skipped levels
//! - Landmarks (1.3.1, 2.4.1): inventory, pages without a main landmark
//! - Language of page (3.1.1): declared, missing, malformed language tags
//! - HTML validation (4.1.1): missing doctype / charset declarations

use crate::facets::{Annotated, PageNote};
use crate::records::{Field, Landmark, PageRecord};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingEntry {
    pub level: Option<u8>,
    pub text: Option<String>,
    /// Level of the preceding heading, set for skipped-level entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_level: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingAnalysis {
    pub headings: Vec<Annotated<HeadingEntry>>,
    pub empty: Vec<Annotated<HeadingEntry>>,
    pub skipped_levels: Vec<Annotated<HeadingEntry>>,
}

pub fn headings(pages: &[PageRecord]) -> HeadingAnalysis {
    let mut result = HeadingAnalysis::default();

    for page in pages {
        let mut previous: Option<u8> = None;

        for heading in page.headings.entries() {
            let entry = HeadingEntry {
                level: heading.level,
                text: heading.text.clone(),
                previous_level: None,
            };

            if heading.text.as_deref().map(str::trim).unwrap_or("").is_empty() {
                result.empty.push(Annotated::new(&page.url, entry.clone()));
            }

            if let (Some(prev), Some(level)) = (previous, heading.level) {
                if level > prev + 1 {
                    result.skipped_levels.push(Annotated::new(
                        &page.url,
                        HeadingEntry { previous_level: Some(prev), ..entry.clone() },
                    ));
                }
            }

            if heading.level.is_some() {
                previous = heading.level;
            }
            result.headings.push(Annotated::new(&page.url, entry));
        }
    }

    result
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkAnalysis {
    pub landmarks: Vec<Annotated<Landmark>>,
    pub pages_without_main: Vec<Annotated<PageNote>>,
}

pub fn landmarks(pages: &[PageRecord]) -> LandmarkAnalysis {
    let mut result = LandmarkAnalysis::default();

    for page in pages {
        if page.landmarks.is_malformed() {
            continue;
        }
        let found = page.landmarks.entries();
        result
            .landmarks
            .extend(found.iter().map(|l| Annotated::new(&page.url, l.clone())));

        if !found.iter().any(Landmark::is_main) {
            result.pages_without_main.push(Annotated::new(
                &page.url,
                PageNote { note: "no main landmark".to_string() },
            ));
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLanguage {
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageAnalysis {
    pub with_lang: Vec<Annotated<PageLanguage>>,
    pub without_lang: Vec<Annotated<PageLanguage>>,
    pub invalid_lang: Vec<Annotated<PageLanguage>>,
}

static LANG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("valid regex"));

/// Is this a well-formed BCP 47 style language tag?
pub fn is_valid_lang_tag(tag: &str) -> bool {
    LANG_TAG.is_match(tag.trim())
}

pub fn language(pages: &[PageRecord]) -> LanguageAnalysis {
    let mut result = LanguageAnalysis::default();

    for page in pages {
        match &page.lang {
            Field::Malformed => continue,
            Field::Absent => result
                .without_lang
                .push(Annotated::new(&page.url, PageLanguage { lang: None })),
            Field::Present(lang) => {
                let entry = Annotated::new(&page.url, PageLanguage { lang: Some(lang.clone()) });
                if lang.trim().is_empty() {
                    result.without_lang.push(entry);
                } else if is_valid_lang_tag(lang) {
                    result.with_lang.push(entry);
                } else {
                    result.invalid_lang.push(entry);
                }
            }
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub issue: &'static str,
    pub property: &'static str,
}

/// One issue per missing doctype or charset declaration.
///
/// A property counts as missing when it is absent or `false`; a malformed
/// value is skipped.
pub fn validation_issues(pages: &[PageRecord]) -> Vec<Annotated<ValidationIssue>> {
    let mut issues = Vec::new();

    for page in pages {
        let checks = [
            (&page.doctype_present, "doctype_present", "missing doctype declaration"),
            (&page.charset_declared, "charset_declared", "missing character set declaration"),
        ];

        for (field, property, issue) in checks {
            if matches!(field, Field::Absent | Field::Present(false)) {
                issues.push(Annotated::new(&page.url, ValidationIssue { issue, property }));
            }
        }
    }

    issues
}
