// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image facets - WCAG 1.1.1 Non-text Content (Level A)
//!
//! Triage sorts every image into exactly one of four alt-text states:
//! - `with_alt`: non-empty, non-whitespace alt text
//! - `without_alt`: alt missing or null
//! - `empty_alt`: `alt=""`, the valid marker for decorative images
//! - `decorative`: alt present but whitespace only
//!
//! Complex images (charts, diagrams, ...) are flagged separately because a
//! short alt text is rarely enough for them.

use crate::config::PatternConfig;
use crate::facets::Annotated;
use crate::records::{Image, PageRecord};
use serde::Serialize;

/// Reason attached to every flagged complex image
pub const COMPLEX_IMAGE_REASON: &str =
    "Contains complex visual information that requires an extended description";

/// Alt-text state of a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltState {
    WithAlt,
    WithoutAlt,
    EmptyAlt,
    Decorative,
}

impl AltState {
    pub fn of(image: &Image) -> Self {
        match image.alt.as_deref() {
            None => AltState::WithoutAlt,
            Some("") => AltState::EmptyAlt,
            Some(alt) if alt.trim().is_empty() => AltState::Decorative,
            Some(_) => AltState::WithAlt,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageTriage {
    pub with_alt: Vec<Annotated<Image>>,
    pub without_alt: Vec<Annotated<Image>>,
    pub empty_alt: Vec<Annotated<Image>>,
    pub decorative: Vec<Annotated<Image>>,
}

impl ImageTriage {
    pub fn total(&self) -> usize {
        self.with_alt.len() + self.without_alt.len() + self.empty_alt.len() + self.decorative.len()
    }
}

/// Partition all images across all pages by alt-text state
pub fn triage(pages: &[PageRecord]) -> ImageTriage {
    let mut result = ImageTriage::default();

    for page in pages {
        for image in page.images.entries() {
            let annotated = Annotated::new(&page.url, image.clone());
            match AltState::of(image) {
                AltState::WithAlt => result.with_alt.push(annotated),
                AltState::WithoutAlt => result.without_alt.push(annotated),
                AltState::EmptyAlt => result.empty_alt.push(annotated),
                AltState::Decorative => result.decorative.push(annotated),
            }
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    /// Indicator keyword that matched
    pub indicator: String,
    pub complexity_reason: &'static str,
}

/// Images whose src or alt suggests charts, diagrams or data graphics
pub fn complex(pages: &[PageRecord], patterns: &PatternConfig) -> Vec<Annotated<ComplexImage>> {
    let mut flagged = Vec::new();

    for page in pages {
        for image in page.images.entries() {
            let haystack = format!(
                "{} {}",
                image.src.as_deref().unwrap_or(""),
                image.alt.as_deref().unwrap_or("")
            )
            .to_lowercase();

            if let Some(indicator) = patterns.complex_indicator(&haystack) {
                flagged.push(Annotated::new(
                    &page.url,
                    ComplexImage {
                        src: image.src.clone(),
                        alt: image.alt.clone(),
                        indicator: indicator.to_string(),
                        complexity_reason: COMPLEX_IMAGE_REASON,
                    },
                ));
            }
        }
    }

    flagged
}
