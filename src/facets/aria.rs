// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA attribute collection - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! Membership in the three lists is independent: an element carrying both
//! `aria-label` and `aria-describedby` appears in both.

use crate::facets::Annotated;
use crate::records::{Element, PageRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AriaCollection {
    pub with_aria_label: Vec<Annotated<Element>>,
    pub with_aria_labelledby: Vec<Annotated<Element>>,
    pub with_aria_describedby: Vec<Annotated<Element>>,
}

pub fn collect(pages: &[PageRecord]) -> AriaCollection {
    let mut result = AriaCollection::default();

    for page in pages {
        for element in page.elements.entries() {
            let attrs = &element.attributes;
            if attrs.contains_key("aria-label") {
                result.with_aria_label.push(Annotated::new(&page.url, element.clone()));
            }
            if attrs.contains_key("aria-labelledby") {
                result.with_aria_labelledby.push(Annotated::new(&page.url, element.clone()));
            }
            if attrs.contains_key("aria-describedby") {
                result.with_aria_describedby.push(Annotated::new(&page.url, element.clone()));
            }
        }
    }

    result
}
