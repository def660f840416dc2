// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page title analysis - WCAG 2.4.2 Page Titled (Level A)
//!
//! Duplicate grouping is keyed on the trimmed title text, so the result does
//! not depend on the order pages are visited in.

use crate::facets::Annotated;
use crate::records::{Field, PageRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTitle {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleAnalysis {
    pub with_title: Vec<Annotated<PageTitle>>,
    pub without_title: Vec<Annotated<PageTitle>>,
    /// Title to sorted page URLs, only titles used by two or more pages
    pub duplicates: BTreeMap<String, Vec<String>>,
}

pub fn analyze(pages: &[PageRecord]) -> TitleAnalysis {
    let mut result = TitleAnalysis::default();
    let mut by_title: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for page in pages {
        match &page.title {
            Field::Malformed => continue,
            Field::Present(title) if !title.trim().is_empty() => {
                let trimmed = title.trim().to_string();
                by_title.entry(trimmed).or_default().push(page.url.clone());
                result
                    .with_title
                    .push(Annotated::new(&page.url, PageTitle { title: Some(title.clone()) }));
            }
            Field::Present(title) => {
                result
                    .without_title
                    .push(Annotated::new(&page.url, PageTitle { title: Some(title.clone()) }));
            }
            Field::Absent => {
                result.without_title.push(Annotated::new(&page.url, PageTitle { title: None }));
            }
        }
    }

    result.duplicates = by_title
        .into_iter()
        .filter(|(_, urls)| urls.len() >= 2)
        .map(|(title, mut urls)| {
            urls.sort();
            (title, urls)
        })
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(url: &str, title: &str) -> PageRecord {
        let mut page = PageRecord::empty(url);
        page.title = Field::Present(title.to_string());
        page
    }

    #[test]
    fn test_duplicate_groups() {
        let pages = vec![titled("A", "Home"), titled("B", "Home"), titled("C", "About")];
        let result = analyze(&pages);

        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicates["Home"], vec!["A".to_string(), "B".to_string()]);
        assert!(!result.duplicates.contains_key("About"));
        assert_eq!(result.with_title.len(), 3);
    }

    #[test]
    fn test_order_independent() {
        let forward = analyze(&[titled("A", "Home"), titled("B", "Home")]);
        let backward = analyze(&[titled("B", "Home"), titled("A", "Home")]);
        assert_eq!(forward.duplicates, backward.duplicates);
    }

    #[test]
    fn test_missing_and_blank_titles() {
        let mut malformed = PageRecord::empty("D");
        malformed.title = Field::Malformed;
        let pages = vec![PageRecord::empty("A"), titled("B", "   "), titled("C", "Contact"), malformed];
        let result = analyze(&pages);

        assert_eq!(result.without_title.len(), 2);
        assert_eq!(result.with_title.len(), 1);
        assert!(result.duplicates.is_empty());
    }
}
