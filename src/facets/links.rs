// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link facets - WCAG 2.4.1 Bypass Blocks (Level A), 2.4.4 Link Purpose (Level A)

use crate::config::PatternConfig;
use crate::facets::Annotated;
use crate::records::{Link, PageRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipLink {
    pub href: String,
    pub text: String,
    /// Fragment the link jumps to, without the leading `#`
    pub target: String,
}

/// Classify a link as a skip-navigation link
pub fn as_skip_link(link: &Link, patterns: &PatternConfig) -> Option<SkipLink> {
    let href = link.href.as_deref()?;
    let target = href.strip_prefix('#')?;
    let text = link.text.as_deref().unwrap_or("");

    if !patterns.has_skip_keyword(&text.to_lowercase()) {
        return None;
    }

    Some(SkipLink {
        href: href.to_string(),
        text: text.to_string(),
        target: target.to_string(),
    })
}

pub fn skip_links(pages: &[PageRecord], patterns: &PatternConfig) -> Vec<Annotated<SkipLink>> {
    pages
        .iter()
        .flat_map(|page| {
            page.links
                .entries()
                .iter()
                .filter_map(|link| as_skip_link(link, patterns))
                .map(|skip| Annotated::new(&page.url, skip))
        })
        .collect()
}

/// Is this link text too vague to convey the link's purpose?
pub fn is_non_descriptive(text: &str, patterns: &PatternConfig) -> bool {
    let normalized = text.trim().to_lowercase();
    normalized.chars().count() < patterns.min_link_text_chars
        || patterns.is_non_descriptive_phrase(&normalized)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkTextTriage {
    pub descriptive: Vec<Annotated<Link>>,
    pub non_descriptive: Vec<Annotated<Link>>,
}

pub fn link_text(pages: &[PageRecord], patterns: &PatternConfig) -> LinkTextTriage {
    let mut result = LinkTextTriage::default();

    for page in pages {
        for link in page.links.entries() {
            let annotated = Annotated::new(&page.url, link.clone());
            if is_non_descriptive(link.text.as_deref().unwrap_or(""), patterns) {
                result.non_descriptive.push(annotated);
            } else {
                result.descriptive.push(annotated);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn link(href: &str, text: &str) -> Link {
        Link { href: Some(href.to_string()), text: Some(text.to_string()), extra: Map::new() }
    }

    #[test]
    fn test_skip_link_requires_fragment() {
        let patterns = PatternConfig::default();
        let skip = as_skip_link(&link("#main", "Skip to content"), &patterns).unwrap();
        assert_eq!(skip.target, "main");
        assert!(as_skip_link(&link("/about", "Skip to content"), &patterns).is_none());
        assert!(as_skip_link(&link("#top", "Back to top"), &patterns).is_none());
    }

    #[test]
    fn test_german_skip_link() {
        let patterns = PatternConfig::default();
        let skip = as_skip_link(&link("#inhalt", "Zum Inhalt springen"), &patterns).unwrap();
        assert_eq!(skip.target, "inhalt");
    }

    #[test]
    fn test_link_text_rules() {
        let patterns = PatternConfig::default();
        assert!(is_non_descriptive("Click here", &patterns));
        assert!(is_non_descriptive("  READ MORE ", &patterns));
        assert!(is_non_descriptive("Go", &patterns));
        assert!(is_non_descriptive("", &patterns));
        assert!(is_non_descriptive("Mehr", &patterns));
        assert!(!is_non_descriptive("Download the 2023 accessibility report", &patterns));
    }

    #[test]
    fn test_link_text_triage_annotates_pages() {
        let mut page = PageRecord::empty("https://a.test/");
        page.links = crate::records::Field::Present(vec![
            link("/report", "Annual report"),
            link("/more", "more"),
            Link { href: Some("/x".to_string()), text: None, extra: Map::new() },
        ]);

        let result = link_text(&[page], &PatternConfig::default());
        assert_eq!(result.descriptive.len(), 1);
        assert_eq!(result.non_descriptive.len(), 2);
        assert_eq!(result.non_descriptive[0].page_url, "https://a.test/");
    }
}
