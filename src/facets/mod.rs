// SPDX-License-Identifier: PMPL-1.0-or-later
//! Facet extractors.
//!
//! Each extractor pulls one slice of data out of the validated page records
//! or scan findings. Extractors never fail: anything the record layer marked
//! absent or malformed simply contributes nothing. Every item placed in a
//! facet is a copy annotated with the URL of the page it came from.

pub mod aria;
pub mod forms;
pub mod images;
pub mod links;
pub mod pending;
pub mod structure;
pub mod titles;
pub mod violations;

use crate::config::Config;
use crate::records::{Element, Image, Input, Link, PageRecord, ViolationRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Everything an extractor may read during one mapping invocation
#[derive(Debug, Clone, Copy)]
pub struct FacetContext<'a> {
    pub pages: &'a [PageRecord],
    pub violations: &'a [ViolationRecord],
    pub config: &'a Config,
}

/// A copy of a source item tagged with its originating page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotated<T> {
    pub page_url: String,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Annotated<T> {
    pub fn new(page_url: &str, item: T) -> Self {
        Self { page_url: page_url.to_string(), item }
    }
}

/// Page-level observation with no item of its own
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageNote {
    pub note: String,
}

/// One item in a facet collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FacetItem {
    Image(Annotated<Image>),
    ComplexImage(Annotated<images::ComplexImage>),
    Link(Annotated<Link>),
    SkipLink(Annotated<links::SkipLink>),
    Input(Annotated<Input>),
    Label(Annotated<Map<String, Value>>),
    Element(Annotated<Element>),
    Heading(Annotated<structure::HeadingEntry>),
    Landmark(Annotated<crate::records::Landmark>),
    Title(Annotated<titles::PageTitle>),
    Language(Annotated<structure::PageLanguage>),
    ValidationIssue(Annotated<structure::ValidationIssue>),
    Violation(Annotated<crate::records::Violation>),
    Node(Annotated<violations::ViolationNode>),
    Page(Annotated<PageNote>),
}

macro_rules! facet_item_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Annotated<$ty>> for FacetItem {
                fn from(a: Annotated<$ty>) -> Self {
                    FacetItem::$variant(a)
                }
            }
        )*
    };
}

facet_item_from! {
    Image => Image,
    ComplexImage => images::ComplexImage,
    Link => Link,
    SkipLink => links::SkipLink,
    Input => Input,
    Label => Map<String, Value>,
    Element => Element,
    Heading => structure::HeadingEntry,
    Landmark => crate::records::Landmark,
    Title => titles::PageTitle,
    Language => structure::PageLanguage,
    ValidationIssue => structure::ValidationIssue,
    Violation => crate::records::Violation,
    Node => violations::ViolationNode,
    Page => PageNote,
}

/// Small structured result that is not a list of page items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FacetSummary {
    /// Title text to the pages sharing it, only for titles on two or more pages
    DuplicateTitles(BTreeMap<String, Vec<String>>),
}

impl FacetSummary {
    pub fn len(&self) -> usize {
        match self {
            FacetSummary::DuplicateTitles(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Marker for a facet that exists in the taxonomy but has no extractor yet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotImplemented {
    pub status: &'static str,
    pub reason: &'static str,
}

impl NotImplemented {
    pub fn new(reason: &'static str) -> Self {
        Self { status: "not_implemented", reason }
    }
}

/// The content of one named facet within a criterion bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Facet {
    Items(Vec<FacetItem>),
    Summary(FacetSummary),
    NotImplemented(NotImplemented),
}

impl Facet {
    pub fn items<T: Into<FacetItem>>(items: Vec<T>) -> Self {
        Facet::Items(items.into_iter().map(Into::into).collect())
    }

    /// Number of items or summary groups; zero for pending facets
    pub fn len(&self) -> usize {
        match self {
            Facet::Items(items) => items.len(),
            Facet::Summary(summary) => summary.len(),
            Facet::NotImplemented(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Facet::NotImplemented(_))
    }
}

/// Output of one criterion classifier: facet name to facet content, in the
/// order the classifier declared the facets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriterionBucket {
    facets: Vec<(&'static str, Facet)>,
}

impl CriterionBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facet; a repeated name replaces the earlier content in place
    pub fn with(mut self, name: &'static str, facet: Facet) -> Self {
        match self.facets.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = facet,
            None => self.facets.push((name, facet)),
        }
        self
    }

    pub fn with_items<T: Into<FacetItem>>(self, name: &'static str, items: Vec<T>) -> Self {
        self.with(name, Facet::items(items))
    }

    pub fn get(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|(n, _)| *n == name).map(|(_, facet)| facet)
    }

    /// Size of a facet; unknown facets count as zero
    pub fn count(&self, name: &str) -> usize {
        self.get(name).map(Facet::len).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Facet)> {
        self.facets.iter().map(|(name, facet)| (*name, facet))
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

impl Serialize for CriterionBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.facets.len()))?;
        for (name, facet) in &self.facets {
            map.serialize_entry(name, facet)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotated_flattens_item() {
        let note = Annotated::new("https://a.test/", PageNote { note: "x".to_string() });
        let item: FacetItem = note.into();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"page_url": "https://a.test/", "note": "x"})
        );
    }

    #[test]
    fn test_pending_distinct_from_empty() {
        let bucket = CriterionBucket::new()
            .with_items("found_nothing", Vec::<Annotated<PageNote>>::new())
            .with("pending", Facet::NotImplemented(NotImplemented::new("not covered")));

        assert_eq!(bucket.count("found_nothing"), 0);
        assert!(!bucket.get("found_nothing").unwrap().is_pending());
        assert!(bucket.get("pending").unwrap().is_pending());

        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["found_nothing"], json!([]));
        assert_eq!(json["pending"]["status"], "not_implemented");
    }

    #[test]
    fn test_annotation_keeps_originating_page() {
        let page = crate::records::normalize_page(
            "https://real.test/",
            &json!({"links": [{"href": "/x", "text": "Click here", "page_url": "https://forged.test/"}]}),
        );
        let link = page.links.entries()[0].clone();
        let item: FacetItem = Annotated::new(&page.url, link).into();

        let text = serde_json::to_string(&item).unwrap();
        assert_eq!(text.matches("page_url").count(), 1);
        assert_eq!(serde_json::to_value(&item).unwrap()["page_url"], "https://real.test/");
    }

    #[test]
    fn test_bucket_keeps_declaration_order() {
        let bucket = CriterionBucket::new()
            .with_items("with_alt", Vec::<Annotated<PageNote>>::new())
            .with_items("without_alt", Vec::<Annotated<PageNote>>::new())
            .with("decorative", Facet::NotImplemented(NotImplemented::new("later")))
            .with_items("decorative", vec![Annotated::new("u", PageNote { note: "n".to_string() })]);

        let names: Vec<_> = bucket.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["with_alt", "without_alt", "decorative"]);
        assert_eq!(bucket.count("decorative"), 1);

        let text = serde_json::to_string(&bucket).unwrap();
        let position = |key: &str| text.find(&format!("\"{}\"", key)).unwrap();
        assert!(position("with_alt") < position("without_alt"));
        assert!(position("without_alt") < position("decorative"));
    }
}
