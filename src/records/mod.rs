// SPDX-License-Identifier: PMPL-1.0-or-later
//! Record validation for crawl snapshots and scan findings.
//!
//! Both inputs arrive as untrusted JSON. This module is the only place that
//! looks at raw shapes: every field is turned into a [`Field`] that is either
//! present with the expected type, absent, or malformed. Facet extractors
//! only ever see these validated views, so a bad field on one page costs
//! exactly the facets that read it.
//!
//! Accepted crawl shapes:
//! - an object mapping page URL to page object
//! - an array of page objects each carrying a `url` string
//!
//! Structural fields may sit on the page object itself or under a nested
//! `structure` object.
//!
//! Accepted scan shapes:
//! - an array of violations
//! - an object with a `violations` array and an optional `url`
//! - an object mapping page URL to an array of violations

use crate::error::MappingError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Page URL used for violations the scan did not attribute to a page
pub const SITE_WIDE: &str = "*";

/// A validated field: present with the right type, absent, or malformed
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    Present(T),
    /// Key missing or `null`
    #[default]
    Absent,
    /// Key present with the wrong JSON type
    Malformed,
}

impl<T> Field<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed)
    }
}

impl<T> Field<Vec<T>> {
    /// Entries of a list field; absent and malformed lists are empty
    pub fn entries(&self) -> &[T] {
        match self {
            Field::Present(v) => v,
            _ => &[],
        }
    }
}

/// An `<img>` as captured by the crawler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub src: Option<String>,
    /// `None` when the attribute is missing or null
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: Option<String>,
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A form control with whatever labelling information the crawler found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Input {
    pub attributes: Map<String, Value>,
    pub label_text: Option<Value>,
    pub placeholder: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Form {
    pub inputs: Vec<Input>,
    pub labels: Vec<Map<String, Value>>,
}

/// Any element that exposes an attribute mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub attributes: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: Option<u8>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landmark {
    pub role: Option<String>,
    pub tag: Option<String>,
    pub label: Option<String>,
}

impl Landmark {
    pub fn is_main(&self) -> bool {
        self.role.as_deref().map(str::to_lowercase).as_deref() == Some("main")
            || self.tag.as_deref().map(str::to_lowercase).as_deref() == Some("main")
    }
}

/// Validated view of one crawled page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRecord {
    pub url: String,
    pub title: Field<String>,
    pub lang: Field<String>,
    pub images: Field<Vec<Image>>,
    pub links: Field<Vec<Link>>,
    pub forms: Field<Vec<Form>>,
    pub elements: Field<Vec<Element>>,
    pub landmarks: Field<Vec<Landmark>>,
    pub headings: Field<Vec<Heading>>,
    pub doctype_present: Field<bool>,
    pub charset_declared: Field<bool>,
}

impl PageRecord {
    /// A record with every field absent
    pub fn empty(url: &str) -> Self {
        Self { url: url.to_string(), ..Self::default() }
    }
}

/// One scan finding, detached from its page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub id: String,
    pub impact: Option<String>,
    pub help: Option<String>,
    pub nodes: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRecord {
    pub page_url: String,
    pub violation: Violation,
}

impl ViolationRecord {
    pub fn new(page_url: &str, id: &str, nodes: Vec<Value>) -> Self {
        Self {
            page_url: page_url.to_string(),
            violation: Violation { id: id.to_string(), impact: None, help: None, nodes },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Key written by the facet layer on every annotated item; never taken from input
pub const PAGE_URL_KEY: &str = "page_url";

fn without_keys(obj: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .filter(|(k, _)| {
            let reserved = k.as_str() == PAGE_URL_KEY;
            if reserved {
                debug!(field = PAGE_URL_KEY, "dropping reserved key from crawl item");
            }
            !reserved
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn string_field(url: &str, obj: &Map<String, Value>, key: &str) -> Field<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::String(s)) => Field::Present(s.clone()),
        Some(other) => {
            warn!(page = url, field = key, found = json_kind(other), "unexpected field type, facet skipped for page");
            Field::Malformed
        }
    }
}

fn bool_field(url: &str, obj: &Map<String, Value>, key: &str) -> Field<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Bool(b)) => Field::Present(*b),
        Some(other) => {
            warn!(page = url, field = key, found = json_kind(other), "unexpected field type, facet skipped for page");
            Field::Malformed
        }
    }
}

fn list_field<T>(
    url: &str,
    obj: &Map<String, Value>,
    key: &str,
    parse: impl Fn(&Value) -> Option<T>,
) -> Field<Vec<T>> {
    match obj.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Array(items)) => {
            let mut parsed = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match parse(item) {
                    Some(p) => parsed.push(p),
                    None => debug!(page = url, field = key, index, "skipping malformed entry"),
                }
            }
            Field::Present(parsed)
        }
        Some(other) => {
            warn!(page = url, field = key, found = json_kind(other), "expected a list, facet skipped for page");
            Field::Malformed
        }
    }
}

fn parse_image(value: &Value) -> Option<Image> {
    let obj = value.as_object()?;
    let alt = match obj.get("alt") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return None,
    };
    Some(Image {
        src: opt_string(obj, "src"),
        alt,
        extra: without_keys(obj, &["src", "alt"]),
    })
}

fn parse_link(value: &Value) -> Option<Link> {
    let obj = value.as_object()?;
    Some(Link {
        href: opt_string(obj, "href"),
        text: opt_string(obj, "text"),
        extra: without_keys(obj, &["href", "text"]),
    })
}

fn parse_input(value: &Value) -> Option<Input> {
    let obj = value.as_object()?;
    let attributes = obj.get("attributes").and_then(Value::as_object).cloned().unwrap_or_default();
    Some(Input {
        attributes,
        label_text: obj.get("label_text").filter(|v| !v.is_null()).cloned(),
        placeholder: obj.get("placeholder").filter(|v| !v.is_null()).cloned(),
        extra: without_keys(obj, &["attributes", "label_text", "placeholder"]),
    })
}

fn parse_label(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(without_keys(obj, &[])),
        Value::String(text) => {
            let mut obj = Map::new();
            obj.insert("text".to_string(), Value::String(text.clone()));
            Some(obj)
        }
        _ => None,
    }
}

fn parse_form(value: &Value) -> Option<Form> {
    let obj = value.as_object()?;
    let inputs = obj
        .get("inputs")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_input).collect())
        .unwrap_or_default();
    let labels = obj
        .get("labels")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_label).collect())
        .unwrap_or_default();
    Some(Form { inputs, labels })
}

fn parse_element(value: &Value) -> Option<Element> {
    let obj = value.as_object()?;
    let attributes = obj.get("attributes")?.as_object()?.clone();
    Some(Element { attributes, extra: without_keys(obj, &["attributes"]) })
}

fn heading_level_from_tag(tag: &str) -> Option<u8> {
    let tag = tag.trim().to_lowercase();
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<u8>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

fn parse_heading(value: &Value) -> Option<Heading> {
    match value {
        Value::String(text) => Some(Heading { level: None, text: Some(text.clone()) }),
        Value::Object(obj) => {
            let level = obj
                .get("level")
                .and_then(Value::as_u64)
                .and_then(|l| u8::try_from(l).ok())
                .filter(|l| (1..=6).contains(l))
                .or_else(|| obj.get("tag").and_then(Value::as_str).and_then(heading_level_from_tag));
            Some(Heading { level, text: opt_string(obj, "text") })
        }
        _ => None,
    }
}

fn parse_landmark(value: &Value) -> Option<Landmark> {
    match value {
        Value::String(role) => Some(Landmark { role: Some(role.clone()), tag: None, label: None }),
        Value::Object(obj) => Some(Landmark {
            role: opt_string(obj, "role"),
            tag: opt_string(obj, "tag"),
            label: opt_string(obj, "label").or_else(|| opt_string(obj, "aria-label")),
        }),
        _ => None,
    }
}

/// Object a structural field is read from: the `structure` root when it
/// carries the key, the page object otherwise
fn source<'a>(root: &'a Map<String, Value>, page: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    match root.get(key) {
        Some(value) if !value.is_null() => root,
        _ => page,
    }
}

/// Normalize one page object into a validated record
pub fn normalize_page(url: &str, page: &Value) -> PageRecord {
    let obj = match page.as_object() {
        Some(obj) => obj,
        None => {
            warn!(page = url, found = json_kind(page), "page record is not an object, page skipped");
            return PageRecord {
                url: url.to_string(),
                title: Field::Malformed,
                lang: Field::Malformed,
                images: Field::Malformed,
                links: Field::Malformed,
                forms: Field::Malformed,
                elements: Field::Malformed,
                landmarks: Field::Malformed,
                headings: Field::Malformed,
                doctype_present: Field::Malformed,
                charset_declared: Field::Malformed,
            };
        }
    };

    let root = match obj.get("structure") {
        Some(Value::Object(structure)) => structure,
        Some(Value::Null) | None => obj,
        Some(other) => {
            warn!(page = url, found = json_kind(other), "structure is not an object, using page root");
            obj
        }
    };

    let at = |key: &str| source(root, obj, key);

    let lang = match at("html_attributes").get("html_attributes") {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Object(attrs)) => string_field(url, attrs, "lang"),
        Some(other) => {
            warn!(page = url, field = "html_attributes", found = json_kind(other), "expected an object");
            Field::Malformed
        }
    };

    PageRecord {
        url: url.to_string(),
        title: string_field(url, at("title"), "title"),
        lang,
        images: list_field(url, at("images"), "images", parse_image),
        links: list_field(url, at("links"), "links", parse_link),
        forms: list_field(url, at("forms"), "forms", parse_form),
        elements: list_field(url, at("all_elements"), "all_elements", parse_element),
        landmarks: list_field(url, at("landmarks"), "landmarks", parse_landmark),
        headings: list_field(url, at("headings"), "headings", parse_heading),
        doctype_present: bool_field(url, at("doctype_present"), "doctype_present"),
        charset_declared: bool_field(url, at("charset_declared"), "charset_declared"),
    }
}

/// Normalize a whole crawl result. Records come back sorted by URL.
pub fn normalize_crawl(crawl: &Value) -> Result<Vec<PageRecord>, MappingError> {
    let mut pages = match crawl {
        Value::Null => {
            warn!("crawl result is null, mapping an empty site");
            Vec::new()
        }
        Value::Object(by_url) => by_url
            .iter()
            .map(|(url, page)| normalize_page(url, page))
            .collect(),
        Value::Array(items) => {
            let mut by_url: BTreeMap<&str, PageRecord> = BTreeMap::new();
            for (index, page) in items.iter().enumerate() {
                let url = match page.get("url").and_then(Value::as_str) {
                    Some(url) => url,
                    None => {
                        warn!(index, "crawl entry has no url, skipped");
                        continue;
                    }
                };
                if by_url.contains_key(url) {
                    warn!(index, page = url, "duplicate crawl entry, keeping the first");
                    continue;
                }
                by_url.insert(url, normalize_page(url, page));
            }
            by_url.into_values().collect()
        }
        other => {
            return Err(MappingError::new(format!(
                "crawl result must be a mapping of page URL to page record, got {}",
                json_kind(other)
            )))
        }
    };

    pages.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(pages)
}

fn parse_violation(value: &Value, scope_url: Option<&str>) -> Option<ViolationRecord> {
    let obj = value.as_object()?;
    let id = match obj.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            debug!("violation without a string id, skipped");
            return None;
        }
    };
    let nodes = match obj.get("nodes") {
        Some(Value::Array(nodes)) => nodes.clone(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            warn!(rule = %id, found = json_kind(other), "violation nodes is not a list, treated as empty");
            Vec::new()
        }
    };
    let page_url = opt_string(obj, "url")
        .or_else(|| opt_string(obj, "page_url"))
        .or_else(|| scope_url.map(str::to_string))
        .unwrap_or_else(|| SITE_WIDE.to_string());

    Some(ViolationRecord {
        page_url,
        violation: Violation {
            id,
            impact: opt_string(obj, "impact"),
            help: opt_string(obj, "help"),
            nodes,
        },
    })
}

fn violation_list(items: &[Value], scope_url: Option<&str>) -> Vec<ViolationRecord> {
    items.iter().filter_map(|v| parse_violation(v, scope_url)).collect()
}

/// Normalize the accessibility scan result
pub fn normalize_scan(scan: &Value) -> Result<Vec<ViolationRecord>, MappingError> {
    match scan {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(violation_list(items, None)),
        Value::Object(obj) => {
            if let Some(violations) = obj.get("violations") {
                let scope = obj.get("url").and_then(Value::as_str);
                return match violations {
                    Value::Array(items) => Ok(violation_list(items, scope)),
                    Value::Null => Ok(Vec::new()),
                    other => {
                        warn!(found = json_kind(other), "scan violations is not a list, ignored");
                        Ok(Vec::new())
                    }
                };
            }

            let mut records = Vec::new();
            for (url, entry) in obj {
                match entry {
                    Value::Array(items) => records.extend(violation_list(items, Some(url))),
                    Value::Object(inner) => match inner.get("violations").and_then(Value::as_array) {
                        Some(items) => records.extend(violation_list(items, Some(url))),
                        None => warn!(page = %url, "scan entry has no violations list, skipped"),
                    },
                    other => warn!(page = %url, found = json_kind(other), "scan entry skipped"),
                }
            }
            Ok(records)
        }
        other => Err(MappingError::new(format!(
            "scan result must be a list of violations, got {}",
            json_kind(other)
        ))),
    }
}
