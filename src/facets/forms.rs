// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form facets - WCAG 3.3.2 Labels or Instructions (Level A)
//!
//! An input counts as labeled when any of `aria-label`, `aria-labelledby`,
//! an associated label text, or a placeholder is truthy. All `<label>`
//! elements are collected as well for cross-reference.

use crate::facets::Annotated;
use crate::records::{Input, PageRecord};
use serde_json::{Map, Value};

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

pub fn is_labeled(input: &Input) -> bool {
    is_truthy(input.attributes.get("aria-label"))
        || is_truthy(input.attributes.get("aria-labelledby"))
        || is_truthy(input.label_text.as_ref())
        || is_truthy(input.placeholder.as_ref())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormTriage {
    pub labeled: Vec<Annotated<Input>>,
    pub unlabeled: Vec<Annotated<Input>>,
    pub labels: Vec<Annotated<Map<String, Value>>>,
}

pub fn label_triage(pages: &[PageRecord]) -> FormTriage {
    let mut result = FormTriage::default();

    for page in pages {
        for form in page.forms.entries() {
            for input in &form.inputs {
                let annotated = Annotated::new(&page.url, input.clone());
                if is_labeled(input) {
                    result.labeled.push(annotated);
                } else {
                    result.unlabeled.push(annotated);
                }
            }
            result
                .labels
                .extend(form.labels.iter().map(|label| Annotated::new(&page.url, label.clone())));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::normalize_page;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("Email"))));
        assert!(is_truthy(Some(&json!(["x"]))));
    }

    #[test]
    fn test_label_triage() {
        let page = normalize_page(
            "https://a.test/contact",
            &json!({
                "forms": [{
                    "inputs": [
                        {"attributes": {"aria-label": "Search"}},
                        {"attributes": {"aria-labelledby": "lbl"}},
                        {"attributes": {}, "label_text": "Name"},
                        {"attributes": {}, "placeholder": "you@example.com"},
                        {"attributes": {"aria-label": ""}, "label_text": ""},
                        {"attributes": "broken"}
                    ],
                    "labels": [{"for": "name", "text": "Name"}, "Email"]
                }, "not a form"]
            }),
        );

        let result = label_triage(&[page]);
        assert_eq!(result.labeled.len(), 4);
        assert_eq!(result.unlabeled.len(), 2);
        assert_eq!(result.labels.len(), 2);
        assert_eq!(result.labels[1].item["text"], "Email");
        assert!(result.unlabeled.iter().all(|i| i.page_url == "https://a.test/contact"));
    }
}
