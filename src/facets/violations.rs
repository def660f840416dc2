// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation filters over the accessibility scan.
//!
//! Some facets want whole violations, others only the affected nodes; the
//! node-level variant flattens each matching violation's `nodes` and tags
//! every node with the rule id it came from.

use crate::facets::Annotated;
use crate::records::{Violation, ViolationRecord};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationNode {
    pub rule_id: String,
    pub impact: Option<String>,
    pub node: Value,
}

fn matches_rule(record: &ViolationRecord, rule_ids: &[String]) -> bool {
    rule_ids.iter().any(|id| *id == record.violation.id)
}

/// Whole violations whose id is in the rule set
pub fn whole(violations: &[ViolationRecord], rule_ids: &[String]) -> Vec<Annotated<Violation>> {
    violations
        .iter()
        .filter(|r| matches_rule(r, rule_ids))
        .map(|r| Annotated::new(&r.page_url, r.violation.clone()))
        .collect()
}

/// Affected nodes of the violations whose id is in the rule set
pub fn nodes(violations: &[ViolationRecord], rule_ids: &[String]) -> Vec<Annotated<ViolationNode>> {
    violations
        .iter()
        .filter(|r| matches_rule(r, rule_ids))
        .flat_map(|r| {
            r.violation.nodes.iter().map(move |node| {
                Annotated::new(
                    &r.page_url,
                    ViolationNode {
                        rule_id: r.violation.id.clone(),
                        impact: r.violation.impact.clone(),
                        node: node.clone(),
                    },
                )
            })
        })
        .collect()
}

/// Total number of affected nodes across all violations
pub fn node_count(violations: &[ViolationRecord]) -> usize {
    violations.iter().map(|r| r.violation.nodes.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSets;
    use serde_json::json;

    #[test]
    fn test_contrast_nodes_not_in_keyboard() {
        let n1 = json!({"target": ["#a"]});
        let n2 = json!({"target": ["#b"]});
        let records = vec![
            ViolationRecord::new("https://a.test/", "color-contrast", vec![n1.clone(), n2.clone()]),
            ViolationRecord::new("https://a.test/", "button-name", vec![json!({"target": ["button"]})]),
        ];
        let rules = RuleSets::default();

        let contrast = nodes(&records, &rules.contrast);
        let collected: Vec<_> = contrast.iter().map(|a| a.item.node.clone()).collect();
        assert_eq!(collected, vec![n1, n2]);
        assert!(contrast.iter().all(|a| a.item.rule_id == "color-contrast"));

        let keyboard = whole(&records, &rules.keyboard);
        assert_eq!(keyboard.len(), 1);
        assert_eq!(keyboard[0].item.id, "button-name");
        assert_eq!(node_count(&records), 3);
    }
}
