// SPDX-License-Identifier: PMPL-1.0-or-later
//! Criterion classifiers.
//!
//! Each classifier groups facet extractors under one success criterion and
//! names the facets of its bucket. Classifiers do no cross-criterion work.

use crate::facets::{
    aria, forms, images, links, pending, structure, titles, violations, CriterionBucket, Facet,
    FacetContext, FacetSummary,
};

// 1.1.1
pub fn non_text_content(ctx: &FacetContext<'_>) -> CriterionBucket {
    let triage = images::triage(ctx.pages);
    CriterionBucket::new()
        .with_items("with_alt", triage.with_alt)
        .with_items("without_alt", triage.without_alt)
        .with_items("empty_alt", triage.empty_alt)
        .with_items("decorative", triage.decorative)
        .with_items("complex_images", images::complex(ctx.pages, &ctx.config.patterns))
}

// 1.2.1
pub fn audio_video_only(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("media_content", pending::media_content())
}

// 1.2.2
pub fn captions_prerecorded(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("multimedia_alternatives", pending::multimedia_alternatives())
}

// 1.3.1
pub fn info_and_relationships(ctx: &FacetContext<'_>) -> CriterionBucket {
    let forms = forms::label_triage(ctx.pages);
    CriterionBucket::new()
        .with_items("headings", structure::headings(ctx.pages).headings)
        .with_items("landmarks", structure::landmarks(ctx.pages).landmarks)
        .with_items("labels", forms.labels)
}

// 1.4.1
pub fn use_of_color(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with_items(
        "color_violations",
        violations::whole(ctx.violations, &ctx.config.rules.color_reliance),
    )
}

// 1.4.3
pub fn contrast_minimum(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with_items(
        "contrast_issues",
        violations::nodes(ctx.violations, &ctx.config.rules.contrast),
    )
}

// 1.4.4
pub fn resize_text(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("text_scaling", pending::text_scaling())
}

// 2.1.1
pub fn keyboard(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with_items(
        "keyboard_violations",
        violations::whole(ctx.violations, &ctx.config.rules.keyboard),
    )
}

// 2.3.1
pub fn three_flashes(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("moving_flashing_content", pending::moving_flashing_content())
}

// 2.4.1
pub fn bypass_blocks(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new()
        .with_items("skip_links", links::skip_links(ctx.pages, &ctx.config.patterns))
        .with_items(
            "pages_without_main_landmark",
            structure::landmarks(ctx.pages).pages_without_main,
        )
}

// 2.4.2
pub fn page_titled(ctx: &FacetContext<'_>) -> CriterionBucket {
    let analysis = titles::analyze(ctx.pages);
    CriterionBucket::new()
        .with_items("with_title", analysis.with_title)
        .with_items("without_title", analysis.without_title)
        .with("duplicates", Facet::Summary(FacetSummary::DuplicateTitles(analysis.duplicates)))
}

// 2.4.4
pub fn link_purpose(ctx: &FacetContext<'_>) -> CriterionBucket {
    let triage = links::link_text(ctx.pages, &ctx.config.patterns);
    CriterionBucket::new()
        .with_items("descriptive", triage.descriptive)
        .with_items("non_descriptive", triage.non_descriptive)
}

// 2.4.6
pub fn headings_and_labels(ctx: &FacetContext<'_>) -> CriterionBucket {
    let analysis = structure::headings(ctx.pages);
    CriterionBucket::new()
        .with_items("empty_headings", analysis.empty)
        .with_items("skipped_heading_levels", analysis.skipped_levels)
}

// 2.4.7
pub fn focus_visible(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with_items(
        "focus_issues",
        violations::nodes(ctx.violations, &ctx.config.rules.focus_visible),
    )
}

// 3.1.1
pub fn language_of_page(ctx: &FacetContext<'_>) -> CriterionBucket {
    let analysis = structure::language(ctx.pages);
    CriterionBucket::new()
        .with_items("with_lang", analysis.with_lang)
        .with_items("without_lang", analysis.without_lang)
        .with_items("invalid_lang", analysis.invalid_lang)
}

// 3.1.2
pub fn language_of_parts(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("language_changes", pending::language_changes())
}

// 3.2.3
pub fn consistent_navigation(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("navigation_consistency", pending::navigation_consistency())
}

// 3.3.2
pub fn labels_or_instructions(ctx: &FacetContext<'_>) -> CriterionBucket {
    let triage = forms::label_triage(ctx.pages);
    CriterionBucket::new()
        .with_items("labeled", triage.labeled)
        .with_items("unlabeled", triage.unlabeled)
        .with_items("labels", triage.labels)
}

// 3.3.3
pub fn error_suggestion(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("error_messages", pending::error_messages())
}

// 3.3.5
pub fn help(_ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new().with("help_suggestions", pending::help_suggestions())
}

// 4.1.1
pub fn parsing(ctx: &FacetContext<'_>) -> CriterionBucket {
    CriterionBucket::new()
        .with_items("validation_issues", structure::validation_issues(ctx.pages))
        .with_items(
            "parsing_violations",
            violations::whole(ctx.violations, &ctx.config.rules.parsing),
        )
}

// 4.1.2
pub fn name_role_value(ctx: &FacetContext<'_>) -> CriterionBucket {
    let aria = aria::collect(ctx.pages);
    CriterionBucket::new()
        .with_items("with_aria_label", aria.with_aria_label)
        .with_items("with_aria_labelledby", aria.with_aria_labelledby)
        .with_items("with_aria_describedby", aria.with_aria_describedby)
        .with_items(
            "aria_violations",
            violations::whole(ctx.violations, &ctx.config.rules.aria),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::records::{normalize_page, ViolationRecord};
    use serde_json::json;

    #[test]
    fn test_page_titled_bucket_shape() {
        let pages = vec![
            normalize_page("A", &json!({"title": "Home"})),
            normalize_page("B", &json!({"title": "Home"})),
            normalize_page("C", &json!({"title": "About"})),
        ];
        let config = Config::default();
        let ctx = FacetContext { pages: &pages, violations: &[], config: &config };

        let bucket = page_titled(&ctx);
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["duplicates"], json!({"Home": ["A", "B"]}));
        assert_eq!(json["with_title"].as_array().unwrap().len(), 3);
        assert_eq!(json["without_title"], json!([]));
    }

    #[test]
    fn test_contrast_and_keyboard_buckets() {
        let violations = vec![ViolationRecord::new(
            "https://a.test/",
            "color-contrast",
            vec![json!({"html": "<p>"}), json!({"html": "<span>"})],
        )];
        let config = Config::default();
        let ctx = FacetContext { pages: &[], violations: &violations, config: &config };

        assert_eq!(contrast_minimum(&ctx).count("contrast_issues"), 2);
        assert_eq!(keyboard(&ctx).count("keyboard_violations"), 0);
    }

    #[test]
    fn test_pending_criteria() {
        let config = Config::default();
        let ctx = FacetContext { pages: &[], violations: &[], config: &config };
        assert!(help(&ctx).get("help_suggestions").unwrap().is_pending());
        assert!(resize_text(&ctx).get("text_scaling").unwrap().is_pending());
    }
}
