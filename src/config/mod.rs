// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration for conformance-mapper
//!
//! Keyword lists used by the classifiers are versioned data, grouped per
//! locale, so coverage for a new language is a config edit. Rule-id sets
//! for the violation filters and the scoring weights live here as well.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current version of the shipped pattern lists
pub const PATTERN_VERSION: u32 = 1;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Classification keyword lists
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Violation rule-id sets per facet
    #[serde(default)]
    pub rules: RuleSets,

    /// Scoring weights
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Config {
    /// Reject configurations the scorer cannot work with
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.patterns.version == 0 {
            return Err(ConfigError::Invalid("patterns.version must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Keyword and phrase lists, ordered per locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Version of the pattern data
    #[serde(default = "default_version")]
    pub version: u32,

    /// Substrings that mark a fragment link as a skip-navigation link
    #[serde(default = "default_skip_link_keywords")]
    pub skip_link_keywords: BTreeMap<String, Vec<String>>,

    /// Exact link texts that say nothing about the target
    #[serde(default = "default_non_descriptive_phrases")]
    pub non_descriptive_link_phrases: BTreeMap<String, Vec<String>>,

    /// Substrings of image src/alt that indicate a complex image
    #[serde(default = "default_complex_image_indicators")]
    pub complex_image_indicators: Vec<String>,

    /// Link texts shorter than this (in characters) are non-descriptive
    #[serde(default = "default_min_link_text_chars")]
    pub min_link_text_chars: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            skip_link_keywords: default_skip_link_keywords(),
            non_descriptive_link_phrases: default_non_descriptive_phrases(),
            complex_image_indicators: default_complex_image_indicators(),
            min_link_text_chars: default_min_link_text_chars(),
        }
    }
}

impl PatternConfig {
    /// Does lower-cased link text contain any skip keyword, in any locale?
    pub fn has_skip_keyword(&self, text_lower: &str) -> bool {
        self.skip_link_keywords
            .values()
            .flatten()
            .any(|kw| text_lower.contains(&kw.to_lowercase()))
    }

    /// Is the trimmed, lower-cased text one of the non-descriptive phrases?
    pub fn is_non_descriptive_phrase(&self, text_lower: &str) -> bool {
        self.non_descriptive_link_phrases
            .values()
            .flatten()
            .any(|phrase| phrase.to_lowercase() == text_lower)
    }

    /// First complex-image indicator contained in the haystack
    pub fn complex_indicator(&self, haystack_lower: &str) -> Option<&str> {
        self.complex_image_indicators
            .iter()
            .find(|ind| haystack_lower.contains(&ind.to_lowercase()))
            .map(String::as_str)
    }
}

fn default_version() -> u32 {
    PATTERN_VERSION
}

fn locale_map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(locale, words)| {
            (locale.to_string(), words.iter().map(|w| w.to_string()).collect())
        })
        .collect()
}

const SKIP_KEYWORDS_EN: &[&str] = &["skip", "jump"];
const SKIP_KEYWORDS_DE: &[&str] =
    &["überspringen", "springe", "springen", "zum inhalt", "zum hauptinhalt"];

const NON_DESCRIPTIVE_EN: &[&str] = &[
    "click here", "click", "here", "more", "read more", "learn more",
    "more info", "details", "link", "this", "continue", "go",
];
const NON_DESCRIPTIVE_DE: &[&str] = &[
    "hier klicken", "klicken sie hier", "hier", "mehr", "weiterlesen",
    "mehr erfahren", "mehr lesen", "weiter", "details", "link",
];

fn default_skip_link_keywords() -> BTreeMap<String, Vec<String>> {
    locale_map(&[("en", SKIP_KEYWORDS_EN), ("de", SKIP_KEYWORDS_DE)])
}

fn default_non_descriptive_phrases() -> BTreeMap<String, Vec<String>> {
    locale_map(&[("en", NON_DESCRIPTIVE_EN), ("de", NON_DESCRIPTIVE_DE)])
}

fn default_complex_image_indicators() -> Vec<String> {
    ["chart", "graph", "diagram", "infographic", "data", "statistics"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_min_link_text_chars() -> usize {
    4
}

/// Rule ids from the accessibility scan, grouped by the facet that filters on them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSets {
    #[serde(default = "default_contrast_rules")]
    pub contrast: Vec<String>,
    #[serde(default = "default_color_rules")]
    pub color_reliance: Vec<String>,
    #[serde(default = "default_keyboard_rules")]
    pub keyboard: Vec<String>,
    #[serde(default = "default_focus_rules")]
    pub focus_visible: Vec<String>,
    #[serde(default = "default_aria_rules")]
    pub aria: Vec<String>,
    #[serde(default = "default_parsing_rules")]
    pub parsing: Vec<String>,
}

impl Default for RuleSets {
    fn default() -> Self {
        Self {
            contrast: default_contrast_rules(),
            color_reliance: default_color_rules(),
            keyboard: default_keyboard_rules(),
            focus_visible: default_focus_rules(),
            aria: default_aria_rules(),
            parsing: default_parsing_rules(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_contrast_rules() -> Vec<String> {
    strings(&["color-contrast", "color-contrast-enhanced"])
}

fn default_color_rules() -> Vec<String> {
    strings(&["link-in-text-block"])
}

fn default_keyboard_rules() -> Vec<String> {
    strings(&["keyboard", "focus-order", "no-keyboard-trap", "button-name", "link-name"])
}

fn default_focus_rules() -> Vec<String> {
    strings(&["focus-visible"])
}

fn default_aria_rules() -> Vec<String> {
    strings(&[
        "aria-allowed-attr",
        "aria-required-attr",
        "aria-required-children",
        "aria-required-parent",
        "aria-roles",
        "aria-valid-attr",
        "aria-valid-attr-value",
    ])
}

fn default_parsing_rules() -> Vec<String> {
    strings(&["duplicate-id", "duplicate-id-active", "duplicate-id-aria"])
}

/// Relative weight of each principle in the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipleWeights {
    pub perceivable: f64,
    pub operable: f64,
    pub understandable: f64,
    pub robust: f64,
}

impl Default for PrincipleWeights {
    fn default() -> Self {
        Self { perceivable: 1.0, operable: 1.0, understandable: 1.0, robust: 1.0 }
    }
}

impl PrincipleWeights {
    fn as_array(&self) -> [f64; 4] {
        [self.perceivable, self.operable, self.understandable, self.robust]
    }
}

/// Scoring policy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub principle_weights: PrincipleWeights,

    /// Issue count at which a count-only rule reaches half failure
    #[serde(default = "default_saturation")]
    pub saturation: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { principle_weights: PrincipleWeights::default(), saturation: default_saturation() }
    }
}

fn default_saturation() -> f64 {
    5.0
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = self.principle_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "principle weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::Invalid("principle weights must not all be zero".to_string()));
        }
        if !self.saturation.is_finite() || self.saturation <= 0.0 {
            return Err(ConfigError::Invalid("scoring.saturation must be positive".to_string()));
        }
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

/// Load configuration from a TOML or YAML file, falling back to defaults
/// when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    config.validate()?;
    Ok(config)
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config)?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
