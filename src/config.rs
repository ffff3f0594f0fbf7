//! Book configuration module.
//!
//! Handles loading, validating, and merging `chapter-nav.toml`. Stock defaults
//! describe the book this tool was written for; a config file in the book root
//! overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! book/
//! ├── chapter-nav.toml                         # Optional, overrides stock defaults
//! ├── README.md                                # Table of contents
//! ├── Chapter_01_The_Vibe_Coding_Revolution/
//! │   ├── Chapter_01_Main.md
//! │   └── Chapter_01_Beginner.md
//! └── Chapter_02_Getting_Started_with_Vibe_Coding/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # Ordered chapter directories. Position is the chapter number.
//! chapters = ["Chapter_01_The_Vibe_Coding_Revolution", "..."]
//! file_pattern = "*.md"      # Which files inside a chapter are normalized
//!
//! [links]
//! toc = "../README.md"       # Table of Contents target, relative to a chapter page
//!
//! [banner]
//! copyright = "© 2025 VibeCoding - Where Human Creativity Meets AI Capabilities"
//! edition = "2025 Edition"   # Label in the Main page title
//! ```
//!
//! The chapter list replaces the default list wholesale; tables merge
//! key-by-key. Unknown keys are rejected to catch typos early.

use crate::types::ChapterIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the book root.
pub const CONFIG_FILE_NAME: &str = "chapter-nav.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Book navigation configuration loaded from `chapter-nav.toml`.
///
/// Passed by reference into every normalizer operation. Nothing reads it
/// from global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Ordered chapter directory names. Index 0 is chapter 1.
    pub chapters: Vec<String>,
    /// Glob matched against file names inside each chapter directory.
    pub file_pattern: String,
    /// Link targets that do not depend on chapter position.
    pub links: LinksConfig,
    /// Static text in the navigation block and title banners.
    pub banner: BannerConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            chapters: default_chapters(),
            file_pattern: "*.md".to_string(),
            links: LinksConfig::default(),
            banner: BannerConfig::default(),
        }
    }
}

fn default_chapters() -> Vec<String> {
    [
        "Chapter_01_The_Vibe_Coding_Revolution",
        "Chapter_02_Getting_Started_with_Vibe_Coding",
        "Chapter_03_Building_Real_Projects_with_AI_Assistance",
        "Chapter_04_AI_Powered_Backend_Development",
        "Chapter_05_Full_Stack_Development_with_AI",
        "Chapter_06_Advanced_Prompt_Engineering",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl NavConfig {
    /// Build a config with the given chapter list and stock defaults for the rest.
    pub fn with_chapters<I, S>(chapters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chapters: chapters.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Borrow the chapter list as an index for the duration of a run.
    pub fn chapter_index(&self) -> ChapterIndex<'_> {
        ChapterIndex::new(&self.chapters)
    }

    /// Compile `file_pattern` into a glob matcher.
    pub fn file_matcher(&self) -> Result<glob::Pattern, ConfigError> {
        glob::Pattern::new(&self.file_pattern).map_err(|e| {
            ConfigError::Validation(format!("file_pattern '{}': {}", self.file_pattern, e))
        })
    }

    /// Validate config values are usable before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chapters.is_empty() {
            return Err(ConfigError::Validation(
                "chapters must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for dir in &self.chapters {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "chapters must not contain empty names".into(),
                ));
            }
            if dir.contains('/') || dir.contains('\\') || dir == "." || dir == ".." {
                return Err(ConfigError::Validation(format!(
                    "chapter '{dir}' must be a single directory name"
                )));
            }
            if let Some(c) = dir.chars().find(|&c| c == ')' || c == '*' || c.is_control()) {
                return Err(ConfigError::Validation(format!(
                    "chapter '{}' must not contain {:?}",
                    dir.escape_debug(),
                    c
                )));
            }
            if !seen.insert(dir.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "chapter '{dir}' is listed more than once"
                )));
            }
        }
        if self.file_pattern.is_empty() {
            return Err(ConfigError::Validation(
                "file_pattern must not be empty".into(),
            ));
        }
        self.file_matcher()?;
        if self.links.toc.is_empty() {
            return Err(ConfigError::Validation(
                "links.toc must not be empty".into(),
            ));
        }
        reject_chars("links.toc", &self.links.toc, &[')'])?;
        if self.banner.copyright.trim().is_empty() {
            return Err(ConfigError::Validation(
                "banner.copyright must not be empty".into(),
            ));
        }
        reject_chars("banner.copyright", &self.banner.copyright, &['*'])?;
        reject_chars("banner.edition", &self.banner.edition, &[])?;
        Ok(())
    }
}

/// Reject control characters and any of `forbidden` in a value that is
/// written into pages. Rendered values must be matched again by the patterns
/// that replace them.
fn reject_chars(key: &str, value: &str, forbidden: &[char]) -> Result<(), ConfigError> {
    match value
        .chars()
        .find(|c| c.is_control() || forbidden.contains(c))
    {
        Some(c) => Err(ConfigError::Validation(format!(
            "{key} must not contain {c:?}"
        ))),
        None => Ok(()),
    }
}

/// Position-independent link targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Table of Contents target, relative to a chapter page.
    pub toc: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            toc: "../README.md".to_string(),
        }
    }
}

/// Static text rendered into every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    /// Copyright line at the bottom of the navigation block (without the `*` emphasis).
    pub copyright: String,
    /// Label used in Main page titles, e.g. `(2025 Edition)`.
    pub edition: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            copyright: "© 2025 VibeCoding - Where Human Creativity Meets AI Capabilities"
                .to_string(),
            edition: "2025 Edition".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(NavConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   overlay `chapters` array replaces the whole default list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `chapter-nav.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<NavConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NavConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `chapter-nav.toml` in the book root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<NavConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `chapter-nav.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# chapter-nav Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the book root as chapter-nav.toml.
# Unknown keys will cause an error.

# Ordered chapter directories. The position in this list is the chapter
# number: the first entry is chapter 1. Navigation links, title banners and
# ../Chapter_NN_* references are all derived from this list.
# Setting this key replaces the whole list.
chapters = [
    "Chapter_01_The_Vibe_Coding_Revolution",
    "Chapter_02_Getting_Started_with_Vibe_Coding",
    "Chapter_03_Building_Real_Projects_with_AI_Assistance",
    "Chapter_04_AI_Powered_Backend_Development",
    "Chapter_05_Full_Stack_Development_with_AI",
    "Chapter_06_Advanced_Prompt_Engineering",
]

# Glob matched against file names inside each chapter directory.
file_pattern = "*.md"

# ---------------------------------------------------------------------------
# Links
# ---------------------------------------------------------------------------
[links]
# Table of Contents target, relative to a chapter page.
toc = "../README.md"

# ---------------------------------------------------------------------------
# Banner text
# ---------------------------------------------------------------------------
[banner]
# Copyright line at the bottom of every navigation block.
copyright = "© 2025 VibeCoding - Where Human Creativity Meets AI Capabilities"

# Label in Main page titles: "# 📝 Chapter 1: ... (2025 Edition) 📝"
edition = "2025 Edition"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_six_chapters() {
        let config = NavConfig::default();
        assert_eq!(config.chapters.len(), 6);
        assert_eq!(config.chapters[0], "Chapter_01_The_Vibe_Coding_Revolution");
        assert_eq!(config.chapters[5], "Chapter_06_Advanced_Prompt_Engineering");
    }

    #[test]
    fn default_config_has_link_and_banner_settings() {
        let config = NavConfig::default();
        assert_eq!(config.file_pattern, "*.md");
        assert_eq!(config.links.toc, "../README.md");
        assert_eq!(config.banner.edition, "2025 Edition");
        assert!(config.banner.copyright.starts_with("© 2025 VibeCoding"));
    }

    #[test]
    fn with_chapters_keeps_other_defaults() {
        let config = NavConfig::with_chapters(["Chapter_01_A", "Chapter_02_B"]);
        assert_eq!(config.chapters, vec!["Chapter_01_A", "Chapter_02_B"]);
        assert_eq!(config.links.toc, "../README.md");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[banner]
edition = "Second Edition"
"#;
        let config: NavConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.banner.edition, "Second Edition");
        // Default values preserved
        assert_eq!(config.chapters.len(), 6);
        assert!(config.banner.copyright.contains("VibeCoding"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.chapters.len(), 6);
        assert_eq!(config.links.toc, "../README.md");
    }

    #[test]
    fn load_config_chapter_list_replaces_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
chapters = ["Chapter_01_Intro", "Chapter_02_Outro"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.chapters, vec!["Chapter_01_Intro", "Chapter_02_Outro"]);
        assert_eq!(config.file_pattern, "*.md");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "chapters = [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[links]
tco = "../index.md"
"#,
        )
        .unwrap();

        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<NavConfig, _> = toml::from_str("[linkz]\ntoc = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_array_replaced_not_appended() {
        let base: toml::Value = toml::from_str(r#"chapters = ["a", "b", "c"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"chapters = ["x"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        let chapters = merged.get("chapters").unwrap().as_array().unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].as_str(), Some("x"));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[banner]
copyright = "c"
edition = "e"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[banner]\nedition = \"new\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let banner = merged.get("banner").unwrap();
        assert_eq!(banner.get("edition").unwrap().as_str(), Some("new"));
        assert_eq!(banner.get("copyright").unwrap().as_str(), Some("c"));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(NavConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_chapters() {
        let config = NavConfig::with_chapters(Vec::<String>::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chapters"));
    }

    #[test]
    fn validate_duplicate_chapter() {
        let config = NavConfig::with_chapters(["Chapter_01_A", "Chapter_01_A"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn validate_chapter_with_path_separator() {
        let config = NavConfig::with_chapters(["book/Chapter_01_A"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_invalid_glob() {
        let mut config = NavConfig::default();
        config.file_pattern = "[*.md".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_toc() {
        let mut config = NavConfig::default();
        config.links.toc = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_chapter_with_closing_paren() {
        let config = NavConfig::with_chapters(["Chapter_01_Intro_(Draft)", "Chapter_02_B"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Chapter_01_Intro_(Draft)"));
    }

    #[test]
    fn validate_chapter_with_wildcard_or_newline() {
        assert!(NavConfig::with_chapters(["Chapter_01_*"]).validate().is_err());
        assert!(NavConfig::with_chapters(["Chapter_01_A\nB"]).validate().is_err());
    }

    #[test]
    fn validate_toc_with_closing_paren() {
        let mut config = NavConfig::default();
        config.links.toc = "../README.md#contents)".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("links.toc"));
    }

    #[test]
    fn validate_copyright_with_emphasis() {
        let mut config = NavConfig::default();
        config.banner.copyright = "© 2025 *VibeCoding*".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("banner.copyright"));
    }

    #[test]
    fn validate_blank_copyright() {
        for copyright in ["", "   "] {
            let mut config = NavConfig::default();
            config.banner.copyright = copyright.to_string();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("banner.copyright"));
        }
    }

    #[test]
    fn validate_multiline_banner_text() {
        let mut config = NavConfig::default();
        config.banner.copyright = "line one\nline two".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("banner.copyright"));

        let mut config = NavConfig::default();
        config.banner.edition = "2025\r\nEdition".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("banner.edition"));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("chapters = []").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: NavConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = NavConfig::default();
        assert_eq!(config.chapters, defaults.chapters);
        assert_eq!(config.file_pattern, defaults.file_pattern);
        assert_eq!(config.links.toc, defaults.links.toc);
        assert_eq!(config.banner.copyright, defaults.banner.copyright);
        assert_eq!(config.banner.edition, defaults.banner.edition);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("chapters").is_some());
        assert!(val.get("links").is_some());
        assert!(val.get("banner").is_some());
    }
}
