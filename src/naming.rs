//! Centralized name parsing for the `Chapter_NN_Name` convention.
//!
//! Chapter directories carry a numeric prefix followed by a descriptive name
//! with underscores for spaces. Page files carry the chapter prefix and a
//! trailing skill-level token:
//!
//! - `Chapter_03_Building_Real_Projects/` → number 3, "Building Real Projects"
//! - `Chapter_03_Advanced.md` → level token "Advanced"
//!
//! ## Display Titles
//!
//! Underscores in the name portion become spaces. The numeric prefix is
//! dropped entirely, so the display title never repeats the chapter number.

use crate::types::SkillLevel;

/// Result of parsing a chapter directory name like `Chapter_02_Getting_Started`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChapter {
    /// Number prefix if present (e.g., `2` from `Chapter_02_Getting_Started`)
    pub number: Option<u32>,
    /// Display title: name with underscores converted to spaces.
    pub display_title: String,
}

/// Parse a chapter directory name following the `Chapter_NN_Name` convention.
///
/// - `"Chapter_02_Getting_Started"` → number=Some(2), display_title="Getting Started"
/// - `"Chapter_10_AI"` → number=Some(10), display_title="AI"
/// - `"Chapter_07"` → number=Some(7), display_title=""
/// - `"Appendix_Tools"` → number=None, display_title="Appendix Tools"
pub fn parse_chapter_dir(name: &str) -> ParsedChapter {
    if let Some(rest) = name.strip_prefix("Chapter_") {
        let (prefix, raw) = match rest.find('_') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };
        if !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_digit())
            && let Ok(num) = prefix.parse::<u32>()
        {
            return ParsedChapter {
                number: Some(num),
                display_title: raw.replace('_', " "),
            };
        }
    }
    ParsedChapter {
        number: None,
        display_title: name.replace('_', " "),
    }
}

/// Numeric prefix of a chapter directory when it disagrees with the
/// directory's 0-based `position` in the chapter list.
///
/// `Chapter_05_X` at position 2 → `Some(5)`. Unprefixed names never disagree.
pub fn misnumbered_prefix(dir: &str, position: usize) -> Option<u32> {
    parse_chapter_dir(dir)
        .number
        .filter(|&n| usize::try_from(n).ok() != Some(position + 1))
}

/// Trailing `_`-separated token of a file name, with the extension removed.
///
/// `Chapter_03_Advanced.md` → `"Advanced"`, `README.md` → `"README"`.
pub fn level_token(file_name: &str) -> &str {
    let last = file_name.rsplit('_').next().unwrap_or(file_name);
    last.split('.').next().unwrap_or(last)
}

/// Skill level declared by a page's file name, if it is one of the known four.
pub fn parse_skill_level(file_name: &str) -> Option<SkillLevel> {
    SkillLevel::from_token(level_token(file_name))
}

/// File name of a chapter page: `Chapter_<NN>_<Level>.md`.
pub fn page_file_name(chapter_number: &str, level: SkillLevel) -> String {
    format!("Chapter_{}_{}.md", chapter_number, level.as_str())
}
