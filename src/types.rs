//! Shared value types used by the navigation builder and the normalizer.
//!
//! Nothing here touches the filesystem. Everything is derived from the
//! configured chapter list and a document's position in it.

use std::fmt;

/// Skill level of a chapter page, taken from the last `_` token of its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillLevel {
    Beginner,
    Advanced,
    Ninja,
    Main,
}

impl SkillLevel {
    /// All levels in the order they appear in the skill-level row.
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Advanced,
        SkillLevel::Ninja,
        SkillLevel::Main,
    ];

    /// Parse an exact file-name token (`"Advanced"`). Case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Beginner" => Some(SkillLevel::Beginner),
            "Advanced" => Some(SkillLevel::Advanced),
            "Ninja" => Some(SkillLevel::Ninja),
            "Main" => Some(SkillLevel::Main),
            _ => None,
        }
    }

    /// Token used in file names, e.g. `Chapter_03_Advanced.md`.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Ninja => "Ninja",
            SkillLevel::Main => "Main",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "🔰",
            SkillLevel::Advanced => "⚙️",
            SkillLevel::Ninja => "⚔️",
            SkillLevel::Main => "📝",
        }
    }

    /// Word an existing title must contain to be recognized as this level's banner.
    ///
    /// Main pages carry no level word in their title, so `Chapter` is used.
    pub fn title_keyword(self) -> &'static str {
        match self {
            SkillLevel::Main => "Chapter",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered markdown link in a navigation row.
///
/// `chapter` is the 0-based index of the chapter the link points at, when the
/// link crosses chapters. Skill-level and table-of-contents links carry `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub chapter: Option<usize>,
    pub target: String,
}

impl NavLink {
    /// Render as `[label](target)`.
    pub fn to_markdown(&self) -> String {
        format!("[{}]({})", self.label, self.target)
    }
}

/// The ordered chapter directory list. Position is the chapter number.
///
/// Borrowed from [`crate::config::NavConfig`] for the duration of a run, so it
/// cannot change while files are being rewritten.
#[derive(Debug, Clone, Copy)]
pub struct ChapterIndex<'a> {
    dirs: &'a [String],
}

impl<'a> ChapterIndex<'a> {
    pub fn new(dirs: &'a [String]) -> Self {
        Self { dirs }
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Directory name at a 0-based index.
    pub fn dir(&self, index: usize) -> Option<&'a str> {
        self.dirs.get(index).map(String::as_str)
    }

    /// Directory name for a 1-based chapter number, as written in wildcard references.
    pub fn dir_for_number(&self, number: usize) -> Option<&'a str> {
        number.checked_sub(1).and_then(|i| self.dir(i))
    }

    pub fn prev(&self, index: usize) -> Option<usize> {
        index.checked_sub(1).filter(|&i| i < self.len())
    }

    pub fn next(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.len()).then_some(next)
    }

    pub fn iter(self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.dirs.iter().map(String::as_str).enumerate()
    }
}

/// Two-digit chapter number for a 0-based index (`0` → `"01"`).
pub fn chapter_number(index: usize) -> String {
    format!("{:02}", index + 1)
}
