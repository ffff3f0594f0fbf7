//! Navigation block construction and recognition.
//!
//! A navigation block is three centered rows: chapter links, skill-level
//! links, and a copyright line.
//!
//! ```text
//! <div align="center">
//!
//! **[⬅️ Previous Chapter](../Chapter_01_X/Chapter_01_Main.md) | [📚 Table of Contents](../README.md) | [➡️ Next Chapter](../Chapter_03_Z/Chapter_03_Main.md)**
//!
//! </div>
//!
//! <div align="center">
//!
//! **[🔰 Beginner](./Chapter_02_Beginner.md) | [⚙️ Advanced](./Chapter_02_Advanced.md) | [⚔️ Ninja](./Chapter_02_Ninja.md) | [📝 Main](./Chapter_02_Main.md)**
//!
//! </div>
//!
//! <div align="center">
//!
//! *© 2025 VibeCoding - Where Human Creativity Meets AI Capabilities*
//!
//! </div>
//! ```
//!
//! Building the canonical block ([`NavBlock::for_chapter`] + [`NavBlock::render`])
//! is kept apart from finding existing blocks in a page ([`locate_blocks`]),
//! so the emitted format can change without touching the recognizer.

use crate::config::NavConfig;
use crate::naming::{page_file_name, parse_chapter_dir};
use crate::types::{ChapterIndex, NavLink, SkillLevel, chapter_number};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

pub const PREV_LABEL: &str = "⬅️ Previous Chapter";
pub const NEXT_LABEL: &str = "➡️ Next Chapter";
pub const TOC_LABEL: &str = "📚 Table of Contents";

/// Two centered bold link rows, optionally followed by a centered italic row.
///
/// The italic row admits no `*` so it cannot swallow the bold row of an
/// adjacent block.
static NAV_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<div align="center">\s*\*\*\[.*?\]\(.*?\)(?:[ \t]*\|[ \t]*\[.*?\]\(.*?\))*\*\*\s*</div>"#,
        r#"\s*<div align="center">\s*\*\*\[.*?\]\(.*?\)(?:[ \t]*\|[ \t]*\[.*?\]\(.*?\))*\*\*\s*</div>"#,
        r#"(?:\s*<div align="center">\s*\*[^*\r\n]+\*\s*</div>)?"#,
    ))
    .unwrap_or_else(|e| panic!("navigation block pattern is invalid: {e}"))
});

/// A navigation block as typed rows, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBlock {
    pub chapter_row: Vec<NavLink>,
    pub skill_row: Vec<NavLink>,
    pub copyright: String,
}

impl NavBlock {
    /// Canonical block for the chapter at `index`.
    ///
    /// The previous link is omitted on the first chapter and the next link on
    /// the last. The skill row always lists all four levels.
    pub fn for_chapter(index: usize, chapters: ChapterIndex<'_>, config: &NavConfig) -> Self {
        let mut chapter_row = Vec::with_capacity(3);
        if let Some(prev) = prev_link(index, chapters) {
            chapter_row.push(prev);
        }
        chapter_row.push(toc_link(config));
        if let Some(next) = next_link(index, chapters) {
            chapter_row.push(next);
        }

        Self {
            chapter_row,
            skill_row: skill_links(index),
            copyright: config.banner.copyright.clone(),
        }
    }

    pub fn render(&self) -> String {
        self.render_with_line_ending("\n")
    }

    /// Render with `eol` between lines, so a block replaced on a CRLF page
    /// keeps CRLF.
    pub fn render_with_line_ending(&self, eol: &str) -> String {
        let chapters = render_row(&self.chapter_row);
        let skills = render_row(&self.skill_row);
        let copyright = &self.copyright;
        format!(
            "<div align=\"center\">{eol}{eol}**{chapters}**{eol}{eol}</div>{eol}{eol}\
             <div align=\"center\">{eol}{eol}**{skills}**{eol}{eol}</div>{eol}{eol}\
             <div align=\"center\">{eol}{eol}*{copyright}*{eol}{eol}</div>"
        )
    }
}

fn render_row(links: &[NavLink]) -> String {
    links
        .iter()
        .map(NavLink::to_markdown)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Link to the Main page of another chapter: `../<dir>/Chapter_<NN>_Main.md`.
fn chapter_main_link(
    label: &str,
    target_index: usize,
    chapters: ChapterIndex<'_>,
) -> Option<NavLink> {
    let dir = chapters.dir(target_index)?;
    Some(NavLink {
        label: label.to_string(),
        chapter: Some(target_index),
        target: format!(
            "../{}/{}",
            dir,
            page_file_name(&chapter_number(target_index), SkillLevel::Main)
        ),
    })
}

pub fn prev_link(index: usize, chapters: ChapterIndex<'_>) -> Option<NavLink> {
    chapter_main_link(PREV_LABEL, chapters.prev(index)?, chapters)
}

pub fn next_link(index: usize, chapters: ChapterIndex<'_>) -> Option<NavLink> {
    chapter_main_link(NEXT_LABEL, chapters.next(index)?, chapters)
}

pub fn toc_link(config: &NavConfig) -> NavLink {
    NavLink {
        label: TOC_LABEL.to_string(),
        chapter: None,
        target: config.links.toc.clone(),
    }
}

/// Beginner, Advanced, Ninja and Main links within the same chapter directory.
pub fn skill_links(index: usize) -> Vec<NavLink> {
    let number = chapter_number(index);
    SkillLevel::ALL
        .iter()
        .map(|&level| NavLink {
            label: format!("{} {}", level.emoji(), level.as_str()),
            chapter: None,
            target: format!("./{}", page_file_name(&number, level)),
        })
        .collect()
}

/// Byte ranges of the first `limit` navigation blocks in `content`.
pub fn locate_blocks(content: &str, limit: usize) -> Vec<Range<usize>> {
    NAV_BLOCK
        .find_iter(content)
        .take(limit)
        .map(|m| m.range())
        .collect()
}

/// Canonical title banner for a page, e.g.
/// `# ⚙️ Chapter 3: Building Real Projects (Advanced Level) ⚙️`.
pub fn title_banner(
    index: usize,
    level: SkillLevel,
    chapters: ChapterIndex<'_>,
    config: &NavConfig,
) -> Option<String> {
    let dir = chapters.dir(index)?;
    let name = parse_chapter_dir(dir).display_title;
    let label = match level {
        SkillLevel::Main => config.banner.edition.clone(),
        other => format!("{} Level", other.as_str()),
    };
    let emoji = level.emoji();
    Some(format!(
        "# {emoji} Chapter {}: {name} ({label}) {emoji}",
        index + 1
    ))
}
