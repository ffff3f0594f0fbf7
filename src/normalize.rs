//! Link normalization over a chapter-per-directory markdown book.
//!
//! For every chapter directory in the configured order, each page matching
//! `file_pattern` is rewritten so that:
//!
//! - `⬅️ Previous Chapter` / `➡️ Next Chapter` links point at the neighbouring
//!   chapter's Main page,
//! - `📚 Table of Contents` links point at the configured index,
//! - the first two navigation blocks are replaced by the canonical block,
//! - `../Chapter_NN_*` placeholders resolve to the real directory name,
//! - the leading `#` title becomes the canonical banner for the page's level.
//!
//! ## Processing Model
//!
//! Files are handled one at a time: read, transform, write, then the next.
//! There is no rollback. An I/O failure aborts the run and leaves files that
//! were already written in their new state.
//!
//! The text transform ([`normalize_text`]) is pure so that tests can exercise
//! it without touching the filesystem. [`normalize`] wraps it with file I/O,
//! and [`process_all`] / [`check`] drive it across the whole book.
//!
//! Pattern misses are not errors: a page without a navigation block or with
//! an unrecognized title keeps that fragment as it was.

use crate::config::{ConfigError, NavConfig};
use crate::nav::{self, NavBlock};
use crate::naming;
use crate::types::{ChapterIndex, SkillLevel};
use log::{debug, warn};
use regex::{Captures, NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// How many navigation blocks per page are rewritten (top and bottom).
pub const MAX_NAV_BLOCKS: usize = 2;

static PREV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[⬅\x{FE0F}?\s*Previous\s*Chapter\]\([^)]*\)")
        .unwrap_or_else(|e| panic!("previous-link pattern is invalid: {e}"))
});

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[➡\x{FE0F}?\s*Next\s*Chapter\]\([^)]*\)")
        .unwrap_or_else(|e| panic!("next-link pattern is invalid: {e}"))
});

static TOC_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[📚\s*Table\s*of\s*Contents\]\([^)]*\)")
        .unwrap_or_else(|e| panic!("toc-link pattern is invalid: {e}"))
});

static WILDCARD_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\./Chapter_(\d+)_\*")
        .unwrap_or_else(|e| panic!("wildcard pattern is invalid: {e}"))
});

static LEADING_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#[ \t]+[^\r\n]*")
        .unwrap_or_else(|e| panic!("title pattern is invalid: {e}"))
});

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list chapter directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create chapter directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Chapter index {index} is outside the configured list of {len} chapters")]
    ChapterOutOfRange { index: usize, len: usize },
}

/// Whether normalized text is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite changed files and create missing chapter directories.
    Write,
    /// Report what would change; touch nothing.
    DryRun,
}

/// Result of the pure text transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub level: Option<SkillLevel>,
    pub blocks_replaced: usize,
    pub title_rewritten: bool,
    pub refs_resolved: usize,
    /// Wildcard references whose chapter number is not in the configured list.
    pub unresolved_refs: Vec<String>,
}

/// Per-file result reported to the caller and the progress stream.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub chapter: usize,
    pub level: Option<SkillLevel>,
    /// Normalized text differs from what was on disk.
    pub changed: bool,
    /// The file was rewritten (only in [`Mode::Write`] and only when changed).
    pub written: bool,
    pub blocks_replaced: usize,
    pub title_rewritten: bool,
    pub refs_resolved: usize,
    pub unresolved_refs: Vec<String>,
}

/// State of a chapter directory when the run reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Existing,
    Created,
    /// Absent and left absent (dry run).
    Missing,
}

/// Progress events, sent in processing order.
#[derive(Debug, Clone)]
pub enum NormalizeEvent {
    ChapterStarted {
        index: usize,
        dir: String,
        status: DirStatus,
        file_count: usize,
    },
    FileNormalized(FileOutcome),
}

/// Aggregate result of a whole-book run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files: Vec<FileOutcome>,
    pub created_dirs: Vec<PathBuf>,
    pub missing_dirs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.files.iter().map(|f| f.unresolved_refs.len()).sum()
    }

    /// True when every page is already canonical.
    pub fn is_clean(&self) -> bool {
        self.changed_count() == 0
    }
}

/// Transform one page's text into its canonical form.
///
/// `file_name` is the page's base name (used for the skill level) and
/// `index` its 0-based chapter position.
pub fn normalize_text(
    content: &str,
    file_name: &str,
    index: usize,
    config: &NavConfig,
) -> Result<Normalized, NormalizeError> {
    let chapters = config.chapter_index();
    if index >= chapters.len() {
        return Err(NormalizeError::ChapterOutOfRange {
            index,
            len: chapters.len(),
        });
    }
    let level = naming::parse_skill_level(file_name);

    let mut text = content.to_string();

    if let Some(link) = nav::prev_link(index, chapters) {
        text = PREV_LINK
            .replace_all(&text, NoExpand(&link.to_markdown()))
            .into_owned();
    }
    if let Some(link) = nav::next_link(index, chapters) {
        text = NEXT_LINK
            .replace_all(&text, NoExpand(&link.to_markdown()))
            .into_owned();
    }
    text = TOC_LINK
        .replace_all(&text, NoExpand(&nav::toc_link(config).to_markdown()))
        .into_owned();

    let (text, blocks_replaced) = replace_nav_blocks(&text, index, chapters, config);
    if blocks_replaced == 0 {
        debug!("{file_name}: no navigation block found");
    }

    let (mut text, resolved, unresolved_refs) = resolve_wildcards(&text, chapters);
    for reference in &unresolved_refs {
        warn!(
            "{file_name}: {reference} does not name one of the {} configured chapters",
            chapters.len()
        );
    }

    let mut title_rewritten = false;
    match level {
        Some(level) => {
            if let Some(rewritten) = rewrite_title(&text, index, level, chapters, config) {
                text = rewritten;
                title_rewritten = true;
            } else {
                debug!("{file_name}: no {level} title heading found");
            }
        }
        None => debug!(
            "{file_name}: '{}' is not a skill level, title left as-is",
            naming::level_token(file_name)
        ),
    }

    Ok(Normalized {
        text,
        level,
        blocks_replaced,
        title_rewritten,
        refs_resolved: resolved,
        unresolved_refs,
    })
}

/// Replace up to [`MAX_NAV_BLOCKS`] recognized blocks with the canonical one.
///
/// A block that used CRLF line endings is replaced by a CRLF rendering.
fn replace_nav_blocks(
    text: &str,
    index: usize,
    chapters: ChapterIndex<'_>,
    config: &NavConfig,
) -> (String, usize) {
    let ranges = nav::locate_blocks(text, MAX_NAV_BLOCKS);
    if ranges.is_empty() {
        return (text.to_string(), 0);
    }
    let block = NavBlock::for_chapter(index, chapters, config);
    let canonical = block.render();

    let mut out = String::with_capacity(text.len() + canonical.len());
    let mut last = 0;
    for range in &ranges {
        out.push_str(&text[last..range.start]);
        if text[range.clone()].contains("\r\n") {
            out.push_str(&block.render_with_line_ending("\r\n"));
        } else {
            out.push_str(&canonical);
        }
        last = range.end;
    }
    out.push_str(&text[last..]);
    (out, ranges.len())
}

/// Rewrite `../Chapter_<n>_*` to `../<dir of chapter n>`.
///
/// Numbers outside the configured list are left in place and returned.
fn resolve_wildcards(text: &str, chapters: ChapterIndex<'_>) -> (String, usize, Vec<String>) {
    let mut resolved = 0;
    let mut unresolved = Vec::new();
    let out = WILDCARD_REF.replace_all(text, |caps: &Captures<'_>| {
        let dir = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| chapters.dir_for_number(n));
        match dir {
            Some(dir) => {
                resolved += 1;
                format!("../{dir}")
            }
            None => {
                unresolved.push(caps[0].to_string());
                caps[0].to_string()
            }
        }
    });
    (out.into_owned(), resolved, unresolved)
}

/// Replace the leading `#` heading if it mentions the level's keyword.
///
/// Returns `None` when there is no level-1 heading or it belongs to
/// something else.
fn rewrite_title(
    text: &str,
    index: usize,
    level: SkillLevel,
    chapters: ChapterIndex<'_>,
    config: &NavConfig,
) -> Option<String> {
    let heading = LEADING_TITLE.find(text)?;
    let keyword = level.title_keyword().to_lowercase();
    if !heading.as_str().to_lowercase().contains(&keyword) {
        return None;
    }
    let banner = nav::title_banner(index, level, chapters, config)?;
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..heading.start()]);
    out.push_str(&banner);
    out.push_str(&text[heading.end()..]);
    Some(out)
}

/// Normalize one file on disk.
///
/// In [`Mode::Write`] the file is overwritten only if its content changed.
pub fn normalize(
    path: &Path,
    index: usize,
    config: &NavConfig,
    mode: Mode,
) -> Result<FileOutcome, NormalizeError> {
    let content = fs::read_to_string(path).map_err(|source| NormalizeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let normalized = normalize_text(&content, &file_name, index, config)?;
    let changed = normalized.text != content;

    let written = changed && mode == Mode::Write;
    if written {
        fs::write(path, &normalized.text).map_err(|source| NormalizeError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        chapter: index,
        level: normalized.level,
        changed,
        written,
        blocks_replaced: normalized.blocks_replaced,
        title_rewritten: normalized.title_rewritten,
        refs_resolved: normalized.refs_resolved,
        unresolved_refs: normalized.unresolved_refs,
    })
}

/// Normalize every page of every configured chapter under `root`, in place.
///
/// Missing chapter directories are created.
pub fn process_all(
    root: &Path,
    config: &NavConfig,
    progress: Option<Sender<NormalizeEvent>>,
) -> Result<RunSummary, NormalizeError> {
    run(root, config, Mode::Write, progress)
}

/// Same traversal as [`process_all`] without writing or creating anything.
pub fn check(
    root: &Path,
    config: &NavConfig,
    progress: Option<Sender<NormalizeEvent>>,
) -> Result<RunSummary, NormalizeError> {
    run(root, config, Mode::DryRun, progress)
}

fn run(
    root: &Path,
    config: &NavConfig,
    mode: Mode,
    progress: Option<Sender<NormalizeEvent>>,
) -> Result<RunSummary, NormalizeError> {
    config.validate()?;
    let matcher = config.file_matcher()?;
    let mut summary = RunSummary::default();

    for (index, dir) in config.chapter_index().iter() {
        let chapter_path = root.join(dir);
        if let Some(number) = naming::misnumbered_prefix(dir, index) {
            warn!(
                "{dir}: directory is numbered {number} but is chapter {} by position",
                index + 1
            );
        }

        let status = if chapter_path.is_dir() {
            DirStatus::Existing
        } else if mode == Mode::Write {
            fs::create_dir_all(&chapter_path).map_err(|source| NormalizeError::CreateDir {
                path: chapter_path.clone(),
                source,
            })?;
            summary.created_dirs.push(chapter_path.clone());
            DirStatus::Created
        } else {
            summary.missing_dirs.push(chapter_path.clone());
            DirStatus::Missing
        };

        let pages = if status == DirStatus::Missing {
            Vec::new()
        } else {
            collect_pages(&chapter_path, &matcher)?
        };

        send(
            &progress,
            NormalizeEvent::ChapterStarted {
                index,
                dir: dir.to_string(),
                status,
                file_count: pages.len(),
            },
        );

        for page in pages {
            let outcome = normalize(&page, index, config, mode)?;
            send(&progress, NormalizeEvent::FileNormalized(outcome.clone()));
            summary.files.push(outcome);
        }
    }

    Ok(summary)
}

/// Files directly inside `dir` whose name matches the glob, sorted by name.
fn collect_pages(dir: &Path, matcher: &glob::Pattern) -> Result<Vec<PathBuf>, NormalizeError> {
    let entries = fs::read_dir(dir).map_err(|source| NormalizeError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut pages: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| matcher.matches(&n.to_string_lossy()))
                    .unwrap_or(false)
        })
        .collect();
    pages.sort();
    Ok(pages)
}

fn send(progress: &Option<Sender<NormalizeEvent>>, event: NormalizeEvent) {
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}
