//! CLI output formatting for `fix` and `check` runs.
//!
//! # Chapter-First Display
//!
//! Output follows the book's structure, not the filesystem walk. Each chapter
//! gets a header line with its 1-based position, and each page is listed
//! beneath it with what happened to it. Details of a change are shown as
//! indented context lines.
//!
//! ```text
//! 001 Chapter_01_The_Vibe_Coding_Revolution (4 pages)
//!     fixed Chapter_01_Advanced.md
//!         Navigation blocks: 2
//!         Title: rewritten
//!     ok Chapter_01_Main.md
//! 002 Chapter_02_Getting_Started_with_Vibe_Coding (created, 0 pages)
//!
//! Fixed 1 of 2 pages
//! Created 1 chapter directory
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O, so they are
//! tested directly. `print_*` wrappers write the lines to stdout.

use crate::normalize::{DirStatus, FileOutcome, Mode, NormalizeEvent, RunSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Status word for a page: what was (or would be) done to it.
fn page_status(outcome: &FileOutcome) -> &'static str {
    match (outcome.changed, outcome.written) {
        (true, true) => "fixed",
        (true, false) => "would fix",
        (false, _) => "ok",
    }
}

/// Format one page result: status line plus change details.
fn page_lines(outcome: &FileOutcome) -> Vec<String> {
    let name = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.path.display().to_string());

    let mut lines = vec![format!("{}{} {}", indent(1), page_status(outcome), name)];
    if outcome.changed {
        if outcome.blocks_replaced > 0 {
            lines.push(format!(
                "{}Navigation blocks: {}",
                indent(2),
                outcome.blocks_replaced
            ));
        }
        if outcome.title_rewritten {
            lines.push(format!("{}Title: rewritten", indent(2)));
        }
        if outcome.refs_resolved > 0 {
            lines.push(format!(
                "{}References: {} resolved",
                indent(2),
                outcome.refs_resolved
            ));
        }
    }
    for reference in &outcome.unresolved_refs {
        lines.push(format!("{}Unresolved: {}", indent(2), reference));
    }
    lines
}

/// Format a single progress event as display lines.
pub fn format_event(event: &NormalizeEvent) -> Vec<String> {
    match event {
        NormalizeEvent::ChapterStarted {
            index,
            dir,
            status,
            file_count,
        } => {
            let pages = plural(*file_count, "page", "pages");
            let detail = match status {
                DirStatus::Existing => format!("({pages})"),
                DirStatus::Created => format!("(created, {pages})"),
                DirStatus::Missing => "(missing)".to_string(),
            };
            vec![format!("{} {} {}", format_index(index + 1), dir, detail)]
        }
        NormalizeEvent::FileNormalized(outcome) => page_lines(outcome),
    }
}

/// Print a progress event to stdout.
pub fn print_event(event: &NormalizeEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run totals.
pub fn format_summary(summary: &RunSummary, mode: Mode) -> Vec<String> {
    let total = summary.files.len();
    let changed = summary.changed_count();

    let mut lines = vec![String::new()];
    lines.push(match (mode, changed) {
        (_, 0) => format!("All {} canonical", plural(total, "page is", "pages are")),
        (Mode::Write, n) => format!("Fixed {} of {}", n, plural(total, "page", "pages")),
        (Mode::DryRun, n) => format!(
            "{} of {} need fixing",
            n,
            plural(total, "page", "pages")
        ),
    });
    if !summary.created_dirs.is_empty() {
        lines.push(format!(
            "Created {}",
            plural(
                summary.created_dirs.len(),
                "chapter directory",
                "chapter directories"
            )
        ));
    }
    if !summary.missing_dirs.is_empty() {
        lines.push(format!(
            "Missing {}",
            plural(
                summary.missing_dirs.len(),
                "chapter directory",
                "chapter directories"
            )
        ));
    }
    let unresolved = summary.unresolved_count();
    if unresolved > 0 {
        lines.push(format!(
            "{} left unresolved",
            plural(unresolved, "chapter reference", "chapter references")
        ));
    }
    lines
}

/// Print the end-of-run totals to stdout.
pub fn print_summary(summary: &RunSummary, mode: Mode) {
    for line in format_summary(summary, mode) {
        println!("{}", line);
    }
}
