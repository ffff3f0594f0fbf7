//! # chapter-nav
//!
//! Keeps the navigation of a chapter-per-directory markdown book consistent.
//! The configured chapter list is the only source of truth: a page's position
//! in it decides its previous/next links, its skill-level cross-links, its
//! title banner and how `../Chapter_NN_*` placeholders resolve.
//!
//! ```text
//! chapter-nav.toml ─> NavConfig ─> process_all(root) ─> normalize(page, i) ─> page rewritten
//!                                        │
//!                                        └─> NormalizeEvent ─> output ─> stdout
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `chapter-nav.toml` loading, stock defaults, merging, validation |
//! | [`naming`] | `Chapter_NN_Name` directory parser and skill-level file-name parser |
//! | [`types`] | Shared value types (`SkillLevel`, `NavLink`, `ChapterIndex`) |
//! | [`nav`] | Canonical navigation block and title banner; existing-block recognizer |
//! | [`normalize`] | Per-page text transform, in-place rewrite, whole-book `fix`/`check` runs |
//! | [`output`] | CLI output formatting for progress events and run summaries |
//!
//! # Design Decisions
//!
//! ## Position Is the Chapter Number
//!
//! Chapters are numbered by their index in `chapters`, not by the digits in
//! their directory names. Reordering the list renumbers the book on the next
//! run; a directory name that disagrees with its position is still linked by
//! position, with a warning.
//!
//! ## Pattern-Match-or-Skip
//!
//! Pages are hand-edited markdown. Anything the normalizer does not recognize
//! (a page without a navigation block, a title that mentions no skill level)
//! is left exactly as it was. Only I/O failures stop a run.
//!
//! ## Fixed Point
//!
//! The canonical output is itself recognized by every pattern it replaces, so
//! a second run over a normalized book changes nothing. `check` relies on this
//! to report pending changes.

pub mod config;
pub mod nav;
pub mod naming;
pub mod normalize;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
