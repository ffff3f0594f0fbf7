//! Shared test utilities for the chapter-nav test suite.
//!
//! Builds throwaway books in a temp directory: one directory per configured
//! chapter, each holding the four skill-level pages with stale navigation.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = four_chapter_config();
//! let book = setup_book(&config);
//! process_all(book.path(), &config, None).unwrap();
//! let page = read_page(book.path(), &config, 1, "Advanced");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::NavConfig;

/// Four real chapter names from the book, short enough to keep assertions readable.
pub fn four_chapter_config() -> NavConfig {
    NavConfig::with_chapters([
        "Chapter_01_The_Vibe_Coding_Revolution",
        "Chapter_02_Getting_Started_with_Vibe_Coding",
        "Chapter_03_Building_Real_Projects_with_AI_Assistance",
        "Chapter_04_AI_Powered_Backend_Development",
    ])
}

/// A navigation block in the old hand-written form, with stale targets.
pub fn stub_block() -> String {
    "<div align=\"center\">\n\n\
     **[⬅️ Previous Chapter](../Chapter_00/old.md) | [📚 Table of Contents](../index.md) | [➡️ Next Chapter](next.md)**\n\n\
     </div>\n\n\
     <div align=\"center\">\n\n\
     **[🔰 Beginner](./b.md) | [⚙️ Advanced](./a.md)**\n\n\
     </div>"
        .to_string()
}

/// A page with stale blocks at top and bottom and a title mentioning `level`.
pub fn stub_page(level: &str) -> String {
    let block = stub_block();
    format!("{block}\n\n# Chapter Title {level} #\n\nBody text.\n\n{block}\n")
}

/// Write all four skill-level pages for every configured chapter.
pub fn setup_book(config: &NavConfig) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (index, dir) in config.chapter_index().iter() {
        let chapter = tmp.path().join(dir);
        std::fs::create_dir_all(&chapter).unwrap();
        for level in ["Beginner", "Advanced", "Ninja", "Main"] {
            std::fs::write(
                chapter.join(format!("Chapter_{:02}_{level}.md", index + 1)),
                stub_page(level),
            )
            .unwrap();
        }
    }
    tmp
}

/// Read one page back from a book created by [`setup_book`].
pub fn read_page(root: &Path, config: &NavConfig, index: usize, level: &str) -> String {
    let path = root
        .join(&config.chapters[index])
        .join(format!("Chapter_{:02}_{level}.md", index + 1));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
