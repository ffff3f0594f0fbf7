use chapter_nav::normalize::{self, Mode, NormalizeError, NormalizeEvent, RunSummary};
use chapter_nav::{config, output};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Parser)]
#[command(name = "chapter-nav")]
#[command(about = "Normalize chapter navigation across a markdown book")]
#[command(long_about = "\
Normalize chapter navigation across a markdown book

The chapter list in chapter-nav.toml is the source of truth. Position in the
list is the chapter number; every page is rewritten to match it.

Book structure:

  book/
  ├── chapter-nav.toml                      # Optional, overrides stock defaults
  ├── README.md                             # Table of contents
  ├── Chapter_01_The_Vibe_Coding_Revolution/
  │   ├── Chapter_01_Main.md                # Title: (2025 Edition)
  │   ├── Chapter_01_Beginner.md            # Title: (Beginner Level)
  │   ├── Chapter_01_Advanced.md
  │   └── Chapter_01_Ninja.md
  └── Chapter_02_Getting_Started_with_Vibe_Coding/
      └── ...

Per page:
  Links:   ⬅️ Previous / 📚 Table of Contents / ➡️ Next retargeted
  Blocks:  first two centered navigation blocks regenerated
  Refs:    ../Chapter_05_* → ../Chapter_05_Full_Stack_Development_with_AI
  Title:   leading # heading → canonical banner for the page's skill level

Run 'chapter-nav gen-config' to generate a documented chapter-nav.toml.")]
#[command(version)]
struct Cli {
    /// Book root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable debug logging (pattern misses, skipped titles)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite navigation, titles and chapter references in place
    Fix,
    /// Report pages that are not canonical without changing them
    Check,
    /// Print a stock chapter-nav.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Command::Fix => {
            let nav_config = config::load_config(&cli.root)?;
            debug!(
                "{} chapters configured under {}",
                nav_config.chapters.len(),
                cli.root.display()
            );
            println!("==> Fixing {}", cli.root.display());
            let summary =
                run_with_progress(|tx| normalize::process_all(&cli.root, &nav_config, Some(tx)))?;
            output::print_summary(&summary, Mode::Write);
        }
        Command::Check => {
            let nav_config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let summary =
                run_with_progress(|tx| normalize::check(&cli.root, &nav_config, Some(tx)))?;
            output::print_summary(&summary, Mode::DryRun);
            if !summary.is_clean() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run a normalizer pass while a printer thread streams its progress events.
fn run_with_progress<F>(pass: F) -> Result<RunSummary, Box<dyn std::error::Error>>
where
    F: FnOnce(Sender<NormalizeEvent>) -> Result<RunSummary, NormalizeError>,
{
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let result = pass(tx);
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    Ok(result?)
}
