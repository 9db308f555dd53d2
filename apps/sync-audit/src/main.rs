//! Front-end sync audit.
//!
//! Walks the front-end sources and reports code that behaves differently
//! inside the desktop shell: full-page redirects, popups, manual downloads
//! and media access.

mod report;
mod rules;
mod walk;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rules::{Finding, Scanner};

#[derive(Debug, Parser)]
#[command(name = "infinity-sync-audit", version, about)]
struct Cli {
    /// Front-end source directory to scan.
    #[arg(long, default_value = "../infinity-frontend/src")]
    frontend_src: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scanner = Scanner::new()?;

    println!("\nInfinity Desktop / Frontend Sync Audit\n");
    println!("Scanning: {}\n", cli.frontend_src.display());

    let files = walk::source_files(&cli.frontend_src);
    println!("Found {} source files\n", files.len());

    let findings = audit(&scanner, &cli.frontend_src, &files);
    print!("{}", report::render(&findings));

    Ok(if report::has_warnings(&findings) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Scans `files`, reporting paths relative to `root`. Unreadable files are
/// skipped.
fn audit(scanner: &Scanner, root: &Path, files: &[PathBuf]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for file in files {
        let content = match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %file.display(), "skipping unreadable file: {e}");
                continue;
            }
        };
        let rel = file.strip_prefix(root).unwrap_or(file);
        findings.extend(scanner.scan(&rel.to_string_lossy(), &content));
    }
    findings
}
