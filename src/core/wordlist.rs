// src/core/wordlist.rs

//! Newline-delimited wordlists for the brute-force enumerators.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static BUNDLED_SUBDOMAINS: &str = include_str!("../../wordlists/subdomains.txt");
static BUNDLED_DIRECTORIES: &str = include_str!("../../wordlists/directories.txt");

/// Where an enumerator takes its candidates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordlistSource {
    /// The list compiled into the binary.
    BundledSubdomains,
    BundledDirectories,
    /// A user-supplied file. A missing file loads as an empty list.
    File(PathBuf),
    /// Entries already in memory, still subject to the same filtering.
    Inline(Vec<String>),
}

impl WordlistSource {
    pub fn subdomains(path: Option<PathBuf>) -> Self {
        path.map_or(Self::BundledSubdomains, Self::File)
    }

    pub fn directories(path: Option<PathBuf>) -> Self {
        path.map_or(Self::BundledDirectories, Self::File)
    }

    /// Loads raw entries: comment and blank lines removed, whitespace trimmed.
    pub fn load(&self) -> Vec<String> {
        match self {
            Self::BundledSubdomains => parse(BUNDLED_SUBDOMAINS),
            Self::BundledDirectories => parse(BUNDLED_DIRECTORIES),
            Self::File(path) => load_file(path),
            Self::Inline(entries) => parse(&entries.join("\n")),
        }
    }
}

fn load_file(path: &Path) -> Vec<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            // Invalid UTF-8 is dropped rather than rejected.
            let text: String = String::from_utf8_lossy(&bytes)
                .chars()
                .filter(|c| *c != char::REPLACEMENT_CHARACTER)
                .collect();
            let entries = parse(&text);
            debug!(path = %path.display(), entries = entries.len(), "Wordlist loaded.");
            entries
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Wordlist could not be read.");
            Vec::new()
        }
    }
}

/// Filters a wordlist body. A line is a comment only when `#` is its very first
/// character.
pub fn parse(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Forces a path entry to start with exactly one `/`.
pub fn as_path_segment(entry: &str) -> String {
    format!("/{}", entry.trim().trim_start_matches('/'))
}
