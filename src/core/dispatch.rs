// src/core/dispatch.rs

//! Maps free-text command phrases to scanner invocations.

use strum::Display;
use thiserror::Error;

/// Scanner selected by a command phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Tool {
    #[strum(to_string = "directory")]
    Directory,
    #[strum(to_string = "subdomain")]
    Subdomain,
    #[strum(to_string = "network")]
    Network,
    #[strum(to_string = "nslookup")]
    Lookup,
}

impl Tool {
    pub fn needs_target(self) -> bool {
        !matches!(self, Self::Network)
    }
}

/// Keywords in priority order. The first one found anywhere in the phrase
/// wins, so specific words sit ahead of generic ones like "scan".
pub const KEYWORDS: &[(&str, Tool)] = &[
    ("subdomains", Tool::Subdomain),
    ("subdomain", Tool::Subdomain),
    ("directory", Tool::Directory),
    ("dir", Tool::Directory),
    ("nslookup", Tool::Lookup),
    ("whois", Tool::Lookup),
    ("dns", Tool::Lookup),
    ("network", Tool::Network),
    ("scan", Tool::Network),
];

pub const HELP: &str = "Available commands:\n\
- directory <url>\n\
- subdomain <domain>\n\
- network scan\n\
- nslookup <domain>\n\
- whois <domain>\n\
- dns <domain>";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Please enter a command.")]
    Empty,
    #[error("Unknown command.\n\n{help}", help = HELP)]
    Unknown,
    #[error("The {0} command needs a target.\n\n{help}", help = HELP)]
    MissingTarget(Tool),
}

/// A parsed command phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub keyword: &'static str,
    pub tool: Tool,
    pub target: Option<String>,
}

pub fn parse(phrase: &str) -> Result<Command, DispatchError> {
    let message = phrase.trim().to_lowercase();
    if message.is_empty() {
        return Err(DispatchError::Empty);
    }

    let (keyword, tool) = KEYWORDS
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .copied()
        .ok_or(DispatchError::Unknown)?;

    let target = if tool.needs_target() { extract_target(&message) } else { None };
    if tool.needs_target() && target.is_none() {
        return Err(DispatchError::MissingTarget(tool));
    }

    Ok(Command { keyword, tool, target })
}

/// First word that looks like a host: contains a dot or is all digits.
fn extract_target(message: &str) -> Option<String> {
    message
        .split_whitespace()
        .find(|word| word.contains('.') || word.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
}
