//! Splits an input line into a command word, a payload and `/key value` pairs.
//!
//! `record 2024-01-01 /symptom dry cough /diagnosis flu` parses to command
//! `record`, payload `2024-01-01`, and arguments `symptom = "dry cough"`,
//! `diagnosis = "flu"`. Whitespace runs collapse to a single space.

use std::collections::HashMap;

use super::{CommandError, CommandKind};

/// Reserved argument key holding the text between the command word and the first `/key`.
pub const PAYLOAD_KEY: &str = "payload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub arguments: HashMap<String, String>,
}

impl ParsedCommand {
    /// The payload text; empty when none was given.
    pub fn payload(&self) -> &str {
        self.arguments.get(PAYLOAD_KEY).map(String::as_str).unwrap_or("")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

pub fn parse(line: &str) -> Result<ParsedCommand, CommandError> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or(CommandError::EmptyInput)?;
    let kind: CommandKind = command.to_lowercase().parse()?;

    let mut arguments = HashMap::new();
    let mut key = PAYLOAD_KEY.to_string();
    let mut value: Vec<&str> = Vec::new();

    for word in words {
        match word.strip_prefix('/') {
            Some(name) if !name.is_empty() => {
                arguments.insert(std::mem::take(&mut key), value.join(" "));
                value.clear();
                key = name.to_lowercase();
            }
            _ => value.push(word),
        }
    }
    arguments.insert(key, value.join(" "));
    // The payload key is always present, even when a `/key` came first.
    arguments.entry(PAYLOAD_KEY.to_string()).or_default();

    tracing::debug!(command = kind.as_str(), args = arguments.len(), "Parsed command");
    Ok(ParsedCommand { kind, arguments })
}
