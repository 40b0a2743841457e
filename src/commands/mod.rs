//! Console commands: parsing, dispatch and the handlers themselves.
//!
//! Every handler takes the parsed command and the application state and
//! returns the text to show. Handlers that change patient data save the
//! whole registry before returning.

pub mod help;
pub mod parser;
pub mod patient;
pub mod record;

pub use parser::{parse, ParsedCommand, PAYLOAD_KEY};

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::core_state::CoreState;
use crate::db::StorageError;
use crate::models::InvalidFormat;
use crate::registry::RegistryError;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(CommandError::UnknownCommand(s.into())),
                }
            }
        }
    };
}

str_enum!(CommandKind {
    Add => "add",
    Delete => "delete",
    List => "list",
    Load => "load",
    Unload => "unload",
    Record => "record",
    Retrieve => "retrieve",
    Current => "current",
    Help => "help",
    Exit => "exit",
});

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Empty input, please enter a command")]
    EmptyInput,

    #[error("Unknown command \"{0}\", type \"help\" to list all commands")]
    UnknownCommand(String),

    #[error("Please give at least one of /symptom, /diagnosis or /prescription")]
    EmptyDescription,

    #[error("Please specify what to delete with /patient <NRIC> or /record <date>")]
    UnknownDeleteArgument,

    #[error("Invalid date \"{0}\", please use YYYY-MM-DD, DD-MM-YYYY or DD/MM/YYYY")]
    InvalidDate(String),

    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormat),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Change kept in memory but could not be saved: {0}")]
    Storage(#[from] StorageError),
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Message(String),
    Exit,
}

/// Parse and run one input line.
pub fn run_line(state: &mut CoreState, line: &str) -> Result<CommandOutput, CommandError> {
    let command = parse(line)?;
    execute(state, &command)
}

pub fn execute(state: &mut CoreState, command: &ParsedCommand) -> Result<CommandOutput, CommandError> {
    let message = match command.kind {
        CommandKind::Add => patient::add(state, command)?,
        CommandKind::Delete => patient::delete(state, command)?,
        CommandKind::List => patient::list(state),
        CommandKind::Load => patient::load(state, command)?,
        CommandKind::Unload => patient::unload(state),
        CommandKind::Current => patient::current(state)?,
        CommandKind::Record => record::record(state, command)?,
        CommandKind::Retrieve => record::retrieve(state, command)?,
        CommandKind::Help => help::help(command),
        CommandKind::Exit => return Ok(CommandOutput::Exit),
    };
    Ok(CommandOutput::Message(message))
}

/// Parse a visit date in any of the accepted layouts.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| CommandError::InvalidDate(raw.to_string()))
}

/// Like `parse_date`, but an empty string means today.
pub fn parse_date_or_today(raw: &str) -> Result<NaiveDate, CommandError> {
    if raw.trim().is_empty() {
        Ok(Local::now().date_naive())
    } else {
        parse_date(raw)
    }
}
