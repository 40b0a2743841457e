use super::{CommandKind, ParsedCommand};

fn usage(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Add => "add <NRIC>: add a new patient with the given NRIC/FIN",
        CommandKind::Delete => {
            "delete /patient <NRIC>: delete a patient (unload them first)\n\
             delete /record <date>: delete the loaded patient's record on that date"
        }
        CommandKind::List => "list: list all patients",
        CommandKind::Load => "load <NRIC>: load a patient so records can be added or viewed",
        CommandKind::Unload => "unload: unload the current patient",
        CommandKind::Record => {
            "record [date] /symptom <text> /diagnosis <text> /prescription <text>: \
             add or update the loaded patient's record (date defaults to today; \
             /s, /d and /p also work)"
        }
        CommandKind::Retrieve => "retrieve [date]: show the loaded patient's records",
        CommandKind::Current => "current: show the ID of the loaded patient",
        CommandKind::Help => "help [command...]: show usage for all or the given commands",
        CommandKind::Exit => "exit: leave the program",
    }
}

/// Usage for every command, or only for those named in the payload.
pub fn help(command: &ParsedCommand) -> String {
    let requested: Vec<String> = command
        .payload()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    if requested.is_empty() {
        return CommandKind::ALL
            .iter()
            .map(|k| usage(*k))
            .collect::<Vec<_>>()
            .join("\n");
    }

    requested
        .iter()
        .map(|name| match name.parse::<CommandKind>() {
            Ok(kind) => usage(kind).to_string(),
            Err(_) => format!("There is no command called \"{name}\"."),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
