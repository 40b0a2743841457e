pub mod commands;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod registry;
pub mod ui;

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::commands::CommandOutput;
use crate::core_state::CoreState;
use crate::db::StorageError;
use crate::ui::Ui;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not open patient data: {0}")]
    Storage(#[from] StorageError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub fn run() -> Result<(), AppError> {
    // Logs go to stderr so they never interleave with console output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let path = config::data_file();
    let storage = db::open_storage(&path)?;
    let mut state = CoreState::load(storage)?;

    let mut ui = Ui::stdio();
    run_console(&mut state, &mut ui)?;

    tracing::info!("{} exiting", config::APP_NAME);
    Ok(())
}

/// Read-eval-print loop. Command errors are shown and the loop carries on;
/// only `exit`, end of input or a console I/O failure ends it.
pub fn run_console<R: BufRead, W: Write>(
    state: &mut CoreState,
    ui: &mut Ui<R, W>,
) -> io::Result<()> {
    ui.print_welcome(&state.storage_location())?;

    while let Some(line) = ui.read_input()? {
        match commands::run_line(state, &line) {
            Ok(CommandOutput::Message(message)) => ui.print_message(&message)?,
            Ok(CommandOutput::Exit) => break,
            Err(e) => {
                tracing::debug!(error = %e, input = %line, "Command failed");
                ui.print_error(&e)?;
            }
        }
        ui.print_line()?;
    }

    ui.print_message(ui::EXIT_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JsonFileStorage;
    use crate::models::Nric;
    use std::io::Cursor;

    fn session(state: &mut CoreState, script: &str) -> String {
        let mut ui = Ui::new(Cursor::new(script.to_string()), Vec::new());
        run_console(state, &mut ui).unwrap();
        String::from_utf8(ui.into_output()).unwrap()
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut state =
            CoreState::load(Box::new(JsonFileStorage::new(dir.path().join("p.json")))).unwrap();

        let out = session(
            &mut state,
            "\nfly away\nadd S1234567A\nadd S1234567D\nrecord /s cough\nexit\nadd T1234567J\n",
        );

        assert!(out.contains("Error: Empty input"));
        assert!(out.contains("Error: Unknown command \"fly\""));
        assert!(out.contains("Error: Invalid NRIC/FIN: S1234567A"));
        assert!(out.contains("Patient S1234567D has been added!"));
        assert!(out.contains("Error: No patient loaded"));
        assert!(out.trim_end().ends_with(ui::EXIT_MESSAGE));

        // Nothing after `exit` runs.
        assert!(!state.registry().contains(&Nric::parse("T1234567J").unwrap()));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        let mut state = CoreState::load(Box::new(JsonFileStorage::new(&path))).unwrap();

        let out = session(&mut state, "add S1234567D\nload S1234567D");
        assert!(out.contains("loaded"));
        assert!(out.trim_end().ends_with(ui::EXIT_MESSAGE));

        // A fresh process sees the saved patient but no selection.
        let mut reopened = CoreState::load(Box::new(JsonFileStorage::new(&path))).unwrap();
        let out = session(&mut reopened, "list\ncurrent\n");
        assert!(out.contains("1. S1234567D"));
        assert!(out.contains("Error: No patient loaded"));
    }
}
