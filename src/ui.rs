//! Line-oriented console. Generic over reader and writer so tests can script it.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

pub const WELCOME_MESSAGE: &str = "Welcome to Patient Manager!";
pub const INPUT_PROMPT: &str = "Enter a command (type \"help\" to list all commands):";
pub const EXIT_MESSAGE: &str = "Goodbye!";
pub const LONG_LINE: &str =
    "________________________________________________________________________________";

pub struct Ui<R, W> {
    input: R,
    output: W,
}

impl Ui<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Ui<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next input line without its line ending. `None` at end of input.
    pub fn read_input(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn print_message(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()
    }

    pub fn print_welcome(&mut self, data_location: &str) -> io::Result<()> {
        self.print_message(WELCOME_MESSAGE)?;
        self.print_message(&format!("Data file: {data_location}"))?;
        self.print_message(INPUT_PROMPT)
    }

    pub fn print_error(&mut self, error: &dyn std::error::Error) -> io::Result<()> {
        self.print_message(&format!("Error: {error}"))
    }

    /// Separates one command's output from the next input.
    pub fn print_line(&mut self) -> io::Result<()> {
        self.print_message(LONG_LINE)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
