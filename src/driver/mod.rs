//! Driver Module
//!
//! Sequences the session: collects commands from argv, stdin, and script
//! files, runs them in batch with inter-command delays, and hands off to the
//! interactive prompt when asked.

mod commands;
mod interactive;

pub use commands::{collect_commands, collect_from_sources, read_script_file};
pub use interactive::interactive_loop;

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::network::Session;

/// Behavior knobs the driver needs, resolved by the binary from
/// INI + environment + flags
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Sleep between successive commands in batch mode (not after the last)
    pub command_delay: Duration,

    /// Prompt shown in interactive mode and echoed before each batch command
    pub prompt: String,

    /// Suppress the prompt and the batch command echo
    pub no_prompt: bool,

    /// Suppress informational output
    pub quiet: bool,

    /// In interactive mode, a blank line ends the loop instead of being
    /// skipped
    pub exit_on_blank: bool,
}

/// Drives one session through a list of commands
pub struct Driver {
    session: Session,
    options: DriverOptions,
}

impl Driver {
    pub fn new(session: Session, options: DriverOptions) -> Self {
        Self { session, options }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run every command in order, rendering each response to `out` with a
    /// trailing newline, sleeping `command_delay` between commands.
    pub fn run_batch<W: Write>(&mut self, commands: &[String], out: &mut W) -> Result<()> {
        for (i, command) in commands.iter().enumerate() {
            if !self.options.quiet && !self.options.no_prompt {
                writeln!(out, "{}{}", self.options.prompt, command)?;
            }

            self.session.run_command(command, out)?;
            writeln!(out)?;

            if i + 1 < commands.len() && !self.options.command_delay.is_zero() {
                thread::sleep(self.options.command_delay);
            }
        }
        Ok(())
    }

    /// Enter the interactive prompt loop
    pub fn run_interactive(&mut self) -> Result<()> {
        interactive::interactive_loop(&mut self.session, &self.options)
    }
}
