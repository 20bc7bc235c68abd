//! Interactive mode
//!
//! A readline-based prompt loop: each line is sent to the server as a
//! command and the response printed. Ctrl-C clears the line, Ctrl-D exits.

use std::io::Write;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::{RconError, Result};
use crate::network::Session;

use super::DriverOptions;

/// Run the interactive prompt loop until EOF (or a blank line, when the
/// exit-on-blank policy is set).
pub fn interactive_loop(session: &mut Session, options: &DriverOptions) -> Result<()> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| RconError::Io(std::io::Error::other(format!("line editor: {}", e))))?;

    let prompt = if options.no_prompt {
        String::new()
    } else {
        options.prompt.clone()
    };

    if !options.quiet {
        eprintln!("Use Ctrl-D to exit.");
    }

    let stdout = std::io::stdout();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    if options.exit_on_blank {
                        break;
                    }
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let mut out = stdout.lock();
                session.run_command(line, &mut out)?;
                writeln!(out)?;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: drop the current line, keep the session
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(RconError::Io(std::io::Error::other(format!(
                    "line editor: {}",
                    e
                ))));
            }
        }
    }

    Ok(())
}
