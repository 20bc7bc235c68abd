//! Command list collection
//!
//! Builds the ordered list of commands to send: positional arguments first,
//! then piped stdin, then script files in the order given. Positionals are
//! taken verbatim; stdin and script lines are whitespace-trimmed with blank
//! lines and `#`/`;` comment lines dropped.

use std::env;
use std::fs;
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use crate::error::{RconError, Result};

/// Strip a line down to its command content. Returns `None` for blank lines
/// and comments.
fn strip_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        None
    } else {
        Some(line)
    }
}

/// Resolve a script filename, falling back to a `PATH` search (with a `.txt`
/// extension fallback) when the literal path does not exist.
fn resolve_script_path(filename: &str) -> Option<PathBuf> {
    let literal = Path::new(filename);
    if literal.exists() {
        return Some(literal.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        let with_ext = dir.join(format!("{}.txt", filename));
        if with_ext.exists() {
            return Some(with_ext);
        }
    }
    None
}

/// Read one script file into a list of commands
pub fn read_script_file(filename: &str) -> Result<Vec<String>> {
    let path = resolve_script_path(filename).ok_or_else(|| RconError::File {
        path: filename.to_string(),
        message: "file not found (also searched PATH)".to_string(),
    })?;

    let text = fs::read_to_string(&path).map_err(|e| RconError::File {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(text
        .lines()
        .filter_map(strip_line)
        .map(str::to_string)
        .collect())
}

/// Build the full ordered command list.
///
/// Order: positional arguments (verbatim, order preserved), then piped stdin
/// (only when stdin is not a terminal), then each script file in the order
/// given on the command line.
pub fn collect_commands(positionals: &[String], script_files: &[String]) -> Result<Vec<String>> {
    let mut commands: Vec<String> = positionals.to_vec();

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        for line in stdin.lock().lines() {
            let line = line?;
            if let Some(cmd) = strip_line(&line) {
                commands.push(cmd.to_string());
            }
        }
    }

    for file in script_files {
        let script_commands = read_script_file(file)?;
        if script_commands.is_empty() {
            tracing::warn!(file = %file, "no commands read from script file");
        } else {
            tracing::info!(
                file = %file,
                count = script_commands.len(),
                "read commands from script file"
            );
        }
        commands.extend(script_commands);
    }

    Ok(commands)
}

/// The stdin-free half of [`collect_commands`], shared with tests
pub fn collect_from_sources(positionals: &[String], script_files: &[String]) -> Result<Vec<String>> {
    let mut commands: Vec<String> = positionals.to_vec();
    for file in script_files {
        commands.extend(read_script_file(file)?);
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line() {
        assert_eq!(strip_line("  status  "), Some("status"));
        assert_eq!(strip_line(""), None);
        assert_eq!(strip_line("   "), None);
        assert_eq!(strip_line("# comment"), None);
        assert_eq!(strip_line("; also a comment"), None);
        assert_eq!(strip_line("say # not a comment"), Some("say # not a comment"));
    }
}
