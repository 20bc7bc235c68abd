//! Configuration for ARRCON
//!
//! Centralized configuration with sensible defaults, threaded explicitly
//! from the driver down to the transport. Values come from three layers, in
//! increasing precedence: the INI file beside the executable, environment
//! variables, and command-line flags.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RconError, Result};
use crate::ini;

/// Fallback program name when the executable path cannot be inspected
const DEFAULT_PROGRAM_NAME: &str = "ARRCON";

/// The target server's connection information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: String,
    /// Held in memory for the session only; never written back to disk by
    /// the connection path
    pub password: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: "27015".to_string(),
            password: String::new(),
        }
    }
}

/// Main configuration for an ARRCON invocation
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target Configuration
    // -------------------------------------------------------------------------
    /// Default connection target (overridden by saved hosts / env / flags)
    pub target: Target,

    // -------------------------------------------------------------------------
    // Timing Configuration
    // -------------------------------------------------------------------------
    /// Sleep between successive commands in batch mode
    pub command_delay: Duration,

    /// Sleep between receives during response reassembly
    pub receive_delay: Duration,

    /// How long the readiness probe waits before declaring the socket quiet
    pub select_timeout: Duration,

    // -------------------------------------------------------------------------
    // Appearance Configuration
    // -------------------------------------------------------------------------
    /// Prompt override; empty means the default `RCON@host>` form
    pub custom_prompt: String,

    /// Disable ANSI color in the prompt and message tags
    pub no_color: bool,

    // -------------------------------------------------------------------------
    // Behavior Configuration
    // -------------------------------------------------------------------------
    /// Permit connecting with an empty password
    pub allow_blank_password: bool,

    /// A blank line in interactive mode ends the loop
    pub exit_on_blank: bool,

    /// Delete the hosts file when its last entry is removed
    pub auto_delete_hosts_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: Target::default(),
            command_delay: Duration::ZERO,
            receive_delay: Duration::from_millis(10),
            select_timeout: Duration::from_millis(500),
            custom_prompt: String::new(),
            no_color: false,
            allow_blank_password: false,
            exit_on_blank: false,
            auto_delete_hosts_file: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Apply values from a parsed INI document; unknown sections and keys
    /// are ignored so hand-edited files stay forward-compatible.
    pub fn apply_ini(&mut self, doc: &ini::Document) -> Result<()> {
        if let Some(host) = doc.get("target", "sHost") {
            self.target.host = host.to_string();
        }
        if let Some(port) = doc.get("target", "sPort") {
            self.target.port = port.to_string();
        }
        if let Some(pass) = doc.get("target", "sPass") {
            self.target.password = pass.to_string();
        }

        if let Some(ms) = doc.get("timing", "iCommandDelay") {
            self.command_delay = Duration::from_millis(parse_ms("iCommandDelay", ms)?);
        }
        if let Some(ms) = doc.get("timing", "iReceiveDelay") {
            self.receive_delay = Duration::from_millis(parse_ms("iReceiveDelay", ms)?);
        }
        if let Some(ms) = doc.get("timing", "iSelectTimeout") {
            self.select_timeout = Duration::from_millis(parse_ms("iSelectTimeout", ms)?);
        }

        if let Some(prompt) = doc.get("appearance", "sCustomPrompt") {
            self.custom_prompt = prompt.to_string();
        }
        if let Some(v) = doc.get("appearance", "bNoColor") {
            self.no_color = parse_bool("bNoColor", v)?;
        }

        if let Some(v) = doc.get("miscellaneous", "bAllowBlankPassword") {
            self.allow_blank_password = parse_bool("bAllowBlankPassword", v)?;
        }
        if let Some(v) = doc.get("miscellaneous", "bExitOnBlank") {
            self.exit_on_blank = parse_bool("bExitOnBlank", v)?;
        }
        if let Some(v) = doc.get("miscellaneous", "bAutoDeleteHostsFile") {
            self.auto_delete_hosts_file = parse_bool("bAutoDeleteHostsFile", v)?;
        }

        Ok(())
    }

    /// Render the current values as an INI document.
    ///
    /// The password is intentionally included only when already present in
    /// the defaults path (`--write-ini`/`--update-ini` persist what the user
    /// asked for).
    pub fn to_ini(&self) -> ini::Document {
        let mut doc = ini::Document::new();

        let target = doc.section_mut("target");
        target.set("sHost", &self.target.host);
        target.set("sPort", &self.target.port);
        target.set("sPass", &self.target.password);

        let timing = doc.section_mut("timing");
        timing.set("iCommandDelay", &self.command_delay.as_millis().to_string());
        timing.set("iReceiveDelay", &self.receive_delay.as_millis().to_string());
        timing.set("iSelectTimeout", &self.select_timeout.as_millis().to_string());

        let appearance = doc.section_mut("appearance");
        appearance.set("sCustomPrompt", &self.custom_prompt);
        appearance.set("bNoColor", bool_str(self.no_color));

        let misc = doc.section_mut("miscellaneous");
        misc.set("bAllowBlankPassword", bool_str(self.allow_blank_password));
        misc.set("bExitOnBlank", bool_str(self.exit_on_blank));
        misc.set("bAutoDeleteHostsFile", bool_str(self.auto_delete_hosts_file));

        doc
    }

    /// Override the target with `<PROG>_HOST` / `<PROG>_PORT` / `<PROG>_PASS`
    /// environment variables when they are set.
    pub fn apply_env(&mut self, prefix: &str) {
        if let Ok(host) = env::var(format!("{}_HOST", prefix)) {
            self.target.host = host;
        }
        if let Ok(port) = env::var(format!("{}_PORT", prefix)) {
            self.target.port = port;
        }
        if let Ok(pass) = env::var(format!("{}_PASS", prefix)) {
            self.target.password = pass;
        }
    }
}

fn parse_ms(key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        RconError::Config(format!(
            "expected an integer millisecond value for {}, got \"{}\"",
            key, value
        ))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(RconError::Config(format!(
            "expected a boolean value for {}, got \"{}\"",
            key, value
        ))),
    }
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn target(mut self, host: &str, port: &str, password: &str) -> Self {
        self.config.target = Target {
            host: host.to_string(),
            port: port.to_string(),
            password: password.to_string(),
        };
        self
    }

    pub fn command_delay(mut self, delay: Duration) -> Self {
        self.config.command_delay = delay;
        self
    }

    pub fn receive_delay(mut self, delay: Duration) -> Self {
        self.config.receive_delay = delay;
        self
    }

    pub fn select_timeout(mut self, timeout: Duration) -> Self {
        self.config.select_timeout = timeout;
        self
    }

    pub fn custom_prompt(mut self, prompt: &str) -> Self {
        self.config.custom_prompt = prompt.to_string();
        self
    }

    pub fn allow_blank_password(mut self, allow: bool) -> Self {
        self.config.allow_blank_password = allow;
        self
    }

    pub fn exit_on_blank(mut self, exit: bool) -> Self {
        self.config.exit_on_blank = exit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

// =============================================================================
// File Locations
// =============================================================================

/// Locates the program's config files, which live beside the executable and
/// are named after it: `<PROG>.ini` and `<PROG>.hosts`.
#[derive(Debug, Clone)]
pub struct Locator {
    dir: PathBuf,
    stem: String,
}

impl Locator {
    /// Derive locations from the current executable
    pub fn from_current_exe() -> Self {
        match env::current_exe() {
            Ok(exe) => {
                let dir = exe
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."));
                let stem = exe
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(DEFAULT_PROGRAM_NAME)
                    .to_string();
                Self { dir, stem }
            }
            Err(_) => Self {
                dir: PathBuf::from("."),
                stem: DEFAULT_PROGRAM_NAME.to_string(),
            },
        }
    }

    /// Environment-variable prefix: the uppercased program name
    pub fn env_prefix(&self) -> String {
        self.stem.to_uppercase()
    }

    /// Path of the general config INI
    pub fn ini_path(&self) -> PathBuf {
        self.dir.join(format!("{}.ini", self.stem))
    }

    /// Path of the saved-hosts file
    pub fn hosts_path(&self) -> PathBuf {
        self.dir.join(format!("{}.hosts", self.stem))
    }
}

/// Load the config INI if it exists; absent files are not an error
pub fn load_ini(config: &mut Config, path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let text = fs::read_to_string(path)?;
    let doc = ini::Document::parse(&text)?;
    config.apply_ini(&doc)
}
