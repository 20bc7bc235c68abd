//! ARRCON binary
//!
//! Resolves the target (INI defaults → environment → saved host → flags),
//! performs registry/introspection actions, then connects, authenticates,
//! and drives batch and/or interactive mode.

use std::net::Shutdown;
use std::net::TcpStream;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, CommandFactory, Parser};
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use arrcon::config::{self, Config, Locator, Target};
use arrcon::driver::{self, Driver, DriverOptions};
use arrcon::error::{RconError, Result};
use arrcon::hosts::{AddOutcome, HostRegistry};
use arrcon::network::{Session, Transport};

/// ARRCON
#[derive(Parser, Debug)]
#[command(name = "arrcon")]
#[command(about = "A commandline Remote-CONsole (RCON) client for the Source RCON Protocol, \
compatible with similar protocols such as the one used by Minecraft.")]
#[command(version, disable_version_flag = true)]
struct Args {
    /// Commands to run on the server, in order
    commands: Vec<String>,

    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// RCON server IP/hostname
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// RCON server port
    #[arg(short = 'P', long)]
    port: Option<String>,

    /// RCON server password
    #[arg(short = 'p', long = "pass")]
    pass: Option<String>,

    /// Use a saved host's connection information
    #[arg(short = 'S', long)]
    saved: Option<String>,

    // -------------------------------------------------------------------------
    // Host registry
    // -------------------------------------------------------------------------
    /// Save the current target as a named host, then exit
    #[arg(long, value_name = "NAME")]
    save_host: Option<String>,

    /// Remove a saved host, then exit (repeatable)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    remove_host: Vec<String>,

    /// List all saved hosts, then exit
    #[arg(short = 'l', long)]
    list_hosts: bool,

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------
    /// Run each line of the given file as a command (repeatable)
    #[arg(short = 'f', long = "file", value_name = "PATH", action = ArgAction::Append)]
    files: Vec<String>,

    // -------------------------------------------------------------------------
    // Behavior
    // -------------------------------------------------------------------------
    /// Start an interactive session after any scripted commands
    #[arg(short = 'i', long, short_alias = 't')]
    interactive: bool,

    /// Disable the interactive prompt and the batch command echo
    #[arg(short = 'Q', long)]
    no_prompt: bool,

    /// Wait this many milliseconds between commands in batch mode
    #[arg(short = 'w', long, value_name = "MS")]
    wait: Option<u64>,

    /// Quiet mode; minimizes console output
    #[arg(short = 'q', long, short_alias = 's')]
    quiet: bool,

    /// Disable colorized console output
    #[arg(short = 'n', long)]
    no_color: bool,

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------
    /// Print the current version number, then exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Print all recognized environment variables and their values, then exit
    #[arg(long)]
    print_env: bool,

    /// (Over)write the INI file with the default configuration, then exit
    #[arg(long)]
    write_ini: bool,

    /// Write the current configuration values to the INI file, then exit
    #[arg(long)]
    update_ini: bool,
}

fn main() -> ExitCode {
    let no_args = std::env::args().len() == 1;
    let args = Args::parse();

    init_tracing(args.quiet);

    if no_args {
        let _ = Args::command().print_help();
        eprintln!();
        eprintln!("[FATAL] No arguments were specified; supply a target with -H, -P, and -p.");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Route log output to stderr so protocol output on stdout stays clean
fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "error" } else { "warn,arrcon=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let locator = Locator::from_current_exe();
    let env_prefix = locator.env_prefix();

    // Layer 1: INI defaults
    let mut config = Config::default();
    config::load_ini(&mut config, &locator.ini_path())?;

    // Layer 2: environment
    config.apply_env(&env_prefix);

    if args.print_env {
        print_env(&env_prefix);
        return Ok(());
    }

    // Flags that mirror config knobs
    if args.no_color {
        config.no_color = true;
    }
    if let Some(ms) = args.wait {
        config.command_delay = Duration::from_millis(ms);
    }

    // Layer 3: saved host, then explicit flags on top
    let registry = HostRegistry::load(&locator.hosts_path())?;
    config.target = resolve_target(&args, &config, &registry)?;

    if args.write_ini {
        let defaults = Config::default();
        std::fs::write(locator.ini_path(), defaults.to_ini().render())?;
        println!("Successfully wrote config: {}", locator.ini_path().display());
        return Ok(());
    }
    if args.update_ini {
        std::fs::write(locator.ini_path(), config.to_ini().render())?;
        println!("Successfully updated config: {}", locator.ini_path().display());
        return Ok(());
    }

    if handle_registry_actions(&args, registry, &config, &locator)? {
        return Ok(());
    }

    // Build the command list before touching the network
    let commands = driver::collect_commands(&args.commands, &args.files)?;

    if config.target.password.is_empty() && !config.allow_blank_password {
        return Err(RconError::Usage(
            "Password cannot be blank! (set bAllowBlankPassword in the INI to permit it)"
                .to_string(),
        ));
    }

    // Shutdown plumbing: the handler sets the flag and shuts down whatever
    // socket the driver has armed in the slot, unblocking in-flight reads.
    let shutdown = Arc::new(AtomicBool::new(false));
    let socket_slot: Arc<Mutex<Option<TcpStream>>> = Arc::new(Mutex::new(None));
    {
        let shutdown = Arc::clone(&shutdown);
        let slot = Arc::clone(&socket_slot);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
            if let Some(sock) = slot.lock().take() {
                let _ = sock.shutdown(Shutdown::Both);
            }
        })
        .map_err(|e| RconError::Config(format!("failed to install signal handler: {}", e)))?;
    }

    // Connect and authenticate
    let mut transport = Transport::connect(&config.target.host, &config.target.port)?;
    transport.set_timing(config.select_timeout, config.receive_delay);

    let mut session = Session::new(transport);
    *socket_slot.lock() = Some(session.try_clone_stream()?);

    session.authenticate(&config.target.password)?;
    tracing::info!(
        host = %config.target.host,
        port = %config.target.port,
        "authenticated"
    );

    let options = DriverOptions {
        command_delay: config.command_delay,
        prompt: make_prompt(&config),
        no_prompt: args.no_prompt,
        quiet: args.quiet,
        exit_on_blank: config.exit_on_blank,
    };
    let mut driver = Driver::new(session, options);

    let has_commands = !commands.is_empty();
    if has_commands {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        driver.run_batch(&commands, &mut out)?;
    }

    if !has_commands || args.interactive {
        // Interactive mode handles Ctrl-C itself (it clears the line), so
        // disarm the shutdown slot before entering the loop.
        socket_slot.lock().take();
        driver.run_interactive()?;
    }

    Ok(())
}

/// Resolve the connection target: saved-host values (when `-S` is given)
/// under the explicit flags, over the INI/env baseline.
fn resolve_target(args: &Args, config: &Config, registry: &HostRegistry) -> Result<Target> {
    let mut target = config.target.clone();

    if let Some(name) = &args.saved {
        let saved = registry.resolve(name).ok_or_else(|| {
            RconError::Usage(format!(
                "There is no saved target named \"{}\" in the hosts file!",
                name
            ))
        })?;
        if !saved.host.is_empty() {
            target.host = saved.host;
        }
        if !saved.port.is_empty() {
            target.port = saved.port;
        }
        if !saved.password.is_empty() {
            target.password = saved.password;
        }
    }

    if let Some(host) = &args.host {
        target.host = host.clone();
    }
    if let Some(port) = &args.port {
        target.port = port.clone();
    }
    if let Some(pass) = &args.pass {
        target.password = pass.clone();
    }

    Ok(target)
}

/// Execute `--remove-host`, `--save-host`, and `--list-hosts`.
/// Returns whether any action ran (the process should then exit).
fn handle_registry_actions(
    args: &Args,
    mut registry: HostRegistry,
    config: &Config,
    locator: &Locator,
) -> Result<bool> {
    let mut acted = false;

    if !args.remove_host.is_empty() {
        acted = true;
        for name in &args.remove_host {
            if registry.remove(name) {
                println!("Removed \"{}\"", name);
            } else {
                eprintln!("Hostname \"{}\" doesn't exist!", name);
            }
        }
        registry.save(config.auto_delete_hosts_file)?;
        if registry.is_empty() && config.auto_delete_hosts_file {
            println!("Deleted the hosts file as there are no remaining entries.");
        } else {
            println!(
                "Successfully saved modified hosts file: {}",
                locator.hosts_path().display()
            );
        }
    }

    if let Some(name) = &args.save_host {
        acted = true;
        match registry.add(name, &config.target) {
            AddOutcome::Added => {
                println!(
                    "Added host: \"{}\" {}:{}",
                    name, config.target.host, config.target.port
                );
            }
            AddOutcome::AlreadyExistsIdentical => {
                return Err(RconError::Usage(format!(
                    "Host \"{}\" is already set to {}:{}",
                    name, config.target.host, config.target.port
                )));
            }
            AddOutcome::AlreadyExistsConflict => {
                println!(
                    "Updated \"{}\": {}:{}",
                    name, config.target.host, config.target.port
                );
            }
        }
        registry.save(config.auto_delete_hosts_file)?;
        println!(
            "Successfully saved modified hosts file: {}",
            locator.hosts_path().display()
        );
    }

    if args.list_hosts {
        acted = true;
        let hosts = registry.list();
        if hosts.is_empty() {
            eprintln!("There are no saved hosts in the list.");
            return Ok(true);
        }
        for saved in hosts {
            if args.quiet {
                println!("\"{}\"  ( {}:{} )", saved.name, saved.host, saved.port);
            } else {
                println!("\"{}\"", saved.name);
                println!("    Host:  {}", saved.host);
                println!("    Port:  {}", saved.port);
            }
        }
    }

    Ok(acted)
}

fn print_env(prefix: &str) {
    let vars = [
        ("HOST", "overrides the target hostname"),
        ("PORT", "overrides the target port"),
        ("PASS", "overrides the target password"),
    ];
    for (suffix, description) in vars {
        let name = format!("{}_{}", prefix, suffix);
        // Mask the password value; the other two are plain connection info.
        let display = match std::env::var(&name) {
            Ok(_) if suffix == "PASS" => "(set)".to_string(),
            Ok(v) => v,
            Err(_) => "(unset)".to_string(),
        };
        println!("{} = {}  # {}", name, display, description);
    }
}

fn make_prompt(config: &Config) -> String {
    if !config.custom_prompt.is_empty() {
        return config.custom_prompt.clone();
    }
    if config.no_color {
        format!("RCON@{}> ", config.target.host)
    } else {
        format!("\x1b[32mRCON@{}\x1b[0m> ", config.target.host)
    }
}
