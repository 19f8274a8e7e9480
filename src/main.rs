//! n8n-launch: start the n8n workflow server as a supervised child.
//!
//! This is the main entry point for the `n8n-launch` CLI. It fills in
//! environment defaults, launches the child with inherited standard streams,
//! and exits with the child's status (or 1 if the child could not start).

mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod exit_codes;
mod logging;
pub mod supervisor;

use cli::Cli;
use config::LauncherConfig;
use environment::{EffectiveEnvironment, HOST, PORT, PROTOCOL, ServerSettings};
use error::Result;
use supervisor::{ChildExit, Supervisor};

fn main() {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    let code = match run(cli) {
        Ok(exit) => exit.exit_code(),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };

    // ExitCode only carries a u8; exit() relays wider codes on Windows too.
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<ChildExit> {
    let config = match &cli.config {
        Some(path) => LauncherConfig::load(path)?,
        None => LauncherConfig::default(),
    };
    let spec = config.launch_spec(&cli.command)?;

    let env = EffectiveEnvironment::from_process(&config.env_defaults());
    for line in banner(&env) {
        println!("{}", line);
    }
    match ServerSettings::from_env(&env) {
        Ok(settings) => tracing::debug!(
            host = %settings.host,
            port = settings.port,
            protocol = %settings.protocol,
            editor_base_url = ?settings.editor_base_url,
            "server settings"
        ),
        Err(e) => tracing::warn!("{}; passing it to the server unchanged", e),
    }

    let running = Supervisor::new(env).launch(&spec)?;
    println!("n8n server is starting (pid {})...", running.pid());

    let exit = running.wait()?;
    println!("{} process {}", spec.program(), exit);
    if !exit.is_success() {
        tracing::warn!(code = exit.exit_code(), "child did not exit cleanly");
    }
    Ok(exit)
}

/// Startup summary printed before the child is launched.
fn banner(env: &EffectiveEnvironment) -> Vec<String> {
    let value = |name: &str| env.get_lossy(name).unwrap_or_default();
    vec![
        "Starting n8n server...".to_string(),
        "n8n configuration:".to_string(),
        format!("   - Host: {}", value(HOST)),
        format!("   - Port: {}", value(PORT)),
        format!("   - Protocol: {}", value(PROTOCOL)),
    ]
}
