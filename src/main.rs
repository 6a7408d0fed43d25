//! Wally CLI - deploy a program to a KIPR Wallaby controller
//!
//! Usage: wally <HOSTNAME> <USER> <PROJECT> <LANGUAGE> [PASSWORD]
//!
//! Exit codes:
//!   0  success
//!   1  general/argument error
//!   2  unsupported OS for a required network switch
//!   3  feature not implemented (non-Python language, reserved
//!      network operations)

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use wally::{
    Config, DeployEngine, DeployRequest, InteractivePrompter, Platform, SshConnector, WallyError,
    WallyResult,
};

/// Wally - deployment tool for KIPR Wallaby robot controllers
#[derive(Parser, Debug)]
#[command(name = "wally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Hostname to connect to, or a shorthand: wired, hotspot, prompt
    hostname: String,

    /// Project owner on the Wallaby
    user: String,

    /// Project name (also the local directory uploaded by default)
    project: String,

    /// Programming language of the project (only "python" is accepted)
    language: String,

    /// Password of the Wallaby's Linux account; omit for key-based auth
    password: Option<String>,

    /// Alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Local tree to upload instead of ./<PROJECT>
    #[arg(long)]
    source: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                process::exit(0);
            }
            ErrorKind::MissingRequiredArgument => {
                let err = WallyError::MissingArguments {
                    message: "please include <HOSTNAME> <USER> <PROJECT> <LANGUAGE> [PASSWORD]"
                        .to_string(),
                };
                eprintln!("{err}");
                process::exit(err.exit_code());
            }
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    match run(cli) {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> WallyResult<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let prompter = InteractivePrompter;
    let connector = SshConnector;
    let engine = DeployEngine::new(&config, &prompter, &connector, Platform::detect());

    engine.run(&DeployRequest {
        hostname: cli.hostname,
        owner: cli.user,
        project: cli.project,
        language: cli.language,
        password: cli.password,
        source: cli.source,
    })
}
