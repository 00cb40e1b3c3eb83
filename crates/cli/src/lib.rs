pub mod commands;
pub mod portal;
pub mod watermark;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use quotedesk_client::WebhookClient;
use quotedesk_core::auth::FixedCredentialVerifier;
use quotedesk_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use quotedesk_core::workflow::controller::{Pacing, WorkflowController};

#[derive(Debug, Parser)]
#[command(
    name = "quotedesk",
    about = "Quotedesk quotation portal CLI",
    long_about = "Log in, browse products, fill the product form, and request price quotations from the automation service.",
    after_help = "Examples:\n  quotedesk\n  quotedesk portal --base-url http://localhost:5678\n  quotedesk config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Path to a quotedesk.toml config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the interactive quotation portal (the default)")]
    Portal(PortalArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

#[derive(Debug, Default, Args)]
struct PortalArgs {
    #[arg(long, value_name = "URL", help = "Override the automation service base URL")]
    base_url: Option<String>,
    #[arg(long, value_name = "LEVEL", help = "Override the log level")]
    log_level: Option<String>,
    #[arg(long, help = "Skip the startup and login pacing delays")]
    no_delays: bool,
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Portal(PortalArgs::default())) {
        Command::Portal(args) => run_portal(cli.config, args).await,
        Command::Config => {
            let result = commands::config::run(cli.config);
            println!("{}", result.output);
            ExitCode::from(result.exit_code)
        }
    }
}

async fn run_portal(config_path: Option<PathBuf>, args: PortalArgs) -> ExitCode {
    let require_file = config_path.is_some();
    let load = AppConfig::load(LoadOptions {
        config_path,
        require_file,
        overrides: ConfigOverrides {
            base_url: args.base_url,
            log_level: args.log_level,
            startup_delay_ms: args.no_delays.then_some(0),
            login_delay_ms: args.no_delays.then_some(0),
        },
    });
    let config = match load {
        Ok(config) => config,
        Err(error) => {
            eprintln!("config validation failed: {error}");
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    let client = match WebhookClient::new(&config.service) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("could not initialize the service client: {error}");
            return ExitCode::from(2);
        }
    };
    let verifier = FixedCredentialVerifier::new(config.auth.credentials.clone());
    let controller = WorkflowController::new(
        Arc::new(client),
        Arc::new(verifier),
        Pacing::from(&config.ui),
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut portal = portal::Portal::new(controller, config.ui.watermark_text.clone());
    match portal.run(&mut stdin.lock(), &mut stdout.lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("portal terminated: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never interleave with the portal prompts.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
