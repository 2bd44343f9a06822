mod register;

use std::{path::PathBuf, process::ExitCode};

use {
    anyhow::Context,
    clap::Parser,
    mx_echo_bridge::PuppetBridge,
    mx_echo_config::{BridgeConfig, Severity},
    mx_echo_plugin::EchoPlugin,
    tokio::io::BufReader,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Debug, Parser)]
#[command(
    name = "mx-puppet-echo",
    version,
    about = "A matrix puppet bridge for the echo protocol"
)]
struct Cli {
    /// Generate the appservice registration file and exit.
    #[arg(short, long)]
    register: bool,

    /// Path of the appservice registration file.
    #[arg(short = 'f', long, default_value = "echo-registration.yaml")]
    registration_file: PathBuf,

    /// Path of the bridge config file.
    #[arg(short, long, default_value = "config.yaml", env = "MX_ECHO_CONFIG")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Defaults to
    /// `logging.console` from the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

/// Logs go to stderr; stdout carries the bridge's event stream.
fn init_telemetry(level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = mx_echo_config::load_config(&cli.config);
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.logging.console.clone()))
        .unwrap_or_else(|| "info".into());
    init_telemetry(&level, cli.json_logs);

    info!(version = env!("CARGO_PKG_VERSION"), "mx-puppet-echo starting");

    let result = if cli.register {
        config
            .context("couldn't read config")
            .and_then(|config| register::write_registration(&config, &cli.registration_file))
            .context("couldn't generate registration file")
    } else {
        match config {
            Ok(config) => run(config).await,
            Err(e) => Err(e.into()),
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let diagnostics = mx_echo_config::validate(&config).into_result()?;
    for d in &diagnostics {
        match d.severity {
            Severity::Warning => warn!(path = d.path, "{}", d.message),
            Severity::Info => info!(path = d.path, "{}", d.message),
            Severity::Error => {},
        }
    }

    let bridge = PuppetBridge::new(config);
    let plugin = EchoPlugin::new(bridge.outbound());
    bridge
        .run(
            Box::new(plugin),
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            shutdown_signal(),
        )
        .await?;

    info!("mx-puppet-echo stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
