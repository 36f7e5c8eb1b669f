//! reload-verifier
//!
//! Command line front end for the reload verification library.
//!
//! ```text
//!   control plane                    proxy (nginx)
//!   ─────────────                    ─────────────
//!   render N ──▶ config tree ──reload──▶ new workers
//!                                         │
//!   wait N ◀── GET /configVersion ◀───────┘  (unix socket)
//! ```

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::UnixListener;

use reload_verifier::config::{load_config, validate_config, ConfigError, VerifierConfig};
use reload_verifier::lifecycle::shutdown_signal;
use reload_verifier::observability::{logging, metrics};
use reload_verifier::{ConfigVersion, ReloadVerifier, VersionResponder, VersionTemplate};

#[derive(Parser)]
#[command(name = "reload-verifier")]
#[command(about = "Confirm that a reloaded proxy serves a given config version", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Version endpoint socket path (overrides the config file)
    #[arg(short, long)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the version endpoint config block to stdout
    Render {
        #[arg(value_name = "VERSION")]
        config_version: u64,

        /// Include the `opentracing off;` directive
        #[arg(long)]
        extra_module: bool,
    },
    /// Print the config version the proxy currently serves
    Query,
    /// Wait until the proxy serves the given config version
    Wait {
        #[arg(value_name = "VERSION")]
        config_version: u64,

        /// Overall timeout in milliseconds (overrides the config file)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve a stand-in version endpoint for local testing
    Serve {
        #[arg(value_name = "VERSION")]
        config_version: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => VerifierConfig::default(),
    };
    if let Some(socket) = cli.socket {
        config.endpoint.socket_path = socket;
    }
    if let Commands::Wait { timeout_ms: Some(ms), .. } = &cli.command {
        config.timeouts.reload_ms = *ms;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    match cli.command {
        Commands::Render { config_version, extra_module } => {
            let template = VersionTemplate::new(config.endpoint.socket_path.as_str())?;
            let rendered = template.render(
                ConfigVersion(config_version),
                extra_module || config.template.extra_module,
            );
            std::io::stdout().write_all(&rendered)?;
        }
        Commands::Query => {
            let verifier = ReloadVerifier::from_config(&config);
            let version = verifier.query_current_version().await?;
            println!("{}", version);
        }
        Commands::Wait { config_version, json, .. } => {
            let verifier = ReloadVerifier::from_config(&config);
            let expected = ConfigVersion(config_version);

            match verifier.wait_for_version_or_cancel(expected, shutdown_signal()).await {
                Some(Ok(verified)) => {
                    if json {
                        let report = serde_json::json!({
                            "expected": expected,
                            "confirmed": true,
                            "attempts": verified.attempts,
                            "elapsed_ms": verified.elapsed.as_millis() as u64,
                        });
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!(
                            "config version {} confirmed after {} attempts in {:?}",
                            expected, verified.attempts, verified.elapsed
                        );
                    }
                }
                Some(Err(e)) => {
                    if json {
                        let report = serde_json::json!({
                            "expected": expected,
                            "confirmed": false,
                            "error": e.to_string(),
                        });
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        eprintln!("Error: {}", e);
                    }
                    return Ok(ExitCode::FAILURE);
                }
                None => return Ok(ExitCode::from(130)),
            }
        }
        Commands::Serve { config_version } => {
            let path = &config.endpoint.socket_path;
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path, "Removed stale socket"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            let listener = UnixListener::bind(path)?;
            VersionResponder::new(ConfigVersion(config_version))
                .run(listener, shutdown_signal())
                .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
