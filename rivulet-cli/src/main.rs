//! Rivulet CLI - Command-line interface for the Rivulet dataflow engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rivulet_executor::observability::{LogFormat, TracingConfig, init_tracing};
use std::path::PathBuf;

/// Rivulet - reactive topic/agent dataflow engine.
#[derive(Parser)]
#[command(name = "rivulet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Rivulet API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Configuration file to load at startup
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of connections served at once
        #[arg(long, default_value = "64")]
        max_connections: usize,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },

    /// Print the topology of a configuration file
    Graph {
        /// Path to the configuration file
        file: PathBuf,

        /// Print the snapshot as JSON
        #[arg(long, conflicts_with = "dot")]
        json: bool,

        /// Print Graphviz DOT
        #[arg(long)]
        dot: bool,
    },

    /// Load a configuration and publish values into it
    Run {
        /// Path to the configuration file
        file: PathBuf,

        /// Message to publish, as topic=value (repeatable, applied in order)
        #[arg(short = 'P', long = "publish", value_parser = commands::run::parse_assignment)]
        publish: Vec<(String, String)>,

        /// Print topic values as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Check for explicit log format override, otherwise auto-detect
    let log_format = std::env::var("RIVULET_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse::<LogFormat>().ok())
        .unwrap_or_else(|| {
            if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
                LogFormat::Pretty
            } else {
                LogFormat::Compact
            }
        });

    // Build config, respecting RUST_LOG if set
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string());

    let config = TracingConfig::builder()
        .log_format(log_format)
        .log_filter(log_filter)
        .build();

    init_tracing(&config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            config,
            max_connections,
        } => commands::serve::run(&host, port, config.as_deref(), max_connections).await,
        Commands::Validate { file } => commands::validate::run(&file),
        Commands::Graph { file, json, dot } => {
            let format = if json {
                commands::graph::Format::Json
            } else if dot {
                commands::graph::Format::Dot
            } else {
                commands::graph::Format::Text
            };
            commands::graph::run(&file, format)
        }
        Commands::Run {
            file,
            publish,
            json,
        } => commands::run::run(&file, &publish, json),
        Commands::Version => commands::version::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_collects_publishes_in_order() {
        let cli = Cli::try_parse_from([
            "rivulet", "run", "flow.cfg", "-P", "A=1", "--publish", "B=2.5",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { publish, .. } => {
                assert_eq!(
                    publish,
                    vec![
                        ("A".to_string(), "1".to_string()),
                        ("B".to_string(), "2.5".to_string())
                    ]
                );
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["rivulet", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn graph_formats_conflict() {
        assert!(Cli::try_parse_from(["rivulet", "graph", "f", "--json", "--dot"]).is_err());
    }
}
