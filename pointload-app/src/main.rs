//! Pointload Application
//!
//! Command-line front end for the point cloud loader.
//!
//! Commands:
//! - `inspect`: decode a file and print its point count, bounds and encoding
//! - `convert`: re-encode a file as ASCII PLY, binary PLY or a raw buffer

mod app;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pointload - Point Cloud Inspection and Conversion
#[derive(Parser, Debug)]
#[command(name = "pointload")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON loader configuration (missing fields use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a file and print a summary
    Inspect {
        /// PLY or raw point file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a file and write it in another encoding
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::BinaryLe)]
        to: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Ascii,
    BinaryLe,
    BinaryBe,
    Raw,
}

fn main() {
    init_tracing();

    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    #[cfg(feature = "tracy")]
    {
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        tracing_subscriber::registry()
            .with(tracing_tracy::TracyLayer::default())
            .with(
                tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "info".into()),
                ),
            )
            .init();
    }

    #[cfg(not(feature = "tracy"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
