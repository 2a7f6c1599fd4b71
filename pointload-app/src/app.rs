//! Command implementations.

use crate::{Args, Command, OutputFormat};
use pointload_data::{
    Encoding, LoadError, LoadReport, LoaderConfig, PointLoader, PointSet, SourceKind, encode_ply,
    encode_raw,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} contains no points")]
    Empty(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => LoaderConfig::default(),
    };
    let loader = PointLoader::new(config);

    match args.command {
        Command::Inspect { file, json } => {
            let report = load(&loader, &file)?;
            let summary = Summary::new(&report);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.to_text());
            }
        }
        Command::Convert { input, output, to } => {
            let report = load(&loader, &input)?;
            let points = report.points.ok_or_else(|| AppError::Empty(input.clone()))?;
            let bytes = encode_as(&points, to);
            std::fs::write(&output, &bytes)?;
            info!(
                "Wrote {} points ({} bytes) to {}",
                points.count(),
                bytes.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<LoaderConfig, AppError> {
    let text = std::fs::read_to_string(path)?;
    LoaderConfig::from_json(&text).map_err(|source| AppError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn load(loader: &PointLoader, path: &Path) -> Result<LoadReport, AppError> {
    let bytes = std::fs::read(path)?;
    loader.load_report(&bytes).map_err(|source| {
        warn!("Failed to load {}: {}", path.display(), source);
        AppError::Load {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn encode_as(points: &PointSet, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Ascii => encode_ply(points, Encoding::Text),
        OutputFormat::BinaryLe => encode_ply(points, Encoding::BinaryLittleEndian),
        OutputFormat::BinaryBe => encode_ply(points, Encoding::BinaryBigEndian),
        OutputFormat::Raw => encode_raw(points),
    }
}

/// Printable description of a decoded buffer.
#[derive(Debug, Serialize, PartialEq)]
struct Summary {
    source: &'static str,
    count: usize,
    has_color: bool,
    bounds: Option<BoundsSummary>,
}

#[derive(Debug, Serialize, PartialEq)]
struct BoundsSummary {
    min: [f32; 3],
    max: [f32; 3],
    size: [f32; 3],
}

impl Summary {
    fn new(report: &LoadReport) -> Self {
        let source = match report.kind {
            SourceKind::Ply(encoding) => encoding.as_token(),
            SourceKind::Raw => "raw",
        };
        let points = report.points.as_ref();
        Self {
            source,
            count: points.map_or(0, PointSet::count),
            has_color: report.has_color,
            bounds: points.and_then(PointSet::bounds).map(|b| BoundsSummary {
                min: b.min.to_array(),
                max: b.max.to_array(),
                size: b.size().to_array(),
            }),
        }
    }

    fn to_text(&self) -> String {
        let mut text = format!(
            "source:    {}\npoints:    {}\ncolors:    {}\n",
            self.source,
            self.count,
            if self.has_color { "declared" } else { "default" }
        );
        match &self.bounds {
            Some(b) => text.push_str(&format!(
                "bounds:    [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]\n",
                b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]
            )),
            None => text.push_str("bounds:    none\n"),
        }
        text
    }
}
