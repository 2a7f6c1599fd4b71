//! Loader facade: picks the PLY or raw decoder for a buffer.

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::ply::{Encoding, decode_points, is_structured, parse_header};
use crate::raw::decode_raw;
use crate::types::{PointSet, RenderablePoints};
use std::path::Path;
use tracing::{debug, info};

/// How a buffer was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Ply(Encoding),
    Raw,
}

/// Decoding outcome plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub kind: SourceKind,
    /// `None` when the buffer held no usable points.
    pub points: Option<PointSet>,
    /// Whether the header declared color properties. Always true for raw buffers.
    pub has_color: bool,
}

/// Stateless point cloud loader.
#[derive(Debug, Clone, Default)]
pub struct PointLoader {
    config: LoaderConfig,
}

impl PointLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Decode a complete in-memory buffer.
    ///
    /// Returns `Ok(None)` for a raw buffer with no complete point record.
    pub fn load(&self, bytes: &[u8]) -> Result<Option<PointSet>, LoadError> {
        self.load_report(bytes).map(|report| report.points)
    }

    /// Like [`PointLoader::load`], but also reports the detected source kind.
    #[tracing::instrument(skip_all, fields(len = bytes.len()))]
    pub fn load_report(&self, bytes: &[u8]) -> Result<LoadReport, LoadError> {
        if is_structured(bytes, self.config.sniff_window) {
            let schema = parse_header(bytes, &self.config)?;
            let has_color = schema.color_indices().is_some();
            let points = decode_points(bytes, &schema, &self.config)?;
            info!(
                "Loaded {} points from {} PLY",
                points.count(),
                schema.encoding.as_token()
            );
            return Ok(LoadReport {
                kind: SourceKind::Ply(schema.encoding),
                points: Some(points),
                has_color,
            });
        }

        debug!("No PLY marker, decoding as raw float buffer");
        let points = decode_raw(bytes);
        match &points {
            Some(points) => info!("Loaded {} points from raw buffer", points.count()),
            None => info!("Raw buffer holds no complete points"),
        }
        Ok(LoadReport {
            kind: SourceKind::Raw,
            points,
            has_color: true,
        })
    }

    /// Decode a buffer and attach the caller's material to the result.
    pub fn load_with_material<M>(
        &self,
        bytes: &[u8],
        material: M,
    ) -> Result<Option<RenderablePoints<M>>, LoadError> {
        Ok(self
            .load(bytes)?
            .map(|points| RenderablePoints::new(points, material)))
    }

    /// Read a whole file, then decode it.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Option<PointSet>, LoadError> {
        debug!("Reading point cloud file");
        let bytes = std::fs::read(path.as_ref())?;
        self.load(&bytes)
    }
}

/// Decode a buffer with the default configuration.
pub fn load_point_set(bytes: &[u8]) -> Result<Option<PointSet>, LoadError> {
    PointLoader::default().load(bytes)
}
