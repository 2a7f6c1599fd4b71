//! Pointload Data Crate
//!
//! Decodes point cloud buffers into render-ready position and color arrays.
//! A buffer starting with `ply` is parsed as a PLY file (ASCII or binary);
//! anything else is treated as packed `x, y, z, r, g, b` floats.
//!
//! Decoding is synchronous, does no I/O and keeps no state between calls.

pub mod config;
pub mod error;
pub mod loader;
pub mod ply;
pub mod raw;
pub mod types;

pub use config::{LoaderConfig, UnknownScalarPolicy};
pub use error::{FormatError, LoadError};
pub use loader::{LoadReport, PointLoader, SourceKind, load_point_set};
pub use ply::{Encoding, encode_ply};
pub use raw::{decode_raw, encode_raw};
pub use types::{Bounds, PointSet, RenderablePoints};
