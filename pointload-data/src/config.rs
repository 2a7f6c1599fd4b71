//! Loader configuration.
//!
//! Every field has a default matching the behavior of common PLY producers,
//! so an empty JSON object (`{}`) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Bytes inspected when sniffing for the `ply` marker.
pub const DEFAULT_SNIFF_WINDOW: usize = 1024;

/// Bytes searched for the `end_header` line.
pub const DEFAULT_HEADER_WINDOW: usize = 64 * 1024;

/// What to do with a vertex property whose scalar type name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownScalarPolicy {
    /// Treat the property as a 4-byte float and log a warning.
    #[default]
    Float32Fallback,
    /// Fail the decode with [`crate::FormatError::UnknownScalarType`].
    Reject,
}

/// Settings shared by every stage of a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of leading bytes the sniffer looks at.
    pub sniff_window: usize,
    /// Maximum header size; `end_header` must appear within this many bytes.
    pub header_window: usize,
    /// Handling of unrecognized scalar type names.
    pub unknown_scalar: UnknownScalarPolicy,
    /// Color assigned to every point when the header declares no colors.
    pub default_color: [f32; 3],
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sniff_window: DEFAULT_SNIFF_WINDOW,
            header_window: DEFAULT_HEADER_WINDOW,
            unknown_scalar: UnknownScalarPolicy::default(),
            default_color: [1.0, 1.0, 1.0],
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config that rejects unknown scalar types instead of guessing.
    pub fn strict() -> Self {
        Self {
            unknown_scalar: UnknownScalarPolicy::Reject,
            ..Self::default()
        }
    }
}
