//! PLY header parsing.
//!
//! Only the `vertex` element is collected. Properties of any other element
//! (faces, edges, custom elements) are skipped without being validated.

use crate::config::{LoaderConfig, UnknownScalarPolicy};
use crate::error::FormatError;
use crate::ply::scalar::{Endianness, ScalarType};
use tracing::{debug, warn};

/// Body encoding declared by the `format` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Text,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl Encoding {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ascii" => Some(Encoding::Text),
            "binary_little_endian" => Some(Encoding::BinaryLittleEndian),
            "binary_big_endian" => Some(Encoding::BinaryBigEndian),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Encoding::Text => "ascii",
            Encoding::BinaryLittleEndian => "binary_little_endian",
            Encoding::BinaryBigEndian => "binary_big_endian",
        }
    }

    /// Byte order of a binary body, `None` for text.
    pub fn byte_order(self) -> Option<Endianness> {
        match self {
            Encoding::Text => None,
            Encoding::BinaryLittleEndian => Some(Endianness::Little),
            Encoding::BinaryBigEndian => Some(Endianness::Big),
        }
    }
}

/// One `property` declaration of the vertex element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Value type; for list properties this is the item type.
    pub scalar: ScalarType,
    pub is_list: bool,
}

/// Schema of the vertex element, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSchema {
    pub encoding: Encoding,
    pub element_count: usize,
    pub properties: Vec<PropertyDescriptor>,
    /// Offset of the first body byte.
    ///
    /// For ASCII bodies, blank lines and leading whitespace after
    /// `end_header` are skipped. Binary bodies start immediately after the
    /// `end_header` line ending, since payload bytes may be whitespace values.
    pub data_offset: usize,
}

impl HeaderSchema {
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Indices of `x`, `y`, `z`.
    pub fn position_indices(&self) -> Option<[usize; 3]> {
        Some([
            self.property_index("x")?,
            self.property_index("y")?,
            self.property_index("z")?,
        ])
    }

    /// Indices of the color channels, `red` over `r` and so on per channel.
    /// `None` unless all three channels are present.
    pub fn color_indices(&self) -> Option<[usize; 3]> {
        let channel = |long: &str, short: &str| {
            self.property_index(long)
                .or_else(|| self.property_index(short))
        };
        Some([
            channel("red", "r")?,
            channel("green", "g")?,
            channel("blue", "b")?,
        ])
    }

    /// Byte width of one binary vertex record.
    pub fn stride(&self) -> usize {
        self.properties.iter().map(|p| p.scalar.width()).sum()
    }
}

/// Parse the header at the start of `bytes`.
pub fn parse_header(bytes: &[u8], config: &LoaderConfig) -> Result<HeaderSchema, FormatError> {
    let window = &bytes[..bytes.len().min(config.header_window)];
    let (header_len, line_end) = find_header_end(window).ok_or(FormatError::MissingHeaderEnd {
        window: config.header_window,
    })?;

    let header = String::from_utf8_lossy(&window[..header_len]);

    let mut encoding = None;
    let mut element_count = None;
    let mut in_vertex = false;
    let mut properties = Vec::new();

    for line in header.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first().copied() {
            Some("format") => {
                let token = tokens.get(1).copied().unwrap_or_default();
                let parsed = Encoding::from_token(token)
                    .ok_or_else(|| FormatError::UnsupportedFormat(token.to_string()))?;
                encoding = Some(parsed);
            }
            Some("element") => {
                in_vertex = tokens.get(1) == Some(&"vertex");
                if in_vertex {
                    element_count = tokens.get(2).and_then(|n| n.parse::<usize>().ok());
                }
            }
            Some("property") if in_vertex => {
                let property = parse_property(&tokens, line, config)?;
                if property.is_list {
                    return Err(FormatError::ListProperty(property.name));
                }
                properties.push(property);
            }
            _ => {}
        }
    }

    let encoding = encoding.ok_or(FormatError::MissingFormat)?;
    let element_count = element_count
        .filter(|&n| n > 0)
        .ok_or(FormatError::MissingVertexElement)?;

    let mut schema = HeaderSchema {
        encoding,
        element_count,
        properties,
        data_offset: 0,
    };
    if schema.position_indices().is_none() {
        return Err(FormatError::MissingPositionProperties);
    }

    schema.data_offset = match encoding {
        Encoding::Text => bytes[line_end..]
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map_or(bytes.len(), |i| line_end + i),
        // A binary body may legitimately begin with whitespace-valued bytes.
        Encoding::BinaryLittleEndian | Encoding::BinaryBigEndian => {
            if bytes.get(line_end) == Some(&b'\n') {
                line_end + 1
            } else {
                line_end
            }
        }
    };

    debug!(
        "PLY header: {} vertices, {} properties, format {}, body at byte {}",
        schema.element_count,
        schema.properties.len(),
        schema.encoding.as_token(),
        schema.data_offset
    );

    Ok(schema)
}

/// Locate the `end_header` line. Returns the offset where that line starts
/// and the offset just before its `\n` (or the end of the window).
fn find_header_end(window: &[u8]) -> Option<(usize, usize)> {
    let mut start = 0;
    while start < window.len() {
        let end = window[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(window.len(), |i| start + i);
        if window[start..end].trim_ascii() == b"end_header" {
            return Some((start, end));
        }
        start = end + 1;
    }
    None
}

fn parse_property(
    tokens: &[&str],
    line: &str,
    config: &LoaderConfig,
) -> Result<PropertyDescriptor, FormatError> {
    if tokens.len() < 3 {
        return Err(FormatError::MalformedProperty(line.trim().to_string()));
    }

    // property list <count type> <item type> <name>
    let is_list = tokens[1] == "list";
    let type_token = if is_list {
        if tokens.len() < 5 {
            return Err(FormatError::MalformedProperty(line.trim().to_string()));
        }
        tokens[3]
    } else {
        tokens[1]
    };
    let name = tokens[tokens.len() - 1].to_string();

    let scalar = match ScalarType::from_name(type_token) {
        Some(scalar) => scalar,
        None => match config.unknown_scalar {
            UnknownScalarPolicy::Float32Fallback => {
                warn!(
                    "Unknown scalar type '{}' for property '{}', decoding as float32",
                    type_token, name
                );
                ScalarType::Float32
            }
            UnknownScalarPolicy::Reject => {
                return Err(FormatError::UnknownScalarType {
                    ty: type_token.to_string(),
                    name,
                });
            }
        },
    };

    Ok(PropertyDescriptor {
        name,
        scalar,
        is_list,
    })
}
