//! Vertex body decoding for ASCII and binary PLY.

use crate::config::LoaderConfig;
use crate::error::FormatError;
use crate::ply::header::HeaderSchema;
use crate::ply::scalar::Endianness;
use crate::types::PointSet;
use tracing::{debug, trace};

/// Decode the vertex element described by `schema` from `bytes`.
pub fn decode_points(
    bytes: &[u8],
    schema: &HeaderSchema,
    config: &LoaderConfig,
) -> Result<PointSet, FormatError> {
    let fields = FieldMap::resolve(schema)?;
    if fields.color.is_none() {
        debug!(
            "No color properties declared, using default color {:?}",
            config.default_color
        );
    }

    match schema.encoding.byte_order() {
        None => decode_text(bytes, schema, &fields, config),
        Some(order) => decode_binary(bytes, schema, &fields, order, config),
    }
}

/// Property indices the decoder cares about.
struct FieldMap {
    position: [usize; 3],
    color: Option<[usize; 3]>,
}

impl FieldMap {
    fn resolve(schema: &HeaderSchema) -> Result<Self, FormatError> {
        Ok(Self {
            position: schema
                .position_indices()
                .ok_or(FormatError::MissingPositionProperties)?,
            color: schema.color_indices(),
        })
    }
}

/// PLY colors are stored as 0-255 channel values. Non-finite values map to 0.
fn normalize_channel(value: f64) -> f32 {
    let channel = value as f32 / 255.0;
    if !channel.is_finite() {
        return 0.0;
    }
    channel.clamp(0.0, 1.0)
}

fn decode_text(
    bytes: &[u8],
    schema: &HeaderSchema,
    fields: &FieldMap,
    config: &LoaderConfig,
) -> Result<PointSet, FormatError> {
    let data_offset = schema.data_offset.min(bytes.len());
    let body = String::from_utf8_lossy(&bytes[data_offset..]);
    let property_count = schema.properties.len();
    // File line number of the first body line, for error messages.
    let first_line = bytes[..data_offset].iter().filter(|&&b| b == b'\n').count() + 1;

    // The declared count is untrusted; every vertex needs at least two body bytes.
    let mut points = PointSet::with_capacity(schema.element_count.min(body.len() / 2));

    for (index, line) in body.lines().enumerate() {
        let line_no = first_line + index;
        if points.count() == schema.element_count {
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < property_count {
            debug!(
                "Skipping vertex line {}: {} values, expected {}",
                line_no,
                tokens.len(),
                property_count
            );
            continue;
        }

        let value = |index: usize| -> Result<f64, FormatError> {
            tokens[index]
                .parse::<f64>()
                .map_err(|_| FormatError::InvalidValue {
                    line: line_no,
                    token: tokens[index].to_string(),
                })
        };

        let [ix, iy, iz] = fields.position;
        let position = [value(ix)? as f32, value(iy)? as f32, value(iz)? as f32];
        let color = match fields.color {
            Some([ir, ig, ib]) => [
                normalize_channel(value(ir)?),
                normalize_channel(value(ig)?),
                normalize_channel(value(ib)?),
            ],
            None => config.default_color,
        };
        points.push(position, color);
    }

    if points.count() < schema.element_count {
        return Err(FormatError::TruncatedVertexData {
            expected: schema.element_count,
            actual: points.count(),
        });
    }

    Ok(points)
}

fn decode_binary(
    bytes: &[u8],
    schema: &HeaderSchema,
    fields: &FieldMap,
    order: Endianness,
    config: &LoaderConfig,
) -> Result<PointSet, FormatError> {
    let stride = schema.stride();
    let expected = schema
        .element_count
        .checked_mul(stride)
        .and_then(|body| body.checked_add(schema.data_offset))
        .unwrap_or(usize::MAX);
    if bytes.len() < expected {
        return Err(FormatError::TruncatedVertexData {
            expected,
            actual: bytes.len(),
        });
    }

    trace!("Binary vertex stride: {} bytes", stride);

    let mut points = PointSet::with_capacity(schema.element_count);
    let mut record = schema.data_offset;

    for _ in 0..schema.element_count {
        let mut position = [0.0f32; 3];
        let mut color = config.default_color;
        let mut offset = record;

        // Every field is decoded so the offset advances even for unused properties.
        for (index, property) in schema.properties.iter().enumerate() {
            let value = property.scalar.decode(bytes, offset, order);
            offset += property.scalar.width();

            if let Some(axis) = fields.position.iter().position(|&i| i == index) {
                position[axis] = value as f32;
            }
            if let Some(channel) = fields
                .color
                .and_then(|c| c.iter().position(|&i| i == index))
            {
                color[channel] = normalize_channel(value);
            }
        }

        points.push(position, color);
        record += stride;
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::header::parse_header;

    fn decode(bytes: &[u8]) -> Result<PointSet, FormatError> {
        let config = LoaderConfig::default();
        let schema = parse_header(bytes, &config)?;
        decode_points(bytes, &schema, &config)
    }

    fn binary_le_xyz_rgb(records: &[([f32; 3], [u8; 3])]) -> Vec<u8> {
        let mut bytes = format!(
            "ply\nformat binary_little_endian 1.0\nelement vertex {}\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n",
            records.len()
        )
        .into_bytes();
        for (pos, rgb) in records {
            for v in pos {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
            bytes.extend_from_slice(rgb);
        }
        bytes
    }

    #[test]
    fn test_binary_two_records() {
        let bytes = binary_le_xyz_rgb(&[
            ([1.0, 2.0, 3.0], [255, 0, 51]),
            ([-0.5, 0.25, 100.0], [0, 128, 255]),
        ]);
        let points = decode(&bytes).unwrap();

        assert_eq!(points.count(), 2);
        assert_eq!(points.positions(), &[[1.0, 2.0, 3.0], [-0.5, 0.25, 100.0]]);
        assert_eq!(points.colors()[0], [1.0, 0.0, 51.0 / 255.0]);
        assert_eq!(points.colors()[1], [0.0, 128.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_binary_big_endian_mixed_types() {
        let mut bytes = b"ply\nformat binary_big_endian 1.0\nelement vertex 1\nproperty double x\nproperty short y\nproperty int z\nproperty ushort intensity\nproperty uchar r\nproperty uchar g\nproperty uchar b\nend_header\n".to_vec();
        bytes.extend_from_slice(&2.5f64.to_be_bytes());
        bytes.extend_from_slice(&(-7i16).to_be_bytes());
        bytes.extend_from_slice(&70000i32.to_be_bytes());
        bytes.extend_from_slice(&999u16.to_be_bytes());
        bytes.extend_from_slice(&[0, 255, 0]);

        let points = decode(&bytes).unwrap();
        assert_eq!(points.positions(), &[[2.5, -7.0, 70000.0]]);
        assert_eq!(points.colors(), &[[0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_binary_without_color_is_white() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty float nx\nend_header\n".to_vec();
        for v in [1.0f32, 2.0, 3.0, 9.0, 4.0, 5.0, 6.0, 9.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let points = decode(&bytes).unwrap();
        assert_eq!(points.positions(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert!(points.colors().iter().all(|c| *c == [1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_binary_prefers_red_over_r() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nproperty uchar r\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n".to_vec();
        for v in [0.0f32, 0.0, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&[10, 255, 0, 0]);
        let points = decode(&bytes).unwrap();
        assert_eq!(points.colors(), &[[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_binary_truncated() {
        let mut bytes = binary_le_xyz_rgb(&[([1.0, 2.0, 3.0], [1, 2, 3]); 3]);
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::TruncatedVertexData { .. })
        ));
    }

    #[test]
    fn test_text_decode_with_colors() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n0 1 2 255 0 0\n-1.5 2e2 3 0 255 51\n";
        let points = decode(text.as_bytes()).unwrap();
        assert_eq!(points.positions(), &[[0.0, 1.0, 2.0], [-1.5, 200.0, 3.0]]);
        assert_eq!(points.colors()[0], [1.0, 0.0, 0.0]);
        assert_eq!(points.colors()[1], [0.0, 1.0, 51.0 / 255.0]);
    }

    #[test]
    fn test_text_skips_blank_and_short_lines() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n\n1 2\n1 2 3\n\n   \n4 5 6\n7 8 9\n";
        let points = decode(text.as_bytes()).unwrap();
        assert_eq!(points.count(), 2);
        assert_eq!(points.positions(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert!(points.colors().iter().all(|c| *c == [1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_text_short_single_letter_colors() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nproperty uchar r\nproperty uchar g\nproperty uchar b\nend_header\n1 1 1 0 0 255\n";
        let points = decode(text.as_bytes()).unwrap();
        assert_eq!(points.colors(), &[[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_text_too_few_lines() {
        let text = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n";
        assert_eq!(
            decode(text.as_bytes()),
            Err(FormatError::TruncatedVertexData {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_text_invalid_number() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 two 3\n";
        assert_eq!(
            decode(text.as_bytes()),
            Err(FormatError::InvalidValue {
                line: 8,
                token: "two".to_string()
            })
        );
    }

    #[test]
    fn test_text_invalid_number_after_blank_lines() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n\n\n1 2 3\n4 x 6\n";
        assert_eq!(
            decode(text.as_bytes()),
            Err(FormatError::InvalidValue {
                line: 11,
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_text_huge_vertex_count() {
        let text = format!(
            "ply\nformat ascii 1.0\nelement vertex {}\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n",
            usize::MAX
        );
        assert_eq!(
            decode(text.as_bytes()),
            Err(FormatError::TruncatedVertexData {
                expected: usize::MAX,
                actual: 1
            })
        );

        let large = text.replace(&usize::MAX.to_string(), "100000000000");
        assert!(matches!(
            decode(large.as_bytes()),
            Err(FormatError::TruncatedVertexData { actual: 1, .. })
        ));
    }

    #[test]
    fn test_text_non_finite_colors_stay_in_range() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n1 2 3 nan 0 0\n1 2 3 inf -inf 255\n";
        let points = decode(text.as_bytes()).unwrap();
        assert_eq!(points.colors(), &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_binary_non_finite_colors_stay_in_range() {
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nproperty float red\nproperty double green\nproperty float blue\nend_header\n".to_vec();
        for v in [1.0f32, 2.0, 3.0, f32::NAN] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&f64::INFINITY.to_le_bytes());
        bytes.extend_from_slice(&127.5f32.to_le_bytes());

        let points = decode(&bytes).unwrap();
        let color = points.colors()[0];
        assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(color, [0.0, 0.0, 0.5]);
    }
}
