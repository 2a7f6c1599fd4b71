//! Raw point buffers: packed little-endian `f32` groups of
//! `x, y, z, r, g, b` with colors already in the 0-1 range.

use crate::types::PointSet;
use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

/// Floats per raw point record.
pub const RAW_RECORD_FLOATS: usize = 6;

const RAW_RECORD_BYTES: usize = RAW_RECORD_FLOATS * 4;

/// Decode a raw buffer. Returns `None` when it holds no complete record.
///
/// Incomplete trailing data is dropped with a warning.
pub fn decode_raw(bytes: &[u8]) -> Option<PointSet> {
    if bytes.len() % 4 != 0 {
        warn!(
            "Raw buffer length {} is not a multiple of 4, ignoring {} trailing bytes",
            bytes.len(),
            bytes.len() % 4
        );
    }

    let total_floats = bytes.len() / 4;
    let count = total_floats / RAW_RECORD_FLOATS;
    let remainder = total_floats % RAW_RECORD_FLOATS;
    if remainder != 0 {
        warn!(
            "Raw buffer holds {} floats, not a multiple of {}; dropping {} trailing floats",
            total_floats, RAW_RECORD_FLOATS, remainder
        );
    }

    if count == 0 {
        return None;
    }

    let mut floats = vec![0.0f32; count * RAW_RECORD_FLOATS];
    LittleEndian::read_f32_into(&bytes[..count * RAW_RECORD_BYTES], &mut floats);

    let mut points = PointSet::with_capacity(count);
    for record in floats.chunks_exact(RAW_RECORD_FLOATS) {
        points.push(
            [record[0], record[1], record[2]],
            [record[3], record[4], record[5]],
        );
    }
    Some(points)
}

/// Encode a point set in the raw layout read by [`decode_raw`].
pub fn encode_raw(points: &PointSet) -> Vec<u8> {
    let floats: Vec<f32> = points
        .positions()
        .iter()
        .zip(points.colors())
        .flat_map(|(p, c)| p.iter().chain(c.iter()).copied())
        .collect();

    let mut out = vec![0u8; floats.len() * 4];
    LittleEndian::write_f32_into(&floats, &mut out);
    out
}
