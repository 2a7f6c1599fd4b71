//! PLY encoding for point sets.
//!
//! Output always uses `float` positions and `uchar` colors, the layout most
//! point cloud tools expect.

use crate::ply::header::Encoding;
use crate::ply::scalar::Endianness;
use crate::types::PointSet;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt::Write;

/// Encode `points` as a PLY file with the given body encoding.
pub fn encode_ply(points: &PointSet, encoding: Encoding) -> Vec<u8> {
    let mut out = header(points.count(), encoding).into_bytes();

    match encoding.byte_order() {
        None => {
            let mut body = String::with_capacity(points.count() * 32);
            for (p, c) in points.positions().iter().zip(points.colors()) {
                let [r, g, b] = c.map(denormalize_channel);
                // Writing into a String is infallible.
                let _ = writeln!(body, "{} {} {} {} {} {}", p[0], p[1], p[2], r, g, b);
            }
            out.extend_from_slice(body.as_bytes());
        }
        Some(Endianness::Little) => write_binary::<LittleEndian>(&mut out, points),
        Some(Endianness::Big) => write_binary::<BigEndian>(&mut out, points),
    }

    out
}

fn header(count: usize, encoding: Encoding) -> String {
    format!(
        "ply\n\
         format {} 1.0\n\
         element vertex {}\n\
         property float x\n\
         property float y\n\
         property float z\n\
         property uchar red\n\
         property uchar green\n\
         property uchar blue\n\
         end_header\n",
        encoding.as_token(),
        count
    )
}

fn write_binary<B: ByteOrder>(out: &mut Vec<u8>, points: &PointSet) {
    out.reserve(points.count() * 15);
    let mut buf = [0u8; 4];
    for (p, c) in points.positions().iter().zip(points.colors()) {
        for v in p {
            B::write_f32(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        out.extend_from_slice(&c.map(denormalize_channel));
    }
}

fn denormalize_channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
