//! Structured-vs-raw buffer detection.

const PLY_MARKER: &[u8] = b"ply";

/// Returns true if the buffer starts with the `ply` magic within the first
/// `window` bytes. A buffer too short to hold the marker is not structured.
pub fn is_structured(bytes: &[u8], window: usize) -> bool {
    let head = &bytes[..bytes.len().min(window)];
    head.starts_with(PLY_MARKER)
}
