//! PLY header parsing, vertex decoding and encoding

mod decoder;
mod header;
mod scalar;
mod sniff;
mod writer;

pub use decoder::decode_points;
pub use header::{Encoding, HeaderSchema, PropertyDescriptor, parse_header};
pub use scalar::{Endianness, ScalarType};
pub use sniff::is_structured;
pub use writer::encode_ply;
