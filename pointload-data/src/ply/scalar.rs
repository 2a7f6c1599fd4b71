//! Fixed-width scalar decoding for binary PLY bodies.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a binary PLY body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Scalar property types a PLY header can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
}

impl ScalarType {
    /// Look up a header type name. Both the classic (`uchar`) and sized
    /// (`uint8`) spellings are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "float" | "float32" => ScalarType::Float32,
            "double" | "float64" => ScalarType::Float64,
            "char" | "int8" => ScalarType::Int8,
            "uchar" | "uint8" => ScalarType::UInt8,
            "short" | "int16" => ScalarType::Int16,
            "ushort" | "uint16" => ScalarType::UInt16,
            "int" | "int32" => ScalarType::Int32,
            "uint" | "uint32" => ScalarType::UInt32,
            _ => return None,
        };
        Some(ty)
    }

    /// Size in bytes of one value.
    pub const fn width(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Float32 | ScalarType::Int32 | ScalarType::UInt32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Decode the value stored at `bytes[offset..offset + self.width()]`.
    ///
    /// The caller guarantees the range is in bounds. Every supported type
    /// converts to `f64` without loss.
    pub fn decode(self, bytes: &[u8], offset: usize, order: Endianness) -> f64 {
        let field = &bytes[offset..offset + self.width()];
        match order {
            Endianness::Little => self.read::<LittleEndian>(field),
            Endianness::Big => self.read::<BigEndian>(field),
        }
    }

    fn read<B: ByteOrder>(self, field: &[u8]) -> f64 {
        match self {
            ScalarType::Float32 => B::read_f32(field) as f64,
            ScalarType::Float64 => B::read_f64(field),
            ScalarType::Int8 => field[0] as i8 as f64,
            ScalarType::UInt8 => field[0] as f64,
            ScalarType::Int16 => B::read_i16(field) as f64,
            ScalarType::UInt16 => B::read_u16(field) as f64,
            ScalarType::Int32 => B::read_i32(field) as f64,
            ScalarType::UInt32 => B::read_u32(field) as f64,
        }
    }
}
