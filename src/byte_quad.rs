//! Groups of four bytes that are read as unsigned 32 bit numbers in either byte order.
//!
//! The four stored bytes are the single source of truth. The byte order only
//! changes how they are interpreted, never how they are stored.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order used to interpret multi-byte numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    #[default]
    Little,
}

impl Endianness {
    pub fn from_big_endian(big_endian: bool) -> Self {
        if big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    pub fn is_big_endian(self) -> bool {
        self == Endianness::Big
    }
}

/// Four bytes in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteQuad {
    bytes: [u8; 4],
}

impl ByteQuad {
    /// Creates a quad from four bytes in storage order.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        ByteQuad {
            bytes: [a, b, c, d],
        }
    }

    /// Creates a quad from four signed bytes given in order of significance
    /// (`[most significant, .., least significant]`).
    ///
    /// With [`Endianness::Big`] the bytes are stored in the given order,
    /// with [`Endianness::Little`] in exactly the reverse order.
    pub fn from_signed(significance_order: [i8; 4], endianness: Endianness) -> Self {
        let [big, bigish, lowish, low] = significance_order.map(|b| b as u8);
        match endianness {
            Endianness::Big => ByteQuad::new(big, bigish, lowish, low),
            Endianness::Little => ByteQuad::new(low, lowish, bigish, big),
        }
    }

    /// Encodes a 32 bit unsigned number in the given byte order.
    pub fn from_u32(value: u32, endianness: Endianness) -> Self {
        let mut bytes = [0u8; 4];
        match endianness {
            Endianness::Big => BigEndian::write_u32(&mut bytes, value),
            Endianness::Little => LittleEndian::write_u32(&mut bytes, value),
        }
        ByteQuad { bytes }
    }

    /// Reads the four bytes starting at `index`, `None` if fewer than four bytes remain.
    pub fn read_at(bytes: &[u8], index: usize) -> Option<Self> {
        let end = index.checked_add(4)?;
        let slice = bytes.get(index..end)?;
        Some(ByteQuad::new(slice[0], slice[1], slice[2], slice[3]))
    }

    /// Interprets the stored bytes as an unsigned number in the given byte order.
    pub fn value(&self, endianness: Endianness) -> u32 {
        match endianness {
            Endianness::Big => BigEndian::read_u32(&self.bytes),
            Endianness::Little => LittleEndian::read_u32(&self.bytes),
        }
    }

    /// The four bytes in storage order.
    pub fn bytes(&self) -> [u8; 4] {
        self.bytes
    }
}

/// Concatenates the quads to one byte sequence.
pub fn quads_to_bytes(quads: &[ByteQuad]) -> Vec<u8> {
    quads.iter().flat_map(|quad| quad.bytes()).collect()
}

/// Splits the bytes into consecutive quads.
///
/// A trailing remainder of fewer than four bytes is ignored.
pub fn bytes_to_quads(bytes: &[u8]) -> Vec<ByteQuad> {
    bytes
        .chunks_exact(4)
        .map(|chunk| ByteQuad::new(chunk[0], chunk[1], chunk[2], chunk[3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES_00000000: ByteQuad = ByteQuad::new(0, 0, 0, 0);
    const BYTES_FFFFFFFF: ByteQuad = ByteQuad::new(0xFF, 0xFF, 0xFF, 0xFF);
    const BYTES_FFFF0000: ByteQuad = ByteQuad::new(0xFF, 0xFF, 0, 0);
    const BYTES_0000FFFF: ByteQuad = ByteQuad::new(0, 0, 0xFF, 0xFF);
    const BYTES_12345678: ByteQuad = ByteQuad::new(0x12, 0x34, 0x56, 0x78);
    const BYTES_78563412: ByteQuad = ByteQuad::new(0x78, 0x56, 0x34, 0x12);

    #[test]
    fn test_value() {
        assert_eq!(BYTES_00000000.value(Endianness::Big), 0);
        assert_eq!(BYTES_00000000.value(Endianness::Little), 0);

        assert_eq!(BYTES_FFFFFFFF.value(Endianness::Big), 0xFFFF_FFFF);
        assert_eq!(BYTES_FFFFFFFF.value(Endianness::Little), 0xFFFF_FFFF);

        assert_eq!(BYTES_FFFF0000.value(Endianness::Little), 0x0000_FFFF);
        assert_eq!(BYTES_FFFF0000.value(Endianness::Big), 0xFFFF_0000);

        assert_eq!(BYTES_12345678.value(Endianness::Big), 0x1234_5678);
        assert_eq!(BYTES_12345678.value(Endianness::Little), 0x7856_3412);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(ByteQuad::from_u32(0x0000_FFFF, Endianness::Big), BYTES_0000FFFF);
        assert_eq!(ByteQuad::from_u32(0x0000_FFFF, Endianness::Little), BYTES_FFFF0000);
        assert_eq!(ByteQuad::from_u32(0x1234_5678, Endianness::Big), BYTES_12345678);
        assert_eq!(ByteQuad::from_u32(0x1234_5678, Endianness::Little), BYTES_78563412);
        assert_eq!(ByteQuad::from_u32(0x7856_3412, Endianness::Big), BYTES_78563412);
        assert_eq!(ByteQuad::from_u32(0x7856_3412, Endianness::Little), BYTES_12345678);
    }

    #[test]
    fn test_from_signed() {
        let significance = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(ByteQuad::from_signed(significance, Endianness::Big), BYTES_12345678);
        assert_eq!(ByteQuad::from_signed(significance, Endianness::Little), BYTES_78563412);
        assert_eq!(ByteQuad::from_signed([-1, -1, 0, 0], Endianness::Big), BYTES_FFFF0000);

        // the construction order does not influence later interpretation
        let quad = ByteQuad::from_signed(significance, Endianness::Little);
        assert_eq!(quad.value(Endianness::Little), 0x1234_5678);
        assert_eq!(quad.value(Endianness::Big), 0x7856_3412);
    }

    #[test]
    fn test_read_at() {
        let bytes = [0u8, 1, 2, 3, 4, 5];
        assert_eq!(ByteQuad::read_at(&bytes, 0), Some(ByteQuad::new(0, 1, 2, 3)));
        assert_eq!(ByteQuad::read_at(&bytes, 2), Some(ByteQuad::new(2, 3, 4, 5)));
        assert_eq!(ByteQuad::read_at(&bytes, 3), None);
        assert_eq!(ByteQuad::read_at(&bytes, usize::MAX), None);
    }

    #[test]
    fn test_bytes_to_quads() {
        for i in 0..=20 {
            assert_eq!(bytes_to_quads(&vec![0u8; i]).len(), i / 4);
        }

        let bytes = [0u8, 0, 0, 0, 1, 2, 3, 4, 0xFF, 0xFE, 0xFD, 0xFC];
        let big: Vec<u32> = bytes_to_quads(&bytes)
            .iter()
            .map(|q| q.value(Endianness::Big))
            .collect();
        let little: Vec<u32> = bytes_to_quads(&bytes)
            .iter()
            .map(|q| q.value(Endianness::Little))
            .collect();
        assert_eq!(big, vec![0, 16909060, 4294901244]);
        assert_eq!(little, vec![0, 67305985, 4244504319]);
    }

    #[test]
    fn test_quads_to_bytes() {
        let quads = [BYTES_12345678, BYTES_0000FFFF];
        assert_eq!(
            quads_to_bytes(&quads),
            vec![0x12, 0x34, 0x56, 0x78, 0, 0, 0xFF, 0xFF]
        );
        assert_eq!(bytes_to_quads(&quads_to_bytes(&quads)), quads.to_vec());
    }

    #[test]
    fn test_endianness_flag() {
        assert_eq!(Endianness::from_big_endian(true), Endianness::Big);
        assert_eq!(Endianness::from_big_endian(false), Endianness::Little);
        assert!(Endianness::Big.is_big_endian());
        assert_eq!(Endianness::default(), Endianness::Little);
    }
}
