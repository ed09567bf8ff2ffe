// src/gcr/mod.rs
//! ## Sony 3.5 inch GCR module
//!
//! 6-and-2 group coded recording as written by the Macintosh 3.5" drive.
//! Every byte that lands in an address or data field is one of the 64 entries
//! of `DISK_BYTES_62`, all of which have the high bit set.

pub mod encoder;
pub mod nibblize;
pub mod template;

use thiserror::Error;

pub use encoder::{encode_sector, SectorAddress, FORMAT_DOUBLE_SIDED, FORMAT_SINGLE_SIDED};
pub use nibblize::{checksum, nibblize, ChecksumState};
pub use template::{SectorRecord, DATA_FIELD_NIBS, LOGICAL_SECTOR_SIZE, SECTOR_RECORD_SIZE};

/// One sector as it sits in the source image: 12 tag bytes then 512 data bytes.
pub type LogicalSector = [u8; LOGICAL_SECTOR_SIZE];

pub const DISK_BYTES_62: [u8; 64] = [
    0x96, 0x97, 0x9a, 0x9b, 0x9d, 0x9e, 0x9f, 0xa6,
    0xa7, 0xab, 0xac, 0xad, 0xae, 0xaf, 0xb2, 0xb3,
    0xb4, 0xb5, 0xb6, 0xb7, 0xb9, 0xba, 0xbb, 0xbc,
    0xbd, 0xbe, 0xbf, 0xcb, 0xcd, 0xce, 0xcf, 0xd3,
    0xd6, 0xd7, 0xd9, 0xda, 0xdb, 0xdc, 0xdd, 0xde,
    0xdf, 0xe5, 0xe6, 0xe7, 0xe9, 0xea, 0xeb, 0xec,
    0xed, 0xee, 0xef, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6,
    0xf7, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe, 0xff,
];

/// Errors raised when the caller breaks an encoding precondition.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("output buffer holds {available} bytes but {needed} are required")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("track {0} is outside 0-79")]
    TrackOutOfRange(u8),
    #[error("side {0} is outside 0-1")]
    SideOutOfRange(u8),
    #[error("sector {sector} does not exist on track {track} ({count} sectors)")]
    SectorOutOfRange { track: u8, sector: u8, count: u8 },
    #[error("format byte {0:#04x} does not fit in 6 bits")]
    FormatOutOfRange(u8),
}

/// Translate a 6-bit value to its disk byte. Panics if `value` exceeds 0x3f.
pub fn encode_62(value: u8) -> u8 {
    assert!(value < 0x40, "6-2 value {:#04x} out of range", value);
    DISK_BYTES_62[value as usize]
}

/// Inverse of `encode_62`, `None` if `byte` is not a valid disk byte.
pub fn decode_62(byte: u8) -> Option<u8> {
    DISK_BYTES_62.iter().position(|&b| b == byte).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_bytes_are_distinct_with_high_bit() {
        for (i, a) in DISK_BYTES_62.iter().enumerate() {
            assert!(a & 0x80 != 0, "entry {} = {:#04x}", i, a);
            for b in &DISK_BYTES_62[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn table_is_ascending() {
        assert!(DISK_BYTES_62.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(DISK_BYTES_62[0], 0x96);
        assert_eq!(DISK_BYTES_62[0x22], 0xd9);
        assert_eq!(DISK_BYTES_62[63], 0xff);
    }

    #[test]
    fn decode_inverts_encode() {
        for v in 0..64u8 {
            assert_eq!(decode_62(encode_62(v)), Some(v));
        }
        assert_eq!(decode_62(0xd5), None);
        assert_eq!(decode_62(0xaa), None);
        assert_eq!(decode_62(0x00), None);
    }

    #[test]
    #[should_panic]
    fn encode_rejects_wide_values() {
        encode_62(0x40);
    }
}
