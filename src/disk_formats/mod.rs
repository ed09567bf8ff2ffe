// src/disk_formats/mod.rs

pub mod floppy_3_5inch_mac;

pub use floppy_3_5inch_mac::{infer_format, sectors_per_track, MAC_400K, MAC_800K, TRACKS};

/// Represents a zoned GCR floppy format with its physical characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskFormat {
    pub sides: u8,
    pub format_byte: u8, // 0x22 = double sided, 0x02 = single sided
    pub name: &'static str,
}
