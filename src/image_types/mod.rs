// src/image_types/mod.rs

pub mod dc42;
pub mod dsk;
pub mod mac;

use crate::disk_formats::DiskFormat;
use crate::gcr::LogicalSector;
use anyhow::Result;

/// An image that can hand out 524-byte logical sectors in track/side/sector order.
pub trait SectorSource {
    fn format(&self) -> Result<&'static DiskFormat>;
    /// Tag bytes followed by data bytes for the `index`th sector of the image.
    fn logical_sector(&self, index: usize) -> Result<LogicalSector>;
}
