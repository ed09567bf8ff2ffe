// src/image_types/dsk.rs
use crate::convert;
use crate::disk_formats::{self, floppy_3_5inch_mac::{DATA_BYTES, TAG_BYTES}, DiskFormat};
use crate::gcr::{LogicalSector, LOGICAL_SECTOR_SIZE};
use crate::image_types::SectorSource;
use crate::{FormatHandler, Geometry};
use anyhow::{anyhow, Result};
use std::path::Path;

/// Raw sector dump: 512-byte blocks, no header and no tag bytes.
pub struct DskHandler {
    data: Vec<u8>,
}

impl DskHandler {
    pub fn new(data: Vec<u8>) -> Self {
        DskHandler { data }
    }

    fn infer_geometry(&self) -> Result<&'static DiskFormat> {
        disk_formats::infer_format(self.data.len()).ok_or_else(|| {
            anyhow!(
                "No suitable geometry found for file size {} bytes. Expected 409600 (400K) or 819200 (800K).",
                self.data.len()
            )
        })
    }
}

impl SectorSource for DskHandler {
    fn format(&self) -> Result<&'static DiskFormat> {
        self.infer_geometry()
    }

    fn logical_sector(&self, index: usize) -> Result<LogicalSector> {
        let start = index * DATA_BYTES;
        let chunk = self
            .data
            .get(start..start + DATA_BYTES)
            .ok_or_else(|| anyhow!("Sector {} lies beyond the end of the image ({} bytes)", index, self.data.len()))?;
        // no tags in a raw dump, they stay zero
        let mut sector = [0u8; LOGICAL_SECTOR_SIZE];
        sector[TAG_BYTES..].copy_from_slice(chunk);
        Ok(sector)
    }
}

impl FormatHandler for DskHandler {
    fn display(&self, ascii: bool) -> Result<String> {
        let format = self.infer_geometry()?;
        let mut output = vec![format!("Raw DSK: {} bytes", self.data.len())];
        output.push(crate::core::display(self, format, ascii)?);
        Ok(output.join("\n"))
    }

    fn convert(&self, output_path: &Path, geometry: Geometry, validate: bool) -> Result<()> {
        let format = geometry.resolve(self.infer_geometry())?;
        if format.total_size() != self.data.len() {
            return Err(anyhow!(
                "Geometry {} ({} bytes) does not match file size ({} bytes)",
                format.name,
                format.total_size(),
                self.data.len()
            ));
        }
        convert::write_mac(self, format, output_path, validate)
    }

    fn geometry(&self) -> Result<Option<Geometry>> {
        let format = self.infer_geometry()?;
        Ok(Some(Geometry::Manual { sides: format.sides }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_gets_zero_tags() {
        let mut data = vec![0u8; 409_600];
        data[512..1024].fill(0x42);
        let dsk = DskHandler::new(data);
        assert_eq!(dsk.format().unwrap(), &disk_formats::MAC_400K);
        let sec = dsk.logical_sector(1).unwrap();
        assert!(sec[..12].iter().all(|&b| b == 0));
        assert!(sec[12..].iter().all(|&b| b == 0x42));
        assert!(dsk.logical_sector(800).is_err());
    }

    #[test]
    fn odd_size_is_rejected() {
        let dsk = DskHandler::new(vec![0u8; 1000]);
        assert!(dsk.format().is_err());
    }
}
