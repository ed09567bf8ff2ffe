// src/core.rs
use crate::disk_formats::floppy_3_5inch_mac::TAG_BYTES;
use crate::disk_formats::DiskFormat;
use crate::image_types::SectorSource;
use anyhow::Result;

pub fn display<S: SectorSource + ?Sized>(source: &S, format: &DiskFormat, ascii: bool) -> Result<String> {
    let mut output = Vec::new();
    if !ascii {
        output.push(format!(
            "Detected Format: {}\nGeometry: 80 tracks, {} sides, {} sectors, format byte {:#04x}",
            format.name, format.sides, format.total_sectors(), format.format_byte
        ));
    } else {
        for (index, (track, side, sector)) in format.sector_order().enumerate() {
            let chunk = source.logical_sector(index)?;
            let ascii_str: String = chunk[TAG_BYTES..]
                .iter()
                .take(32)
                .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
                .collect();
            output.push(format!("Track {}, Side {}, Sector {}: {}", track, side, sector, ascii_str));
        }
    }
    Ok(output.join("\n"))
}
