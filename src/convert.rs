// src/convert.rs
use crate::disk_formats::DiskFormat;
use crate::gcr::{encode_sector, SectorAddress, SectorRecord};
use crate::image_types::mac::read_address;
use crate::image_types::SectorSource;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Nibblize every sector of `source` into consecutive 1024-byte records.
pub fn nibblize_image<S: SectorSource + ?Sized>(source: &S, format: &DiskFormat) -> Result<Vec<u8>> {
    let mut raw_data = Vec::with_capacity(format.encoded_size());
    let mut record = SectorRecord::new();
    let mut last_track = None;
    for (index, (track, side, sector)) in format.sector_order().enumerate() {
        if last_track != Some((track, side)) {
            debug!("Writing Track {}, Side {}", track, side);
            last_track = Some((track, side));
        }
        let dat = source.logical_sector(index)?;
        let addr = SectorAddress::new(track, side, sector, format.format_byte)?;
        record.init();
        encode_sector(&dat, &mut record, &addr)?;
        raw_data.extend_from_slice(record.as_bytes());
    }
    Ok(raw_data)
}

/// Check that a nibblized image has the right size and every record carries the expected address.
pub fn validate_mac(data: &[u8], format: &DiskFormat) -> Result<()> {
    if data.len() != format.encoded_size() {
        return Err(anyhow!(
            "Validation failed: Output size {} does not match expected size {}",
            data.len(),
            format.encoded_size()
        ));
    }
    let records = data.chunks_exact(crate::gcr::SECTOR_RECORD_SIZE);
    for (n, (record, (track, side, sector))) in records.zip(format.sector_order()).enumerate() {
        let addr = read_address(record).with_context(|| format!("Validation failed at record {}", n))?;
        if (addr.track, addr.side, addr.sector, addr.format) != (track, side, sector, format.format_byte) {
            return Err(anyhow!(
                "Validation failed: record {} holds track {} side {} sector {}, expected track {} side {} sector {}",
                n, addr.track, addr.side, addr.sector, track, side, sector
            ));
        }
    }
    Ok(())
}

/// Convert `source` to a `.mac` file at `output_path`.
pub fn write_mac<S: SectorSource + ?Sized>(source: &S, format: &DiskFormat, output_path: &Path, validate: bool) -> Result<()> {
    let raw_data = nibblize_image(source, format)?;
    let mut file = File::create(output_path).with_context(|| format!("Cannot create {}", output_path.display()))?;
    file.write_all(&raw_data)?;
    info!("Converted {} sectors to MAC: {} bytes written", format.total_sectors(), raw_data.len());

    if validate {
        let output_data = fs::read(output_path)?;
        validate_mac(&output_data, format)?;
        println!("Validation passed: {} records match expected geometry", format.total_sectors());
    }
    Ok(())
}
