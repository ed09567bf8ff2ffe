// src/image_types/mac.rs
use crate::disk_formats::{self, DiskFormat};
use crate::gcr::template::{ADDRESS_EPILOG_OFFSET, ADDRESS_PROLOG, ADDRESS_PROLOG_OFFSET, DATA_PROLOG, DATA_PROLOG_OFFSET, EPILOG};
use crate::gcr::{decode_62, SectorAddress, SECTOR_RECORD_SIZE};
use crate::{FormatHandler, Geometry};
use anyhow::{anyhow, Result};
use std::path::Path;

/// Read back the address field of one nibblized record.
/// Checks the prolog, epilog and checksum; the data field is left alone.
pub fn read_address(record: &[u8]) -> Result<SectorAddress> {
    if record.len() < SECTOR_RECORD_SIZE {
        return Err(anyhow!("Record is {} bytes, expected {}", record.len(), SECTOR_RECORD_SIZE));
    }
    if record[ADDRESS_PROLOG_OFFSET..ADDRESS_PROLOG_OFFSET + 3] != ADDRESS_PROLOG {
        return Err(anyhow!("Address prolog not found"));
    }
    if record[ADDRESS_EPILOG_OFFSET..ADDRESS_EPILOG_OFFSET + 2] != EPILOG {
        return Err(anyhow!("Address epilog not found"));
    }
    if record[DATA_PROLOG_OFFSET..DATA_PROLOG_OFFSET + 3] != DATA_PROLOG {
        return Err(anyhow!("Data prolog not found"));
    }
    let mut fields = [0u8; 5];
    for (i, f) in fields.iter_mut().enumerate() {
        let byte = record[ADDRESS_PROLOG_OFFSET + 3 + i];
        *f = decode_62(byte).ok_or_else(|| anyhow!("Invalid disk byte {:#04x} in address field", byte))?;
    }
    let [track_low, sector, track_high, format, chksum] = fields;
    let expected = (track_low ^ sector ^ track_high ^ format) & 0x3f;
    if expected != chksum {
        return Err(anyhow!("Address checksum mismatch ({:#04x}, {:#04x})", expected, chksum));
    }
    let track = track_low | ((track_high & 0x01) << 6);
    let side = (track_high >> 5) & 0x01;
    Ok(SectorAddress::new(track, side, sector, format)?)
}

/// Nibblized image: one 1024-byte physical record per sector.
pub struct MacHandler {
    data: Vec<u8>,
}

impl MacHandler {
    pub fn new(data: Vec<u8>) -> Self {
        MacHandler { data }
    }

    fn infer_geometry(&self) -> Result<&'static DiskFormat> {
        [&disk_formats::MAC_400K, &disk_formats::MAC_800K]
            .into_iter()
            .find(|f| f.encoded_size() == self.data.len())
            .ok_or_else(|| anyhow!("No suitable geometry found for file size {} bytes", self.data.len()))
    }

    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(SECTOR_RECORD_SIZE)
    }
}

impl FormatHandler for MacHandler {
    fn display(&self, ascii: bool) -> Result<String> {
        let format = self.infer_geometry()?;
        let mut output = vec![
            format!("Nibblized MAC: {} bytes", self.data.len()),
            format!("Detected Format: {}\nGeometry: 80 tracks, {} sides, {} sectors", format.name, format.sides, format.total_sectors()),
        ];
        if ascii {
            for (n, record) in self.records().enumerate() {
                match read_address(record) {
                    Ok(addr) => output.push(format!(
                        "Record {}: Track {}, Side {}, Sector {}, Format {:#04x}",
                        n, addr.track, addr.side, addr.sector, addr.format
                    )),
                    Err(e) => output.push(format!("Record {}: {}", n, e)),
                }
            }
        }
        Ok(output.join("\n"))
    }

    fn convert(&self, _output_path: &Path, _geometry: Geometry, _validate: bool) -> Result<()> {
        Err(anyhow!("Conversion from MAC is not supported"))
    }

    fn geometry(&self) -> Result<Option<Geometry>> {
        let format = self.infer_geometry()?;
        Ok(Some(Geometry::Manual { sides: format.sides }))
    }
}
