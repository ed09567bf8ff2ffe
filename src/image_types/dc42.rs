// src/image_types/dc42.rs
use crate::convert;
use crate::disk_formats::{self, floppy_3_5inch_mac::{DATA_BYTES, TAG_BYTES}, DiskFormat};
use crate::gcr::{LogicalSector, LOGICAL_SECTOR_SIZE};
use crate::image_types::SectorSource;
use crate::{FormatHandler, Geometry};
use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use std::io::{Cursor, Read};
use std::path::Path;

pub const HEADER_SIZE: usize = 0x54;
const HEADER_MAGIC: u16 = 0x0100;

/// Fixed DiskCopy 4.2 header. All multi-byte fields are big endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dc42Header {
    pub name: String,
    pub data_size: u32,
    pub tag_size: u32,
    pub data_checksum: u32,
    pub tag_checksum: u32,
    pub disk_format: u8, // 0 = 400K, 1 = 800K, 2 = 720K, 3 = 1440K
    pub format_byte: u8,
}

impl Dc42Header {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(anyhow!("Invalid DiskCopy image: {} bytes is shorter than the header", data.len()));
        }
        let mut cursor = Cursor::new(data);
        let name_len = (cursor.read_u8()? as usize).min(63);
        let mut name = [0u8; 63];
        cursor.read_exact(&mut name)?;
        let name = String::from_utf8_lossy(&name[..name_len]).into_owned();
        let data_size = cursor.read_u32::<BigEndian>()?;
        let tag_size = cursor.read_u32::<BigEndian>()?;
        let data_checksum = cursor.read_u32::<BigEndian>()?;
        let tag_checksum = cursor.read_u32::<BigEndian>()?;
        let disk_format = cursor.read_u8()?;
        let format_byte = cursor.read_u8()?;
        let magic = cursor.read_u16::<BigEndian>()?;
        if magic != HEADER_MAGIC {
            return Err(anyhow!("Invalid DiskCopy image: bad magic {:#06x}", magic));
        }
        let needed = HEADER_SIZE + data_size as usize + tag_size as usize;
        if data.len() < needed {
            return Err(anyhow!(
                "Truncated DiskCopy image: header declares {} bytes but file has {}",
                needed,
                data.len()
            ));
        }
        Ok(Dc42Header { name, data_size, tag_size, data_checksum, tag_checksum, disk_format, format_byte })
    }
}

/// True if `data` carries a DiskCopy 4.2 header rather than being a raw dump.
pub fn is_diskcopy(data: &[u8]) -> bool {
    disk_formats::infer_format(data.len()).is_none() && Dc42Header::parse(data).is_ok()
}

/// DiskCopy checksum: add each big endian word, then rotate right by one.
pub fn dc42_checksum(bytes: &[u8]) -> u32 {
    bytes.chunks_exact(2).fold(0u32, |sum, w| {
        sum.wrapping_add(u16::from_be_bytes([w[0], w[1]]) as u32).rotate_right(1)
    })
}

/// DiskCopy 4.2 image: header, then sector data, then 12 tag bytes per sector.
pub struct Dc42Handler {
    data: Vec<u8>,
}

impl Dc42Handler {
    pub fn new(data: Vec<u8>) -> Self {
        Dc42Handler { data }
    }

    pub fn header(&self) -> Result<Dc42Header> {
        Dc42Header::parse(&self.data)
    }

    fn sector_data(&self, header: &Dc42Header) -> &[u8] {
        &self.data[HEADER_SIZE..HEADER_SIZE + header.data_size as usize]
    }

    fn tag_data(&self, header: &Dc42Header) -> &[u8] {
        let start = HEADER_SIZE + header.data_size as usize;
        &self.data[start..start + header.tag_size as usize]
    }

    fn infer_geometry(&self) -> Result<&'static DiskFormat> {
        let header = self.header()?;
        match header.disk_format {
            0 => Ok(&disk_formats::MAC_400K),
            1 => Ok(&disk_formats::MAC_800K),
            _ => disk_formats::infer_format(header.data_size as usize).ok_or_else(|| {
                anyhow!("Unsupported DiskCopy disk format {} ({} data bytes)", header.disk_format, header.data_size)
            }),
        }
    }

    /// Tags must cover every sector or be absent altogether.
    fn check_tag_region(header: &Dc42Header, format: &DiskFormat) -> Result<()> {
        let expected = format.total_sectors() * TAG_BYTES;
        let tag_size = header.tag_size as usize;
        if tag_size != 0 && tag_size != expected {
            return Err(anyhow!(
                "DiskCopy tag region is {} bytes, expected 0 or {} for {}",
                tag_size,
                expected,
                format.name
            ));
        }
        Ok(())
    }

    /// Compare stored checksums against the payload. Mismatches are reported, not fatal.
    pub fn verify_checksums(&self) -> Result<bool> {
        let header = self.header()?;
        let data_sum = dc42_checksum(self.sector_data(&header));
        let mut ok = true;
        if data_sum != header.data_checksum {
            warn!("data checksum mismatch: stored {:08x}, computed {:08x}", header.data_checksum, data_sum);
            ok = false;
        }
        let tags = self.tag_data(&header);
        if tags.len() > TAG_BYTES {
            // the first sector's tags are left out of the sum
            let tag_sum = dc42_checksum(&tags[TAG_BYTES..]);
            if tag_sum != header.tag_checksum {
                warn!("tag checksum mismatch: stored {:08x}, computed {:08x}", header.tag_checksum, tag_sum);
                ok = false;
            }
        }
        Ok(ok)
    }
}

impl SectorSource for Dc42Handler {
    fn format(&self) -> Result<&'static DiskFormat> {
        self.infer_geometry()
    }

    fn logical_sector(&self, index: usize) -> Result<LogicalSector> {
        let header = self.header()?;
        let start = index * DATA_BYTES;
        let chunk = self
            .sector_data(&header)
            .get(start..start + DATA_BYTES)
            .ok_or_else(|| anyhow!("Sector {} lies beyond the DiskCopy data ({} bytes)", index, header.data_size))?;
        let mut sector = [0u8; LOGICAL_SECTOR_SIZE];
        let tag_start = index * TAG_BYTES;
        if let Some(tags) = self.tag_data(&header).get(tag_start..tag_start + TAG_BYTES) {
            sector[..TAG_BYTES].copy_from_slice(tags);
        }
        sector[TAG_BYTES..].copy_from_slice(chunk);
        Ok(sector)
    }
}

impl FormatHandler for Dc42Handler {
    fn display(&self, ascii: bool) -> Result<String> {
        let header = self.header()?;
        let format = self.infer_geometry()?;
        let mut output = vec![
            format!("DiskCopy 4.2: \"{}\"", header.name),
            format!(
                "Data: {} bytes, Tags: {} bytes, Disk format {}, Format byte {:#04x}",
                header.data_size, header.tag_size, header.disk_format, header.format_byte
            ),
        ];
        if !self.verify_checksums()? {
            output.push("Warning: stored checksums do not match".to_string());
        }
        output.push(crate::core::display(self, format, ascii)?);
        Ok(output.join("\n"))
    }

    fn convert(&self, output_path: &Path, geometry: Geometry, validate: bool) -> Result<()> {
        let header = self.header()?;
        let format = geometry.resolve(self.infer_geometry())?;
        if format.total_size() != header.data_size as usize {
            return Err(anyhow!(
                "Geometry {} ({} bytes) does not match DiskCopy data size ({} bytes)",
                format.name,
                format.total_size(),
                header.data_size
            ));
        }
        Self::check_tag_region(&header, format)?;
        self.verify_checksums()?;
        debug!("DiskCopy image \"{}\", {} tag bytes", header.name, header.tag_size);
        convert::write_mac(self, format, output_path, validate)
    }

    fn geometry(&self) -> Result<Option<Geometry>> {
        let format = self.infer_geometry()?;
        Ok(Some(Geometry::Manual { sides: format.sides }))
    }
}
