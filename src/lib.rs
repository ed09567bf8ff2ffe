// src/lib.rs
//! Convert Macintosh 400K/800K sector dumps into nibblized `.mac` images:
//! one 1024-byte Sony GCR record (address field, 6-and-2 data field, sync) per sector.

pub mod convert;
pub mod core;
pub mod disk_formats;
pub mod gcr;
pub mod image_types;

use anyhow::{anyhow, Result};
use disk_formats::{DiskFormat, MAC_400K, MAC_800K};
use std::fs;
use std::path::{Path, PathBuf};

pub trait FormatHandler: Send + Sync {
    fn display(&self, ascii: bool) -> Result<String>;
    /// Nibblize the image into a `.mac` file at `output_path`.
    fn convert(&self, output_path: &Path, geometry: Geometry, validate: bool) -> Result<()>;
    fn geometry(&self) -> Result<Option<Geometry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Auto,
    Manual { sides: u8 },
}

impl Geometry {
    /// Pick the disk format, falling back to what the image itself suggests.
    pub fn resolve(self, inferred: Result<&'static DiskFormat>) -> Result<&'static DiskFormat> {
        match self {
            Geometry::Auto => inferred,
            Geometry::Manual { sides: 1 } => Ok(&MAC_400K),
            Geometry::Manual { sides: 2 } => Ok(&MAC_800K),
            Geometry::Manual { sides } => Err(anyhow!("Invalid number of sides: {}", sides)),
        }
    }
}

pub fn parse_geometry(s: &str) -> Result<Geometry, String> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(Geometry::Auto),
        "400k" | "1" => Ok(Geometry::Manual { sides: 1 }),
        "800k" | "2" => Ok(Geometry::Manual { sides: 2 }),
        _ => Err(format!("Geometry must be 'auto', '400k' or '800k' (got '{}')", s)),
    }
}

pub fn load_handler(file_path: &PathBuf) -> Result<Box<dyn FormatHandler>> {
    let ext = file_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("No file extension"))?;

    let data = fs::read(file_path).map_err(|e| anyhow!("Cannot read {}: {}", file_path.display(), e))?;

    match ext.as_str() {
        // DiskCopy images often carry a .img extension too
        "img" if image_types::dc42::is_diskcopy(&data) => Ok(Box::new(image_types::dc42::Dc42Handler::new(data))),
        "dsk" | "img" => Ok(Box::new(image_types::dsk::DskHandler::new(data))),
        "image" | "dc42" => Ok(Box::new(image_types::dc42::Dc42Handler::new(data))),
        "mac" => Ok(Box::new(image_types::mac::MacHandler::new(data))),
        _ => Err(anyhow!("Unsupported format: {}", ext)),
    }
}
