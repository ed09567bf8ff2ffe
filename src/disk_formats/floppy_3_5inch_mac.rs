// src/disk_formats/floppy_3_5inch_mac.rs

use super::DiskFormat; // Import from parent module
use crate::gcr::{FORMAT_DOUBLE_SIDED, FORMAT_SINGLE_SIDED, SECTOR_RECORD_SIZE};

pub const TRACKS: u8 = 80;
/// Tracks are grouped in five zones of 16; outer zones hold more sectors.
pub const TRACKS_PER_ZONE: u8 = 16;
pub const ZONED_SECS_PER_TRACK: [u8; 5] = [12, 11, 10, 9, 8];
/// User data bytes per sector in a raw dump. The 12 tag bytes are not included.
pub const DATA_BYTES: usize = 512;
pub const TAG_BYTES: usize = 12;

pub fn sectors_per_track(track: u8) -> u8 {
    let zone = (track / TRACKS_PER_ZONE) as usize;
    ZONED_SECS_PER_TRACK[zone.min(ZONED_SECS_PER_TRACK.len() - 1)]
}

impl DiskFormat {
    pub fn total_sectors(&self) -> usize {
        let per_side: usize = (0..TRACKS).map(|t| sectors_per_track(t) as usize).sum();
        per_side * self.sides as usize
    }

    /// Calculates the size of a raw sector dump for this format.
    pub fn total_size(&self) -> usize {
        self.total_sectors() * DATA_BYTES
    }

    /// Size of the nibblized image, one fixed record per sector.
    pub fn encoded_size(&self) -> usize {
        self.total_sectors() * SECTOR_RECORD_SIZE
    }

    /// Every (track, side, sector) in image order.
    pub fn sector_order(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        (0..TRACKS).flat_map(move |track| {
            (0..self.sides).flat_map(move |side| (0..sectors_per_track(track)).map(move |sector| (track, side, sector)))
        })
    }
}

/// 400K single sided Macintosh disk.
pub const MAC_400K: DiskFormat = DiskFormat {
    sides: 1,
    format_byte: FORMAT_SINGLE_SIDED,
    name: "400K 3.5\" GCR SS",
};

/// 800K double sided Macintosh disk.
pub const MAC_800K: DiskFormat = DiskFormat {
    sides: 2,
    format_byte: FORMAT_DOUBLE_SIDED,
    name: "800K 3.5\" GCR DS",
};

pub fn infer_format(size: usize) -> Option<&'static DiskFormat> {
    match size {
        409_600 => Some(&MAC_400K),
        819_200 => Some(&MAC_800K),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_boundaries() {
        assert_eq!(sectors_per_track(0), 12);
        assert_eq!(sectors_per_track(15), 12);
        assert_eq!(sectors_per_track(16), 11);
        assert_eq!(sectors_per_track(63), 9);
        assert_eq!(sectors_per_track(64), 8);
        assert_eq!(sectors_per_track(79), 8);
    }

    #[test]
    fn sizes() {
        assert_eq!(MAC_400K.total_sectors(), 800);
        assert_eq!(MAC_800K.total_sectors(), 1600);
        assert_eq!(MAC_400K.total_size(), 409_600);
        assert_eq!(MAC_800K.total_size(), 819_200);
        assert_eq!(MAC_800K.encoded_size(), 1_638_400);
        assert_eq!(infer_format(819_200), Some(&MAC_800K));
        assert_eq!(infer_format(737_280), None);
    }

    #[test]
    fn order_is_track_side_sector() {
        let order: Vec<_> = MAC_800K.sector_order().collect();
        assert_eq!(order.len(), 1600);
        assert_eq!(order[0], (0, 0, 0));
        assert_eq!(order[11], (0, 0, 11));
        assert_eq!(order[12], (0, 1, 0));
        assert_eq!(order[24], (1, 0, 0));
        assert_eq!(order[1599], (79, 1, 7));
    }
}
