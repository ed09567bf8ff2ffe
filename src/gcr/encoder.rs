// src/gcr/encoder.rs
use super::nibblize::nibblize;
use super::template::{SectorRecord, ADDRESS_FIELD_OFFSET, DATA_FIELD_OFFSET, DATA_SECTOR_OFFSET};
use super::{encode_62, EncodeError, LogicalSector};
use crate::disk_formats::{sectors_per_track, TRACKS};
use log::trace;

/// Format nibble for double sided (800K) media.
pub const FORMAT_DOUBLE_SIDED: u8 = 0x22;
/// Format nibble for single sided (400K) media.
pub const FORMAT_SINGLE_SIDED: u8 = 0x02;

/// Where a sector lives on the disk, plus the format nibble that goes in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorAddress {
    pub track: u8,
    pub side: u8,
    pub sector: u8,
    pub format: u8,
}

impl SectorAddress {
    pub fn new(track: u8, side: u8, sector: u8, format: u8) -> Result<Self, EncodeError> {
        if track >= TRACKS {
            return Err(EncodeError::TrackOutOfRange(track));
        }
        if side > 1 {
            return Err(EncodeError::SideOutOfRange(side));
        }
        let count = sectors_per_track(track);
        if sector >= count {
            return Err(EncodeError::SectorOutOfRange { track, sector, count });
        }
        if format > 0x3f {
            return Err(EncodeError::FormatOutOfRange(format));
        }
        Ok(Self { track, side, sector, format })
    }

    pub fn track_low(&self) -> u8 {
        self.track & 0x3f
    }

    /// Side flag in bit 5, track bit 6 in bit 0.
    pub fn track_high(&self) -> u8 {
        (self.side << 5) | (self.track >> 6)
    }

    pub fn checksum(&self) -> u8 {
        (self.track_low() ^ self.sector ^ self.track_high() ^ self.format) & 0x3f
    }

    /// The five untranslated address field values in disk order.
    pub fn fields(&self) -> [u8; 5] {
        [self.track_low(), self.sector, self.track_high(), self.format, self.checksum()]
    }
}

/// Fill in the address field, the data field sector number, and the
/// nibblized data of an initialised record.
pub fn encode_sector(dat: &LogicalSector, record: &mut SectorRecord, addr: &SectorAddress) -> Result<(), EncodeError> {
    trace!("encoding track {} side {} sector {}", addr.track, addr.side, addr.sector);
    let buf = record.as_mut_bytes();
    for (i, val) in addr.fields().into_iter().enumerate() {
        buf[ADDRESS_FIELD_OFFSET + i] = encode_62(val);
    }
    // sector number is written in the data field as well as the address field
    buf[DATA_SECTOR_OFFSET] = encode_62(addr.sector);
    nibblize(dat, buf, DATA_FIELD_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcr::{LOGICAL_SECTOR_SIZE, DISK_BYTES_62};

    #[test]
    fn first_sector_address() {
        let addr = SectorAddress::new(0, 0, 0, FORMAT_DOUBLE_SIDED).unwrap();
        let mut rec = SectorRecord::new();
        encode_sector(&[0; LOGICAL_SECTOR_SIZE], &mut rec, &addr).unwrap();
        let t = DISK_BYTES_62;
        assert_eq!(rec.address_field(), &[t[0], t[0], t[0], t[0x22], t[0x22]]);
        assert_eq!(rec.as_bytes()[74], t[0]);
        assert!(rec.data_field().iter().all(|&b| b == t[0]));
        assert_eq!(&rec.as_bytes()[778..780], &[0xde, 0xaa]);
    }

    #[test]
    fn high_track_on_second_side() {
        let addr = SectorAddress::new(79, 1, 7, FORMAT_DOUBLE_SIDED).unwrap();
        assert_eq!(addr.track_low(), 79 & 0x3f);
        assert_eq!(addr.track_high(), 0x21);
        assert_eq!(addr.checksum(), (15 ^ 7 ^ 0x21 ^ 0x22) & 0x3f);
        let mut rec = SectorRecord::new();
        encode_sector(&[0xa5; LOGICAL_SECTOR_SIZE], &mut rec, &addr).unwrap();
        assert_eq!(rec.address_field()[2], DISK_BYTES_62[0x21]);
        assert_eq!(rec.as_bytes()[74], DISK_BYTES_62[7]);
    }

    #[test]
    fn rejects_bad_addresses() {
        assert_eq!(SectorAddress::new(80, 0, 0, 0x22), Err(EncodeError::TrackOutOfRange(80)));
        assert_eq!(SectorAddress::new(0, 2, 0, 0x22), Err(EncodeError::SideOutOfRange(2)));
        assert_eq!(
            SectorAddress::new(64, 0, 8, 0x22),
            Err(EncodeError::SectorOutOfRange { track: 64, sector: 8, count: 8 })
        );
        assert_eq!(SectorAddress::new(0, 0, 11, 0x40), Err(EncodeError::FormatOutOfRange(0x40)));
        assert!(SectorAddress::new(0, 0, 11, FORMAT_SINGLE_SIDED).is_ok());
    }

    #[test]
    fn same_input_same_record() {
        let mut dat = [0u8; LOGICAL_SECTOR_SIZE];
        for (i, b) in dat.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        let addr = SectorAddress::new(33, 1, 4, FORMAT_DOUBLE_SIDED).unwrap();
        let mut a = SectorRecord::new();
        let mut b = SectorRecord::new();
        encode_sector(&dat, &mut a, &addr).unwrap();
        encode_sector(&dat, &mut b, &addr).unwrap();
        assert_eq!(a, b);
    }
}
