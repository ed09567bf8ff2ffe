// src/gcr/template.rs

//! Fixed skeleton of one 1024-byte physical sector record.
//!
//! | offset  | bytes | content                        |
//! |---------|-------|--------------------------------|
//! | 0       | 56    | sync                           |
//! | 56      | 3     | address prolog D5 AA 96        |
//! | 59      | 5     | track, sector, side, fmt, chk  |
//! | 64      | 2     | address epilog DE AA           |
//! | 66      | 5     | sync                           |
//! | 71      | 3     | data prolog D5 AA AD           |
//! | 74      | 1     | sector                         |
//! | 75      | 703   | nibblized data and checksum    |
//! | 778     | 2     | data epilog DE AA              |
//! | 780     | 244   | sync padding                   |

pub const SECTOR_RECORD_SIZE: usize = 1024;
pub const LOGICAL_SECTOR_SIZE: usize = 524;
/// 699 data nibbles plus 4 checksum nibbles.
pub const DATA_FIELD_NIBS: usize = 703;
pub const SYNC_BYTE: u8 = 0xff;

pub const ADDRESS_PROLOG: [u8; 3] = [0xd5, 0xaa, 0x96];
pub const DATA_PROLOG: [u8; 3] = [0xd5, 0xaa, 0xad];
pub const EPILOG: [u8; 2] = [0xde, 0xaa];

pub const ADDRESS_PROLOG_OFFSET: usize = 56;
pub const ADDRESS_FIELD_OFFSET: usize = 59;
pub const ADDRESS_FIELD_LEN: usize = 5;
pub const ADDRESS_EPILOG_OFFSET: usize = 64;
pub const DATA_PROLOG_OFFSET: usize = 71;
pub const DATA_SECTOR_OFFSET: usize = 74;
pub const DATA_FIELD_OFFSET: usize = 75;
pub const DATA_EPILOG_OFFSET: usize = DATA_FIELD_OFFSET + DATA_FIELD_NIBS;

/// A physical sector record. Only the address and data windows change between
/// sectors, so a reused record must go through `init` before the next encode.
#[derive(Clone, PartialEq, Eq)]
pub struct SectorRecord {
    buf: [u8; SECTOR_RECORD_SIZE],
}

impl SectorRecord {
    pub fn new() -> Self {
        let mut record = SectorRecord { buf: [SYNC_BYTE; SECTOR_RECORD_SIZE] };
        record.init();
        record
    }

    /// Restore the sync runs, prologs and epilogs over the whole buffer.
    pub fn init(&mut self) {
        self.buf.fill(SYNC_BYTE);
        self.put(ADDRESS_PROLOG_OFFSET, &ADDRESS_PROLOG);
        self.put(ADDRESS_EPILOG_OFFSET, &EPILOG);
        self.put(DATA_PROLOG_OFFSET, &DATA_PROLOG);
        self.put(DATA_EPILOG_OFFSET, &EPILOG);
    }

    fn put(&mut self, offset: usize, bytes: &[u8]) {
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8; SECTOR_RECORD_SIZE] {
        &self.buf
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; SECTOR_RECORD_SIZE] {
        &mut self.buf
    }

    pub fn address_field(&self) -> &[u8] {
        &self.buf[ADDRESS_FIELD_OFFSET..ADDRESS_FIELD_OFFSET + ADDRESS_FIELD_LEN]
    }

    pub fn data_field(&self) -> &[u8] {
        &self.buf[DATA_FIELD_OFFSET..DATA_EPILOG_OFFSET]
    }
}

impl Default for SectorRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SectorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorRecord")
            .field("address_field", &self.address_field())
            .finish_non_exhaustive()
    }
}
