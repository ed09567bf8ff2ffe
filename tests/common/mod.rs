#![allow(dead_code)]

use dsk2mac::gcr::{decode_62, LogicalSector, DATA_FIELD_NIBS, LOGICAL_SECTOR_SIZE};

const CHUNK62: usize = 175;
const DATA_NIBS: usize = 699;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Checksum bytes as carried at the end of a data field: c4, c3, c2, c1.
#[derive(Debug, PartialEq, Eq)]
pub struct Trailer {
    pub c4: u8,
    pub c3: u8,
    pub c2: u8,
    pub c1: u8,
}

/// Undo the 6-and-2 data field. Returns the sector, the checksum the decoder
/// arrived at, and the checksum stored in the field.
pub fn decode_data_field(field: &[u8]) -> (LogicalSector, Trailer, Trailer) {
    assert_eq!(field.len(), DATA_FIELD_NIBS);
    let nib = |i: usize| decode_62(field[i]).expect("invalid disk byte in data field");

    let mut parts = [[0u8; CHUNK62]; 3];
    let mut idx = 0;
    for i in 0..CHUNK62 {
        let twos = nib(idx);
        let nib0 = nib(idx + 1);
        let nib1 = nib(idx + 2);
        idx += 3;
        let nib2 = if i != CHUNK62 - 1 {
            idx += 1;
            nib(idx - 1)
        } else {
            0
        };
        parts[0][i] = nib0 | ((twos << 2) & 0xc0);
        parts[1][i] = nib1 | ((twos << 4) & 0xc0);
        parts[2][i] = nib2 | ((twos << 6) & 0xc0);
    }
    assert_eq!(idx, DATA_NIBS);

    let mut ans = [0u8; LOGICAL_SECTOR_SIZE];
    let mut n = 0;
    let [mut chk0, mut chk1, mut chk2]: [usize; 3] = [0; 3];
    let mut i = 0;
    loop {
        chk0 = (chk0 & 0xff) << 1;
        if chk0 & 0x100 > 0 {
            chk0 += 1;
        }
        let val = (parts[0][i] as usize ^ chk0) as u8;
        chk2 += val as usize;
        if chk0 & 0x100 > 0 {
            chk2 += 1;
            chk0 &= 0xff;
        }
        ans[n] = val;
        n += 1;

        let val = (parts[1][i] as usize ^ chk2) as u8;
        chk1 += val as usize;
        if chk2 > 0xff {
            chk1 += 1;
            chk2 &= 0xff;
        }
        ans[n] = val;
        n += 1;

        if n >= LOGICAL_SECTOR_SIZE {
            break;
        }

        let val = (parts[2][i] as usize ^ chk1) as u8;
        chk0 += val as usize;
        if chk1 > 0xff {
            chk0 += 1;
            chk1 &= 0xff;
        }
        ans[n] = val;
        n += 1;
        i += 1;
    }

    let computed = Trailer {
        c4: (((chk0 & 0xc0) >> 6) | ((chk1 & 0xc0) >> 4) | ((chk2 & 0xc0) >> 2)) as u8,
        c3: (chk2 & 0x3f) as u8,
        c2: (chk1 & 0x3f) as u8,
        c1: (chk0 & 0x3f) as u8,
    };
    let stored = Trailer {
        c4: nib(DATA_NIBS),
        c3: nib(DATA_NIBS + 1),
        c2: nib(DATA_NIBS + 2),
        c1: nib(DATA_NIBS + 3),
    };
    (ans, computed, stored)
}

/// Deterministic pseudo random sector contents.
pub fn noise_sector(seed: u32) -> LogicalSector {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let mut sector = [0u8; LOGICAL_SECTOR_SIZE];
    for b in sector.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *b = (state >> 24) as u8;
    }
    sector
}
