// src/gcr/nibblize.rs
use super::template::{DATA_FIELD_NIBS, LOGICAL_SECTOR_SIZE};
use super::{encode_62, EncodeError, LogicalSector};
use log::trace;

/// Number of byte triples the sector is split into; the last one is short.
const CHUNK62: usize = 175;
/// Nibbles produced from the sector bytes, the checksum follows.
const DATA_NIBS: usize = 699;

/// The three running checksum registers after a pass over one sector.
/// Registers are held wider than a byte so the carry out of bit 7 can be seen
/// by the next addition in the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecksumState {
    c1: u16,
    c2: u16,
    c3: u16,
}

impl ChecksumState {
    pub fn c1(&self) -> u8 {
        (self.c1 & 0xff) as u8
    }
    pub fn c2(&self) -> u8 {
        (self.c2 & 0xff) as u8
    }
    pub fn c3(&self) -> u8 {
        (self.c3 & 0xff) as u8
    }
    /// High two bits of each register packed as `c3 c2 c1` into 6 bits.
    pub fn c4(&self) -> u8 {
        (((self.c1 & 0xc0) >> 6) | ((self.c2 & 0xc0) >> 4) | ((self.c3 & 0xc0) >> 2)) as u8
    }

    /// Rotate c1 left through its own bit 0.
    fn rotate(&mut self) {
        self.c1 = (self.c1 & 0xff) << 1;
        if self.c1 & 0x100 != 0 {
            self.c1 += 1;
        }
    }

    /// First byte of a triple: summed into c3 with the carry out of c1.
    fn first(&mut self, val: u8) -> u8 {
        self.c3 += val as u16;
        if self.c1 & 0x100 != 0 {
            self.c3 += 1;
            self.c1 &= 0xff;
        }
        val ^ self.c1 as u8
    }

    /// Second byte: summed into c2 with the carry out of c3.
    fn second(&mut self, val: u8) -> u8 {
        self.c2 += val as u16;
        if self.c3 > 0xff {
            self.c2 += 1;
            self.c3 &= 0xff;
        }
        val ^ self.c3 as u8
    }

    /// Third byte: summed into c1 with the carry out of c2.
    fn third(&mut self, val: u8) -> u8 {
        self.c1 += val as u16;
        if self.c2 > 0xff {
            self.c1 += 1;
            self.c2 &= 0xff;
        }
        val ^ self.c2 as u8
    }
}

/// Split the sector into three scrambled byte groups while running the checksum.
fn interleave(dat: &LogicalSector) -> ([[u8; CHUNK62]; 3], ChecksumState) {
    let mut parts = [[0u8; CHUNK62]; 3];
    let mut chk = ChecksumState::default();
    let mut s = 0;
    for j in 0..CHUNK62 {
        chk.rotate();
        parts[0][j] = chk.first(dat[s]);
        parts[1][j] = chk.second(dat[s + 1]);
        if s + 2 >= LOGICAL_SECTOR_SIZE {
            // 174 full triples and one pair
            break;
        }
        parts[2][j] = chk.third(dat[s + 2]);
        s += 3;
    }
    (parts, chk)
}

/// Run the checksum chain over a sector without producing any nibbles.
pub fn checksum(dat: &LogicalSector) -> ChecksumState {
    interleave(dat).1
}

/// Write the 703-byte data field for `dat` into `out` starting at `offset`.
/// Nothing outside `out[offset..offset+703]` is touched.
pub fn nibblize(dat: &LogicalSector, out: &mut [u8], offset: usize) -> Result<(), EncodeError> {
    let end = offset
        .checked_add(DATA_FIELD_NIBS)
        .filter(|&end| end <= out.len())
        .ok_or(EncodeError::BufferTooSmall {
            needed: offset.saturating_add(DATA_FIELD_NIBS),
            available: out.len(),
        })?;
    let (parts, chk) = interleave(dat);
    let field = &mut out[offset..end];

    let mut idx = 0;
    for i in 0..CHUNK62 {
        let [p0, p1, p2] = [parts[0][i], parts[1][i], parts[2][i]];
        let twos = ((p0 & 0xc0) >> 2) | ((p1 & 0xc0) >> 4) | ((p2 & 0xc0) >> 6);
        field[idx] = encode_62(twos);
        field[idx + 1] = encode_62(p0 & 0x3f);
        field[idx + 2] = encode_62(p1 & 0x3f);
        idx += 3;
        if i != CHUNK62 - 1 {
            field[idx] = encode_62(p2 & 0x3f);
            idx += 1;
        }
    }
    debug_assert_eq!(idx, DATA_NIBS);

    field[DATA_NIBS] = encode_62(chk.c4());
    field[DATA_NIBS + 1] = encode_62(chk.c3() & 0x3f);
    field[DATA_NIBS + 2] = encode_62(chk.c2() & 0x3f);
    field[DATA_NIBS + 3] = encode_62(chk.c1() & 0x3f);
    trace!("data checksum {:02x} {:02x} {:02x} {:02x}", chk.c4(), chk.c3(), chk.c2(), chk.c1());
    Ok(())
}
