//! Bit layouts of the packed PES header fields.
//!
//! Each field is addressed inside a big-endian word holding the whole packed
//! unit: one byte for the flag bytes, 40 bits for a PTS/DTS block, 48 bits
//! for the ESCR block and 24 bits for the ES rate block. Shifts count from
//! the least significant bit of that word.

/// A `width`-bit field located `shift` bits above the least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitField {
    shift: u32,
    width: u32,
}
impl BitField {
    pub const fn new(shift: u32, width: u32) -> Self {
        BitField { shift, width }
    }

    /// Single bit field.
    pub const fn bit(shift: u32) -> Self {
        BitField { shift, width: 1 }
    }

    /// Largest value the field can hold.
    pub fn max_value(self) -> u64 {
        (1 << self.width) - 1
    }

    pub fn get(self, word: u64) -> u64 {
        (word >> self.shift) & self.max_value()
    }

    /// Places `value` at the field position. Bits above the width are dropped.
    pub fn put(self, value: u64) -> u64 {
        (value & self.max_value()) << self.shift
    }

    /// Field with every bit set, as used for mark bits and reserved bits.
    pub fn ones(self) -> u64 {
        self.put(self.max_value())
    }

    pub fn is_ones(self, word: u64) -> bool {
        self.get(word) == self.max_value()
    }

    pub fn get_u8(self, byte: u8) -> u8 {
        self.get(u64::from(byte)) as u8
    }

    pub fn put_u8(self, value: u8) -> u8 {
        self.put(u64::from(value)) as u8
    }

    pub fn flag(self, byte: u8) -> bool {
        self.get_u8(byte) != 0
    }

    pub fn put_flag(self, value: bool) -> u8 {
        self.put_u8(value as u8)
    }
}

/// Byte 6: `'10'`, scrambling control, priority, alignment, copyright, original/copy.
pub(crate) mod flags1 {
    use super::BitField;

    /// Always `0b10`.
    pub const MARKER: BitField = BitField::new(6, 2);
    pub const MARKER_VALUE: u8 = 0b10;
    pub const SCRAMBLING_CONTROL: BitField = BitField::new(4, 2);
    pub const PRIORITY: BitField = BitField::bit(3);
    pub const DATA_ALIGNMENT_INDICATOR: BitField = BitField::bit(2);
    pub const COPYRIGHT: BitField = BitField::bit(1);
    pub const ORIGINAL_OR_COPY: BitField = BitField::bit(0);
}

/// Byte 7: presence flags of the optional fields.
pub(crate) mod flags2 {
    use super::BitField;

    pub const PTS_DTS_FLAGS: BitField = BitField::new(6, 2);
    pub const ESCR_FLAG: BitField = BitField::bit(5);
    pub const ES_RATE_FLAG: BitField = BitField::bit(4);
    pub const DSM_TRICK_MODE_FLAG: BitField = BitField::bit(3);
    pub const ADDITIONAL_COPY_INFO_FLAG: BitField = BitField::bit(2);
    pub const PES_CRC_FLAG: BitField = BitField::bit(1);
    pub const PES_EXTENSION_FLAG: BitField = BitField::bit(0);
}

/// 40-bit PTS/DTS block.
///
/// `'0010'`/`'0011'`/`'0001'`, ts[32..30], mark, ts[29..15], mark, ts[14..0], mark.
pub(crate) mod timestamp {
    use super::BitField;

    pub const SIZE: usize = 5;
    pub const PREFIX: BitField = BitField::new(36, 4);
    pub const HIGH: BitField = BitField::new(33, 3);
    pub const MID: BitField = BitField::new(17, 15);
    pub const LOW: BitField = BitField::new(1, 15);
    pub const MARKS: [BitField; 3] = [BitField::bit(32), BitField::bit(16), BitField::bit(0)];
}

/// 48-bit ESCR block.
///
/// reserved(2), base[32..30], mark, base[29..15], mark, base[14..0], mark, extension(9), mark.
pub(crate) mod escr {
    use super::BitField;

    pub const SIZE: usize = 6;
    pub const RESERVED: BitField = BitField::new(46, 2);
    pub const BASE_HIGH: BitField = BitField::new(43, 3);
    pub const BASE_MID: BitField = BitField::new(27, 15);
    pub const BASE_LOW: BitField = BitField::new(11, 15);
    pub const EXTENSION: BitField = BitField::new(1, 9);
    pub const MARKS: [BitField; 4] = [
        BitField::bit(42),
        BitField::bit(26),
        BitField::bit(10),
        BitField::bit(0),
    ];
}

/// 24-bit ES rate block: mark, rate(22), mark.
pub(crate) mod es_rate {
    use super::BitField;

    pub const SIZE: usize = 3;
    pub const RATE: BitField = BitField::new(1, 22);
    pub const MARKS: [BitField; 2] = [BitField::bit(23), BitField::bit(0)];
}

/// DSM trick mode byte.
pub(crate) mod trick_mode {
    use super::BitField;

    pub const SIZE: usize = 1;
    pub const CONTROL: BitField = BitField::new(5, 3);
    pub const FIELD_ID: BitField = BitField::new(3, 2);
    pub const INTRA_SLICE_REFRESH: BitField = BitField::bit(2);
    pub const FREQUENCY_TRUNCATION: BitField = BitField::new(0, 2);
    pub const REP_CNTRL: BitField = BitField::new(0, 5);
    pub const RESERVED: BitField = BitField::new(0, 5);
    pub const FREEZE_RESERVED: BitField = BitField::new(0, 3);
}

/// Additional copy info byte: mark, info(7).
pub(crate) mod copy_info {
    use super::BitField;

    pub const SIZE: usize = 1;
    pub const MARK: BitField = BitField::bit(7);
    pub const INFO: BitField = BitField::new(0, 7);
}

/// Checks that every listed mark bit of `word` is set.
pub(crate) fn marks_set(word: u64, marks: &[BitField]) -> bool {
    marks.iter().all(|m| m.is_ones(word))
}

/// Word with every listed mark bit set.
pub(crate) fn marks_word(marks: &[BitField]) -> u64 {
    marks.iter().fold(0, |acc, m| acc | m.ones())
}
