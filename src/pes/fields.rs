use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::bits::{self, copy_info, es_rate, trick_mode};
use {ErrorKind, Result};

/// Value of the 2-bit `PTS_DTS_flags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PtsDtsFlags {
    /// `0b00`: neither PTS nor DTS.
    None,

    /// `0b01`: forbidden value.
    Reserved,

    /// `0b10`: PTS only.
    PtsOnly,

    /// `0b11`: PTS followed by DTS.
    PtsAndDts,
}
impl PtsDtsFlags {
    pub(crate) fn from_u8(n: u8) -> Self {
        match n & 0b11 {
            0b00 => PtsDtsFlags::None,
            0b01 => PtsDtsFlags::Reserved,
            0b10 => PtsDtsFlags::PtsOnly,
            _ => PtsDtsFlags::PtsAndDts,
        }
    }

    /// Returns the 2-bit wire value.
    pub fn as_u8(&self) -> u8 {
        match *self {
            PtsDtsFlags::None => 0b00,
            PtsDtsFlags::Reserved => 0b01,
            PtsDtsFlags::PtsOnly => 0b10,
            PtsDtsFlags::PtsAndDts => 0b11,
        }
    }

    /// Number of bytes the timestamp blocks occupy.
    pub fn fields_len(&self) -> usize {
        match *self {
            PtsDtsFlags::None | PtsDtsFlags::Reserved => 0,
            PtsDtsFlags::PtsOnly => 5,
            PtsDtsFlags::PtsAndDts => 10,
        }
    }
}

/// Elementary stream rate, in units of 50 bytes per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EsRate(u32);
impl EsRate {
    /// Maximum value (22 bits).
    pub const MAX: u32 = (1 << 22) - 1;

    /// Makes a new `EsRate` instance.
    ///
    /// # Errors
    ///
    /// If `n` exceeds `EsRate::MAX`, it will return an `ErrorKind::InvalidInput` error.
    pub fn new(n: u32) -> Result<Self> {
        track_assert!(n <= Self::MAX, ErrorKind::InvalidInput, "Too large value: {}", n);
        Ok(EsRate(n))
    }

    /// Returns the raw 22-bit value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns the rate in bytes per second.
    pub fn bytes_per_second(&self) -> u64 {
        u64::from(self.0) * 50
    }

    pub(crate) fn read_from<R: Read>(mut reader: R, strict: bool) -> Result<Self> {
        let n = track_io!(reader.read_uint::<BigEndian>(es_rate::SIZE))?;
        let marks_ok = bits::marks_set(n, &es_rate::MARKS);
        if strict {
            track_assert!(marks_ok, ErrorKind::InvalidInput, "ES_rate mark bit not set");
        } else if !marks_ok {
            log::trace!("Loose ES_rate block: {:#08x}", n);
        }
        Ok(EsRate(es_rate::RATE.get(n) as u32))
    }

    pub(crate) fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let n = es_rate::RATE.put(u64::from(self.0)) | bits::marks_word(&es_rate::MARKS);
        track_io!(writer.write_uint::<BigEndian>(n, es_rate::SIZE))
    }
}

/// DSM trick mode.
///
/// The 3-bit `trick_mode_control` selects the variant; the remaining five
/// bits of the byte carry the variant specific fields.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrickMode {
    FastForward {
        field_id: u8,
        intra_slice_refresh: bool,
        frequency_truncation: u8,
    },
    SlowMotion {
        rep_cntrl: u8,
    },
    FreezeFrame {
        field_id: u8,
    },
    FastReverse {
        field_id: u8,
        intra_slice_refresh: bool,
        frequency_truncation: u8,
    },
    SlowReverse {
        rep_cntrl: u8,
    },
    /// `trick_mode_control` values 5 to 7.
    Reserved {
        control: u8,
        bits: u8,
    },
}
impl TrickMode {
    const FAST_FORWARD: u8 = 0b000;
    const SLOW_MOTION: u8 = 0b001;
    const FREEZE_FRAME: u8 = 0b010;
    const FAST_REVERSE: u8 = 0b011;
    const SLOW_REVERSE: u8 = 0b100;

    pub(crate) fn from_u8(b: u8) -> Self {
        let field_id = trick_mode::FIELD_ID.get_u8(b);
        let intra_slice_refresh = trick_mode::INTRA_SLICE_REFRESH.flag(b);
        let frequency_truncation = trick_mode::FREQUENCY_TRUNCATION.get_u8(b);
        let rep_cntrl = trick_mode::REP_CNTRL.get_u8(b);
        match trick_mode::CONTROL.get_u8(b) {
            Self::FAST_FORWARD => TrickMode::FastForward {
                field_id,
                intra_slice_refresh,
                frequency_truncation,
            },
            Self::SLOW_MOTION => TrickMode::SlowMotion { rep_cntrl },
            Self::FREEZE_FRAME => TrickMode::FreezeFrame { field_id },
            Self::FAST_REVERSE => TrickMode::FastReverse {
                field_id,
                intra_slice_refresh,
                frequency_truncation,
            },
            Self::SLOW_REVERSE => TrickMode::SlowReverse { rep_cntrl },
            control => TrickMode::Reserved {
                control,
                bits: trick_mode::RESERVED.get_u8(b),
            },
        }
    }

    pub(crate) fn to_u8(&self) -> Result<u8> {
        let b = match *self {
            TrickMode::FastForward {
                field_id,
                intra_slice_refresh,
                frequency_truncation,
            } => track!(Self::fast(
                Self::FAST_FORWARD,
                field_id,
                intra_slice_refresh,
                frequency_truncation
            ))?,
            TrickMode::FastReverse {
                field_id,
                intra_slice_refresh,
                frequency_truncation,
            } => track!(Self::fast(
                Self::FAST_REVERSE,
                field_id,
                intra_slice_refresh,
                frequency_truncation
            ))?,
            TrickMode::SlowMotion { rep_cntrl } => track!(Self::slow(Self::SLOW_MOTION, rep_cntrl))?,
            TrickMode::SlowReverse { rep_cntrl } => track!(Self::slow(Self::SLOW_REVERSE, rep_cntrl))?,
            TrickMode::FreezeFrame { field_id } => {
                track_assert!(field_id <= 0b11, ErrorKind::InvalidInput; field_id);
                trick_mode::CONTROL.put_u8(Self::FREEZE_FRAME)
                    | trick_mode::FIELD_ID.put_u8(field_id)
                    | trick_mode::FREEZE_RESERVED.ones() as u8
            }
            TrickMode::Reserved { control, bits } => {
                track_assert!(
                    control > Self::SLOW_REVERSE && control <= 0b111,
                    ErrorKind::InvalidInput;
                    control
                );
                track_assert!(bits <= 0b1_1111, ErrorKind::InvalidInput; bits);
                trick_mode::CONTROL.put_u8(control) | trick_mode::RESERVED.put_u8(bits)
            }
        };
        Ok(b)
    }

    fn fast(control: u8, field_id: u8, intra_slice_refresh: bool, frequency_truncation: u8) -> Result<u8> {
        track_assert!(field_id <= 0b11, ErrorKind::InvalidInput; field_id);
        track_assert!(frequency_truncation <= 0b11, ErrorKind::InvalidInput; frequency_truncation);
        Ok(trick_mode::CONTROL.put_u8(control)
            | trick_mode::FIELD_ID.put_u8(field_id)
            | trick_mode::INTRA_SLICE_REFRESH.put_flag(intra_slice_refresh)
            | trick_mode::FREQUENCY_TRUNCATION.put_u8(frequency_truncation))
    }

    fn slow(control: u8, rep_cntrl: u8) -> Result<u8> {
        track_assert!(rep_cntrl <= 0b1_1111, ErrorKind::InvalidInput; rep_cntrl);
        Ok(trick_mode::CONTROL.put_u8(control) | trick_mode::REP_CNTRL.put_u8(rep_cntrl))
    }
}

/// Reads the additional copy info byte, returning its 7-bit value.
pub(crate) fn read_additional_copy_info(b: u8, strict: bool) -> Result<u8> {
    let mark_ok = copy_info::MARK.flag(b);
    if strict {
        track_assert!(mark_ok, ErrorKind::InvalidInput, "additional_copy_info mark bit not set");
    } else if !mark_ok {
        log::trace!("Loose additional_copy_info byte: {:#04x}", b);
    }
    Ok(copy_info::INFO.get_u8(b))
}

pub(crate) fn write_additional_copy_info(info: u8) -> Result<u8> {
    track_assert!(
        u64::from(info) <= copy_info::INFO.max_value(),
        ErrorKind::InvalidInput,
        "Too large additional_copy_info: {}",
        info
    );
    Ok(copy_info::MARK.ones() as u8 | copy_info::INFO.put_u8(info))
}
