//! Time-related constituent elements.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use pes::bits::{self, escr, timestamp};
use {ErrorKind, Result};

/// Timestamp type for PTS/DTS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u64);
impl Timestamp {
    /// 90 kHz.
    pub const RESOLUTION: u64 = 90_000;

    /// Maximum timestamp value.
    pub const MAX: u64 = (1 << 33) - 1;

    /// Makes a new `Timestamp` instance.
    ///
    /// # Errors
    ///
    /// If `n` exceeds `Timestamp::MAX`, it will return an `ErrorKind::InvalidInput` error.
    pub fn new(n: u64) -> Result<Self> {
        track_assert!(n <= Self::MAX, ErrorKind::InvalidInput, "Too large value: {}", n);
        Ok(Timestamp(n))
    }

    /// Returns the value of the timestamp.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Reads a 5-byte PTS/DTS block.
    ///
    /// `prefix` is the expected 4-bit code in front of the value. It and the
    /// three mark bits are only enforced when `strict` is `true`.
    pub(crate) fn read_from<R: Read>(mut reader: R, prefix: u8, strict: bool) -> Result<Self> {
        let n = track_io!(reader.read_uint::<BigEndian>(timestamp::SIZE))?;
        let actual_prefix = timestamp::PREFIX.get(n) as u8;
        let marks_ok = bits::marks_set(n, &timestamp::MARKS);
        if strict {
            track_assert_eq!(
                actual_prefix,
                prefix,
                ErrorKind::InvalidInput,
                "Unexpected timestamp prefix"
            );
            track_assert!(marks_ok, ErrorKind::InvalidInput, "Timestamp mark bit not set");
        } else if actual_prefix != prefix || !marks_ok {
            log::trace!(
                "Loose timestamp block: prefix={:#06b} (expected {:#06b}), marks_ok={}",
                actual_prefix,
                prefix,
                marks_ok
            );
        }

        let value = (timestamp::HIGH.get(n) << 30)
            | (timestamp::MID.get(n) << 15)
            | timestamp::LOW.get(n);
        Ok(Timestamp(value))
    }

    pub(crate) fn write_to<W: Write>(&self, mut writer: W, prefix: u8) -> Result<()> {
        let n = timestamp::PREFIX.put(u64::from(prefix))
            | timestamp::HIGH.put(self.0 >> 30)
            | timestamp::MID.put(self.0 >> 15)
            | timestamp::LOW.put(self.0)
            | bits::marks_word(&timestamp::MARKS);
        track_io!(writer.write_uint::<BigEndian>(n, timestamp::SIZE))
    }
}
impl From<Timestamp> for u64 {
    fn from(f: Timestamp) -> Self {
        f.0
    }
}

/// Clock reference carried by the ESCR field.
///
/// A 33-bit base ticking at 90 kHz plus a 9-bit extension counting 27 MHz
/// cycles within one base tick. The extension is normally below 300, but
/// any 9-bit value is accepted so that headers read from the wire are
/// preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockReference {
    base: u64,
    extension: u16,
}
impl ClockReference {
    /// 27 MHz.
    pub const RESOLUTION: u64 = 27_000_000;

    /// Maximum value of the base part.
    pub const MAX_BASE: u64 = (1 << 33) - 1;

    /// Maximum value of the extension part.
    pub const MAX_EXTENSION: u16 = (1 << 9) - 1;

    /// Makes a new `ClockReference` instance from its base and extension parts.
    ///
    /// # Errors
    ///
    /// If `base` exceeds `MAX_BASE` or `extension` exceeds `MAX_EXTENSION`,
    /// it will return an `ErrorKind::InvalidInput` error.
    pub fn new(base: u64, extension: u16) -> Result<Self> {
        track_assert!(
            base <= Self::MAX_BASE,
            ErrorKind::InvalidInput,
            "Too large base: {}",
            base
        );
        track_assert!(
            extension <= Self::MAX_EXTENSION,
            ErrorKind::InvalidInput,
            "Too large extension: {}",
            extension
        );
        Ok(ClockReference { base, extension })
    }

    /// Makes a new `ClockReference` instance from a 27 MHz tick count.
    ///
    /// # Errors
    ///
    /// If the base part of `n` exceeds `MAX_BASE`, it will return an `ErrorKind::InvalidInput` error.
    pub fn from_27mhz(n: u64) -> Result<Self> {
        track!(Self::new(n / 300, (n % 300) as u16))
    }

    /// Returns the base part (90 kHz).
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the extension part.
    pub fn extension(&self) -> u16 {
        self.extension
    }

    /// Returns the value in 27 MHz ticks (`base * 300 + extension`).
    pub fn as_u64(&self) -> u64 {
        self.base * 300 + u64::from(self.extension)
    }

    /// Reads a 6-byte ESCR block. Mark bits are only enforced when `strict` is `true`.
    pub(crate) fn read_from<R: Read>(mut reader: R, strict: bool) -> Result<Self> {
        let n = track_io!(reader.read_uint::<BigEndian>(escr::SIZE))?;
        let marks_ok = bits::marks_set(n, &escr::MARKS);
        if strict {
            track_assert!(marks_ok, ErrorKind::InvalidInput, "ESCR mark bit not set");
        } else if !marks_ok {
            log::trace!("Loose ESCR block: {:#014x}", n);
        }

        let base = (escr::BASE_HIGH.get(n) << 30) | (escr::BASE_MID.get(n) << 15) | escr::BASE_LOW.get(n);
        let extension = escr::EXTENSION.get(n) as u16;
        Ok(ClockReference { base, extension })
    }

    pub(crate) fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let n = escr::RESERVED.ones()
            | escr::BASE_HIGH.put(self.base >> 30)
            | escr::BASE_MID.put(self.base >> 15)
            | escr::BASE_LOW.put(self.base)
            | escr::EXTENSION.put(u64::from(self.extension))
            | bits::marks_word(&escr::MARKS);
        track_io!(writer.write_uint::<BigEndian>(n, escr::SIZE))
    }
}
