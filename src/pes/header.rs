use byteorder::{BigEndian, ByteOrder};
use std::env;
use std::io::Write;

use es::StreamId;
use time::{ClockReference, Timestamp};
use {ErrorKind, Result};

use super::bits::{self, flags1, flags2};
use super::fields::{self, EsRate, PtsDtsFlags, TrickMode};

const PES_STRICT_MARKER_BITS: &str = "PES_STRICT_MARKER_BITS";

const PTS_PREFIX: u8 = 0b0010;
const PTS_WITH_DTS_PREFIX: u8 = 0b0011;
const DTS_PREFIX: u8 = 0b0001;
const STUFFING_BYTE: u8 = 0xFF;

/// PES packet header.
///
/// Presence of each optional field is expressed by its `Option`, so the
/// flag bits written to the wire always agree with the fields that follow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PesHeader {
    /// `stream_id`.
    pub stream_id: StreamId,

    /// `PES_packet_length`: number of bytes following this field.
    ///
    /// `0` means "unbounded" (video in a transport stream). The value is
    /// written and read as-is; it never bounds decoding.
    pub packet_len: u16,

    /// 2-bit `PES_scrambling_control`.
    pub scrambling_control: u8,

    /// `PES_priority`.
    pub priority: bool,

    /// `data_alignment_indicator`.
    pub data_alignment_indicator: bool,

    /// `copyright`.
    pub copyright: bool,

    /// `original_or_copy`.
    pub original_or_copy: bool,

    /// Presentation timestamp.
    pub pts: Option<Timestamp>,

    /// Decoding timestamp. Requires `pts`.
    pub dts: Option<Timestamp>,

    /// Elementary stream clock reference.
    pub escr: Option<ClockReference>,

    /// Elementary stream rate.
    pub es_rate: Option<EsRate>,

    /// DSM trick mode.
    pub dsm_trick_mode: Option<TrickMode>,

    /// 7-bit `additional_copy_info`.
    pub additional_copy_info: Option<u8>,

    /// `previous_PES_packet_CRC`.
    pub previous_pes_packet_crc: Option<u16>,

    /// `PES_extension_flag`.
    ///
    /// The extension itself is not interpreted: when decoding, its bytes are
    /// skipped together with the stuffing bytes.
    pub pes_extension: bool,

    /// Number of bytes in the optional-fields region after the known fields
    /// (stuffing bytes, or stuffing plus an uninterpreted PES extension).
    pub stuffing_len: u8,
}
impl PesHeader {
    /// Size of the fixed part of the header, up to and including `PES_header_data_length`.
    pub const FIXED_LEN: usize = 9;

    /// Maximum size of the optional fields, excluding the fixed part, stuffing and extension.
    pub const MAX_FIELDS_LEN: usize = 10 + 6 + 3 + 1 + 1 + 2;

    /// Makes a new `PesHeader` instance without any optional field.
    pub fn new(stream_id: StreamId) -> Self {
        PesHeader {
            stream_id,
            packet_len: 0,
            scrambling_control: 0,
            priority: false,
            data_alignment_indicator: false,
            copyright: false,
            original_or_copy: false,
            pts: None,
            dts: None,
            escr: None,
            es_rate: None,
            dsm_trick_mode: None,
            additional_copy_info: None,
            previous_pes_packet_crc: None,
            pes_extension: false,
            stuffing_len: 0,
        }
    }

    /// Returns the `PTS_DTS_flags` value matching `pts` and `dts`.
    ///
    /// A DTS without a PTS yields `PtsDtsFlags::Reserved`, which cannot be encoded.
    pub fn pts_dts_flags(&self) -> PtsDtsFlags {
        match (self.pts.is_some(), self.dts.is_some()) {
            (false, false) => PtsDtsFlags::None,
            (false, true) => PtsDtsFlags::Reserved,
            (true, false) => PtsDtsFlags::PtsOnly,
            (true, true) => PtsDtsFlags::PtsAndDts,
        }
    }

    /// Returns the number of bytes taken by the present optional fields.
    pub fn optional_fields_len(&self) -> usize {
        self.pts_dts_flags().fields_len()
            + self.escr.map_or(0, |_| bits::escr::SIZE)
            + self.es_rate.map_or(0, |_| bits::es_rate::SIZE)
            + self.dsm_trick_mode.map_or(0, |_| bits::trick_mode::SIZE)
            + self.additional_copy_info.map_or(0, |_| bits::copy_info::SIZE)
            + self.previous_pes_packet_crc.map_or(0, |_| 2)
    }

    /// Returns the value of `PES_header_data_length`.
    pub fn header_data_len(&self) -> usize {
        self.optional_fields_len() + usize::from(self.stuffing_len)
    }

    /// Returns the total header size (`9 + PES_header_data_length`).
    pub fn header_len(&self) -> usize {
        Self::FIXED_LEN + self.header_data_len()
    }

    /// Returns the length of the payload following the header, as derived from `packet_len`.
    ///
    /// Returns `None` if `packet_len` is zero (unbounded) or too small to hold the header.
    pub fn es_len(&self) -> Option<u16> {
        if self.packet_len == 0 {
            return None;
        }
        let optional_header_len = 3 + self.header_data_len();
        (self.packet_len as usize)
            .checked_sub(optional_header_len)
            .map(|n| n as u16)
    }

    /// Sets `packet_len` for a payload of `payload_len` bytes following this header.
    ///
    /// If the result does not fit in 16 bits, `packet_len` is set to `0` (unbounded).
    pub fn set_packet_len_for_payload(&mut self, payload_len: usize) {
        let n = 3 + self.header_data_len() + payload_len;
        self.packet_len = if n > usize::from(u16::max_value()) {
            0
        } else {
            n as u16
        };
    }

    /// Decodes a header from the beginning of `buf`.
    ///
    /// On success it returns the header and the number of consumed bytes
    /// (`9 + PES_header_data_length`). If `buf` is too short, it returns
    /// `Ok(None)`; the caller should retry from the same offset with more bytes.
    ///
    /// Mark bits are not enforced. Use `PesHeaderDecoder` to change that.
    ///
    /// # Errors
    ///
    /// Once the whole declared header is available, it returns an
    /// `ErrorKind::InvalidInput` error if:
    ///
    /// - `packet_start_code_prefix` is not `0x000001`,
    /// - `PTS_DTS_flags` has the forbidden value `0b01`,
    /// - the flagged optional fields do not fit in `PES_header_data_length` bytes,
    /// - (strict decoders only) a mark bit, timestamp prefix, the `'10'` marker
    ///   or a stuffing byte has an unexpected value.
    pub fn decode(buf: &[u8]) -> Result<Option<(Self, usize)>> {
        track!(PesHeaderDecoder::default().decode(buf))
    }

    /// Encodes this header into `buf` and returns the number of written bytes.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::InvalidInput` error if `buf` is shorter than
    /// `header_len()` or a field is out of range, and an
    /// `ErrorKind::Unsupported` error if `pes_extension` is set.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let optional = track!(self.encode_optional_fields())?;
        let size = Self::FIXED_LEN + optional.len();
        track_assert!(
            buf.len() >= size,
            ErrorKind::InvalidInput,
            "Too small buffer: required={}, actual={}",
            size,
            buf.len()
        );

        let fixed = track!(self.encode_fixed_part(optional.len()))?;
        buf[..Self::FIXED_LEN].copy_from_slice(&fixed);
        buf[Self::FIXED_LEN..size].copy_from_slice(&optional);
        Ok(size)
    }

    /// Writes this header to `writer` and returns the number of written bytes.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let optional = track!(self.encode_optional_fields())?;
        let fixed = track!(self.encode_fixed_part(optional.len()))?;
        track_io!(writer.write_all(&fixed))?;
        track_io!(writer.write_all(&optional))?;
        Ok(fixed.len() + optional.len())
    }

    /// Encodes this header into a new vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.header_len());
        track!(self.write_to(&mut buf))?;
        Ok(buf)
    }

    /// First pass: the optional-fields region (`PES_header_data_length` bytes).
    fn encode_optional_fields(&self) -> Result<Vec<u8>> {
        track_assert!(
            !self.pes_extension,
            ErrorKind::Unsupported,
            "Encoding a PES extension is not supported"
        );

        let mut buf = Vec::with_capacity(self.header_data_len());
        match self.pts_dts_flags() {
            PtsDtsFlags::None => {}
            PtsDtsFlags::Reserved => track_panic!(ErrorKind::InvalidInput, "DTS without PTS"),
            PtsDtsFlags::PtsOnly => {
                if let Some(pts) = self.pts {
                    track!(pts.write_to(&mut buf, PTS_PREFIX))?;
                }
            }
            PtsDtsFlags::PtsAndDts => {
                if let (Some(pts), Some(dts)) = (self.pts, self.dts) {
                    track!(pts.write_to(&mut buf, PTS_WITH_DTS_PREFIX))?;
                    track!(dts.write_to(&mut buf, DTS_PREFIX))?;
                }
            }
        }
        if let Some(escr) = self.escr {
            track!(escr.write_to(&mut buf))?;
        }
        if let Some(es_rate) = self.es_rate {
            track!(es_rate.write_to(&mut buf))?;
        }
        if let Some(trick_mode) = self.dsm_trick_mode {
            buf.push(track!(trick_mode.to_u8())?);
        }
        if let Some(info) = self.additional_copy_info {
            buf.push(track!(fields::write_additional_copy_info(info))?);
        }
        if let Some(crc) = self.previous_pes_packet_crc {
            let mut b = [0; 2];
            BigEndian::write_u16(&mut b, crc);
            buf.extend_from_slice(&b);
        }
        buf.extend((0..self.stuffing_len).map(|_| STUFFING_BYTE));

        track_assert!(
            buf.len() <= usize::from(u8::max_value()),
            ErrorKind::InvalidInput,
            "Too long optional header: {} bytes",
            buf.len()
        );
        Ok(buf)
    }

    /// Second pass: the fixed part, once `PES_header_data_length` is known.
    fn encode_fixed_part(&self, header_data_len: usize) -> Result<[u8; 9]> {
        track_assert!(
            u64::from(self.scrambling_control) <= flags1::SCRAMBLING_CONTROL.max_value(),
            ErrorKind::InvalidInput,
            "Too large PES_scrambling_control: {}",
            self.scrambling_control
        );
        track_assert!(header_data_len <= 0xFF, ErrorKind::InvalidInput; header_data_len);

        let mut buf = [0; 9];
        BigEndian::write_u24(&mut buf[0..3], 1);
        buf[3] = self.stream_id.as_u8();
        BigEndian::write_u16(&mut buf[4..6], self.packet_len);
        buf[6] = flags1::MARKER.put_u8(flags1::MARKER_VALUE)
            | flags1::SCRAMBLING_CONTROL.put_u8(self.scrambling_control)
            | flags1::PRIORITY.put_flag(self.priority)
            | flags1::DATA_ALIGNMENT_INDICATOR.put_flag(self.data_alignment_indicator)
            | flags1::COPYRIGHT.put_flag(self.copyright)
            | flags1::ORIGINAL_OR_COPY.put_flag(self.original_or_copy);
        buf[7] = flags2::PTS_DTS_FLAGS.put_u8(self.pts_dts_flags().as_u8())
            | flags2::ESCR_FLAG.put_flag(self.escr.is_some())
            | flags2::ES_RATE_FLAG.put_flag(self.es_rate.is_some())
            | flags2::DSM_TRICK_MODE_FLAG.put_flag(self.dsm_trick_mode.is_some())
            | flags2::ADDITIONAL_COPY_INFO_FLAG.put_flag(self.additional_copy_info.is_some())
            | flags2::PES_CRC_FLAG.put_flag(self.previous_pes_packet_crc.is_some())
            | flags2::PES_EXTENSION_FLAG.put_flag(self.pes_extension);
        buf[8] = header_data_len as u8;
        Ok(buf)
    }
}

/// PES header decoder.
///
/// By default the decoder is lenient: mark bits, timestamp prefixes and
/// stuffing bytes are masked out rather than validated. Setting the
/// `PES_STRICT_MARKER_BITS` environment variable to `true` (read by
/// `PesHeaderDecoder::new`) or calling `with_strict_marker_bits(true)`
/// makes violations an `ErrorKind::InvalidInput` error.
#[derive(Debug, Default, Clone)]
pub struct PesHeaderDecoder {
    strict_marker_bits: bool,
}
impl PesHeaderDecoder {
    /// Makes a new `PesHeaderDecoder` instance configured from the environment.
    pub fn new() -> Self {
        let strict_marker_bits = env::var(PES_STRICT_MARKER_BITS)
            .map(|v| is_enabled(&v))
            .unwrap_or(false);
        PesHeaderDecoder { strict_marker_bits }
    }

    /// Enables or disables mark bit validation.
    pub fn with_strict_marker_bits(mut self, strict: bool) -> Self {
        self.strict_marker_bits = strict;
        self
    }

    /// Returns `true` if mark bits are validated.
    pub fn is_strict(&self) -> bool {
        self.strict_marker_bits
    }

    /// Decodes a header from the beginning of `buf`.
    ///
    /// See `PesHeader::decode`.
    pub fn decode(&self, buf: &[u8]) -> Result<Option<(PesHeader, usize)>> {
        let strict = self.strict_marker_bits;
        if buf.len() < PesHeader::FIXED_LEN {
            return Ok(None);
        }
        let header_len = PesHeader::FIXED_LEN + usize::from(buf[8]);
        if buf.len() < header_len {
            return Ok(None);
        }

        let start_code = BigEndian::read_u24(&buf[0..3]);
        track_assert_eq!(
            start_code,
            1,
            ErrorKind::InvalidInput,
            "Unexpected packet_start_code_prefix"
        );

        let stream_id = StreamId::new(buf[3]);
        if !stream_id.has_optional_header() {
            log::trace!(
                "stream_id {:#04x} does not carry an optional PES header",
                stream_id.as_u8()
            );
        }
        let packet_len = BigEndian::read_u16(&buf[4..6]);

        let b = buf[6];
        let marker = flags1::MARKER.get_u8(b);
        if strict {
            track_assert_eq!(
                marker,
                flags1::MARKER_VALUE,
                ErrorKind::InvalidInput,
                "Unexpected marker bits"
            );
        } else if marker != flags1::MARKER_VALUE {
            log::trace!("Unexpected marker bits: {:#04b}", marker);
        }
        let scrambling_control = flags1::SCRAMBLING_CONTROL.get_u8(b);
        let priority = flags1::PRIORITY.flag(b);
        let data_alignment_indicator = flags1::DATA_ALIGNMENT_INDICATOR.flag(b);
        let copyright = flags1::COPYRIGHT.flag(b);
        let original_or_copy = flags1::ORIGINAL_OR_COPY.flag(b);

        let b = buf[7];
        let pts_dts_flags = PtsDtsFlags::from_u8(flags2::PTS_DTS_FLAGS.get_u8(b));
        let escr_flag = flags2::ESCR_FLAG.flag(b);
        let es_rate_flag = flags2::ES_RATE_FLAG.flag(b);
        let dsm_trick_mode_flag = flags2::DSM_TRICK_MODE_FLAG.flag(b);
        let additional_copy_info_flag = flags2::ADDITIONAL_COPY_INFO_FLAG.flag(b);
        let pes_crc_flag = flags2::PES_CRC_FLAG.flag(b);
        let pes_extension = flags2::PES_EXTENSION_FLAG.flag(b);
        track_assert!(
            pts_dts_flags != PtsDtsFlags::Reserved,
            ErrorKind::InvalidInput,
            "Forbidden PTS_DTS_flags value"
        );

        let mut region = Region::new(&buf[PesHeader::FIXED_LEN..header_len]);
        let (pts, dts) = match pts_dts_flags {
            PtsDtsFlags::PtsOnly => {
                let pts = track!(Timestamp::read_from(
                    track!(region.take(bits::timestamp::SIZE, "PTS"))?,
                    PTS_PREFIX,
                    strict
                ))?;
                (Some(pts), None)
            }
            PtsDtsFlags::PtsAndDts => {
                let pts = track!(Timestamp::read_from(
                    track!(region.take(bits::timestamp::SIZE, "PTS"))?,
                    PTS_WITH_DTS_PREFIX,
                    strict
                ))?;
                let dts = track!(Timestamp::read_from(
                    track!(region.take(bits::timestamp::SIZE, "DTS"))?,
                    DTS_PREFIX,
                    strict
                ))?;
                (Some(pts), Some(dts))
            }
            _ => (None, None),
        };
        let escr = if escr_flag {
            let block = track!(region.take(bits::escr::SIZE, "ESCR"))?;
            Some(track!(ClockReference::read_from(block, strict))?)
        } else {
            None
        };
        let es_rate = if es_rate_flag {
            let block = track!(region.take(bits::es_rate::SIZE, "ES_rate"))?;
            Some(track!(EsRate::read_from(block, strict))?)
        } else {
            None
        };
        let dsm_trick_mode = if dsm_trick_mode_flag {
            let block = track!(region.take(bits::trick_mode::SIZE, "DSM trick mode"))?;
            Some(TrickMode::from_u8(block[0]))
        } else {
            None
        };
        let additional_copy_info = if additional_copy_info_flag {
            let block = track!(region.take(bits::copy_info::SIZE, "additional_copy_info"))?;
            Some(track!(fields::read_additional_copy_info(block[0], strict))?)
        } else {
            None
        };
        let previous_pes_packet_crc = if pes_crc_flag {
            let block = track!(region.take(2, "previous_PES_packet_CRC"))?;
            Some(BigEndian::read_u16(block))
        } else {
            None
        };

        let rest = region.rest();
        if !rest.is_empty() {
            log::trace!(
                "Skipping {} bytes after the optional fields (pes_extension={})",
                rest.len(),
                pes_extension
            );
            if strict && !pes_extension {
                track_assert!(
                    rest.iter().all(|&b| b == STUFFING_BYTE),
                    ErrorKind::InvalidInput,
                    "Unexpected stuffing byte"
                );
            }
        }

        let header = PesHeader {
            stream_id,
            packet_len,
            scrambling_control,
            priority,
            data_alignment_indicator,
            copyright,
            original_or_copy,
            pts,
            dts,
            escr,
            es_rate,
            dsm_trick_mode,
            additional_copy_info,
            previous_pes_packet_crc,
            pes_extension,
            stuffing_len: rest.len() as u8,
        };
        Ok(Some((header, header_len)))
    }
}

fn is_enabled(value: &str) -> bool {
    value.to_lowercase() == "true"
}

/// The `PES_header_data_length` bytes following the fixed part.
#[derive(Debug)]
struct Region<'a> {
    buf: &'a [u8],
}
impl<'a> Region<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Region { buf }
    }

    fn take(&mut self, size: usize, field: &str) -> Result<&'a [u8]> {
        track_assert!(
            self.buf.len() >= size,
            ErrorKind::InvalidInput,
            "{} overflows PES_header_data_length: required={}, remaining={}",
            field,
            size,
            self.buf.len()
        );
        let (head, tail) = self.buf.split_at(size);
        self.buf = tail;
        Ok(head)
    }

    fn rest(&self) -> &'a [u8] {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(n: u64) -> Timestamp {
        track_try_unwrap!(Timestamp::new(n))
    }

    fn kind_of<T: ::std::fmt::Debug>(result: Result<T>) -> ErrorKind {
        result.err().map(|e| e.kind().clone()).expect("should fail")
    }

    #[test]
    fn encode_pts_only() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(900_000));

        let mut buf = [0; 32];
        let size = track_try_unwrap!(header.encode(&mut buf));
        assert_eq!(size, 14);
        assert_eq!(
            &buf[..size],
            &[0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x80, 0x05, 0x21, 0x00, 0x37, 0x77, 0x41]
        );

        let (decoded, consumed) = track_try_unwrap!(PesHeader::decode(&buf[..size])).unwrap();
        assert_eq!(consumed, 14);
        assert_eq!(decoded.pts, Some(ts(900_000)));
        assert_eq!(decoded.dts, None);
        assert_eq!(decoded, header);
    }

    #[test]
    fn encode_pts_and_dts() {
        let mut header = PesHeader::new(StreamId::new(0xC0));
        header.pts = Some(ts(5_000_000_000 % (1 << 33)));
        header.dts = Some(ts(3_000_000_000));

        let bytes = track_try_unwrap!(header.to_bytes());
        assert_eq!(bytes.len(), 19);
        assert_eq!(bytes[7], 0xC0);
        assert_eq!(bytes[8], 10);
        assert_eq!(bytes[9] >> 4, 0b0011);
        assert_eq!(bytes[14] >> 4, 0b0001);

        let (decoded, consumed) = track_try_unwrap!(PesHeader::decode(&bytes)).unwrap();
        assert_eq!(consumed, 19);
        assert_eq!(decoded.pts, Some(ts(5_000_000_000)));
        assert_eq!(decoded.dts, Some(ts(3_000_000_000)));
    }

    #[test]
    fn timestamps_survive_encoding() {
        let values = [0, 1, 0x7FFF, 0x8000, 0x3FFF_FFFF, 0x4000_0000, Timestamp::MAX];
        for &pts in &values {
            for &dts in &values {
                let mut header = PesHeader::new(StreamId::new(0xE0));
                header.pts = Some(ts(pts));
                let bytes = track_try_unwrap!(header.to_bytes());
                let (decoded, _) = track_try_unwrap!(PesHeader::decode(&bytes)).unwrap();
                assert_eq!(decoded, header);

                header.dts = Some(ts(dts));
                let bytes = track_try_unwrap!(header.to_bytes());
                let (decoded, _) = track_try_unwrap!(PesHeader::decode(&bytes)).unwrap();
                assert_eq!(decoded, header);
            }
        }
    }

    #[test]
    fn short_fixed_part_needs_more_data() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(900_000));
        let bytes = track_try_unwrap!(header.to_bytes());

        assert_eq!(track_try_unwrap!(PesHeader::decode(&bytes[..7])), None);
        assert_eq!(track_try_unwrap!(PesHeader::decode(&[])), None);
    }

    #[test]
    fn every_truncation_needs_more_data() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(123_456_789));
        header.dts = Some(ts(123_450_000));
        header.escr = Some(track_try_unwrap!(ClockReference::new(1_000, 5)));
        header.es_rate = Some(track_try_unwrap!(EsRate::new(10_000)));
        header.stuffing_len = 4;
        let bytes = track_try_unwrap!(header.to_bytes());
        assert_eq!(bytes.len(), 9 + 10 + 6 + 3 + 4);

        for k in 0..bytes.len() {
            assert_eq!(track_try_unwrap!(PesHeader::decode(&bytes[..k])), None, "k={}", k);
        }
        assert!(track_try_unwrap!(PesHeader::decode(&bytes)).is_some());
    }

    #[test]
    fn declared_length_beyond_buffer_needs_more_data() {
        let buf = [
            0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0xC0, 0x0A, 0x31, 0x00, 0x01, 0x00, 0x01,
        ];
        assert_eq!(track_try_unwrap!(PesHeader::decode(&buf)), None);
    }

    #[test]
    fn escr_max_values() {
        let buf = [
            0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x20, 0x06, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        let decoder = PesHeaderDecoder::default().with_strict_marker_bits(true);
        let (header, consumed) = track_try_unwrap!(decoder.decode(&buf)).unwrap();
        assert_eq!(consumed, 15);
        let escr = header.escr.expect("ESCR");
        assert_eq!(escr.base(), (1 << 33) - 1);
        assert_eq!(escr.extension(), 511);

        assert_eq!(track_try_unwrap!(header.to_bytes()), &buf[..]);
    }

    #[test]
    fn consumption_includes_stuffing() {
        let mut buf = vec![0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x80, 0x08];
        buf.extend_from_slice(&[0x21, 0x00, 0x37, 0x77, 0x41]);
        buf.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        buf.extend_from_slice(&[0xAA, 0xBB]); // payload

        let (header, consumed) = track_try_unwrap!(PesHeader::decode(&buf)).unwrap();
        assert_eq!(consumed, 9 + 8);
        assert_eq!(header.stuffing_len, 3);
        assert_eq!(header.header_data_len(), 8);
        assert_eq!(track_try_unwrap!(header.to_bytes()), &buf[..consumed]);
    }

    #[test]
    fn fields_overflowing_declared_length_are_rejected() {
        let buf = [
            0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x80, 0x03, 0x21, 0x00, 0x37, 0x77, 0x41,
        ];
        assert_eq!(kind_of(PesHeader::decode(&buf)), ErrorKind::InvalidInput);
    }

    #[test]
    fn reserved_pts_dts_flags_are_rejected() {
        let buf = [
            0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x40, 0x05, 0x11, 0x00, 0x01, 0x00, 0x01,
        ];
        assert_eq!(kind_of(PesHeader::decode(&buf)), ErrorKind::InvalidInput);

        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.dts = Some(ts(1));
        assert_eq!(header.pts_dts_flags(), PtsDtsFlags::Reserved);
        assert_eq!(kind_of(header.to_bytes()), ErrorKind::InvalidInput);
    }

    #[test]
    fn bad_start_code_is_rejected() {
        let buf = [0x00, 0x00, 0x02, 0xE0, 0x00, 0x00, 0x80, 0x00, 0x00];
        assert_eq!(kind_of(PesHeader::decode(&buf)), ErrorKind::InvalidInput);
    }

    #[test]
    fn mark_bits_are_set_when_encoding() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(0));
        header.dts = Some(ts(0));
        header.escr = Some(track_try_unwrap!(ClockReference::new(0, 0)));
        header.es_rate = Some(track_try_unwrap!(EsRate::new(0)));
        header.additional_copy_info = Some(0);
        let bytes = track_try_unwrap!(header.to_bytes());

        assert_eq!(bytes[6] >> 6, 0b10);
        assert_eq!(&bytes[9..14], &[0x31, 0x00, 0x01, 0x00, 0x01]);
        assert_eq!(&bytes[14..19], &[0x11, 0x00, 0x01, 0x00, 0x01]);
        assert_eq!(&bytes[19..25], &[0xC4, 0x00, 0x04, 0x00, 0x04, 0x01]);
        assert_eq!(&bytes[25..28], &[0x80, 0x00, 0x01]);
        assert_eq!(bytes[28], 0x80);
    }

    #[test]
    fn lenient_and_strict_decoding() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(900_000));
        let mut bytes = track_try_unwrap!(header.to_bytes());
        bytes[11] &= 0xFE; // second timestamp mark bit

        let (decoded, _) = track_try_unwrap!(PesHeader::decode(&bytes)).unwrap();
        assert_eq!(decoded.pts, Some(ts(900_000)));

        let strict = PesHeaderDecoder::default().with_strict_marker_bits(true);
        assert!(strict.is_strict());
        assert_eq!(kind_of(strict.decode(&bytes)), ErrorKind::InvalidInput);
    }

    #[test]
    fn all_fields_survive_encoding() {
        let mut header = PesHeader::new(StreamId::new(0xBD));
        header.packet_len = 1234;
        header.scrambling_control = 0b01;
        header.priority = true;
        header.data_alignment_indicator = true;
        header.copyright = true;
        header.original_or_copy = true;
        header.pts = Some(ts(Timestamp::MAX));
        header.dts = Some(ts(42));
        header.escr = Some(track_try_unwrap!(ClockReference::new(0x1_0000_0001, 299)));
        header.es_rate = Some(track_try_unwrap!(EsRate::new(EsRate::MAX)));
        header.dsm_trick_mode = Some(TrickMode::SlowMotion { rep_cntrl: 3 });
        header.additional_copy_info = Some(0x7F);
        header.previous_pes_packet_crc = Some(0xBEEF);
        header.stuffing_len = 2;
        assert_eq!(header.optional_fields_len(), PesHeader::MAX_FIELDS_LEN);

        let mut buf = [0; 64];
        let size = track_try_unwrap!(header.encode(&mut buf));
        assert_eq!(size, header.header_len());
        assert_eq!(buf[4..6], [0x04, 0xD2]);
        assert_eq!(buf[6], 0b10_01_1111);
        assert_eq!(buf[7], 0xFE);
        assert_eq!(usize::from(buf[8]), PesHeader::MAX_FIELDS_LEN + 2);

        let strict = PesHeaderDecoder::default().with_strict_marker_bits(true);
        let (decoded, consumed) = track_try_unwrap!(strict.decode(&buf[..size])).unwrap();
        assert_eq!(consumed, size);
        assert_eq!(decoded, header);
    }

    #[test]
    fn unknown_stream_ids_are_kept() {
        for &id in &[0xFC, 0xBE, 0xFF, 0x00] {
            let header = PesHeader::new(StreamId::new(id));
            let bytes = track_try_unwrap!(header.to_bytes());
            let (decoded, consumed) = track_try_unwrap!(PesHeader::decode(&bytes)).unwrap();
            assert_eq!(consumed, 9);
            assert_eq!(decoded.stream_id.as_u8(), id);
        }
    }

    #[test]
    fn encode_checks_destination_size() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(1));
        header.dts = Some(ts(1));

        let mut buf = [0; 18];
        assert_eq!(kind_of(header.encode(&mut buf)), ErrorKind::InvalidInput);
        let mut buf = [0; 19];
        assert_eq!(track_try_unwrap!(header.encode(&mut buf)), 19);
    }

    #[test]
    fn encode_checks_field_ranges() {
        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.scrambling_control = 4;
        assert_eq!(kind_of(header.to_bytes()), ErrorKind::InvalidInput);

        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.additional_copy_info = Some(0x80);
        assert_eq!(kind_of(header.to_bytes()), ErrorKind::InvalidInput);

        let mut header = PesHeader::new(StreamId::new(0xE0));
        header.pts = Some(ts(0));
        header.stuffing_len = 0xFF;
        assert_eq!(kind_of(header.to_bytes()), ErrorKind::InvalidInput);
    }

    #[test]
    fn pes_extension_is_skipped() {
        let buf = [
            0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x01, 0x03, 0x1E, 0x60, 0xE8,
        ];
        let decoder = PesHeaderDecoder::default().with_strict_marker_bits(true);
        let (header, consumed) = track_try_unwrap!(decoder.decode(&buf)).unwrap();
        assert_eq!(consumed, 12);
        assert!(header.pes_extension);
        assert_eq!(header.stuffing_len, 3);
        assert_eq!(kind_of(header.to_bytes()), ErrorKind::Unsupported);
    }

    #[test]
    fn packet_len_helpers() {
        let mut header = PesHeader::new(StreamId::new(0xC0));
        header.pts = Some(ts(0));
        assert_eq!(header.es_len(), None);

        header.set_packet_len_for_payload(100);
        assert_eq!(header.packet_len, 3 + 5 + 100);
        assert_eq!(header.es_len(), Some(100));

        header.packet_len = 4;
        assert_eq!(header.es_len(), None);

        header.set_packet_len_for_payload(70_000);
        assert_eq!(header.packet_len, 0);
    }

    #[test]
    fn empty_optional_region_with_pts_flag_is_rejected() {
        let buf = [0x00, 0x00, 0x01, 0xE0, 0x00, 0x00, 0x80, 0x80, 0x00];
        assert_eq!(kind_of(PesHeader::decode(&buf)), ErrorKind::InvalidInput);
    }

    #[test]
    fn strict_switch_value_is_case_insensitive() {
        assert!(is_enabled("true"));
        assert!(is_enabled("TRUE"));
        assert!(is_enabled("True"));
        assert!(!is_enabled("false"));
        assert!(!is_enabled("1"));
        assert!(!is_enabled(""));
    }

    #[test]
    fn types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PesHeader>();
        assert_send_sync::<PesHeaderDecoder>();
    }
}
