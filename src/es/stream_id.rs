use {ErrorKind, Result};

/// Stream identifier.
///
/// Every 8-bit value is accepted; identifiers outside the assigned ranges
/// are reserved but still carried through decoding and encoding unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u8);
impl StreamId {
    /// `program_stream_map`.
    pub const PROGRAM_STREAM_MAP: u8 = 0xBC;

    /// `private_stream_1`.
    pub const PRIVATE_STREAM_1: u8 = 0xBD;

    /// `padding_stream`.
    pub const PADDING_STREAM: u8 = 0xBE;

    /// `private_stream_2`.
    pub const PRIVATE_STREAM_2: u8 = 0xBF;

    /// Minimum value of the identifiers for audio streams.
    pub const AUDIO_MIN: u8 = 0xC0;

    /// Maximum value of the identifiers for audio streams.
    pub const AUDIO_MAX: u8 = 0xDF;

    /// Minimum value of the identifiers for video streams.
    pub const VIDEO_MIN: u8 = 0xE0;

    /// Maximum value of the identifiers for video streams.
    pub const VIDEO_MAX: u8 = 0xEF;

    /// Video stream number 2, commonly used for H.264 in GB28181 program streams.
    pub const VIDEO_H264: u8 = 0xE2;

    /// `ECM_stream`.
    pub const ECM_STREAM: u8 = 0xF0;

    /// `EMM_stream`.
    pub const EMM_STREAM: u8 = 0xF1;

    /// `DSMCC_stream` (ISO/IEC 13818-6).
    pub const DSMCC_STREAM: u8 = 0xF2;

    /// ITU-T Rec. H.222.1 type E.
    pub const H222_1_TYPE_E: u8 = 0xF8;

    /// `program_stream_directory`.
    pub const PROGRAM_STREAM_DIRECTORY: u8 = 0xFF;

    /// Makes a new `StreamId` instance.
    pub fn new(id: u8) -> Self {
        StreamId(id)
    }

    /// Makes a new `StreamId` instance for audio stream.
    ///
    /// # Errors
    ///
    /// If `id` is not between `AUDIO_MIN` and `AUDIO_MAX`, it will return an `ErrorKind::InvalidInput` error.
    pub fn new_audio(id: u8) -> Result<Self> {
        track_assert!(
            Self::AUDIO_MIN <= id && id <= Self::AUDIO_MAX,
            ErrorKind::InvalidInput,
            "Not an audio ID: {}",
            id
        );
        Ok(StreamId(id))
    }

    /// Makes a new `StreamId` instance for video stream.
    ///
    /// # Errors
    ///
    /// If `id` is not between `VIDEO_MIN` and `VIDEO_MAX`, it will return an `ErrorKind::InvalidInput` error.
    pub fn new_video(id: u8) -> Result<Self> {
        track_assert!(
            Self::VIDEO_MIN <= id && id <= Self::VIDEO_MAX,
            ErrorKind::InvalidInput,
            "Not a video ID: {}",
            id
        );
        Ok(StreamId(id))
    }

    /// Returns the value of the identifier.
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Returns `true` if it is an audio identifier, otherwise `false`.
    pub fn is_audio(&self) -> bool {
        Self::AUDIO_MIN <= self.0 && self.0 <= Self::AUDIO_MAX
    }

    /// Returns `true` if it is a video identifier, otherwise `false`.
    pub fn is_video(&self) -> bool {
        Self::VIDEO_MIN <= self.0 && self.0 <= Self::VIDEO_MAX
    }

    /// Returns `true` if it is one of the private stream identifiers, otherwise `false`.
    pub fn is_private(&self) -> bool {
        self.0 == Self::PRIVATE_STREAM_1 || self.0 == Self::PRIVATE_STREAM_2
    }

    /// Returns `true` if it is the padding stream identifier, otherwise `false`.
    pub fn is_padding(&self) -> bool {
        self.0 == Self::PADDING_STREAM
    }

    /// Returns `true` if packets of this stream carry the optional PES header
    /// (the flag bytes, `PES_header_data_length` and the optional fields),
    /// otherwise `false`.
    ///
    /// Packets of the excluded streams put their data bytes (or padding)
    /// directly after `PES_packet_length`.
    pub fn has_optional_header(&self) -> bool {
        match self.0 {
            Self::PROGRAM_STREAM_MAP
            | Self::PADDING_STREAM
            | Self::PRIVATE_STREAM_2
            | Self::ECM_STREAM
            | Self::EMM_STREAM
            | Self::PROGRAM_STREAM_DIRECTORY
            | Self::DSMCC_STREAM
            | Self::H222_1_TYPE_E => false,
            _ => true,
        }
    }
}
impl From<u8> for StreamId {
    fn from(f: u8) -> Self {
        StreamId(f)
    }
}
