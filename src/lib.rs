//! MPEG-2 PES packet header decoding/encoding library.
//!
//! The crate maps a [`PesHeader`] to and from the exact byte layout defined
//! by ISO/IEC 13818-1 (Table 2-21). It does not buffer, retry or demultiplex:
//! the caller hands over a byte slice and gets back a header plus the number
//! of bytes it occupied, or `None` when more bytes are needed.
//!
//! ```
//! use mpeg2pes::es::StreamId;
//! use mpeg2pes::pes::PesHeader;
//! use mpeg2pes::time::Timestamp;
//!
//! let mut header = PesHeader::new(StreamId::new(0xE0));
//! header.pts = Some(Timestamp::new(900_000).unwrap());
//!
//! let mut buf = [0; 32];
//! let size = header.encode(&mut buf).unwrap();
//! assert_eq!(size, 14);
//!
//! let (decoded, consumed) = PesHeader::decode(&buf[..size]).unwrap().unwrap();
//! assert_eq!(consumed, 14);
//! assert_eq!(decoded, header);
//! ```
//!
//! # References
//!
//! - [Packetized elementary stream](https://en.wikipedia.org/wiki/Packetized_elementary_stream)
//!
//! [`PesHeader`]: pes/struct.PesHeader.html
#![warn(missing_docs)]
extern crate byteorder;
extern crate log;
#[macro_use]
extern crate trackable;

pub use error::{Error, ErrorKind};

macro_rules! track_io {
    ($expr:expr) => {
        $expr.map_err(|e: ::std::io::Error| {
            use trackable::error::ErrorKindExt;
            track!(::Error::from(::ErrorKind::Other.cause(e)))
        })
    };
}

pub mod es;
pub mod pes;
pub mod time;

mod error;

/// This crate specific `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
