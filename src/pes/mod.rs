//! Packetized elementary stream header.
//!
//! # References
//!
//! - [Packetized elementary stream](https://en.wikipedia.org/wiki/Packetized_elementary_stream)
//! - ISO/IEC 13818-1, Table 2-21 (`PES_packet()`)
pub use self::fields::{EsRate, PtsDtsFlags, TrickMode};
pub use self::header::{PesHeader, PesHeaderDecoder};

pub(crate) mod bits;
mod fields;
mod header;
