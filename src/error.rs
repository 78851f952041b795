use std::io;
use trackable::error::{ErrorKind as TrackableErrorKind, ErrorKindExt, TrackableError};

/// This crate specific `Error` type.
#[derive(Debug, Clone, TrackableError)]
pub struct Error(TrackableError<ErrorKind>);
impl From<io::Error> for Error {
    fn from(f: io::Error) -> Self {
        ErrorKind::Other.cause(f).into()
    }
}

/// Possible error kinds.
///
/// Running out of input while decoding is not an error: decoders report it
/// as `Ok(None)` so that the caller can retry with more bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed header bytes, an out-of-range field value or a destination
    /// buffer that is too small.
    InvalidInput,

    /// Valid but unsupported input.
    Unsupported,

    /// Other errors.
    Other,
}
impl TrackableErrorKind for ErrorKind {}
