use std::str::Utf8Error;

use snafu::{Backtrace, Snafu};

/// The byte stream does not follow the response schema.
///
/// This is the only way decoding fails; error codes carried in the payload
/// are data and never surface here.
#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
#[non_exhaustive]
pub enum DecodeError {
    #[snafu(display("unexpected end of frame"))]
    Underflow { backtrace: Backtrace },
    #[snafu(display("unsigned varint is longer than 5 bytes"))]
    VarintTooLong { backtrace: Backtrace },
    #[snafu(display("invalid utf8 when decoding string: {}", source))]
    InvalidUtf8 {
        backtrace: Backtrace,
        source: Utf8Error,
    },
    #[snafu(display("null value for non-nullable string field {}", field))]
    NullString {
        field: &'static str,
        backtrace: Backtrace,
    },
    #[snafu(display("array of {} elements cannot fit in {} remaining bytes", len, remaining))]
    ArrayTooLong {
        len: usize,
        remaining: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("negative throttle time {}", value))]
    NegativeThrottleTime { value: i32, backtrace: Backtrace },
    #[snafu(display("unrecognized tagged field {}", tag))]
    UnknownTag { tag: u32, backtrace: Backtrace },
    #[snafu(display("{} bytes left after the end of the message", remaining))]
    ExtraData {
        remaining: usize,
        backtrace: Backtrace,
    },
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
#[non_exhaustive]
pub enum EncodeError {
    #[snafu(display("string of {} bytes is too long to encode", len))]
    StringTooLong { len: usize, backtrace: Backtrace },
    #[snafu(display("too many feature results: {}", count))]
    TooManyResults { count: usize, backtrace: Backtrace },
    #[snafu(display("throttle time {}ms does not fit in int32", value))]
    ThrottleTimeTooLarge { value: u32, backtrace: Backtrace },
}
