/*!
Buffers and primitive codecs for the flexible (compact) wire format.

[`Input`] and [`Output`] carry the negotiated [`ApiVersion`] alongside the
bytes, so message codecs can branch on it without extra parameters.
*/

use std::ops::{Deref, DerefMut};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use snafu::{ensure, ResultExt};

use crate::errors::{self, DecodeError, EncodeError};
use crate::version::ApiVersion;

#[derive(Debug, Clone)]
pub struct Input {
    version: ApiVersion,
    bytes: Bytes,
}

pub struct Output<'a> {
    version: &'a ApiVersion,
    bytes: &'a mut BytesMut,
}

pub trait Encode {
    fn encode(&self, output: &mut Output) -> Result<(), EncodeError>;
}

pub trait Decode: Sized {
    fn decode(buf: &mut Input) -> Result<Self, DecodeError>;
}

impl Input {
    pub fn new(version: ApiVersion, bytes: Bytes) -> Input {
        Input { version, bytes }
    }
    pub fn version(&self) -> ApiVersion {
        self.version
    }
}

impl Buf for Input {
    fn remaining(&self) -> usize {
        self.bytes.remaining()
    }

    fn chunk(&self) -> &[u8] {
        self.bytes.chunk()
    }

    fn advance(&mut self, cnt: usize) {
        self.bytes.advance(cnt)
    }

    fn copy_to_bytes(&mut self, len: usize) -> Bytes {
        self.bytes.copy_to_bytes(len)
    }
}

impl Deref for Input {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl<'a> Output<'a> {
    pub fn new(version: &'a ApiVersion, bytes: &'a mut BytesMut) -> Output<'a> {
        Output { version, bytes }
    }
    pub fn version(&self) -> &ApiVersion {
        self.version
    }
}

impl Deref for Output<'_> {
    type Target = BytesMut;
    fn deref(&self) -> &BytesMut {
        self.bytes
    }
}

impl DerefMut for Output<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        self.bytes
    }
}

pub fn decode_i16(buf: &mut Input) -> Result<i16, DecodeError> {
    ensure!(buf.remaining() >= 2, errors::Underflow);
    Ok(buf.get_i16())
}

pub fn decode_i32(buf: &mut Input) -> Result<i32, DecodeError> {
    ensure!(buf.remaining() >= 4, errors::Underflow);
    Ok(buf.get_i32())
}

/// Writes `value` as 7-bit groups, least significant group first.
pub fn encode_varint(buf: &mut Output, mut value: u32) {
    buf.reserve(5);
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub fn decode_varint(buf: &mut Input) -> Result<u32, DecodeError> {
    let mut value = 0u32;
    for i in 0..5 {
        ensure!(buf.remaining() >= 1, errors::Underflow);
        let byte = buf.get_u8();
        // the fifth group only has room for the top four bits
        ensure!(i < 4 || byte & 0xf0 == 0, errors::VarintTooLong);
        value |= u32::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    errors::VarintTooLong.fail()
}

/// Compact lengths are stored off by one so that zero can mean null.
fn encode_compact_len(buf: &mut Output, len: Option<usize>) -> Result<(), EncodeError> {
    let value = match len {
        None => 0,
        Some(len) => u32::try_from(len)
            .ok()
            .and_then(|len| len.checked_add(1))
            .ok_or_else(|| errors::StringTooLong { len }.build())?,
    };
    encode_varint(buf, value);
    Ok(())
}

fn decode_compact_len(buf: &mut Input) -> Result<Option<usize>, DecodeError> {
    match decode_varint(buf)? {
        0 => Ok(None),
        n => Ok(Some((n - 1) as usize)),
    }
}

pub fn encode_compact_str(buf: &mut Output, value: &str) -> Result<(), EncodeError> {
    encode_compact_len(buf, Some(value.len()))?;
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

pub fn encode_compact_nullable_str(
    buf: &mut Output,
    value: Option<&str>,
) -> Result<(), EncodeError> {
    match value {
        Some(value) => encode_compact_str(buf, value),
        None => encode_compact_len(buf, None),
    }
}

pub fn decode_compact_nullable_str(buf: &mut Input) -> Result<Option<String>, DecodeError> {
    let Some(len) = decode_compact_len(buf)? else {
        return Ok(None);
    };
    ensure!(buf.remaining() >= len, errors::Underflow);
    let bytes = buf.copy_to_bytes(len);
    let value = std::str::from_utf8(&bytes).context(errors::InvalidUtf8)?;
    Ok(Some(value.to_owned()))
}

pub fn decode_compact_str(buf: &mut Input, field: &'static str) -> Result<String, DecodeError> {
    decode_compact_nullable_str(buf)?.ok_or_else(|| errors::NullString { field }.build())
}

/// Writes the element count of a compact array.
pub fn encode_compact_array_len(buf: &mut Output, count: usize) -> Result<(), EncodeError> {
    let value = u32::try_from(count)
        .ok()
        .and_then(|count| count.checked_add(1))
        .ok_or_else(|| errors::TooManyResults { count }.build())?;
    encode_varint(buf, value);
    Ok(())
}

/// Reads the element count of a compact array, `None` for a null array.
///
/// Every element takes at least `min_element_size` bytes, so counts that
/// cannot fit in the rest of the frame are rejected before allocating.
pub fn decode_compact_array_len(
    buf: &mut Input,
    min_element_size: usize,
) -> Result<Option<usize>, DecodeError> {
    let Some(len) = decode_compact_len(buf)? else {
        return Ok(None);
    };
    let remaining = buf.remaining();
    ensure!(
        len.saturating_mul(min_element_size) <= remaining,
        errors::ArrayTooLong { len, remaining }
    );
    Ok(Some(len))
}

/// No tagged fields are defined for any structure we encode.
pub fn encode_tagged_fields(buf: &mut Output) {
    encode_varint(buf, 0);
}

pub fn decode_tagged_fields(buf: &mut Input) -> Result<(), DecodeError> {
    let count = decode_varint(buf)?;
    if count > 0 {
        let tag = decode_varint(buf)?;
        return errors::UnknownTag { tag }.fail();
    }
    Ok(())
}
