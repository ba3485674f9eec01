//! Length-prefixed codec
//!
//! Encoding and decoding of opaque byte sequences behind a fixed-width,
//! little-endian length prefix.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────────────┬─────────────────────────────┐
//! │ Len (2 or 4, LE)     │         Payload             │
//! └──────────────────────┴─────────────────────────────┘
//! ```
//!
//! Concatenated fields parse without delimiters or lookahead. The prefix
//! width is part of the wire contract and must match on both sides.

use std::fmt;
use std::io::{Read, Write};

use crate::error::{Field, LogError, Result};

/// Upper bound on the up-front allocation for a payload. Larger payloads
/// grow the buffer as bytes actually arrive, so a torn tail promising 4 GiB
/// does not allocate 4 GiB.
const MAX_PREALLOC: u64 = 64 * 1024;

/// Width of a length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    /// 2-byte prefix, payloads up to 65535 bytes
    U16,
    /// 4-byte prefix, payloads up to 4294967295 bytes
    U32,
}

impl LengthWidth {
    pub const fn bits(self) -> u32 {
        match self {
            LengthWidth::U16 => 16,
            LengthWidth::U32 => 32,
        }
    }

    /// Size of the prefix on the wire
    pub const fn prefix_len(self) -> usize {
        match self {
            LengthWidth::U16 => 2,
            LengthWidth::U32 => 4,
        }
    }

    /// Largest payload length the prefix can represent
    pub const fn max_len(self) -> u64 {
        match self {
            LengthWidth::U16 => u16::MAX as u64,
            LengthWidth::U32 => u32::MAX as u64,
        }
    }

    /// Reject lengths the prefix cannot represent instead of wrapping them.
    pub(crate) fn check(self, len: usize, field: Field) -> Result<()> {
        if len as u64 > self.max_len() {
            return Err(LogError::EncodingTooLarge {
                field,
                len,
                width: self,
            });
        }
        Ok(())
    }

    fn encode_len(self, len: usize) -> ([u8; 4], usize) {
        let mut prefix = [0u8; 4];
        match self {
            LengthWidth::U16 => prefix[..2].copy_from_slice(&(len as u16).to_le_bytes()),
            LengthWidth::U32 => prefix.copy_from_slice(&(len as u32).to_le_bytes()),
        }
        (prefix, self.prefix_len())
    }

    fn decode_len(self, prefix: &[u8]) -> u64 {
        match self {
            LengthWidth::U16 => u16::from_le_bytes([prefix[0], prefix[1]]) as u64,
            LengthWidth::U32 => {
                u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as u64
            }
        }
    }
}

impl fmt::Display for LengthWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Write `bytes` behind a little-endian length prefix of the given width.
///
/// Fails with `EncodingTooLarge` before writing anything if the length does
/// not fit the prefix.
pub fn write_length_prefixed<W: Write>(dst: &mut W, bytes: &[u8], width: LengthWidth) -> Result<()> {
    write_field(dst, bytes, width, Field::Payload)
}

pub(crate) fn write_field<W: Write>(
    dst: &mut W,
    bytes: &[u8],
    width: LengthWidth,
    field: Field,
) -> Result<()> {
    width.check(bytes.len(), field)?;

    let (prefix, prefix_len) = width.encode_len(bytes.len());
    dst.write_all(&prefix[..prefix_len])?;
    dst.write_all(bytes)?;
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Read one length-prefixed payload.
///
/// Returns:
/// - `Ok(Some(payload))`: a complete payload
/// - `Ok(None)`: the stream ended exactly before the prefix (clean boundary)
/// - `Err(TruncatedRecord)`: the stream ended inside the prefix or payload
pub fn read_length_prefixed<R: Read>(src: &mut R, width: LengthWidth) -> Result<Option<Vec<u8>>> {
    read_field(src, width, Field::PayloadLength, Field::Payload)
}

pub(crate) fn read_field<R: Read>(
    src: &mut R,
    width: LengthWidth,
    prefix_field: Field,
    body_field: Field,
) -> Result<Option<Vec<u8>>> {
    let mut prefix = [0u8; 4];
    let prefix = &mut prefix[..width.prefix_len()];

    let got = read_full(src, prefix)?;
    if got == 0 {
        return Ok(None);
    }
    if got < prefix.len() {
        return Err(LogError::TruncatedRecord {
            field: prefix_field,
            expected: prefix.len() as u64,
            found: got as u64,
        });
    }

    let len = width.decode_len(prefix);
    let mut payload = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
    src.by_ref().take(len).read_to_end(&mut payload)?;

    if (payload.len() as u64) < len {
        return Err(LogError::TruncatedRecord {
            field: body_field,
            expected: len,
            found: payload.len() as u64,
        });
    }

    Ok(Some(payload))
}

/// Fill `buf` from `src`, looping over short reads. Returns the number of
/// bytes read, which is less than `buf.len()` only at end of stream.
fn read_full<R: Read>(src: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
