use serde::Serialize;

use crate::error::{Result, StsError};

/// Magic number identifying a SaveTheSize container ("FSTS" on disk, little-endian).
pub const MAGIC: u32 = 0x5354_5346;

/// The only format revision this crate reads or writes.
pub const VERSION: u32 = 1;

/// Width of the zero-padded original-name field.
pub const NAME_FIELD_SIZE: usize = 256;

/// Longest encoded name stored; one byte of the field is always left for a terminator.
pub const MAX_NAME_LEN: usize = NAME_FIELD_SIZE - 1;

/// Fixed size of the container header in bytes.
///   magic:u32 + version:u32 + original_size:u64 + compressed_size:u64
///   + original_name[256]
///   = 4 + 4 + 8 + 8 + 256 = 280
pub const HEADER_SIZE: usize = 280;

/// Extension appended to compressed files when no output path is given.
pub const FILE_EXTENSION: &str = "savethesize";

const NAME_OFFSET: usize = 24;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 280-byte container header.
///
/// Decoding is purely structural: `magic` and `version` hold whatever the
/// file says and are checked by the container codec, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub magic: u32,
    pub version: u32,
    /// Byte length of the uncompressed payload.
    pub original_size: u64,
    /// Byte length of the compressed payload that follows the header.
    pub compressed_size: u64,
    /// Original file name. Untrusted metadata; never a path to open directly.
    pub original_name: String,
}

impl Header {
    /// Build a header for a freshly compressed payload.
    ///
    /// `original_name` is truncated to at most [`MAX_NAME_LEN`] bytes, cut
    /// back to the nearest UTF-8 character boundary.
    pub fn new(original_size: u64, compressed_size: u64, original_name: &str) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            original_size,
            compressed_size,
            original_name: truncate_name(original_name).to_owned(),
        }
    }

    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..16].copy_from_slice(&self.original_size.to_le_bytes());
        buf[16..24].copy_from_slice(&self.compressed_size.to_le_bytes());
        let name = truncate_name(&self.original_name).as_bytes();
        buf[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name);
        // rest of the name field stays zero
        buf
    }

    /// Deserialize from the first `HEADER_SIZE` bytes of `buf`.
    ///
    /// Fails only when `buf` is too short; trailing zero bytes of the name
    /// field are trimmed and invalid UTF-8 is replaced lossily.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(StsError::Format {
                have: buf.len(),
                need: HEADER_SIZE,
            });
        }
        let field = &buf[NAME_OFFSET..HEADER_SIZE];
        let name_len = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(Self {
            magic: u32::from_le_bytes(le_array(buf, 0)),
            version: u32::from_le_bytes(le_array(buf, 4)),
            original_size: u64::from_le_bytes(le_array(buf, 8)),
            compressed_size: u64::from_le_bytes(le_array(buf, 16)),
            original_name: String::from_utf8_lossy(&field[..name_len]).into_owned(),
        })
    }

    /// Compressed size as a percentage of the original, see [`ratio_percent`].
    pub fn ratio_percent(&self) -> Option<f64> {
        ratio_percent(self.original_size, self.compressed_size)
    }
}

/// `compressed / original × 100`, rounded to one decimal place.
///
/// `None` when `original` is zero; the ratio is undefined there.
pub fn ratio_percent(original: u64, compressed: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    let pct = compressed as f64 / original as f64 * 100.0;
    Some((pct * 10.0).round() / 10.0)
}

fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn le_array<const N: usize>(buf: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[at..at + N]);
    out
}
