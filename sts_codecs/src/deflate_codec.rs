use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use sts_core::{Codec, Result, StsError};

/// Upper bound on the output buffer reserved up front from an untrusted length.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Raw DEFLATE (RFC 1951) codec, no zlib or gzip framing.
///
/// This is the payload format of every SaveTheSize container.
pub struct DeflateCodec {
    /// Compression level (0 = store, 9 = smallest).
    pub level: u32,
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self {
            level: Compression::default().level(),
        }
    }
}

impl DeflateCodec {
    /// Levels above 9 are clamped to 9.
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }
}

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let encode_err = |e: std::io::Error| StsError::Encode {
            codec: "deflate",
            msg: e.to_string(),
        };
        let mut enc = DeflateEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::new(self.level));
        enc.write_all(raw).map_err(encode_err)?;
        enc.finish().map_err(encode_err)
    }

    fn decompress(&self, compressed: &[u8], expected_len: u64) -> Result<Vec<u8>> {
        // One byte past the expected length is enough to detect an overlong stream.
        let limit = expected_len.saturating_add(1);
        let mut raw = Vec::with_capacity(expected_len.min(MAX_PREALLOC) as usize);
        let mut dec = DeflateDecoder::new(compressed);
        (&mut dec)
            .take(limit)
            .read_to_end(&mut raw)
            .map_err(|e| StsError::CorruptStream {
                codec: "deflate",
                msg: e.to_string(),
            })?;

        // An overlong stream stops at the limit with input left over, so the
        // length is checked before the input is required to be used up.
        if raw.len() as u64 != expected_len {
            return Err(StsError::DecompressedSizeMismatch {
                expected: expected_len,
                actual: raw.len() as u64,
            });
        }
        if dec.total_in() != compressed.len() as u64 {
            return Err(StsError::CorruptStream {
                codec: "deflate",
                msg: format!(
                    "trailing bytes after deflate stream ({} of {} consumed)",
                    dec.total_in(),
                    compressed.len()
                ),
            });
        }
        Ok(raw)
    }
}
