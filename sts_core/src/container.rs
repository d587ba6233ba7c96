//! In-memory container encode/decode.
//!
//! A container is the 280-byte [`Header`] followed immediately by exactly
//! `compressed_size` payload bytes. Nothing may trail the payload.
//!
//! Decoding validates in a fixed order, each step with its own error:
//! length, magic, version, declared compressed size, then the decompressed
//! length reported by the codec.

use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::{Result, StsError};
use crate::format::{Header, HEADER_SIZE, MAGIC, VERSION};

/// Output of [`compress`]: the header that describes `payload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Compressed {
    /// Header bytes followed by the payload; this is the container file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Output of [`decompress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    pub header: Header,
    pub data: Vec<u8>,
}

/// Compress `input` and describe it with a header naming `name_hint`.
///
/// Only the last component of `name_hint` is stored. An empty input yields
/// an empty payload without calling the codec.
pub fn compress(codec: &dyn Codec, input: &[u8], name_hint: &str) -> Result<Compressed> {
    let payload = if input.is_empty() {
        Vec::new()
    } else {
        codec.compress(input)?
    };
    let name = name_hint.rsplit(['/', '\\']).next().unwrap_or_default();
    let header = Header::new(input.len() as u64, payload.len() as u64, name);
    debug!(
        codec = codec.name(),
        original_size = header.original_size,
        compressed_size = header.compressed_size,
        name = %header.original_name,
        "built container"
    );
    Ok(Compressed { header, payload })
}

/// Validate a whole container and return its original bytes.
pub fn decompress(codec: &dyn Codec, container: &[u8]) -> Result<Decompressed> {
    let header = read_checked_header(container)?;

    if header.version != VERSION {
        return Err(StsError::UnsupportedVersion {
            found: header.version,
            supported: VERSION,
        });
    }

    let trailing = (container.len() - HEADER_SIZE) as u64;
    if trailing != header.compressed_size {
        return Err(StsError::SizeMismatch {
            declared: header.compressed_size,
            actual: trailing,
        });
    }

    let payload = &container[HEADER_SIZE..];
    let data = if payload.is_empty() {
        Vec::new()
    } else {
        codec.decompress(payload, header.original_size)?
    };

    if data.len() as u64 != header.original_size {
        return Err(StsError::DecompressedSizeMismatch {
            expected: header.original_size,
            actual: data.len() as u64,
        });
    }

    debug!(
        codec = codec.name(),
        original_size = header.original_size,
        compressed_size = header.compressed_size,
        "container verified"
    );
    Ok(Decompressed { header, data })
}

/// Decode the header of `container` for display.
///
/// Only the length and magic checks are fatal. An unsupported version or a
/// compressed size that disagrees with `container_len` is logged and the
/// header is returned as-is. `container_len` is the full container length,
/// which may exceed `head.len()` when only the leading bytes were read.
pub fn inspect(head: &[u8], container_len: u64) -> Result<Header> {
    let header = read_checked_header_with_len(head, container_len)?;
    if header.version != VERSION {
        warn!(version = header.version, "unsupported format version");
    }
    if !size_consistent(&header, container_len) {
        warn!(
            declared = header.compressed_size,
            actual = container_len.saturating_sub(HEADER_SIZE as u64),
            "compressed size does not match file length"
        );
    }
    Ok(header)
}

/// Whether a container of `container_len` bytes holds exactly the
/// `compressed_size` payload bytes `header` declares.
pub fn size_consistent(header: &Header, container_len: u64) -> bool {
    container_len.checked_sub(HEADER_SIZE as u64) == Some(header.compressed_size)
}

fn read_checked_header(container: &[u8]) -> Result<Header> {
    read_checked_header_with_len(container, container.len() as u64)
}

fn read_checked_header_with_len(head: &[u8], container_len: u64) -> Result<Header> {
    if container_len < HEADER_SIZE as u64 || head.len() < HEADER_SIZE {
        return Err(StsError::TooSmall {
            len: container_len.min(head.len() as u64),
            need: HEADER_SIZE as u64,
        });
    }
    let header = Header::from_bytes(&head[..HEADER_SIZE])?;
    if header.magic != MAGIC {
        return Err(StsError::BadMagic {
            found: header.magic,
            expected: MAGIC,
        });
    }
    Ok(header)
}
