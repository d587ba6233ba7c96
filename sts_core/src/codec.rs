use crate::error::Result;

/// Payload compression abstraction.
///
/// The container format does not record which codec produced the payload;
/// it is always DEFLATE. The trait exists so the container logic can be
/// exercised against other implementations in tests.
///
/// - `compress` is only called with non-empty input; the container stores an
///   empty payload for an empty file without consulting the codec.
/// - `decompress` is only called with a non-empty payload. It must fail with
///   `DecompressedSizeMismatch` when the output length differs from
///   `expected_len` and with `CorruptStream` when the bytes do not decode.
///   Implementations must not produce more than `expected_len + 1` bytes of
///   output, so an untrusted header cannot force an unbounded allocation.
pub trait Codec: Send + Sync {
    /// Human-readable codec name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Compress a whole payload.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decompress a whole payload that should expand to exactly `expected_len` bytes.
    fn decompress(&self, compressed: &[u8], expected_len: u64) -> Result<Vec<u8>>;
}
