use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a SaveTheSize operation can fail.
///
/// Each variant is a distinct failure cause so callers other than the CLI
/// can branch on it. Corruption is all-or-nothing: no variant implies a
/// partially usable result.
#[derive(Error, Debug)]
pub enum StsError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raised by header decoding when handed fewer bytes than the fixed layout.
    #[error("header needs {need} bytes, got {have}")]
    Format { have: usize, need: usize },

    #[error("not a valid container: smaller than header size ({len} < {need} bytes)")]
    TooSmall { len: u64, need: u64 },

    #[error("bad magic number 0x{found:08x} (expected 0x{expected:08x}); not a SaveTheSize file")]
    BadMagic { found: u32, expected: u32 },

    #[error("unsupported format version {found} (only version {supported} is supported)")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("size mismatch: header declares {declared} compressed bytes but {actual} follow the header")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("decompressed size mismatch: header declares {expected} bytes, got {actual}")]
    DecompressedSizeMismatch { expected: u64, actual: u64 },

    #[error("corrupt {codec} stream: {msg}")]
    CorruptStream { codec: &'static str, msg: String },

    #[error("{codec} encoder failed: {msg}")]
    Encode { codec: &'static str, msg: String },
}

impl StsError {
    /// Wrap an I/O error for `path`, promoting `NotFound` to [`StsError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            StsError::FileNotFound { path }
        } else {
            StsError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, StsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_promoted() {
        let err = StsError::io("missing.bin", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, StsError::FileNotFound { ref path } if path == &PathBuf::from("missing.bin")));
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = StsError::io(
            "locked.bin",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        match err {
            StsError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn messages_carry_the_numbers() {
        let err = StsError::BadMagic { found: 0xdead_beef, expected: 0x5354_5346 };
        assert_eq!(
            err.to_string(),
            "bad magic number 0xdeadbeef (expected 0x53545346); not a SaveTheSize file"
        );
        let err = StsError::SizeMismatch { declared: 10, actual: 12 };
        assert!(err.to_string().contains("declares 10"));
    }
}
