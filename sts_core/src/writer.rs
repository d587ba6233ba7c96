use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::codec::Codec;
use crate::container;
use crate::error::{Result, StsError};
use crate::format::{Header, HEADER_SIZE};
use crate::paths::compressed_output_path;

/// What [`compress_file`] wrote.
#[derive(Debug, Clone)]
pub struct CompressReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub header: Header,
}

impl CompressReport {
    /// Total bytes written: header plus payload.
    pub fn container_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.header.compressed_size
    }

    /// Compressed payload as a percentage of the input; `None` for empty input.
    pub fn ratio_percent(&self) -> Option<f64> {
        self.header.ratio_percent()
    }
}

/// Compress the file at `input` into a container.
///
/// The whole input is read into memory. `output` defaults to
/// `<input>.savethesize` and is overwritten if it exists. The header records
/// the input's file name without its directory.
pub fn compress_file(
    codec: &dyn Codec,
    input: &Path,
    output: Option<&Path>,
) -> Result<CompressReport> {
    let raw = fs::read(input).map_err(|e| StsError::io(input, e))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let packed = container::compress(codec, &raw, &name)?;

    let output = output.map_or_else(|| compressed_output_path(input), Path::to_path_buf);
    write_parts(&output, &[&packed.header.to_bytes()[..], &packed.payload[..]])?;

    info!(
        input = %input.display(),
        output = %output.display(),
        original_size = packed.header.original_size,
        compressed_size = packed.header.compressed_size,
        "compressed"
    );
    Ok(CompressReport {
        input: input.to_path_buf(),
        output,
        header: packed.header,
    })
}

/// Create `path` and write `parts` to it back to back.
///
/// The file handle is dropped on every return path.
pub(crate) fn write_parts(path: &Path, parts: &[&[u8]]) -> Result<()> {
    let wrap = |source| StsError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(wrap)?;
    for part in parts {
        file.write_all(part).map_err(wrap)?;
    }
    file.flush().map_err(wrap)
}
