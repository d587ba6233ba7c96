use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::codec::Codec;
use crate::container::{self, Decompressed};
use crate::error::{Result, StsError};
use crate::format::{Header, HEADER_SIZE, VERSION};
use crate::paths::{desired_output_path, resolve_collision};
use crate::writer::write_parts;

/// What [`decompress_file`] wrote.
#[derive(Debug, Clone)]
pub struct DecompressReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub header: Header,
    /// The preferred target existed, so the collision suffix was applied.
    pub renamed: bool,
}

/// Header of a container plus what the file itself looks like.
///
/// Produced by [`inspect_file`]. Unsupported versions and size
/// disagreements are reported here instead of failing.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(flatten)]
    pub header: Header,
    pub file_size: u64,
    pub ratio_percent: Option<f64>,
    pub version_supported: bool,
    pub size_consistent: bool,
}

/// Verify and decompress the container at `input`.
///
/// The output path is `output` if given, else the name stored in the
/// header (directories stripped) relative to the working directory. If that
/// path exists, `_decompressed` is inserted before its extension instead of
/// overwriting. The existence check is a single query made just before the
/// write, so a file created in between is not detected.
///
/// The `_decompressed` path is not checked at all: if a file already has that
/// name (from an earlier run, say) it is replaced.
pub fn decompress_file(
    codec: &dyn Codec,
    input: &Path,
    output: Option<&Path>,
) -> Result<DecompressReport> {
    let bytes = fs::read(input).map_err(|e| StsError::io(input, e))?;
    let Decompressed { header, data } = container::decompress(codec, &bytes)?;

    let desired = desired_output_path(input, output, &header.original_name);
    let renamed = desired.exists();
    let output = resolve_collision(&desired, renamed);
    if renamed {
        info!(
            wanted = %desired.display(),
            using = %output.display(),
            "output exists, writing to the suffixed name (replaced if present)"
        );
    }

    write_parts(&output, &[data.as_slice()])?;

    info!(
        input = %input.display(),
        output = %output.display(),
        original_size = header.original_size,
        "decompressed"
    );
    Ok(DecompressReport {
        input: input.to_path_buf(),
        output,
        header,
        renamed,
    })
}

/// Read the header of the container at `input` without decompressing it.
///
/// Only the leading `HEADER_SIZE` bytes are read. Fails on a short file or a
/// foreign magic number; everything else is reported in the result.
pub fn inspect_file(input: &Path) -> Result<InspectReport> {
    let file = File::open(input).map_err(|e| StsError::io(input, e))?;
    let file_size = file.metadata().map_err(|e| StsError::io(input, e))?.len();

    let mut head = Vec::with_capacity(HEADER_SIZE);
    file.take(HEADER_SIZE as u64)
        .read_to_end(&mut head)
        .map_err(|e| StsError::io(input, e))?;
    debug!(path = %input.display(), file_size, read = head.len(), "read header bytes");

    let header = container::inspect(&head, file_size)?;
    Ok(InspectReport {
        path: input.to_path_buf(),
        file_size,
        ratio_percent: header.ratio_percent(),
        version_supported: header.version == VERSION,
        size_consistent: container::size_consistent(&header, file_size),
        header,
    })
}
