//! Output file naming.
//!
//! Everything here is pure. The one filesystem query involved, whether the
//! chosen decompression target already exists, is made by the caller and
//! passed in; it is a plain check-then-write and not atomic.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::format::FILE_EXTENSION;

/// Infix inserted before the extension when the decompression target exists.
pub const COLLISION_SUFFIX: &str = "_decompressed";

/// Default compression target: `<input>.savethesize`.
pub fn compressed_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(FILE_EXTENSION);
    PathBuf::from(name)
}

/// The usable file name inside an embedded original name, if any.
///
/// The stored name is untrusted: directory components (either separator
/// style) are dropped, and empty, `.` and `..` names are rejected.
pub fn embedded_file_name(name: &str) -> Option<&str> {
    match name.rsplit(['/', '\\']).next()? {
        "" | "." | ".." => None,
        file => Some(file),
    }
}

/// Target used when the container carries no usable name: the input path
/// without its `.savethesize` extension, or `<input>.out` otherwise.
pub fn fallback_output_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
        return input.with_extension("");
    }
    let mut name = input.as_os_str().to_os_string();
    name.push(".out");
    PathBuf::from(name)
}

/// Decompression target before the collision check: the explicit output if
/// given, else the embedded name relative to the working directory, else
/// [`fallback_output_path`].
pub fn desired_output_path(input: &Path, explicit: Option<&Path>, embedded_name: &str) -> PathBuf {
    match (explicit, embedded_file_name(embedded_name)) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(name)) => PathBuf::from(name),
        (None, None) => fallback_output_path(input),
    }
}

/// Final decompression target given whether `desired` already exists.
///
/// A colliding path gets [`COLLISION_SUFFIX`] before its final extension:
/// `a.txt` becomes `a_decompressed.txt`, `README` becomes `README_decompressed`.
/// The renamed path itself is not checked again.
pub fn resolve_collision(desired: &Path, exists: bool) -> PathBuf {
    if !exists {
        return desired.to_path_buf();
    }
    let mut name: OsString = desired.file_stem().unwrap_or_default().to_os_string();
    name.push(COLLISION_SUFFIX);
    if let Some(ext) = desired.extension() {
        name.push(".");
        name.push(ext);
    }
    desired.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_path_appends_the_extension() {
        assert_eq!(
            compressed_output_path(Path::new("dir/report.txt")),
            PathBuf::from("dir/report.txt.savethesize")
        );
        assert_eq!(
            compressed_output_path(Path::new("Makefile")),
            PathBuf::from("Makefile.savethesize")
        );
    }

    #[test]
    fn embedded_names_lose_directories() {
        assert_eq!(embedded_file_name("report.txt"), Some("report.txt"));
        assert_eq!(embedded_file_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(embedded_file_name(r"..\..\boot.ini"), Some("boot.ini"));
        assert_eq!(embedded_file_name("/abs/path/x"), Some("x"));
    }

    #[test]
    fn unusable_embedded_names_are_rejected() {
        for name in ["", ".", "..", "dir/", "a/..", r"a\."] {
            assert_eq!(embedded_file_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn fallback_strips_our_extension() {
        assert_eq!(
            fallback_output_path(Path::new("in/data.bin.savethesize")),
            PathBuf::from("in/data.bin")
        );
        assert_eq!(
            fallback_output_path(Path::new("in/blob")),
            PathBuf::from("in/blob.out")
        );
    }

    #[test]
    fn desired_path_precedence() {
        let input = Path::new("x.savethesize");
        assert_eq!(
            desired_output_path(input, Some(Path::new("out.bin")), "orig.txt"),
            PathBuf::from("out.bin")
        );
        assert_eq!(
            desired_output_path(input, None, "nested/orig.txt"),
            PathBuf::from("orig.txt")
        );
        assert_eq!(desired_output_path(input, None, ".."), PathBuf::from("x"));
    }

    #[test]
    fn no_collision_keeps_the_path() {
        let p = Path::new("dir/a.txt");
        assert_eq!(resolve_collision(p, false), p);
    }

    #[test]
    fn collision_suffix_goes_before_the_last_extension() {
        let cases = [
            ("a.txt", "a_decompressed.txt"),
            ("dir/a.txt", "dir/a_decompressed.txt"),
            ("archive.tar.gz", "archive.tar_decompressed.gz"),
            ("README", "README_decompressed"),
            (".bashrc", ".bashrc_decompressed"),
        ];
        for (desired, expected) in cases {
            assert_eq!(
                resolve_collision(Path::new(desired), true),
                PathBuf::from(expected),
                "{desired}"
            );
        }
    }
}
