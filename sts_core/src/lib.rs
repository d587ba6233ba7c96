pub mod codec;
pub mod container;
pub mod error;
pub mod format;
pub mod paths;
pub mod reader;
pub mod writer;

pub use codec::Codec;
pub use container::{Compressed, Decompressed};
pub use error::{Result, StsError};
pub use format::{Header, HEADER_SIZE, MAGIC, VERSION};
pub use reader::{decompress_file, inspect_file, DecompressReport, InspectReport};
pub use writer::{compress_file, CompressReport};
