#![doc = include_str!("../README.md")]

mod detect;
pub mod file;
mod formats;
mod types;
mod wrappers;

pub use detect::detect_from;
pub use file::{convert_file, detect_file, FileError};
pub use formats::{Format, NormalizeChunkResult, ParseFormatError};
pub use types::{Error, Result, CR, LF};
pub use wrappers::io::{ReadExt, Reader, WriteExt, Writer};
