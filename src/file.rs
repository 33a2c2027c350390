//! Per-file detection and in-place conversion.
//!
//! Conversion never writes to the target before the whole converted stream is
//! sitting in anonymous scratch storage. Only then is the target reopened,
//! truncated and overwritten. Every handle is owned by the call and released
//! on all exit paths.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufReader, Read, Seek, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::{detect_from, Format, Reader};

/// Failure to detect or convert a single file, tagged with its path.
#[derive(Debug, Error)]
pub enum FileError {
    /// The source could not be opened for reading.
    #[error("can't open file at path: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Scratch storage could not be created or written.
    #[error("can't create scratch storage for {}", .path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't read file at path: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target could not be reopened for writing. It has not been modified.
    #[error("can't reopen file at path: {} for writing", .path.display())]
    Reopen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't write converted data to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Path of the file the failed operation was working on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            FileError::Open { path, .. }
            | FileError::Scratch { path, .. }
            | FileError::Read { path, .. }
            | FileError::Reopen { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }

    /// Underlying I/O error.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        match self {
            FileError::Open { source, .. }
            | FileError::Scratch { source, .. }
            | FileError::Read { source, .. }
            | FileError::Reopen { source, .. }
            | FileError::Write { source, .. } => source,
        }
    }
}

/// Detect the line break format of the file at `path`.
///
/// # Errors
///
/// Returns [`FileError::Open`] if the file can't be opened and
/// [`FileError::Read`] if reading it fails.
pub fn detect_file(path: impl AsRef<Path>) -> Result<Format, FileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let format = detect_from(&mut BufReader::new(file)).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %format, "detected line break format");
    Ok(format)
}

/// Convert the file at `path` to `target` line breaks in place.
///
/// # Errors
///
/// Fails with [`FileError::Open`], [`FileError::Scratch`], [`FileError::Read`] or
/// [`FileError::Reopen`] before the target has been touched. [`FileError::Write`]
/// means copying the converted data back into the truncated target failed.
pub fn convert_file(path: impl AsRef<Path>, target: Format) -> Result<(), FileError> {
    let path = path.as_ref();
    let source = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut scratch = tempfile::tempfile().map_err(|source| FileError::Scratch {
        path: path.to_path_buf(),
        source,
    })?;

    let converted = convert_into(path, Reader::new(source, target), &mut scratch)?;
    scratch.rewind().map_err(|source| FileError::Scratch {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| FileError::Reopen {
            path: path.to_path_buf(),
            source,
        })?;
    io::copy(&mut scratch, &mut file)
        .and_then(|_| file.flush())
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), %target, bytes = converted, "converted line breaks");
    Ok(())
}

/// Drain `reader` into `scratch`, consuming the reader so the source handle is
/// closed before the target is reopened.
fn convert_into<R: Read>(
    path: &Path,
    mut reader: Reader<R>,
    scratch: &mut File,
) -> Result<u64, FileError> {
    let mut buf = [0u8; 8192];
    let mut total = 0;
    loop {
        let bytes_read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        scratch
            .write_all(&buf[..bytes_read])
            .map_err(|source| FileError::Scratch {
                path: path.to_path_buf(),
                source,
            })?;
        total += bytes_read as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_exposes_path_and_cause() {
        let err = FileError::Reopen {
            path: PathBuf::from("some/file.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.path(), Path::new("some/file.txt"));
        assert_eq!(err.io_error().kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(
            err.to_string(),
            "can't reopen file at path: some/file.txt for writing"
        );
    }

    #[test]
    fn open_error_message_names_path() {
        let err = detect_file("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
        assert_eq!(
            err.to_string(),
            "can't open file at path: does/not/exist.txt"
        );
    }
}
