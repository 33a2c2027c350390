//! Line break format detection.
//!
//! Detection is a greedy first-match: only the first line break in the stream
//! decides the format, the rest of the stream is not inspected. A stream without
//! any `\r` or `\n` is reported as [`Format::Unix`].

use std::io::{self, BufRead};

use memchr::memchr2;

use crate::{
    types::{CR, LF},
    Format,
};

/// Outcome of scanning one buffer.
enum Scan {
    Found(Format, usize),
    TrailingCr(usize),
    Nothing(usize),
}

fn scan(buf: &[u8]) -> Scan {
    match memchr2(CR, LF, buf) {
        None => Scan::Nothing(buf.len()),
        Some(i) if buf[i] == LF => Scan::Found(Format::Unix, i + 1),
        Some(i) => match buf.get(i + 1).copied() {
            Some(LF) => Scan::Found(Format::Dos, i + 2),
            // Only the CR is consumed, the byte after it stays in the reader.
            Some(_) => Scan::Found(Format::Mac, i + 1),
            None => Scan::TrailingCr(i + 1),
        },
    }
}

/// Detect the line break format of the data in `reader`.
///
/// Consumes the stream up to and including the first line break. When that
/// break is a lone `\r`, the byte following it is left unread.
///
/// # Errors
///
/// Returns any error from the underlying reader other than
/// [`io::ErrorKind::Interrupted`], which is retried.
pub fn detect_from<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Format> {
    let mut pending_cr = false;
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        if buf.is_empty() {
            return Ok(if pending_cr { Format::Mac } else { Format::Unix });
        }

        if pending_cr {
            // A CR ended the previous buffer; this byte decides between Mac and DOS.
            return Ok(if buf[0] == LF {
                reader.consume(1);
                Format::Dos
            } else {
                Format::Mac
            });
        }

        match scan(buf) {
            Scan::Found(format, consumed) => {
                reader.consume(consumed);
                return Ok(format);
            }
            Scan::TrailingCr(consumed) => {
                reader.consume(consumed);
                pending_cr = true;
            }
            Scan::Nothing(consumed) => reader.consume(consumed),
        }
    }
}

impl Format {
    /// Detect the line break format of an in-memory buffer.
    #[must_use]
    pub fn detect(input: &[u8]) -> Format {
        let mut reader = input;
        match detect_from(&mut reader) {
            Ok(format) => format,
            Err(err) => unreachable!("reading from a slice failed: {err}"),
        }
    }
}
