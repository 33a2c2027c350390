use std::{fmt, str::FromStr, string::FromUtf8Error};

use memchr::memchr2;
use thiserror::Error as ThisError;

use crate::{
    types::{CR, LF},
    Error, Result,
};

/// Line break convention of a text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// A single LF (`\n`).
    Unix,
    /// A single CR (`\r`), as used by classic Mac OS.
    Mac,
    /// A CR followed by a LF (`\r\n`).
    Dos,
}

/// Status returned by `normalize_chunk` describing how many bytes were
/// written and whether the chunk ended with a `\r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeChunkResult {
    output_len: usize,
    ended_with_cr: bool,
}

impl NormalizeChunkResult {
    #[must_use]
    pub(crate) fn new(output_len: usize, ended_with_cr: bool) -> Self {
        Self {
            output_len,
            ended_with_cr,
        }
    }

    /// Number of bytes written into the output buffer for this chunk.
    #[must_use]
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Whether the input ended with a `\r` whose line break has already been
    /// written.
    ///
    /// If `true`, the next invocation of `normalize_chunk` should have `preceded_by_cr`
    /// set to `true` so that a leading `\n` is recognized as the second half of a `\r\n`.
    #[must_use]
    pub fn ended_with_cr(&self) -> bool {
        self.ended_with_cr
    }
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Unix, Format::Mac, Format::Dos];

    /// The bytes written for every line break when converting to this format.
    #[must_use]
    pub const fn line_break(self) -> &'static [u8] {
        match self {
            Format::Unix => b"\n",
            Format::Mac => b"\r",
            Format::Dos => b"\r\n",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Format::Unix => "Unix",
            Format::Mac => "Mac",
            Format::Dos => "DOS",
        }
    }

    /// Worst-case output size when converting a chunk of `chunk_size` bytes.
    ///
    /// Every input byte produces at most one line break worth of output, a `\r\n`
    /// pair produces exactly one.
    #[must_use]
    pub const fn max_output_size_for_chunk(self, chunk_size: usize) -> usize {
        chunk_size * self.line_break().len()
    }

    /// Convert a single chunk of input to this format into the provided `output` buffer.
    ///
    /// Every `\n`, every `\r\n` pair and every lone `\r` is replaced by
    /// [`Format::line_break`]; all other bytes are copied unchanged.
    ///
    /// Parameters:
    /// - `input`: bytes to convert
    /// - `output`: destination buffer, at least `max_output_size_for_chunk(input.len())` long.
    /// - `preceded_by_cr`: set to `true` if the previous chunk ended with a `\r`.
    /// - `is_last_chunk`: set to `true` if this is the final chunk of the stream.
    ///
    /// Returns a `NormalizeChunkResult` on success which tells how many bytes were
    /// written and whether the chunk ended with a dangling `\r`.
    ///
    /// # Errors
    ///
    /// Returns `Err(crate::Error::OutputBufferTooSmall { required })` if `output`
    /// is too small to hold the worst-case expansion of `input`.
    pub fn normalize_chunk(
        self,
        input: &[u8],
        output: &mut [u8],
        preceded_by_cr: bool,
        is_last_chunk: bool,
    ) -> Result<NormalizeChunkResult> {
        let output_required = self.max_output_size_for_chunk(input.len());
        if output.len() < output_required {
            return Err(Error::OutputBufferTooSmall {
                required: output_required,
            });
        }

        if input.is_empty() {
            // Nothing to pair a pending CR with yet, unless the stream is done.
            return Ok(NormalizeChunkResult::new(
                0,
                preceded_by_cr && !is_last_chunk,
            ));
        }

        let line_break = self.line_break();
        let mut scan_pos = 0;
        let mut read_pos = 0;
        let mut write_pos = 0;

        if input[0] == LF && preceded_by_cr {
            // We found:
            // - a LF preceeded by a CR from the previous chunk
            // The line break was written when that CR was seen, so skip this LF.
            scan_pos = 1;
            read_pos = 1;
        }

        loop {
            let Some(i) = memchr2(CR, LF, &input[scan_pos..]).map(|i| i + scan_pos) else {
                // We found:
                // - the end of the input
                let bytes_now = input.len() - read_pos;
                output[write_pos..write_pos + bytes_now].copy_from_slice(&input[read_pos..]);
                break Ok(NormalizeChunkResult::new(write_pos + bytes_now, false));
            };

            let (found_len, at_end) = match (input[i], input.get(i + 1).copied()) {
                (CR, Some(LF)) => (2, false),
                (CR, None) => (1, true),
                _ => (1, false),
            };

            if !at_end && input[i..i + found_len] == *line_break {
                // We found:
                // - a line break already in the target encoding
                // Don't copy now, it's included in a later bulk copy from read_pos.
                scan_pos = i + found_len;
                continue;
            }

            // We found:
            // - a line break in a foreign encoding, or
            // - a CR at the last position
            let bytes_now = i - read_pos;
            output[write_pos..write_pos + bytes_now].copy_from_slice(&input[read_pos..i]);
            write_pos += bytes_now;
            output[write_pos..write_pos + line_break.len()].copy_from_slice(line_break);
            write_pos += line_break.len();

            if at_end {
                break Ok(NormalizeChunkResult::new(write_pos, !is_last_chunk));
            }
            read_pos = i + found_len;
            scan_pos = read_pos;
        }
    }

    /// Convert a whole byte slice to this format, returning an owned `Vec<u8>`.
    #[must_use]
    pub fn normalize(self, input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; self.max_output_size_for_chunk(input.len())];
        let status = self
            .normalize_chunk(input, &mut output, false, true)
            .unwrap_or_else(|err| unreachable!("{err} (should be impossible)"));
        output.truncate(status.output_len());
        output
    }

    /// Convert a UTF-8 string to this format and return an owned String.
    #[must_use]
    pub fn normalize_str(self, input: &str) -> String {
        // normalize returns valid UTF-8 when given valid UTF-8 input because we only
        // touch ASCII CR/LF bytes.
        String::from_utf8(self.normalize(input.as_bytes())).unwrap_or_else(
            |FromUtf8Error { .. }| {
                unreachable!("normalize produced invalid UTF-8 (should be impossible)")
            },
        )
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a [`Format`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown line break format: {0}")]
pub struct ParseFormatError(String);

impl FromStr for Format {
    type Err = ParseFormatError;

    /// Accepts `unix`, `mac` and `dos`, ignoring ASCII case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}
