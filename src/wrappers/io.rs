//! The `io` module provides wrappers for standard I/O `Read` and `Write`
//! traits to convert line breaks on-the-fly.

use std::io::{Read, Write};

use crate::Format;

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// A `std::io::Read` wrapper and implementation that converts line breaks on-the-fly.
pub struct Reader<R> {
    format: Format,
    inner: R,
    input_buf: Box<[u8]>,
    output_buf: Box<[u8]>,
    output_pos: usize,
    output_size: usize,
    last_was_cr: bool,
    end_of_stream: bool,
}

impl<R: Read> Reader<R> {
    pub fn new(reader: R, format: Format) -> Self {
        Self::with_buffer_size(reader, format, DEFAULT_BUFFER_SIZE)
    }

    /// A `buf_size` of zero is raised to one byte.
    pub fn with_buffer_size(reader: R, format: Format, buf_size: usize) -> Self {
        let buf_size = buf_size.max(1);
        let required = format.max_output_size_for_chunk(buf_size);
        Self {
            format,
            inner: reader,
            input_buf: vec![0; buf_size].into_boxed_slice(),
            output_buf: vec![0; required].into_boxed_slice(),
            output_pos: 0,
            output_size: 0,
            last_was_cr: false,
            end_of_stream: false,
        }
    }

    fn fill_buf(&mut self) -> std::io::Result<()> {
        self.output_pos = 0;
        self.output_size = 0;

        // A chunk may legitimately convert to nothing (e.g. a lone LF completing
        // a CRLF), so keep reading until there is output or the stream ends.
        while self.output_size == 0 && !self.end_of_stream {
            let bytes_read = self.inner.read(&mut self.input_buf)?;
            let is_last_chunk = bytes_read == 0;
            self.end_of_stream = is_last_chunk;

            let status = self
                .format
                .normalize_chunk(
                    &self.input_buf[..bytes_read],
                    &mut self.output_buf,
                    self.last_was_cr,
                    is_last_chunk,
                )
                .map_err(std::io::Error::other)?;

            self.output_size = status.output_len();
            self.last_was_cr = status.ended_with_cr();
        }
        Ok(())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.output_pos >= self.output_size {
            self.fill_buf()?;
        }
        if self.output_size == 0 {
            return Ok(0);
        }

        let bytes_now = buf.len().min(self.output_size - self.output_pos);
        buf[..bytes_now]
            .copy_from_slice(&self.output_buf[self.output_pos..self.output_pos + bytes_now]);
        self.output_pos += bytes_now;
        Ok(bytes_now)
    }
}

/// A `std::io::Write` wrapper and implementation that converts line breaks on-the-fly.
///
/// Call [`Writer::finish`] once all data is written, otherwise buffered input
/// is lost.
pub struct Writer<W> {
    format: Format,
    inner: W,
    input_buf: Box<[u8]>,
    output_buf: Box<[u8]>,
    input_pos: usize,
    last_was_cr: bool,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W, format: Format) -> Self {
        Self::with_buffer_size(inner, format, DEFAULT_BUFFER_SIZE)
    }

    /// A `buf_size` of zero is raised to one byte.
    pub fn with_buffer_size(inner: W, format: Format, buf_size: usize) -> Self {
        let buf_size = buf_size.max(1);
        let required = format.max_output_size_for_chunk(buf_size);
        Self {
            format,
            inner,
            input_buf: vec![0; buf_size].into_boxed_slice(),
            output_buf: vec![0; required].into_boxed_slice(),
            input_pos: 0,
            last_was_cr: false,
        }
    }

    fn convert_buffered(&mut self, is_last_chunk: bool) -> std::io::Result<()> {
        let status = self
            .format
            .normalize_chunk(
                &self.input_buf[..self.input_pos],
                &mut self.output_buf,
                self.last_was_cr,
                is_last_chunk,
            )
            .map_err(std::io::Error::other)?;

        self.inner
            .write_all(&self.output_buf[..status.output_len()])?;
        self.last_was_cr = status.ended_with_cr();
        self.input_pos = 0;
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.convert_buffered(true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut source_buf = buf;
        let mut total_bytes = 0;

        while !source_buf.is_empty() {
            let bytes_now = source_buf.len().min(self.input_buf.len() - self.input_pos);
            self.input_buf[self.input_pos..self.input_pos + bytes_now]
                .copy_from_slice(&source_buf[..bytes_now]);
            self.input_pos += bytes_now;
            total_bytes += bytes_now;
            source_buf = &source_buf[bytes_now..];

            if self.input_pos < self.input_buf.len() {
                // Not enough data yet to process a full chunk.
                break;
            }
            self.convert_buffered(false)?;
        }
        Ok(total_bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // flush is not neccesarily the end of stream
        self.convert_buffered(false)?;
        self.inner.flush()
    }
}

impl Format {
    /// Wrap a reader with a line break converting `Reader`.
    pub fn wrap_reader<R: Read>(self, reader: R) -> Reader<R> {
        Reader::new(reader, self)
    }

    /// Wrap a writer with a line break converting `Writer`.
    pub fn wrap_writer<W: Write>(self, writer: W) -> Writer<W> {
        Writer::new(writer, self)
    }
}

/// Extension trait to provide convenient methods on `std::io::Read`.
pub trait ReadExt {
    /// Wrap the reader with a line break converting `Reader`.
    fn convert_line_breaks(self, format: Format) -> Reader<Self>
    where
        Self: Sized;
}

impl<R: Read> ReadExt for R {
    fn convert_line_breaks(self, format: Format) -> Reader<Self>
    where
        Self: Sized,
    {
        format.wrap_reader(self)
    }
}

/// Extension trait to provide convenient methods on `std::io::Write`.
pub trait WriteExt {
    /// Wrap the writer with a line break converting `Writer`.
    fn convert_line_breaks(self, format: Format) -> Writer<Self>
    where
        Self: Sized;
}

impl<W: Write> WriteExt for W {
    fn convert_line_breaks(self, format: Format) -> Writer<Self>
    where
        Self: Sized,
    {
        format.wrap_writer(self)
    }
}
