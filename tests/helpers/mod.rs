use std::{
    collections::VecDeque,
    io::{self, Read},
};

/// Serves a fixed list of byte chunks, never returning more than one chunk per
/// `read`, so a test controls exactly where reads are split. Empty chunks are
/// skipped rather than reported as end of stream.
pub struct ChunkedReader<'a> {
    chunks: VecDeque<&'a [u8]>,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.chunks.front_mut() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        *chunk = &chunk[n..];
        if chunk.is_empty() {
            self.chunks.pop_front();
        }
        Ok(n)
    }
}

#[allow(dead_code)]
pub fn read_all<R: Read>(mut r: R) -> Vec<u8> {
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    out
}
