//! Fixed-size chunking of the decoded sample buffer.
//!
//! Yields contiguous, non-overlapping windows in ascending offset order,
//! covering the buffer exactly once. The final chunk may be shorter than
//! the nominal length; zero-length trailing slices are never emitted.

/// Lazy, finite, non-restartable iterator over fixed-size sample windows.
pub struct Chunker<'a> {
    buffer: &'a [f32],
    chunk_size: usize,
    position: usize,
}

impl<'a> Chunker<'a> {
    /// Creates a chunker over `buffer` with the given nominal chunk length.
    ///
    /// A zero `chunk_size` is clamped to 1 so the iterator always makes
    /// progress.
    pub fn new(buffer: &'a [f32], chunk_size: usize) -> Self {
        Self {
            buffer,
            chunk_size: chunk_size.max(1),
            position: 0,
        }
    }

    /// Samples not yet yielded.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }
}

impl<'a> Iterator for Chunker<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<&'a [f32]> {
        if self.position >= self.buffer.len() {
            return None;
        }

        let end = usize::min(self.position + self.chunk_size, self.buffer.len());
        let chunk = &self.buffer[self.position..end];
        self.position = end;
        Some(chunk)
    }
}
